// SPDX-License-Identifier: PMPL-1.0-or-later

//! `tscat.yaml` configuration
//!
//! Every field is optional; a missing file means defaults.
//!
//! ```yaml
//! lookup:
//!   unfinished: exclude
//! checks:
//!   punctuation: false
//! report_format: json
//! save:
//!   sort_contexts: true
//!   drop_empty_obsolete: true
//! release:
//!   compress: true
//!   untranslated_prefix: "~"
//! ```

use crate::lookup::LookupPolicy;
use crate::qm::ReleaseOptions;
use crate::report::ReportOutputFormat;
use crate::ts::SaveOptions;
use crate::validate::Checks;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_FILE: &str = "tscat.yaml";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub lookup: LookupPolicy,
    pub checks: Checks,
    pub report_format: ReportOutputFormat,
    pub save: SaveOptions,
    pub release: ReleaseOptions,
}

impl Config {
    /// `tscat.yaml` in the working directory, or defaults when absent.
    pub fn load_default() -> Result<Self> {
        let path = PathBuf::from(DEFAULT_CONFIG_FILE);
        if path.is_file() {
            Self::load(&path)
        } else {
            tracing::debug!("no {} found, using defaults", DEFAULT_CONFIG_FILE);
            Ok(Self::default())
        }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config = Self::parse(&raw)
            .with_context(|| format!("parsing config {}", path.display()))?;
        tracing::debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    pub fn parse(raw: &str) -> Result<Self> {
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(raw)?)
    }

    /// Explicit path when given, otherwise [`Config::load_default`].
    pub fn resolve(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Self::load_default(),
        }
    }
}
