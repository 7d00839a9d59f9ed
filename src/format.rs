// SPDX-License-Identifier: PMPL-1.0-or-later

//! Catalog file formats, picked by extension

use crate::po;
use crate::qm::{self, ReleaseOptions};
use crate::ts::{self, SaveOptions, TsError, TsResult};
use crate::types::Catalog;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Ts,
    Po,
    Pot,
    Qm,
}

impl Format {
    pub fn from_path(path: &Path) -> TsResult<Self> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase)
            .unwrap_or_default();
        match extension.as_str() {
            "ts" => Ok(Self::Ts),
            "po" => Ok(Self::Po),
            "pot" => Ok(Self::Pot),
            "qm" => Ok(Self::Qm),
            _ => Err(TsError::UnknownFormat(path.display().to_string())),
        }
    }

    pub fn load(self, path: &Path) -> TsResult<Catalog> {
        match self {
            Self::Ts => ts::load(path),
            Self::Po | Self::Pot => po::load(path),
            Self::Qm => qm::load(path),
        }
    }

    pub fn save(
        self,
        catalog: &Catalog,
        path: &Path,
        save: &SaveOptions,
        release: &ReleaseOptions,
    ) -> TsResult<()> {
        match self {
            Self::Ts => ts::save(catalog, path, save),
            Self::Po => po::save(catalog, path, false),
            Self::Pot => po::save(catalog, path, true),
            Self::Qm => qm::save(catalog, path, release).map(|_| ()),
        }
    }
}

/// Load a catalog in whatever format its extension names.
pub fn load<P: AsRef<Path>>(path: P) -> TsResult<Catalog> {
    let path = path.as_ref();
    Format::from_path(path)?.load(path)
}

/// Save a catalog in whatever format the target extension names.
pub fn save<P: AsRef<Path>>(
    catalog: &Catalog,
    path: P,
    save: &SaveOptions,
    release: &ReleaseOptions,
) -> TsResult<()> {
    let path = path.as_ref();
    Format::from_path(path)?.save(catalog, path, save, release)
}
