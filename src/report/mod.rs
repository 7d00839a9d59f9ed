// SPDX-License-Identifier: PMPL-1.0-or-later

//! Report generation module

pub mod formatter;
pub mod generator;
pub mod output;

use crate::library::LoadFailure;
use crate::merge::MergeSummary;
use crate::qm::ReleaseSummary;
use crate::stats::{ContextStats, MessageStats};
use crate::validate::Issue;
use anyhow::{Context as _, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub use formatter::ReportFormatter;
pub use generator::ReportGenerator;
pub use output::ReportOutputFormat;

/// Headline numbers for one catalog
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogSummary {
    pub path: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub app: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub native_name: Option<String>,
    pub version: String,
    pub stats: MessageStats,
    pub completeness: f64,
    pub errors: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckReport {
    pub created_at: String,
    pub summary: CatalogSummary,
    pub errors: usize,
    pub warnings: usize,
    pub issues: Vec<Issue>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsReport {
    pub created_at: String,
    pub summary: CatalogSummary,
    pub per_context: Vec<ContextStats>,
}

/// Overview of a translations directory
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanReport {
    pub created_at: String,
    pub root: PathBuf,
    pub catalogs: Vec<CatalogSummary>,
    pub failures: Vec<LoadFailure>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MergeReport {
    pub created_at: String,
    pub template: PathBuf,
    pub result: CatalogSummary,
    pub merge: MergeSummary,
}

/// Outcome of compiling a catalog to `.qm`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReleaseReport {
    pub created_at: String,
    pub output: PathBuf,
    pub source: CatalogSummary,
    pub release: ReleaseSummary,
}

/// Write a report in a machine readable format, picked from the file
/// extension (JSON unless it ends in `.yaml`/`.yml`).
pub fn save_report<T: Serialize, P: AsRef<Path>>(report: &T, path: P) -> Result<()> {
    let path = path.as_ref();
    let format = path
        .extension()
        .and_then(|e| e.to_str())
        .and_then(ReportOutputFormat::parse)
        .filter(|f| *f != ReportOutputFormat::Text)
        .unwrap_or(ReportOutputFormat::Json);
    let rendered = format
        .serialize(report)?
        .context("machine readable format expected")?;
    fs::write(path, rendered).with_context(|| format!("writing {}", path.display()))?;
    tracing::info!(path = %path.display(), "report saved");
    Ok(())
}

/// Print a report in the requested format
pub fn print_report<T, F>(report: &T, format: ReportOutputFormat, print_text: F) -> Result<()>
where
    T: Serialize,
    F: FnOnce(&ReportFormatter, &T),
{
    match format.serialize(report)? {
        Some(rendered) => println!("{}", rendered.trim_end()),
        None => print_text(&ReportFormatter::new(), report),
    }
    Ok(())
}
