// SPDX-License-Identifier: PMPL-1.0-or-later

//! Report generation logic

use crate::lang::{self, LanguageTag};
use crate::library::Library;
use crate::merge::MergeSummary;
use crate::qm::ReleaseSummary;
use crate::report::{
    CatalogSummary, CheckReport, MergeReport, ReleaseReport, ScanReport, StatsReport,
};
use crate::stats::{context_stats, message_stats};
use crate::types::Catalog;
use crate::validate::{self, Checks, Severity};
use std::path::Path;

pub struct ReportGenerator {
    checks: Checks,
}

impl ReportGenerator {
    pub fn new() -> Self {
        Self {
            checks: Checks::all(),
        }
    }

    pub fn with_checks(checks: Checks) -> Self {
        Self { checks }
    }

    pub fn check(&self, path: &Path, catalog: &Catalog) -> CheckReport {
        let issues = validate::validate(catalog, &self.checks);
        let errors = issues
            .iter()
            .filter(|i| i.severity == Severity::Error)
            .count();
        CheckReport {
            created_at: timestamp(),
            summary: self.summarize(path, catalog),
            errors,
            warnings: issues.len() - errors,
            issues,
        }
    }

    pub fn stats(&self, path: &Path, catalog: &Catalog) -> StatsReport {
        StatsReport {
            created_at: timestamp(),
            summary: self.summarize(path, catalog),
            per_context: context_stats(catalog),
        }
    }

    pub fn scan(&self, library: &Library) -> ScanReport {
        let mut catalogs: Vec<CatalogSummary> = library
            .catalogs()
            .iter()
            .map(|loaded| {
                let mut summary = self.summarize(&loaded.file.path, &loaded.catalog);
                summary.app = Some(loaded.file.app.clone());
                summary.language = Some(loaded.file.language.to_string());
                summary.errors = validate::validate(&loaded.catalog, &Checks::none())
                    .iter()
                    .filter(|i| i.severity == Severity::Error)
                    .count();
                summary
            })
            .collect();

        // Least complete catalogs first
        catalogs.sort_by(|a, b| {
            a.completeness
                .total_cmp(&b.completeness)
                .then_with(|| a.path.cmp(&b.path))
        });

        ScanReport {
            created_at: timestamp(),
            root: library.root().to_path_buf(),
            catalogs,
            failures: library.failures().to_vec(),
        }
    }

    pub fn merge(&self, path: &Path, template: &Path, merged: &Catalog, summary: MergeSummary) -> MergeReport {
        MergeReport {
            created_at: timestamp(),
            template: template.to_path_buf(),
            result: self.summarize(path, merged),
            merge: summary,
        }
    }

    pub fn release(
        &self,
        path: &Path,
        output: &Path,
        catalog: &Catalog,
        summary: ReleaseSummary,
    ) -> ReleaseReport {
        ReleaseReport {
            created_at: timestamp(),
            output: output.to_path_buf(),
            source: self.summarize(path, catalog),
            release: summary,
        }
    }

    fn summarize(&self, path: &Path, catalog: &Catalog) -> CatalogSummary {
        let stats = message_stats(catalog);
        let tag = catalog.language_tag().and_then(LanguageTag::parse);
        let language_name = tag.as_ref().map(LanguageTag::display_name);
        let native_name = tag
            .as_ref()
            .and_then(|tag| lang::native_name(&tag.language))
            .map(str::to_string);
        CatalogSummary {
            path: path.to_path_buf(),
            app: None,
            language: catalog.language_tag().map(str::to_string),
            language_name,
            native_name,
            version: catalog.version.clone(),
            completeness: stats.completeness(),
            stats,
            errors: 0,
        }
    }
}

impl Default for ReportGenerator {
    fn default() -> Self {
        Self::new()
    }
}

fn timestamp() -> String {
    chrono::Utc::now().to_rfc3339()
}
