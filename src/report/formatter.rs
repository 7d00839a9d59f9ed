// SPDX-License-Identifier: PMPL-1.0-or-later

//! Report formatting and output

use crate::report::{
    CatalogSummary, CheckReport, MergeReport, ReleaseReport, ScanReport, StatsReport,
};
use crate::validate::Severity;
use colored::*;

pub struct ReportFormatter;

fn completeness_color(completeness: f64) -> &'static str {
    if completeness >= 95.0 {
        "green"
    } else if completeness >= 60.0 {
        "yellow"
    } else {
        "red"
    }
}

impl ReportFormatter {
    pub fn new() -> Self {
        Self
    }

    pub fn print_check(&self, report: &CheckReport) {
        println!("\n{}", "=== TSCAT CHECK REPORT ===".bold().cyan());
        println!();
        self.print_summary(&report.summary);
        println!();

        if report.issues.is_empty() {
            println!("{}", "No issues found".green());
            return;
        }

        println!("{}", "ISSUES".bold().yellow());
        for (i, issue) in report.issues.iter().enumerate() {
            let severity = match issue.severity {
                Severity::Error => issue.severity.to_string().red().bold(),
                Severity::Warning => issue.severity.to_string().yellow(),
            };
            let place = match (&issue.context, &issue.source) {
                (Some(context), Some(source)) => format!("{} / {:?}", context, source),
                (Some(context), None) => context.clone(),
                _ => "catalog".to_string(),
            };
            println!(
                "  {}. [{}] {} - {}",
                i + 1,
                severity,
                place.bold(),
                issue.detail
            );
        }
        println!();
        println!(
            "  {} error(s), {} warning(s)",
            report.errors.to_string().red().bold(),
            report.warnings.to_string().yellow()
        );
    }

    pub fn print_stats(&self, report: &StatsReport) {
        println!("\n{}", "=== TSCAT STATISTICS ===".bold().cyan());
        println!();
        self.print_summary(&report.summary);
        println!();

        println!("{}", "CONTEXTS".bold().yellow());
        for context in &report.per_context {
            let completeness = context.stats.completeness();
            println!(
                "  {:<40} {:>4}/{:<4} {}",
                context.name,
                context.stats.finished,
                context.stats.active(),
                format!("{:.1}%", completeness).color(completeness_color(completeness))
            );
        }
    }

    pub fn print_scan(&self, report: &ScanReport) {
        println!("\n{}", "=== TSCAT LIBRARY SCAN ===".bold().cyan());
        println!("  Root: {}", report.root.display());
        println!("  Catalogs: {}", report.catalogs.len());
        println!();

        for summary in &report.catalogs {
            let label = format!(
                "{}_{}",
                summary.app.as_deref().unwrap_or("?"),
                summary.language.as_deref().unwrap_or("?")
            );
            let errors = if summary.errors > 0 {
                format!("  {} error(s)", summary.errors).red().to_string()
            } else {
                String::new()
            };
            println!(
                "  {:<28} {:>5} msgs  {}{}",
                label.bold(),
                summary.stats.active(),
                format!("{:>6.1}%", summary.completeness).color(completeness_color(summary.completeness)),
                errors
            );
        }

        if !report.failures.is_empty() {
            println!();
            println!("{}", "UNREADABLE FILES".bold().red());
            for failure in &report.failures {
                println!("  - {}: {}", failure.path.display(), failure.error.dimmed());
            }
        }
    }

    pub fn print_merge(&self, report: &MergeReport) {
        println!("\n{}", "=== TSCAT MERGE ===".bold().cyan());
        println!("  Template: {}", report.template.display());
        println!("  Kept: {}", report.merge.kept);
        println!("  Added: {}", report.merge.added.to_string().yellow());
        println!("  Revived: {}", report.merge.revived);
        println!("  Comment changed: {}", report.merge.comment_changed);
        println!("  Obsoleted: {}", report.merge.obsoleted.to_string().dimmed());
        println!();
        self.print_summary(&report.result);
    }

    pub fn print_release(&self, report: &ReleaseReport) {
        println!("\n{}", "=== TSCAT RELEASE ===".bold().cyan());
        println!("  Output: {}", report.output.display());
        println!(
            "  Generated: {} ({} finished, {} unfinished)",
            report.release.generated().to_string().green(),
            report.release.finished,
            report.release.unfinished
        );
        if report.release.untranslated > 0 {
            println!(
                "  Ignored: {} untranslated",
                report.release.untranslated.to_string().yellow()
            );
        }
        if report.release.missing_ids > 0 {
            println!(
                "  Dropped: {} without an id",
                report.release.missing_ids.to_string().red()
            );
        }
        if report.release.dropped_data > 0 {
            println!(
                "  Discarded context or comment: {}",
                report.release.dropped_data.to_string().dimmed()
            );
        }
        println!();
        self.print_summary(&report.source);
    }

    fn print_summary(&self, summary: &CatalogSummary) {
        println!("{}", "CATALOG".bold().yellow());
        println!("  File: {}", summary.path.display());
        match (&summary.language, &summary.language_name) {
            (Some(tag), Some(name)) => match &summary.native_name {
                Some(native) if native != name => {
                    println!("  Language: {} ({}, {})", tag, name, native)
                }
                _ => println!("  Language: {} ({})", tag, name),
            },
            (Some(tag), None) => println!("  Language: {}", tag),
            _ => println!("  Language: {}", "unspecified".dimmed()),
        }
        println!("  Format version: {}", summary.version);
        println!("  Contexts: {}", summary.stats.contexts);
        println!("  Finished: {}", summary.stats.finished);
        println!("  Unfinished: {}", summary.stats.unfinished);
        println!("  Obsolete: {}", summary.stats.obsolete);
        println!("  Plural messages: {}", summary.stats.plural);
        println!(
            "  Completeness: {}",
            format!("{:.1}%", summary.completeness)
                .color(completeness_color(summary.completeness))
                .bold()
        );
    }
}

impl Default for ReportFormatter {
    fn default() -> Self {
        Self::new()
    }
}
