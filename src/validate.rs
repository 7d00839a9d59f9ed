// SPDX-License-Identifier: PMPL-1.0-or-later

//! Catalog validation
//!
//! Structural problems (duplicate keys, wrong number of plural forms) are
//! errors. The translator-facing checks Linguist runs while editing
//! (accelerators, ending punctuation, place markers, `%n` in plural forms)
//! are warnings and can be switched off one by one through [`Checks`].

use crate::lang::LanguageTag;
use crate::plural::{self, PluralRule};
use crate::types::{primary_variant, Catalog, Message};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Error,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Warning => write!(f, "WARNING"),
            Severity::Error => write!(f, "ERROR"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    DuplicateMessage,
    PluralCount,
    UnknownLanguage,
    Accelerator,
    Punctuation,
    PlaceMarkers,
    NumerusMarker,
}

impl IssueKind {
    pub fn severity(&self) -> Severity {
        match self {
            IssueKind::DuplicateMessage | IssueKind::PluralCount => Severity::Error,
            _ => Severity::Warning,
        }
    }
}

/// One finding. Catalog-wide issues have no context or source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    pub severity: Severity,
    pub kind: IssueKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    pub detail: String,
}

impl Issue {
    fn new(kind: IssueKind, context: Option<&str>, message: Option<&Message>, detail: String) -> Self {
        Self {
            severity: kind.severity(),
            kind,
            context: context.map(str::to_string),
            source: message.map(|m| m.source.clone()),
            detail,
        }
    }
}

/// Switches for the translator-facing checks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Checks {
    pub accelerators: bool,
    pub punctuation: bool,
    pub place_markers: bool,
    pub numerus_markers: bool,
}

impl Default for Checks {
    fn default() -> Self {
        Self::all()
    }
}

impl Checks {
    pub fn all() -> Self {
        Self {
            accelerators: true,
            punctuation: true,
            place_markers: true,
            numerus_markers: true,
        }
    }

    /// Structural checks only.
    pub fn none() -> Self {
        Self {
            accelerators: false,
            punctuation: false,
            place_markers: false,
            numerus_markers: false,
        }
    }
}

/// Run every enabled check over a catalog.
pub fn validate(catalog: &Catalog, checks: &Checks) -> Vec<Issue> {
    let mut issues = Vec::new();

    let target = catalog.language_tag().and_then(LanguageTag::parse);
    let source_language = catalog
        .source_language
        .as_deref()
        .and_then(LanguageTag::parse);
    let rule = catalog.language_tag().and_then(plural::rule_for);

    let has_plurals = catalog.messages().any(|(_, m)| m.numerus && !m.is_obsolete());
    if has_plurals && rule.is_none() {
        issues.push(Issue::new(
            IssueKind::UnknownLanguage,
            None,
            None,
            format!(
                "no plural rule for language '{}', plural form counts not checked",
                catalog.language.as_deref().unwrap_or("")
            ),
        ));
    }

    let target_greek = target.as_ref().is_some_and(|t| t.language == "el");
    let source_greek = source_language.as_ref().is_some_and(|t| t.language == "el");
    let target_thai = target.as_ref().is_some_and(|t| t.language == "th");

    for context in &catalog.contexts {
        let mut seen = HashSet::new();
        for message in &context.messages {
            if !seen.insert(message.key()) {
                let detail = match message.comment.as_deref().filter(|c| !c.is_empty()) {
                    Some(comment) => format!("duplicate message with comment '{}'", comment),
                    None => "duplicate message".to_string(),
                };
                issues.push(Issue::new(
                    IssueKind::DuplicateMessage,
                    Some(context.name.as_str()),
                    Some(message),
                    detail,
                ));
            }

            if message.is_obsolete() {
                continue;
            }

            if let (true, Some(rule)) = (message.numerus, rule) {
                let found = message.translation.forms.len();
                if found != rule.count() {
                    issues.push(Issue::new(
                        IssueKind::PluralCount,
                        Some(context.name.as_str()),
                        Some(message),
                        format!("{} plural forms, language needs {}", found, rule.count()),
                    ));
                }
            }

            if !message.is_translated() {
                continue;
            }

            let mut warn = |kind: IssueKind, detail: &str| {
                issues.push(Issue::new(kind, Some(context.name.as_str()), Some(message), detail.to_string()));
            };

            if checks.accelerators {
                let in_source = has_mnemonic(primary_variant(&message.source));
                let in_translation = message
                    .translation
                    .forms
                    .iter()
                    .all(|f| has_mnemonic(primary_variant(f)));
                if in_source && !in_translation {
                    warn(IssueKind::Accelerator, "accelerator possibly missing in translation");
                } else if !in_source && in_translation {
                    warn(IssueKind::Accelerator, "accelerator possibly superfluous in translation");
                }
            }

            if checks.punctuation {
                let expected = Ending::of(&message.source, source_greek, false);
                let mismatch = message
                    .translation
                    .forms
                    .iter()
                    .any(|f| Ending::of(primary_variant(f), target_greek, target_thai) != expected);
                if mismatch {
                    warn(
                        IssueKind::Punctuation,
                        "translation does not end with the same punctuation as the source",
                    );
                }
            }

            if checks.place_markers && !place_markers_match(message) {
                warn(
                    IssueKind::PlaceMarkers,
                    "translation does not refer to the same place markers as the source",
                );
            }

            if checks.numerus_markers && message.numerus {
                if let Some(rule) = rule {
                    if let Some(index) = missing_count_marker(message, rule) {
                        let detail = format!(
                            "plural form {} ({}) does not contain %n",
                            index + 1,
                            rule.form_names().get(index).unwrap_or(&"?")
                        );
                        warn(IssueKind::NumerusMarker, &detail);
                    }
                }
            }
        }
    }

    tracing::debug!(
        language = catalog.language_tag().unwrap_or("-"),
        issues = issues.len(),
        "validated catalog"
    );
    issues
}

/// Whether `text` contains a keyboard accelerator.
///
/// `&&` is a literal ampersand, `& ` is ignored, and `&name;` looks like an
/// HTML entity; rich text carries no accelerators, so scanning stops there.
pub fn has_mnemonic(text: &str) -> bool {
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '&' {
            continue;
        }
        let Some(next) = chars.next() else {
            return false;
        };
        if next == '&' || next == ' ' || next.is_control() {
            continue;
        }
        let mut letters = 0;
        while chars.peek().is_some_and(|c| c.is_ascii_alphabetic()) {
            chars.next();
            letters += 1;
        }
        return letters == 0 || chars.peek() != Some(&';');
    }
    false
}

/// Punctuation class at the end of a text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ending {
    None,
    FullStop,
    Interrobang,
    Colon,
    Ellipsis,
}

impl Ending {
    /// Classify the last non-space character of `text`.
    ///
    /// `greek` makes `;` a question mark. `thai` ignores the Thai
    /// abbreviation sign.
    pub fn of(text: &str, greek: bool, thai: bool) -> Self {
        let text = text.trim_end();
        let text = if thai {
            text.trim_end_matches('\u{0e2f}').trim_end()
        } else {
            text
        };
        let Some(last) = text.chars().last() else {
            return Ending::None;
        };
        match last {
            '.' if text.ends_with("...") => Ending::Ellipsis,
            '.' | '\u{0589}' | '\u{06d4}' | '\u{3002}' => Ending::FullStop,
            '!' | '?' | '\u{00a1}' | '\u{00bf}' | '\u{01c3}' | '\u{061f}' | '\u{203c}'
            | '\u{203d}' | '\u{2048}' | '\u{2049}' | '\u{2762}' | '\u{ff01}' | '\u{ff1f}'
            | '\u{037e}' => Ending::Interrobang,
            ';' if greek => Ending::Interrobang,
            ':' | '\u{ff1a}' => Ending::Colon,
            '\u{2026}' => Ending::Ellipsis,
            _ => Ending::None,
        }
    }
}

/// Count `%<digits>` markers in a text.
fn place_markers(text: &str) -> HashMap<u32, usize> {
    let mut counts = HashMap::new();
    let mut rest = text;
    while let Some(pos) = rest.find('%') {
        rest = &rest[pos + 1..];
        let digits = rest.len() - rest.trim_start_matches(|c: char| c.is_ascii_digit()).len();
        if let Ok(index) = rest[..digits].parse::<u32>() {
            *counts.entry(index).or_insert(0) += 1;
        }
        rest = &rest[digits..];
    }
    counts
}

/// Every translation form uses the same place markers as the source, the
/// same number of times.
fn place_markers_match(message: &Message) -> bool {
    let expected = place_markers(&message.source);
    message
        .translation
        .forms
        .iter()
        .all(|form| place_markers(primary_variant(form)) == expected)
}

/// First form that needs `%n` (or `%Ln`) but lacks it.
fn missing_count_marker(message: &Message, rule: &PluralRule) -> Option<usize> {
    message
        .translation
        .forms
        .iter()
        .enumerate()
        .find(|(index, form)| {
            rule.needs_count_marker(*index)
                && !form.is_empty()
                && !form.contains("%n")
                && !form.contains("%Ln")
        })
        .map(|(index, _)| index)
}

/// True when any issue is an error.
pub fn has_errors(issues: &[Issue]) -> bool {
    issues.iter().any(|i| i.severity == Severity::Error)
}
