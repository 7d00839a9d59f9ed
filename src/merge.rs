// SPDX-License-Identifier: PMPL-1.0-or-later

//! Merge a fresh template into an existing translation
//!
//! This is the catalog lifecycle lupdate drives after the sources change.
//! The template lists the messages the application has today; the existing
//! catalog holds the work translators have done so far. Nothing a
//! translator wrote is lost: messages that disappeared from the template
//! become obsolete instead of being dropped.

use crate::plural;
use crate::types::{Catalog, Context, Message, Status, Translation};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeSummary {
    /// Present in both, translation carried over
    pub kept: usize,
    /// New in the template
    pub added: usize,
    /// Gone from the template, now obsolete
    pub obsoleted: usize,
    /// Obsolete before, back in the template
    pub revived: usize,
    /// Same source under a changed comment; translation reused, unfinished
    pub comment_changed: usize,
}

type Key<'a> = (&'a str, &'a str, &'a str);

/// Merge `template` into `existing`.
///
/// The result keeps the header of `existing` (language, version) and the
/// location mode and ordering of `template`. Messages that are no longer
/// in the template follow, in their original order, as obsolete.
pub fn merge(existing: &Catalog, template: &Catalog) -> (Catalog, MergeSummary) {
    let mut summary = MergeSummary::default();

    let forms = existing
        .language_tag()
        .and_then(plural::rule_for)
        .unwrap_or_else(plural::fallback_rule)
        .count();

    let previous: Vec<(&str, &Message)> = existing.messages().collect();
    let mut index: HashMap<Key<'_>, Vec<usize>> = HashMap::new();
    let mut by_source: HashMap<(&str, &str), Vec<usize>> = HashMap::new();
    for (at, &(context, message)) in previous.iter().enumerate() {
        index
            .entry((context, message.source.as_str(), message.comment_text()))
            .or_default()
            .push(at);
        by_source
            .entry((context, message.source.as_str()))
            .or_default()
            .push(at);
    }
    let mut used: HashSet<usize> = HashSet::new();

    let mut merged = Catalog {
        contexts: Vec::new(),
        locations: template.locations,
        ..existing.clone()
    };

    for template_context in &template.contexts {
        let name = template_context.name.as_str();
        let mut context = Context::new(name);
        for fresh in &template_context.messages {
            let exact = index
                .get(&(name, fresh.source.as_str(), fresh.comment_text()))
                .and_then(|candidates| candidates.iter().copied().find(|at| !used.contains(at)));
            let message = match exact {
                Some(at) => {
                    used.insert(at);
                    let old = previous[at].1;
                    if old.is_obsolete() {
                        summary.revived += 1;
                    } else {
                        summary.kept += 1;
                    }
                    carry_over(old, fresh, forms)
                }
                None => {
                    let similar = by_source
                        .get(&(name, fresh.source.as_str()))
                        .and_then(|candidates| {
                            candidates.iter().copied().find(|at| {
                                let m = previous[*at].1;
                                !used.contains(at)
                                    && m.is_translated()
                                    && template_context.find(&m.source, m.comment_text()).is_none()
                            })
                        });
                    match similar {
                        Some(at) => {
                            used.insert(at);
                            let old = previous[at].1;
                            summary.comment_changed += 1;
                            let mut message = carry_over(old, fresh, forms);
                            message.status = Status::Unfinished;
                            message.old_comment = Some(old.comment_text().to_string());
                            message
                        }
                        None => {
                            summary.added += 1;
                            untranslated(fresh, forms)
                        }
                    }
                }
            };
            context.messages.push(message);
        }
        merged.contexts.push(context);
    }

    for (at, &(context, message)) in previous.iter().enumerate() {
        if used.contains(&at) {
            continue;
        }
        let mut message = message.clone();
        if !message.is_obsolete() {
            message.status = Status::Obsolete;
            summary.obsoleted += 1;
        }
        message.locations.clear();
        merged.context_mut(context).messages.push(message);
    }

    tracing::debug!(
        kept = summary.kept,
        added = summary.added,
        obsoleted = summary.obsoleted,
        revived = summary.revived,
        comment_changed = summary.comment_changed,
        "merged template"
    );
    (merged, summary)
}

/// Translator data from `old`, source-side data from `fresh`.
fn carry_over(old: &Message, fresh: &Message, forms: usize) -> Message {
    let mut message = Message {
        id: fresh.id.clone().or_else(|| old.id.clone()),
        source: fresh.source.clone(),
        comment: fresh.comment.clone(),
        extra_comment: fresh.extra_comment.clone(),
        numerus: fresh.numerus,
        locations: fresh.locations.clone(),
        old_source: old.old_source.clone(),
        old_comment: old.old_comment.clone(),
        translator_comment: old.translator_comment.clone(),
        user_data: old.user_data.clone(),
        extras: old.extras.clone(),
        status: match old.status {
            Status::Obsolete => Status::Unfinished,
            status => status,
        },
        translation: old.translation.clone(),
    };
    if message.numerus && message.translation.forms.len() < forms {
        message.translation.forms.resize(forms, String::new());
        message.status = Status::Unfinished;
    }
    message
}

fn untranslated(fresh: &Message, forms: usize) -> Message {
    let count = if fresh.numerus { forms } else { 1 };
    Message {
        status: Status::Unfinished,
        translation: Translation::plural(vec![String::new(); count]),
        translator_comment: None,
        ..fresh.clone()
    }
}
