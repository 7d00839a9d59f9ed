// SPDX-License-Identifier: PMPL-1.0-or-later

//! Runtime translation lookup
//!
//! [`Translator`] indexes one catalog the way a compiled `.qm` file would
//! be indexed: obsolete messages are left out, unfinished ones follow the
//! [`LookupPolicy`], and a miss falls back to the source text.

use crate::plural::{self, PluralRule};
use crate::types::{primary_variant, Catalog, Message, Status};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// What to do with messages whose translation is still `unfinished`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnfinishedPolicy {
    /// Serve unfinished translations when they have text
    #[default]
    Include,
    /// Treat unfinished messages as untranslated
    Exclude,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LookupPolicy {
    pub unfinished: UnfinishedPolicy,
}

impl LookupPolicy {
    pub fn excluding_unfinished() -> Self {
        Self {
            unfinished: UnfinishedPolicy::Exclude,
        }
    }
}

/// Outcome of a lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup {
    /// Text came from the catalog
    Translated(String),
    /// No usable translation; this is the source text
    Fallback(String),
}

impl Lookup {
    pub fn into_text(self) -> String {
        match self {
            Lookup::Translated(text) | Lookup::Fallback(text) => text,
        }
    }

    pub fn is_translated(&self) -> bool {
        matches!(self, Lookup::Translated(_))
    }
}

type Key<'a> = (&'a str, &'a str, &'a str);

/// Lookup table over a borrowed catalog
#[derive(Debug)]
pub struct Translator<'a> {
    messages: HashMap<Key<'a>, &'a Message>,
    rule: &'static PluralRule,
}

impl<'a> Translator<'a> {
    pub fn new(catalog: &'a Catalog, policy: LookupPolicy) -> Self {
        let rule = catalog
            .language_tag()
            .and_then(plural::rule_for)
            .unwrap_or_else(plural::fallback_rule);

        let mut messages = HashMap::new();
        for (context, message) in catalog.messages() {
            let skip = match message.status {
                Status::Obsolete => true,
                Status::Unfinished => policy.unfinished == UnfinishedPolicy::Exclude,
                Status::Finished => false,
            };
            if skip {
                continue;
            }
            // First occurrence wins on duplicate keys
            messages
                .entry((context, message.source.as_str(), message.comment_text()))
                .or_insert(message);
        }

        tracing::debug!(
            language = catalog.language_tag().unwrap_or("-"),
            entries = messages.len(),
            rule = rule.name,
            "built lookup table"
        );
        Self { messages, rule }
    }

    /// Plural rule used to pick numerus forms.
    pub fn rule(&self) -> &'static PluralRule {
        self.rule
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Find the active message for a key. A comment that matches nothing
    /// is dropped and the lookup retried without it.
    pub fn find(&self, context: &str, source: &str, comment: Option<&str>) -> Option<&'a Message> {
        let comment = comment.unwrap_or("");
        // Narrow the key lifetime so borrowed arguments can be used as keys
        let messages: &HashMap<Key<'_>, &'a Message> = &self.messages;
        messages
            .get(&(context, source, comment))
            .or_else(|| {
                if comment.is_empty() {
                    None
                } else {
                    messages.get(&(context, source, ""))
                }
            })
            .copied()
    }

    /// Translate a key, telling a real translation apart from the fallback.
    ///
    /// With a count, the form is chosen by the catalog's plural rule and
    /// every `%n` is replaced by the count, in the fallback as well.
    pub fn lookup(
        &self,
        context: &str,
        source: &str,
        comment: Option<&str>,
        count: Option<i64>,
    ) -> Lookup {
        let found = self
            .find(context, source, comment)
            .map(|message| self.pick_form(message, count))
            .filter(|text| !text.is_empty());

        match found {
            Some(text) => Lookup::Translated(substitute_count(text, count)),
            None => Lookup::Fallback(substitute_count(source, count)),
        }
    }

    /// Translate a key, returning the source text when there is no
    /// translation.
    ///
    /// ```
    /// use tscat::lookup::{LookupPolicy, Translator};
    /// use tscat::types::{Catalog, Context, Message};
    ///
    /// let catalog = Catalog::new("de")
    ///     .with_context(Context::new("AboutDialog").with_message(Message::new("&Close", "&Schließen")));
    /// let tr = Translator::new(&catalog, LookupPolicy::default());
    /// assert_eq!(tr.translate("AboutDialog", "&Close", None, None), "&Schließen");
    /// assert_eq!(tr.translate("AboutDialog", "Help", None, None), "Help");
    /// ```
    pub fn translate(
        &self,
        context: &str,
        source: &str,
        comment: Option<&str>,
        count: Option<i64>,
    ) -> String {
        self.lookup(context, source, comment, count).into_text()
    }

    fn pick_form<'m>(&self, message: &'m Message, count: Option<i64>) -> &'m str {
        let forms = &message.translation.forms;
        if forms.is_empty() {
            return "";
        }
        let index = match count {
            Some(n) if message.numerus => self.rule.form_index(n).min(forms.len() - 1),
            _ => 0,
        };
        primary_variant(&forms[index])
    }
}

fn substitute_count(text: &str, count: Option<i64>) -> String {
    match count {
        Some(n) => text.replace("%n", &n.to_string()),
        None => text.to_string(),
    }
}
