// SPDX-License-Identifier: PMPL-1.0-or-later

//! Core type definitions for tscat
//!
//! A [`Catalog`] is the in-memory form of one Qt Linguist `.ts` file: one
//! target language, a list of named contexts, and the messages inside
//! them. The model keeps everything lupdate writes so that a catalog can be
//! loaded, edited and saved without losing data.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Separator between length variants inside one translation form.
///
/// Qt stores `<lengthvariant>` alternatives joined by U+009C; the first
/// variant is the one shown when there is enough room.
pub const VARIANT_SEPARATOR: char = '\u{9c}';

/// TS format version written for catalogs that did not carry one.
pub const DEFAULT_TS_VERSION: &str = "2.1";

/// Translation status of a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    #[default]
    Finished,
    Unfinished,
    Obsolete,
}

impl Status {
    /// Value of the `type` attribute on `<translation>`, if any.
    pub fn type_attr(&self) -> Option<&'static str> {
        match self {
            Status::Finished => None,
            Status::Unfinished => Some("unfinished"),
            Status::Obsolete => Some("obsolete"),
        }
    }

    /// Parse a `type` attribute. `vanished` is Qt 5's spelling of obsolete.
    pub fn from_type_attr(value: &str) -> Option<Self> {
        match value {
            "unfinished" => Some(Status::Unfinished),
            "obsolete" | "vanished" => Some(Status::Obsolete),
            _ => None,
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Status::Finished => "finished",
            Status::Unfinished => "unfinished",
            Status::Obsolete => "obsolete",
        };
        f.write_str(label)
    }
}

/// How `<location>` elements are encoded in the file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LocationsMode {
    /// No locations at all
    #[default]
    None,
    /// Every location carries its file name and absolute line
    Absolute,
    /// Lines are `+`/`-` deltas and repeated file names are elided
    Relative,
}

/// A source reference, already resolved to an absolute line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub file: Option<String>,
    pub line: Option<i32>,
}

/// Translated text of a message
///
/// Ordinary messages hold exactly one form. Numerus messages hold one form
/// per plural rule of the catalog language.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Translation {
    pub forms: Vec<String>,
}

impl Translation {
    pub fn single(text: impl Into<String>) -> Self {
        Self {
            forms: vec![text.into()],
        }
    }

    pub fn plural<I, S>(forms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            forms: forms.into_iter().map(Into::into).collect(),
        }
    }

    /// First form, or the empty string.
    pub fn text(&self) -> &str {
        self.forms.first().map(String::as_str).unwrap_or("")
    }

    /// True when no form carries any text.
    pub fn is_empty(&self) -> bool {
        self.forms.iter().all(|form| form.is_empty())
    }
}

/// Primary (longest) length variant of a translation form.
pub fn primary_variant(form: &str) -> &str {
    match form.find(VARIANT_SEPARATOR) {
        Some(pos) => &form[..pos],
        None => form,
    }
}

/// One translatable string
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Message {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub source: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub old_source: Option<String>,
    /// Disambiguating comment; part of the lookup key
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub old_comment: Option<String>,
    /// Developer note for translators (`<extracomment>`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extra_comment: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub translator_comment: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_data: Option<String>,
    pub numerus: bool,
    pub status: Status,
    pub translation: Translation,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub locations: Vec<Location>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extras: BTreeMap<String, String>,
}

impl Message {
    pub fn new(source: impl Into<String>, translation: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            translation: Translation::single(translation),
            ..Default::default()
        }
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    pub fn with_status(mut self, status: Status) -> Self {
        self.status = status;
        self
    }

    pub fn plural<I, S>(source: impl Into<String>, forms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            source: source.into(),
            numerus: true,
            translation: Translation::plural(forms),
            ..Default::default()
        }
    }

    /// Disambiguation comment, with "absent" and "empty" treated alike.
    pub fn comment_text(&self) -> &str {
        self.comment.as_deref().unwrap_or("")
    }

    /// (source, comment) pair that must be unique within a context.
    pub fn key(&self) -> (&str, &str) {
        (self.source.as_str(), self.comment_text())
    }

    pub fn is_obsolete(&self) -> bool {
        self.status == Status::Obsolete
    }

    /// True when some form carries text, whatever the status.
    pub fn is_translated(&self) -> bool {
        !self.translation.is_empty()
    }
}

/// A named group of messages, usually the originating UI class
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Context {
    pub name: String,
    pub messages: Vec<Message>,
}

impl Context {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            messages: Vec::new(),
        }
    }

    pub fn with_message(mut self, message: Message) -> Self {
        self.messages.push(message);
        self
    }

    pub fn find(&self, source: &str, comment: &str) -> Option<&Message> {
        self.messages
            .iter()
            .find(|m| m.source == source && m.comment_text() == comment)
    }
}

/// One `.ts` file: all contexts for a single target language
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_codec: Option<String>,
    pub locations: LocationsMode,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extras: BTreeMap<String, String>,
    pub contexts: Vec<Context>,
}

impl Default for Catalog {
    fn default() -> Self {
        Self {
            version: DEFAULT_TS_VERSION.to_string(),
            language: None,
            source_language: None,
            default_codec: None,
            locations: LocationsMode::None,
            extras: BTreeMap::new(),
            contexts: Vec::new(),
        }
    }
}

impl Catalog {
    pub fn new(language: impl Into<String>) -> Self {
        Self {
            language: Some(language.into()),
            ..Default::default()
        }
    }

    pub fn with_context(mut self, context: Context) -> Self {
        self.contexts.push(context);
        self
    }

    pub fn context(&self, name: &str) -> Option<&Context> {
        self.contexts.iter().find(|c| c.name == name)
    }

    /// Context by name, appended at the end when missing.
    pub fn context_mut(&mut self, name: &str) -> &mut Context {
        let index = match self.contexts.iter().position(|c| c.name == name) {
            Some(index) => index,
            None => {
                self.contexts.push(Context::new(name));
                self.contexts.len() - 1
            }
        };
        &mut self.contexts[index]
    }

    /// Every message paired with the name of its context, in file order.
    pub fn messages(&self) -> impl Iterator<Item = (&str, &Message)> {
        self.contexts
            .iter()
            .flat_map(|c| c.messages.iter().map(move |m| (c.name.as_str(), m)))
    }

    pub fn message_count(&self) -> usize {
        self.contexts.iter().map(|c| c.messages.len()).sum()
    }

    pub fn find(&self, context: &str, source: &str, comment: &str) -> Option<&Message> {
        self.context(context).and_then(|c| c.find(source, comment))
    }

    /// Remove obsolete messages and any context left empty. Returns how many
    /// messages were dropped.
    pub fn drop_obsolete(&mut self) -> usize {
        let before = self.message_count();
        for context in &mut self.contexts {
            context.messages.retain(|m| !m.is_obsolete());
        }
        self.contexts.retain(|c| !c.messages.is_empty());
        before - self.message_count()
    }

    /// Language tag with Qt's "C" placeholder treated as absent.
    pub fn language_tag(&self) -> Option<&str> {
        self.language
            .as_deref()
            .filter(|tag| !tag.is_empty() && *tag != "C")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primary_variant_splits_on_separator() {
        let form = format!("Long text{}Short", VARIANT_SEPARATOR);
        assert_eq!(primary_variant(&form), "Long text");
        assert_eq!(primary_variant("plain"), "plain");
    }

    #[test]
    fn comment_absent_and_empty_share_a_key() {
        let a = Message::new("Open", "Öffnen");
        let b = Message::new("Open", "Öffnen").with_comment("");
        assert_eq!(a.key(), b.key());
    }

    #[test]
    fn drop_obsolete_prunes_empty_contexts() {
        let mut catalog = Catalog::new("de")
            .with_context(
                Context::new("Gone").with_message(
                    Message::new("Old", "Alt").with_status(Status::Obsolete),
                ),
            )
            .with_context(
                Context::new("Kept")
                    .with_message(Message::new("New", "Neu"))
                    .with_message(Message::new("Older", "Älter").with_status(Status::Obsolete)),
            );

        assert_eq!(catalog.drop_obsolete(), 2);
        assert_eq!(catalog.contexts.len(), 1);
        assert_eq!(catalog.message_count(), 1);
    }

    #[test]
    fn c_language_is_treated_as_absent() {
        let catalog = Catalog::new("C");
        assert_eq!(catalog.language_tag(), None);
    }

    #[test]
    fn vanished_reads_as_obsolete() {
        assert_eq!(Status::from_type_attr("vanished"), Some(Status::Obsolete));
        assert_eq!(Status::from_type_attr("finished"), None);
    }
}
