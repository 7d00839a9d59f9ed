// SPDX-License-Identifier: PMPL-1.0-or-later

//! Language tags as they appear in catalog headers and file names.
//!
//! Qt writes `language="de"`, `language="cs_CZ"` or occasionally
//! `language="pt-BR"`; file names follow `<app>_<tag>.ts`. A tag is split
//! into an ISO 639-1 language and an optional region so that plural rules
//! and catalog fallback (`pt_BR` to `pt`) can work on the parts.

mod iso639;

pub use iso639::{is_valid_iso639_1, language_name, native_name};

use serde::{Deserialize, Serialize};
use std::fmt;

/// A parsed `language[_REGION]` tag
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LanguageTag {
    pub language: String,
    pub region: Option<String>,
}

impl LanguageTag {
    /// Parse a tag, accepting `_` or `-` as separator and any case.
    ///
    /// Returns `None` for empty tags and Qt's `C` placeholder, and for
    /// language parts that are not alphabetic.
    ///
    /// ```
    /// use tscat::lang::LanguageTag;
    /// let tag = LanguageTag::parse("cs_CZ").unwrap();
    /// assert_eq!(tag.language, "cs");
    /// assert_eq!(tag.region.as_deref(), Some("CZ"));
    /// assert_eq!(LanguageTag::parse("C"), None);
    /// ```
    pub fn parse(tag: &str) -> Option<Self> {
        let tag = tag.trim();
        if tag.is_empty() || tag == "C" {
            return None;
        }
        // POSIX locales may carry a codeset or modifier: de_DE.UTF-8@euro
        let tag = tag.split(['.', '@']).next().unwrap_or(tag);
        let mut parts = tag.split(['_', '-']);
        let language = parts.next()?.to_ascii_lowercase();
        if language.is_empty() || !language.chars().all(|c| c.is_ascii_alphabetic()) {
            return None;
        }
        let region = parts
            .next()
            .filter(|r| !r.is_empty())
            .map(|r| r.to_ascii_uppercase());
        Some(Self { language, region })
    }

    /// Whether the language part is a known ISO 639-1 code.
    pub fn is_known(&self) -> bool {
        is_valid_iso639_1(&self.language)
    }

    /// The same tag without its region.
    pub fn without_region(&self) -> Self {
        Self {
            language: self.language.clone(),
            region: None,
        }
    }

    /// English display name, e.g. "Czech (CZ)".
    pub fn display_name(&self) -> String {
        let name = language_name(&self.language).unwrap_or(&self.language);
        match &self.region {
            Some(region) => format!("{} ({})", name, region),
            None => name.to_string(),
        }
    }
}

impl fmt::Display for LanguageTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.region {
            Some(region) => write!(f, "{}_{}", self.language, region),
            None => f.write_str(&self.language),
        }
    }
}
