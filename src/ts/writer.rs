// SPDX-License-Identifier: PMPL-1.0-or-later

//! `.ts` writer
//!
//! Output follows lupdate's layout byte for byte where it matters to
//! translators diffing files: unindented contexts, four-space messages,
//! eight-space message children and twelve-space numerus forms.

use crate::ts::error::TsResult;
use crate::types::{Catalog, Context, LocationsMode, Message, VARIANT_SEPARATOR};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt::Write;
use std::fs;
use std::path::Path;

/// Knobs for [`to_string`] and [`save`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SaveOptions {
    /// Emit contexts sorted by name instead of file order
    pub sort_contexts: bool,
    /// Skip obsolete messages whose translation is empty
    pub drop_empty_obsolete: bool,
}

/// Write a catalog to disk.
pub fn save<P: AsRef<Path>>(catalog: &Catalog, path: P, options: &SaveOptions) -> TsResult<()> {
    let path = path.as_ref();
    fs::write(path, to_string(catalog, options))?;
    tracing::debug!(path = %path.display(), messages = catalog.message_count(), "saved catalog");
    Ok(())
}

/// Serialize a catalog to `.ts` text.
pub fn to_string(catalog: &Catalog, options: &SaveOptions) -> String {
    let mut out = String::new();
    out.push_str("<?xml version=\"1.0\" encoding=\"utf-8\"?>\n<!DOCTYPE TS>\n");
    let _ = write!(out, "<TS version=\"{}\"", protect_attr(&catalog.version));
    if let Some(language) = catalog.language.as_deref().filter(|l| !l.is_empty()) {
        let _ = write!(out, " language=\"{}\"", protect_attr(language));
    }
    if let Some(source) = catalog.source_language.as_deref().filter(|l| !l.is_empty()) {
        let _ = write!(out, " sourcelanguage=\"{}\"", protect_attr(source));
    }
    out.push_str(">\n");

    if let Some(codec) = &catalog.default_codec {
        let _ = writeln!(out, "<defaultcodec>{}</defaultcodec>", protect(codec));
    }
    write_extras(&mut out, "    ", &catalog.extras);

    let mut contexts: Vec<&Context> = catalog.contexts.iter().collect();
    if options.sort_contexts {
        contexts.sort_by(|a, b| a.name.cmp(&b.name));
    }

    let mut locations = LocationWriter::new(catalog.locations);
    for context in contexts {
        let messages: Vec<&Message> = context
            .messages
            .iter()
            .filter(|m| !(options.drop_empty_obsolete && m.is_obsolete() && !m.is_translated()))
            .collect();
        if messages.is_empty() && !context.messages.is_empty() {
            continue;
        }

        out.push_str("<context>\n");
        let _ = writeln!(out, "    <name>{}</name>", protect(&context.name));
        for message in messages {
            write_message(&mut out, message, &mut locations);
        }
        out.push_str("</context>\n");
    }

    out.push_str("</TS>\n");
    out
}

fn write_message(out: &mut String, message: &Message, locations: &mut LocationWriter) {
    out.push_str("    <message");
    if let Some(id) = &message.id {
        let _ = write!(out, " id=\"{}\"", protect_attr(id));
    }
    if message.numerus {
        out.push_str(" numerus=\"yes\"");
    }
    out.push_str(">\n");

    locations.write(out, message);

    let _ = writeln!(out, "        <source>{}</source>", protect(&message.source));
    write_optional(out, "oldsource", message.old_source.as_deref());
    write_optional(out, "comment", message.comment.as_deref());
    write_optional(out, "oldcomment", message.old_comment.as_deref());
    write_optional(out, "extracomment", message.extra_comment.as_deref());
    write_optional(out, "translatorcomment", message.translator_comment.as_deref());

    out.push_str("        <translation");
    if let Some(kind) = message.status.type_attr() {
        let _ = write!(out, " type=\"{}\"", kind);
    }
    if message.numerus {
        out.push('>');
        for form in &message.translation.forms {
            out.push_str("\n            <numerusform");
            write_variants(out, "            ", form);
            out.push_str("</numerusform>");
        }
        out.push_str("\n        ");
    } else {
        write_variants(out, "        ", message.translation.text());
    }
    out.push_str("</translation>\n");

    write_extras(out, "        ", &message.extras);
    write_optional(out, "userdata", message.user_data.as_deref());
    out.push_str("    </message>\n");
}

/// Leaf elements that Qt treats as present-or-absent. An empty comment is
/// written so that it reads back as present.
fn write_optional(out: &mut String, tag: &str, value: Option<&str>) {
    if let Some(value) = value {
        let _ = writeln!(out, "        <{tag}>{}</{tag}>", protect(value));
    }
}

fn write_extras(out: &mut String, indent: &str, extras: &BTreeMap<String, String>) {
    for (name, value) in extras {
        let _ = writeln!(
            out,
            "{indent}<extra-{name}>{}</extra-{name}>",
            protect(value)
        );
    }
}

/// Close the opening tag and write the text, splitting length variants.
fn write_variants(out: &mut String, indent: &str, text: &str) {
    if !text.contains(VARIANT_SEPARATOR) {
        out.push('>');
        out.push_str(&protect(text));
        return;
    }
    out.push_str(" variants=\"yes\">");
    for variant in text.split(VARIANT_SEPARATOR) {
        let _ = write!(
            out,
            "\n    {indent}<lengthvariant>{}</lengthvariant>",
            protect(variant)
        );
    }
    out.push('\n');
    out.push_str(indent);
}

/// Escape text for element content.
///
/// Control characters other than tab, CR and LF cannot appear in XML 1.0,
/// so they are written as Linguist's `<byte>` escape.
pub fn protect(text: &str) -> String {
    escape(text, |result, c| {
        let _ = write!(result, "<byte value=\"x{:x}\"/>", c as u32);
    })
}

/// Escape an attribute value. Elements cannot nest in attributes, so
/// control characters become character references; NUL is dropped.
pub fn protect_attr(text: &str) -> String {
    escape(text, |result, c| {
        if c != '\0' {
            let _ = write!(result, "&#x{:x};", c as u32);
        }
    })
}

fn escape(text: &str, control: impl Fn(&mut String, char)) -> String {
    let mut result = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '"' => result.push_str("&quot;"),
            '&' => result.push_str("&amp;"),
            '>' => result.push_str("&gt;"),
            '<' => result.push_str("&lt;"),
            '\'' => result.push_str("&apos;"),
            c if (c as u32) < 0x20 && !matches!(c, '\r' | '\n' | '\t') => control(&mut result, c),
            c => result.push(c),
        }
    }
    result
}

/// Tracks the running file/line state lupdate uses for relative locations.
struct LocationWriter {
    mode: LocationsMode,
    current_file: String,
    current_line: HashMap<String, i32>,
}

impl LocationWriter {
    fn new(mode: LocationsMode) -> Self {
        Self {
            mode,
            current_file: String::new(),
            current_line: HashMap::new(),
        }
    }

    fn write(&mut self, out: &mut String, message: &Message) {
        match self.mode {
            LocationsMode::None => {}
            LocationsMode::Absolute => {
                for location in &message.locations {
                    out.push_str("        <location");
                    if let Some(file) = location.file.as_deref().filter(|f| !f.is_empty()) {
                        let _ = write!(out, " filename=\"{}\"", protect_attr(file));
                    }
                    if let Some(line) = location.line {
                        let _ = write!(out, " line=\"{}\"", line);
                    }
                    out.push_str("/>\n");
                }
            }
            LocationsMode::Relative => {
                let mut message_file = self.current_file.clone();
                for (index, location) in message.locations.iter().enumerate() {
                    let file = location.file.clone().unwrap_or_default();
                    let mut delta = String::new();
                    if let Some(line) = location.line {
                        let previous = self.current_line.entry(file.clone()).or_insert(0);
                        let diff = line - *previous;
                        if diff >= 0 {
                            delta.push('+');
                        }
                        let _ = write!(delta, "{}", diff);
                        *previous = line;
                    }

                    let shown = if file != message_file {
                        if index == 0 {
                            self.current_file = file.clone();
                        }
                        message_file = file.clone();
                        file
                    } else {
                        String::new()
                    };

                    out.push_str("        <location");
                    if !shown.is_empty() {
                        let _ = write!(out, " filename=\"{}\"", protect_attr(&shown));
                    }
                    if !delta.is_empty() {
                        let _ = write!(out, " line=\"{}\"", delta);
                    }
                    out.push_str("/>\n");
                }
            }
        }
    }
}
