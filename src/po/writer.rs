// SPDX-License-Identifier: PMPL-1.0-or-later

//! `.po` writer

use crate::plural;
use crate::po::{header_extra, TEXT_VARIANT_SEPARATOR};
use crate::ts::TsResult;
use crate::types::{Catalog, Message, Status, Translation, VARIANT_SEPARATOR};
use std::fmt::Write;
use std::fs;
use std::path::Path;

/// Column string lines are wrapped at
const MAX_LEN: usize = 79;

/// Write a catalog to disk.
pub fn save<P: AsRef<Path>>(catalog: &Catalog, path: P, template: bool) -> TsResult<()> {
    let path = path.as_ref();
    let text = if template {
        to_template_string(catalog)
    } else {
        to_string(catalog)
    };
    fs::write(path, text)?;
    tracing::debug!(
        path = %path.display(),
        messages = catalog.message_count(),
        template,
        "saved PO catalog"
    );
    Ok(())
}

/// Serialize as a `.pot` template: every translation emptied, finished
/// messages turned unfinished.
pub fn to_template_string(catalog: &Catalog) -> String {
    let mut template = catalog.clone();
    for context in &mut template.contexts {
        for message in &mut context.messages {
            if message.status == Status::Finished {
                message.status = Status::Unfinished;
            }
            message.translation = Translation::single("");
        }
    }
    to_string(&template)
}

/// Serialize a catalog to `.po` text.
pub fn to_string(catalog: &Catalog) -> String {
    let qt_contexts = catalog.messages().any(|(context, _)| !context.is_empty());

    let mut out = String::new();
    if let Some(comment) = catalog.extras.get("po-header_comment").filter(|c| !c.is_empty()) {
        out.push_str(comment);
        out.push('\n');
    }
    out.push_str("msgid \"\"\n");

    let mut headers = catalog.extras.clone();
    let mut order: Vec<String> = catalog
        .extras
        .get("po-headers")
        .map(|h| h.split(',').filter(|n| !n.is_empty()).map(str::to_string).collect())
        .unwrap_or_default();
    let mut add = |name: &str, value: String| {
        if !order.iter().any(|n| n == name) {
            order.push(name.to_string());
        }
        headers.insert(header_extra(name), value);
    };
    add("MIME-Version", "1.0".to_string());
    add("Content-Type", "text/plain; charset=UTF-8".to_string());
    add("Content-Transfer-Encoding", "8bit".to_string());
    if let Some(language) = catalog.language_tag() {
        if let Some(rule) = plural::rule_for(language) {
            add("Plural-Forms", rule.gettext_header());
        }
        add("X-Language", language.to_string());
    }
    if let Some(source) = catalog.source_language.as_deref().filter(|l| !l.is_empty()) {
        add("X-Source-Language", source.to_string());
    }
    if qt_contexts {
        add("X-Qt-Contexts", "true".to_string());
    }

    let mut header = String::new();
    for name in &order {
        let value = headers.get(&header_extra(name)).map(String::as_str).unwrap_or("");
        let _ = writeln!(header, "{}: {}", name, value);
    }
    out.push_str(&escaped_string("", "msgstr", true, &header));

    for (context, message) in catalog.messages() {
        out.push('\n');
        write_message(&mut out, context, message, qt_contexts);
    }
    out
}

fn write_message(out: &mut String, context: &str, message: &Message, qt_contexts: bool) {
    if let Some(comment) = message.translator_comment.as_deref().filter(|c| !c.is_empty()) {
        out.push_str(&escaped_lines("#", comment));
    }
    if let Some(comment) = message.extra_comment.as_deref().filter(|c| !c.is_empty()) {
        out.push_str(&escaped_lines("#.", comment));
    }
    if let Some(id) = message.id.as_deref().filter(|id| !id.is_empty()) {
        let _ = writeln!(out, "#. ts-id {}", id);
    }

    let mut refs: Vec<String> = message
        .locations
        .iter()
        .filter_map(|location| {
            let file = location.file.as_deref()?;
            Some(match location.line {
                Some(line) => format!("{}:{}", file, line),
                None => file.to_string(),
            })
        })
        .collect();
    if let Some(extra) = message.extras.get("po-references").filter(|r| !r.is_empty()) {
        refs.push(extra.clone());
    }
    if !refs.is_empty() {
        out.push_str(&wrapped_lines("#:", &refs.join(" ")));
    }

    let mut no_wrap = false;
    let mut skip_format = false;
    let mut flags: Vec<&str> = Vec::new();
    if message.status == Status::Unfinished && message.is_translated() {
        flags.push("fuzzy");
    }
    if let Some(extra) = message.extras.get("po-flags") {
        let atoms: Vec<&str> = extra.split(", ").collect();
        skip_format = atoms.iter().any(|a| a.ends_with("-format"));
        no_wrap = atoms.contains(&"no-wrap");
        flags.push(extra);
    }
    if !skip_format && has_format_marker(&message.source) {
        flags.push("qt-format");
    }
    if !flags.is_empty() {
        let _ = writeln!(out, "#, {}", flags.join(", "));
    }

    let prefix = "#| ";
    if let Some(old) = message.old_comment.as_deref().filter(|c| !c.is_empty()) {
        out.push_str(&escaped_string(prefix, "msgctxt", no_wrap, &escape_comment(old, qt_contexts)));
    }
    if let Some(old) = message.old_source.as_deref().filter(|s| !s.is_empty()) {
        out.push_str(&escaped_string(prefix, "msgid", no_wrap, old));
    }
    if let Some(old) = message.extras.get("po-old_msgid_plural").filter(|p| !p.is_empty()) {
        out.push_str(&escaped_string(prefix, "msgid_plural", no_wrap, old));
    }

    let prefix = if message.is_obsolete() { "#~ " } else { "" };
    if !context.is_empty() {
        let value = format!(
            "{}|{}",
            escape_comment(context, true),
            escape_comment(message.comment_text(), true)
        );
        out.push_str(&escaped_string(prefix, "msgctxt", no_wrap, &value));
    } else if !message.comment_text().is_empty() {
        let value = escape_comment(message.comment_text(), qt_contexts);
        out.push_str(&escaped_string(prefix, "msgctxt", no_wrap, &value));
    }

    out.push_str(&escaped_string(prefix, "msgid", no_wrap, &message.source));
    if !message.numerus {
        let text = to_text_variants(message.translation.text());
        out.push_str(&escaped_string(prefix, "msgstr", no_wrap, &text));
    } else {
        let plural = message
            .extras
            .get("po-msgid_plural")
            .filter(|p| !p.is_empty())
            .unwrap_or(&message.source);
        out.push_str(&escaped_string(prefix, "msgid_plural", no_wrap, plural));
        for (i, form) in message.translation.forms.iter().enumerate() {
            let keyword = format!("msgstr[{}]", i);
            out.push_str(&escaped_string(prefix, &keyword, no_wrap, &to_text_variants(form)));
        }
    }
}

fn to_text_variants(text: &str) -> String {
    text.replace(VARIANT_SEPARATOR, &TEXT_VARIANT_SEPARATOR.to_string())
}

/// `%n` or `%1`-style markers suggest the string goes through `arg()`.
fn has_format_marker(source: &str) -> bool {
    source
        .split('%')
        .skip(1)
        .any(|rest| rest.starts_with(|c: char| c == 'n' || c.is_ascii_digit()))
}

fn escape_comment(text: &str, escape: bool) -> String {
    if escape {
        text.replace('~', "~~").replace('|', "~|")
    } else {
        text.to_string()
    }
}

/// A keyword and its quoted, escaped value, wrapped the way gettext tools
/// lay it out.
pub(crate) fn escaped_string(prefix: &str, keyword: &str, no_wrap: bool, text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();
    for (i, &c) in chars.iter().enumerate() {
        match c {
            '\n' => {
                current.push_str("\\n");
                lines.push(std::mem::take(&mut current));
            }
            '\r' => current.push_str("\\r"),
            '\t' => current.push_str("\\t"),
            '\u{b}' => current.push_str("\\v"),
            '\u{7}' => current.push_str("\\a"),
            '\u{8}' => current.push_str("\\b"),
            '\u{c}' => current.push_str("\\f"),
            '"' => current.push_str("\\\""),
            '\\' => current.push_str("\\\\"),
            c if (c as u32) < 32 => {
                let _ = write!(current, "\\x{:x}", c as u32);
                // Keep a following hex digit out of the escape
                if chars.get(i + 1).is_some_and(char::is_ascii_hexdigit) {
                    current.push_str("\"\"");
                }
            }
            c => current.push(c),
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }

    if !lines.is_empty() {
        let prefix_len = prefix.chars().count();
        if !no_wrap {
            let room = MAX_LEN.saturating_sub(keyword.chars().count() + prefix_len + 3);
            if lines.len() != 1 || lines[0].chars().count() > room {
                let original = std::mem::replace(&mut lines, vec![String::new()]);
                let max = MAX_LEN - prefix_len - 2;
                for line in original {
                    wrap_at_spaces(&line, max, &mut lines);
                }
            }
        } else if lines.len() > 1 {
            lines.insert(0, String::new());
        }
    }

    let separator = format!("\"\n{}\"", prefix);
    format!("{}{} \"{}\"\n", prefix, keyword, lines.join(&separator))
}

/// Break after the last space that keeps a piece within `max`, or after
/// the first space past it when a word is longer than that.
fn wrap_at_spaces(line: &str, max: usize, lines: &mut Vec<String>) {
    let chars: Vec<char> = line.chars().collect();
    let mut off = 0;
    while off + max < chars.len() {
        let mut end = chars[off..off + max]
            .iter()
            .rposition(|&c| c == ' ')
            .map_or(off, |p| off + p + 1);
        if end == off {
            match chars[off + max..].iter().position(|&c| c == ' ') {
                Some(p) => end = off + max + p + 1,
                None => break,
            }
        }
        lines.push(chars[off..end].iter().collect());
        off = end;
    }
    lines.push(chars[off..].iter().collect());
}

/// Comment lines, one per line of `text`.
fn escaped_lines(prefix: &str, text: &str) -> String {
    let text = text.strip_suffix('\n').unwrap_or(text);
    lines_with_prefix(prefix, text.split('\n'))
}

fn lines_with_prefix<'a>(prefix: &str, lines: impl Iterator<Item = &'a str>) -> String {
    let mut out = String::new();
    for line in lines {
        out.push_str(prefix);
        if !line.is_empty() {
            out.push(' ');
        }
        out.push_str(line);
        out.push('\n');
    }
    out
}

/// Reference comment, wrapped at spaces to fit the line.
fn wrapped_lines(prefix: &str, text: &str) -> String {
    let max = MAX_LEN - prefix.chars().count();
    let chars: Vec<char> = text.chars().collect();
    let mut pieces: Vec<String> = Vec::new();
    let mut off = 0;
    while off + max < chars.len() {
        let end = match chars[off..off + max].iter().rposition(|&c| c == ' ') {
            Some(p) => off + p,
            None => match chars[off + max..].iter().position(|&c| c == ' ') {
                Some(p) => off + max + p,
                None => break,
            },
        };
        pieces.push(chars[off..end].iter().collect());
        off = end + 1;
    }
    pieces.push(chars[off..].iter().collect());
    lines_with_prefix(prefix, pieces.iter().map(String::as_str))
}
