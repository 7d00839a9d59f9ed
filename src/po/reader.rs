// SPDX-License-Identifier: PMPL-1.0-or-later

//! `.po` loader
//!
//! Line based, with one line of lookahead: comments and keywords collect
//! into an entry, and the `msgstr` lines close it. The entry with an empty
//! `msgid` is the header.

use crate::po::{header_extra, TEXT_VARIANT_SEPARATOR};
use crate::ts::{TsError, TsResult};
use crate::types::{Catalog, Location, Message, Status, Translation, VARIANT_SEPARATOR};
use encoding_rs::{Encoding, UTF_8};
use regex::bytes::Regex;
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::sync::OnceLock;

/// Headers the writer adds itself, in the order it adds them
const DEFAULT_HEADERS: [&str; 7] = [
    "MIME-Version",
    "Content-Type",
    "Content-Transfer-Encoding",
    "Plural-Forms",
    "X-Language",
    "X-Source-Language",
    "X-Qt-Contexts",
];

/// Load a PO file from disk.
pub fn load<P: AsRef<Path>>(path: P) -> TsResult<Catalog> {
    let path = path.as_ref();
    let bytes = fs::read(path)?;
    let catalog = from_bytes(&bytes)?;
    tracing::debug!(
        path = %path.display(),
        contexts = catalog.contexts.len(),
        messages = catalog.message_count(),
        "loaded PO catalog"
    );
    Ok(catalog)
}

/// Parse raw file content in the charset its header declares.
pub fn from_bytes(bytes: &[u8]) -> TsResult<Catalog> {
    let text = decode(bytes)?;
    from_str(&text)
}

fn decode(bytes: &[u8]) -> TsResult<Cow<'_, str>> {
    static CHARSET: OnceLock<Regex> = OnceLock::new();

    let pattern = CHARSET.get_or_init(|| {
        Regex::new(r"Content-Type:\s*text/plain;\s*charset=([A-Za-z0-9._:-]+)")
            .expect("charset pattern is valid")
    });
    let encoding = match pattern.captures(bytes) {
        Some(caps) => {
            let label = String::from_utf8_lossy(&caps[1]).into_owned();
            Encoding::for_label(label.as_bytes()).ok_or(TsError::UnknownEncoding(label))?
        }
        None => UTF_8,
    };
    let (text, _, had_errors) = encoding.decode(bytes);
    if had_errors {
        return Err(TsError::Decode {
            encoding: encoding.name().to_string(),
        });
    }
    Ok(text)
}

/// One entry while it is being collected
#[derive(Debug, Default)]
struct Entry {
    id: String,
    context: String,
    comment: String,
    old_comment: String,
    references: String,
    translator_comments: String,
    automatic_comments: String,
    msgid: String,
    old_msgid: String,
    msgstr: Vec<String>,
    plural: bool,
    fuzzy: bool,
    extras: BTreeMap<String, String>,
}

fn is_translation_line(line: &str) -> bool {
    line.starts_with("#~ msgstr") || line.starts_with("msgstr")
}

fn po_error(line: usize, message: impl Into<String>) -> TsError {
    TsError::Po {
        line: line + 1,
        message: message.into(),
    }
}

/// Parse an already decoded PO document.
pub fn from_str(text: &str) -> TsResult<Catalog> {
    let mut lines: Vec<&str> = text.lines().map(str::trim).collect();
    lines.push("");

    let mut catalog = Catalog::default();
    let mut entry = Entry::default();
    let mut last_comment_line = None;
    let mut qt_contexts = false;

    let mut l = 0;
    while l < lines.len() {
        let line = lines[l];
        if line.is_empty() {
            l += 1;
            continue;
        }

        if is_translation_line(line) {
            let obsolete = line.starts_with("#~ msgstr");
            let prefix = if obsolete { "#~ " } else { "" };
            loop {
                let offset = lines[l][prefix.len()..]
                    .find(' ')
                    .map(|i| i + prefix.len())
                    .ok_or_else(|| po_error(l, "msgstr without a string"))?;
                let text = slurp_string(&lines, &mut l, offset, prefix)?;
                entry.msgstr.push(text);
                if l + 1 >= lines.len() || !is_translation_line(lines[l + 1]) {
                    break;
                }
                l += 1;
            }

            let done = std::mem::take(&mut entry);
            if done.msgid.is_empty() && done.comment.is_empty() && done.context.is_empty() {
                read_header(&mut catalog, &done, &lines, last_comment_line, &mut qt_contexts)
                    .map_err(|message| po_error(l, message))?;
            } else {
                let (context, message) = build_message(done, obsolete);
                catalog.context_mut(&context).messages.push(message);
            }
        } else if line.starts_with('#') {
            read_comment(&mut entry, &lines, &mut l, qt_contexts)?;
            last_comment_line = Some(l);
        } else if line.starts_with("msgctxt ") {
            entry.comment = slurp_string(&lines, &mut l, 8, "")?;
            if qt_contexts {
                split_context(&mut entry.comment, &mut entry.context);
            }
        } else if line.starts_with("msgid ") {
            entry.msgid = slurp_string(&lines, &mut l, 6, "")?;
        } else if line.starts_with("msgid_plural ") {
            let plural = slurp_string(&lines, &mut l, 13, "")?;
            if plural != entry.msgid {
                entry.extras.insert("po-msgid_plural".to_string(), plural);
            }
            entry.plural = true;
        } else {
            return Err(po_error(l, format!("unexpected line '{}'", line)));
        }
        l += 1;
    }
    Ok(catalog)
}

fn read_comment(
    entry: &mut Entry,
    lines: &[&str],
    l: &mut usize,
    qt_contexts: bool,
) -> TsResult<()> {
    let line = lines[*l];
    match line.as_bytes().get(1) {
        Some(b':') => {
            entry.references.push_str(line.get(3..).unwrap_or(""));
            entry.references.push('\n');
        }
        Some(b',') => {
            let mut flags: Vec<&str> = line[2..]
                .split(|c: char| c == ',' || c == ' ')
                .filter(|f| !f.is_empty())
                .collect();
            if let Some(at) = flags.iter().position(|f| *f == "fuzzy") {
                flags.remove(at);
                entry.fuzzy = true;
            }
            if let Some(at) = flags.iter().position(|f| *f == "qt-format") {
                flags.remove(at);
            }
            let mut joined: Vec<String> =
                entry.extras.get("po-flags").cloned().into_iter().collect();
            joined.extend(flags.into_iter().map(str::to_string));
            if !joined.is_empty() {
                entry.extras.insert("po-flags".to_string(), joined.join(", "));
            }
        }
        None => entry.translator_comments.push('\n'),
        Some(b' ') => slurp_comment(&mut entry.translator_comments, lines, l),
        Some(b'.') => {
            if let Some(context) = line.strip_prefix("#. ts-context ") {
                entry.context = context.to_string();
            } else if let Some(id) = line.strip_prefix("#. ts-id ") {
                entry.id = id.to_string();
            } else {
                entry.automatic_comments.push_str(line.get(3..).unwrap_or(""));
                entry.automatic_comments.push('\n');
            }
        }
        Some(b'|') => {
            if line.starts_with("#| msgid ") {
                entry.old_msgid = slurp_string(lines, l, 9, "#| ")?;
            } else if line.starts_with("#| msgid_plural ") {
                let plural = slurp_string(lines, l, 16, "#| ")?;
                if plural != entry.old_msgid {
                    entry.extras.insert("po-old_msgid_plural".to_string(), plural);
                }
            } else if line.starts_with("#| msgctxt ") {
                entry.old_comment = slurp_string(lines, l, 11, "#| ")?;
                if qt_contexts {
                    split_context(&mut entry.old_comment, &mut entry.context);
                }
            } else {
                return Err(po_error(*l, format!("unexpected line '{}'", line)));
            }
        }
        Some(b'~') => {
            if line.starts_with("#~ msgid ") {
                entry.msgid = slurp_string(lines, l, 9, "#~ ")?;
            } else if line.starts_with("#~ msgid_plural ") {
                let plural = slurp_string(lines, l, 16, "#~ ")?;
                if plural != entry.msgid {
                    entry.extras.insert("po-msgid_plural".to_string(), plural);
                }
                entry.plural = true;
            } else if line.starts_with("#~ msgctxt ") {
                entry.comment = slurp_string(lines, l, 11, "#~ ")?;
                if qt_contexts {
                    split_context(&mut entry.comment, &mut entry.context);
                }
            } else {
                return Err(po_error(*l, format!("unexpected line '{}'", line)));
            }
        }
        Some(_) => return Err(po_error(*l, format!("unexpected line '{}'", line))),
    }
    Ok(())
}

/// Concatenated value of a quoted string and its continuation lines,
/// leaving `l` on the last line consumed.
fn slurp_string(lines: &[&str], l: &mut usize, offset: usize, prefix: &str) -> TsResult<String> {
    let start = *l;
    let mut offset = offset;
    let mut msg: Vec<u8> = Vec::new();
    while *l < lines.len() {
        let text = lines[*l];
        if text.is_empty() || !text.starts_with(prefix) {
            break;
        }
        let line = text.as_bytes();
        while line.get(offset).is_some_and(u8::is_ascii_whitespace) {
            offset += 1;
        }
        if line.get(offset) != Some(&b'"') {
            break;
        }
        offset += 1;

        loop {
            let c = *line
                .get(offset)
                .ok_or_else(|| po_error(*l, "premature end of line"))?;
            offset += 1;
            if c == b'"' {
                if offset == line.len() {
                    break;
                }
                while line.get(offset).is_some_and(u8::is_ascii_whitespace) {
                    offset += 1;
                }
                if line.get(offset) != Some(&b'"') {
                    return Err(po_error(*l, "extra characters after string"));
                }
                offset += 1;
                continue;
            }
            if c != b'\\' {
                msg.push(c);
                continue;
            }
            let escape = *line
                .get(offset)
                .ok_or_else(|| po_error(*l, "premature end of line"))?;
            offset += 1;
            match escape {
                b'r' => msg.push(b'\r'),
                b'n' => msg.push(b'\n'),
                b't' => msg.push(b'\t'),
                b'v' => msg.push(0x0b),
                b'a' => msg.push(0x07),
                b'b' => msg.push(0x08),
                b'f' => msg.push(0x0c),
                b'"' => msg.push(b'"'),
                b'\\' => msg.push(b'\\'),
                b'0'..=b'7' => {
                    let digits = offset - 1;
                    while line.get(offset).is_some_and(|c| (b'0'..=b'7').contains(c)) {
                        offset += 1;
                    }
                    msg.push(radix_byte(&line[digits..offset], 8));
                }
                b'x' => {
                    let digits = offset;
                    while line.get(offset).is_some_and(u8::is_ascii_hexdigit) {
                        offset += 1;
                    }
                    msg.push(radix_byte(&line[digits..offset], 16));
                }
                other => {
                    return Err(po_error(
                        *l,
                        format!("invalid escape '\\{}'", char::from(other)),
                    ))
                }
            }
        }
        offset = prefix.len();
        *l += 1;
    }
    if *l == start {
        return Err(po_error(start, "expected a quoted string"));
    }
    *l -= 1;
    Ok(String::from_utf8_lossy(&msg).into_owned())
}

/// Low byte of an octal or hex escape.
fn radix_byte(digits: &[u8], radix: u32) -> u8 {
    std::str::from_utf8(digits)
        .ok()
        .and_then(|d| u32::from_str_radix(d, radix).ok())
        .map_or(0, |value| (value & 0xff) as u8)
}

/// Translator comment lines sharing the first line's `# ` prefix; bare
/// `#` lines are empty comment lines.
fn slurp_comment(comment: &mut String, lines: &[&str], l: &mut usize) {
    let first = lines[*l];
    let width = first[1..]
        .find(|c: char| c != ' ')
        .map_or(first.len(), |p| p + 1);
    let prefix = &first[..width];
    while *l < lines.len() {
        let line = lines[*l];
        if let Some(rest) = line.strip_prefix(prefix) {
            comment.push_str(rest);
        } else if line != "#" {
            break;
        }
        comment.push('\n');
        *l += 1;
    }
    *l -= 1;
}

/// Split `context|comment`, honouring `~` escapes, at the last
/// unescaped `|`.
fn split_context(comment: &mut String, context: &mut String) {
    let mut unescaped = String::with_capacity(comment.len());
    let mut separator = None;
    let mut chars = comment.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '~' if chars.peek().is_some() => {
                if let Some(next) = chars.next() {
                    unescaped.push(next);
                }
                continue;
            }
            '|' => separator = Some(unescaped.len()),
            _ => {}
        }
        unescaped.push(c);
    }
    match separator {
        Some(at) => {
            *context = unescaped[..at].to_string();
            *comment = unescaped[at + 1..].to_string();
        }
        None => *comment = unescaped,
    }
}

/// Apply the header entry to the catalog. Errors are plain messages; the
/// caller adds the line.
fn read_header(
    catalog: &mut Catalog,
    entry: &Entry,
    lines: &[&str],
    last_comment_line: Option<usize>,
    qt_contexts: &mut bool,
) -> Result<(), String> {
    let mut extras = BTreeMap::new();
    let mut order: Vec<&str> = Vec::new();
    let mut plural_forms = None;

    let text = entry.msgstr.first().map(String::as_str).unwrap_or("");
    for header in text.split('\n').filter(|h| !h.is_empty()) {
        let (name, value) = header
            .split_once(':')
            .ok_or_else(|| format!("unexpected PO header format '{}'", header))?;
        let (name, value) = (name.trim(), value.trim());
        order.push(name);
        match name {
            "X-Language" => catalog.language = Some(value.to_string()).filter(|v| !v.is_empty()),
            "X-Source-Language" => {
                catalog.source_language = Some(value.to_string()).filter(|v| !v.is_empty())
            }
            "X-Qt-Contexts" => *qt_contexts = value == "true",
            "Plural-Forms" => plural_forms = Some(value),
            "MIME-Version" | "X-Virgin-Header" => {}
            "Content-Type" => {
                if !value.starts_with("text/plain; charset=") {
                    return Err(format!("unexpected Content-Type header '{}'", value));
                }
            }
            "Content-Transfer-Encoding" => {
                if value != "8bit" {
                    return Err(format!("unexpected Content-Transfer-Encoding '{}'", value));
                }
            }
            _ => {
                extras.insert(header_extra(name), value.to_string());
            }
        }
    }

    if let Some(plural_forms) = plural_forms.filter(|p| !p.is_empty()) {
        if catalog.language.is_none() {
            extras.insert(header_extra("Plural-Forms"), plural_forms.to_string());
        }
    }

    // Header order only needs keeping when it is not the one the writer
    // produces anyway
    let mut defaults = DEFAULT_HEADERS.iter();
    if !order.iter().all(|name| defaults.any(|d| d == name)) {
        extras.insert("po-headers".to_string(), order.join(","));
    }

    if let Some(last) = last_comment_line {
        extras.insert("po-header_comment".to_string(), lines[..=last].join("\n"));
    }

    catalog.extras.extend(extras);
    Ok(())
}

/// Trailing newline of accumulated comment lines removed.
fn comment_text(mut text: String) -> Option<String> {
    if text.ends_with('\n') {
        text.pop();
    }
    (!text.is_empty()).then_some(text)
}

fn build_message(entry: Entry, obsolete: bool) -> (String, Message) {
    let mut extras = entry.extras;
    let mut locations = Vec::new();
    let mut unparsed: Vec<&str> = Vec::new();
    for reference in entry.references.split_whitespace() {
        let parsed = reference
            .split_once(':')
            .filter(|(_, line)| !line.contains(':'))
            .and_then(|(file, line)| Some((file, line.parse::<i32>().ok()?)));
        match parsed {
            Some((file, line)) => locations.push(Location {
                file: Some(file.to_string()),
                line: Some(line),
            }),
            None => unparsed.push(reference),
        }
    }
    if !unparsed.is_empty() {
        extras.insert("po-references".to_string(), unparsed.join(" "));
    }

    let numerus = entry.plural || entry.msgstr.len() > 1;
    let forms: Vec<String> = entry
        .msgstr
        .iter()
        .map(|form| form.replace(TEXT_VARIANT_SEPARATOR, &VARIANT_SEPARATOR.to_string()))
        .collect();
    let translation = if numerus {
        Translation::plural(forms)
    } else {
        Translation::single(forms.into_iter().next().unwrap_or_default())
    };

    let mut message = Message {
        id: Some(entry.id).filter(|id| !id.is_empty()),
        source: entry.msgid,
        old_source: Some(entry.old_msgid).filter(|s| !s.is_empty()),
        comment: Some(entry.comment).filter(|c| !c.is_empty()),
        old_comment: Some(entry.old_comment).filter(|c| !c.is_empty()),
        extra_comment: comment_text(entry.automatic_comments),
        translator_comment: comment_text(entry.translator_comments),
        numerus,
        translation,
        locations,
        extras,
        ..Default::default()
    };
    message.status = if obsolete {
        Status::Obsolete
    } else if entry.fuzzy || (!message.source.is_empty() && !message.is_translated()) {
        Status::Unfinished
    } else {
        Status::Finished
    };
    (entry.context, message)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"# German translation
# Copyright holders
msgid ""
msgstr ""
"Project-Id-Version: demo\n"
"MIME-Version: 1.0\n"
"Content-Type: text/plain; charset=UTF-8\n"
"Content-Transfer-Encoding: 8bit\n"
"Plural-Forms: nplurals=2; plural=(n != 1);\n"
"X-Language: de\n"
"X-Qt-Contexts: true\n"

# check wording
#. shown in status bar
#: main.cpp:12 ui/form.ui
#, fuzzy, c-format
msgctxt "Main|"
msgid "%n file(s)"
msgid_plural "%n files"
msgstr[0] "%n Datei"
msgstr[1] "%n Dateien"

msgctxt "Main|menu ~| bar"
msgid ""
"Open "
"file"
msgstr "Datei öffnen"

#~ msgctxt "Main|"
#~ msgid "Old"
#~ msgstr "Alt"
"#;

    #[test]
    fn reads_header_and_entries() {
        let catalog = from_str(SAMPLE).expect("sample should parse");
        assert_eq!(catalog.language.as_deref(), Some("de"));
        assert_eq!(
            catalog.extras.get("po-headers").map(String::as_str),
            Some("Project-Id-Version,MIME-Version,Content-Type,Content-Transfer-Encoding,Plural-Forms,X-Language,X-Qt-Contexts")
        );
        assert_eq!(
            catalog.extras.get("po-header-project_id_version").map(String::as_str),
            Some("demo")
        );
        assert_eq!(
            catalog.extras.get("po-header_comment").map(String::as_str),
            Some("# German translation\n# Copyright holders")
        );
        assert!(!catalog.extras.contains_key("po-header-plural_forms"));

        let main = catalog.context("Main").expect("context should be split off");
        assert_eq!(main.messages.len(), 3);

        let files = &main.messages[0];
        assert!(files.numerus);
        assert_eq!(files.status, Status::Unfinished);
        assert_eq!(files.translation.forms, vec!["%n Datei", "%n Dateien"]);
        assert_eq!(files.translator_comment.as_deref(), Some("check wording"));
        assert_eq!(files.extra_comment.as_deref(), Some("shown in status bar"));
        assert_eq!(files.locations.len(), 1);
        assert_eq!(files.locations[0].line, Some(12));
        assert_eq!(files.extras.get("po-references").map(String::as_str), Some("ui/form.ui"));
        assert_eq!(files.extras.get("po-flags").map(String::as_str), Some("c-format"));
        assert_eq!(
            files.extras.get("po-msgid_plural").map(String::as_str),
            Some("%n files")
        );

        let open = &main.messages[1];
        assert_eq!(open.source, "Open file");
        assert_eq!(open.comment.as_deref(), Some("menu | bar"));
        assert_eq!(open.status, Status::Finished);

        assert!(main.messages[2].is_obsolete());
        assert_eq!(main.messages[2].translation.text(), "Alt");
    }

    #[test]
    fn default_header_order_is_not_recorded() {
        let text = "msgid \"\"\nmsgstr \"\"\n\"MIME-Version: 1.0\\n\"\n\"X-Language: ru\\n\"\n";
        let catalog = from_str(text).unwrap();
        assert_eq!(catalog.language.as_deref(), Some("ru"));
        assert!(catalog.extras.is_empty());
    }

    #[test]
    fn plural_forms_kept_without_language() {
        let text = "msgid \"\"\nmsgstr \"Plural-Forms: nplurals=3;\\n\"\n";
        let catalog = from_str(text).unwrap();
        assert_eq!(
            catalog.extras.get("po-header-plural_forms").map(String::as_str),
            Some("nplurals=3;")
        );
    }

    #[test]
    fn empty_msgid_with_context_is_a_message() {
        let text = "msgid \"\"\nmsgstr \"X-Qt-Contexts: true\\n\"\n\n\
                    # panel\nmsgctxt \"MainWindow|the main window\"\nmsgid \"\"\nmsgstr \"\"\n";
        let catalog = from_str(text).unwrap();
        assert!(!catalog.extras.contains_key("po-header_comment"));
        let message = &catalog.context("MainWindow").expect("context should exist").messages[0];
        assert_eq!(message.source, "");
        assert_eq!(message.comment.as_deref(), Some("the main window"));
        assert_eq!(message.translator_comment.as_deref(), Some("panel"));
    }

    #[test]
    fn escapes() {
        let text = "msgid \"a\\tb\\x41\\101\\\"\"\nmsgstr \"x\"\n";
        let catalog = from_str(text).unwrap();
        let message = &catalog.contexts[0].messages[0];
        assert_eq!(message.source, "a\tbAA\"");
    }

    #[test]
    fn untranslated_entries_are_unfinished() {
        let catalog = from_str("msgid \"Open\"\nmsgstr \"\"\n").unwrap();
        assert_eq!(catalog.contexts[0].name, "");
        assert_eq!(catalog.contexts[0].messages[0].status, Status::Unfinished);
    }

    #[test]
    fn contexts_split_at_last_bar() {
        let mut comment = "a~|b|c~~d|e".to_string();
        let mut context = String::new();
        split_context(&mut comment, &mut context);
        assert_eq!(context, "a|b|c~d");
        assert_eq!(comment, "e");

        let mut comment = "plain".to_string();
        let mut context = String::new();
        split_context(&mut comment, &mut context);
        assert_eq!((context.as_str(), comment.as_str()), ("", "plain"));
    }

    #[test]
    fn malformed_input_is_reported_with_line() {
        let err = from_str("msgid \"a\"\nbogus\n").unwrap_err();
        assert!(matches!(err, TsError::Po { line: 2, .. }));

        let err = from_str("msgid \"a\nmsgstr \"\"\n").unwrap_err();
        assert!(matches!(err, TsError::Po { line: 1, .. }));

        let err = from_str("msgid \"\"\nmsgstr \"Content-Transfer-Encoding: base64\\n\"\n").unwrap_err();
        assert!(matches!(err, TsError::Po { .. }));
    }

    #[test]
    fn declared_charset_is_honoured() {
        let mut bytes = b"msgid \"\"\nmsgstr \"Content-Type: text/plain; charset=ISO-8859-1\\n\"\n\nmsgid \"a\"\nmsgstr \"".to_vec();
        bytes.push(0xe4);
        bytes.extend_from_slice(b"\"\n");
        let catalog = from_bytes(&bytes).unwrap();
        assert_eq!(catalog.contexts[0].messages[0].translation.text(), "ä");
    }
}
