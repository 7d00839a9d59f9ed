// SPDX-License-Identifier: PMPL-1.0-or-later

//! `.ts` loader
//!
//! Walks the XML event stream the same way Linguist's own reader does:
//! structural elements may be separated by whitespace only, leaf elements
//! keep their text verbatim, and anything unknown is rejected with the line
//! it was found on.

use crate::ts::error::{TsError, TsResult};
use crate::types::{
    Catalog, Context, Location, LocationsMode, Message, Status, Translation, DEFAULT_TS_VERSION,
    VARIANT_SEPARATOR,
};
use encoding_rs::{Encoding, UTF_8};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use regex::Regex;
use std::borrow::Cow;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::OnceLock;

/// Load a catalog from disk.
pub fn load<P: AsRef<Path>>(path: P) -> TsResult<Catalog> {
    let path = path.as_ref();
    let bytes = fs::read(path)?;
    let catalog = from_bytes(&bytes)?;
    tracing::debug!(
        path = %path.display(),
        contexts = catalog.contexts.len(),
        messages = catalog.message_count(),
        "loaded catalog"
    );
    Ok(catalog)
}

/// Parse raw file content, honoring a BOM or the declared encoding.
pub fn from_bytes(bytes: &[u8]) -> TsResult<Catalog> {
    let text = decode(bytes)?;
    from_str(&text)
}

/// Parse an already decoded document.
pub fn from_str(text: &str) -> TsResult<Catalog> {
    TsReader::new(text).read()
}

fn decode(bytes: &[u8]) -> TsResult<Cow<'_, str>> {
    if let Some((encoding, bom_length)) = Encoding::for_bom(bytes) {
        return decode_with(encoding, &bytes[bom_length..]);
    }
    let encoding = match declared_encoding(bytes) {
        Some(label) => Encoding::for_label(label.as_bytes())
            .ok_or_else(|| TsError::UnknownEncoding(label.clone()))?,
        None => UTF_8,
    };
    decode_with(encoding, bytes)
}

fn decode_with<'b>(encoding: &'static Encoding, bytes: &'b [u8]) -> TsResult<Cow<'b, str>> {
    if encoding == UTF_8 {
        return std::str::from_utf8(bytes)
            .map(Cow::Borrowed)
            .map_err(|_| TsError::Decode {
                encoding: encoding.name().to_string(),
            });
    }
    let (text, had_errors) = encoding.decode_without_bom_handling(bytes);
    if had_errors {
        return Err(TsError::Decode {
            encoding: encoding.name().to_string(),
        });
    }
    Ok(text)
}

/// Encoding label from the XML declaration, if there is one.
fn declared_encoding(bytes: &[u8]) -> Option<String> {
    static ENCODING_ATTR: OnceLock<Regex> = OnceLock::new();

    let head = &bytes[..bytes.len().min(256)];
    if !head.starts_with(b"<?xml") {
        return None;
    }
    let end = head.windows(2).position(|w| w == b"?>")?;
    let decl = String::from_utf8_lossy(&head[..end]);
    let pattern = ENCODING_ATTR.get_or_init(|| {
        Regex::new(r#"encoding\s*=\s*["']([A-Za-z0-9._:-]+)["']"#)
            .expect("encoding pattern is valid")
    });
    pattern
        .captures(&decl)
        .map(|caps| caps[1].to_string())
}

/// Text of a `<byte value="..."/>` escape: decimal, or hex with an `x` prefix.
fn byte_value(value: &str) -> Option<char> {
    let code = match value.strip_prefix('x') {
        Some(hex) => u32::from_str_radix(hex, 16).ok()?,
        None => value.parse::<u32>().ok()?,
    };
    if code == 0 {
        return None;
    }
    char::from_u32(code)
}

fn is_whitespace(text: &str) -> bool {
    text.trim().is_empty()
}

fn element_name(element: &BytesStart<'_>) -> String {
    String::from_utf8_lossy(element.name().as_ref()).into_owned()
}

/// A message without `<translation>` carries one empty form, the same as
/// an empty `<translation/>`.
fn with_translation(mut message: Message) -> Message {
    if !message.numerus && message.translation.forms.is_empty() {
        message.translation = Translation::single("");
    }
    message
}

/// Event stream reduced to what the catalog grammar cares about.
enum Token<'a> {
    Start(BytesStart<'a>),
    Empty(BytesStart<'a>),
    End,
    Text(String),
    Eof,
}

struct TsReader<'a> {
    text: &'a str,
    reader: Reader<&'a [u8]>,
    current_file: String,
    current_line: HashMap<String, i32>,
    maybe_relative: bool,
    maybe_absolute: bool,
}

impl<'a> TsReader<'a> {
    fn new(text: &'a str) -> Self {
        let mut reader = Reader::from_str(text);
        reader.trim_text(false);
        reader.expand_empty_elements(false);
        Self {
            text,
            reader,
            current_file: String::new(),
            current_line: HashMap::new(),
            maybe_relative: false,
            maybe_absolute: false,
        }
    }

    fn line(&self) -> usize {
        let position = self.reader.buffer_position().min(self.text.len());
        self.text.as_bytes()[..position]
            .iter()
            .filter(|&&b| b == b'\n')
            .count()
            + 1
    }

    fn xml_error(&self, err: impl std::fmt::Display) -> TsError {
        TsError::Xml {
            line: self.line(),
            message: err.to_string(),
        }
    }

    fn unexpected(&self, element: &BytesStart<'_>) -> TsError {
        TsError::UnexpectedElement {
            element: element_name(element),
            line: self.line(),
        }
    }

    fn next_token(&mut self) -> TsResult<Token<'a>> {
        loop {
            let event = self.reader.read_event().map_err(|e| self.xml_error(e))?;
            let token = match event {
                Event::Start(e) => Token::Start(e),
                Event::Empty(e) => Token::Empty(e),
                Event::End(_) => Token::End,
                Event::Text(t) => {
                    let text = t.unescape().map_err(|e| self.xml_error(e))?;
                    Token::Text(text.into_owned())
                }
                Event::CData(c) => {
                    Token::Text(String::from_utf8_lossy(&c.into_inner()).into_owned())
                }
                Event::Eof => Token::Eof,
                Event::Decl(_) | Event::DocType(_) | Event::Comment(_) | Event::PI(_) => continue,
            };
            return Ok(token);
        }
    }

    fn attr(&self, element: &BytesStart<'_>, name: &str) -> TsResult<Option<String>> {
        for attr in element.attributes() {
            let attr = attr.map_err(|e| self.xml_error(e))?;
            if attr.key.as_ref() == name.as_bytes() {
                let value = attr.unescape_value().map_err(|e| self.xml_error(e))?;
                return Ok(Some(value.into_owned()));
            }
        }
        Ok(None)
    }

    fn read(mut self) -> TsResult<Catalog> {
        let mut catalog = None;
        loop {
            match self.next_token()? {
                Token::Start(e) if e.name().as_ref() == b"TS" => {
                    catalog = Some(self.read_ts(&e, false)?);
                }
                Token::Empty(e) if e.name().as_ref() == b"TS" => {
                    catalog = Some(self.read_ts(&e, true)?);
                }
                Token::Start(e) | Token::Empty(e) => return Err(self.unexpected(&e)),
                Token::Text(text) if is_whitespace(&text) => {}
                Token::Text(text) => return Err(TsError::unexpected_text(&text, self.line())),
                Token::End => {
                    return Err(TsError::Xml {
                        line: self.line(),
                        message: "unbalanced end tag".to_string(),
                    })
                }
                Token::Eof => break,
            }
        }
        catalog.ok_or(TsError::MissingRoot)
    }

    fn read_ts(&mut self, element: &BytesStart<'_>, empty: bool) -> TsResult<Catalog> {
        let mut catalog = Catalog {
            version: self
                .attr(element, "version")?
                .unwrap_or_else(|| DEFAULT_TS_VERSION.to_string()),
            language: self.attr(element, "language")?.filter(|l| !l.is_empty()),
            source_language: self.attr(element, "sourcelanguage")?.filter(|l| !l.is_empty()),
            ..Default::default()
        };
        if empty {
            return Ok(catalog);
        }

        loop {
            match self.next_token()? {
                Token::End => break,
                Token::Text(text) if is_whitespace(&text) => {}
                Token::Text(text) => return Err(TsError::unexpected_text(&text, self.line())),
                Token::Start(e) => match e.name().as_ref() {
                    b"context" => catalog.contexts.push(self.read_context()?),
                    b"defaultcodec" => {
                        let codec = self.read_contents("defaultcodec")?;
                        if !codec.is_empty() {
                            catalog.default_codec = Some(codec);
                        }
                    }
                    name if name.starts_with(b"extra-") => {
                        let tag = element_name(&e);
                        let value = self.read_contents(&tag)?;
                        catalog.extras.insert(tag[6..].to_string(), value);
                    }
                    _ => return Err(self.unexpected(&e)),
                },
                Token::Empty(e) => match e.name().as_ref() {
                    b"context" | b"defaultcodec" => {}
                    name if name.starts_with(b"extra-") => {
                        let tag = element_name(&e);
                        catalog.extras.insert(tag[6..].to_string(), String::new());
                    }
                    _ => return Err(self.unexpected(&e)),
                },
                Token::Eof => {
                    return Err(TsError::UnexpectedEof {
                        element: "TS".to_string(),
                    })
                }
            }
        }

        catalog.locations = if self.maybe_relative {
            LocationsMode::Relative
        } else if self.maybe_absolute {
            LocationsMode::Absolute
        } else {
            LocationsMode::None
        };
        Ok(catalog)
    }

    fn read_context(&mut self) -> TsResult<Context> {
        let mut context = Context::default();
        loop {
            match self.next_token()? {
                Token::End => break,
                Token::Text(text) if is_whitespace(&text) => {}
                Token::Text(text) => return Err(TsError::unexpected_text(&text, self.line())),
                Token::Start(e) => match e.name().as_ref() {
                    b"name" => context.name = self.read_contents("name")?,
                    b"message" => {
                        let message = self.read_message(&e, false)?;
                        context.messages.push(message);
                    }
                    _ => return Err(self.unexpected(&e)),
                },
                Token::Empty(e) => match e.name().as_ref() {
                    b"name" => context.name.clear(),
                    b"message" => {
                        let message = self.read_message(&e, true)?;
                        context.messages.push(message);
                    }
                    _ => return Err(self.unexpected(&e)),
                },
                Token::Eof => {
                    return Err(TsError::UnexpectedEof {
                        element: "context".to_string(),
                    })
                }
            }
        }
        Ok(context)
    }

    fn read_message(&mut self, element: &BytesStart<'_>, empty: bool) -> TsResult<Message> {
        let mut message = Message {
            id: self.attr(element, "id")?.filter(|id| !id.is_empty()),
            numerus: self.attr(element, "numerus")?.as_deref() == Some("yes"),
            ..Default::default()
        };
        if empty {
            return Ok(with_translation(message));
        }

        let mut current_msg_file = self.current_file.clone();
        loop {
            match self.next_token()? {
                Token::End => break,
                Token::Text(text) if is_whitespace(&text) => {}
                Token::Text(text) => return Err(TsError::unexpected_text(&text, self.line())),
                Token::Start(e) => match e.name().as_ref() {
                    b"source" => message.source = self.read_contents("source")?,
                    b"oldsource" => message.old_source = Some(self.read_contents("oldsource")?),
                    b"comment" => message.comment = Some(self.read_contents("comment")?),
                    b"oldcomment" => {
                        message.old_comment = Some(self.read_contents("oldcomment")?)
                    }
                    b"extracomment" => {
                        message.extra_comment = Some(self.read_contents("extracomment")?)
                    }
                    b"translatorcomment" => {
                        message.translator_comment =
                            Some(self.read_contents("translatorcomment")?)
                    }
                    b"userdata" => message.user_data = Some(self.read_contents("userdata")?),
                    b"location" => {
                        let location = self.read_location(&e, &mut current_msg_file, &message)?;
                        message.locations.extend(location);
                        self.read_contents("location")?;
                    }
                    b"translation" => self.read_translation(&e, false, &mut message)?,
                    name if name.starts_with(b"extra-") => {
                        let tag = element_name(&e);
                        let value = self.read_contents(&tag)?;
                        message.extras.insert(tag[6..].to_string(), value);
                    }
                    _ => return Err(self.unexpected(&e)),
                },
                Token::Empty(e) => match e.name().as_ref() {
                    b"location" => {
                        let location = self.read_location(&e, &mut current_msg_file, &message)?;
                        message.locations.extend(location);
                    }
                    b"translation" => self.read_translation(&e, true, &mut message)?,
                    b"source" => message.source.clear(),
                    b"comment" => message.comment = Some(String::new()),
                    b"oldsource" => message.old_source = Some(String::new()),
                    b"oldcomment" => message.old_comment = Some(String::new()),
                    b"extracomment" => message.extra_comment = Some(String::new()),
                    b"translatorcomment" => message.translator_comment = Some(String::new()),
                    b"userdata" => message.user_data = Some(String::new()),
                    name if name.starts_with(b"extra-") => {
                        let tag = element_name(&e);
                        message.extras.insert(tag[6..].to_string(), String::new());
                    }
                    _ => return Err(self.unexpected(&e)),
                },
                Token::Eof => {
                    return Err(TsError::UnexpectedEof {
                        element: "message".to_string(),
                    })
                }
            }
        }
        Ok(with_translation(message))
    }

    fn read_location(
        &mut self,
        element: &BytesStart<'_>,
        current_msg_file: &mut String,
        message: &Message,
    ) -> TsResult<Option<Location>> {
        self.maybe_absolute = true;

        let file = match self.attr(element, "filename")?.filter(|f| !f.is_empty()) {
            Some(file) => {
                if message.locations.is_empty() {
                    self.current_file = file.clone();
                }
                *current_msg_file = file.clone();
                file
            }
            None => {
                self.maybe_relative = true;
                current_msg_file.clone()
            }
        };

        // A line number that does not parse drops the reference
        let line = match self.attr(element, "line")?.filter(|l| !l.is_empty()) {
            None => None,
            Some(raw) => match raw.parse::<i32>() {
                Ok(value) if raw.starts_with('+') || raw.starts_with('-') => {
                    self.maybe_relative = true;
                    let current = self.current_line.entry(file.clone()).or_insert(0);
                    *current += value;
                    Some(*current)
                }
                Ok(value) => Some(value),
                Err(_) => return Ok(None),
            },
        };

        Ok(Some(Location {
            file: (!file.is_empty()).then_some(file),
            line,
        }))
    }

    fn read_translation(
        &mut self,
        element: &BytesStart<'_>,
        empty: bool,
        message: &mut Message,
    ) -> TsResult<()> {
        if let Some(kind) = self.attr(element, "type")? {
            if let Some(status) = Status::from_type_attr(&kind) {
                message.status = status;
            }
        }

        if empty {
            message.translation = if message.numerus {
                Translation::default()
            } else {
                Translation::single("")
            };
            return Ok(());
        }

        if !message.numerus {
            let text = self
                .read_trans_contents(element, "translation")
                .map_err(|err| match err {
                    TsError::UnexpectedElement { element: name, line } if name == "numerusform" => {
                        TsError::PluralMismatch {
                            source_text: message.source.clone(),
                            line,
                        }
                    }
                    other => other,
                })?;
            message.translation = Translation::single(text);
            return Ok(());
        }

        let mut forms = Vec::new();
        loop {
            match self.next_token()? {
                Token::End => break,
                Token::Text(text) if is_whitespace(&text) => {}
                Token::Text(text) => return Err(TsError::unexpected_text(&text, self.line())),
                Token::Start(e) if e.name().as_ref() == b"numerusform" => {
                    forms.push(self.read_trans_contents(&e, "numerusform")?);
                }
                Token::Empty(e) if e.name().as_ref() == b"numerusform" => forms.push(String::new()),
                Token::Start(e) | Token::Empty(e) => return Err(self.unexpected(&e)),
                Token::Eof => {
                    return Err(TsError::UnexpectedEof {
                        element: "translation".to_string(),
                    })
                }
            }
        }
        message.translation = Translation { forms };
        Ok(())
    }

    /// Content of a translation or numerus form, joining `<lengthvariant>`s.
    fn read_trans_contents(&mut self, element: &BytesStart<'_>, tag: &str) -> TsResult<String> {
        if self.attr(element, "variants")?.as_deref() != Some("yes") {
            return self.read_contents(tag);
        }

        let mut variants = Vec::new();
        loop {
            match self.next_token()? {
                Token::End => break,
                Token::Text(text) if is_whitespace(&text) => {}
                Token::Text(text) => return Err(TsError::unexpected_text(&text, self.line())),
                Token::Start(e) if e.name().as_ref() == b"lengthvariant" => {
                    variants.push(self.read_contents("lengthvariant")?);
                }
                Token::Empty(e) if e.name().as_ref() == b"lengthvariant" => {
                    variants.push(String::new())
                }
                Token::Start(e) | Token::Empty(e) => return Err(self.unexpected(&e)),
                Token::Eof => {
                    return Err(TsError::UnexpectedEof {
                        element: tag.to_string(),
                    })
                }
            }
        }
        let mut separator = [0u8; 4];
        Ok(variants.join(&*VARIANT_SEPARATOR.encode_utf8(&mut separator)))
    }

    /// Text of a leaf element, expanding `<byte value=".."/>` escapes.
    fn read_contents(&mut self, tag: &str) -> TsResult<String> {
        let mut result = String::new();
        loop {
            match self.next_token()? {
                Token::End => break,
                Token::Text(text) => result.push_str(&text),
                Token::Empty(e) if e.name().as_ref() == b"byte" => {
                    if let Some(value) = self.attr(&e, "value")? {
                        result.extend(byte_value(&value));
                    }
                }
                Token::Start(e) if e.name().as_ref() == b"byte" => {
                    if let Some(value) = self.attr(&e, "value")? {
                        result.extend(byte_value(&value));
                    }
                    match self.next_token()? {
                        Token::End => {}
                        Token::Start(inner) | Token::Empty(inner) => {
                            return Err(self.unexpected(&inner))
                        }
                        Token::Text(text) => {
                            return Err(TsError::unexpected_text(&text, self.line()))
                        }
                        Token::Eof => {
                            return Err(TsError::UnexpectedEof {
                                element: "byte".to_string(),
                            })
                        }
                    }
                }
                Token::Start(e) | Token::Empty(e) => return Err(self.unexpected(&e)),
                Token::Eof => {
                    return Err(TsError::UnexpectedEof {
                        element: tag.to_string(),
                    })
                }
            }
        }
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<!DOCTYPE TS>
<TS version="2.1" language="pl" sourcelanguage="en">
<context>
    <name>MainWindow</name>
    <message>
        <location filename="../mainwindow.cpp" line="120"/>
        <location line="+7"/>
        <source>&amp;Open...</source>
        <comment>menu</comment>
        <translation>&amp;Otwórz...</translation>
    </message>
    <message numerus="yes">
        <source>%n file(s)</source>
        <extracomment>status bar</extracomment>
        <translation type="unfinished">
            <numerusform>%n plik</numerusform>
            <numerusform>%n pliki</numerusform>
            <numerusform>%n plików</numerusform>
        </translation>
    </message>
    <message>
        <source>Tab<byte value="x9"/>stop</source>
        <translation variants="yes">
            <lengthvariant>Tabulator</lengthvariant>
            <lengthvariant>Tab</lengthvariant>
        </translation>
    </message>
</context>
</TS>
"#;

    #[test]
    fn reads_header_attributes() {
        let catalog = from_str(SAMPLE).unwrap();
        assert_eq!(catalog.version, "2.1");
        assert_eq!(catalog.language.as_deref(), Some("pl"));
        assert_eq!(catalog.source_language.as_deref(), Some("en"));
        assert_eq!(catalog.contexts.len(), 1);
        assert_eq!(catalog.contexts[0].name, "MainWindow");
    }

    #[test]
    fn resolves_relative_locations() {
        let catalog = from_str(SAMPLE).unwrap();
        let message = &catalog.contexts[0].messages[0];
        assert_eq!(catalog.locations, LocationsMode::Relative);
        assert_eq!(message.locations.len(), 2);
        assert_eq!(message.locations[0].line, Some(120));
        assert_eq!(message.locations[1].file.as_deref(), Some("../mainwindow.cpp"));
        assert_eq!(message.locations[1].line, Some(7));
    }

    #[test]
    fn unescapes_entities_and_keeps_comment() {
        let catalog = from_str(SAMPLE).unwrap();
        let message = &catalog.contexts[0].messages[0];
        assert_eq!(message.source, "&Open...");
        assert_eq!(message.comment.as_deref(), Some("menu"));
        assert_eq!(message.translation.text(), "&Otwórz...");
        assert_eq!(message.status, Status::Finished);
    }

    #[test]
    fn reads_numerus_forms() {
        let catalog = from_str(SAMPLE).unwrap();
        let message = &catalog.contexts[0].messages[1];
        assert!(message.numerus);
        assert_eq!(message.status, Status::Unfinished);
        assert_eq!(message.translation.forms.len(), 3);
        assert_eq!(message.translation.forms[2], "%n plików");
        assert_eq!(message.extra_comment.as_deref(), Some("status bar"));
    }

    #[test]
    fn expands_byte_escapes_and_length_variants() {
        let catalog = from_str(SAMPLE).unwrap();
        let message = &catalog.contexts[0].messages[2];
        assert_eq!(message.source, "Tab\tstop");
        assert_eq!(
            message.translation.text(),
            format!("Tabulator{}Tab", VARIANT_SEPARATOR)
        );
    }

    #[test]
    fn empty_translation_element_is_empty_form() {
        let doc = r#"<TS version="2.0" language="de"><context><name>A</name>
<message><source>x</source><translation type="unfinished"/></message>
</context></TS>"#;
        let catalog = from_str(doc).unwrap();
        let message = &catalog.contexts[0].messages[0];
        assert_eq!(message.translation.forms, vec![String::new()]);
        assert_eq!(message.status, Status::Unfinished);
    }

    #[test]
    fn missing_translation_element_reads_like_an_empty_one() {
        let doc = r#"<TS version="2.1" language="de"><context><name>A</name>
<message><source>x</source></message>
<message/>
</context></TS>"#;
        let catalog = from_str(doc).unwrap();
        for message in &catalog.contexts[0].messages {
            assert_eq!(message.translation.forms, vec![String::new()]);
        }

        let written = crate::ts::writer::to_string(&catalog, &Default::default());
        assert_eq!(from_str(&written).unwrap(), catalog);
    }

    #[test]
    fn empty_language_attributes_are_absent() {
        let doc = r#"<TS version="2.1" language="" sourcelanguage=""></TS>"#;
        let catalog = from_str(doc).unwrap();
        assert_eq!(catalog.language, None);
        assert_eq!(catalog.source_language, None);

        let written = crate::ts::writer::to_string(&catalog, &Default::default());
        assert_eq!(from_str(&written).unwrap(), catalog);
    }

    #[test]
    fn unparsable_line_drops_the_location() {
        let doc = r#"<TS version="2.1"><context><name>A</name><message>
<location filename="a.cpp" line="12"/>
<location filename="a.cpp" line="twelve"/>
<source>x</source><translation>y</translation>
</message></context></TS>"#;
        let catalog = from_str(doc).unwrap();
        let locations = &catalog.contexts[0].messages[0].locations;
        assert_eq!(locations.len(), 1);
        assert_eq!(locations[0].line, Some(12));
    }

    #[test]
    fn rejects_unknown_elements() {
        let doc = r#"<TS version="2.0"><context><name>A</name><bogus/></context></TS>"#;
        match from_str(doc) {
            Err(TsError::UnexpectedElement { element, .. }) => assert_eq!(element, "bogus"),
            other => panic!("expected UnexpectedElement, got {:?}", other),
        }
    }

    #[test]
    fn rejects_stray_text() {
        let doc = r#"<TS version="2.0"><context>stray text here</context></TS>"#;
        assert!(matches!(from_str(doc), Err(TsError::UnexpectedText { .. })));
    }

    #[test]
    fn rejects_malformed_xml() {
        let doc = "<TS version=\"2.0\"><context><name>A</name></TS>";
        assert!(from_str(doc).is_err());
    }

    #[test]
    fn rejects_missing_root() {
        assert!(matches!(from_str("  "), Err(TsError::MissingRoot)));
    }

    #[test]
    fn numerus_forms_on_plain_message_are_rejected() {
        let doc = r#"<TS version="2.0"><context><name>A</name><message>
<source>%n items</source>
<translation><numerusform>one</numerusform></translation>
</message></context></TS>"#;
        match from_str(doc) {
            Err(TsError::PluralMismatch { source_text, .. }) => assert_eq!(source_text, "%n items"),
            other => panic!("expected PluralMismatch, got {:?}", other),
        }
    }

    #[test]
    fn decodes_declared_latin1() {
        let mut bytes = b"<?xml version=\"1.0\" encoding=\"ISO-8859-1\"?>\n<TS version=\"1.1\" language=\"de\"><context><name>A</name><message><source>Close</source><translation>Schlie".to_vec();
        bytes.push(0xdf);
        bytes.extend_from_slice(b"en</translation></message></context></TS>");
        let catalog = from_bytes(&bytes).unwrap();
        assert_eq!(catalog.contexts[0].messages[0].translation.text(), "Schließen");
    }

    #[test]
    fn rejects_invalid_utf8() {
        let bytes = b"<TS version=\"2.0\"><context><name>\xff</name></context></TS>";
        assert!(matches!(from_bytes(bytes), Err(TsError::Decode { .. })));
    }

    #[test]
    fn byte_values_parse_hex_and_decimal() {
        assert_eq!(byte_value("x9"), Some('\t'));
        assert_eq!(byte_value("10"), Some('\n'));
        assert_eq!(byte_value("0"), None);
        assert_eq!(byte_value("zz"), None);
    }
}
