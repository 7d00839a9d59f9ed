// SPDX-License-Identifier: PMPL-1.0-or-later

//! Compiled `.qm` translations
//!
//! [`release`] produces the binary file a running Qt application loads
//! through `QTranslator`, the way lrelease does it: obsolete and
//! untranslated messages stay out, the rest are sorted by (context,
//! source, comment) and indexed by hash, and the catalog's plural rule is
//! compiled into the file. [`from_bytes`] reads such a file back into a
//! [`Catalog`]; only what the binary keeps survives.

use crate::plural;
use crate::ts::{TsError, TsResult};
use crate::types::{Catalog, Message, Status, Translation};
use encoding_rs::{UTF_8, WINDOWS_1252};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::fs;
use std::path::Path;

const MAGIC: [u8; 16] = [
    0x3c, 0xb8, 0x64, 0x18, 0xca, 0xef, 0x9c, 0x95, 0xcd, 0x21, 0x1c, 0xbf, 0x60, 0xa1, 0xbd,
    0xdd,
];

const BLOCK_CONTEXTS: u8 = 0x2f;
const BLOCK_HASHES: u8 = 0x42;
const BLOCK_MESSAGES: u8 = 0x69;
const BLOCK_NUMERUS_RULES: u8 = 0x88;

const TAG_END: u8 = 1;
const TAG_TRANSLATION: u8 = 3;
const TAG_OBSOLETE1: u8 = 5;
const TAG_SOURCE_TEXT: u8 = 6;
const TAG_CONTEXT: u8 = 7;
const TAG_COMMENT: u8 = 8;

/// Context pools past this size cannot be addressed by 16-bit offsets.
const MAX_CONTEXT_POOL: usize = 131_072;

/// Knobs for [`release`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReleaseOptions {
    /// Shorten messages where the hash alone identifies them and add a
    /// context table
    pub compress: bool,
    /// Leave unfinished translations out
    pub ignore_unfinished: bool,
    /// Fill empty unfinished translations with this prefix and the source
    pub untranslated_prefix: Option<String>,
    /// Key messages by their id instead of context and source
    pub id_based: bool,
}

/// What [`release`] did with each message
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseSummary {
    pub finished: usize,
    pub unfinished: usize,
    /// Unfinished with no text, left out
    pub untranslated: usize,
    /// Skipped in id based mode for lack of an id
    pub missing_ids: usize,
    /// Context or comment discarded in id based mode
    pub dropped_data: usize,
}

impl ReleaseSummary {
    /// Messages that made it into the file.
    pub fn generated(&self) -> usize {
        self.finished + self.unfinished
    }
}

/// Level of agreement between neighbouring messages in sorted order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Prefix {
    None,
    Hash,
    HashContext,
    HashContextSource,
    HashContextSourceComment,
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct Key {
    context: Vec<u8>,
    source: Vec<u8>,
    comment: Vec<u8>,
}

impl Key {
    fn new(context: &str, source: &str, comment: &str) -> Self {
        Self {
            context: context.as_bytes().to_vec(),
            source: source.as_bytes().to_vec(),
            comment: comment.as_bytes().to_vec(),
        }
    }

    fn hash(&self) -> u32 {
        let mut text = self.source.clone();
        text.extend_from_slice(&self.comment);
        elf_hash(&text)
    }

    fn common_prefix(&self, other: &Key) -> Prefix {
        if self.hash() != other.hash() {
            Prefix::None
        } else if self.context != other.context {
            Prefix::Hash
        } else if self.source != other.source {
            Prefix::HashContext
        } else if self.comment != other.comment {
            Prefix::HashContextSource
        } else {
            Prefix::HashContextSourceComment
        }
    }
}

/// The hash QTranslator looks messages up by. Reading stops at a NUL byte
/// and a zero result is bumped to one.
fn elf_hash(bytes: &[u8]) -> u32 {
    let mut h: u32 = 0;
    for &b in bytes.iter().take_while(|&&b| b != 0) {
        h = (h << 4).wrapping_add(u32::from(b));
        let g = h & 0xf000_0000;
        if g != 0 {
            h ^= g >> 24;
        }
        h &= !g;
    }
    if h == 0 {
        1
    } else {
        h
    }
}

/// Compile a catalog to `.qm` bytes.
pub fn release(catalog: &Catalog, options: &ReleaseOptions) -> (Vec<u8>, ReleaseSummary) {
    let mut summary = ReleaseSummary::default();
    let prefix = options
        .untranslated_prefix
        .as_deref()
        .filter(|p| !p.is_empty());

    let bare: HashSet<(&str, &str)> = catalog
        .messages()
        .filter(|(_, m)| m.comment_text().is_empty())
        .map(|(context, m)| (context, m.source.as_str()))
        .collect();

    let mut messages: BTreeMap<Key, Vec<String>> = BTreeMap::new();
    for (context, message) in catalog.messages() {
        if message.is_obsolete() {
            continue;
        }
        let id = message.id.as_deref().filter(|id| !id.is_empty());
        if options.id_based && id.is_none() {
            summary.missing_ids += 1;
            continue;
        }
        if message.status == Status::Unfinished {
            if message.translation.text().is_empty() && !options.id_based && prefix.is_none() {
                summary.untranslated += 1;
                continue;
            }
            if options.ignore_unfinished {
                continue;
            }
            summary.unfinished += 1;
        } else {
            summary.finished += 1;
        }

        let mut forms = message.translation.forms.clone();
        if message.status == Status::Unfinished && (options.id_based || prefix.is_some()) {
            for form in forms.iter_mut().filter(|f| f.is_empty()) {
                *form = format!("{}{}", prefix.unwrap_or(""), message.source);
            }
        }

        if let Some(id) = id.filter(|_| options.id_based) {
            if !context.is_empty() || !message.comment_text().is_empty() {
                summary.dropped_data += 1;
            }
            messages.entry(Key::new("", id, "")).or_insert(forms);
            continue;
        }

        let comment = message.comment_text();
        let keep_comment = comment.is_empty()
            || context.is_empty()
            || bare.contains(&(context, message.source.as_str()));
        if !keep_comment {
            let stripped = Key::new(context, &message.source, "");
            if !messages.contains_key(&stripped) {
                messages.insert(stripped, forms);
                continue;
            }
        }
        messages
            .entry(Key::new(context, &message.source, comment))
            .or_insert(forms);
    }

    if summary.missing_ids > 0 {
        tracing::warn!(count = summary.missing_ids, "dropped messages which had no id");
    }
    if summary.dropped_data > 0 {
        tracing::warn!(
            count = summary.dropped_data,
            "excess context or disambiguation dropped"
        );
    }

    let rules = catalog
        .language_tag()
        .and_then(plural::rule_for)
        .map(|rule| rule.qm_rules())
        .unwrap_or_default();

    let mut out = MAGIC.to_vec();
    if !(messages.is_empty() && !options.compress) {
        let (hashes, bodies) = squeeze_messages(&messages, options.compress);
        write_block(&mut out, BLOCK_HASHES, &hashes);
        write_block(&mut out, BLOCK_MESSAGES, &bodies);
        if options.compress {
            write_block(&mut out, BLOCK_CONTEXTS, &context_table(&messages));
        }
    }
    write_block(&mut out, BLOCK_NUMERUS_RULES, &rules);
    (out, summary)
}

/// Compile a catalog and write the result to disk.
pub fn save<P: AsRef<Path>>(
    catalog: &Catalog,
    path: P,
    options: &ReleaseOptions,
) -> TsResult<ReleaseSummary> {
    let path = path.as_ref();
    let (bytes, summary) = release(catalog, options);
    fs::write(path, bytes)?;
    tracing::debug!(
        path = %path.display(),
        finished = summary.finished,
        unfinished = summary.unfinished,
        "released catalog"
    );
    Ok(summary)
}

fn write_block(out: &mut Vec<u8>, tag: u8, data: &[u8]) {
    if data.is_empty() {
        return;
    }
    out.push(tag);
    put_u32(out, data.len() as u32);
    out.extend_from_slice(data);
}

fn put_u32(out: &mut Vec<u8>, value: u32) {
    out.extend_from_slice(&value.to_be_bytes());
}

fn put_bytes(out: &mut Vec<u8>, tag: u8, bytes: &[u8]) {
    out.push(tag);
    put_u32(out, bytes.len() as u32);
    out.extend_from_slice(bytes);
}

/// Hash table and message bodies, in that order.
fn squeeze_messages(messages: &BTreeMap<Key, Vec<String>>, stripped: bool) -> (Vec<u8>, Vec<u8>) {
    let keys: Vec<&Key> = messages.keys().collect();
    let mut offsets: Vec<(u32, u32)> = Vec::with_capacity(keys.len());
    let mut bodies = Vec::new();

    let mut next_prefix = Prefix::None;
    for (i, (key, forms)) in messages.iter().enumerate() {
        let previous_prefix = next_prefix;
        next_prefix = keys
            .get(i + 1)
            .map_or(Prefix::None, |next| key.common_prefix(next));
        offsets.push((key.hash(), bodies.len() as u32));

        let prefix = if stripped {
            previous_prefix.max(one_more(next_prefix))
        } else {
            Prefix::HashContextSourceComment
        };
        write_message(&mut bodies, key, forms, prefix);
    }

    offsets.sort_unstable();
    let mut hashes = Vec::with_capacity(offsets.len() * 8);
    for (hash, offset) in offsets {
        put_u32(&mut hashes, hash);
        put_u32(&mut hashes, offset);
    }
    (hashes, bodies)
}

fn one_more(prefix: Prefix) -> Prefix {
    match prefix {
        Prefix::None => Prefix::Hash,
        Prefix::Hash => Prefix::HashContext,
        Prefix::HashContext => Prefix::HashContextSource,
        _ => Prefix::HashContextSourceComment,
    }
}

fn write_message(out: &mut Vec<u8>, key: &Key, forms: &[String], prefix: Prefix) {
    for form in forms {
        let units: Vec<u16> = form.encode_utf16().collect();
        out.push(TAG_TRANSLATION);
        put_u32(out, (units.len() * 2) as u32);
        for unit in units {
            out.extend_from_slice(&unit.to_be_bytes());
        }
    }
    match prefix {
        Prefix::HashContextSource => {
            put_bytes(out, TAG_SOURCE_TEXT, &key.source);
            put_bytes(out, TAG_CONTEXT, &key.context);
        }
        Prefix::HashContext => put_bytes(out, TAG_CONTEXT, &key.context),
        _ => {
            put_bytes(out, TAG_COMMENT, &key.comment);
            put_bytes(out, TAG_SOURCE_TEXT, &key.source);
            put_bytes(out, TAG_CONTEXT, &key.context);
        }
    }
    out.push(TAG_END);
}

/// Hash table of context names, so a stripped file can answer "does this
/// translator know context X" without scanning messages.
///
/// Layout: table size, one 16-bit pool offset (in words) per bucket, then
/// the pool of length-prefixed names. Every bucket run starts on an even
/// byte.
fn context_table(messages: &BTreeMap<Key, Vec<String>>) -> Vec<u8> {
    let contexts: BTreeSet<&[u8]> = messages.keys().map(|k| k.context.as_slice()).collect();
    let size: u16 = match contexts.len() {
        n if n < 60 => 151,
        n if n < 200 => 503,
        n if n < 750 => 1511,
        n if n < 2500 => 5003,
        n if n < 10_000 => 15013,
        n => u16::try_from(3 * n / 2).unwrap_or(u16::MAX),
    };

    let mut buckets: BTreeMap<u16, Vec<&[u8]>> = BTreeMap::new();
    for context in contexts {
        let bucket = (elf_hash(context) % u32::from(size)) as u16;
        buckets.entry(bucket).or_default().push(context);
    }

    let mut table = vec![0u16; usize::from(size)];
    let mut pool: Vec<u8> = vec![0, 0];
    for (bucket, names) in &buckets {
        table[usize::from(*bucket)] = (pool.len() >> 1) as u16;
        // Later insertions come first within a bucket
        for name in names.iter().rev() {
            let len = name.len().min(255);
            pool.push(len as u8);
            pool.extend_from_slice(&name[..len]);
        }
        if pool.len() % 2 == 1 {
            pool.push(0);
        }
    }

    if pool.len() > MAX_CONTEXT_POOL {
        tracing::warn!(contexts = buckets.len(), "too many contexts, context table dropped");
        return Vec::new();
    }

    let mut out = Vec::with_capacity(2 + table.len() * 2 + pool.len());
    out.extend_from_slice(&size.to_be_bytes());
    for entry in table {
        out.extend_from_slice(&entry.to_be_bytes());
    }
    out.extend_from_slice(&pool);
    out
}

/// Load a compiled file from disk.
pub fn load<P: AsRef<Path>>(path: P) -> TsResult<Catalog> {
    let path = path.as_ref();
    let bytes = fs::read(path)?;
    let catalog = from_bytes(&bytes)?;
    tracing::debug!(
        path = %path.display(),
        messages = catalog.message_count(),
        "loaded compiled catalog"
    );
    Ok(catalog)
}

/// Bounds checked cursor over one block
struct Cursor<'a> {
    data: &'a [u8],
    pos: usize,
    base: usize,
}

impl<'a> Cursor<'a> {
    fn new(data: &'a [u8], pos: usize, base: usize) -> Self {
        Self { data, pos, base }
    }

    fn error(&self, message: &str) -> TsError {
        TsError::Qm {
            offset: self.base + self.pos,
            message: message.to_string(),
        }
    }

    fn take(&mut self, len: usize) -> TsResult<&'a [u8]> {
        let end = self
            .pos
            .checked_add(len)
            .filter(|&end| end <= self.data.len())
            .ok_or_else(|| self.error("unexpected end of data"))?;
        let data = self.data;
        let slice = &data[self.pos..end];
        self.pos = end;
        Ok(slice)
    }

    fn read_u8(&mut self) -> TsResult<u8> {
        Ok(self.take(1)?[0])
    }

    fn read_u32(&mut self) -> TsResult<u32> {
        let bytes = self.take(4)?;
        Ok(u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    fn text(&mut self) -> TsResult<String> {
        let len = self.read_u32()? as usize;
        let bytes = self.take(len)?;
        Ok(match UTF_8.decode_without_bom_handling_and_without_replacement(bytes) {
            Some(text) => text.into_owned(),
            None => WINDOWS_1252.decode_without_bom_handling(bytes).0.into_owned(),
        })
    }

    fn utf16(&mut self) -> TsResult<String> {
        let len = self.read_u32()?;
        if len == u32::MAX {
            return Ok(String::new());
        }
        if len % 2 == 1 {
            return Err(self.error("odd translation length"));
        }
        let bytes = self.take(len as usize)?;
        let units = bytes.chunks_exact(2).map(|c| u16::from_be_bytes([c[0], c[1]]));
        Ok(char::decode_utf16(units)
            .map(|c| c.unwrap_or(char::REPLACEMENT_CHARACTER))
            .collect())
    }
}

/// Read a compiled file.
///
/// The file does not record a language, so numerus messages are recognised
/// by having several translations or a `%n` in the source. Messages come
/// back in hash order, all finished.
pub fn from_bytes(bytes: &[u8]) -> TsResult<Catalog> {
    if bytes.len() < MAGIC.len() || bytes[..MAGIC.len()] != MAGIC {
        return Err(TsError::Qm {
            offset: 0,
            message: "magic marker missing".to_string(),
        });
    }

    let mut hashes: &[u8] = &[];
    let mut bodies: &[u8] = &[];
    let mut bodies_at = 0;
    let mut blocks = Cursor::new(bytes, MAGIC.len(), 0);
    while bytes.len() - blocks.pos > 4 {
        let tag = blocks.read_u8()?;
        let len = blocks.read_u32()? as usize;
        if tag == 0 || len == 0 {
            break;
        }
        let at = blocks.pos;
        let data = blocks.take(len).map_err(|_| TsError::Qm {
            offset: at,
            message: format!("block 0x{tag:02x} runs past the end of the file"),
        })?;
        match tag {
            BLOCK_HASHES => hashes = data,
            BLOCK_MESSAGES => {
                bodies = data;
                bodies_at = at;
            }
            _ => {}
        }
    }

    let mut catalog = Catalog::default();
    let mut context = String::new();
    let mut source = String::new();
    let mut comment = String::new();
    for entry in hashes.chunks_exact(8) {
        let offset = u32::from_be_bytes([entry[4], entry[5], entry[6], entry[7]]) as usize;
        let mut cursor = Cursor::new(bodies, offset, bodies_at);
        let mut forms = Vec::new();
        loop {
            match cursor.read_u8()? {
                TAG_END => break,
                TAG_TRANSLATION => forms.push(cursor.utf16()?),
                TAG_OBSOLETE1 => {
                    cursor.take(4)?;
                }
                TAG_SOURCE_TEXT => source = cursor.text()?,
                TAG_CONTEXT => context = cursor.text()?,
                TAG_COMMENT => comment = cursor.text()?,
                _ => {}
            }
        }

        let numerus = forms.len() > 1 || source.contains("%n");
        let translation = if numerus || !forms.is_empty() {
            Translation::plural(forms)
        } else {
            Translation::single("")
        };
        let message = Message {
            source: source.clone(),
            comment: (!comment.is_empty()).then(|| comment.clone()),
            numerus,
            status: Status::Finished,
            translation,
            ..Default::default()
        };
        catalog.context_mut(&context).messages.push(message);
    }
    Ok(catalog)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Context;

    fn hex(bytes: &[u8]) -> String {
        bytes.iter().map(|b| format!("{b:02x}")).collect()
    }

    #[test]
    fn elf_hash_matches_qt() {
        assert_eq!(elf_hash(b"a"), 0x61);
        assert_eq!(elf_hash(b""), 1);
        assert_eq!(elf_hash(b"ab"), 0x672);
        assert_eq!(elf_hash(b"a\0b"), 0x61);
    }

    #[test]
    fn single_message_layout() {
        let catalog = Catalog::new("de")
            .with_context(Context::new("C").with_message(Message::new("a", "b")));
        let (bytes, summary) = release(&catalog, &ReleaseOptions::default());
        assert_eq!(summary.finished, 1);
        assert_eq!(
            hex(&bytes),
            concat!(
                "3cb86418caef9c95cd211cbf60a1bddd",
                "42", "00000008", "00000061", "00000000",
                "69", "00000019", "03", "00000002", "0062", "08", "00000000",
                "06", "00000001", "61", "07", "00000001", "43", "01",
                "88", "00000002", "0101",
            )
        );
    }

    #[test]
    fn compressed_file_has_context_table() {
        let catalog = Catalog::new("ja")
            .with_context(Context::new("C").with_message(Message::new("a", "b")));
        let options = ReleaseOptions {
            compress: true,
            ..Default::default()
        };
        let (bytes, _) = release(&catalog, &options);

        // magic, hashes, messages, then the context block
        let at = 16 + 13 + 30;
        assert_eq!(bytes[at], BLOCK_CONTEXTS);
        assert_eq!(&bytes[at + 1..at + 5], &308u32.to_be_bytes());
        let table = &bytes[at + 5..];
        assert_eq!(table.len(), 308);
        assert_eq!(&table[..2], &[0x00, 0x97]);
        assert_eq!(&table[136..138], &[0x00, 0x01]);
        assert_eq!(&table[304..308], &[0x00, 0x00, 0x01, 0x43]);
    }

    #[test]
    fn empty_catalog_is_magic_only() {
        let (bytes, _) = release(&Catalog::new("ja"), &ReleaseOptions::default());
        assert_eq!(bytes, MAGIC.to_vec());
    }

    #[test]
    fn statuses_decide_what_is_released() {
        let catalog = Catalog::new("de").with_context(
            Context::new("Main")
                .with_message(Message::new("Open", "Öffnen"))
                .with_message(Message::new("Save", "Sichern").with_status(Status::Unfinished))
                .with_message(Message::new("Quit", "").with_status(Status::Unfinished))
                .with_message(Message::new("Old", "Alt").with_status(Status::Obsolete)),
        );

        let (bytes, summary) = release(&catalog, &ReleaseOptions::default());
        assert_eq!(
            summary,
            ReleaseSummary {
                finished: 1,
                unfinished: 1,
                untranslated: 1,
                ..Default::default()
            }
        );
        let reread = from_bytes(&bytes).unwrap();
        assert_eq!(reread.message_count(), 2);
        assert!(reread.find("Main", "Old", "").is_none());

        let strict = ReleaseOptions {
            ignore_unfinished: true,
            ..Default::default()
        };
        let (bytes, summary) = release(&catalog, &strict);
        assert_eq!(summary.generated(), 1);
        assert_eq!(from_bytes(&bytes).unwrap().message_count(), 1);

        let marked = ReleaseOptions {
            untranslated_prefix: Some("~ ".to_string()),
            ..Default::default()
        };
        let (bytes, summary) = release(&catalog, &marked);
        assert_eq!(summary.unfinished, 2);
        assert_eq!(summary.untranslated, 0);
        let reread = from_bytes(&bytes).unwrap();
        let quit = reread.find("Main", "Quit", "").unwrap();
        assert_eq!(quit.translation.text(), "~ Quit");
    }

    #[test]
    fn lone_comment_is_stripped() {
        let catalog = Catalog::new("de").with_context(
            Context::new("Main")
                .with_message(Message::new("Open", "Öffnen").with_comment("menu"))
                .with_message(Message::new("Close", "Schließen").with_comment("menu"))
                .with_message(Message::new("Close", "Zumachen").with_comment("door")),
        );
        let (bytes, _) = release(&catalog, &ReleaseOptions::default());
        let reread = from_bytes(&bytes).unwrap();

        let open = reread.find("Main", "Open", "").unwrap();
        assert_eq!(open.translation.text(), "Öffnen");
        // First of the pair loses its comment, the second keeps it
        assert_eq!(
            reread.find("Main", "Close", "").unwrap().translation.text(),
            "Schließen"
        );
        assert_eq!(
            reread.find("Main", "Close", "door").unwrap().translation.text(),
            "Zumachen"
        );
    }

    #[test]
    fn comment_kept_when_bare_message_exists() {
        let catalog = Catalog::new("de").with_context(
            Context::new("Main")
                .with_message(Message::new("Open", "Aufmachen").with_comment("door"))
                .with_message(Message::new("Open", "Öffnen")),
        );
        let (bytes, _) = release(&catalog, &ReleaseOptions::default());
        let reread = from_bytes(&bytes).unwrap();
        assert_eq!(reread.message_count(), 2);
        assert_eq!(
            reread.find("Main", "Open", "door").unwrap().translation.text(),
            "Aufmachen"
        );
    }

    #[test]
    fn id_based_release() {
        let mut with_id = Message::new("Open", "Öffnen");
        with_id.id = Some("file.open".to_string());
        let catalog = Catalog::new("de").with_context(
            Context::new("Main")
                .with_message(with_id)
                .with_message(Message::new("Close", "Schließen")),
        );
        let options = ReleaseOptions {
            id_based: true,
            ..Default::default()
        };
        let (bytes, summary) = release(&catalog, &options);
        assert_eq!(summary.missing_ids, 1);
        assert_eq!(summary.dropped_data, 1);
        let reread = from_bytes(&bytes).unwrap();
        assert_eq!(
            reread.find("", "file.open", "").unwrap().translation.text(),
            "Öffnen"
        );
    }

    #[test]
    fn numerus_forms_read_back_as_plural() {
        let catalog = Catalog::new("ru").with_context(Context::new("Main").with_message(
            Message::plural("%n file(s)", ["%n файл", "%n файла", "%n файлов"]),
        ));
        let (bytes, _) = release(&catalog, &ReleaseOptions::default());
        let rules = plural::rule_for("ru").unwrap().qm_rules();
        assert!(bytes.ends_with(&rules));

        let reread = from_bytes(&bytes).unwrap();
        let message = reread.find("Main", "%n file(s)", "").unwrap();
        assert!(message.numerus);
        assert_eq!(message.translation.forms[2], "%n файлов");
    }

    #[test]
    fn corrupt_files_are_errors() {
        assert!(matches!(
            from_bytes(b"not a qm file at all"),
            Err(TsError::Qm { offset: 0, .. })
        ));

        let catalog = Catalog::new("de")
            .with_context(Context::new("C").with_message(Message::new("a", "b")));
        let (bytes, _) = release(&catalog, &ReleaseOptions::default());
        assert!(from_bytes(&bytes[..40]).is_err());
    }
}
