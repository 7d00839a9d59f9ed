// SPDX-License-Identifier: PMPL-1.0-or-later

//! GNU gettext `.po` / `.pot` files
//!
//! Catalogs are exchanged with gettext tooling the way lconvert does it.
//! Qt contexts travel in `msgctxt` as `context|comment` (with `~` escaping)
//! once the header says `X-Qt-Contexts: true`, and everything PO has that
//! a catalog does not (header fields, flags, unparsable references) is
//! kept in `po-*` extras so a PO file survives a trip through `.ts`.

pub mod reader;
pub mod writer;

use crate::ts::TsResult;
use crate::types::Catalog;
use std::path::Path;

pub use reader::{from_bytes, from_str};
pub use writer::{to_string, to_template_string};

/// Length variant separator in PO text; catalogs use U+009C, which
/// gettext tools do not display.
pub const TEXT_VARIANT_SEPARATOR: char = '\u{2762}';

/// Load a PO or POT file from disk.
pub fn load<P: AsRef<Path>>(path: P) -> TsResult<Catalog> {
    reader::load(path)
}

/// Save a catalog as PO, or as POT with translations dropped.
pub fn save<P: AsRef<Path>>(catalog: &Catalog, path: P, template: bool) -> TsResult<()> {
    writer::save(catalog, path, template)
}

/// Extra key of a PO header field: `po-header-` and the name in lower
/// case with `-` turned into `_`.
pub(crate) fn header_extra(name: &str) -> String {
    format!("po-header-{}", name.to_lowercase().replace('-', "_"))
}
