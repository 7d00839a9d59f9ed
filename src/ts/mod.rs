// SPDX-License-Identifier: PMPL-1.0-or-later

//! Qt Linguist `.ts` file format
//!
//! Reading and writing are symmetric: any catalog the reader produces is
//! written back in a form that reads to an equal [`Catalog`].

pub mod error;
pub mod reader;
pub mod writer;

use crate::types::Catalog;
use std::path::Path;

pub use error::{TsError, TsResult};
pub use reader::{from_bytes, from_str};
pub use writer::{protect, to_string, SaveOptions};

/// Load a catalog from disk.
pub fn load<P: AsRef<Path>>(path: P) -> TsResult<Catalog> {
    reader::load(path)
}

/// Save a catalog to disk.
pub fn save<P: AsRef<Path>>(catalog: &Catalog, path: P, options: &SaveOptions) -> TsResult<()> {
    writer::save(catalog, path, options)
}
