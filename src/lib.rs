// SPDX-License-Identifier: PMPL-1.0-or-later

//! tscat: Qt Linguist translation catalog toolkit.
//!
//! Loads and saves `.ts` catalogs without losing data, answers runtime
//! lookups the way a Qt application would, and checks catalogs the way
//! Linguist does while a translator works.
//!
//! MODULES:
//! 1. **ts**: the `.ts` XML reader and writer.
//! 2. **lookup** / **library**: translation by (context, source, comment,
//!    count), for one catalog or a directory of them.
//! 3. **validate** / **stats** / **merge**: catalog maintenance.
//! 4. **qm** / **po** / **format**: compiled `.qm` output and gettext
//!    exchange, with the format picked from the file extension.

pub mod config;
pub mod format;
pub mod lang;
pub mod library;
pub mod lookup;
pub mod merge;
pub mod plural;
pub mod po;
pub mod qm;
pub mod report;
pub mod stats;
pub mod ts;
pub mod types;
pub mod validate;
