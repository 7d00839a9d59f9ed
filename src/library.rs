// SPDX-License-Identifier: PMPL-1.0-or-later

//! Library: every catalog under a translations directory
//!
//! Qt ships catalogs as `<app>_<lang>.ts` (`assistant_de.ts`,
//! `qt_zh_CN.ts`, `qt_help_pt_BR.ts`). A [`Library`] walks a directory
//! tree, loads each such file in parallel and resolves an application and
//! language to the best matching catalog.

use crate::lang::LanguageTag;
use crate::lookup::{LookupPolicy, Translator};
use crate::ts::{self, TsResult};
use crate::types::Catalog;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// A `.ts` file found on disk, before loading
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogFile {
    pub path: PathBuf,
    pub app: String,
    pub language: LanguageTag,
}

/// A file that was found but could not be loaded
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadFailure {
    pub path: PathBuf,
    pub error: String,
}

#[derive(Debug, Clone)]
pub struct LoadedCatalog {
    pub file: CatalogFile,
    pub catalog: Catalog,
}

#[derive(Debug, Default)]
pub struct Library {
    root: PathBuf,
    catalogs: Vec<LoadedCatalog>,
    failures: Vec<LoadFailure>,
}

/// Split a file stem into application and language.
///
/// The leftmost split whose remainder is a known language tag wins, so
/// application names may themselves contain underscores.
///
/// ```
/// use tscat::library::split_file_stem;
/// let (app, lang) = split_file_stem("qt_help_pt_BR").unwrap();
/// assert_eq!(app, "qt_help");
/// assert_eq!(lang.to_string(), "pt_BR");
/// ```
pub fn split_file_stem(stem: &str) -> Option<(String, LanguageTag)> {
    stem.match_indices('_').find_map(|(pos, _)| {
        let (app, rest) = (&stem[..pos], &stem[pos + 1..]);
        if app.is_empty() || rest.split('_').count() > 2 {
            return None;
        }
        let tag = LanguageTag::parse(rest)?;
        let region_ok = tag
            .region
            .as_deref()
            .map_or(true, |r| (2..=3).contains(&r.len()) && r.chars().all(|c| c.is_ascii_alphanumeric()));
        (tag.is_known() && region_ok).then(|| (app.to_string(), tag))
    })
}

/// Find every `<app>_<lang>.ts` file below `root`, sorted by path.
pub fn discover<P: AsRef<Path>>(root: P) -> TsResult<Vec<CatalogFile>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(root.as_ref()).follow_links(true) {
        let entry = entry.map_err(std::io::Error::from)?;
        let path = entry.path();
        if !entry.file_type().is_file() || path.extension().is_none_or(|e| e != "ts") {
            continue;
        }
        let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };
        match split_file_stem(stem) {
            Some((app, language)) => files.push(CatalogFile {
                path: path.to_path_buf(),
                app,
                language,
            }),
            None => tracing::debug!(path = %path.display(), "no language in file name, skipped"),
        }
    }
    files.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(files)
}

impl Library {
    /// Discover and load every catalog under `root`.
    ///
    /// Files that fail to load are logged and recorded in
    /// [`Library::failures`]; they do not fail the whole library.
    pub fn load<P: AsRef<Path>>(root: P) -> TsResult<Self> {
        let root = root.as_ref();
        let files = discover(root)?;

        let results: Vec<(CatalogFile, TsResult<Catalog>)> = files
            .into_par_iter()
            .map(|file| {
                let loaded = ts::load(&file.path);
                (file, loaded)
            })
            .collect();

        let mut library = Library {
            root: root.to_path_buf(),
            ..Default::default()
        };
        for (file, loaded) in results {
            match loaded {
                Ok(catalog) => library.catalogs.push(LoadedCatalog { file, catalog }),
                Err(e) => {
                    tracing::warn!(path = %file.path.display(), error = %e, "skipping catalog");
                    library.failures.push(LoadFailure {
                        path: file.path,
                        error: e.to_string(),
                    });
                }
            }
        }

        tracing::info!(
            root = %root.display(),
            catalogs = library.catalogs.len(),
            failures = library.failures.len(),
            "loaded translation library"
        );
        Ok(library)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn catalogs(&self) -> &[LoadedCatalog] {
        &self.catalogs
    }

    pub fn failures(&self) -> &[LoadFailure] {
        &self.failures
    }

    pub fn apps(&self) -> BTreeSet<&str> {
        self.catalogs.iter().map(|c| c.file.app.as_str()).collect()
    }

    /// Catalog for `app` in `language`.
    ///
    /// Tries the exact tag, then the bare language (`pt_BR` -> `pt`), then
    /// any regional catalog of the same language (`de` -> `de_DE`).
    pub fn get(&self, app: &str, language: &str) -> Option<&Catalog> {
        let wanted = LanguageTag::parse(language)?;
        let candidates: Vec<&LoadedCatalog> =
            self.catalogs.iter().filter(|c| c.file.app == app).collect();

        candidates
            .iter()
            .find(|c| c.file.language == wanted)
            .or_else(|| {
                let bare = wanted.without_region();
                candidates.iter().find(|c| c.file.language == bare)
            })
            .or_else(|| {
                candidates
                    .iter()
                    .find(|c| c.file.language.language == wanted.language)
            })
            .map(|c| &c.catalog)
    }

    /// Lookup table for `app` in `language`, if a catalog resolves.
    pub fn translator(&self, app: &str, language: &str, policy: LookupPolicy) -> Option<Translator<'_>> {
        self.get(app, language)
            .map(|catalog| Translator::new(catalog, policy))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_simple_and_compound_names() {
        let (app, lang) = split_file_stem("assistant_de").unwrap();
        assert_eq!((app.as_str(), lang.to_string().as_str()), ("assistant", "de"));

        let (app, lang) = split_file_stem("qt_zh_CN").unwrap();
        assert_eq!((app.as_str(), lang.to_string().as_str()), ("qt", "zh_CN"));

        let (app, lang) = split_file_stem("assistant_adp_de").unwrap();
        assert_eq!((app.as_str(), lang.to_string().as_str()), ("assistant_adp", "de"));
    }

    #[test]
    fn rejects_names_without_language() {
        assert!(split_file_stem("assistant").is_none());
        assert!(split_file_stem("_de").is_none());
        assert!(split_file_stem("notes_draft").is_none());
    }
}
