// SPDX-License-Identifier: PMPL-1.0-or-later

//! Library discovery and resolution over a temporary translations tree

use std::fs;
use std::path::Path;
use tempfile::TempDir;
use tscat::library::{self, Library};
use tscat::lookup::LookupPolicy;
use tscat::report::ReportGenerator;

fn fixture(name: &str) -> std::path::PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

fn translations_tree() -> TempDir {
    let dir = TempDir::new().expect("temp dir should be created");
    let nested = dir.path().join("tools");
    fs::create_dir_all(&nested).expect("nested dir should be created");

    fs::copy(fixture("assistant_de.ts"), dir.path().join("assistant_de.ts"))
        .expect("copy should succeed");
    fs::copy(fixture("qtconfig_ja.ts"), dir.path().join("qtconfig_ja_JP.ts"))
        .expect("copy should succeed");
    fs::copy(fixture("linguist_sl.ts"), nested.join("linguist_sl.ts"))
        .expect("copy should succeed");
    fs::write(dir.path().join("linguist_he.ts"), "<TS><context>")
        .expect("write should succeed");
    fs::write(dir.path().join("README.txt"), "not a catalog").expect("write should succeed");
    fs::write(dir.path().join("notes.ts"), "<TS/>").expect("write should succeed");
    dir
}

#[test]
fn test_discover_finds_named_catalogs() {
    let dir = translations_tree();
    let files = library::discover(dir.path()).expect("discovery should succeed");
    let names: Vec<String> = files
        .iter()
        .map(|f| format!("{}:{}", f.app, f.language))
        .collect();
    assert_eq!(
        names,
        vec!["assistant:de", "linguist:he", "qtconfig:ja_JP", "linguist:sl"]
    );
}

#[test]
fn test_broken_files_do_not_fail_the_library() {
    let dir = translations_tree();
    let library = Library::load(dir.path()).expect("library should load");
    assert_eq!(library.catalogs().len(), 3);
    assert_eq!(library.failures().len(), 1);
    assert!(library.failures()[0].path.ends_with("linguist_he.ts"));

    let apps: Vec<&str> = library.apps().into_iter().collect();
    assert_eq!(apps, vec!["assistant", "linguist", "qtconfig"]);
}

#[test]
fn test_resolution_falls_back_across_regions() {
    let dir = translations_tree();
    let library = Library::load(dir.path()).expect("library should load");

    let de = library.get("assistant", "de_AT").expect("de_AT should fall back to de");
    assert_eq!(de.language.as_deref(), Some("de"));

    let ja = library.get("qtconfig", "ja").expect("ja should find ja_JP");
    assert_eq!(ja.language_tag(), Some("ja_JP"));

    assert!(library.get("assistant", "fr").is_none());
    assert!(library.get("designer", "de").is_none());

    let tr = library
        .translator("assistant", "de-DE", LookupPolicy::default())
        .expect("translator should resolve");
    assert_eq!(tr.translate("AboutDialog", "&Close", None, None), "&Schließen");
}

#[test]
fn test_scan_report_lists_least_complete_first() {
    let dir = translations_tree();
    let library = Library::load(dir.path()).expect("library should load");
    let report = ReportGenerator::new().scan(&library);

    assert_eq!(report.catalogs.len(), 3);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.catalogs[0].app.as_deref(), Some("linguist"));
    assert!(report
        .catalogs
        .windows(2)
        .all(|w| w[0].completeness <= w[1].completeness));
    assert!(report.catalogs.iter().all(|c| c.errors == 0));
}
