// SPDX-License-Identifier: PMPL-1.0-or-later

//! Integration tests over real Qt catalogs

use std::path::{Path, PathBuf};
use tscat::format;
use tscat::lookup::{Lookup, LookupPolicy, Translator};
use tscat::po;
use tscat::qm::{self, ReleaseOptions};
use tscat::stats::{message_stats, MessageStats};
use tscat::ts::{self, SaveOptions};
use tscat::types::{Catalog, Status};
use tscat::validate::{self, Checks, IssueKind};

const FIXTURES: [&str; 4] = [
    "assistant_de.ts",
    "linguist_he.ts",
    "linguist_sl.ts",
    "qtconfig_ja.ts",
];

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

fn load(name: &str) -> Catalog {
    ts::load(fixture(name)).expect("fixture should load")
}

#[test]
fn test_assistant_close_button() {
    let catalog = load("assistant_de.ts");
    assert_eq!(catalog.language.as_deref(), Some("de"));
    assert_eq!(catalog.version, "2.0");

    let tr = Translator::new(&catalog, LookupPolicy::default());
    assert_eq!(tr.translate("AboutDialog", "&Close", None, None), "&Schließen");
}

#[test]
fn test_round_trip_preserves_every_fixture() {
    for name in FIXTURES {
        let catalog = load(name);
        let written = ts::to_string(&catalog, &SaveOptions::default());
        let reread = ts::from_str(&written).expect("written catalog should parse");
        assert_eq!(reread, catalog, "{name} changed on round trip");

        // A second pass is byte stable
        assert_eq!(ts::to_string(&reread, &SaveOptions::default()), written);
    }
}

#[test]
fn test_obsolete_messages_are_not_served() {
    let catalog = load("assistant_de.ts");
    let obsolete = catalog
        .find("CentralWidget", "Add new page", "")
        .expect("obsolete message should be in the file");
    assert_eq!(obsolete.status, Status::Obsolete);
    assert!(obsolete.is_translated());

    let tr = Translator::new(&catalog, LookupPolicy::default());
    assert_eq!(
        tr.lookup("CentralWidget", "Add new page", None, None),
        Lookup::Fallback("Add new page".to_string())
    );
    assert_eq!(
        tr.translate("CentralWidget", "Print Document", None, None),
        "Drucken"
    );
}

#[test]
fn test_assistant_statistics() {
    let stats = message_stats(&load("assistant_de.ts"));
    assert_eq!(
        stats,
        MessageStats {
            finished: 327,
            unfinished: 1,
            obsolete: 22,
            plural: 0,
            contexts: 41,
        }
    );
}

#[test]
fn test_slovenian_plurals() {
    let catalog = load("linguist_sl.ts");
    let stats = message_stats(&catalog);
    assert_eq!(stats.plural, 14);
    assert_eq!(stats.unfinished, 100);

    let issues = validate::validate(&catalog, &Checks::none());
    assert!(issues.is_empty(), "unexpected issues: {issues:?}");

    let tr = Translator::new(&catalog, LookupPolicy::default());
    let source = "Translated %n entry(s)";
    assert_eq!(tr.translate("MainWindow", source, None, Some(1)), "Prevedel 1 vnos");
    assert_eq!(tr.translate("MainWindow", source, None, Some(102)), "Prevedel 102 vnosa");
    assert_eq!(tr.translate("MainWindow", source, None, Some(3)), "Prevedel 3 vnose");
    assert_eq!(tr.translate("MainWindow", source, None, Some(5)), "Prevedel 5 vnosov");
}

#[test]
fn test_unfinished_plural_falls_back_to_source() {
    let catalog = load("linguist_sl.ts");
    let tr = Translator::new(&catalog, LookupPolicy::default());
    let source = "    Kept %n obsolete entries\n";
    assert_eq!(
        tr.lookup("LUpdate", source, None, Some(4)),
        Lookup::Fallback("    Kept 4 obsolete entries\n".to_string())
    );
}

#[test]
fn test_hebrew_plural_mismatch_is_detected() {
    let catalog = load("linguist_he.ts");
    let issues = validate::validate(&catalog, &Checks::none());
    let mismatches: Vec<_> = issues
        .iter()
        .filter(|i| i.kind == IssueKind::PluralCount)
        .collect();
    assert_eq!(mismatches.len(), 10);
    assert!(mismatches
        .iter()
        .all(|i| i.detail == "1 plural forms, language needs 2"));
    assert!(validate::has_errors(&issues));
}

#[test]
fn test_japanese_region_tag_uses_universal_rule() {
    let catalog = load("qtconfig_ja.ts");
    assert_eq!(catalog.language_tag(), Some("ja_JP"));
    let tr = Translator::new(&catalog, LookupPolicy::default());
    assert_eq!(tr.rule().count(), 1);

    let issues = validate::validate(&catalog, &Checks::none());
    assert!(!validate::has_errors(&issues));
}

#[test]
fn test_save_and_reload_from_disk() {
    let dir = tempfile::TempDir::new().expect("temp dir should be created");
    let mut catalog = load("assistant_de.ts");
    assert_eq!(catalog.drop_obsolete(), 22);

    let path = dir.path().join("assistant_de.ts");
    ts::save(
        &catalog,
        &path,
        &SaveOptions {
            sort_contexts: true,
            ..Default::default()
        },
    )
    .expect("save should succeed");

    let reread = ts::load(&path).expect("saved catalog should load");
    assert_eq!(message_stats(&reread).obsolete, 0);
    assert_eq!(reread.message_count(), catalog.message_count());
    let names: Vec<&str> = reread.contexts.iter().map(|c| c.name.as_str()).collect();
    let mut sorted = names.clone();
    sorted.sort();
    assert_eq!(names, sorted);
}

#[test]
fn test_malformed_catalog_is_rejected() {
    let dir = tempfile::TempDir::new().expect("temp dir should be created");
    let path = dir.path().join("broken_de.ts");
    std::fs::write(
        &path,
        "<?xml version=\"1.0\"?>\n<TS version=\"2.1\">\n<context>\n<name>A</name>\n</TS>\n",
    )
    .expect("write should succeed");
    assert!(ts::load(&path).is_err());
}

#[test]
fn test_released_qm_answers_lookups() {
    let dir = tempfile::TempDir::new().expect("temp dir should be created");
    let catalog = load("assistant_de.ts");
    let path = dir.path().join("assistant_de.qm");
    let summary =
        qm::save(&catalog, &path, &ReleaseOptions::default()).expect("release should succeed");
    assert!(summary.generated() > 0);

    let released = qm::load(&path).expect("released file should load");
    assert!(released.message_count() > 0);
    assert!(released.message_count() <= summary.generated());
    assert!(released.messages().all(|(_, m)| !m.is_obsolete()));

    let tr = Translator::new(&released, LookupPolicy::default());
    assert_eq!(tr.translate("AboutDialog", "&Close", None, None), "&Schließen");
}

#[test]
fn test_po_round_trip_keeps_translations() {
    let catalog = load("linguist_sl.ts");
    let text = po::to_string(&catalog);
    assert!(text.contains("Plural-Forms: "));

    let back = po::from_str(&text).expect("exported PO should parse");
    assert_eq!(back.language.as_deref(), Some("sl"));
    for (context, message) in catalog.messages() {
        if message.is_obsolete() || !message.is_translated() {
            continue;
        }
        let found = back
            .find(context, &message.source, message.comment_text())
            .unwrap_or_else(|| panic!("{} / {} should survive", context, message.source));
        assert_eq!(found.translation, message.translation, "{}", message.source);
        assert_eq!(found.status, message.status, "{}", message.source);
    }
}

#[test]
fn test_convert_by_extension() {
    let dir = tempfile::TempDir::new().expect("temp dir should be created");
    let po_path = dir.path().join("qtconfig_ja.po");
    format::save(
        &load("qtconfig_ja.ts"),
        &po_path,
        &SaveOptions::default(),
        &ReleaseOptions::default(),
    )
    .expect("PO save should succeed");

    let from_po = format::load(&po_path).expect("PO should load");
    assert_eq!(from_po.language.as_deref(), Some("ja"));
    assert!(from_po.message_count() > 0);
}
