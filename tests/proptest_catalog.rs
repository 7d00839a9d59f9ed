// SPDX-License-Identifier: PMPL-1.0-or-later

//! Property-based invariants for the catalog format and plural rules.
//!
//! 1. Any catalog survives to_string -> from_str unchanged, and so does
//!    any hand-written document once parsed
//! 2. Serialization is deterministic across a round trip
//! 3. Every plural rule picks an index inside its form count
//! 4. Negative counts select the same form as their magnitude
//! 5. Obsolete messages never come back from lookup
//! 6. Lookup with a count never leaves `%n` behind

use proptest::prelude::*;
use std::collections::BTreeMap;
use tscat::lookup::{LookupPolicy, Translator};
use tscat::plural::RULES;
use tscat::ts::{self, SaveOptions};
use tscat::types::{
    Catalog, Context, Location, LocationsMode, Message, Status, Translation, VARIANT_SEPARATOR,
};

// ── Strategies ───────────────────────────────────────────────────────

fn text() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 &<>'\"%.!?\n\u{e4}\u{17e}\u{1}\t]{0,16}"
}

fn form() -> impl Strategy<Value = String> {
    prop::collection::vec(text(), 1..3).prop_map(|variants| {
        let mut separator = [0u8; 4];
        variants.join(&*VARIANT_SEPARATOR.encode_utf8(&mut separator))
    })
}

fn status() -> impl Strategy<Value = Status> {
    prop_oneof![
        Just(Status::Finished),
        Just(Status::Unfinished),
        Just(Status::Obsolete),
    ]
}

fn extras() -> impl Strategy<Value = BTreeMap<String, String>> {
    prop::collection::btree_map("[a-z]{1,8}", text(), 0..3)
}

/// Location shapes the reader produces: a named file, and a line that is
/// never negative.
fn locations() -> impl Strategy<Value = Vec<Location>> {
    prop::collection::vec(
        ("[a-z]{1,6}\\.cpp", prop::option::of(0i32..5000)).prop_map(|(file, line)| Location {
            file: Some(file),
            line,
        }),
        0..3,
    )
}

fn message() -> impl Strategy<Value = Message> {
    let texts = (
        text(),
        prop::option::of(text()),
        prop::option::of(text()),
        prop::option::of(text()),
        prop::option::of(text()),
        prop::option::of(text()),
        prop::option::of(text()),
    );
    let rest = (
        prop::option::of("[a-z0-9_.]{1,10}"),
        status(),
        prop::bool::ANY,
        prop::collection::vec(form(), 0..5),
        locations(),
        extras(),
    );
    (texts, rest).prop_map(
        |(
            (source, comment, extra_comment, old_source, old_comment, translator_comment, user_data),
            (id, status, numerus, forms, locations, extras),
        )| {
            let translation = if numerus {
                Translation::plural(forms)
            } else {
                Translation::single(forms.first().cloned().unwrap_or_default())
            };
            Message {
                id,
                source,
                old_source,
                comment,
                old_comment,
                extra_comment,
                translator_comment,
                user_data,
                numerus,
                status,
                translation,
                locations,
                extras,
            }
        },
    )
}

fn catalog() -> impl Strategy<Value = Catalog> {
    (
        prop::option::of(prop_oneof![
            Just("de"),
            Just("ru"),
            Just("sl"),
            Just("ja_JP"),
            Just("pt_BR")
        ]),
        prop::option::of(Just("en")),
        prop_oneof![
            Just(LocationsMode::None),
            Just(LocationsMode::Absolute),
            Just(LocationsMode::Relative),
        ],
        extras(),
        prop::collection::vec(
            ("[A-Za-z:]{1,12}", prop::collection::vec(message(), 0..6)),
            0..4,
        ),
    )
        .prop_map(|(language, source_language, mode, extras, contexts)| {
            let mut catalog = Catalog {
                language: language.map(str::to_string),
                source_language: source_language.map(str::to_string),
                extras,
                ..Default::default()
            };
            for (name, messages) in contexts {
                catalog.contexts.push(Context { name, messages });
            }
            normalize_locations(&mut catalog, mode);
            catalog
        })
}

/// The file only records a location mode through the locations it holds,
/// and relative lines always carry a delta.
fn normalize_locations(catalog: &mut Catalog, mode: LocationsMode) {
    let messages = catalog.contexts.iter_mut().flat_map(|c| c.messages.iter_mut());
    let mut any = false;
    for message in messages {
        match mode {
            LocationsMode::None => message.locations.clear(),
            LocationsMode::Absolute => {}
            LocationsMode::Relative => {
                for location in &mut message.locations {
                    location.line.get_or_insert(1);
                }
            }
        }
        any |= !message.locations.is_empty();
    }
    catalog.locations = if any { mode } else { LocationsMode::None };
}

/// Hand-written documents in shapes the writer never produces itself.
fn document() -> impl Strategy<Value = String> {
    let translation = prop_oneof![
        Just(String::new()),
        Just("<translation/>".to_string()),
        Just("<translation></translation>".to_string()),
        "[a-z]{1,6}".prop_map(|t| format!("<translation type=\"unfinished\">{}</translation>", t)),
    ];
    (
        prop_oneof![
            Just(""),
            Just(" language=\"\""),
            Just(" language=\"de\" sourcelanguage=\"\""),
        ],
        prop::collection::vec(("[a-z]{1,8}", translation), 1..5),
    )
        .prop_map(|(header, messages)| {
            let mut doc = format!("<TS version=\"2.1\"{}><context><name>C</name>", header);
            for (source, translation) in messages {
                doc.push_str(&format!("<message><source>{}</source>{}</message>", source, translation));
            }
            doc.push_str("</context></TS>");
            doc
        })
}

// ═════════════════════════════════════════════════════════════════════
// 1-2. Round trip
// ═════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn written_catalog_reads_back_equal(catalog in catalog()) {
        let written = ts::to_string(&catalog, &SaveOptions::default());
        let reread = ts::from_str(&written).expect("written catalog should parse");
        prop_assert_eq!(&reread, &catalog);
        prop_assert_eq!(ts::to_string(&reread, &SaveOptions::default()), written);
    }

    #[test]
    fn parsed_documents_survive_a_round_trip(doc in document()) {
        let parsed = ts::from_str(&doc).expect("document should parse");
        let written = ts::to_string(&parsed, &SaveOptions::default());
        let reread = ts::from_str(&written).expect("written catalog should parse");
        prop_assert_eq!(reread, parsed);
    }
}

// ═════════════════════════════════════════════════════════════════════
// 3-4. Plural rules
// ═════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn form_index_is_in_range(count in any::<i64>()) {
        for rule in RULES {
            let index = rule.form_index(count);
            prop_assert!(index < rule.count(), "{} picked {} for {}", rule.name, index, count);
        }
    }

    #[test]
    fn negative_counts_use_magnitude(count in -1_000_000i64..0) {
        for rule in RULES {
            prop_assert_eq!(rule.form_index(count), rule.form_index(-count));
        }
    }
}

// ═════════════════════════════════════════════════════════════════════
// 5-6. Lookup
// ═════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn obsolete_messages_never_translate(source in "[a-z]{1,10}", translation in "[A-Z]{1,10}") {
        let catalog = Catalog::new("de").with_context(
            Context::new("Main")
                .with_message(Message::new(source.clone(), translation).with_status(Status::Obsolete)),
        );
        let tr = Translator::new(&catalog, LookupPolicy::default());
        prop_assert_eq!(tr.translate("Main", &source, None, None), source);
    }

    #[test]
    fn count_is_always_substituted(count in any::<i64>(), known in prop::bool::ANY) {
        let catalog = Catalog::new("ru").with_context(Context::new("Main").with_message(
            Message::plural("%n file(s)", ["%n файл", "%n файла", "%n файлов"]),
        ));
        let tr = Translator::new(&catalog, LookupPolicy::default());
        let source = if known { "%n file(s)" } else { "%n dir(s)" };
        let text = tr.translate("Main", source, None, Some(count));
        prop_assert!(!text.contains("%n"));
        prop_assert!(text.starts_with(&count.to_string()));
    }
}
