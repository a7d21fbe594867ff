//! Conversions through every vendor, in memory and on disk

use std::collections::BTreeSet;
use std::path::Path;

use chrono::{TimeZone, Utc};
use nlut::archive::{self, Entries};
use nlut::{
    App, Format, ImportOptions, Imported, Output, SequentialIds, Session, Source, Span,
    TranscoderConfig,
};
use tempfile::TempDir;

const FIXTURE: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/pizza_skill.json");

fn session() -> Session {
    Session::new(
        TranscoderConfig::default(),
        ImportOptions {
            language: "fr".to_string(),
            version: "20240101".to_string(),
        },
    )
}

fn import_fixture(session: &Session) -> Imported {
    let source = Source::read(FIXTURE).unwrap();
    session.import(&source).unwrap()
}

fn export(session: &Session, app: &App, format: Format) -> Output {
    let mut ids = SequentialIds::new();
    let timestamp = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
    session
        .export_with(app, format, "pizzeria", &mut ids, timestamp)
        .unwrap()
}

fn reimport(session: &Session, output: Output) -> Imported {
    let source = match output {
        Output::Document(bytes) => Source::Document {
            name: "skill.json".to_string(),
            bytes,
        },
        Output::Archive(entries) => Source::Archive(entries),
    };
    session.import(&source).unwrap()
}

/// Entity names with their canonical values and synonyms, order-free.
fn entity_sets(app: &App) -> BTreeSet<(String, BTreeSet<(String, BTreeSet<String>)>)> {
    app.entities()
        .map(|entity| {
            let values = entity
                .values
                .iter()
                .map(|v| (v.value.clone(), v.synonyms.iter().cloned().collect()))
                .collect();
            (entity.name.clone(), values)
        })
        .collect()
}

fn intents(app: &App) -> Vec<String> {
    app.intent_names().map(str::to_string).collect()
}

#[test]
fn test_fixture_import() {
    let imported = import_fixture(&session());
    let app = &imported.app;

    assert_eq!(imported.format, Format::Alexa);
    assert_eq!(app.name(), "pizzéria");
    assert_eq!(app.language(), "fr");
    assert_eq!(intents(app), vec!["CommanderPizza", "Livraison", "Annuler"]);
    assert_eq!(app.entity_count(), 3);
    assert_eq!(app.expressions().len(), 5);
    assert!(imported.skipped.is_empty());

    let second = &app.expressions()[1];
    assert_eq!(second.text, "une pizza grande à la crème fraîche");
    let spans: Vec<(&str, Option<Span>)> = second
        .entity_annotations()
        .map(|a| (a.value.as_str(), a.span))
        .collect();
    assert_eq!(
        spans,
        vec![
            ("grande", Some(Span::new(10, 16))),
            ("crème fraîche", Some(Span::new(22, 35)))
        ]
    );
}

#[test]
fn test_builtin_slot_type_placeholder() {
    let imported = import_fixture(&session());
    let date = imported.app.entity("AMAZON_DATE").unwrap();

    assert_eq!(date.values.len(), 1);
    assert_eq!(date.values[0].value, "PLACEHOLDER");
    assert!(imported.app.entity("AMAZON.DATE").is_none());
}

#[test]
fn test_attribution_is_complete() {
    let imported = import_fixture(&session());
    let app = &imported.app;

    let attributed: usize = app.attributions().iter().map(|a| a.phrases.len()).sum();
    assert_eq!(attributed, app.expressions().len());
    assert!(app.attribute("Annuler").phrases.is_empty());
}

#[test]
fn test_alexa_round_trip() {
    let session = session();
    let original = import_fixture(&session).app;
    let again = reimport(&session, export(&session, &original, Format::Alexa)).app;

    assert_eq!(entity_sets(&again), entity_sets(&original));
    assert_eq!(intents(&again), intents(&original));
}

#[test]
fn test_wit_round_trip() {
    let session = session();
    let original = import_fixture(&session).app;
    let imported = reimport(&session, export(&session, &original, Format::Wit));

    assert_eq!(imported.format, Format::Wit);
    assert_eq!(entity_sets(&imported.app), entity_sets(&original));
    assert_eq!(imported.app.expressions(), original.expressions());
    assert_eq!(intents(&imported.app), intents(&original));
}

#[test]
fn test_dialogflow_round_trip() {
    let session = session();
    let original = import_fixture(&session).app;
    let imported = reimport(&session, export(&session, &original, Format::Dialogflow));

    assert_eq!(imported.format, Format::Dialogflow);
    assert_eq!(entity_sets(&imported.app), entity_sets(&original));
    assert_eq!(imported.app.expressions(), original.expressions());
    assert_eq!(intents(&imported.app), intents(&original));
}

#[test]
fn test_chain_through_every_vendor() {
    let session = session();
    let original = import_fixture(&session).app;

    let wit = reimport(&session, export(&session, &original, Format::Wit)).app;
    let agent = reimport(&session, export(&session, &wit, Format::Dialogflow)).app;
    let skill = reimport(&session, export(&session, &agent, Format::Alexa)).app;

    assert_eq!(entity_sets(&skill), entity_sets(&original));
    assert_eq!(skill.expressions(), original.expressions());
}

#[test]
fn test_declared_intent_without_expressions_exports_empty() {
    let session = session();
    let app = import_fixture(&session).app;

    let Output::Archive(agent) = export(&session, &app, Format::Dialogflow) else {
        panic!("expected an archive");
    };
    let usersays: serde_json::Value =
        serde_json::from_slice(&agent["intents/Annuler_usersays_fr.json"]).unwrap();
    assert_eq!(usersays, serde_json::json!([]));

    let Output::Document(skill) = export(&session, &app, Format::Alexa) else {
        panic!("expected a document");
    };
    let skill: serde_json::Value = serde_json::from_slice(&skill).unwrap();
    let annuler = skill["interactionModel"]["languageModel"]["intents"]
        .as_array()
        .unwrap()
        .iter()
        .find(|intent| intent["name"] == "Annuler")
        .unwrap();
    assert_eq!(annuler["samples"], serde_json::json!([]));
}

#[test]
fn test_archive_on_disk() {
    let session = session();
    let app = import_fixture(&session).app;
    let temp_dir = TempDir::new().unwrap();
    let base = temp_dir.path().join("pizzeria");

    let path = session.export(&app, Format::Dialogflow, &base).unwrap().write(&base).unwrap();
    assert_eq!(path, temp_dir.path().join("pizzeria.zip"));

    let source = Source::read(&path).unwrap();
    assert_eq!(Format::detect(&source), Format::Dialogflow);
    assert_eq!(session.import(&source).unwrap().app.expressions(), app.expressions());
}

#[test]
fn test_unpacked_wit_directory() {
    let session = session();
    let app = import_fixture(&session).app;
    let temp_dir = TempDir::new().unwrap();

    let Output::Archive(entries) = export(&session, &app, Format::Wit) else {
        panic!("expected an archive");
    };
    unpack(&entries, temp_dir.path());

    let source = Source::read(temp_dir.path()).unwrap();
    assert_eq!(Format::detect(&source), Format::Wit);
    let imported = session.import(&source).unwrap();
    assert_eq!(imported.app.expressions(), app.expressions());
}

fn unpack(entries: &Entries, dir: &Path) {
    for (name, data) in entries {
        archive::write_file(dir.join(name), data).unwrap();
    }
}
