//! DialogFlow agent export: a flat zip of agent settings, intent and entity
//! definitions, and per-language usersays and entries documents.

pub mod export;
pub mod import;
pub mod model;

use crate::error::Result;
use crate::formats::{wrong_source, ExportContext, Format, ImportOptions, Imported, Vendor};
use crate::ir::App;
use crate::source::{Output, Source};

pub const AGENT_ENTRY: &str = "agent.json";
pub const PACKAGE_ENTRY: &str = "package.json";
pub const FALLBACK_INTENT: &str = "Default Fallback Intent";

#[derive(Debug, Clone, Copy, Default)]
pub struct Dialogflow;

impl Vendor for Dialogflow {
    fn format(&self) -> Format {
        Format::Dialogflow
    }

    fn import(&self, source: &Source, options: &ImportOptions) -> Result<Imported> {
        let entries = match source {
            Source::Archive(entries) => entries,
            Source::Document { .. } => return Err(wrong_source(Format::Dialogflow, source)),
        };

        let imported = import::build_app(entries, options)?;
        tracing::info!(
            "Imported agent {}: {} entities, {} intents, {} expressions",
            imported.app.name(),
            imported.app.entity_count(),
            imported.app.intent_count(),
            imported.app.expressions().len()
        );

        Ok(Imported {
            format: Format::Dialogflow,
            app: imported.app,
            skipped: imported.skipped,
            malformed_entries: imported.malformed_entries,
        })
    }

    fn export(&self, app: &App, ctx: &mut ExportContext<'_>) -> Result<Output> {
        Ok(Output::Archive(export::render(app, ctx)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archive::Entries;
    use crate::codec::Documents;
    use crate::config::TranscoderConfig;
    use crate::error::TranscodeError;
    use crate::ids::SequentialIds;
    use crate::ir::{AppInfo, Entity, EntityValue, Expression};
    use crate::span::Span;
    use chrono::TimeZone;
    use serde_json::{json, Value};

    fn options() -> ImportOptions {
        ImportOptions {
            language: "fr".to_string(),
            version: "20240101".to_string(),
        }
    }

    fn entry(entries: &mut Entries, name: &str, value: Value) {
        entries.insert(name.to_string(), serde_json::to_vec(&value).unwrap());
    }

    fn agent_archive() -> Entries {
        let mut entries = Entries::new();
        entry(&mut entries, "package.json", json!({"version": "1.0.0"}));
        entry(
            &mut entries,
            "agent.json",
            json!({
                "description": "Trips",
                "language": "en",
                "googleAssistant": {"project": "travel"}
            }),
        );
        entry(
            &mut entries,
            "intents/book.json",
            json!({
                "name": "book",
                "responses": [{"parameters": [{"name": "city"}, {"name": "date"}]}]
            }),
        );
        entry(
            &mut entries,
            "intents/book_usersays_en.json",
            json!([
                {"data": [
                    {"text": "fly to "},
                    {"text": "Paris", "alias": "city", "meta": "@city"}
                ]},
                {"data": [
                    {"text": "fly to "},
                    {"text": "Paname", "alias": "city"},
                    {"text": " now"}
                ]},
                {"data": [{"text": "go to "}, {"text": "Lyon", "alias": "town"}]},
                {"data": [{"text": "go to "}, {"text": "", "alias": "town"}]}
            ]),
        );
        entry(
            &mut entries,
            "intents/book_usersays_de.json",
            json!([{"data": [{"text": "nach Berlin"}]}]),
        );
        entry(
            &mut entries,
            "intents/Default Fallback Intent.json",
            json!({"name": "Default Fallback Intent", "fallbackIntent": true}),
        );
        entry(&mut entries, "entities/city.json", json!({"id": "e-1", "name": "city"}));
        entry(
            &mut entries,
            "entities/city_entries_en.json",
            json!([{"value": "Paris", "synonyms": ["Paris", "Paname"]}]),
        );
        entry(&mut entries, "entities/mood.json", json!({"name": "mood"}));
        entries
    }

    #[test]
    fn test_import_metadata() {
        let imported = Dialogflow.import(&Source::Archive(agent_archive()), &options()).unwrap();
        let app = &imported.app;

        assert_eq!(app.name(), "travel");
        assert_eq!(app.info().description, "Trips");
        assert_eq!(app.language(), "en");
        assert_eq!(app.info().version, "1.0.0");
        assert_eq!(app.intent_names().collect::<Vec<_>>(), vec!["book"]);
    }

    #[test]
    fn test_import_joins_segments() {
        let imported = Dialogflow.import(&Source::Archive(agent_archive()), &options()).unwrap();
        let expressions = imported.app.expressions();

        assert_eq!(expressions.len(), 3);
        assert_eq!(expressions[1].text, "fly to Paname now");
        let span = expressions[1].entity_annotations().next().unwrap();
        assert_eq!(span.value, "Paname");
        assert_eq!(span.span, Some(Span::new(7, 13)));

        assert_eq!(imported.skipped.len(), 1);
        assert_eq!(imported.skipped[0].phrase, "go to ");
    }

    #[test]
    fn test_resolve_entities() {
        let imported = Dialogflow.import(&Source::Archive(agent_archive()), &options()).unwrap();
        let app = &imported.app;

        let names: Vec<&str> = app.entities().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["city", "mood", "date", "town"]);

        let city = app.entity("city").unwrap();
        assert_eq!(city.id, "e-1");
        assert_eq!(city.values, vec![EntityValue::new("Paris").with_synonyms(["Paname"])]);

        assert!(app.entity("mood").unwrap().is_free_text());
        assert!(app.entity("date").unwrap().is_free_text());
        assert_eq!(app.entity("town").unwrap().values, vec![EntityValue::new("Lyon")]);
    }

    #[test]
    fn test_discovered_values() {
        let mut entries = Entries::new();
        entry(
            &mut entries,
            "intents/order_usersays_en.json",
            json!([
                {"data": [{"text": "a "}, {"text": "margherita", "alias": "pizza"}]},
                {"data": [{"text": "a "}, {"text": "regina", "alias": "pizza"}]},
                {"data": [{"text": "a "}, {"text": "margherita", "alias": "pizza"}]}
            ]),
        );
        let documents = Documents::decode(&entries);

        let harvest = import::harvest(&documents, "en");
        assert_eq!(harvest.expressions.len(), 3);
        assert_eq!(harvest.discovered_values["pizza"].len(), 3);

        let entities = import::resolve(&documents, &harvest, "en");
        assert_eq!(entities.len(), 1);
        assert_eq!(
            entities[0].values,
            vec![EntityValue::new("margherita").with_synonyms(["regina"])]
        );
    }

    #[test]
    fn test_regional_locale() {
        let mut entries = Entries::new();
        entry(
            &mut entries,
            "agent.json",
            json!({"language": "es-419", "googleAssistant": {"project": "pizzería"}}),
        );
        entry(&mut entries, "intents/pedir.json", json!({"name": "pedir"}));
        entry(
            &mut entries,
            "intents/pedir_usersays_es-419.json",
            json!([{"data": [{"text": "quiero "}, {"text": "pizza", "alias": "comida"}]}]),
        );
        entry(&mut entries, "entities/comida.json", json!({"name": "comida"}));
        entry(
            &mut entries,
            "entities/comida_entries_es-419.json",
            json!([{"value": "pizza", "synonyms": ["pizza", "pizzas"]}]),
        );

        let imported = Dialogflow.import(&Source::Archive(entries), &options()).unwrap();
        let app = &imported.app;

        assert!(imported.malformed_entries.is_empty());
        assert_eq!(app.language(), "es-419");
        assert_eq!(app.expressions().len(), 1);
        assert_eq!(app.expressions()[0].text, "quiero pizza");
        assert_eq!(
            app.entity("comida").unwrap().values,
            vec![EntityValue::new("pizza").with_synonyms(["pizzas"])]
        );
    }

    #[test]
    fn test_missing_agent_is_fatal() {
        let mut entries = agent_archive();
        entries.shift_remove("agent.json");
        assert!(matches!(
            Dialogflow.import(&Source::Archive(entries), &options()),
            Err(TranscodeError::MissingEntry(_))
        ));
    }

    fn app() -> App {
        let mut app = App::new(AppInfo {
            name: "travel".to_string(),
            description: "Trips".to_string(),
            language: "en".to_string(),
            version: "2".to_string(),
        });
        app.add_entity(Entity::new("city", "en").with_values(vec![EntityValue::new("Paris")]))
            .unwrap();
        app.add_entity(Entity::new("note", "en")).unwrap();
        app.add_intent("greet");
        let expression = Expression::new("fly to Paris now", "book")
            .with_span("city", "Paris", Span::new(7, 12));
        app.add_expression(expression).unwrap();
        app
    }

    fn render(app: &App) -> Entries {
        let config = TranscoderConfig::default();
        let mut ids = SequentialIds::new();
        let mut ctx = ExportContext {
            ids: &mut ids,
            timestamp: chrono::Utc.timestamp_opt(1_490_879_523, 0).unwrap(),
            base_name: "travel".to_string(),
            config: &config,
        };
        export::render(app, &mut ctx).unwrap()
    }

    fn parse(entries: &Entries, name: &str) -> Value {
        serde_json::from_slice(&entries[name]).unwrap()
    }

    #[test]
    fn test_render_layout() {
        let entries = render(&app());
        let names: Vec<&str> = entries.keys().map(String::as_str).collect();
        assert_eq!(
            names,
            vec![
                "package.json",
                "agent.json",
                "entities/city.json",
                "entities/city_entries_en.json",
                "entities/note.json",
                "entities/note_entries_en.json",
                "intents/greet.json",
                "intents/greet_usersays_en.json",
                "intents/book.json",
                "intents/book_usersays_en.json",
                "intents/Default Fallback Intent.json",
            ]
        );
    }

    #[test]
    fn test_render_agent() {
        let agent = parse(&render(&app()), "agent.json");
        assert_eq!(agent["language"], "en");
        assert_eq!(agent["googleAssistant"]["project"], "travel");
        assert_eq!(agent["googleAssistant"]["oAuthLinking"]["grantType"], "AUTH_CODE_GRANT");
        assert_eq!(agent["defaultTimezone"], "Europe/Paris");
        assert_eq!(agent["mlMinConfidence"], json!(0.2));
        assert_eq!(agent["webhook"]["headers"], json!({"": ""}));
    }

    #[test]
    fn test_render_intents() {
        let entries = render(&app());

        let book = parse(&entries, "intents/book.json");
        assert_eq!(book["priority"], json!(1_000_000));
        assert_eq!(book["lastUpdate"], json!(1_490_879_523));
        assert_eq!(book["responses"][0]["parameters"][0]["dataType"], "@city");
        assert_eq!(book["responses"][0]["parameters"][0]["value"], "$city");

        let usersays = parse(&entries, "intents/book_usersays_en.json");
        assert_eq!(
            usersays[0]["data"],
            json!([
                {"text": "fly to ", "userDefined": false},
                {"text": "Paris", "alias": "city", "meta": "@city", "userDefined": false},
                {"text": " now", "userDefined": false}
            ])
        );

        let greet = parse(&entries, "intents/greet_usersays_en.json");
        assert_eq!(greet, json!([]));

        let fallback = parse(&entries, "intents/Default Fallback Intent.json");
        assert_eq!(fallback["fallbackIntent"], json!(true));
        assert_eq!(fallback["priority"], json!(500_000));
        assert_eq!(fallback["responses"][0]["action"], "input.unknown");
    }

    #[test]
    fn test_render_ids_are_injected() {
        let entries = render(&app());
        let city = parse(&entries, "entities/city.json");
        assert_eq!(city["id"], "00000000-0000-4000-8000-000000000001");

        let note_entries = parse(&entries, "entities/note_entries_en.json");
        assert_eq!(note_entries, json!([]));
    }

    #[test]
    fn test_round_trip() {
        let imported = Dialogflow.import(&Source::Archive(render(&app())), &options()).unwrap();

        assert_eq!(imported.app.expressions(), app().expressions());
        let names: Vec<String> = imported.app.entities().map(|e| e.name.clone()).collect();
        assert_eq!(names, vec!["city", "note"]);
        assert_eq!(imported.app.entity("city").unwrap().values, vec![EntityValue::new("Paris")]);
        assert_eq!(imported.app.intent_names().collect::<Vec<_>>(), vec!["greet", "book"]);
    }
}
