//! Alexa skill interaction model: one JSON document with slot-template samples.

pub mod export;
pub mod import;
pub mod model;

use crate::codec;
use crate::error::Result;
use crate::formats::{wrong_source, ExportContext, Format, ImportOptions, Imported, Vendor};
use crate::ir::App;
use crate::source::{Output, Source};

pub use model::SkillDocument;

/// Built-in intents dropped on import and synthesized, empty, on export.
pub const SYSTEM_INTENTS: [&str; 4] = [
    "AMAZON.FallbackIntent",
    "AMAZON.CancelIntent",
    "AMAZON.HelpIntent",
    "AMAZON.StopIntent",
];

/// Value bound to slots whose type declares no values.
pub const PLACEHOLDER: &str = "PLACEHOLDER";

#[derive(Debug, Clone, Copy, Default)]
pub struct Alexa;

impl Vendor for Alexa {
    fn format(&self) -> Format {
        Format::Alexa
    }

    fn import(&self, source: &Source, options: &ImportOptions) -> Result<Imported> {
        let (name, bytes) = match source {
            Source::Document { name, bytes } => (name, bytes),
            Source::Archive(_) => return Err(wrong_source(Format::Alexa, source)),
        };

        let value = codec::parse(name, bytes)?;
        let document: SkillDocument = codec::from_value(name, bytes.len(), value)?;
        let (app, skipped) = import::build_app(document, options)?;

        tracing::info!(
            "Imported skill {}: {} entities, {} intents, {} expressions",
            app.name(),
            app.entity_count(),
            app.intent_count(),
            app.expressions().len()
        );

        Ok(Imported {
            format: Format::Alexa,
            app,
            skipped,
            malformed_entries: Vec::new(),
        })
    }

    fn export(&self, app: &App, ctx: &mut ExportContext<'_>) -> Result<Output> {
        let document = export::render(app, &ctx.config.alexa);
        Ok(Output::Document(codec::to_vendor_json(&document)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formats::alexa::model::Slot;
    use crate::config::{AlexaConfig, TranscoderConfig};
    use crate::error::{SpanError, TranscodeError};
    use crate::ids::SequentialIds;
    use crate::ir::AppInfo;
    use crate::span::Span;
    use serde_json::json;

    fn options() -> ImportOptions {
        ImportOptions {
            language: "en".to_string(),
            version: "20240101".to_string(),
        }
    }

    fn skill() -> serde_json::Value {
        json!({
            "interactionModel": {
                "languageModel": {
                    "invocationName": "pizza shop",
                    "intents": [
                        {"name": "AMAZON.StopIntent", "samples": []},
                        {
                            "name": "OrderPizza",
                            "slots": [
                                {"name": "size", "type": "PizzaSize"},
                                {"name": "when", "type": "AMAZON.DATE"}
                            ],
                            "samples": [
                                "I want a {size} pizza",
                                "deliver on {when}",
                                "a {crust} crust"
                            ]
                        }
                    ],
                    "types": [
                        {
                            "name": "PizzaSize",
                            "values": [
                                {"name": {"value": "large", "synonyms": ["big", "huge"]}},
                                {"name": {"value": "small"}}
                            ]
                        }
                    ]
                },
                "dialog": {"intents": []}
            }
        })
    }

    fn import(value: serde_json::Value) -> Result<Imported> {
        let source = Source::Document {
            name: "skill.json".to_string(),
            bytes: serde_json::to_vec(&value).unwrap(),
        };
        Alexa.import(&source, &options())
    }

    #[test]
    fn test_import_expands_samples_with_default_values() {
        let imported = import(skill()).unwrap();
        let app = &imported.app;

        assert_eq!(app.name(), "pizza shop");
        assert_eq!(app.language(), "en");
        assert_eq!(app.info().version, "20240101");
        assert_eq!(app.intent_names().collect::<Vec<_>>(), vec!["OrderPizza"]);

        let first = &app.expressions()[0];
        assert_eq!(first.text, "I want a large pizza");
        assert_eq!(first.intent(), Some("OrderPizza"));
        let span = first.entity_annotations().next().unwrap();
        assert_eq!(span.entity, "PizzaSize");
        assert_eq!(span.value, "large");
        assert_eq!(span.span, Some(Span::new(9, 14)));
    }

    #[test]
    fn test_builtin_slot_type_gets_placeholder() {
        let imported = import(skill()).unwrap();
        let date = imported.app.entity("AMAZON_DATE").unwrap();

        assert_eq!(date.values.len(), 1);
        assert_eq!(date.values[0].value, PLACEHOLDER);
        assert!(imported.app.entity("AMAZON.DATE").is_none());

        let second = &imported.app.expressions()[1];
        assert_eq!(second.text, "deliver on PLACEHOLDER");
        assert_eq!(second.entity_annotations().next().unwrap().entity, "AMAZON_DATE");
    }

    #[test]
    fn test_undeclared_slot_skips_only_that_sample() {
        let imported = import(skill()).unwrap();

        assert_eq!(imported.app.expressions().len(), 2);
        assert_eq!(imported.skipped.len(), 1);
        assert_eq!(imported.skipped[0].phrase, "a {crust} crust");
        assert!(matches!(
            &imported.skipped[0].error,
            SpanError::UnknownSlot { slot, .. } if slot == "crust"
        ));
    }

    #[test]
    fn test_import_rejects_archive() {
        let source = Source::Archive(Default::default());
        assert!(matches!(
            Alexa.import(&source, &options()),
            Err(TranscodeError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_import_malformed_document() {
        let source = Source::Document {
            name: "skill.json".to_string(),
            bytes: b"{\"interactionModel\": ".to_vec(),
        };
        assert!(matches!(
            Alexa.import(&source, &options()),
            Err(TranscodeError::MalformedDocument { .. })
        ));
    }

    fn travel_app() -> App {
        let mut app = App::new(AppInfo {
            name: "travel".to_string(),
            language: "en".to_string(),
            ..Default::default()
        });
        app.add_entity(crate::ir::Entity::new("city", "en")).unwrap();
        app.add_intent("cancel");
        for (text, end) in [("Fly to Paris!", 12), ("fly to Paris", 12), ("FLY TO Rome.", 11)] {
            let expression = crate::ir::Expression::new(text, "book").with_span(
                "city",
                &text[7..end],
                Span::new(7, end),
            );
            app.add_expression(expression).unwrap();
        }
        app
    }

    #[test]
    fn test_render_samples_and_system_intents() {
        let document = export::render(&travel_app(), &AlexaConfig::default());
        let intents = &document.interaction_model.language_model.intents;

        let names: Vec<&str> = intents.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(&names[..4], &SYSTEM_INTENTS[..]);
        assert!(intents[..4].iter().all(|i| i.samples.is_empty() && i.slots.is_none()));

        let cancel = &intents[4];
        assert_eq!(cancel.name, "cancel");
        assert!(cancel.samples.is_empty());

        let book = &intents[5];
        assert_eq!(book.samples, vec!["fly to {city}".to_string()]);
        assert_eq!(
            book.slots,
            Some(vec![Slot {
                name: "city".to_string(),
                slot_type: "city".to_string()
            }])
        );

        let dialog = &document.interaction_model.dialog.intents;
        assert_eq!(dialog.len(), 2);
        assert!(!dialog[1].slots[0].elicitation_required);

        let types = &document.interaction_model.language_model.types;
        assert_eq!(types[0].name, "city");
        assert!(types[0].values.is_empty());
    }

    #[test]
    fn test_render_without_normalization() {
        let config = AlexaConfig {
            normalize_samples: false,
        };
        let document = export::render(&travel_app(), &config);
        let book = &document.interaction_model.language_model.intents[5];
        assert_eq!(book.samples, vec!["Fly to {city}!", "fly to {city}", "FLY TO {city}."]);
    }

    #[test]
    fn test_render_skips_phrases_with_literal_braces() {
        let mut app = travel_app();
        app.add_expression(
            crate::ir::Expression::new("fly to Paris {now}", "book")
                .with_span("city", "Paris", Span::new(7, 12)),
        )
        .unwrap();
        app.add_expression(crate::ir::Expression::new("cancel } it", "cancel")).unwrap();

        let document = export::render(&app, &AlexaConfig::default());
        let intents = &document.interaction_model.language_model.intents;
        assert!(intents[4].samples.is_empty());
        assert_eq!(intents[5].samples, vec!["fly to {city}".to_string()]);
    }

    #[test]
    fn test_export_is_vendor_json() {
        let config = TranscoderConfig::default();
        let mut ids = SequentialIds::new();
        let mut ctx = ExportContext {
            ids: &mut ids,
            timestamp: chrono::Utc::now(),
            base_name: "travel".to_string(),
            config: &config,
        };

        match Alexa.export(&travel_app(), &mut ctx).unwrap() {
            Output::Document(bytes) => {
                let text = String::from_utf8(bytes).unwrap();
                assert!(text.starts_with("{\n  \"interactionModel\" : {"));
                assert!(text.contains("\"invocationName\" : \"travel\""));
            }
            Output::Archive(_) => panic!("expected a single document"),
        }
    }
}
