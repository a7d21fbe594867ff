//! Skill document → App.
//!
//! Samples are slot templates; each one is expanded with the default value
//! of its slot's type so the resulting expression carries real text and
//! char spans.

use std::collections::HashMap;

use indexmap::IndexMap;

use super::model::{Intent, SkillDocument, SlotType};
use super::{PLACEHOLDER, SYSTEM_INTENTS};
use crate::error::Result;
use crate::formats::{ImportOptions, SkippedPhrase};
use crate::ir::{sanitize_name, App, AppInfo, Entity, EntityValue, Expression};
use crate::span;

/// Build the app from a parsed skill document.
///
/// # Errors
///
/// Only IR invariant violations are returned; samples that cannot be
/// expanded are skipped and returned alongside the app.
pub fn build_app(
    document: SkillDocument,
    options: &ImportOptions,
) -> Result<(App, Vec<SkippedPhrase>)> {
    let model = document.interaction_model;
    let language_model = model.language_model;

    let mut app = App::new(AppInfo {
        name: language_model.invocation_name.clone(),
        description: String::new(),
        language: options.language.clone(),
        version: options.version.clone(),
    });

    // Slot name → slot type, across every declaration in the document.
    let mut slot_types: IndexMap<String, String> = IndexMap::new();
    for intent in &model.dialog.intents {
        for slot in &intent.slots {
            slot_types.insert(slot.name.clone(), slot.slot_type.clone());
        }
    }
    for (name, slot_type) in language_model.intents.iter().flat_map(intent_slots) {
        slot_types.insert(name.to_string(), slot_type.to_string());
    }

    let entities = collect_entities(&language_model.types, slot_types.values(), &options.language);
    let defaults: HashMap<String, String> = entities
        .iter()
        .map(|(type_name, entity)| {
            let value = entity.default_value().unwrap_or(PLACEHOLDER).to_string();
            (type_name.clone(), value)
        })
        .collect();

    for (_, entity) in entities {
        app.add_entity(entity)?;
    }

    let mut skipped = Vec::new();
    for intent in &language_model.intents {
        if SYSTEM_INTENTS.contains(&intent.name.as_str()) {
            tracing::debug!("Skipping built-in intent {}", intent.name);
            continue;
        }
        let intent_name = sanitize_name(&intent.name);
        app.add_intent(intent_name.clone());

        // An intent's own slot declarations win over the document-wide map.
        let own: HashMap<&str, &str> = intent_slots(intent).collect();
        let type_of = |slot: &str| -> Option<String> {
            own.get(slot)
                .map(|t| t.to_string())
                .or_else(|| slot_types.get(slot).cloned())
        };

        for sample in &intent.samples {
            let expanded = span::expand(sample, |slot| {
                type_of(slot).and_then(|t| defaults.get(&t).cloned())
            });
            match expanded {
                Ok(expanded) => {
                    let expression =
                        Expression::from_expanded(intent_name.clone(), expanded, |slot| {
                            sanitize_name(&type_of(slot).unwrap_or_else(|| slot.to_string()))
                        });
                    app.add_expression(expression)?;
                }
                Err(e) => skipped.push(SkippedPhrase::record(sample.clone(), e)),
            }
        }
    }

    Ok((app, skipped))
}

fn intent_slots(intent: &Intent) -> impl Iterator<Item = (&str, &str)> {
    intent
        .slots
        .iter()
        .flatten()
        .map(|slot| (slot.name.as_str(), slot.slot_type.as_str()))
}

/// Entities keyed by their raw type name: declared types first, then the
/// slot types with no declaration (built-ins such as `AMAZON.DATE`).
fn collect_entities<'a, I>(
    types: &[SlotType],
    slot_types: I,
    language: &str,
) -> IndexMap<String, Entity>
where
    I: IntoIterator<Item = &'a String>,
{
    let mut entities = IndexMap::new();

    for slot_type in types {
        let values = slot_type
            .values
            .iter()
            .map(|v| EntityValue::new(v.name.value.clone()).with_synonyms(v.name.synonyms.clone()))
            .collect();
        let entity = Entity::new(sanitize_name(&slot_type.name), language).with_values(values);
        entities.insert(slot_type.name.clone(), entity);
    }

    for type_name in slot_types {
        if !entities.contains_key(type_name) {
            let entity = Entity::new(sanitize_name(type_name), language)
                .with_values(vec![EntityValue::new(PLACEHOLDER)]);
            entities.insert(type_name.clone(), entity);
        }
    }

    entities
}
