//! App → skill document.

use indexmap::IndexSet;

use super::model::{
    no_prompts, Dialog, DialogIntent, DialogSlot, Intent, InteractionModel, LanguageModel,
    SkillDocument, Slot, SlotType, TypeValue, TypeValueName,
};
use super::SYSTEM_INTENTS;
use crate::config::AlexaConfig;
use crate::ir::{App, IntentAttribution};
use crate::normalize;

/// Render the app as a skill document.
///
/// Every entity becomes a slot type and a slot of the same name. Phrases
/// whose spans cannot be collapsed into a template are logged and left out.
pub fn render(app: &App, config: &AlexaConfig) -> SkillDocument {
    let mut intents: Vec<Intent> = SYSTEM_INTENTS
        .iter()
        .map(|name| Intent {
            name: name.to_string(),
            slots: None,
            samples: Vec::new(),
        })
        .collect();
    let mut dialog_intents = Vec::new();

    for attribution in app.attributions() {
        let slots: Vec<Slot> = attribution
            .entities
            .iter()
            .map(|entity| Slot {
                name: entity.to_string(),
                slot_type: entity.to_string(),
            })
            .collect();

        dialog_intents.push(DialogIntent {
            name: attribution.intent.to_string(),
            confirmation_required: false,
            prompts: no_prompts(),
            slots: slots
                .iter()
                .map(|slot| DialogSlot {
                    name: slot.name.clone(),
                    slot_type: slot.slot_type.clone(),
                    confirmation_required: false,
                    elicitation_required: false,
                    prompts: no_prompts(),
                })
                .collect(),
        });

        intents.push(Intent {
            name: attribution.intent.to_string(),
            slots: Some(slots),
            samples: samples(&attribution, config),
        });
    }

    let types = app
        .entities()
        .map(|entity| SlotType {
            name: entity.name.clone(),
            values: entity
                .values
                .iter()
                .map(|v| TypeValue {
                    name: TypeValueName {
                        value: v.value.clone(),
                        synonyms: v.synonyms.clone(),
                    },
                })
                .collect(),
        })
        .collect();

    SkillDocument {
        interaction_model: InteractionModel {
            language_model: LanguageModel {
                invocation_name: app.name().to_string(),
                intents,
                types,
            },
            dialog: Dialog { intents: dialog_intents },
        },
    }
}

/// Collapsed, normalized and deduplicated samples of one intent.
fn samples(attribution: &IntentAttribution<'_>, config: &AlexaConfig) -> Vec<String> {
    let mut samples = IndexSet::new();

    for phrase in &attribution.phrases {
        match phrase.template() {
            Ok(template) if config.normalize_samples => {
                samples.insert(normalize::alexa_sample(&template));
            }
            Ok(template) => {
                samples.insert(template);
            }
            Err(e) => tracing::warn!("Skipping phrase \"{}\": {}", phrase.text, e),
        }
    }

    samples.into_iter().collect()
}
