//! App → DialogFlow agent archive.

use indexmap::{IndexMap, IndexSet};
use serde_json::Value;

use super::model::{
    Agent, EntityDefinition, EntityEntry, GoogleAssistant, IntentDocument, OAuthLinking,
    PackageDocument, Parameter, Response, UserSays, UserSaysSegment, Webhook,
};
use super::{AGENT_ENTRY, FALLBACK_INTENT, PACKAGE_ENTRY};
use crate::archive::Entries;
use crate::codec::to_vendor_json;
use crate::error::Result;
use crate::formats::ExportContext;
use crate::ir::{App, Entity, IntentAttribution};

const INTENT_PRIORITY: i64 = 1_000_000;
const FALLBACK_PRIORITY: i64 = 500_000;

/// Render the app as a flat agent archive.
///
/// Entry order: `package.json`, `agent.json`, each entity with its entries,
/// each intent with its usersays, then the fallback intent.
pub fn render(app: &App, ctx: &mut ExportContext<'_>) -> Result<Entries> {
    let language = app.language();
    let timestamp = ctx.timestamp.timestamp();
    let mut entries = Entries::new();

    let package = PackageDocument {
        version: app.info().version.clone(),
    };
    entries.insert(PACKAGE_ENTRY.to_string(), to_vendor_json(&package)?);
    entries.insert(AGENT_ENTRY.to_string(), to_vendor_json(&agent(app, ctx))?);

    for entity in app.entities() {
        let (definition, values) = entity_documents(entity, ctx);
        entries.insert(format!("entities/{}.json", entity.name), to_vendor_json(&definition)?);
        entries.insert(
            format!("entities/{}_entries_{}.json", entity.name, language),
            to_vendor_json(&values)?,
        );
    }

    for attribution in app.attributions() {
        let definition = intent_document(&attribution, ctx, timestamp);
        let phrases = usersays(&attribution, ctx, timestamp);
        entries.insert(
            format!("intents/{}.json", attribution.intent),
            to_vendor_json(&definition)?,
        );
        entries.insert(
            format!("intents/{}_usersays_{}.json", attribution.intent, language),
            to_vendor_json(&phrases)?,
        );
    }

    entries.insert(
        format!("intents/{}.json", FALLBACK_INTENT),
        to_vendor_json(&fallback_intent(ctx))?,
    );

    Ok(entries)
}

fn agent(app: &App, ctx: &ExportContext<'_>) -> Agent {
    let mut headers = IndexMap::new();
    headers.insert(String::new(), String::new());

    Agent {
        description: app.info().description.clone(),
        language: app.language().to_string(),
        active_assistant_agents: Vec::new(),
        disable_interaction_logs: false,
        disable_stackdriver_logs: true,
        google_assistant: GoogleAssistant {
            google_assistant_compatible: true,
            project: app.name().to_string(),
            welcome_intent_sign_in_required: false,
            start_intents: Vec::new(),
            system_intents: Vec::new(),
            end_intent_ids: Vec::new(),
            o_auth_linking: OAuthLinking {
                required: false,
                grant_type: "AUTH_CODE_GRANT".to_string(),
            },
            voice_type: "MALE_1".to_string(),
            capabilities: Vec::new(),
            protocol_version: "V1".to_string(),
            is_device_agent: false,
        },
        default_timezone: ctx.config.dialogflow.timezone.clone(),
        webhook: Webhook {
            url: None,
            headers,
            available: true,
            use_for_domains: false,
            cloud_functions_enabled: false,
            cloud_functions_initialized: false,
        },
        is_private: true,
        custom_classifier_mode: "use.after".to_string(),
        ml_min_confidence: ctx.config.dialogflow.ml_min_confidence,
        supported_languages: Vec::new(),
        one_platform_api_version: "v2".to_string(),
        analyze_query_text_sentiment: false,
    }
}

fn entity_documents(
    entity: &Entity,
    ctx: &mut ExportContext<'_>,
) -> (EntityDefinition, Vec<EntityEntry>) {
    let definition = EntityDefinition {
        id: ctx.ids.next_id(),
        name: entity.name.clone(),
        is_overridable: true,
        is_enum: false,
        automated_expansion: false,
    };
    let values = entity
        .values
        .iter()
        .map(|v| {
            let mut synonyms: IndexSet<String> = IndexSet::new();
            synonyms.insert(v.value.clone());
            synonyms.extend(v.synonyms.iter().cloned());
            EntityEntry {
                value: v.value.clone(),
                synonyms: synonyms.into_iter().collect(),
            }
        })
        .collect();
    (definition, values)
}

fn intent_document(
    attribution: &IntentAttribution<'_>,
    ctx: &mut ExportContext<'_>,
    timestamp: i64,
) -> IntentDocument {
    let id = ctx.ids.next_id();
    let parameters = attribution
        .entities
        .iter()
        .map(|entity| Parameter {
            id: ctx.ids.next_id(),
            required: true,
            data_type: format!("@{}", entity),
            name: entity.to_string(),
            value: format!("${}", entity),
            is_list: false,
        })
        .collect();

    IntentDocument {
        id,
        name: attribution.intent.to_string(),
        auto: true,
        contexts: Vec::new(),
        responses: vec![Response {
            reset_contexts: false,
            action: None,
            affected_contexts: Vec::new(),
            parameters,
            messages: Vec::new(),
            default_response_platforms: Value::Array(Vec::new()),
            speech: Value::Array(Vec::new()),
        }],
        priority: INTENT_PRIORITY,
        webhook_used: false,
        webhook_for_slot_filling: false,
        last_update: Some(timestamp),
        fallback_intent: false,
        events: Vec::new(),
    }
}

fn usersays(
    attribution: &IntentAttribution<'_>,
    ctx: &mut ExportContext<'_>,
    timestamp: i64,
) -> Vec<UserSays> {
    let mut phrases = Vec::with_capacity(attribution.phrases.len());

    for phrase in &attribution.phrases {
        let segments = match phrase.segments() {
            Ok(segments) => segments,
            Err(e) => {
                tracing::warn!("Skipping phrase \"{}\": {}", phrase.text, e);
                continue;
            }
        };

        phrases.push(UserSays {
            id: ctx.ids.next_id(),
            data: segments
                .into_iter()
                .map(|segment| UserSaysSegment {
                    meta: segment.alias.as_ref().map(|alias| format!("@{}", alias)),
                    alias: segment.alias,
                    text: segment.text,
                    user_defined: false,
                })
                .collect(),
            is_template: false,
            count: 1,
            updated: timestamp,
        });
    }

    phrases
}

fn fallback_intent(ctx: &mut ExportContext<'_>) -> IntentDocument {
    IntentDocument {
        id: ctx.ids.next_id(),
        name: FALLBACK_INTENT.to_string(),
        auto: true,
        contexts: Vec::new(),
        responses: vec![Response {
            reset_contexts: false,
            action: Some("input.unknown".to_string()),
            affected_contexts: Vec::new(),
            parameters: Vec::new(),
            messages: Vec::new(),
            default_response_platforms: Value::Array(Vec::new()),
            speech: Value::Array(Vec::new()),
        }],
        priority: FALLBACK_PRIORITY,
        webhook_used: false,
        webhook_for_slot_filling: false,
        last_update: None,
        fallback_intent: true,
        events: Vec::new(),
    }
}
