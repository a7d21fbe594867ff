//! Serde models of a DialogFlow agent export.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::formats::lenient_string;

/// `package.json`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PackageDocument {
    #[serde(default, deserialize_with = "lenient_string")]
    pub version: String,
}

/// `agent.json`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Agent {
    #[serde(default, deserialize_with = "lenient_string")]
    pub description: String,
    #[serde(default)]
    pub language: String,
    #[serde(default)]
    pub active_assistant_agents: Vec<Value>,
    #[serde(default)]
    pub disable_interaction_logs: bool,
    #[serde(default)]
    pub disable_stackdriver_logs: bool,
    #[serde(default)]
    pub google_assistant: GoogleAssistant,
    #[serde(default)]
    pub default_timezone: String,
    #[serde(default)]
    pub webhook: Webhook,
    #[serde(default)]
    pub is_private: bool,
    #[serde(default)]
    pub custom_classifier_mode: String,
    #[serde(default)]
    pub ml_min_confidence: f64,
    #[serde(default)]
    pub supported_languages: Vec<String>,
    #[serde(default)]
    pub one_platform_api_version: String,
    #[serde(default)]
    pub analyze_query_text_sentiment: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoogleAssistant {
    #[serde(default)]
    pub google_assistant_compatible: bool,
    #[serde(default, deserialize_with = "lenient_string")]
    pub project: String,
    #[serde(default)]
    pub welcome_intent_sign_in_required: bool,
    #[serde(default)]
    pub start_intents: Vec<Value>,
    #[serde(default)]
    pub system_intents: Vec<Value>,
    #[serde(default)]
    pub end_intent_ids: Vec<Value>,
    #[serde(default)]
    pub o_auth_linking: OAuthLinking,
    #[serde(default)]
    pub voice_type: String,
    #[serde(default)]
    pub capabilities: Vec<Value>,
    #[serde(default)]
    pub protocol_version: String,
    #[serde(default)]
    pub is_device_agent: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OAuthLinking {
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub grant_type: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Webhook {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub headers: IndexMap<String, String>,
    #[serde(default)]
    pub available: bool,
    #[serde(default)]
    pub use_for_domains: bool,
    #[serde(default)]
    pub cloud_functions_enabled: bool,
    #[serde(default)]
    pub cloud_functions_initialized: bool,
}

/// `intents/<name>.json`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntentDocument {
    #[serde(default)]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub auto: bool,
    #[serde(default)]
    pub contexts: Vec<Value>,
    #[serde(default)]
    pub responses: Vec<Response>,
    #[serde(default)]
    pub priority: i64,
    #[serde(default)]
    pub webhook_used: bool,
    #[serde(default)]
    pub webhook_for_slot_filling: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_update: Option<i64>,
    #[serde(default)]
    pub fallback_intent: bool,
    #[serde(default)]
    pub events: Vec<Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Response {
    #[serde(default)]
    pub reset_contexts: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
    #[serde(default)]
    pub affected_contexts: Vec<Value>,
    #[serde(default)]
    pub parameters: Vec<Parameter>,
    #[serde(default)]
    pub messages: Vec<Value>,
    #[serde(default = "empty_list")]
    pub default_response_platforms: Value,
    #[serde(default = "empty_list")]
    pub speech: Value,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Parameter {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub data_type: String,
    pub name: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub value: String,
    #[serde(default)]
    pub is_list: bool,
}

/// One entry of `intents/<name>_usersays_<lang>.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSays {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub data: Vec<UserSaysSegment>,
    #[serde(default)]
    pub is_template: bool,
    #[serde(default)]
    pub count: i64,
    #[serde(default)]
    pub updated: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSaysSegment {
    #[serde(deserialize_with = "lenient_string")]
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<String>,
    #[serde(default)]
    pub user_defined: bool,
}

/// `entities/<name>.json`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityDefinition {
    #[serde(default)]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub is_overridable: bool,
    #[serde(default)]
    pub is_enum: bool,
    #[serde(default)]
    pub automated_expansion: bool,
}

/// One entry of `entities/<name>_entries_<lang>.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityEntry {
    #[serde(deserialize_with = "lenient_string")]
    pub value: String,
    #[serde(default)]
    pub synonyms: Vec<String>,
}

fn empty_list() -> Value {
    Value::Array(Vec::new())
}
