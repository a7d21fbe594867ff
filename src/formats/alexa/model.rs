//! Serde models of an Alexa skill interaction model.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::formats::lenient_string;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillDocument {
    pub interaction_model: InteractionModel,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InteractionModel {
    pub language_model: LanguageModel,
    #[serde(default)]
    pub dialog: Dialog,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LanguageModel {
    #[serde(default, deserialize_with = "lenient_string")]
    pub invocation_name: String,
    #[serde(default)]
    pub intents: Vec<Intent>,
    #[serde(default)]
    pub types: Vec<SlotType>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Intent {
    pub name: String,
    /// Built-in intents are written without a `slots` key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slots: Option<Vec<Slot>>,
    #[serde(default)]
    pub samples: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
    pub name: String,
    #[serde(rename = "type")]
    pub slot_type: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SlotType {
    pub name: String,
    #[serde(default)]
    pub values: Vec<TypeValue>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypeValue {
    pub name: TypeValueName,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypeValueName {
    #[serde(deserialize_with = "lenient_string")]
    pub value: String,
    #[serde(default)]
    pub synonyms: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Dialog {
    #[serde(default)]
    pub intents: Vec<DialogIntent>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DialogIntent {
    pub name: String,
    #[serde(default)]
    pub confirmation_required: bool,
    #[serde(default = "no_prompts")]
    pub prompts: Value,
    #[serde(default)]
    pub slots: Vec<DialogSlot>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DialogSlot {
    pub name: String,
    #[serde(rename = "type")]
    pub slot_type: String,
    #[serde(default)]
    pub confirmation_required: bool,
    #[serde(default)]
    pub elicitation_required: bool,
    #[serde(default = "no_prompts")]
    pub prompts: Value,
}

pub(crate) fn no_prompts() -> Value {
    Value::Array(Vec::new())
}
