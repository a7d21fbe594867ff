//! Serde models of a Wit.ai app export.

use serde::{Deserialize, Serialize};

use crate::formats::lenient_string;

/// `app.json`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppDocument {
    #[serde(default, deserialize_with = "lenient_string")]
    pub version: String,
    #[serde(rename = "zip-command", default)]
    pub zip_command: String,
    pub data: AppData,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppData {
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub description: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub lang: String,
}

/// `entities/<name>.json`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityDocument {
    pub data: EntityData,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityData {
    #[serde(default)]
    pub lookups: Vec<String>,
    pub name: String,
    #[serde(default)]
    pub lang: String,
    #[serde(default)]
    pub exotic: bool,
    #[serde(default, deserialize_with = "lenient_string")]
    pub id: String,
    #[serde(default)]
    pub values: Vec<EntityValueData>,
    #[serde(default)]
    pub doc: String,
    #[serde(default)]
    pub builtin: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityValueData {
    #[serde(deserialize_with = "lenient_string")]
    pub value: String,
    /// Intent values carry no expressions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expressions: Option<Vec<String>>,
}

/// `expressions.json`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExpressionsDocument {
    #[serde(default)]
    pub data: Vec<ExpressionData>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExpressionData {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entities: Option<Vec<AnnotationData>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnnotationData {
    pub entity: String,
    #[serde(deserialize_with = "lenient_string")]
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<usize>,
}
