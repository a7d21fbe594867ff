//! Entities and their values.

use serde::{Deserialize, Serialize};

/// One value of an entity plus its alternate surface forms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityValue {
    /// Substituted into template-expanded text.
    pub value: String,
    /// Never used for span computation.
    #[serde(default)]
    pub synonyms: Vec<String>,
}

impl EntityValue {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            synonyms: Vec::new(),
        }
    }

    pub fn with_synonyms<I, S>(mut self, synonyms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.synonyms = synonyms.into_iter().map(Into::into).collect();
        self
    }
}

/// A named entity. Its identity within an app is its name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    pub id: String,
    pub name: String,
    pub language: String,
    #[serde(default)]
    pub values: Vec<EntityValue>,
}

impl Entity {
    /// Create a valueless entity whose id is its name.
    pub fn new(name: impl Into<String>, language: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            id: name.clone(),
            name,
            language: language.into(),
            values: Vec::new(),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_values(mut self, values: Vec<EntityValue>) -> Self {
        self.values = values;
        self
    }

    pub fn push_value(&mut self, value: EntityValue) {
        self.values.push(value);
    }

    pub fn has_value(&self, value: &str) -> bool {
        self.values.iter().any(|v| v.value == value)
    }

    /// Entities with no enumerated values accept free text.
    pub fn is_free_text(&self) -> bool {
        self.values.is_empty()
    }

    /// First declared value, used as the default placeholder binding.
    pub fn default_value(&self) -> Option<&str> {
        self.values.first().map(|v| v.value.as_str())
    }
}
