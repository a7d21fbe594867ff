//! The app container and its invariant-checking insertions.

use indexmap::{IndexMap, IndexSet};

use crate::error::{Result, TranscodeError};
use crate::ir::{Entity, EntityValue, Expression, INTENT_ENTITY};

/// App-level metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppInfo {
    pub name: String,
    pub description: String,
    /// ISO 639-1 code, e.g. `fr`.
    pub language: String,
    pub version: String,
}

/// Canonical NLU app.
///
/// Built once by an importer, then read by at most one exporter. Entities are
/// always registered before the expressions that reference them.
#[derive(Debug, Clone)]
pub struct App {
    info: AppInfo,
    entities: IndexMap<String, Entity>,
    intents: Entity,
    expressions: Vec<Expression>,
}

/// Expressions belonging to one intent and the entities they reference.
#[derive(Debug, Clone)]
pub struct IntentAttribution<'a> {
    pub intent: &'a str,
    pub phrases: Vec<&'a Expression>,
    /// Deduplicated, in first-seen order.
    pub entities: Vec<&'a str>,
}

impl App {
    pub fn new(info: AppInfo) -> Self {
        let intents = Entity::new(INTENT_ENTITY, info.language.clone());
        Self {
            info,
            entities: IndexMap::new(),
            intents,
            expressions: Vec::new(),
        }
    }

    pub fn info(&self) -> &AppInfo {
        &self.info
    }

    pub fn name(&self) -> &str {
        &self.info.name
    }

    pub fn language(&self) -> &str {
        &self.info.language
    }

    /// Register an entity.
    ///
    /// # Errors
    ///
    /// `DuplicateEntity` if the name is taken (case-sensitive) or is the
    /// reserved intent name.
    pub fn add_entity(&mut self, entity: Entity) -> Result<()> {
        if entity.name == INTENT_ENTITY || self.entities.contains_key(&entity.name) {
            return Err(TranscodeError::DuplicateEntity(entity.name));
        }
        self.entities.insert(entity.name.clone(), entity);
        Ok(())
    }

    /// Declare an intent. Declaring the same intent twice is a no-op.
    pub fn add_intent(&mut self, name: impl Into<String>) {
        let name = name.into();
        if !self.intents.has_value(&name) {
            self.intents.push_value(EntityValue::new(name));
        }
    }

    /// Add an expression, declaring its intent if needed.
    ///
    /// # Errors
    ///
    /// * `MissingIntentAnnotation` if no annotation names the intent
    /// * `UnknownEntityReference` if an annotation names an unregistered entity
    pub fn add_expression(&mut self, expression: Expression) -> Result<()> {
        let intent = match expression.intent() {
            Some(intent) => intent.to_string(),
            None => {
                return Err(TranscodeError::MissingIntentAnnotation {
                    text: expression.text.clone(),
                })
            }
        };

        if let Some(unknown) = expression
            .entity_annotations()
            .find(|a| !self.entities.contains_key(&a.entity))
        {
            return Err(TranscodeError::UnknownEntityReference {
                entity: unknown.entity.clone(),
                text: expression.text.clone(),
            });
        }

        self.add_intent(intent);
        self.expressions.push(expression);
        Ok(())
    }

    pub fn entity(&self, name: &str) -> Option<&Entity> {
        self.entities.get(name)
    }

    pub fn entities(&self) -> impl Iterator<Item = &Entity> {
        self.entities.values()
    }

    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// The reserved intent entity.
    pub fn intents(&self) -> &Entity {
        &self.intents
    }

    pub fn intent_names(&self) -> impl Iterator<Item = &str> {
        self.intents.values.iter().map(|v| v.value.as_str())
    }

    pub fn intent_count(&self) -> usize {
        self.intents.values.len()
    }

    pub fn expressions(&self) -> &[Expression] {
        &self.expressions
    }

    pub fn expressions_for<'a>(&'a self, intent: &'a str) -> impl Iterator<Item = &'a Expression> {
        self.expressions.iter().filter(move |e| e.intent() == Some(intent))
    }

    /// Collect the expressions whose intent annotation equals `intent`, and the
    /// entities they reference.
    pub fn attribute<'a>(&'a self, intent: &'a str) -> IntentAttribution<'a> {
        let mut phrases = Vec::new();
        let mut entities = IndexSet::new();

        for expression in self.expressions_for(intent) {
            entities.extend(expression.entity_annotations().map(|a| a.entity.as_str()));
            phrases.push(expression);
        }

        IntentAttribution {
            intent,
            phrases,
            entities: entities.into_iter().collect(),
        }
    }

    /// Attribution for every declared intent, in declaration order.
    pub fn attributions(&self) -> Vec<IntentAttribution<'_>> {
        self.intent_names().map(|name| self.attribute(name)).collect()
    }
}
