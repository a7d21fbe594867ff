//! Example utterances and their annotations.

use serde::{Deserialize, Serialize};

use crate::error::SpanError;
use crate::ir::INTENT_ENTITY;
use crate::span::{self, Expanded, Segment, Span};

/// Marks which entity a part (or, for the intent, the whole) of an utterance refers to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Annotation {
    pub entity: String,
    pub value: String,
    /// Absent for the intent annotation.
    #[serde(default)]
    pub span: Option<Span>,
}

impl Annotation {
    pub fn intent(name: impl Into<String>) -> Self {
        Self {
            entity: INTENT_ENTITY.to_string(),
            value: name.into(),
            span: None,
        }
    }

    pub fn spanned(entity: impl Into<String>, value: impl Into<String>, span: Span) -> Self {
        Self {
            entity: entity.into(),
            value: value.into(),
            span: Some(span),
        }
    }

    pub fn is_intent(&self) -> bool {
        self.entity == INTENT_ENTITY
    }
}

/// A fully expanded utterance. The intent annotation comes first, then
/// entity spans sorted by start.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expression {
    pub text: String,
    pub annotations: Vec<Annotation>,
}

impl Expression {
    /// Create an expression carrying only its intent annotation.
    pub fn new(text: impl Into<String>, intent: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            annotations: vec![Annotation::intent(intent)],
        }
    }

    /// Builder-style entity span.
    pub fn with_span(
        mut self,
        entity: impl Into<String>,
        value: impl Into<String>,
        span: Span,
    ) -> Self {
        self.annotations.push(Annotation::spanned(entity, value, span));
        self
    }

    /// Build from an expanded template or joined segments, mapping each tag to
    /// its entity name with `entity_of`.
    pub fn from_expanded<F>(intent: impl Into<String>, expanded: Expanded, mut entity_of: F) -> Self
    where
        F: FnMut(&str) -> String,
    {
        let mut expression = Self::new(expanded.text, intent);
        for tagged in expanded.spans {
            let entity = entity_of(&tagged.tag);
            expression
                .annotations
                .push(Annotation::spanned(entity, tagged.value, tagged.span));
        }
        expression
    }

    pub fn intent(&self) -> Option<&str> {
        self.annotations
            .iter()
            .find(|a| a.is_intent())
            .map(|a| a.value.as_str())
    }

    /// Non-intent annotations.
    pub fn entity_annotations(&self) -> impl Iterator<Item = &Annotation> {
        self.annotations.iter().filter(|a| !a.is_intent())
    }

    /// Entity names with their spans, in annotation order. Annotations without
    /// offsets are left out.
    pub fn tagged_spans(&self) -> impl Iterator<Item = (&str, Span)> {
        self.entity_annotations()
            .filter_map(|a| a.span.map(|span| (a.entity.as_str(), span)))
    }

    /// Put the intent annotation first and sort entity spans by start.
    pub fn normalize_order(&mut self) {
        self.annotations
            .sort_by_key(|a| (!a.is_intent(), a.span.map(|s| s.start).unwrap_or(0)));
    }

    /// Check every entity annotation has offsets that fit the text.
    pub fn validate_spans(&self) -> Result<(), SpanError> {
        if self.entity_annotations().any(|a| a.span.is_none()) {
            return Err(SpanError::InvalidSpan {
                text: self.text.clone(),
                start: 0,
                end: 0,
                reason: "annotation has no offsets",
            });
        }
        span::validate(&self.text, self.tagged_spans().map(|(_, span)| span))
    }

    /// Make every span's value equal the text it covers. Returns how many
    /// values changed.
    pub fn align_values(&mut self) -> usize {
        let mut changed = 0;
        for annotation in self.annotations.iter_mut().filter(|a| !a.is_intent()) {
            let surface = annotation
                .span
                .and_then(|span| span::slice(&self.text, span));
            if let Some(surface) = surface {
                if surface != annotation.value {
                    annotation.value = surface.to_string();
                    changed += 1;
                }
            }
        }
        changed
    }

    /// Placeholder template, e.g. `book a {city} flight`.
    pub fn template(&self) -> Result<String, SpanError> {
        span::collapse(&self.text, self.tagged_spans())
    }

    /// Ordered plain and tagged fragments of the text.
    pub fn segments(&self) -> Result<Vec<Segment>, SpanError> {
        span::split_segments(&self.text, self.tagged_spans())
    }
}
