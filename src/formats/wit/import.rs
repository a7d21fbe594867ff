//! Wit.ai archive → App.

use super::model::{
    AnnotationData, AppDocument, EntityDocument, ExpressionData, ExpressionsDocument,
};
use super::{APP_ENTRY, ENTITIES_DIR, EXPRESSIONS_ENTRY, INTENT_ENTRY};
use crate::archive::{self, Entries};
use crate::codec::Documents;
use crate::error::Result;
use crate::formats::{ImportOptions, SkippedPhrase};
use crate::ir::{
    sanitize_name, Annotation, App, AppInfo, Entity, EntityValue, Expression, INTENT_ENTITY,
};
use crate::span::Span;

/// An imported app with what had to be left out.
pub struct WitImport {
    pub app: App,
    pub skipped: Vec<SkippedPhrase>,
    pub malformed_entries: Vec<String>,
}

/// Build the app from the archive entries.
///
/// # Errors
///
/// A missing or malformed `app.json` or `expressions.json`, and IR
/// invariant violations. Other malformed entries are skipped.
pub fn build_app(entries: &Entries, options: &ImportOptions) -> Result<WitImport> {
    let entries = archive::strip_common_root(entries.clone());
    let mut documents = Documents::decode(&entries);

    let app_document: AppDocument = documents.require(APP_ENTRY)?;
    let expressions: ExpressionsDocument = documents.require(EXPRESSIONS_ENTRY)?;

    let language = non_empty(app_document.data.lang).unwrap_or_else(|| options.language.clone());
    let mut app = App::new(AppInfo {
        name: app_document.data.name,
        description: app_document.data.description,
        language: language.clone(),
        version: non_empty(app_document.version).unwrap_or_else(|| options.version.clone()),
    });

    let entity_entries: Vec<String> = documents
        .names()
        .filter(|name| name.starts_with(ENTITIES_DIR) && name.ends_with(".json"))
        .map(str::to_string)
        .collect();

    for name in &entity_entries {
        let Some(document) = documents.optional::<EntityDocument>(name) else {
            continue;
        };
        if name == INTENT_ENTRY {
            for value in &document.data.values {
                app.add_intent(sanitize_name(&value.value));
            }
            continue;
        }
        tracing::debug!("Loading entity {} from {}", document.data.name, name);
        app.add_entity(entity_from(document, &language))?;
    }

    let mut skipped = Vec::new();
    for data in expressions.data {
        match expression_from(data) {
            Ok(expression) => app.add_expression(expression)?,
            Err(skip) => skipped.push(skip),
        }
    }

    Ok(WitImport {
        app,
        skipped,
        malformed_entries: documents.malformed_names(),
    })
}

fn entity_from(document: EntityDocument, app_language: &str) -> Entity {
    let data = document.data;
    let name = sanitize_name(&data.name);
    let id = non_empty(data.id).unwrap_or_else(|| name.clone());
    let language = non_empty(data.lang).unwrap_or_else(|| app_language.to_string());

    // Wit lists the canonical value among its own expressions.
    let values = data
        .values
        .into_iter()
        .map(|v| {
            let synonyms: Vec<String> = v
                .expressions
                .unwrap_or_default()
                .into_iter()
                .filter(|e| *e != v.value)
                .collect();
            EntityValue::new(v.value).with_synonyms(synonyms)
        })
        .collect();

    Entity::new(name, language).with_id(id).with_values(values)
}

fn expression_from(data: ExpressionData) -> std::result::Result<Expression, SkippedPhrase> {
    let annotations = data
        .entities
        .unwrap_or_default()
        .into_iter()
        .map(annotation_from)
        .collect();
    let mut expression = Expression {
        text: data.text,
        annotations,
    };

    expression.normalize_order();
    if let Err(e) = expression.validate_spans() {
        return Err(SkippedPhrase::record(expression.text, e));
    }

    let realigned = expression.align_values();
    if realigned > 0 {
        tracing::debug!("Realigned {} value(s) in \"{}\"", realigned, expression.text);
    }
    Ok(expression)
}

fn annotation_from(data: AnnotationData) -> Annotation {
    let value = unquote(&data.value);
    if data.entity == INTENT_ENTITY {
        return Annotation::intent(sanitize_name(value));
    }

    Annotation {
        entity: sanitize_name(&data.entity),
        value: value.to_string(),
        span: match (data.start, data.end) {
            (Some(start), Some(end)) => Some(Span::new(start, end)),
            _ => None,
        },
    }
}

/// Exports wrap every annotation value in double quotes.
fn unquote(value: &str) -> &str {
    value.trim_matches('"')
}

fn non_empty(value: String) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}
