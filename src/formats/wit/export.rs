//! App → Wit.ai archive.

use indexmap::IndexSet;

use super::model::{
    AnnotationData, AppData, AppDocument, EntityData, EntityDocument, EntityValueData,
    ExpressionData, ExpressionsDocument,
};
use super::{APP_ENTRY, ENTITIES_DIR, EXPRESSIONS_ENTRY, INTENT_ENTRY};
use crate::archive::Entries;
use crate::codec::to_vendor_json;
use crate::error::Result;
use crate::ir::{App, Entity, Expression, INTENT_ENTITY};

const ENTITY_DOC: &str = "User-defined entity";

/// Render the app as archive entries under `<folder>/`.
///
/// `expressions.json` is always the last entry; the Wit.ai importer expects
/// every entity before it.
pub fn render(app: &App, folder: &str) -> Result<Entries> {
    let mut entries = Entries::new();
    let path = |name: &str| format!("{}/{}", folder, name);

    let app_document = AppDocument {
        version: app.info().version.clone(),
        zip_command: format!(
            "zip {folder}.zip {folder}/{app} {folder}/{entities}*.json {folder}/{expressions}",
            folder = folder,
            app = APP_ENTRY,
            entities = ENTITIES_DIR,
            expressions = EXPRESSIONS_ENTRY,
        ),
        data: AppData {
            name: app.name().to_string(),
            description: app.info().description.clone(),
            lang: app.language().to_string(),
        },
    };
    entries.insert(path(APP_ENTRY), to_vendor_json(&app_document)?);

    for entity in app.entities() {
        let name = format!("{}{}.json", ENTITIES_DIR, entity.name);
        entries.insert(path(&name), to_vendor_json(&entity_document(entity, app.language()))?);
    }
    entries.insert(path(INTENT_ENTRY), to_vendor_json(&intent_document(app))?);

    let expressions = ExpressionsDocument {
        data: app.expressions().iter().filter_map(expression_data).collect(),
    };
    entries.insert(path(EXPRESSIONS_ENTRY), to_vendor_json(&expressions)?);

    Ok(entries)
}

fn entity_document(entity: &Entity, app_language: &str) -> EntityDocument {
    let lookup = if entity.is_free_text() { "free-text" } else { "keywords" };
    let language = if entity.language.is_empty() {
        app_language
    } else {
        entity.language.as_str()
    };

    let values = entity
        .values
        .iter()
        .map(|v| {
            let mut expressions = IndexSet::new();
            expressions.insert(v.value.clone());
            expressions.extend(v.synonyms.iter().cloned());
            EntityValueData {
                value: v.value.clone(),
                expressions: Some(expressions.into_iter().collect()),
            }
        })
        .collect();

    EntityDocument {
        data: EntityData {
            lookups: vec![lookup.to_string()],
            name: entity.name.clone(),
            lang: language.to_string(),
            exotic: false,
            id: entity.id.clone(),
            values,
            doc: ENTITY_DOC.to_string(),
            builtin: false,
        },
    }
}

fn intent_document(app: &App) -> EntityDocument {
    EntityDocument {
        data: EntityData {
            lookups: vec!["trait".to_string()],
            name: INTENT_ENTITY.to_string(),
            lang: app.language().to_string(),
            exotic: false,
            id: INTENT_ENTITY.to_string(),
            values: app
                .intent_names()
                .map(|name| EntityValueData {
                    value: name.to_string(),
                    expressions: None,
                })
                .collect(),
            doc: ENTITY_DOC.to_string(),
            builtin: false,
        },
    }
}

fn expression_data(expression: &Expression) -> Option<ExpressionData> {
    if let Err(e) = expression.validate_spans() {
        tracing::warn!("Skipping phrase \"{}\": {}", expression.text, e);
        return None;
    }

    let entities = if expression.annotations.is_empty() {
        None
    } else {
        Some(
            expression
                .annotations
                .iter()
                .map(|a| AnnotationData {
                    entity: a.entity.clone(),
                    value: format!("\"{}\"", a.value),
                    start: a.span.map(|s| s.start),
                    end: a.span.map(|s| s.end),
                })
                .collect(),
        )
    };

    Some(ExpressionData {
        text: expression.text.clone(),
        entities,
    })
}
