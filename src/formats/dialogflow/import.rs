//! DialogFlow agent → App.
//!
//! Entity usage is spread over intent parameters and aliased usersays
//! segments, so the import runs two passes: [`harvest`] reads intents and
//! phrases and records what they reference, then [`resolve`] builds every
//! entity from its declaration, its entries or what was harvested.

use std::sync::OnceLock;

use indexmap::{IndexMap, IndexSet};
use regex::Regex;

use super::model::{
    Agent, EntityDefinition, EntityEntry, IntentDocument, PackageDocument, UserSays,
};
use super::{AGENT_ENTRY, FALLBACK_INTENT, PACKAGE_ENTRY};
use crate::archive::Entries;
use crate::codec::Documents;
use crate::error::Result;
use crate::formats::{ImportOptions, SkippedPhrase};
use crate::ir::{sanitize_name, App, AppInfo, Entity, EntityValue, Expression};
use crate::span::{self, Segment};

// Locale suffixes may carry a region or digits, e.g. `pt-br` or `es-419`.
fn usersays_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^intents/(.+)_usersays_([A-Za-z0-9-]+)\.json$").expect("valid pattern")
    })
}

fn entries_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^entities/(.+)_entries_([A-Za-z0-9-]+)\.json$").expect("valid pattern")
    })
}

/// What the intent pass found.
#[derive(Debug, Default)]
pub struct Harvest {
    /// Declared intents, in archive order.
    pub intents: Vec<String>,
    pub expressions: Vec<Expression>,
    /// Response parameter names and segment aliases.
    pub discovered_entities: IndexSet<String>,
    /// Every aliased literal, per alias, in order of appearance.
    pub discovered_values: IndexMap<String, Vec<String>>,
    pub skipped: Vec<SkippedPhrase>,
}

/// An imported agent with what had to be left out.
pub struct AgentImport {
    pub app: App,
    pub skipped: Vec<SkippedPhrase>,
    pub malformed_entries: Vec<String>,
}

/// Build the app from the archive entries.
///
/// # Errors
///
/// A missing or malformed `agent.json`, and IR invariant violations.
pub fn build_app(entries: &Entries, options: &ImportOptions) -> Result<AgentImport> {
    let mut documents = Documents::decode(entries);

    let agent: Agent = documents.require(AGENT_ENTRY)?;
    let package: Option<PackageDocument> = documents.optional(PACKAGE_ENTRY);

    let language = if agent.language.is_empty() {
        options.language.clone()
    } else {
        agent.language.clone()
    };
    let version = package
        .map(|p| p.version)
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| options.version.clone());

    let mut app = App::new(AppInfo {
        name: agent.google_assistant.project,
        description: agent.description,
        language: language.clone(),
        version,
    });

    tracing::info!("Harvesting intents and phrases for language {}", language);
    let harvest = harvest(&documents, &language);
    tracing::info!("Resolving {} discovered entities", harvest.discovered_entities.len());
    let entities = resolve(&documents, &harvest, &language);

    for entity in entities {
        app.add_entity(entity)?;
    }
    for intent in &harvest.intents {
        app.add_intent(intent.clone());
    }
    for expression in harvest.expressions {
        app.add_expression(expression)?;
    }

    Ok(AgentImport {
        app,
        skipped: harvest.skipped,
        malformed_entries: documents.malformed_names(),
    })
}

/// Read intent definitions and the usersays phrases of `language`.
pub fn harvest(documents: &Documents, language: &str) -> Harvest {
    let mut harvest = Harvest::default();

    for name in documents.names().filter(|n| n.starts_with("intents/")) {
        if let Some(captures) = usersays_pattern().captures(name) {
            let intent = &captures[1];
            if !captures[2].eq_ignore_ascii_case(language) || intent == FALLBACK_INTENT {
                tracing::debug!("Ignoring {}", name);
                continue;
            }
            if let Some(phrases) = documents.optional::<Vec<UserSays>>(name) {
                harvest_phrases(&mut harvest, &sanitize_name(intent), phrases);
            }
            continue;
        }

        let Some(definition) = documents.optional::<IntentDocument>(name) else {
            continue;
        };
        if definition.fallback_intent || definition.name == FALLBACK_INTENT {
            tracing::debug!("Skipping fallback intent {}", definition.name);
            continue;
        }

        harvest.intents.push(sanitize_name(&definition.name));
        if let Some(response) = definition.responses.first() {
            harvest
                .discovered_entities
                .extend(response.parameters.iter().map(|p| sanitize_name(&p.name)));
        }
    }

    harvest
}

fn harvest_phrases(harvest: &mut Harvest, intent: &str, phrases: Vec<UserSays>) {
    for phrase in phrases {
        let segments: Vec<Segment> = phrase
            .data
            .into_iter()
            .map(|s| Segment {
                text: s.text,
                alias: s.alias.as_deref().map(sanitize_name),
            })
            .collect();

        let joined = span::join_segments(&segments);
        let expression = Expression::from_expanded(intent, joined, str::to_string);
        if let Err(e) = expression.validate_spans() {
            harvest.skipped.push(SkippedPhrase::record(expression.text, e));
            continue;
        }

        for segment in segments {
            if let Some(alias) = segment.alias {
                harvest.discovered_entities.insert(alias.clone());
                harvest.discovered_values.entry(alias).or_default().push(segment.text);
            }
        }
        harvest.expressions.push(expression);
    }
}

/// Build every declared and discovered entity.
///
/// Values come from the entity's entries document when present, otherwise
/// from harvested literals (the first is canonical, the others synonyms),
/// otherwise the entity is free text.
pub fn resolve(documents: &Documents, harvest: &Harvest, language: &str) -> Vec<Entity> {
    let mut declared: IndexMap<String, EntityDefinition> = IndexMap::new();
    let mut entries: IndexMap<String, Vec<EntityEntry>> = IndexMap::new();

    for name in documents.names().filter(|n| n.starts_with("entities/")) {
        if let Some(captures) = entries_pattern().captures(name) {
            if captures[2].eq_ignore_ascii_case(language) {
                if let Some(list) = documents.optional::<Vec<EntityEntry>>(name) {
                    entries.insert(sanitize_name(&captures[1]), list);
                }
            }
            continue;
        }
        if let Some(definition) = documents.optional::<EntityDefinition>(name) {
            declared.insert(sanitize_name(&definition.name), definition);
        }
    }

    let names: IndexSet<&str> = declared
        .keys()
        .map(String::as_str)
        .chain(harvest.discovered_entities.iter().map(String::as_str))
        .collect();

    names
        .into_iter()
        .map(|name| {
            let values = match entries.get(name) {
                Some(list) => list.iter().map(entry_value).collect(),
                None => discovered_values(harvest.discovered_values.get(name)),
            };
            let entity = Entity::new(name, language).with_values(values);
            match declared.get(name).filter(|d| !d.id.is_empty()) {
                Some(definition) => entity.with_id(definition.id.clone()),
                None => entity,
            }
        })
        .collect()
}

// Entries list the canonical value among its own synonyms.
fn entry_value(entry: &EntityEntry) -> EntityValue {
    let synonyms = entry.synonyms.iter().filter(|s| **s != entry.value).cloned();
    EntityValue::new(entry.value.clone()).with_synonyms(synonyms)
}

fn discovered_values(literals: Option<&Vec<String>>) -> Vec<EntityValue> {
    let Some((canonical, rest)) = literals.and_then(|l| l.split_first()) else {
        return Vec::new();
    };
    let synonyms: IndexSet<&String> = rest.iter().filter(|l| *l != canonical).collect();
    vec![EntityValue::new(canonical.clone()).with_synonyms(synonyms.into_iter().cloned())]
}
