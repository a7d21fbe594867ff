//! Vendor formats.
//!
//! Each vendor implements [`Vendor`]: an importer into the canonical [`App`]
//! and an exporter out of it. The file structure:
//!
//! ```text
//! formats
//! ├── <vendor>
//! │   ├── model.rs     # serde models of the vendor documents
//! │   ├── import.rs    # vendor documents → App
//! │   ├── export.rs    # App → vendor documents
//! │   └── mod.rs
//! └── mod.rs
//! ```

pub mod alexa;
pub mod dialogflow;
pub mod wit;

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};

use crate::config::TranscoderConfig;
use crate::error::{Result, SpanError, TranscodeError};
use crate::ids::IdGenerator;
use crate::ir::App;
use crate::source::{Output, Source};

/// Supported vendor schemas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Format {
    Dialogflow,
    Wit,
    Alexa,
}

impl Format {
    pub const ALL: [Format; 3] = [Format::Dialogflow, Format::Wit, Format::Alexa];

    /// Value accepted by `--format`.
    pub fn flag(&self) -> &'static str {
        match self {
            Format::Dialogflow => "DIALOGFLOW",
            Format::Wit => "WIT",
            Format::Alexa => "ALEXA",
        }
    }

    /// Human readable vendor name.
    pub fn label(&self) -> &'static str {
        match self {
            Format::Dialogflow => "DialogFlow",
            Format::Wit => "Wit.ai",
            Format::Alexa => "Alexa",
        }
    }

    /// An archive with a root `agent.json` is a DialogFlow agent, any other
    /// archive is a Wit.ai app, and a single document is an Alexa skill.
    pub fn detect(source: &Source) -> Format {
        match source {
            Source::Archive(_) if source.has_entry(dialogflow::AGENT_ENTRY) => Format::Dialogflow,
            Source::Archive(_) => Format::Wit,
            Source::Document { .. } => Format::Alexa,
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.flag())
    }
}

impl FromStr for Format {
    type Err = TranscodeError;

    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_uppercase();
        Format::ALL
            .into_iter()
            .find(|f| f.flag() == normalized)
            .ok_or_else(|| TranscodeError::UnsupportedFormat(s.to_string()))
    }
}

/// Caller-supplied values for sources that do not carry them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportOptions {
    pub language: String,
    pub version: String,
}

/// An expression dropped during import.
#[derive(Debug, Clone)]
pub struct SkippedPhrase {
    pub phrase: String,
    pub error: SpanError,
}

impl SkippedPhrase {
    pub(crate) fn record(phrase: impl Into<String>, error: SpanError) -> Self {
        let phrase = phrase.into();
        tracing::warn!("Skipping phrase \"{}\": {}", phrase, error);
        Self { phrase, error }
    }
}

/// Result of an import.
#[derive(Debug, Clone)]
pub struct Imported {
    pub format: Format,
    pub app: App,
    pub skipped: Vec<SkippedPhrase>,
    /// Entries that could not be parsed and were left out.
    pub malformed_entries: Vec<String>,
}

/// Everything an exporter needs besides the app.
pub struct ExportContext<'a> {
    pub ids: &'a mut dyn IdGenerator,
    pub timestamp: DateTime<Utc>,
    /// Export file name without directory or extension.
    pub base_name: String,
    pub config: &'a TranscoderConfig,
}

/// A vendor schema with its importer and exporter.
pub trait Vendor: Send + Sync {
    fn format(&self) -> Format;

    /// Parse vendor documents into the canonical app.
    fn import(&self, source: &Source, options: &ImportOptions) -> Result<Imported>;

    /// Serialize the canonical app into vendor documents.
    fn export(&self, app: &App, ctx: &mut ExportContext<'_>) -> Result<Output>;
}

pub(crate) fn wrong_source(format: Format, source: &Source) -> TranscodeError {
    let shape = if source.is_archive() { "an archive" } else { "a single document" };
    TranscodeError::UnsupportedFormat(format!(
        "{} cannot be imported from {}",
        format.label(),
        shape
    ))
}

/// Accept strings, numbers or null where vendors disagree on the type.
pub(crate) fn lenient_string<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::String(s) => s,
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    })
}
