//! Error types for transcoding.
//!
//! Span-level failures ([`SpanError`]) only abort the expression being
//! converted. Everything else in [`TranscodeError`] is reported to the caller.

use std::fmt;
use thiserror::Error;

/// Why a JSON document could not be decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentErrorKind {
    Syntax,
    Depth,
    ControlCharacter,
    Encoding,
    Truncated,
    /// Valid JSON that does not have the shape the vendor schema expects.
    Shape,
}

impl fmt::Display for DocumentErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentErrorKind::Syntax => write!(f, "Malformed JSON"),
            DocumentErrorKind::Depth => write!(f, "Maximum depth reached"),
            DocumentErrorKind::ControlCharacter => write!(f, "Character control error"),
            DocumentErrorKind::Encoding => write!(f, "Encoding error - check UTF-8 characters"),
            DocumentErrorKind::Truncated => write!(f, "Unexpected end of document"),
            DocumentErrorKind::Shape => write!(f, "Unexpected document structure"),
        }
    }
}

/// Inconsistency between placeholders, spans and text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SpanError {
    #[error("unknown slot '{slot}' in \"{template}\"")]
    UnknownSlot { slot: String, template: String },

    #[error("malformed template \"{template}\" at position {position}: {reason}")]
    MalformedTemplate {
        template: String,
        position: usize,
        reason: &'static str,
    },

    #[error("invalid span [{start}, {end}) in \"{text}\": {reason}")]
    InvalidSpan {
        text: String,
        start: usize,
        end: usize,
        reason: &'static str,
    },
}

#[derive(Debug, Error)]
pub enum TranscodeError {
    #[error("{entry} ({} kb) - {kind}: {message}", kilobytes(.size))]
    MalformedDocument {
        entry: String,
        size: usize,
        kind: DocumentErrorKind,
        message: String,
    },

    #[error(transparent)]
    Span(#[from] SpanError),

    #[error("duplicate entity: {0}")]
    DuplicateEntity(String),

    #[error("expression has no intent annotation: \"{text}\"")]
    MissingIntentAnnotation { text: String },

    #[error("expression \"{text}\" references unknown entity '{entity}'")]
    UnknownEntityReference { entity: String, text: String },

    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("missing required entry: {0}")]
    MissingEntry(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

fn kilobytes(size: &usize) -> f64 {
    *size as f64 / 1000.0
}

pub type Result<T> = std::result::Result<T, TranscodeError>;
