//! # nlut: NLU application transcoder
//!
//! Converts natural-language-understanding app exports between vendor
//! schemas through one canonical intermediate representation.
//!
//! ## Features
//!
//! - **Three vendors**: Alexa skill documents, Wit.ai app archives and DialogFlow agent archives
//! - **Span model**: conversions between `{slot}` templates and char-offset spans
//! - **Canonical IR**: entities, intents and annotated expressions with checked insertion
//! - **Vendor registry**: plug-in importers and exporters keyed by [`Format`]
//! - **Vendor JSON layout**: two-space indentation and `" : "` separators, as the vendor
//!   tools write them
//!
//! ## Example: Alexa skill to Wit.ai
//!
//! ```ignore
//! use nlut::{Format, ImportOptions, Session, Source, Summary, TranscoderConfig};
//! use std::path::Path;
//!
//! let session = Session::new(
//!     TranscoderConfig::default(),
//!     ImportOptions { language: "en".to_string(), version: "20240101".to_string() },
//! );
//! let imported = session.import(&Source::read("skill.json")?)?;
//! println!("{}", Summary::from(&imported));
//!
//! let output = session.export(&imported.app, Format::Wit, Path::new("travel"))?;
//! output.write("travel")?; // travel.zip
//! ```
//!
//! ## Offsets
//!
//! Every span is a half-open `[start, end)` range counted in Unicode scalar
//! values. See [`span`].

// Core modules
pub mod error;
pub mod ir;
pub mod span;

// Vendor documents and containers
pub mod archive;
pub mod codec;
pub mod formats;
pub mod source;

// Conversion pipeline
pub mod config;
pub mod ids;
pub mod normalize;
pub mod registry;
pub mod session;

// Re-export key types
pub use error::{DocumentErrorKind, Result, SpanError, TranscodeError};
pub use ir::{Annotation, App, AppInfo, Entity, EntityValue, Expression, IntentAttribution};
pub use span::{Segment, Span};

// Re-export pipeline types
pub use config::TranscoderConfig;
pub use formats::{ExportContext, Format, ImportOptions, Imported, SkippedPhrase, Vendor};
pub use ids::{IdGenerator, SequentialIds, UuidGenerator};
pub use registry::VendorRegistry;
pub use session::{Session, Summary};
pub use source::{Output, Source};
