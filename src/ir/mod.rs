//! Canonical intermediate representation of an NLU app.
//!
//! Every importer builds an [`App`] and every exporter reads one. Vendors never
//! talk to each other directly.

pub mod app;
pub mod entity;
pub mod expression;

pub use app::{App, AppInfo, IntentAttribution};
pub use entity::{Entity, EntityValue};
pub use expression::{Annotation, Expression};

/// Name of the reserved pseudo-entity whose values are the intent names.
pub const INTENT_ENTITY: &str = "intent";

/// Replace characters that some vendors reject in identifiers.
///
/// ```ignore
/// assert_eq!(sanitize_name("AMAZON.DATE"), "AMAZON_DATE");
/// ```
pub fn sanitize_name(name: &str) -> String {
    name.replace('.', "_")
}
