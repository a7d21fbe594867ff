//! Wit.ai app export: a zip of span-annotated expressions and entity lists,
//! wrapped in one top-level folder.

pub mod export;
pub mod import;
pub mod model;

use crate::error::Result;
use crate::formats::{wrong_source, ExportContext, Format, ImportOptions, Imported, Vendor};
use crate::ir::App;
use crate::source::{Output, Source};

pub const APP_ENTRY: &str = "app.json";
pub const EXPRESSIONS_ENTRY: &str = "expressions.json";
pub const ENTITIES_DIR: &str = "entities/";
pub const INTENT_ENTRY: &str = "entities/intent.json";

#[derive(Debug, Clone, Copy, Default)]
pub struct Wit;

impl Vendor for Wit {
    fn format(&self) -> Format {
        Format::Wit
    }

    fn import(&self, source: &Source, options: &ImportOptions) -> Result<Imported> {
        let entries = match source {
            Source::Archive(entries) => entries,
            Source::Document { .. } => return Err(wrong_source(Format::Wit, source)),
        };

        let imported = import::build_app(entries, options)?;
        tracing::info!(
            "Imported Wit.ai app {}: {} entities, {} intents, {} expressions",
            imported.app.name(),
            imported.app.entity_count(),
            imported.app.intent_count(),
            imported.app.expressions().len()
        );

        Ok(Imported {
            format: Format::Wit,
            app: imported.app,
            skipped: imported.skipped,
            malformed_entries: imported.malformed_entries,
        })
    }

    fn export(&self, app: &App, ctx: &mut ExportContext<'_>) -> Result<Output> {
        Ok(Output::Archive(export::render(app, &ctx.base_name)?))
    }
}
