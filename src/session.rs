//! Conversion session: detect, import, summarize, export.

use std::fmt;
use std::path::Path;

use chrono::{DateTime, Utc};

use crate::config::TranscoderConfig;
use crate::error::Result;
use crate::formats::{ExportContext, Format, ImportOptions, Imported};
use crate::ids::{IdGenerator, UuidGenerator};
use crate::ir::App;
use crate::registry::VendorRegistry;
use crate::source::{Output, Source};

/// One conversion run.
///
/// # Example
///
/// ```ignore
/// let session = Session::new(TranscoderConfig::default(), options);
/// let imported = session.import(&Source::read("skill.json")?)?;
/// println!("{}", Summary::from(&imported));
/// session.export(&imported.app, Format::Wit, Path::new("out/skill"))?.write("out/skill")?;
/// ```
pub struct Session {
    registry: VendorRegistry,
    config: TranscoderConfig,
    options: ImportOptions,
}

impl Session {
    pub fn new(config: TranscoderConfig, options: ImportOptions) -> Self {
        Self::with_registry(VendorRegistry::with_defaults(), config, options)
    }

    pub fn with_registry(
        registry: VendorRegistry,
        config: TranscoderConfig,
        options: ImportOptions,
    ) -> Self {
        Self {
            registry,
            config,
            options,
        }
    }

    pub fn config(&self) -> &TranscoderConfig {
        &self.config
    }

    /// Detect the source format and import it.
    pub fn import(&self, source: &Source) -> Result<Imported> {
        let format = Format::detect(source);
        tracing::info!("Importing {} source", format.label());
        self.registry.get(format)?.import(source, &self.options)
    }

    /// Export with random identifiers and the current time.
    pub fn export(&self, app: &App, format: Format, base: &Path) -> Result<Output> {
        self.export_with(app, format, &base_name(base), &mut UuidGenerator, Utc::now())
    }

    /// Export with injected identifiers and timestamp.
    pub fn export_with(
        &self,
        app: &App,
        format: Format,
        base_name: &str,
        ids: &mut dyn IdGenerator,
        timestamp: DateTime<Utc>,
    ) -> Result<Output> {
        let vendor = self.registry.get(format)?;
        tracing::info!("Exporting {} to {}", app.name(), format.label());

        let mut ctx = ExportContext {
            ids,
            timestamp,
            base_name: base_name.to_string(),
            config: &self.config,
        };
        vendor.export(app, &mut ctx)
    }
}

/// File name of the export base, without a `.json` or `.zip` extension.
pub fn base_name(base: &Path) -> String {
    let name = base
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let stem = [".zip", ".json"]
        .iter()
        .find_map(|ext| name.strip_suffix(ext))
        .map(str::to_string);
    stem.unwrap_or(name)
}

/// Counts printed after an import.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    pub format: Format,
    pub app_name: String,
    pub entities: usize,
    pub intents: usize,
    pub expressions: usize,
    pub skipped: usize,
}

impl From<&Imported> for Summary {
    fn from(imported: &Imported) -> Self {
        Self {
            format: imported.format,
            app_name: imported.app.name().to_string(),
            entities: imported.app.entity_count(),
            intents: imported.app.intent_count(),
            expressions: imported.app.expressions().len(),
            skipped: imported.skipped.len(),
        }
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rule = "-".repeat(40);
        writeln!(f, "{}", rule)?;
        writeln!(f, "Source type  : {}", self.format.label())?;
        writeln!(f, "App name     : {}", self.app_name)?;
        writeln!(f, "Entities     : {}", self.entities)?;
        writeln!(f, "Intents      : {}", self.intents)?;
        writeln!(f, "Expressions  : {}", self.expressions)?;
        if self.skipped > 0 {
            writeln!(f, "Skipped      : {}", self.skipped)?;
        }
        write!(f, "{}", rule)
    }
}
