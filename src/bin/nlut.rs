//! nlut CLI - convert NLU app exports between Alexa, Wit.ai and DialogFlow
//!
//! Reads a skill document, an app archive or an export directory, prints a
//! summary, and optionally writes the app in another vendor format.

use clap::{CommandFactory, Parser};
use std::path::{Path, PathBuf};
use std::process;
use tracing_subscriber::EnvFilter;

use nlut::{Format, ImportOptions, Session, Source, Summary, TranscoderConfig};

const DEFAULT_LANGUAGE: &str = "fr";

#[derive(Parser)]
#[command(name = "nlut")]
#[command(
    version,
    about = "NLU Transcoder - convert apps between Alexa, Wit.ai and DialogFlow",
    long_about = None
)]
#[command(after_help = "AVAILABLE FORMATS:\n    DIALOGFLOW\n    WIT\n    ALEXA")]
struct Cli {
    /// The source (a .zip file, an export directory or a .json file)
    #[arg(long)]
    source: PathBuf,

    /// The destination file; .zip or .json is appended
    #[arg(long, requires = "format")]
    export: Option<PathBuf>,

    /// The destination format (DIALOGFLOW, WIT, ALEXA)
    #[arg(long, requires = "export")]
    format: Option<String>,

    /// Language for sources that do not declare one [default: fr]
    #[arg(long)]
    language: Option<String>,

    /// Path to a YAML configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log every document and phase
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    dotenv::dotenv().ok();
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let source = match Source::read(&cli.source) {
        Ok(source) => source,
        Err(e) => {
            eprintln!("Error: cannot read {}: {}\n", cli.source.display(), e);
            let _ = Cli::command().print_help();
            process::exit(1);
        }
    };

    if let Err(e) = run(&cli, source) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: &Cli, source: Source) -> Result<(), String> {
    // Fail on an unknown format before importing
    let format = cli
        .format
        .as_deref()
        .map(str::parse::<Format>)
        .transpose()
        .map_err(|e| e.to_string())?;

    let config = match &cli.config {
        Some(path) => TranscoderConfig::from_file(path).map_err(|e| e.to_string())?,
        None => TranscoderConfig::default(),
    };

    let options = ImportOptions {
        language: resolve_language(cli.language.as_deref(), &config),
        version: chrono::Local::now().format("%Y%m%d").to_string(),
    };
    let session = Session::new(config, options);

    let imported = session.import(&source).map_err(|e| e.to_string())?;
    println!("{}", Summary::from(&imported));

    for entry in &imported.malformed_entries {
        println!("  ⚠ Skipped malformed entry {}", entry);
    }
    for skipped in &imported.skipped {
        println!("  ⚠ Skipped phrase \"{}\": {}", skipped.phrase, skipped.error);
    }

    if let (Some(base), Some(format)) = (&cli.export, format) {
        export(&session, &imported.app, format, base)?;
    }

    Ok(())
}

fn export(session: &Session, app: &nlut::App, format: Format, base: &Path) -> Result<(), String> {
    println!("Exporting to the {} format", format.label());

    let output = session.export(app, format, base).map_err(|e| e.to_string())?;
    let path = output
        .write(base)
        .map_err(|e| format!("Failed to write {}: {}", base.display(), e))?;

    println!("File {} written.", path.display());
    Ok(())
}

/// Command line first, then the configuration file, then the default.
fn resolve_language(flag: Option<&str>, config: &TranscoderConfig) -> String {
    flag.or(config.language.as_deref())
        .unwrap_or(DEFAULT_LANGUAGE)
        .to_string()
}
