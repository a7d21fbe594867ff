//! Transcoder configuration loaded from YAML.
//!
//! ```yaml
//! language: fr
//! dialogflow:
//!   timezone: Europe/Paris
//!   ml_min_confidence: 0.2
//! alexa:
//!   normalize_samples: true
//! ```
//!
//! Every field is optional. `language` has no default here: the caller
//! decides which language applies when neither the source nor the
//! configuration names one.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TranscodeError};

/// Top-level configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct TranscoderConfig {
    /// Language for sources that do not declare one
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub dialogflow: DialogflowConfig,
    #[serde(default)]
    pub alexa: AlexaConfig,
}

/// Agent settings written into exported `agent.json`
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DialogflowConfig {
    #[serde(default = "default_timezone")]
    pub timezone: String,
    #[serde(default = "default_ml_min_confidence")]
    pub ml_min_confidence: f64,
}

impl Default for DialogflowConfig {
    fn default() -> Self {
        Self {
            timezone: default_timezone(),
            ml_min_confidence: default_ml_min_confidence(),
        }
    }
}

fn default_timezone() -> String {
    "Europe/Paris".to_string()
}

fn default_ml_min_confidence() -> f64 {
    0.2
}

/// Skill export settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AlexaConfig {
    /// Lower-case samples and strip terminal punctuation
    #[serde(default = "default_true")]
    pub normalize_samples: bool,
}

impl Default for AlexaConfig {
    fn default() -> Self {
        Self {
            normalize_samples: true,
        }
    }
}

fn default_true() -> bool {
    true
}

impl TranscoderConfig {
    /// Load configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            TranscodeError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_yaml_str(&contents)
    }

    pub fn from_yaml_str(contents: &str) -> Result<Self> {
        serde_yaml::from_str(contents)
            .map_err(|e| TranscodeError::Config(format!("Failed to parse YAML: {}", e)))
    }
}
