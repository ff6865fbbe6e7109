//! Application configuration
//!
//! Optional TOML file with default languages and pipeline limits. Command
//! line flags take precedence over anything set here.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::pipeline::PipelineOptions;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub languages: LanguageConfig,
    pub pipeline: PipelineConfig,
}

/// Default language pair for commands that do not pass `--src`/`--tgt`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LanguageConfig {
    pub source: String,
    pub target: String,
}

impl Default for LanguageConfig {
    fn default() -> Self {
        Self {
            source: "ja".to_string(),
            target: "en".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Seconds allowed for one text detection call
    pub detector_timeout_secs: u64,
    /// Seconds allowed for one translation batch
    pub translator_timeout_secs: u64,
    /// Pages processed at once in batch mode
    pub max_concurrent_pages: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            detector_timeout_secs: 60,
            translator_timeout_secs: 60,
            max_concurrent_pages: 4,
        }
    }
}

impl AppConfig {
    pub fn pipeline_options(&self) -> PipelineOptions {
        PipelineOptions {
            detector_timeout: Duration::from_secs(self.pipeline.detector_timeout_secs),
            translator_timeout: Duration::from_secs(self.pipeline.translator_timeout_secs),
            max_concurrent_pages: self.pipeline.max_concurrent_pages,
        }
    }
}

/// Load configuration from file
pub fn load_config(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;
    let config: AppConfig = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file {}", path.display()))?;
    Ok(config)
}
