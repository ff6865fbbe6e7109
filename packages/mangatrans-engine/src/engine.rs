use std::path::Path;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::region::TextRegion;

/// Name and version of a backend, recorded in every result.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EngineInfo {
    pub engine: String,
    pub version: String,
}

impl EngineInfo {
    pub fn new(engine: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            engine: engine.into(),
            version: version.into(),
        }
    }
}

/// Failures of an engine backend or of its output.
///
/// The first three variants are for backend implementations to return; the
/// pipeline raises the rest when a call times out or breaks the port contract.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The backend cannot handle this request at all, e.g. a language pair
    /// or image format it has no model for.
    #[error("unsupported operation")]
    Unsupported,
    /// The request itself is unusable (unreadable image, empty language code).
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// Any other backend failure: model load, remote API error, crash.
    #[error("engine error: {0}")]
    EngineError(String),
    #[error("{stage} engine timed out after {after_ms} ms")]
    Timeout { stage: &'static str, after_ms: u64 },
    #[error("translator returned {actual} entries for a batch of {expected}")]
    BatchLengthMismatch { expected: usize, actual: usize },
    #[error("invalid region {id}: {reason}")]
    InvalidRegion { id: String, reason: String },
}

/// Finds text on a page image.
///
/// Implementations return regions in a stable order (reading order for most
/// engines), with a calibrated confidence in `[0, 1]` and a non-empty
/// `raw_text`. `translated_text` is left empty; the pipeline fills it in.
#[async_trait]
pub trait TextDetector: Send + Sync {
    async fn detect_text(
        &self,
        image: &Path,
        source_lang: &str,
    ) -> Result<Vec<TextRegion>, EngineError>;

    fn engine_info(&self) -> EngineInfo;
}

/// Translates a batch of strings.
///
/// The output must have exactly one entry per input, in input order: callers
/// zip it back onto regions by position.
#[async_trait]
pub trait Translator: Send + Sync {
    async fn translate_batch(
        &self,
        texts: &[String],
        source_lang: &str,
        target_lang: &str,
    ) -> Result<Vec<String>, EngineError>;

    fn engine_info(&self) -> EngineInfo;
}

pub fn check_batch_len(expected: usize, actual: usize) -> Result<(), EngineError> {
    if expected != actual {
        return Err(EngineError::BatchLengthMismatch { expected, actual });
    }
    Ok(())
}
