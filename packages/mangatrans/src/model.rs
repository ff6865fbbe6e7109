//! Result data model for a translated page, matching the v1.0 JSON schema.
use std::collections::HashSet;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use mangatrans_engine::{BBox, EngineInfo, Orientation, TextRegion};

/// The only schema version this crate reads and writes.
pub const SCHEMA_VERSION: &str = "1.0";

#[derive(Debug, Error)]
pub enum ResultError {
    #[error("failed to access {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed result document: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unsupported schema version {0:?} (expected \"1.0\")")]
    UnsupportedSchema(String),
    #[error("invalid result: {0}")]
    Invalid(String),
}

/// Source page metadata. `width` and `height` are 0 when unknown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Page {
    pub id: String,
    pub source_path: String,
    pub width: u32,
    pub height: u32,
}

impl Page {
    pub fn new(id: impl Into<String>, source_path: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            id: id.into(),
            source_path: source_path.into(),
            width,
            height,
        }
    }
}

/// Stage timings in milliseconds.
///
/// `total` is measured on its own clock and is not the sum of the stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Timings {
    pub ocr: u64,
    pub translation: u64,
    pub total: u64,
}

impl Timings {
    pub fn new(ocr: u64, translation: u64, total: u64) -> Self {
        Self {
            ocr,
            translation,
            total,
        }
    }

    pub fn zero() -> Self {
        Self::new(0, 0, 0)
    }
}

/// Complete result for one page. Field order here is the key order of the
/// exported document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PageResult {
    pub schema_version: String,
    pub page: Page,
    pub source_lang: String,
    pub target_lang: String,
    pub ocr: EngineInfo,
    pub translation: EngineInfo,
    pub regions: Vec<TextRegion>,
    pub timings_ms: Timings,
}

impl PageResult {
    pub fn new(
        page: Page,
        source_lang: impl Into<String>,
        target_lang: impl Into<String>,
        ocr: EngineInfo,
        translation: EngineInfo,
        regions: Vec<TextRegion>,
        timings_ms: Timings,
    ) -> Self {
        Self {
            schema_version: SCHEMA_VERSION.to_string(),
            page,
            source_lang: source_lang.into(),
            target_lang: target_lang.into(),
            ocr,
            translation,
            regions,
            timings_ms,
        }
    }

    /// Checks the invariants the document carries beyond its shape: schema
    /// version, unique region ids, and the per-region detector contract.
    pub fn validate(&self) -> Result<(), ResultError> {
        if self.schema_version != SCHEMA_VERSION {
            return Err(ResultError::UnsupportedSchema(self.schema_version.clone()));
        }

        let mut seen = HashSet::with_capacity(self.regions.len());
        for region in &self.regions {
            if !seen.insert(region.id.as_str()) {
                return Err(ResultError::Invalid(format!(
                    "duplicate region id {:?}",
                    region.id
                )));
            }
            region
                .validate()
                .map_err(|e| ResultError::Invalid(e.to_string()))?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_region(id: &str) -> TextRegion {
        TextRegion::new(
            id,
            BBox::new(10, 20, 30, 40),
            Orientation::Horizontal,
            0.95,
            "テスト",
            "test",
        )
    }

    fn sample_result(regions: Vec<TextRegion>) -> PageResult {
        PageResult::new(
            Page::new("001", "input/001.png", 800, 1200),
            "ja",
            "en",
            EngineInfo::new("easyocr", "1.7.0"),
            EngineInfo::new("argos", "1.0.0"),
            regions,
            Timings::new(100, 50, 170),
        )
    }

    #[test]
    fn test_new_sets_schema_version() {
        let result = sample_result(vec![]);
        assert_eq!(result.schema_version, "1.0");
        assert_eq!(result.page.id, "001");
        assert_eq!(result.source_lang, "ja");
        assert_eq!(result.target_lang, "en");
    }

    #[test]
    fn test_validate_accepts_well_formed_result() {
        let result = sample_result(vec![sample_region("r1"), sample_region("r2")]);
        assert!(result.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_duplicate_ids() {
        let result = sample_result(vec![sample_region("r1"), sample_region("r1")]);
        let err = result.validate().unwrap_err();
        assert!(matches!(err, ResultError::Invalid(_)));
        assert!(err.to_string().contains("duplicate region id"));
    }

    #[test]
    fn test_validate_rejects_other_schema_version() {
        let mut result = sample_result(vec![]);
        result.schema_version = "2.0".to_string();
        assert!(matches!(
            result.validate(),
            Err(ResultError::UnsupportedSchema(v)) if v == "2.0"
        ));
    }

    #[test]
    fn test_validate_rejects_region_contract_violation() {
        let mut region = sample_region("r1");
        region.confidence = 1.2;
        let result = sample_result(vec![region]);
        assert!(matches!(result.validate(), Err(ResultError::Invalid(_))));
    }

    #[test]
    fn test_timings_are_independent() {
        let timings = Timings::new(100, 50, 170);
        assert_ne!(timings.total, timings.ocr + timings.translation);
        assert_eq!(Timings::zero(), Timings::new(0, 0, 0));
    }
}
