use serde::{Deserialize, Serialize};

use crate::engine::EngineError;

/// Pixel rectangle of a detected text area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BBox {
    pub x: i32,
    pub y: i32,
    pub w: u32,
    pub h: u32,
}

impl BBox {
    pub fn new(x: i32, y: i32, w: u32, h: u32) -> Self {
        Self { x, y, w, h }
    }

    pub fn area(&self) -> u64 {
        u64::from(self.w) * u64::from(self.h)
    }

    pub fn is_empty(&self) -> bool {
        self.w == 0 || self.h == 0
    }
}

/// Writing direction of a region. Manga dialogue is usually vertical.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    Horizontal,
    Vertical,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TextRegion {
    pub id: String,
    pub bbox: BBox,
    pub orientation: Orientation,
    pub confidence: f32,
    pub raw_text: String,
    pub translated_text: String,
}

impl TextRegion {
    pub fn new(
        id: impl Into<String>,
        bbox: BBox,
        orientation: Orientation,
        confidence: f32,
        raw_text: impl Into<String>,
        translated_text: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            bbox,
            orientation,
            confidence,
            raw_text: raw_text.into(),
            translated_text: translated_text.into(),
        }
    }

    /// Checks the detector contract for a single region: confidence is a
    /// probability and the recognized text is not empty.
    ///
    /// Whitespace-only `raw_text` counts as empty: a region where the engine
    /// recognized nothing but spaces has no text to translate.
    pub fn validate(&self) -> Result<(), EngineError> {
        if !(0.0..=1.0).contains(&self.confidence) {
            return Err(EngineError::InvalidRegion {
                id: self.id.clone(),
                reason: format!("confidence {} outside [0, 1]", self.confidence),
            });
        }
        if self.raw_text.trim().is_empty() {
            return Err(EngineError::InvalidRegion {
                id: self.id.clone(),
                reason: "empty raw_text".to_string(),
            });
        }
        Ok(())
    }
}
