//! Engine ports for the mangatrans pipeline.
//!
//! The pipeline never talks to a concrete OCR or translation backend. It
//! depends on the two capability traits defined here, [`TextDetector`] and
//! [`Translator`], and on the region value types every detector produces.

pub mod engine;
pub mod region;

pub use engine::{check_batch_len, EngineError, EngineInfo, TextDetector, Translator};
pub use region::{BBox, Orientation, TextRegion};
