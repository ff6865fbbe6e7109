//! # mangatrans
//!
//! Manga/manhwa page translation pipeline. A page image goes through a text
//! detector and a batch translator, and the outcome is written as a v1.0
//! JSON result document.
//!
//! ## Features
//!
//! - **Result model**: [`PageResult`] and its parts, with invariant checks
//! - **JSON contract**: stable key order, verbatim non-ASCII text, strict parsing
//! - **Engine ports**: plug any OCR or MT backend in through [`TextDetector`] and [`Translator`]
//! - **Orchestration**: per-stage timeouts, positional zipping of translations, concurrent batches
//!
//! ## Quick Start
//!
//! ```ignore
//! use mangatrans::prelude::*;
//!
//! let request = PageRequest::new("page_001.png", "ja", "en");
//! let result = translate_page(&request, &Engines::stub(), &PipelineOptions::default()).await?;
//! assert!(result.regions.is_empty());
//!
//! export_to_json(&result, Path::new("out/page_001.json")).await?;
//! ```

pub mod config;
pub mod json_exporter;
pub mod logging;
pub mod model;
pub mod pipeline;

pub use mangatrans_engine::{check_batch_len, EngineError, TextDetector, Translator};

pub use config::{load_config, AppConfig, LanguageConfig, PipelineConfig};
pub use json_exporter::{export_to_json, from_json, import_from_json, to_document, to_json, TOP_LEVEL_KEYS};
pub use logging::init_logging;
pub use model::{BBox, EngineInfo, Orientation, Page, PageResult, ResultError, TextRegion, Timings, SCHEMA_VERSION};
pub use pipeline::{
    translate_page, translate_pages, Detector, Engines, PageRequest, PipelineError, PipelineOptions, TranslatorChoice,
};

/// Prelude module for convenient imports
///
/// ```ignore
/// use mangatrans::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        export_to_json, from_json, import_from_json, to_document, to_json, translate_page, translate_pages, BBox,
        Detector, EngineError, EngineInfo, Engines, Orientation, Page, PageRequest, PageResult, PipelineError,
        PipelineOptions, ResultError, TextDetector, TextRegion, Timings, Translator, TranslatorChoice, SCHEMA_VERSION,
    };
}
