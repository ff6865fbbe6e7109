//! Serialization of [`PageResult`] to and from the v1.0 JSON document.
//!
//! Keys are written in declaration order and non-ASCII text is emitted
//! verbatim, so Japanese or Korean `raw_text` stays readable in the file.
use std::path::Path;

use serde_json::Value;
use tokio::fs;

use crate::model::{PageResult, ResultError, SCHEMA_VERSION};

/// Top-level keys of a v1.0 document, in output order.
pub const TOP_LEVEL_KEYS: [&str; 8] = [
    "schema_version",
    "page",
    "source_lang",
    "target_lang",
    "ocr",
    "translation",
    "regions",
    "timings_ms",
];

/// Converts a result into its nested document form.
pub fn to_document(result: &PageResult) -> Result<Value, ResultError> {
    check_finite(result)?;
    Ok(serde_json::to_value(result)?)
}

/// Renders a result as pretty-printed JSON with two-space indentation.
pub fn to_json(result: &PageResult) -> Result<String, ResultError> {
    check_finite(result)?;
    Ok(serde_json::to_string_pretty(result)?)
}

/// JSON has no NaN or infinity; serde_json would write them as `null`.
fn check_finite(result: &PageResult) -> Result<(), ResultError> {
    match result.regions.iter().find(|r| !r.confidence.is_finite()) {
        Some(region) => Err(ResultError::Invalid(format!(
            "region {:?} has non-finite confidence {}",
            region.id, region.confidence
        ))),
        None => Ok(()),
    }
}

/// Parses a v1.0 document. Unknown or missing fields are errors, and so is
/// any schema version other than "1.0".
pub fn from_json(json: &str) -> Result<PageResult, ResultError> {
    let result: PageResult = serde_json::from_str(json)?;
    if result.schema_version != SCHEMA_VERSION {
        return Err(ResultError::UnsupportedSchema(result.schema_version));
    }
    Ok(result)
}

/// Writes `result` to `output_path`, creating missing parent directories.
///
/// The file is written in place. A crash mid-write can leave a truncated
/// file behind.
pub async fn export_to_json(result: &PageResult, output_path: &Path) -> Result<(), ResultError> {
    let json = to_json(result)?;

    if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .await
            .map_err(|source| ResultError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
    }

    fs::write(output_path, json)
        .await
        .map_err(|source| ResultError::Io {
            path: output_path.to_path_buf(),
            source,
        })
}

/// Reads and parses a result document from disk.
pub async fn import_from_json(path: &Path) -> Result<PageResult, ResultError> {
    let contents = fs::read_to_string(path)
        .await
        .map_err(|source| ResultError::Io {
            path: path.to_path_buf(),
            source,
        })?;
    from_json(&contents)
}
