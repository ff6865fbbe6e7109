//! Page translation orchestration.
//!
//! [`translate_page`] runs the detector, feeds the recognized text through the
//! translator as one batch and assembles a [`PageResult`]. With no detector
//! configured it produces the placeholder result used before any engine is
//! wired in.
use std::collections::HashSet;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use thiserror::Error;
use tokio::sync::Semaphore;
use tracing::{debug, info, warn};
use uuid::Uuid;

use mangatrans_engine::{check_batch_len, EngineError, TextDetector, Translator};

use crate::model::{EngineInfo, Page, PageResult, ResultError, TextRegion, Timings};

/// Page id used when no detector runs and the caller gave none.
pub const STUB_PAGE_ID: &str = "001";
pub const STUB_OCR_ENGINE: &str = "easyocr";
pub const STUB_TRANSLATION_ENGINE: &str = "argos";
pub const STUB_ENGINE_VERSION: &str = "0.0.0";

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("cannot read image {}: {reason}", .path.display())]
    Input { path: PathBuf, reason: String },
    #[error(transparent)]
    Engine(#[from] EngineError),
    #[error(transparent)]
    Result(#[from] ResultError),
    #[error("page task failed: {0}")]
    Task(String),
}

/// Text detection backend, or none.
#[derive(Clone)]
pub enum Detector {
    Absent,
    Engine(Arc<dyn TextDetector>),
}

/// Translation backend, or none.
#[derive(Clone)]
pub enum TranslatorChoice {
    Absent,
    Engine(Arc<dyn Translator>),
}

#[derive(Clone)]
pub struct Engines {
    pub detector: Detector,
    pub translator: TranslatorChoice,
}

impl Engines {
    pub fn new(detector: Arc<dyn TextDetector>, translator: Arc<dyn Translator>) -> Self {
        Self {
            detector: Detector::Engine(detector),
            translator: TranslatorChoice::Engine(translator),
        }
    }

    /// No engines at all: every page yields the empty placeholder result.
    pub fn stub() -> Self {
        Self {
            detector: Detector::Absent,
            translator: TranslatorChoice::Absent,
        }
    }

    fn ocr_info(&self) -> EngineInfo {
        match &self.detector {
            Detector::Absent => EngineInfo::new(STUB_OCR_ENGINE, STUB_ENGINE_VERSION),
            Detector::Engine(detector) => detector.engine_info(),
        }
    }

    fn translation_info(&self) -> EngineInfo {
        match &self.translator {
            TranslatorChoice::Absent => {
                EngineInfo::new(STUB_TRANSLATION_ENGINE, STUB_ENGINE_VERSION)
            }
            TranslatorChoice::Engine(translator) => translator.engine_info(),
        }
    }
}

/// Per-call limits for the orchestration.
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    pub detector_timeout: Duration,
    pub translator_timeout: Duration,
    /// Upper bound on pages processed at once by [`translate_pages`].
    pub max_concurrent_pages: usize,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            detector_timeout: Duration::from_secs(60),
            translator_timeout: Duration::from_secs(60),
            max_concurrent_pages: 4,
        }
    }
}

/// One page to translate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub image: PathBuf,
    pub source_lang: String,
    pub target_lang: String,
    pub page_id: Option<String>,
}

impl PageRequest {
    pub fn new(image: impl Into<PathBuf>, source_lang: impl Into<String>, target_lang: impl Into<String>) -> Self {
        Self {
            image: image.into(),
            source_lang: source_lang.into(),
            target_lang: target_lang.into(),
            page_id: None,
        }
    }

    pub fn with_page_id(mut self, page_id: impl Into<String>) -> Self {
        self.page_id = Some(page_id.into());
        self
    }
}

/// Translates a single page.
///
/// The image must exist before any engine is called. Engine failures and
/// contract violations (bad regions, a translation batch of the wrong size,
/// a timeout) are returned as errors, never as an empty result.
pub async fn translate_page(
    request: &PageRequest,
    engines: &Engines,
    options: &PipelineOptions,
) -> Result<PageResult, PipelineError> {
    let started = Instant::now();
    check_input(&request.image).await?;

    let detector = match &engines.detector {
        Detector::Absent => {
            let result = stub_result(request, engines);
            info!(
                page = %result.page.id,
                image = %request.image.display(),
                "no detector configured, emitting empty result"
            );
            return Ok(result);
        }
        Detector::Engine(detector) => detector,
    };

    let (width, height) = read_dimensions(&request.image).await?;

    let ocr_started = Instant::now();
    let mut regions = with_timeout(
        "ocr",
        options.detector_timeout,
        detector.detect_text(&request.image, &request.source_lang),
    )
    .await?;
    let ocr_ms = elapsed_ms(ocr_started);
    validate_regions(&regions)?;
    debug!(regions = regions.len(), ocr_ms, "text detection finished");

    let translation_started = Instant::now();
    match &engines.translator {
        TranslatorChoice::Engine(translator) if !regions.is_empty() => {
            let texts: Vec<String> = regions.iter().map(|r| r.raw_text.clone()).collect();
            let translated = with_timeout(
                "translation",
                options.translator_timeout,
                translator.translate_batch(&texts, &request.source_lang, &request.target_lang),
            )
            .await?;
            check_batch_len(texts.len(), translated.len())?;

            for (region, text) in regions.iter_mut().zip(translated) {
                region.translated_text = text;
            }
        }
        TranslatorChoice::Engine(_) => {}
        TranslatorChoice::Absent => {
            debug!("no translator configured, translated_text left empty");
        }
    }
    let translation_ms = elapsed_ms(translation_started);

    let page_id = request
        .page_id
        .clone()
        .unwrap_or_else(|| Uuid::new_v4().to_string());
    let page = Page::new(page_id, request.image.display().to_string(), width, height);

    let total_ms = elapsed_ms(started);
    let result = PageResult::new(
        page,
        request.source_lang.clone(),
        request.target_lang.clone(),
        engines.ocr_info(),
        engines.translation_info(),
        regions,
        Timings::new(ocr_ms, translation_ms, total_ms),
    );

    info!(
        page = %result.page.id,
        regions = result.regions.len(),
        total_ms,
        "page translated"
    );
    Ok(result)
}

/// Translates independent pages concurrently, at most
/// `options.max_concurrent_pages` at a time (clamped to `1..=MAX_PERMITS`). Results come back in request
/// order, one per request.
pub async fn translate_pages(
    requests: Vec<PageRequest>,
    engines: &Engines,
    options: &PipelineOptions,
) -> Vec<Result<PageResult, PipelineError>> {
    let permits = options.max_concurrent_pages.clamp(1, Semaphore::MAX_PERMITS);
    let semaphore = Arc::new(Semaphore::new(permits));
    let mut tasks = Vec::with_capacity(requests.len());

    for request in requests {
        let semaphore = semaphore.clone();
        let engines = engines.clone();
        let options = options.clone();

        let task = tokio::spawn(async move {
            let _permit = semaphore
                .acquire_owned()
                .await
                .map_err(|e| PipelineError::Task(e.to_string()))?;
            let result = translate_page(&request, &engines, &options).await;
            if let Err(e) = &result {
                warn!(image = %request.image.display(), error = %e, "page failed");
            }
            result
        });
        tasks.push(task);
    }

    let mut results = Vec::with_capacity(tasks.len());
    for task in tasks {
        match task.await {
            Ok(result) => results.push(result),
            Err(e) => results.push(Err(PipelineError::Task(e.to_string()))),
        }
    }
    results
}

fn stub_result(request: &PageRequest, engines: &Engines) -> PageResult {
    let page_id = request
        .page_id
        .clone()
        .unwrap_or_else(|| STUB_PAGE_ID.to_string());

    PageResult::new(
        Page::new(page_id, request.image.display().to_string(), 0, 0),
        request.source_lang.clone(),
        request.target_lang.clone(),
        engines.ocr_info(),
        engines.translation_info(),
        Vec::new(),
        Timings::zero(),
    )
}

async fn check_input(image: &Path) -> Result<(), PipelineError> {
    match tokio::fs::metadata(image).await {
        Ok(meta) if meta.is_file() => Ok(()),
        Ok(_) => Err(PipelineError::Input {
            path: image.to_path_buf(),
            reason: "not a file".to_string(),
        }),
        Err(e) => Err(PipelineError::Input {
            path: image.to_path_buf(),
            reason: e.to_string(),
        }),
    }
}

/// Decodes only the image header; a file that is not an image fails here.
async fn read_dimensions(path: &Path) -> Result<(u32, u32), PipelineError> {
    let owned = path.to_path_buf();
    tokio::task::spawn_blocking(move || image::image_dimensions(&owned))
        .await
        .map_err(|e| PipelineError::Task(e.to_string()))?
        .map_err(|e| PipelineError::Input {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
}

fn validate_regions(regions: &[TextRegion]) -> Result<(), EngineError> {
    let mut seen = HashSet::with_capacity(regions.len());
    for region in regions {
        region.validate()?;
        if !seen.insert(region.id.as_str()) {
            return Err(EngineError::InvalidRegion {
                id: region.id.clone(),
                reason: "duplicate region id".to_string(),
            });
        }
    }
    Ok(())
}

async fn with_timeout<T, F>(stage: &'static str, limit: Duration, fut: F) -> Result<T, EngineError>
where
    F: Future<Output = Result<T, EngineError>>,
{
    match tokio::time::timeout(limit, fut).await {
        Ok(result) => result,
        Err(_) => Err(EngineError::Timeout {
            stage,
            after_ms: limit.as_millis() as u64,
        }),
    }
}

fn elapsed_ms(since: Instant) -> u64 {
    since.elapsed().as_millis() as u64
}
