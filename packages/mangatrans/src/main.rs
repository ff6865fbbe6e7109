mod cli;

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{CommandFactory, Parser};
use cli::{Args, Commands};
use mangatrans::{
  export_to_json, import_from_json, init_logging, load_config, translate_page, translate_pages, AppConfig, Engines,
  PageRequest,
};
use walkdir::WalkDir;

const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "webp", "bmp", "gif", "tiff"];

#[tokio::main]
async fn main() {
  let args = Args::parse();

  if let Err(e) = init_logging(args.verbose) {
    eprintln!("Warning: {}", e);
  }

  let Some(command) = args.command else {
    eprintln!("{}", Args::command().render_help());
    std::process::exit(1);
  };

  if let Err(e) = run(command, args.config.as_deref()).await {
    eprintln!("Error: {:#}", e);
    std::process::exit(1);
  }
}

async fn run(command: Commands, config_path: Option<&Path>) -> Result<()> {
  let config = match config_path {
    Some(path) => load_config(path)?,
    None => AppConfig::default(),
  };

  match command {
    Commands::Version => {
      println!("mangatrans {}", env!("CARGO_PKG_VERSION"));
      Ok(())
    }
    Commands::Translate {
      image,
      output,
      src,
      tgt,
      page_id,
    } => translate(&config, image, output, src, tgt, page_id).await,
    Commands::Batch {
      input_dir,
      output,
      src,
      tgt,
      jobs,
    } => batch(&config, input_dir, output, src, tgt, jobs).await,
    Commands::Inspect { file } => inspect(&file).await,
  }
}

async fn translate(
  config: &AppConfig,
  image: PathBuf,
  output: PathBuf,
  src: Option<String>,
  tgt: Option<String>,
  page_id: Option<String>,
) -> Result<()> {
  if !image.exists() {
    bail!("Image file not found: {}", image.display());
  }

  let mut request = PageRequest::new(
    image.clone(),
    src.unwrap_or_else(|| config.languages.source.clone()),
    tgt.unwrap_or_else(|| config.languages.target.clone()),
  );
  request.page_id = page_id;

  let result = translate_page(&request, &Engines::stub(), &config.pipeline_options())
    .await
    .with_context(|| format!("Failed to translate {}", image.display()))?;

  export_to_json(&result, &output)
    .await
    .with_context(|| format!("Failed to export to {}", output.display()))?;

  println!("✓ Translation result exported to: {}", output.display());
  Ok(())
}

async fn batch(
  config: &AppConfig,
  input_dir: PathBuf,
  output: PathBuf,
  src: Option<String>,
  tgt: Option<String>,
  jobs: Option<usize>,
) -> Result<()> {
  if !input_dir.is_dir() {
    bail!("Input directory not found: {}", input_dir.display());
  }

  let images = find_images(&input_dir);
  if images.is_empty() {
    bail!("No images found in {}", input_dir.display());
  }

  let source_lang = src.unwrap_or_else(|| config.languages.source.clone());
  let target_lang = tgt.unwrap_or_else(|| config.languages.target.clone());
  let mut options = config.pipeline_options();
  if let Some(jobs) = jobs {
    options.max_concurrent_pages = jobs;
  }

  println!("[*] Batch processing {} page(s)", images.len());

  let mut success = 0;
  let mut failed = 0;

  let mut destinations: HashMap<PathBuf, Vec<PathBuf>> = HashMap::new();
  for image in &images {
    destinations
      .entry(output_path_for(&input_dir, &output, image))
      .or_default()
      .push(image.clone());
  }

  // Images that would share an output file are failed rather than overwritten.
  let mut pages = Vec::with_capacity(images.len());
  for image in &images {
    let destination = output_path_for(&input_dir, &output, image);
    let sources = &destinations[&destination];
    if sources.len() > 1 {
      eprintln!(
        "  [✗] {}: output {} is shared by {} images",
        image.display(),
        destination.display(),
        sources.len()
      );
      failed += 1;
    } else {
      pages.push((image.clone(), destination));
    }
  }

  let requests: Vec<PageRequest> = pages
    .iter()
    .map(|(path, _)| {
      let stem = path.file_stem().unwrap_or_default().to_string_lossy().into_owned();
      PageRequest::new(path.clone(), source_lang.clone(), target_lang.clone()).with_page_id(stem)
    })
    .collect();

  let results = translate_pages(requests, &Engines::stub(), &options).await;

  for ((image, destination), result) in pages.iter().zip(results) {
    let exported = match result {
      Ok(page) => export_to_json(&page, destination).await.map_err(anyhow::Error::from),
      Err(e) => Err(e.into()),
    };

    match exported {
      Ok(()) => {
        println!("  [✓] {} -> {}", image.display(), destination.display());
        success += 1;
      }
      Err(e) => {
        eprintln!("  [✗] {}: {:#}", image.display(), e);
        failed += 1;
      }
    }
  }

  println!("[*] Summary: {} succeeded, {} failed", success, failed);

  if failed > 0 {
    bail!("{} page(s) failed to process", failed);
  }
  Ok(())
}

async fn inspect(file: &Path) -> Result<()> {
  let result = import_from_json(file)
    .await
    .with_context(|| format!("Failed to read result {}", file.display()))?;
  result
    .validate()
    .with_context(|| format!("Invalid result {}", file.display()))?;

  println!("Page:        {} ({})", result.page.id, result.page.source_path);
  println!("Size:        {}x{}", result.page.width, result.page.height);
  println!("Languages:   {} -> {}", result.source_lang, result.target_lang);
  println!("OCR:         {} {}", result.ocr.engine, result.ocr.version);
  println!("Translation: {} {}", result.translation.engine, result.translation.version);
  println!("Regions:     {}", result.regions.len());
  println!(
    "Timings:     ocr {} ms, translation {} ms, total {} ms",
    result.timings_ms.ocr, result.timings_ms.translation, result.timings_ms.total
  );
  Ok(())
}

/// Image files under `dir`, sorted so batch output order is deterministic.
fn find_images(dir: &Path) -> Vec<PathBuf> {
  let mut images: Vec<PathBuf> = WalkDir::new(dir)
    .into_iter()
    .filter_map(|e| e.ok())
    .filter(|e| e.file_type().is_file())
    .map(|e| e.into_path())
    .filter(|path| {
      path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| IMAGE_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
    })
    .collect();
  images.sort();
  images
}

/// Mirrors the image's position under `input_dir` inside `output_dir`.
fn output_path_for(input_dir: &Path, output_dir: &Path, image: &Path) -> PathBuf {
  let relative = image.strip_prefix(input_dir).unwrap_or(image);
  output_dir.join(relative).with_extension("json")
}
