//! Command line arguments backing the `mangatrans` binary.
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
  name = "mangatrans",
  about = "Manga/Manhwa page translator producing v1.0 JSON results",
  version
)]
pub struct Args {
  /// TOML configuration file with default languages and pipeline limits
  #[arg(long, global = true)]
  pub config: Option<PathBuf>,

  /// Enable debug logging
  #[arg(long, short = 'v', global = true)]
  pub verbose: bool,

  #[command(subcommand)]
  pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
  /// Print version information
  Version,
  /// Translate a manga/manhwa page
  Translate {
    /// Input image path
    image: PathBuf,

    /// Output JSON path
    #[arg(long, short = 'o')]
    output: PathBuf,

    /// Source language (default: ja)
    #[arg(long)]
    src: Option<String>,

    /// Target language (default: en)
    #[arg(long)]
    tgt: Option<String>,

    /// Page identifier recorded in the result
    #[arg(long)]
    page_id: Option<String>,
  },
  /// Translate every image under a directory
  Batch {
    /// Directory containing page images
    input_dir: PathBuf,

    /// Output directory; one JSON file per page
    #[arg(long, short = 'o')]
    output: PathBuf,

    /// Source language (default: ja)
    #[arg(long)]
    src: Option<String>,

    /// Target language (default: en)
    #[arg(long)]
    tgt: Option<String>,

    /// Number of pages processed at once
    #[arg(long, short = 'j')]
    jobs: Option<usize>,
  },
  /// Validate a result JSON file and print a summary
  Inspect {
    /// Path to a result JSON file
    file: PathBuf,
  },
}
