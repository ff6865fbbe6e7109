use anyhow::{anyhow, Result};
use tracing_subscriber::EnvFilter;

/// Installs the global `tracing` subscriber. Logs go to stderr so stdout only
/// carries command output. `RUST_LOG` overrides the level chosen here.
pub fn init_logging(verbose: bool) -> Result<()> {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow!("failed to install log subscriber: {e}"))
}
