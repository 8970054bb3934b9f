//! Log subscriber setup for the command line.

use anyhow::Result;
use tracing_subscriber::EnvFilter;

/// Filter from `RUST_LOG` when set and valid, otherwise from `level`.
pub fn build_filter(env: Option<&str>, level: &str) -> Result<EnvFilter> {
    if let Some(directives) = env.filter(|directives| !directives.trim().is_empty()) {
        match EnvFilter::try_new(directives) {
            Ok(filter) => return Ok(filter),
            Err(error) => eprintln!("Ignoring invalid RUST_LOG '{directives}': {error}"),
        }
    }

    Ok(EnvFilter::try_new(level.to_ascii_lowercase())?)
}

/// Install a formatted subscriber writing to stderr.
pub fn init_logging(level: &str) -> Result<()> {
    let env = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let filter = build_filter(env.as_deref(), level)?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|error| anyhow::anyhow!("Failed to install log subscriber: {error}"))
}
