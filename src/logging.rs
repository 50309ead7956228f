//! Tracing setup
//!
//! Frames own stdout, so logs go to stderr or, with `--log-file`, to a file.
//! The filter comes from `WATCHBOARD_LOG` (default `warn`).

use std::fs::File;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

use crate::error::{BoardError, Result};

pub const LOG_ENV: &str = "WATCHBOARD_LOG";
pub const DEFAULT_FILTER: &str = "warn";

pub fn filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Install the global subscriber. Fails if one is already set.
pub fn init(log_file: Option<&Path>) -> Result<()> {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter())
        .with_target(false);

    let installed = match log_file {
        Some(path) => {
            let file = File::create(path).map_err(|e| {
                BoardError::Logging(format!("cannot create {}: {}", path.display(), e))
            })?;
            builder
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init()
        }
        None => builder.with_writer(std::io::stderr).try_init(),
    };
    installed.map_err(|e| BoardError::Logging(e.to_string()))
}
