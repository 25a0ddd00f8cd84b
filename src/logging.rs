// Logging setup.
// Human-readable events on stderr (stdout carries the item JSON) and in the workflow log file.

use std::fs;
use std::path::Path;

use tracing::Level;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::cache::LOG_FILENAME;
use crate::error::{GhelperError, Result};

/// Environment variable holding a tracing filter directive.
pub const LOG_ENV: &str = "GHELPER_LOG";

/// Filter used when `GHELPER_LOG` is unset or invalid.
pub fn default_directive(verbose: bool) -> String {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    format!("ghelper={}", level)
}

/// Install the global subscriber. The log file is skipped when `log_dir` is None.
pub fn init_logging(log_dir: Option<&Path>, verbose: bool) -> Result<()> {
    let filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));

    let file_layer = match log_dir {
        Some(dir) => {
            fs::create_dir_all(dir)?;
            let appender = RollingFileAppender::builder()
                .rotation(Rotation::NEVER)
                .filename_prefix(LOG_FILENAME)
                .build(dir)
                .map_err(|e| GhelperError::Other(e.to_string()))?;
            Some(fmt::layer().with_writer(appender).with_ansi(false))
        }
        None => None,
    };

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time();

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| GhelperError::Other(e.to_string()))
}
