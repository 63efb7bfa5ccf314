//! Client logging utilities.
//!
//! Wire traffic goes to the `log4mcp_client::wire` target: at INFO when the
//! client is verbose, at TRACE otherwise. The protocol stream never carries
//! diagnostics.
//!
//! # Example
//!
//! ```rust,no_run
//! use log4mcp_client::logging::init_logging;
//!
//! fn main() -> anyhow::Result<()> {
//!     init_logging(true)?;
//!
//!     tracing::info!("Client started");
//!     Ok(())
//! }
//! ```

use anyhow::{Context, Result};
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use tracing::Subscriber;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

/// Target used for request/response lines and connection events.
pub const WIRE_TARGET: &str = "log4mcp_client::wire";

pub(crate) fn wire_event(verbose: bool, message: std::fmt::Arguments<'_>) {
    if verbose {
        tracing::info!(target: WIRE_TARGET, "{}", message);
    } else {
        tracing::trace!(target: WIRE_TARGET, "{}", message);
    }
}

/// Default filter directive when `RUST_LOG` is unset.
pub fn default_directive(verbose: bool) -> &'static str {
    if verbose {
        "warn,log4mcp_client::wire=info"
    } else {
        "warn"
    }
}

/// `RUST_LOG` when set, otherwise [`default_directive`].
fn env_filter(verbose: bool) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)))
}

/// Subscriber writing compact, untimed lines to stderr.
pub fn stderr_subscriber(verbose: bool) -> impl Subscriber + Send + Sync + 'static {
    tracing_subscriber::registry().with(env_filter(verbose)).with(
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(verbose)
            .without_time(),
    )
}

/// Subscriber appending plain-text lines to `<dir>/client.log`.
///
/// The file is truncated when the subscriber is built.
pub fn file_subscriber(dir: &Path, verbose: bool) -> Result<impl Subscriber + Send + Sync + 'static> {
    let file = create_log_file(dir)?;

    Ok(tracing_subscriber::registry().with(env_filter(verbose)).with(
        fmt::layer()
            .with_writer(file)
            .with_ansi(false)
            .with_target(true),
    ))
}

/// Initialize stderr logging.
///
/// `RUST_LOG` takes precedence over the default filter.
pub fn init_logging(verbose: bool) -> Result<()> {
    tracing::subscriber::set_global_default(stderr_subscriber(verbose))
        .context("Failed to set subscriber")
}

/// Get the log file path inside `dir`.
pub fn log_file_path(dir: &Path) -> PathBuf {
    dir.join("client.log")
}

/// Initialize file logging to `<dir>/client.log`.
pub fn init_file_logging(dir: &Path, verbose: bool) -> Result<()> {
    tracing::subscriber::set_global_default(file_subscriber(dir, verbose)?)
        .context("Failed to set subscriber")
}

fn create_log_file(dir: &Path) -> Result<File> {
    fs::create_dir_all(dir).context("Failed to create log directory")?;
    File::create(log_file_path(dir)).context("Failed to create log file")
}

/// Initialize file logging with daily rotation.
///
/// Older logs are kept as `client.log.YYYY-MM-DD`.
#[cfg(feature = "log-rotation")]
pub fn init_logging_with_rotation(dir: &Path, verbose: bool) -> Result<()> {
    use tracing_appender::rolling::{RollingFileAppender, Rotation};

    fs::create_dir_all(dir).context("Failed to create log directory")?;
    let appender = RollingFileAppender::new(Rotation::DAILY, dir, "client.log");

    let subscriber = tracing_subscriber::registry().with(env_filter(verbose)).with(
        fmt::layer()
            .with_writer(appender)
            .with_ansi(false)
            .with_target(true),
    );

    tracing::subscriber::set_global_default(subscriber).context("Failed to set subscriber")
}
