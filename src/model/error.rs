//! Error types for the gallery shell.
//!
//! The core engine never faults under normal operation: content errors become
//! an error placeholder, a missing strategy makes hooks no-ops, and pool
//! exhaustion falls back to allocation. The types here cover the ambient
//! shell around it (configuration, logging, script replay, terminal I/O) and
//! compose through `?` and `From`.
//!
//! # Error Hierarchy
//!
//! - [`AppError`] - Top-level error returned from `main`
//!   - [`ConfigError`](crate::config::ConfigError) - config file path/read/parse failures
//!   - [`LoggingError`](crate::logging::LoggingError) - log file setup failures
//!   - [`ReplayError`] - script read failures and malformed script lines
//!   - [`TuiError`](crate::view::TuiError) - terminal failures

use crate::config::ConfigError;
use crate::logging::LoggingError;
use crate::view::TuiError;
use std::path::PathBuf;
use thiserror::Error;

/// Top-level application error encompassing all failure modes.
///
/// All of these are fatal for the binary: `main` prints them and exits with a
/// non-zero status.
///
/// # Examples
///
/// ```no_run
/// use gallery_engine::model::error::{AppError, ReplayError};
///
/// fn run() -> Result<(), AppError> {
///     // ReplayError converts into AppError via From
///     load()?;
///     Ok(())
/// }
/// # fn load() -> Result<(), ReplayError> { Ok(()) }
/// ```
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Logging could not be initialised.
    #[error("Logging error: {0}")]
    Logging(#[from] LoggingError),

    /// A replay script could not be read or parsed.
    #[error("Replay error: {0}")]
    Replay(#[from] ReplayError),

    /// Terminal setup, drawing or teardown failed.
    #[error("Terminal error: {0}")]
    Terminal(#[from] TuiError),

    /// Writing the replay summary failed.
    #[error("Output error: {0}")]
    Output(#[from] std::io::Error),
}

/// Errors raised while loading a gesture replay script.
#[derive(Debug, Error)]
pub enum ReplayError {
    /// The script file could not be read.
    #[error("Failed to read script {path}: {source}")]
    Read {
        /// Script path as given.
        path: PathBuf,
        /// Underlying I/O failure.
        source: std::io::Error,
    },

    /// A line is neither a command nor a frame marker.
    ///
    /// Line numbers are 1-based to match what editors show.
    #[error("Invalid script step at line {line}: {message}")]
    InvalidStep {
        /// 1-based line number.
        line: usize,
        /// serde_json's description of the problem.
        message: String,
    },
}
