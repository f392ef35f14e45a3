//! Error types for logsweeplib

use std::path::PathBuf;
use thiserror::Error;

/// Errors that abort a sweep.
///
/// Failures on individual targets are not errors; they are reported as
/// [`crate::Outcome::Failed`] records.
#[derive(Error, Debug)]
pub enum LogsweepError {
    /// Failed to read a target list file
    #[error("failed to read target list '{path}': {source}")]
    ConfigRead {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Target list is not valid TOML or has unknown fields
    #[error("invalid target list '{path}': {message}")]
    ConfigParse { path: PathBuf, message: String },

    /// Invalid glob pattern
    #[error("invalid glob pattern '{pattern}': {message}")]
    InvalidGlob { pattern: String, message: String },

    /// The process is not running with root privileges
    #[error("this command must be run as root (effective uid {0})")]
    NotRoot(u32),

    /// An external command could not be run or exited unsuccessfully
    #[error("command '{command}' failed: {message}")]
    CommandFailed { command: String, message: String },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
