//! Plugin Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.

use derive_more::{Display, Error};
use std::path::PathBuf;

/// A plugin error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for plugin operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    /// The HTML entry could not be read. The storage error is kept as a child
    /// frame.
    #[display("Could not resolve html entry `{}`", _0.display())]
    Load(#[error(not(source))] PathBuf),
    /// The plugin options cannot be used.
    #[display("invalid plugin configuration")]
    Config,
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        // Whether a failed read is worth retrying is decided by the storage
        // error underneath; the plugin itself never retries.
        false
    }
}
