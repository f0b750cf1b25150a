//! Crate-level error type.

use crate::sim::SetupError;
use std::io;
use thiserror::Error;

/// Errors that end a session.
#[derive(Debug, Error)]
pub enum Error {
    /// Terminal or display I/O failed.
    #[error("terminal I/O failed: {0}")]
    Io(#[from] io::Error),

    /// The input capture thread could not be started.
    #[error("input thread failed: {0}")]
    InputThread(String),

    /// The race could not be set up.
    #[error("invalid race setup: {0}")]
    Setup(#[from] SetupError),
}

/// Result alias using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
