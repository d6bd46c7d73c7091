//! Unified error type for the pulsecolor-lib crate.
//!
//! The controller itself never fails; [`PulseColorError`] covers the edges
//! around it: color parsing and config persistence.

use std::fmt;

/// Unified error type for pulsecolor-lib operations.
#[derive(Debug)]
pub enum PulseColorError {
    /// Standard I/O error (config read/write).
    Io(std::io::Error),
    /// Configuration validation or serialization error.
    Config(String),
    /// Color parsing error.
    Color(String),
}

impl fmt::Display for PulseColorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PulseColorError::Io(e) => write!(f, "I/O error: {e}"),
            PulseColorError::Config(e) => write!(f, "Config error: {e}"),
            PulseColorError::Color(e) => write!(f, "Color error: {e}"),
        }
    }
}

impl std::error::Error for PulseColorError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PulseColorError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for PulseColorError {
    fn from(e: std::io::Error) -> Self {
        PulseColorError::Io(e)
    }
}

/// Crate-level Result alias using [`PulseColorError`].
pub type Result<T> = std::result::Result<T, PulseColorError>;
