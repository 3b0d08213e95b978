//! # Error Types
//!
//! This module defines error types used throughout the shades library.

use thiserror::Error;

/// Main error type for shades operations
#[derive(Debug, Error)]
pub enum ShadesError {
    /// Bad construction or call arguments (non-positive scale or radius,
    /// mismatched sequence lengths, degenerate geometry)
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Operation has no implementation on this platform
    #[error("Not implemented: {0}")]
    NotImplemented(String),

    /// Image encoding / decoding error
    #[error("Image error: {0}")]
    Image(String),

    /// Malformed scene description
    #[error("Scene error: {0}")]
    Scene(String),

    /// I/O error wrapper
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ShadesError {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        ShadesError::InvalidParameter(message.into())
    }
}

/// Result alias used by every fallible operation in the crate.
pub type Result<T> = std::result::Result<T, ShadesError>;
