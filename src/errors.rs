//! Error Types
//!
//! This module defines the error types used throughout the exhibit engine.
//!
//! # Overview
//!
//! The main error type [`VitrineError`] covers the fatal failure modes:
//! - Asset container correction failures (wrong magic bytes)
//! - Asset fetch and decode errors
//! - Construction-time misconfiguration
//!
//! Lookup misses during the interactive phase (unknown annotation, region or
//! clip names) are *not* errors. They are reported through `log::warn!` and
//! treated as no-ops so that a single bad choreography step never halts the
//! exhibit.
//!
//! # Usage
//!
//! All fallible public APIs return [`Result<T>`] which is an alias for
//! `std::result::Result<T, VitrineError>`.
//!
//! ```rust,ignore
//! use vitrine::errors::{Result, VitrineError};
//!
//! fn check(bytes: &[u8]) -> Result<()> {
//!     if bytes.len() < 4 {
//!         return Err(VitrineError::Format("truncated header".into()));
//!     }
//!     Ok(())
//! }
//! ```

use thiserror::Error;

/// The main error type for the exhibit engine.
#[derive(Error, Debug)]
pub enum VitrineError {
    // ========================================================================
    // Asset Loading Errors
    // ========================================================================
    /// The asset's magic prefix does not match the expected altered container
    /// header. Raised before any decode is attempted.
    #[error("Unexpected asset format: {0}")]
    Format(String),

    /// The asset bytes could not be fetched.
    #[error("Failed to load asset '{source_uri}': {reason}")]
    Load {
        /// Path or URL that was requested
        source_uri: String,
        /// Underlying failure description
        reason: String,
    },

    /// The corrected container could not be decoded.
    #[error("glTF parse error: {0}")]
    Parse(String),

    // ========================================================================
    // Configuration Errors
    // ========================================================================
    /// A required collaborator or parameter is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    // ========================================================================
    // I/O & Serialization Errors
    // ========================================================================
    /// File I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// Base64 decoding error (embedded `data:` buffers).
    #[error("Base64 decode error: {0}")]
    Base64(#[from] base64::DecodeError),

    /// URL parsing error.
    #[cfg(feature = "http")]
    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    /// HTTP response error with status code.
    #[error("HTTP response error: status {status}")]
    HttpResponse {
        /// HTTP status code
        status: u16,
    },
}

// ============================================================================
// Convenient conversion implementations
// ============================================================================

impl From<gltf::Error> for VitrineError {
    fn from(err: gltf::Error) -> Self {
        VitrineError::Parse(err.to_string())
    }
}

impl VitrineError {
    /// Wraps a fetch failure for `source_uri`.
    pub fn load(source_uri: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        VitrineError::Load {
            source_uri: source_uri.into(),
            reason: reason.to_string(),
        }
    }

    /// Whether this error was raised by the loader (format, fetch or decode).
    #[must_use]
    pub fn is_load_failure(&self) -> bool {
        matches!(
            self,
            VitrineError::Format(_)
                | VitrineError::Load { .. }
                | VitrineError::Parse(_)
                | VitrineError::HttpResponse { .. }
        )
    }
}

/// Alias for `Result<T, VitrineError>`.
pub type Result<T> = std::result::Result<T, VitrineError>;
