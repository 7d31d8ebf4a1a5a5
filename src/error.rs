//! Error types for plugcheck operations.
//!
//! This module defines [`PlugcheckError`], the primary error type used
//! throughout the application, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Use `PlugcheckError` for domain-specific errors that need distinct handling
//! - Use `anyhow::Error` (via `PlugcheckError::Other`) for unexpected errors
//! - Per-plugin manifest failures during a broad scan are surfaced as report
//!   data, not errors; only invocation-level failures reach the caller

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for plugcheck operations.
#[derive(Debug, Error)]
pub enum PlugcheckError {
    /// No manifest found for an explicitly named plugin.
    #[error("Manifest error: no dependency manifest found for plugin '{plugin}'")]
    ManifestNotFound { plugin: String },

    /// Failed to read or parse a dependency manifest.
    #[error("Manifest error: failed to parse {path}: {message}")]
    ManifestParse { path: PathBuf, message: String },

    /// Manifest parsed but violates a structural invariant.
    #[error("Manifest error: invalid manifest at {path}: {message}")]
    ManifestInvalid { path: PathBuf, message: String },

    /// An explicitly named plugin is not installed.
    #[error("Manifest error: plugin '{plugin}' is not installed")]
    PluginNotInstalled { plugin: String },

    /// Input to `render`/`resolve` is not a valid check report.
    #[error("Invalid report input: {message}")]
    InvalidReport { message: String },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl PlugcheckError {
    /// Whether this error came from manifest loading or validation.
    pub fn is_manifest_error(&self) -> bool {
        matches!(
            self,
            PlugcheckError::ManifestNotFound { .. }
                | PlugcheckError::ManifestParse { .. }
                | PlugcheckError::ManifestInvalid { .. }
                | PlugcheckError::PluginNotInstalled { .. }
        )
    }
}

/// Result type alias for plugcheck operations.
pub type Result<T> = std::result::Result<T, PlugcheckError>;
