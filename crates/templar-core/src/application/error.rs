//! Application layer errors.
//!
//! These errors represent failures at the loading seam, not expansion logic.
//! Expansion logic errors are `DomainError` from `crate::domain`.

use std::path::PathBuf;
use thiserror::Error;

use crate::error::ErrorCategory;

/// Errors that occur while bringing documents into the engine.
#[derive(Debug, Error, Clone)]
pub enum ApplicationError {
    /// The input or include target does not exist.
    #[error("Document not found: {path}")]
    DocumentNotFound { path: PathBuf },

    /// The document exists but could not be read or parsed as markup.
    #[error("Failed to load {path}: {reason}")]
    DocumentLoad { path: PathBuf, reason: String },
}

impl ApplicationError {
    /// Get user-actionable suggestions.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::DocumentNotFound { path } => vec![
                format!("No file at: {}", path.display()),
                "For absolute includes, check the -I / --include-dir base".into(),
                "For relative includes, paths resolve against the including file".into(),
            ],
            Self::DocumentLoad { path, .. } => vec![
                format!("Could not parse: {}", path.display()),
                "The input must be well-formed markup".into(),
            ],
        }
    }

    /// Get error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::DocumentNotFound { .. } => ErrorCategory::NotFound,
            Self::DocumentLoad { .. } => ErrorCategory::InvalidDocument,
        }
    }
}
