//! Unified error handling for Templar Core.
//!
//! This module provides a unified error type that wraps domain and application
//! errors. The engine has no retry or recovery path — every variant here is
//! fatal for the whole expansion, and partial output is never emitted.

use thiserror::Error;

use crate::application::ApplicationError;
use crate::domain::DomainError;

/// Root error type for Templar Core operations.
#[derive(Debug, Error, Clone)]
pub enum TemplarError {
    /// Errors from the domain layer (expansion semantics violations).
    #[error("Expansion error: {0}")]
    Domain(#[from] DomainError),

    /// Errors from the application layer (document loading failures).
    #[error("Application error: {0}")]
    Application(#[from] ApplicationError),

    /// Unexpected internal errors (bugs).
    #[error("Internal error: {message}. This is a bug, please report it.")]
    Internal { message: String },
}

impl TemplarError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::Domain(e) => e.suggestions(),
            Self::Application(e) => e.suggestions(),
            Self::Internal { .. } => vec![
                "This appears to be a bug in Templar".into(),
                "Please report this issue at: https://github.com/cosecruz/templar/issues".into(),
            ],
        }
    }

    /// Get error category for display/styling purposes.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Domain(_) => ErrorCategory::Expansion,
            Self::Application(e) => e.category(),
            Self::Internal { .. } => ErrorCategory::Internal,
        }
    }
}

/// Error categories for UI display and exit-code mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// The document violates the expansion semantics (structural, reference,
    /// or evaluation failure).
    Expansion,
    /// An input or include target does not exist.
    NotFound,
    /// A document exists but could not be read or parsed.
    InvalidDocument,
    /// Unexpected failure inside the engine.
    Internal,
}

/// Convenient result type alias.
pub type TemplarResult<T> = Result<T, TemplarError>;
