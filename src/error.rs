//! Error handling module for leadform
//!
//! Provides centralized error handling with proper error types using thiserror.
//! Field-level validation problems are NOT errors in this sense: they are
//! collected in a [`crate::validation::ValidationReport`] and shown inline.

use thiserror::Error;

/// Main error type for leadform
#[derive(Error, Debug)]
pub enum LeadFormError {
    /// IO errors (file operations, terminal, etc.)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A lead record failed validation as a whole
    #[error("Validation error: {0}")]
    Validation(String),

    /// Offer submission failed
    #[error("Submission failed: {0}")]
    Submission(String),

    /// Terminal/UI errors
    #[error("Terminal error: {0}")]
    Terminal(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for leadform operations
pub type Result<T> = std::result::Result<T, LeadFormError>;

impl LeadFormError {
    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a submission error
    pub fn submission(msg: impl Into<String>) -> Self {
        Self::Submission(msg.into())
    }

    /// Create a terminal error
    pub fn terminal(msg: impl Into<String>) -> Self {
        Self::Terminal(msg.into())
    }
}
