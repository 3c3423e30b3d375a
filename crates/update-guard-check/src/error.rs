//! Error types for update-guard-check

use thiserror::Error;

/// Result type for update-guard-check operations.
pub type CheckResult<T> = Result<T, CheckError>;

/// Error type for update-guard-check operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CheckError {
    /// The SQL text is empty or only whitespace.
    #[error("The SQL statement cannot be empty.")]
    EmptyStatement,
    /// The SQL parser rejected the literal SQL text.
    #[error("SQL parse error: {0}")]
    Parse(String),
}

impl CheckError {
    /// Create a parse error.
    pub fn parse(message: impl Into<String>) -> Self {
        CheckError::Parse(message.into())
    }
}
