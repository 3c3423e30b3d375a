//! Error types for update-guard

use thiserror::Error;
use update_guard_check::CheckError;

/// Result type alias for guard operations
pub type GuardResult<T> = Result<T, GuardError>;

/// Reasons a statement is refused before execution.
///
/// Every variant is fatal for the statement that raised it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GuardError {
    /// The SQL to inspect is empty or blank
    #[error("The SQL statement cannot be empty.")]
    EmptyStatement,

    /// The rendered SQL could not be parsed
    #[error("SQL parse error: {0}")]
    ParseFailure(String),

    /// The UPDATE would rewrite every row of its table
    #[error("Updating the entire table data is not allowed in update operations.")]
    FullUpdateRejected,
}

impl GuardError {
    /// Check if this is an empty statement error
    pub fn is_empty_statement(&self) -> bool {
        matches!(self, Self::EmptyStatement)
    }

    /// Check if this is a parse failure
    pub fn is_parse_failure(&self) -> bool {
        matches!(self, Self::ParseFailure(_))
    }

    /// Check if this is a rejected full-table update
    pub fn is_full_update_rejected(&self) -> bool {
        matches!(self, Self::FullUpdateRejected)
    }
}

impl From<CheckError> for GuardError {
    fn from(err: CheckError) -> Self {
        match err {
            CheckError::EmptyStatement => Self::EmptyStatement,
            CheckError::Parse(message) => Self::ParseFailure(message),
        }
    }
}
