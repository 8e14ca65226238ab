//! Crate error type.

use thiserror::Error;

use crate::validation::ValidationError;

/// Errors surfaced by the timetable crate.
///
/// Only configuration problems are fatal. Placement shortfalls and
/// normalization repairs are absorbed into fitness and never reported here.
#[derive(Debug, Error)]
pub enum TimetableError {
    /// The request failed validation; carries every problem found.
    #[error("invalid timetable configuration: {}", join_messages(.0))]
    InvalidConfig(Vec<ValidationError>),

    /// The request could not be parsed.
    #[error("malformed request JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The request file could not be read.
    #[error("failed to read request: {0}")]
    Io(#[from] std::io::Error),
}

fn join_messages(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}

impl From<Vec<ValidationError>> for TimetableError {
    fn from(errors: Vec<ValidationError>) -> Self {
        Self::InvalidConfig(errors)
    }
}
