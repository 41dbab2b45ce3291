//! Error types for the extraction pipeline
//!
//! None of these escape [`ExtractionPipeline::run`](crate::ExtractionPipeline::run):
//! each one is turned into a user-facing message instead.

use taskwright_domain::Field;
use thiserror::Error;

/// Message returned when the completion call fails
pub const RETRY_LATER_MESSAGE: &str =
    "An error occurred while processing your request. Please try again.";

/// Prefix of the message listing missing fields
pub const MISSING_INFORMATION_PREFIX: &str = "Please provide the following missing information: ";

/// Recoverable failures of a single extraction
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractionError {
    /// The completion provider could not be reached, failed, or timed out
    #[error("completion failed: {0}")]
    TransportFault(String),

    /// Required fields are absent or unresolved
    #[error("missing fields: {}", join_labels(.0))]
    IncompleteExtraction(Vec<Field>),

    /// The completion date matched no resolution rule
    #[error("unclear completion date: {0:?}")]
    UnclearDate(String),
}

impl ExtractionError {
    /// Human-readable message for the end user
    pub fn user_message(&self) -> String {
        match self {
            ExtractionError::TransportFault(_) => RETRY_LATER_MESSAGE.to_string(),
            ExtractionError::IncompleteExtraction(fields) => {
                format!("{}{}", MISSING_INFORMATION_PREFIX, join_labels(fields))
            }
            ExtractionError::UnclearDate(raw) => format!(
                "The completion date \"{}\" is unclear. Please provide a specific date (YYYY-MM-DD).",
                raw
            ),
        }
    }
}

fn join_labels(fields: &[Field]) -> String {
    fields
        .iter()
        .map(Field::label)
        .collect::<Vec<_>>()
        .join(", ")
}
