use thiserror::Error;

/// Validation errors for domain values built from caller input.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("symbol cannot be empty")]
    EmptySymbol,

    #[error("date must be YYYY-MM-DD: '{value}'")]
    InvalidDate { value: String },
}
