//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Domain errors represent malformed declarations and bad user input.
/// These are independent of file I/O and dispatch concerns.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Bad short option \"{0}\"")]
    BadShortOption(String),

    #[error("Bad long option \"{0}\"")]
    BadLongOption(String),

    #[error("Option needs a short or a long name")]
    UnnamedOption,

    #[error("Option \"{0}\" needs a value")]
    MissingValue(String),

    #[error("Required option {0} is missing")]
    MissingOption(String),

    #[error("Invalid runtime setting \"{0}\"")]
    InvalidSetting(String),

    #[error("Unknown value \"{value}\" for option \"{option}\"")]
    UnknownOptionValue { option: String, value: String },
}

impl DomainError {
    /// Errors raised while declaring options, before any user input is seen.
    pub fn is_declaration(&self) -> bool {
        matches!(
            self,
            DomainError::BadShortOption(_) | DomainError::BadLongOption(_) | DomainError::UnnamedOption
        )
    }
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
