//! Application-level errors (wraps domain errors)

use std::path::PathBuf;
use thiserror::Error;

use crate::domain::DomainError;

/// Application errors wrap domain errors and add file and dispatch context.
#[derive(Error, Debug)]
pub enum ApplicationError {
    #[error("{0}")]
    Domain(#[from] DomainError),

    #[error("Unable to load configuration file \"{}\": {reason}", .path.display())]
    ConfigFile { path: PathBuf, reason: String },

    #[error("Invalid application manifest: {message}")]
    Manifest { message: String },

    #[error("Unable to load schema \"{}\": {reason}", .path.display())]
    Schema { path: PathBuf, reason: String },

    #[error("Command \"{0}\" not found")]
    UnknownCommand(String),

    #[error("{0}")]
    Usage(String),

    #[error("Unable to write output: {0}")]
    Output(#[source] std::io::Error),
}

impl ApplicationError {
    /// True for failures caused by what the user typed.
    pub fn is_user_input(&self) -> bool {
        match self {
            ApplicationError::Domain(e) => !e.is_declaration(),
            ApplicationError::Usage(_) => true,
            _ => false,
        }
    }
}

/// Result type for application layer operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
