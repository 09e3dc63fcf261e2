//! CLI-level errors (wraps application and domain errors)

use thiserror::Error;

use crate::application::ApplicationError;
use crate::domain::DomainError;
use crate::exitcode;

/// CLI errors are the top-level error type.
/// These are what get displayed to the user.
#[derive(Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    Application(#[from] ApplicationError),

    #[error("{0}")]
    Domain(#[from] DomainError),
}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

impl CliError {
    /// True when the user should be shown the usage text.
    pub fn is_usage(&self) -> bool {
        match self {
            CliError::Application(e) => e.is_user_input(),
            CliError::Domain(e) => !e.is_declaration(),
        }
    }

    /// Get the appropriate exit code for this error.
    pub fn exit_code(&self) -> i32 {
        if self.is_usage() {
            return exitcode::USAGE;
        }
        match self {
            CliError::Application(e) => match e {
                ApplicationError::ConfigFile { .. } | ApplicationError::Schema { .. } => exitcode::CONFIG,
                ApplicationError::Manifest { .. } => exitcode::NOINPUT,
                ApplicationError::Output(_) => exitcode::IOERR,
                ApplicationError::UnknownCommand(_) => exitcode::SOFTWARE,
                ApplicationError::Domain(_) | ApplicationError::Usage(_) => exitcode::SOFTWARE,
            },
            CliError::Domain(_) => exitcode::SOFTWARE,
        }
    }
}
