//! Infrastructure-level errors (file and decode failures)

use std::path::PathBuf;

use thiserror::Error;

/// Infrastructure errors carry the offending path and the underlying cause.
#[derive(Error, Debug)]
pub enum InfraError {
    #[error("Unable to read file \"{}\"", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("File \"{}\" contains invalid JSON data: {source}", .path.display())]
    InvalidJson {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl InfraError {
    /// Create a read error with path context.
    pub fn read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Read {
            path: path.into(),
            source,
        }
    }
}

/// Result type for infrastructure layer operations.
pub type InfraResult<T> = Result<T, InfraError>;
