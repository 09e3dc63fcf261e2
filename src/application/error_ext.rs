//! Error conversion helpers for file loading
//!
//! Provides extension traits for turning infrastructure failures into
//! application errors that name the offending file.

use std::path::Path;

use crate::application::{ApplicationError, ApplicationResult};
use crate::infrastructure::InfraError;

/// Extension trait for converting `InfraResult` to `ApplicationResult` with context.
pub trait InfraResultExt<T> {
    /// Attribute the failure to a configuration file.
    ///
    /// # Example
    /// ```ignore
    /// json::read(fs, &path).config_file_context(&path)?;
    /// ```
    fn config_file_context(self, path: &Path) -> ApplicationResult<T>;

    /// Attribute the failure to a schema file.
    fn schema_context(self, path: &Path) -> ApplicationResult<T>;
}

fn reason(e: &InfraError) -> String {
    match e {
        InfraError::Read { source, .. } => source.to_string(),
        InfraError::InvalidJson { source, .. } => format!("invalid JSON data ({})", source),
    }
}

impl<T> InfraResultExt<T> for Result<T, InfraError> {
    fn config_file_context(self, path: &Path) -> ApplicationResult<T> {
        self.map_err(|e| ApplicationError::ConfigFile {
            path: path.to_path_buf(),
            reason: reason(&e),
        })
    }

    fn schema_context(self, path: &Path) -> ApplicationResult<T> {
        self.map_err(|e| ApplicationError::Schema {
            path: path.to_path_buf(),
            reason: reason(&e),
        })
    }
}
