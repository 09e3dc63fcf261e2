//! Application manifest: name, version and description of the hosting application

use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::application::{ApplicationError, ApplicationResult};
use crate::infrastructure::{json, FileSystem};

/// Identity of the application built on this scaffold.
///
/// `name` also determines the system and user configuration paths
/// (`/etc/<name>/config.json`, `~/.<name>/config.json`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppManifest {
    pub name: String,
    pub version: String,
    #[serde(default)]
    pub description: String,
}

impl AppManifest {
    pub fn new(name: impl Into<String>, version: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            description: description.into(),
        }
    }

    /// Load the manifest from a JSON file; the file is required.
    pub fn load(fs: &dyn FileSystem, path: &Path) -> ApplicationResult<Self> {
        let value = json::read(fs, path).map_err(|e| ApplicationError::Manifest {
            message: e.to_string(),
        })?;
        Self::from_value(value, path)
    }

    fn from_value(value: Value, path: &Path) -> ApplicationResult<Self> {
        let manifest: Self = serde_json::from_value(value).map_err(|e| ApplicationError::Manifest {
            message: format!("{} in \"{}\"", e, path.display()),
        })?;

        if manifest.name.trim().is_empty() {
            return Err(ApplicationError::Manifest {
                message: format!("empty \"name\" in \"{}\"", path.display()),
            });
        }
        Ok(manifest)
    }

    /// Name of the environment variable that disables colors for this application.
    pub fn no_color_var(&self) -> String {
        format!("{}_NOCOLOR", self.name.to_uppercase().replace('-', "_"))
    }
}
