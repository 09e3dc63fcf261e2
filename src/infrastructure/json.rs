//! JSON-formatted files

use std::path::Path;

use serde_json::Value;
use tracing::{debug, instrument};

use crate::infrastructure::error::{InfraError, InfraResult};
use crate::infrastructure::traits::FileSystem;

/// Read and decode a JSON file; the file must exist and be readable.
#[instrument(level = "debug", skip(fs))]
pub fn read(fs: &dyn FileSystem, path: &Path) -> InfraResult<Value> {
    let content = fs
        .read_to_string(path)
        .map_err(|e| InfraError::read(path, e))?;

    serde_json::from_str(content.trim()).map_err(|source| InfraError::InvalidJson {
        path: path.to_path_buf(),
        source,
    })
}

/// Like [`read`], but a missing or unreadable file yields `None`.
///
/// A file that is present but malformed is still an error.
#[instrument(level = "debug", skip(fs))]
pub fn read_optional(fs: &dyn FileSystem, path: &Path) -> InfraResult<Option<Value>> {
    if !fs.is_file(path) {
        debug!("skipping absent file {}", path.display());
        return Ok(None);
    }

    match fs.read_to_string(path) {
        Ok(content) => serde_json::from_str(content.trim())
            .map(Some)
            .map_err(|source| InfraError::InvalidJson {
                path: path.to_path_buf(),
                source,
            }),
        Err(e) => {
            debug!("skipping unreadable file {}: {}", path.display(), e);
            Ok(None)
        }
    }
}
