//! Application layer: manifest and error context
//!
//! This layer sits between the pure domain logic and the command-line surface.

pub mod error;
pub mod error_ext;
pub mod manifest;

pub use error::{ApplicationError, ApplicationResult};
pub use error_ext::InfraResultExt;
pub use manifest::AppManifest;
