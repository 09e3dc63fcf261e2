//! Infrastructure layer: filesystem, process environment and JSON files
//!
//! This layer implements the I/O boundary traits used by the configuration pipeline.

pub mod error;
pub mod json;
pub mod traits;

pub use error::{InfraError, InfraResult};
pub use traits::{Environment, FileSystem, ProcessEnvironment, RealFileSystem};
