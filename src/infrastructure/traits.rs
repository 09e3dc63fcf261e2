//! I/O boundary traits for testability
//!
//! These traits abstract the filesystem and the process environment, allowing
//! the configuration pipeline to be tested with fake implementations.

use std::io;
use std::io::IsTerminal;
use std::path::{Path, PathBuf};

/// Filesystem abstraction for testability.
pub trait FileSystem: Send + Sync {
    /// Read file contents to string.
    fn read_to_string(&self, path: &Path) -> io::Result<String>;

    /// Check if path is a file.
    fn is_file(&self, path: &Path) -> bool;
}

/// Process environment abstraction: variables, well-known directories, identity.
pub trait Environment: Send + Sync {
    /// Value of an environment variable, if set and valid unicode.
    fn var(&self, key: &str) -> Option<String>;

    /// Home directory of the current user.
    fn home_dir(&self) -> Option<PathBuf>;

    /// Platform-specific local application data directory (`%LOCALAPPDATA%` on Windows).
    fn data_local_dir(&self) -> Option<PathBuf>;

    /// True when running with administrative privileges (root on Unix).
    fn is_privileged(&self) -> bool;

    /// True when stdout is attached to a terminal.
    fn stdout_is_terminal(&self) -> bool;
}

// ============================================================
// REAL IMPLEMENTATIONS
// ============================================================

/// Real filesystem implementation.
#[derive(Debug, Default)]
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }

    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }
}

/// Real process environment.
#[derive(Debug, Default)]
pub struct ProcessEnvironment;

impl Environment for ProcessEnvironment {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }

    fn home_dir(&self) -> Option<PathBuf> {
        directories::BaseDirs::new().map(|dirs| dirs.home_dir().to_path_buf())
    }

    fn data_local_dir(&self) -> Option<PathBuf> {
        directories::BaseDirs::new().map(|dirs| dirs.data_local_dir().to_path_buf())
    }

    fn is_privileged(&self) -> bool {
        cfg!(unix) && self.var("USER").as_deref() == Some("root")
    }

    fn stdout_is_terminal(&self) -> bool {
        io::stdout().is_terminal()
    }
}
