//! clikit: scaffold for command-line applications
//!
//! Declared options and sub-commands, argument parsing, layered JSON
//! configuration (bundled defaults, system, user, `--config` files and
//! `--setting` overrides) and dispatch with a leveled terminal logger.

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;
