//! CLI layer: commands, dispatch and terminal output

pub mod app;
pub mod command;
pub mod commands;
pub mod error;
pub mod output;

pub use app::App;
pub use command::{Command, CommandContext, CommandRegistry, CommandSpec};
pub use error::{CliError, CliResult};
pub use output::{Level, Logger, Verbosity};
