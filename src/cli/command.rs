//! Command trait and registry

use std::fmt;

use crate::application::ApplicationResult;
use crate::cli::output::Logger;
use crate::config::ResolvedConfig;

/// A sub-command of the application.
///
/// The dispatcher calls `setup`, `execute` and `tear_down` in that order, or
/// only `print_usage` when `-h`/`--help` was given.
pub trait Command {
    fn setup(&mut self, _ctx: &CommandContext<'_>) -> ApplicationResult<()> {
        Ok(())
    }

    fn execute(&mut self, ctx: &CommandContext<'_>) -> ApplicationResult<()>;

    fn tear_down(&mut self, _ctx: &CommandContext<'_>) -> ApplicationResult<()> {
        Ok(())
    }

    fn print_usage(&self, ctx: &CommandContext<'_>) {
        ctx.log.info(format!(
            "Usage: {} {} [OPTIONS]\n\n{}",
            ctx.config.program(),
            ctx.title,
            ctx.description()
        ));
    }
}

/// Creates a fresh command instance.
pub type CommandFactory = Box<dyn Fn() -> Box<dyn Command>>;

/// A registered command.
pub struct CommandSpec {
    pub title: String,
    pub description: String,
    factory: CommandFactory,
}

impl CommandSpec {
    pub fn new(title: impl Into<String>, description: impl Into<String>, factory: CommandFactory) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            factory,
        }
    }

    pub fn instantiate(&self) -> Box<dyn Command> {
        (self.factory)()
    }
}

impl fmt::Debug for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandSpec")
            .field("title", &self.title)
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}

/// Commands in registration order; titles are unique.
#[derive(Debug, Default)]
pub struct CommandRegistry {
    commands: Vec<CommandSpec>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a command; an existing command with the same title is replaced in place.
    pub fn add<F, C>(&mut self, title: &str, description: &str, factory: F)
    where
        F: Fn() -> C + 'static,
        C: Command + 'static,
    {
        let spec = CommandSpec::new(
            title,
            description,
            Box::new(move || Box::new(factory()) as Box<dyn Command>),
        );

        match self.commands.iter_mut().find(|c| c.title == title) {
            Some(existing) => *existing = spec,
            None => self.commands.push(spec),
        }
    }

    pub fn get(&self, title: &str) -> Option<&CommandSpec> {
        self.commands.iter().find(|c| c.title == title)
    }

    pub fn contains(&self, title: &str) -> bool {
        self.get(title).is_some()
    }

    pub fn titles(&self) -> Vec<&str> {
        self.commands.iter().map(|c| c.title.as_str()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CommandSpec> {
        self.commands.iter()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

/// What a running command gets to see.
pub struct CommandContext<'a> {
    /// Title of the running command
    pub title: &'a str,
    pub config: &'a ResolvedConfig,
    pub commands: &'a CommandRegistry,
    pub log: &'a Logger,
}

impl<'a> CommandContext<'a> {
    pub fn description(&self) -> &str {
        self.commands
            .get(self.title)
            .map(|c| c.description.as_str())
            .unwrap_or("")
    }

    /// The token following the running command's title on the command line.
    pub fn query(&self) -> Option<&'a str> {
        let args = self.config.args();
        args.iter()
            .position(|a| a == self.title)
            .and_then(|i| args.get(i + 1))
            .map(String::as_str)
    }
}
