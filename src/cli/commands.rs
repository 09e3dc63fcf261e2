//! Built-in commands: help, list, print-config, configtest, version

use std::sync::Arc;

use itertools::Itertools;

use crate::application::{ApplicationError, ApplicationResult, InfraResultExt};
use crate::cli::command::{Command, CommandContext};
use crate::config::schema_path;
use crate::domain::schema;
use crate::infrastructure::{json, FileSystem};

/// Help text for the options every application understands.
pub const COMMON_OPTIONS: &str = "Common options:
    -c FILE,                Include settings stored in a JSON-formatted
    --config FILE           configuration file FILE; repeat option for more
                            than one FILE
    -s KEY=VALUE,           Add runtime setting KEY with its VALUE; separate
    --setting KEY=VALUE     nested keys with \".\", for example \"key1.key2=123\";
                            repeat option for more than one KEY
    --no-colors             Do not print colored messages
    -q, --quiet             Do not output messages, only errors
    -v, --verbose           Be more verbose
    -h, --help              Print this help or information about a
                            specific command
    --version               Print version information";

/// Print the application-wide usage.
pub fn print_app_usage(ctx: &CommandContext<'_>) {
    let program = ctx.config.program();
    let command_list = ctx
        .commands
        .iter()
        .filter(|c| c.title != "help" && c.title != "list")
        .map(|c| format!("    {:<24}{}", c.title, c.description))
        .join("\n");

    ctx.log.info(format!(
        "{description}

Usage: {program} [COMMAND] [OPTIONS]

Commands:
{command_list}

For more information about a specific command use
    {program} help COMMAND
or
    {program} COMMAND --help

List all commands with
    {program} list

{common}",
        description = ctx.config.manifest().description,
        common = COMMON_OPTIONS,
    ));
}

/// `help [COMMAND]`
#[derive(Debug, Default)]
pub struct Help;

impl Command for Help {
    fn execute(&mut self, ctx: &CommandContext<'_>) -> ApplicationResult<()> {
        let token = match ctx.query() {
            Some(token) => token,
            None => {
                print_app_usage(ctx);
                return Ok(());
            }
        };

        match ctx.commands.get(token) {
            Some(spec) => {
                let target = CommandContext {
                    title: token,
                    config: ctx.config,
                    commands: ctx.commands,
                    log: ctx.log,
                };
                spec.instantiate().print_usage(&target);
            }
            None if token.starts_with('-') => print_app_usage(ctx),
            None => {
                ctx.log.error("Unknown command");
                print_app_usage(ctx);
            }
        }
        Ok(())
    }

    fn print_usage(&self, ctx: &CommandContext<'_>) {
        print_app_usage(ctx);
    }
}

/// `list`: all commands, sorted by title
#[derive(Debug, Default)]
pub struct ListCommands;

impl Command for ListCommands {
    fn execute(&mut self, ctx: &CommandContext<'_>) -> ApplicationResult<()> {
        let messages = ctx.log.as_messages();
        messages.info(ctx.description());
        messages.empty_line();

        const TAB: usize = 4;
        let longest = ctx.commands.iter().map(|c| c.title.len()).max().unwrap_or(0);
        let width = TAB * (longest / TAB) + TAB;

        let output = ctx.log.as_output();
        for command in ctx.commands.iter().sorted_by(|a, b| a.title.cmp(&b.title)) {
            output.info(format!(
                "{:<width$}<dim>{}</dim>",
                command.title,
                command.description,
                width = width
            ));
        }
        Ok(())
    }
}

/// `print-config`: resolved settings as pretty-printed JSON
#[derive(Debug, Default)]
pub struct PrintConfig;

impl Command for PrintConfig {
    fn execute(&mut self, ctx: &CommandContext<'_>) -> ApplicationResult<()> {
        let rendered = serde_json::to_string_pretty(ctx.config.settings())
            .map_err(|e| ApplicationError::Output(e.into()))?;
        ctx.log.as_output().raw(rendered);
        Ok(())
    }

    fn print_usage(&self, ctx: &CommandContext<'_>) {
        ctx.log.info(format!(
            "Usage: {} {} [OPTIONS]\n\n{}\n\n{}",
            ctx.config.program(),
            ctx.title,
            ctx.description(),
            COMMON_OPTIONS
        ));
    }
}

/// `configtest`: validate settings against `<app_dir>/config/schema.json`
pub struct ConfigTest {
    fs: Arc<dyn FileSystem>,
}

impl ConfigTest {
    pub fn new(fs: Arc<dyn FileSystem>) -> Self {
        Self { fs }
    }
}

impl Command for ConfigTest {
    fn execute(&mut self, ctx: &CommandContext<'_>) -> ApplicationResult<()> {
        let messages = ctx.log.as_messages();
        messages.info(ctx.description());
        messages.empty_line();

        let path = schema_path(ctx.config.app_dir());
        let content = json::read(self.fs.as_ref(), &path).schema_context(&path)?;
        let rules = schema::parse_rules(content).map_err(|e| ApplicationError::Schema {
            path: path.clone(),
            reason: e.to_string(),
        })?;

        let errors = schema::validate(ctx.config.settings(), &rules);
        if errors.is_empty() {
            ctx.log.info("<green>✔</green> Configuration settings are OK.");
        } else {
            ctx.log.warning("One or more errors found in configuration settings:");
            for error in errors {
                ctx.log.warning(format!("✘ {}", error));
            }
        }
        Ok(())
    }
}

/// `version`: application name and version
#[derive(Debug, Default)]
pub struct Version;

impl Command for Version {
    fn execute(&mut self, ctx: &CommandContext<'_>) -> ApplicationResult<()> {
        let manifest = ctx.config.manifest();
        ctx.log.info(format!("{} {}", manifest.name, manifest.version));
        Ok(())
    }
}
