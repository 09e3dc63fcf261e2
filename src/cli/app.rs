//! The application: declared options, registered commands and dispatch

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use serde_json::{json, Value};
use tracing::{debug, instrument};

use crate::application::{AppManifest, ApplicationError, ApplicationResult};
use crate::cli::command::{Command, CommandContext, CommandRegistry};
use crate::cli::commands::{print_app_usage, ConfigTest, Help, ListCommands, PrintConfig, Version};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output::{Logger, Verbosity};
use crate::config::{ConfigLoader, ConfigPaths, ResolvedConfig};
use crate::domain::{parse_arguments, parse_options, Arity, DomainResult, OptionSpec, OptionTable, ParsedOptions};
use crate::exitcode;
use crate::infrastructure::{Environment, FileSystem, ProcessEnvironment, RealFileSystem};

const HELP_OPTIONS: [&str; 2] = ["h", "help"];
const QUIET_OPTIONS: [&str; 2] = ["q", "quiet"];
const VERBOSE_OPTIONS: [&str; 2] = ["v", "verbose"];

fn standard_options() -> DomainResult<OptionTable> {
    let mut options = OptionTable::new();
    options
        .add(Some("c"), Some("config"), Arity::Optional)?
        .add(Some("h"), Some("help"), Arity::NoValue)?
        .add(None, Some("no-colors"), Arity::NoValue)?
        .add(Some("q"), Some("quiet"), Arity::NoValue)?
        .add(Some("v"), Some("verbose"), Arity::NoValue)?
        .add(None, Some("version"), Arity::NoValue)?
        .add(Some("s"), Some("setting"), Arity::Optional)?;
    Ok(options)
}

/// A command-line application.
///
/// ```no_run
/// use clikit::application::AppManifest;
/// use clikit::cli::App;
///
/// let app = App::new(AppManifest::new("demo", "0.1.0", "Demo application"), "/opt/demo").unwrap();
/// let argv: Vec<String> = std::env::args().collect();
/// std::process::exit(app.run(&argv));
/// ```
pub struct App {
    manifest: AppManifest,
    app_dir: PathBuf,
    options: OptionTable,
    commands: CommandRegistry,
    fs: Arc<dyn FileSystem>,
    env: Arc<dyn Environment>,
    logger: Logger,
}

impl App {
    /// Application with the standard options and built-in commands.
    pub fn new(manifest: AppManifest, app_dir: impl Into<PathBuf>) -> CliResult<Self> {
        let mut app = Self {
            manifest,
            app_dir: app_dir.into(),
            options: standard_options()?,
            commands: CommandRegistry::new(),
            fs: Arc::new(RealFileSystem),
            env: Arc::new(ProcessEnvironment),
            logger: Logger::default(),
        };

        app.commands.add("help", "Show this help", || Help);
        app.commands.add("list", "List all commands", || ListCommands);
        app.register_configtest();
        app.commands
            .add("print-config", "Print current configuration settings", || PrintConfig);
        app.commands
            .add("version", "Print version information", || Version);
        Ok(app)
    }

    /// Replace the filesystem used for configuration and schema files.
    pub fn with_fs(mut self, fs: Arc<dyn FileSystem>) -> Self {
        self.fs = fs;
        self.register_configtest();
        self
    }

    /// Replace the process environment (variables, home directory, terminal).
    pub fn with_env(mut self, env: Arc<dyn Environment>) -> Self {
        self.env = env;
        self
    }

    /// Replace the base logger; verbosity and colors are still adjusted per run.
    pub fn with_logger(mut self, logger: Logger) -> Self {
        self.logger = logger;
        self
    }

    fn register_configtest(&mut self) {
        let fs = self.fs.clone();
        self.commands
            .add("configtest", "Validate configuration settings", move || ConfigTest::new(fs.clone()));
    }

    /// Register a command; a command with the same title is replaced.
    pub fn add_command<F, C>(&mut self, title: &str, description: &str, factory: F) -> &mut Self
    where
        F: Fn() -> C + 'static,
        C: Command + 'static,
    {
        self.commands.add(title, description, factory);
        self
    }

    /// Declare an option.
    pub fn add_option(&mut self, short: Option<&str>, long: Option<&str>, arity: Arity) -> DomainResult<&mut Self> {
        self.options.push(OptionSpec::new(short, long, arity)?);
        Ok(self)
    }

    pub fn manifest(&self) -> &AppManifest {
        &self.manifest
    }

    pub fn app_dir(&self) -> &Path {
        &self.app_dir
    }

    pub fn options(&self) -> &OptionTable {
        &self.options
    }

    pub fn commands(&self) -> &CommandRegistry {
        &self.commands
    }

    /// Parse `argv` and load the configuration.
    #[instrument(level = "debug", skip(self))]
    pub fn resolve(&self, argv: &[String]) -> ApplicationResult<ResolvedConfig> {
        let options = parse_options(argv, &self.options)?;
        let titles = self.commands.titles();
        let arguments = parse_arguments(argv, &self.options, &titles);
        let command = argv
            .iter()
            .skip(1)
            .find(|token| self.commands.contains(token))
            .cloned();

        let paths = ConfigPaths::detect(&self.manifest.name, &self.app_dir, self.env.as_ref());
        let settings = ConfigLoader::new(self.fs.clone(), paths).load(&options)?;

        Ok(ResolvedConfig::new(
            argv.to_vec(),
            options,
            arguments,
            command,
            self.manifest.clone(),
            self.app_dir.clone(),
            settings,
        ))
    }

    /// Logger for this run, honoring `log.verbosity`, `-q`, `-v` and the color switches.
    ///
    /// `-q` and `-v` win over the `log.verbosity` setting.
    pub fn logger_for(&self, config: &ResolvedConfig) -> Logger {
        let options = config.options();
        let verbosity = if options.any(&QUIET_OPTIONS) {
            Verbosity::Quiet
        } else if options.any(&VERBOSE_OPTIONS) {
            Verbosity::Verbose
        } else {
            config
                .get("log.verbosity")
                .and_then(Verbosity::from_setting)
                .unwrap_or_else(|| self.logger.verbosity())
        };

        let colorize = self.logger.colorize() && self.colors_enabled(options, config.settings());
        self.logger.clone().with_verbosity(verbosity).with_colors(colorize)
    }

    fn colors_enabled(&self, options: &ParsedOptions, settings: &Value) -> bool {
        let disabled_by_setting = settings
            .get("log")
            .and_then(|log| log.get("colorize"))
            .and_then(Value::as_bool)
            == Some(false);

        !disabled_by_setting
            && !options.contains("no-colors")
            && self.env.var("NO_COLOR").is_none()
            && self.env.var(&self.manifest.no_color_var()).is_none()
            && self.env.stdout_is_terminal()
    }

    /// Run the application and return the process exit status.
    ///
    /// Errors are reported through the logger; usage errors are followed by the
    /// application usage.
    pub fn run(&self, argv: &[String]) -> i32 {
        let config = match self.resolve(argv) {
            Ok(config) => config,
            Err(e) => {
                let error = CliError::from(e);
                let config = self.bare_config(argv);
                self.report(&error, &config, &self.logger_for(&config));
                return error.exit_code();
            }
        };

        let log = self.logger_for(&config);
        match self.dispatch(&config, &log) {
            Ok(()) => exitcode::OK,
            Err(e) => {
                let error = CliError::from(e);
                self.report(&error, &config, &log);
                error.exit_code()
            }
        }
    }

    /// Resolve and dispatch, leaving error reporting to the caller.
    pub fn try_run(&self, argv: &[String]) -> CliResult<()> {
        let config = self.resolve(argv)?;
        let log = self.logger_for(&config);
        self.dispatch(&config, &log)?;
        Ok(())
    }

    /// Choose and run the requested command.
    #[instrument(level = "debug", skip_all)]
    pub fn dispatch(&self, config: &ResolvedConfig, log: &Logger) -> ApplicationResult<()> {
        let options = config.options();

        if options.contains("version") {
            return self.run_command("version", config, log);
        }
        if config.args().len() == 2 && options.contains("v") {
            return self.run_command("version", config, log);
        }
        if config.args().len() < 2 {
            return Err(ApplicationError::Usage("Too few arguments".to_string()));
        }
        if let Some(title) = config.command() {
            return self.run_command(title, config, log);
        }
        if options.any(&HELP_OPTIONS) {
            return self.run_command("help", config, log);
        }
        Err(ApplicationError::Usage("Bad request".to_string()))
    }

    /// Run a registered command, or print its usage when help was requested.
    #[instrument(level = "debug", skip(self, config, log))]
    pub fn run_command(&self, title: &str, config: &ResolvedConfig, log: &Logger) -> ApplicationResult<()> {
        let spec = self
            .commands
            .get(title)
            .ok_or_else(|| ApplicationError::UnknownCommand(title.to_string()))?;
        let ctx = CommandContext {
            title,
            config,
            commands: &self.commands,
            log,
        };
        let mut command = spec.instantiate();

        if config.options().any(&HELP_OPTIONS) {
            command.print_usage(&ctx);
            return Ok(());
        }

        let start = Instant::now();
        command.setup(&ctx)?;
        command.execute(&ctx)?;
        command.tear_down(&ctx)?;
        log.debug(format!("This took {:.3} second(s).", start.elapsed().as_secs_f64()));
        Ok(())
    }

    fn bare_config(&self, argv: &[String]) -> ResolvedConfig {
        let options = parse_options(argv, &self.options).unwrap_or_default();
        ResolvedConfig::new(
            argv.to_vec(),
            options,
            Vec::new(),
            None,
            self.manifest.clone(),
            self.app_dir.clone(),
            json!({}),
        )
    }

    fn report(&self, error: &CliError, config: &ResolvedConfig, log: &Logger) {
        debug!("reporting {:?}", error);
        log.as_messages().fatal(error);

        if error.is_usage() {
            let ctx = CommandContext {
                title: "help",
                config,
                commands: &self.commands,
                log,
            };
            log.empty_line();
            print_app_usage(&ctx);
        }
    }
}
