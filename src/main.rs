use std::env;
use std::path::{Path, PathBuf};
use std::process;

use colored::Colorize;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer};

use clikit::application::{AppManifest, ApplicationResult};
use clikit::cli::commands::COMMON_OPTIONS;
use clikit::cli::{App, CliResult, Command, CommandContext};
use clikit::domain::Arity;

/// `greet [NAME]`: say hello
#[derive(Debug, Default)]
struct Greet;

impl Command for Greet {
    fn execute(&mut self, ctx: &CommandContext<'_>) -> ApplicationResult<()> {
        let config = ctx.config;
        let name = config
            .arguments()
            .first()
            .cloned()
            .or_else(|| config.get("greet.name").and_then(|v| v.as_str()).map(String::from))
            .unwrap_or_else(|| "world".to_string());

        let greeting = if config.options().any(&["l", "loud"]) {
            format!("HELLO, {}!", name.to_uppercase())
        } else {
            format!("Hello, {}!", name)
        };

        ctx.log.debug(format!("greeting <strong>{}</strong>", name));
        ctx.log.as_output().info(greeting);
        Ok(())
    }

    fn print_usage(&self, ctx: &CommandContext<'_>) {
        ctx.log.info(format!(
            "Usage: {} {} [NAME] [OPTIONS]

{}

Options:
    -l, --loud              Shout

{}",
            ctx.config.program(),
            ctx.title,
            ctx.description(),
            COMMON_OPTIONS
        ));
    }
}

fn build_app(app_dir: PathBuf) -> CliResult<App> {
    let manifest = AppManifest::new(
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION"),
        env!("CARGO_PKG_DESCRIPTION"),
    );

    let mut app = App::new(manifest, app_dir)?;
    app.add_option(Some("l"), Some("loud"), Arity::NoValue)?;
    app.add_command("greet", "Say hello", || Greet);
    Ok(app)
}

fn main() {
    setup_logging();

    let app_dir = env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from("."));

    let app = match build_app(app_dir) {
        Ok(app) => app,
        Err(e) => {
            eprintln!("{}", format!("Error: {}", e).red());
            process::exit(e.exit_code());
        }
    };

    let argv: Vec<String> = env::args().collect();
    process::exit(app.run(&argv));
}

/// Diagnostics go to stderr, filtered by `RUST_LOG` (default: warnings).
fn setup_logging() {
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .from_env_lossy();

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_names(false)
        .with_span_events(FmtSpan::CLOSE);

    tracing_subscriber::registry()
        .with(fmt_layer.with_filter(filter))
        .init();
}
