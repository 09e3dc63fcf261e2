//! Leveled terminal output with colors
//!
//! Messages may carry inline markup (`<strong>`, `<u>`, `<dim>`, `<red>`,
//! `<yellow>`, `<green>`, `<grey>`), rendered as ANSI styles when colors are
//! enabled and stripped otherwise.

use std::fmt::Display;
use std::io::Write;
use std::sync::{Arc, Mutex, OnceLock};

use colored::{ColoredString, Colorize};
use regex::Regex;
use serde_json::Value;

/// Message severity, most severe first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Level {
    Fatal,
    Error,
    Warning,
    Notice,
    Info,
    Debug,
}

/// How much to print.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    /// Fatal errors and errors only
    Quiet,
    /// Everything but debug messages
    #[default]
    Normal,
    /// Everything
    Verbose,
}

impl Verbosity {
    /// Verbosity from the `log.verbosity` setting.
    ///
    /// Accepts a level bitmask (fatal 1, error 2, warning 4, notice 8, info 16,
    /// debug 32) or one of `quiet`, `normal`, `verbose`. A mask including debug is
    /// verbose; a mask without warning, notice and info is quiet.
    pub fn from_setting(value: &Value) -> Option<Self> {
        const WARNING_TO_INFO: u64 = 4 | 8 | 16;
        const DEBUG: u64 = 32;

        if let Some(mask) = value.as_u64() {
            return Some(if mask & DEBUG != 0 {
                Verbosity::Verbose
            } else if mask & WARNING_TO_INFO == 0 {
                Verbosity::Quiet
            } else {
                Verbosity::Normal
            });
        }

        match value.as_str()?.to_lowercase().as_str() {
            "quiet" => Some(Verbosity::Quiet),
            "normal" => Some(Verbosity::Normal),
            "verbose" => Some(Verbosity::Verbose),
            _ => None,
        }
    }

    pub fn allows(self, level: Level) -> bool {
        match self {
            Verbosity::Quiet => level <= Level::Error,
            Verbosity::Normal => level <= Level::Info,
            Verbosity::Verbose => true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stream {
    Stdout,
    Stderr,
}

#[derive(Debug, Clone)]
enum Sink {
    Terminal,
    Buffer(Arc<Mutex<Vec<u8>>>),
}

type Style = fn(&str) -> ColoredString;

fn markup() -> &'static [(Regex, Style)] {
    static MARKUP: OnceLock<Vec<(Regex, Style)>> = OnceLock::new();
    MARKUP.get_or_init(|| {
        let tags: [(&str, Style); 7] = [
            ("strong", |s| s.bold()),
            ("u", |s| s.underline()),
            ("dim", |s| s.dimmed()),
            ("red", |s| s.red()),
            ("yellow", |s| s.yellow()),
            ("green", |s| s.green()),
            ("grey", |s| s.white()),
        ];
        tags.into_iter()
            .map(|(tag, style)| {
                let pattern = format!(r"(?s)<{0}>(.*?)</{0}>", tag);
                (Regex::new(&pattern).expect("markup pattern is valid"), style)
            })
            .collect()
    })
}

/// Leveled logger for user-facing messages.
///
/// Cloning is cheap; clones share the capture buffer, if any.
#[derive(Debug, Clone)]
pub struct Logger {
    verbosity: Verbosity,
    colorize: bool,
    stream: Stream,
    sink: Sink,
}

impl Default for Logger {
    fn default() -> Self {
        Self::new(Verbosity::Normal, true)
    }
}

impl Logger {
    pub fn new(verbosity: Verbosity, colorize: bool) -> Self {
        Self {
            verbosity,
            colorize,
            stream: Stream::Stdout,
            sink: Sink::Terminal,
        }
    }

    /// Logger writing into a shared in-memory buffer instead of the terminal.
    pub fn captured(verbosity: Verbosity, buffer: Arc<Mutex<Vec<u8>>>) -> Self {
        Self {
            verbosity,
            colorize: false,
            stream: Stream::Stdout,
            sink: Sink::Buffer(buffer),
        }
    }

    pub fn verbosity(&self) -> Verbosity {
        self.verbosity
    }

    pub fn colorize(&self) -> bool {
        self.colorize
    }

    pub fn with_verbosity(mut self, verbosity: Verbosity) -> Self {
        self.verbosity = verbosity;
        self
    }

    pub fn with_colors(mut self, colorize: bool) -> Self {
        self.colorize = colorize;
        self
    }

    /// Same logger, printing to stderr (status messages).
    pub fn as_messages(&self) -> Self {
        Self {
            stream: Stream::Stderr,
            ..self.clone()
        }
    }

    /// Same logger, printing to stdout (command output).
    pub fn as_output(&self) -> Self {
        Self {
            stream: Stream::Stdout,
            ..self.clone()
        }
    }

    pub fn fatal(&self, msg: impl Display) {
        self.event(Level::Fatal, msg);
    }

    pub fn error(&self, msg: impl Display) {
        self.event(Level::Error, msg);
    }

    pub fn warning(&self, msg: impl Display) {
        self.event(Level::Warning, msg);
    }

    pub fn notice(&self, msg: impl Display) {
        self.event(Level::Notice, msg);
    }

    pub fn info(&self, msg: impl Display) {
        self.event(Level::Info, msg);
    }

    pub fn debug(&self, msg: impl Display) {
        self.event(Level::Debug, msg);
    }

    /// Print an empty line regardless of verbosity.
    pub fn empty_line(&self) {
        self.write_line("");
    }

    /// Print raw data (no markup, no level filtering).
    pub fn raw(&self, msg: impl Display) {
        self.write_line(&msg.to_string());
    }

    fn event(&self, level: Level, msg: impl Display) {
        if !self.verbosity.allows(level) {
            return;
        }
        let text = self.format_text(&msg.to_string());
        let line = if self.colorize {
            match level {
                Level::Fatal | Level::Error => text.as_str().red().to_string(),
                Level::Warning | Level::Notice => text.as_str().yellow().bold().to_string(),
                Level::Debug => text.as_str().white().to_string(),
                Level::Info => text,
            }
        } else {
            text
        };
        self.write_line(&line);
    }

    /// Render or strip inline markup.
    pub fn format_text(&self, text: &str) -> String {
        markup().iter().fold(text.to_string(), |acc, (re, style)| {
            re.replace_all(&acc, |caps: &regex::Captures| {
                if self.colorize {
                    style(&caps[1]).to_string()
                } else {
                    caps[1].to_string()
                }
            })
            .into_owned()
        })
    }

    fn write_line(&self, line: &str) {
        // Output failures (closed pipe) are not worth aborting a command for.
        match &self.sink {
            Sink::Terminal => match self.stream {
                Stream::Stdout => {
                    let _ = writeln!(std::io::stdout(), "{}", line);
                }
                Stream::Stderr => {
                    let _ = writeln!(std::io::stderr(), "{}", line);
                }
            },
            Sink::Buffer(buffer) => {
                if let Ok(mut buf) = buffer.lock() {
                    let _ = writeln!(buf, "{}", line);
                }
            }
        }
    }
}
