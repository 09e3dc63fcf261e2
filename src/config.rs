//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Bundled defaults: `<app_dir>/config/default.json`
//! 2. System-wide: `/etc/<app>/config.json` (`C:\tools\<app>\config.json` on Windows)
//! 3. User: `~/.<app>/config.json` (`%LOCALAPPDATA%\<app>\config.json` on Windows),
//!    skipped when running as root
//! 4. Explicit files: `-c FILE` / `--config=FILE`, in command-line order
//! 5. Runtime settings: `-s KEY=VALUE` / `--setting=KEY=VALUE`, in command-line order
//!
//! Layers 1-3 are optional: a missing file contributes nothing. Layers 4-5 fail fast.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde_json::{Map, Value};
use tracing::{debug, instrument};

use crate::application::{AppManifest, ApplicationError, ApplicationResult, InfraResultExt};
use crate::domain::{merge, ParsedOptions, RuntimeSetting};
use crate::infrastructure::{json, Environment, FileSystem};

/// Option names that add configuration files.
pub const CONFIG_OPTIONS: [&str; 2] = ["c", "config"];

/// Option names that add runtime settings.
pub const SETTING_OPTIONS: [&str; 2] = ["s", "setting"];

/// Locations of the optional configuration files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigPaths {
    /// Settings bundled with the application
    pub defaults: PathBuf,
    /// System-wide settings
    pub system: PathBuf,
    /// Per-user settings; `None` when skipped
    pub user: Option<PathBuf>,
}

impl ConfigPaths {
    /// Platform-specific paths for application `app_name` installed in `app_dir`.
    pub fn detect(app_name: &str, app_dir: &Path, env: &dyn Environment) -> Self {
        let defaults = default_settings_path(app_dir);

        if cfg!(windows) {
            let system = PathBuf::from(format!(r"C:\tools\{}\config.json", app_name));
            let user = env
                .data_local_dir()
                .or_else(|| env.var("LOCALAPPDATA").map(PathBuf::from))
                .map(|dir| dir.join(app_name).join("config.json"));
            return Self {
                defaults,
                system,
                user,
            };
        }

        let system = PathBuf::from("/etc").join(app_name).join("config.json");
        let user = if env.is_privileged() {
            debug!("running privileged, skipping user settings");
            None
        } else {
            env.home_dir()
                .map(|home| home.join(format!(".{}", app_name)).join("config.json"))
        };

        Self {
            defaults,
            system,
            user,
        }
    }
}

/// Path of the bundled default settings.
pub fn default_settings_path(app_dir: &Path) -> PathBuf {
    app_dir.join("config").join("default.json")
}

/// Path of the bundled settings schema.
pub fn schema_path(app_dir: &Path) -> PathBuf {
    app_dir.join("config").join("schema.json")
}

/// Expand shell variables and tilde in a file path given on the command line.
///
/// Handles `~`, `$VAR`, and `${VAR}` syntax; unknown variables leave the path unchanged.
pub fn expand_path(path: &str) -> PathBuf {
    let expanded = shellexpand::full(path)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| path.to_string());
    PathBuf::from(expanded)
}

/// Builds the settings tree from all configuration layers.
pub struct ConfigLoader {
    fs: Arc<dyn FileSystem>,
    paths: ConfigPaths,
}

impl ConfigLoader {
    pub fn new(fs: Arc<dyn FileSystem>, paths: ConfigPaths) -> Self {
        Self { fs, paths }
    }

    /// Run the whole pipeline.
    ///
    /// Each layer is merged immediately, so later files and settings win over
    /// earlier ones.
    #[instrument(level = "debug", skip(self, options))]
    pub fn load(&self, options: &ParsedOptions) -> ApplicationResult<Value> {
        let tree = Value::Object(Map::new());
        let tree = self.load_optional_files(tree)?;
        let tree = self.load_additional_files(tree, options)?;
        let tree = apply_runtime_settings(tree, options)?;
        debug!("configuration resolved");
        Ok(tree)
    }

    fn load_optional_files(&self, mut tree: Value) -> ApplicationResult<Value> {
        let optional = [Some(&self.paths.defaults), Some(&self.paths.system), self.paths.user.as_ref()];

        for path in optional.into_iter().flatten() {
            if let Some(content) = json::read_optional(self.fs.as_ref(), path).config_file_context(path)? {
                debug!("merging optional settings from {}", path.display());
                tree = merge(tree, require_object(content, path)?);
            }
        }
        Ok(tree)
    }

    fn load_additional_files(&self, mut tree: Value, options: &ParsedOptions) -> ApplicationResult<Value> {
        for file in options.texts_of(&CONFIG_OPTIONS)? {
            let path = expand_path(&file);
            let content = json::read(self.fs.as_ref(), &path).config_file_context(&path)?;
            debug!("merging settings from {}", path.display());
            tree = merge(tree, require_object(content, &path)?);
        }
        Ok(tree)
    }
}

/// Merge every `-s`/`--setting` value onto `tree`, in encounter order.
pub fn apply_runtime_settings(mut tree: Value, options: &ParsedOptions) -> ApplicationResult<Value> {
    for raw in options.texts_of(&SETTING_OPTIONS)? {
        let setting = RuntimeSetting::parse(&raw)?;
        debug!("runtime setting {} = {}", setting.keys.join("."), setting.value);
        tree = merge(tree, setting.into_tree());
    }
    Ok(tree)
}

fn require_object(content: Value, path: &Path) -> ApplicationResult<Value> {
    if content.is_object() {
        return Ok(content);
    }

    let kind = match &content {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    };
    Err(ApplicationError::ConfigFile {
        path: path.to_path_buf(),
        reason: format!("content is of type \"{}\"", kind),
    })
}

/// Everything known after parsing and loading, handed read-only to commands.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    args: Vec<String>,
    options: ParsedOptions,
    arguments: Vec<String>,
    command: Option<String>,
    manifest: AppManifest,
    app_dir: PathBuf,
    settings: Value,
}

impl ResolvedConfig {
    pub fn new(
        args: Vec<String>,
        options: ParsedOptions,
        arguments: Vec<String>,
        command: Option<String>,
        manifest: AppManifest,
        app_dir: PathBuf,
        settings: Value,
    ) -> Self {
        Self {
            args,
            options,
            arguments,
            command,
            manifest,
            app_dir,
            settings,
        }
    }

    /// Raw argument vector, program name included.
    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Program name as invoked.
    pub fn program(&self) -> &str {
        self.args
            .first()
            .map(String::as_str)
            .unwrap_or(self.manifest.name.as_str())
    }

    pub fn options(&self) -> &ParsedOptions {
        &self.options
    }

    /// Positional arguments (command and options removed).
    pub fn arguments(&self) -> &[String] {
        &self.arguments
    }

    /// The command named on the command line, if any.
    pub fn command(&self) -> Option<&str> {
        self.command.as_deref()
    }

    pub fn manifest(&self) -> &AppManifest {
        &self.manifest
    }

    pub fn app_dir(&self) -> &Path {
        &self.app_dir
    }

    /// The merged settings tree.
    pub fn settings(&self) -> &Value {
        &self.settings
    }

    /// Look up a setting by dotted path, e.g. `log.colorize`.
    pub fn get(&self, dotted: &str) -> Option<&Value> {
        dotted
            .split('.')
            .try_fold(&self.settings, |node, key| node.as_object()?.get(key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::OptionScalar;
    use serde_json::json;

    struct FakeEnvironment {
        privileged: bool,
    }

    impl Environment for FakeEnvironment {
        fn var(&self, _key: &str) -> Option<String> {
            None
        }

        fn home_dir(&self) -> Option<PathBuf> {
            Some(PathBuf::from("/home/alice"))
        }

        fn data_local_dir(&self) -> Option<PathBuf> {
            Some(PathBuf::from("/home/alice/.local/share"))
        }

        fn is_privileged(&self) -> bool {
            self.privileged
        }

        fn stdout_is_terminal(&self) -> bool {
            false
        }
    }

    #[cfg(unix)]
    #[test]
    fn given_regular_user_when_detecting_paths_then_includes_user_file() {
        let env = FakeEnvironment { privileged: false };
        let paths = ConfigPaths::detect("demo", Path::new("/opt/demo"), &env);

        assert_eq!(paths.defaults, PathBuf::from("/opt/demo/config/default.json"));
        assert_eq!(paths.system, PathBuf::from("/etc/demo/config.json"));
        assert_eq!(paths.user, Some(PathBuf::from("/home/alice/.demo/config.json")));
    }

    #[cfg(unix)]
    #[test]
    fn given_root_when_detecting_paths_then_skips_user_file() {
        let env = FakeEnvironment { privileged: true };
        let paths = ConfigPaths::detect("demo", Path::new("/opt/demo"), &env);

        assert_eq!(paths.user, None);
    }

    #[test]
    fn given_settings_when_applying_then_later_values_win() {
        let mut options = ParsedOptions::new();
        options.record("s", OptionScalar::Text("db.port=1".into()));
        options.record("s", OptionScalar::Text("db.port=2".into()));
        options.record("setting", OptionScalar::Text("db.host=example.org".into()));

        let tree = apply_runtime_settings(json!({"db": {"user": "app"}}), &options).unwrap();
        assert_eq!(tree, json!({"db": {"port": 2, "host": "example.org", "user": "app"}}));
    }

    #[test]
    fn given_non_object_content_when_requiring_object_then_names_type() {
        let err = require_object(json!([1, 2]), Path::new("list.json")).unwrap_err();
        assert!(err.to_string().contains("content is of type \"array\""));
    }

    #[test]
    fn given_dotted_path_when_getting_then_walks_nested_objects() {
        let config = ResolvedConfig::new(
            vec!["demo".into()],
            ParsedOptions::new(),
            vec![],
            None,
            AppManifest::new("demo", "0.1.0", ""),
            PathBuf::from("/opt/demo"),
            json!({"log": {"colorize": false}, "hosts": ["a"]}),
        );

        assert_eq!(config.get("log.colorize"), Some(&json!(false)));
        assert_eq!(config.get("hosts.0"), None);
        assert_eq!(config.get("missing.key"), None);
        assert_eq!(config.program(), "demo");
    }
}
