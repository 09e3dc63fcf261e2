//! Integration tests for layered configuration loading.
//!
//! Layers, lowest precedence first: bundled defaults, system, user,
//! `--config` files, `--setting` overrides.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use rstest::rstest;
use serde_json::{json, Value};
use tempfile::TempDir;

use clikit::application::ApplicationError;
use clikit::config::{expand_path, ConfigLoader, ConfigPaths};
use clikit::domain::{parse_options, Arity, DomainError, OptionTable, ParsedOptions};
use clikit::infrastructure::RealFileSystem;
use clikit::util::testing;

struct Fixture {
    dir: TempDir,
}

impl Fixture {
    fn new() -> Self {
        testing::init_test_setup();
        Self {
            dir: TempDir::new().unwrap(),
        }
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    fn write(&self, name: &str, content: &str) -> PathBuf {
        let path = self.path(name);
        fs::write(&path, content).unwrap();
        path
    }

    fn paths(&self) -> ConfigPaths {
        ConfigPaths {
            defaults: self.path("default.json"),
            system: self.path("system.json"),
            user: Some(self.path("user.json")),
        }
    }

    fn loader(&self) -> ConfigLoader {
        ConfigLoader::new(Arc::new(RealFileSystem), self.paths())
    }
}

fn options(tokens: &[&str]) -> ParsedOptions {
    let mut table = OptionTable::new();
    table
        .add(Some("c"), Some("config"), Arity::Optional)
        .unwrap()
        .add(Some("s"), Some("setting"), Arity::Optional)
        .unwrap();
    let argv: Vec<String> = tokens.iter().map(|s| s.to_string()).collect();
    parse_options(&argv, &table).unwrap()
}

fn as_str(path: &Path) -> &str {
    path.to_str().unwrap()
}

#[test]
fn given_no_files_when_loading_then_returns_empty_tree() {
    let fixture = Fixture::new();

    let tree = fixture.loader().load(&options(&["app"])).unwrap();

    assert_eq!(tree, json!({}));
}

#[test]
fn given_all_layers_when_loading_then_later_layers_win() {
    // Arrange
    let fixture = Fixture::new();
    fixture.write(
        "default.json",
        r#"{"db": {"host": "localhost", "port": 5432, "user": "app"}, "layer": "defaults"}"#,
    );
    fixture.write("system.json", r#"{"db": {"host": "db.internal"}, "layer": "system"}"#);
    fixture.write("user.json", r#"{"layer": "user"}"#);
    let extra = fixture.write("extra.json", r#"{"db": {"user": "admin"}, "layer": "extra"}"#);

    // Act
    let tree = fixture
        .loader()
        .load(&options(&["app", "-c", as_str(&extra), "-s", "layer=runtime"]))
        .unwrap();

    // Assert
    assert_eq!(
        tree,
        json!({
            "db": {"host": "db.internal", "port": 5432, "user": "admin"},
            "layer": "runtime"
        })
    );
}

#[test]
fn given_several_config_files_when_loading_then_merged_in_command_line_order() {
    let fixture = Fixture::new();
    let first = fixture.write("first.json", r#"{"name": "first", "only_first": 1}"#);
    let second = fixture.write("second.json", r#"{"name": "second"}"#);

    let tree = fixture
        .loader()
        .load(&options(&["app", "--config", as_str(&first), "--config", as_str(&second)]))
        .unwrap();

    assert_eq!(tree, json!({"name": "second", "only_first": 1}));
}

#[test]
fn given_skipped_user_file_when_loading_then_ignores_it() {
    let fixture = Fixture::new();
    fixture.write("user.json", r#"{"from_user": true}"#);
    let mut paths = fixture.paths();
    paths.user = None;

    let tree = ConfigLoader::new(Arc::new(RealFileSystem), paths)
        .load(&options(&["app"]))
        .unwrap();

    assert_eq!(tree, json!({}));
}

#[test]
fn given_missing_explicit_file_when_loading_then_fails_with_path() {
    let fixture = Fixture::new();
    let missing = fixture.path("missing.json");

    let err = fixture
        .loader()
        .load(&options(&["app", "-c", as_str(&missing)]))
        .unwrap_err();

    match err {
        ApplicationError::ConfigFile { path, .. } => assert_eq!(path, missing),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn given_malformed_default_file_when_loading_then_fails() {
    let fixture = Fixture::new();
    fixture.write("default.json", "{ not json");

    let err = fixture.loader().load(&options(&["app"])).unwrap_err();

    assert!(matches!(err, ApplicationError::ConfigFile { .. }));
}

#[test]
fn given_explicit_file_with_list_when_loading_then_fails() {
    let fixture = Fixture::new();
    let list = fixture.write("list.json", "[1, 2, 3]");

    let err = fixture
        .loader()
        .load(&options(&["app", "-c", as_str(&list)]))
        .unwrap_err();

    assert!(err.to_string().contains("content is of type \"array\""));
}

#[rstest]
#[case("a.b=123", json!({"a": {"b": 123}}))]
#[case("a=-7", json!({"a": -7}))]
#[case("ratio=1.5", json!({"ratio": 1.5}))]
#[case("enabled=true", json!({"enabled": true}))]
#[case("enabled=false", json!({"enabled": false}))]
#[case("name=abc", json!({"name": "abc"}))]
#[case("url=http://x/?a=b", json!({"url": "http://x/?a=b"}))]
fn given_runtime_setting_when_loading_then_value_is_typecast(#[case] setting: &str, #[case] expected: Value) {
    let fixture = Fixture::new();

    let tree = fixture.loader().load(&options(&["app", "-s", setting])).unwrap();

    assert_eq!(tree, expected);
}

#[test]
fn given_setting_without_equals_when_loading_then_fails() {
    let fixture = Fixture::new();

    let err = fixture
        .loader()
        .load(&options(&["app", "--setting=novalue"]))
        .unwrap_err();

    assert!(matches!(
        err,
        ApplicationError::Domain(DomainError::InvalidSetting(ref s)) if s == "novalue"
    ));
}

#[test]
fn given_nested_setting_over_file_when_loading_then_merges_into_branch() {
    let fixture = Fixture::new();
    fixture.write("default.json", r#"{"db": {"host": "localhost"}}"#);

    let tree = fixture
        .loader()
        .load(&options(&["app", "-s", "db.port=5432"]))
        .unwrap();

    assert_eq!(tree, json!({"db": {"host": "localhost", "port": 5432}}));
}

#[test]
fn given_unknown_variable_when_expanding_path_then_keeps_path() {
    let path = expand_path("${CLIKIT_SURELY_UNSET_VARIABLE}/settings.json");

    assert_eq!(path, PathBuf::from("${CLIKIT_SURELY_UNSET_VARIABLE}/settings.json"));
}

#[test]
fn given_plain_path_when_expanding_then_unchanged() {
    assert_eq!(expand_path("conf/extra.json"), PathBuf::from("conf/extra.json"));
}
