//! Integration tests for option and positional argument parsing.

use rstest::rstest;

use clikit::domain::{
    parse_arguments, parse_options, Arity, DomainError, OptionScalar, OptionTable, OptionValue,
};
use clikit::util::testing;

fn argv(tokens: &[&str]) -> Vec<String> {
    tokens.iter().map(|s| s.to_string()).collect()
}

fn text(value: &str) -> OptionScalar {
    OptionScalar::Text(value.to_string())
}

fn table() -> OptionTable {
    let mut options = OptionTable::new();
    options
        .add(Some("v"), Some("verbose"), Arity::NoValue)
        .unwrap()
        .add(Some("c"), Some("config"), Arity::Optional)
        .unwrap()
        .add(Some("n"), Some("name"), Arity::Optional)
        .unwrap();
    options
}

// ============================================================
// parse_options
// ============================================================

#[test]
fn given_flag_and_repeated_option_when_parsing_then_collects_both() {
    testing::init_test_setup();
    // Arrange
    let args = argv(&["app", "build", "-v", "--config=a.json", "--config=b.json", "extra"]);

    // Act
    let parsed = parse_options(&args, &table()).unwrap();

    // Assert
    assert_eq!(parsed.len(), 2);
    assert_eq!(parsed.get("v"), Some(&OptionValue::Single(OptionScalar::Flag)));
    assert_eq!(
        parsed.get("config"),
        Some(&OptionValue::List(vec![text("a.json"), text("b.json")]))
    );
}

#[test]
fn given_long_option_with_equals_when_parsing_then_value_follows_equals() {
    let args = argv(&["app", "--name=alice"]);

    let parsed = parse_options(&args, &table()).unwrap();

    assert_eq!(parsed.get("name").and_then(OptionValue::as_str), Some("alice"));
}

#[test]
fn given_value_in_next_token_when_parsing_then_consumes_it() {
    let args = argv(&["app", "-n", "bob"]);

    let parsed = parse_options(&args, &table()).unwrap();

    assert_eq!(parsed.get("n").and_then(OptionValue::as_str), Some("bob"));
}

#[test]
fn given_value_equal_to_value_with_equals_when_parsing_then_keeps_rest() {
    let args = argv(&["app", "--name=a=b"]);

    let parsed = parse_options(&args, &table()).unwrap();

    assert_eq!(parsed.get("name").and_then(OptionValue::as_str), Some("a=b"));
}

#[test]
fn given_short_and_long_forms_when_parsing_then_recorded_under_each_name() {
    let args = argv(&["app", "--config", "b.json", "-c", "a.json"]);

    let parsed = parse_options(&args, &table()).unwrap();

    // short form is scanned first
    let names: Vec<&str> = parsed.iter().map(|(name, _)| name).collect();
    assert_eq!(names, vec!["c", "config"]);
    assert_eq!(parsed.texts_of(&["c", "config"]).unwrap(), vec!["a.json", "b.json"]);
}

#[test]
fn given_repeated_short_option_when_parsing_then_keeps_command_line_order() {
    let args = argv(&["app", "-c", "1.json", "-c", "2.json", "-c", "3.json"]);

    let parsed = parse_options(&args, &table()).unwrap();

    assert_eq!(
        parsed.get("c"),
        Some(&OptionValue::List(vec![text("1.json"), text("2.json"), text("3.json")]))
    );
}

#[test]
fn given_absent_option_when_parsing_then_not_inserted() {
    let args = argv(&["app", "build"]);

    let parsed = parse_options(&args, &table()).unwrap();

    assert!(parsed.is_empty());
    assert!(!parsed.contains("v"));
    assert!(!parsed.contains("verbose"));
}

#[rstest]
#[case(&["app", "-c"], "-c")]
#[case(&["app", "--config"], "--config")]
#[case(&["app", "-c", "-v"], "-c")]
#[case(&["app", "--name", "--verbose"], "--name")]
fn given_value_option_without_value_when_parsing_then_fails(#[case] tokens: &[&str], #[case] key: &str) {
    let err = parse_options(&argv(tokens), &table()).unwrap_err();

    assert_eq!(err, DomainError::MissingValue(key.to_string()));
}

#[test]
fn given_required_option_missing_when_parsing_then_names_both_forms() {
    let mut options = table();
    options.add(Some("t"), Some("target"), Arity::Required).unwrap();

    let err = parse_options(&argv(&["app", "deploy"]), &options).unwrap_err();

    assert_eq!(err.to_string(), "Required option \"-t\" or \"--target\" is missing");
}

#[test]
fn given_required_option_present_when_parsing_then_succeeds() {
    let mut options = table();
    options.add(None, Some("target"), Arity::Required).unwrap();

    let parsed = parse_options(&argv(&["app", "--target", "prod"]), &options).unwrap();

    assert_eq!(parsed.get("target").and_then(OptionValue::as_str), Some("prod"));
}

#[test]
fn given_similar_prefix_when_parsing_then_does_not_match() {
    let args = argv(&["app", "--verbosely", "-vv"]);

    let parsed = parse_options(&args, &table()).unwrap();

    assert!(parsed.is_empty());
}

// ============================================================
// parse_arguments
// ============================================================

#[test]
fn given_command_and_options_when_collecting_arguments_then_keeps_positionals() {
    let args = argv(&["app", "build", "-v", "--config=a.json", "--config=b.json", "extra"]);

    let arguments = parse_arguments(&args, &table(), &["build", "test"]);

    assert_eq!(arguments, vec!["extra"]);
}

#[test]
fn given_option_with_separate_value_when_collecting_arguments_then_skips_value() {
    let args = argv(&["app", "build", "-c", "a.json", "src", "-n", "bob", "dst"]);

    let arguments = parse_arguments(&args, &table(), &["build"]);

    assert_eq!(arguments, vec!["src", "dst"]);
}

#[test]
fn given_second_command_token_when_collecting_arguments_then_is_positional() {
    let args = argv(&["app", "help", "build"]);

    let arguments = parse_arguments(&args, &table(), &["help", "build"]);

    assert_eq!(arguments, vec!["build"]);
}

#[test]
fn given_undeclared_options_when_collecting_arguments_then_kept_as_positionals() {
    let args = argv(&["app", "run", "--unknown", "-x", "file"]);

    let arguments = parse_arguments(&args, &table(), &["run"]);

    assert_eq!(arguments, vec!["--unknown", "-x", "file"]);
}

#[test]
fn given_only_program_name_when_collecting_arguments_then_empty() {
    let arguments = parse_arguments(&argv(&["app"]), &table(), &["run"]);

    assert!(arguments.is_empty());
}
