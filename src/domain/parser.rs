//! Argument vector parsing: options first, positional arguments second
//!
//! `argv[0]` is the program name and never inspected.

use tracing::{debug, instrument, trace};

use crate::domain::error::{DomainError, DomainResult};
use crate::domain::option::{Arity, OptionScalar, OptionTable, ParsedOptions};

/// Does `token` denote the option key `key` (`--name` or `--name=...`)?
fn matches_key(token: &str, key: &str) -> bool {
    match token.strip_prefix(key) {
        Some(rest) => rest.is_empty() || rest.starts_with('='),
        None => false,
    }
}

/// Parse all declared options out of `argv`.
///
/// Every option is scanned in declaration order, short form before long form.
/// Repeated options are collected into lists in that scan order.
#[instrument(level = "debug", skip(options))]
pub fn parse_options(argv: &[String], options: &OptionTable) -> DomainResult<ParsedOptions> {
    let mut parsed = ParsedOptions::new();

    for spec in options.iter() {
        let mut found = false;

        for (prefix, name) in spec.forms() {
            let key = format!("{}{}", prefix, name);

            for (i, token) in argv.iter().enumerate().skip(1) {
                if !matches_key(token, &key) {
                    continue;
                }

                let scalar = if spec.arity().takes_value() {
                    OptionScalar::Text(extract_value(argv, i, prefix, &key)?)
                } else {
                    OptionScalar::Flag
                };
                trace!("option {} -> {}", key, scalar);

                parsed.record(&name, scalar);
                found = true;
            }
        }

        if !found && spec.arity() == Arity::Required {
            return Err(DomainError::MissingOption(spec.display_forms()));
        }
    }

    debug!("parsed {} option(s)", parsed.len());
    Ok(parsed)
}

/// Value of the value-bearing option found at `argv[i]`.
fn extract_value(argv: &[String], i: usize, prefix: &str, key: &str) -> DomainResult<String> {
    let token = &argv[i];

    if let Some(value) = token.strip_prefix(key).and_then(|rest| rest.strip_prefix('=')) {
        return Ok(value.to_string());
    }

    match argv.get(i + 1) {
        Some(next) if !next.starts_with(prefix) => Ok(next.clone()),
        _ => Err(DomainError::MissingValue(key.to_string())),
    }
}

/// Collect positional arguments from `argv`.
///
/// Skips the program name, the first token naming a known command, and every
/// declared option together with its separate value token.
#[instrument(level = "debug", skip(options, commands))]
pub fn parse_arguments<S: AsRef<str>>(
    argv: &[String],
    options: &OptionTable,
    commands: &[S],
) -> Vec<String> {
    let mut arguments = Vec::new();
    let mut command_found = false;
    let mut tokens = argv.iter().skip(1);

    while let Some(token) = tokens.next() {
        if !command_found && commands.iter().any(|c| c.as_ref() == token) {
            command_found = true;
            continue;
        }

        if let Some(spec) = options.find_exact(token) {
            if spec.arity().takes_value() {
                tokens.next();
            }
            continue;
        }

        if options.find_joined(token).is_some() {
            continue;
        }

        arguments.push(token.clone());
    }

    debug!("positional arguments: {:?}", arguments);
    arguments
}
