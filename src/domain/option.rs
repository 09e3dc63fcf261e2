//! Option declarations and parsed option values

use std::fmt;

use crate::domain::error::{DomainError, DomainResult};

/// Whether an option takes a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    /// Flag without value, e.g. `--verbose`
    NoValue,
    /// Option must be given, always with a value
    Required,
    /// Option may be omitted; if given, it carries a value
    Optional,
}

impl Arity {
    pub fn takes_value(self) -> bool {
        !matches!(self, Arity::NoValue)
    }
}

/// A declared option with short and/or long name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionSpec {
    short: Option<char>,
    long: Option<String>,
    arity: Arity,
}

impl OptionSpec {
    /// Declare an option.
    ///
    /// The short name must be exactly one character, the long name at least two.
    /// At least one of them is required.
    pub fn new(short: Option<&str>, long: Option<&str>, arity: Arity) -> DomainResult<Self> {
        let short = match short {
            Some(s) => {
                let mut chars = s.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) if c != '-' && !c.is_whitespace() => Some(c),
                    _ => return Err(DomainError::BadShortOption(s.to_string())),
                }
            }
            None => None,
        };

        let long = match long {
            Some(l) => {
                if l.chars().count() < 2 || l.starts_with('-') || l.contains('=') {
                    return Err(DomainError::BadLongOption(l.to_string()));
                }
                Some(l.to_string())
            }
            None => None,
        };

        if short.is_none() && long.is_none() {
            return Err(DomainError::UnnamedOption);
        }

        Ok(Self { short, long, arity })
    }

    pub fn short(&self) -> Option<char> {
        self.short
    }

    pub fn long(&self) -> Option<&str> {
        self.long.as_deref()
    }

    pub fn arity(&self) -> Arity {
        self.arity
    }

    /// Command-line forms of this option as `(prefix, name)`, short form first.
    pub fn forms(&self) -> Vec<(&'static str, String)> {
        let mut forms = Vec::with_capacity(2);
        if let Some(c) = self.short {
            forms.push(("-", c.to_string()));
        }
        if let Some(l) = &self.long {
            forms.push(("--", l.clone()));
        }
        forms
    }

    /// Human readable form used in error messages, e.g. `"-c" or "--config"`.
    pub fn display_forms(&self) -> String {
        self.forms()
            .iter()
            .map(|(prefix, name)| format!("\"{}{}\"", prefix, name))
            .collect::<Vec<_>>()
            .join(" or ")
    }
}

/// Ordered table of declared options.
#[derive(Debug, Clone, Default)]
pub struct OptionTable {
    specs: Vec<OptionSpec>,
}

impl OptionTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare and append an option.
    pub fn add(&mut self, short: Option<&str>, long: Option<&str>, arity: Arity) -> DomainResult<&mut Self> {
        self.specs.push(OptionSpec::new(short, long, arity)?);
        Ok(self)
    }

    pub fn push(&mut self, spec: OptionSpec) {
        self.specs.push(spec);
    }

    pub fn iter(&self) -> impl Iterator<Item = &OptionSpec> {
        self.specs.iter()
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    /// Find the option whose short or long form equals `token` exactly.
    pub fn find_exact(&self, token: &str) -> Option<&OptionSpec> {
        if let Some(name) = token.strip_prefix("--") {
            self.specs.iter().find(|s| s.long() == Some(name))
        } else if let Some(name) = token.strip_prefix('-') {
            let mut chars = name.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => self.specs.iter().find(|s| s.short() == Some(c)),
                _ => None,
            }
        } else {
            None
        }
    }

    /// Find the option given as `--name=value` or `-x=value`.
    pub fn find_joined(&self, token: &str) -> Option<&OptionSpec> {
        let (key, _) = token.split_once('=')?;
        self.find_exact(key)
    }
}

/// A single parsed value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionScalar {
    /// Option given without value
    Flag,
    /// Option given with a value
    Text(String),
}

impl fmt::Display for OptionScalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionScalar::Flag => write!(f, "true"),
            OptionScalar::Text(s) => write!(f, "{}", s),
        }
    }
}

/// Value stored for an option name; repeated options turn into lists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionValue {
    Single(OptionScalar),
    List(Vec<OptionScalar>),
}

impl OptionValue {
    /// Convenience accessor for a single text value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            OptionValue::Single(OptionScalar::Text(s)) => Some(s),
            _ => None,
        }
    }

    /// All occurrences in encounter order.
    pub fn scalars(&self) -> Vec<&OptionScalar> {
        match self {
            OptionValue::Single(s) => vec![s],
            OptionValue::List(items) => items.iter().collect(),
        }
    }

    fn push(&mut self, scalar: OptionScalar) {
        match self {
            OptionValue::Single(first) => {
                let first = std::mem::replace(first, OptionScalar::Flag);
                *self = OptionValue::List(vec![first, scalar]);
            }
            OptionValue::List(items) => items.push(scalar),
        }
    }
}

/// Parsed options keyed by the matched name (`c` for `-c`, `config` for `--config`).
///
/// Entries keep discovery order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedOptions {
    entries: Vec<(String, OptionValue)>,
}

impl ParsedOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one occurrence: scalar first, list from the second occurrence on.
    pub fn record(&mut self, name: &str, scalar: OptionScalar) {
        match self.entries.iter_mut().find(|(n, _)| n == name) {
            Some((_, value)) => value.push(scalar),
            None => self
                .entries
                .push((name.to_string(), OptionValue::Single(scalar))),
        }
    }

    pub fn get(&self, name: &str) -> Option<&OptionValue> {
        self.entries.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// True if any of `names` was given.
    pub fn any(&self, names: &[&str]) -> bool {
        names.iter().any(|n| self.contains(n))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &OptionValue)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Collect text values of all `names`, in discovery order.
    ///
    /// Fails if one of the occurrences carries no text (a bare flag).
    pub fn texts_of(&self, names: &[&str]) -> DomainResult<Vec<String>> {
        let mut result = Vec::new();
        for (name, value) in self.iter().filter(|(n, _)| names.contains(n)) {
            for scalar in value.scalars() {
                match scalar {
                    OptionScalar::Text(s) => result.push(s.clone()),
                    OptionScalar::Flag => {
                        return Err(DomainError::UnknownOptionValue {
                            option: name.to_string(),
                            value: scalar.to_string(),
                        })
                    }
                }
            }
        }
        Ok(result)
    }
}
