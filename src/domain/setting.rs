//! Runtime settings given as `dotted.key=value` on the command line

use serde_json::{Map, Number, Value};

use crate::domain::error::{DomainError, DomainResult};

/// A parsed runtime setting.
#[derive(Debug, Clone, PartialEq)]
pub struct RuntimeSetting {
    /// Key path, split on `.`
    pub keys: Vec<String>,
    /// Type-casted value
    pub value: Value,
}

impl RuntimeSetting {
    /// Parse `KEY=VALUE`; the key is split at the first `=`.
    ///
    /// # Examples
    /// ```
    /// use clikit::domain::RuntimeSetting;
    /// use serde_json::json;
    ///
    /// let setting = RuntimeSetting::parse("db.port=5432").unwrap();
    /// assert_eq!(setting.keys, vec!["db", "port"]);
    /// assert_eq!(setting.value, json!(5432));
    /// ```
    pub fn parse(input: &str) -> DomainResult<Self> {
        let (key, value) = input
            .split_once('=')
            .ok_or_else(|| DomainError::InvalidSetting(input.to_string()))?;

        if key.is_empty() || value.is_empty() {
            return Err(DomainError::InvalidSetting(input.to_string()));
        }

        Ok(Self {
            keys: key.split('.').map(str::to_string).collect(),
            value: typecast(value),
        })
    }

    /// Nested single-branch tree for this setting.
    pub fn into_tree(self) -> Value {
        build_settings(&self.keys, self.value)
    }
}

/// Cast a raw string: integer, then float, then boolean, else string.
pub fn typecast(raw: &str) -> Value {
    if looks_numeric(raw) {
        let trimmed = raw.trim();
        if let Ok(i) = trimmed.parse::<i64>() {
            return Value::Number(i.into());
        }
        if let Some(n) = trimmed.parse::<f64>().ok().and_then(Number::from_f64) {
            return Value::Number(n);
        }
    }

    match raw.to_lowercase().as_str() {
        "true" => Value::Bool(true),
        "false" => Value::Bool(false),
        _ => Value::String(raw.to_string()),
    }
}

/// Decimal or exponent notation with optional sign; rejects `inf`, `nan` and hex.
fn looks_numeric(raw: &str) -> bool {
    let s = raw.trim();
    let digits = s.strip_prefix(['+', '-']).unwrap_or(s);
    let (mantissa, exponent) = match digits.find(['e', 'E']) {
        Some(pos) => (&digits[..pos], Some(&digits[pos + 1..])),
        None => (digits, None),
    };

    let mut parts = mantissa.splitn(2, '.');
    let int_part = parts.next().unwrap_or("");
    let frac_part = parts.next();
    let all_digits = |p: &str| p.chars().all(|c| c.is_ascii_digit());

    let mantissa_ok = all_digits(int_part)
        && frac_part.map(all_digits).unwrap_or(true)
        && (!int_part.is_empty() || frac_part.map(|f| !f.is_empty()).unwrap_or(false));

    let exponent_ok = match exponent {
        None => true,
        Some(e) => {
            let e = e.strip_prefix(['+', '-']).unwrap_or(e);
            !e.is_empty() && all_digits(e)
        }
    };

    mantissa_ok && exponent_ok
}

/// Right fold of `keys` into nested objects around `value`.
///
/// `["a", "b", "c"]` with `5` becomes `{"a": {"b": {"c": 5}}}`.
pub fn build_settings<S: AsRef<str>>(keys: &[S], value: Value) -> Value {
    keys.iter().rev().fold(value, |inner, key| {
        let mut map = Map::new();
        map.insert(key.as_ref().to_string(), inner);
        Value::Object(map)
    })
}
