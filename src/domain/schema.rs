//! Validation of configuration settings against a rule schema
//!
//! A schema is a JSON list of rules:
//! ```json
//! [
//!   {"key": "db", "type": "object", "required": true, "nodes": [
//!     {"key": "port", "type": "integer", "required": true, "gt": 0, "lt": 65536}
//!   ]},
//!   {"key": "hosts", "type": "array", "required": false, "items": "string", "minCount": 1}
//! ]
//! ```

use serde::Deserialize;
use serde_json::{Map, Value};

/// Expected type of a setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleType {
    Object,
    Array,
    String,
    Integer,
    Boolean,
    Mixed,
}

/// Expected type of list items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemType {
    String,
    Boolean,
    Integer,
}

/// One schema rule.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rule {
    pub key: String,
    #[serde(rename = "type")]
    pub kind: RuleType,
    #[serde(default)]
    pub required: bool,
    /// Child rules for objects
    #[serde(default)]
    pub nodes: Vec<Rule>,
    pub min_count: Option<usize>,
    pub items: Option<ItemType>,
    pub min_length: Option<usize>,
    /// Allowed values
    pub values: Option<Vec<Value>>,
    pub gt: Option<i64>,
    pub ge: Option<i64>,
    pub lt: Option<i64>,
    pub le: Option<i64>,
}

/// Decode a schema from JSON.
pub fn parse_rules(value: Value) -> Result<Vec<Rule>, serde_json::Error> {
    serde_json::from_value(value)
}

/// Validate `settings` and collect every violation.
pub fn validate(settings: &Value, rules: &[Rule]) -> Vec<String> {
    let empty = Map::new();
    let map = settings.as_object().unwrap_or(&empty);
    let mut errors = Vec::new();
    validate_topic(map, rules, "", &mut errors);
    errors
}

fn validate_topic(settings: &Map<String, Value>, rules: &[Rule], prefix: &str, errors: &mut Vec<String>) {
    for rule in rules {
        let key = if prefix.is_empty() {
            rule.key.clone()
        } else {
            format!("{}.{}", prefix, rule.key)
        };

        let value = match settings.get(&rule.key) {
            Some(v) => v,
            None => {
                if rule.required {
                    errors.push(format!("Missing configuration setting \"{}\"", key));
                }
                continue;
            }
        };

        match rule.kind {
            RuleType::Object => match value.as_object() {
                Some(nested) => validate_topic(nested, &rule.nodes, &key, errors),
                None => errors.push(format!("Configuration setting \"{}\" is not an object", key)),
            },
            RuleType::Array => validate_array(value, rule, &key, errors),
            RuleType::String => validate_string(value, rule, &key, errors),
            RuleType::Integer => validate_integer(value, rule, &key, errors),
            RuleType::Boolean => {
                if !value.is_boolean() {
                    errors.push(format!("Configuration setting \"{}\" is not a boolean", key));
                }
            }
            RuleType::Mixed => {
                if !is_allowed(value, rule) {
                    errors.push(format!("Configuration setting \"{}\" is unknown", key));
                }
            }
        }
    }
}

fn is_allowed(value: &Value, rule: &Rule) -> bool {
    rule.values
        .as_ref()
        .map(|allowed| allowed.contains(value))
        .unwrap_or(true)
}

fn validate_array(value: &Value, rule: &Rule, key: &str, errors: &mut Vec<String>) {
    let items = match value.as_array() {
        Some(items) => items,
        None => {
            errors.push(format!("Configuration setting \"{}\" is not an array", key));
            return;
        }
    };

    if let Some(min) = rule.min_count {
        if items.len() < min {
            errors.push(format!("Configuration setting \"{}\" has too few elements", key));
        }
    }

    if let Some(item_type) = rule.items {
        for item in items {
            match item_type {
                ItemType::String => match item.as_str() {
                    Some(s) => {
                        if let Some(min) = rule.min_length {
                            if s.chars().count() < min {
                                errors.push(format!(
                                    "Configuration setting \"{}\" has a too short string \"{}\". \
                                     Minimum length is {} character(s).",
                                    key, s, min
                                ));
                            }
                        }
                    }
                    None => errors.push(format!(
                        "Configuration setting \"{}\" contains a non string value",
                        key
                    )),
                },
                ItemType::Boolean => {
                    if !item.is_boolean() {
                        errors.push(format!(
                            "Configuration setting \"{}\" contains a non boolean value",
                            key
                        ));
                    }
                }
                ItemType::Integer => {
                    if !(item.is_i64() || item.is_u64()) {
                        errors.push(format!(
                            "Configuration setting \"{}\" contains a non integer value",
                            key
                        ));
                    }
                }
            }
        }
    }

    if rule.values.is_some() {
        for item in items {
            if !is_allowed(item, rule) {
                errors.push(format!("Configuration setting \"{}\" has an unknown value", key));
            }
        }
    }
}

fn validate_string(value: &Value, rule: &Rule, key: &str, errors: &mut Vec<String>) {
    let s = match value.as_str() {
        Some(s) => s,
        None => {
            errors.push(format!("Configuration setting \"{}\" is not a string", key));
            return;
        }
    };

    if let Some(min) = rule.min_length {
        if s.chars().count() < min {
            errors.push(format!(
                "Configuration setting \"{}\" is too short. Minimum length is {} character(s).",
                key, min
            ));
        }
    }

    if !is_allowed(value, rule) {
        errors.push(format!("Configuration setting \"{}\" is unknown", key));
    }
}

fn validate_integer(value: &Value, rule: &Rule, key: &str, errors: &mut Vec<String>) {
    let n = match value.as_i64() {
        Some(n) => n,
        None => {
            errors.push(format!("Configuration setting \"{}\" is not an integer", key));
            return;
        }
    };

    if let Some(gt) = rule.gt.filter(|gt| n <= *gt) {
        errors.push(format!("Configuration setting \"{}\" is not greater than {}", key, gt));
    }
    if let Some(ge) = rule.ge.filter(|ge| n < *ge) {
        errors.push(format!("Configuration setting \"{}\" is not greater or equal {}", key, ge));
    }
    if let Some(lt) = rule.lt.filter(|lt| n >= *lt) {
        errors.push(format!("Configuration setting \"{}\" is not less than {}", key, lt));
    }
    if let Some(le) = rule.le.filter(|le| n > *le) {
        errors.push(format!("Configuration setting \"{}\" is not less or equal {}", key, le));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn rules(schema: Value) -> Vec<Rule> {
        parse_rules(schema).expect("valid schema")
    }

    #[test]
    fn given_missing_required_nested_key_when_validating_then_reports_dotted_path() {
        let rules = rules(json!([
            {"key": "db", "type": "object", "required": true, "nodes": [
                {"key": "host", "type": "string", "required": true}
            ]}
        ]));

        let errors = validate(&json!({"db": {}}), &rules);
        assert_eq!(errors, vec!["Missing configuration setting \"db.host\""]);
    }

    #[test]
    fn given_optional_missing_key_when_validating_then_no_errors() {
        let rules = rules(json!([{"key": "name", "type": "string", "required": false}]));
        assert!(validate(&json!({}), &rules).is_empty());
    }

    #[test]
    fn given_integer_out_of_bounds_when_validating_then_reports_each_bound() {
        let rules = rules(json!([
            {"key": "port", "type": "integer", "required": true, "gt": 0, "le": 100}
        ]));

        assert_eq!(
            validate(&json!({"port": 0}), &rules),
            vec!["Configuration setting \"port\" is not greater than 0"]
        );
        assert_eq!(
            validate(&json!({"port": 101}), &rules),
            vec!["Configuration setting \"port\" is not less or equal 100"]
        );
        assert_eq!(
            validate(&json!({"port": "80"}), &rules),
            vec!["Configuration setting \"port\" is not an integer"]
        );
    }

    #[test]
    fn given_array_rules_when_validating_then_checks_count_items_and_values() {
        let rules = rules(json!([
            {"key": "levels", "type": "array", "required": true, "minCount": 3,
             "items": "string", "values": ["low", "high"]}
        ]));

        let errors = validate(&json!({"levels": ["low", 1]}), &rules);
        assert_eq!(
            errors,
            vec![
                "Configuration setting \"levels\" has too few elements",
                "Configuration setting \"levels\" contains a non string value",
                "Configuration setting \"levels\" has an unknown value",
            ]
        );
    }

    #[test]
    fn given_string_with_allowed_values_when_validating_then_rejects_others() {
        let rules = rules(json!([
            {"key": "mode", "type": "string", "required": true, "minLength": 3, "values": ["fast", "slow"]}
        ]));

        assert!(validate(&json!({"mode": "fast"}), &rules).is_empty());
        assert_eq!(
            validate(&json!({"mode": "no"}), &rules),
            vec![
                "Configuration setting \"mode\" is too short. Minimum length is 3 character(s).",
                "Configuration setting \"mode\" is unknown",
            ]
        );
    }

    #[test]
    fn given_unknown_rule_type_when_parsing_then_fails() {
        assert!(parse_rules(json!([{"key": "a", "type": "float"}])).is_err());
    }
}
