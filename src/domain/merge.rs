//! Deep merge of configuration trees
//!
//! Objects merge key by key, later sources win. Lists are never merged
//! element-wise: a list at a key replaces whatever was there before.

use serde_json::{Map, Value};

/// Merge `source` onto `target`.
///
/// - both objects: recurse per key where both sides hold a non-empty object,
///   otherwise the source value replaces the target value
/// - both lists: append source items not already contained
/// - anything else: `source` replaces `target`
pub fn merge(target: Value, source: Value) -> Value {
    match (target, source) {
        (Value::Object(target), Value::Object(source)) => Value::Object(merge_objects(target, source)),
        (Value::Array(mut target), Value::Array(source)) => {
            for item in source {
                if !target.contains(&item) {
                    target.push(item);
                }
            }
            Value::Array(target)
        }
        (_, source) => source,
    }
}

fn merge_objects(mut target: Map<String, Value>, source: Map<String, Value>) -> Map<String, Value> {
    for (key, value) in source {
        let nested = is_non_empty_object(&value)
            && target.get(&key).map(Value::is_object).unwrap_or(false);

        if nested {
            let existing = target.remove(&key).unwrap_or(Value::Null);
            target.insert(key, merge(existing, value));
        } else {
            target.insert(key, value);
        }
    }
    target
}

fn is_non_empty_object(value: &Value) -> bool {
    value.as_object().map(|m| !m.is_empty()).unwrap_or(false)
}

/// Left fold of `sources` onto an empty object.
pub fn merge_all<I>(sources: I) -> Value
where
    I: IntoIterator<Item = Value>,
{
    sources
        .into_iter()
        .fold(Value::Object(Map::new()), merge)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn given_nested_objects_when_merging_then_merges_recursively() {
        let target = json!({"db": {"host": "localhost", "port": 5432}});
        let source = json!({"db": {"port": 6543, "user": "app"}});

        assert_eq!(
            merge(target, source),
            json!({"db": {"host": "localhost", "port": 6543, "user": "app"}})
        );
    }

    #[test]
    fn given_list_at_shared_key_when_merging_then_replaces_wholesale() {
        let target = json!({"hosts": ["a", "b", "c"]});
        let source = json!({"hosts": ["d"]});

        assert_eq!(merge(target, source), json!({"hosts": ["d"]}));
    }

    #[test]
    fn given_empty_object_when_merging_then_replaces_target() {
        let target = json!({"cache": {"ttl": 10}});
        let source = json!({"cache": {}});

        assert_eq!(merge(target, source), json!({"cache": {}}));
    }

    #[test]
    fn given_object_onto_scalar_when_merging_then_object_wins() {
        let target = json!({"log": false});
        let source = json!({"log": {"colorize": true}});

        assert_eq!(merge(target, source), json!({"log": {"colorize": true}}));
    }

    #[test]
    fn given_top_level_lists_when_merging_then_appends_unseen_items() {
        let target = json!(["a", "b"]);
        let source = json!(["b", "c"]);

        assert_eq!(merge(target, source), json!(["a", "b", "c"]));
    }

    #[test]
    fn given_no_sources_when_folding_then_yields_empty_object() {
        assert_eq!(merge_all(Vec::new()), json!({}));
    }
}
