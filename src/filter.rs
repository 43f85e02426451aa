//! Object field filtering
//!
//! Small helpers for trimming JSON objects before they are persisted or sent
//! onwards: dropping empty fields, keeping a named subset, and resetting
//! values while preserving keys. All of them return new values and never
//! mutate their input; non-object input comes back as a plain clone.

use serde_json::{Map, Value};

/// New object retaining only fields whose value is neither null nor the
/// empty string.
///
/// The typical use is stripping unset form fields before a lookup or save.
/// `false`, `0`, and empty arrays/objects are meaningful values and are kept.
pub fn compact_object(value: &Value) -> Value {
    let Some(fields) = value.as_object() else {
        return value.clone();
    };
    let kept: Map<String, Value> = fields
        .iter()
        .filter(|(_, v)| !is_empty_field(v))
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();
    Value::Object(kept)
}

fn is_empty_field(value: &Value) -> bool {
    value.is_null() || value.as_str().is_some_and(str::is_empty)
}

/// New object retaining only the named fields, in the object's own order.
/// Requested keys missing from the object are silently skipped.
pub fn pick_fields(value: &Value, keys: &[&str]) -> Value {
    let Some(fields) = value.as_object() else {
        return value.clone();
    };
    let kept: Map<String, Value> = fields
        .iter()
        .filter(|(k, _)| keys.contains(&k.as_str()))
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();
    Value::Object(kept)
}

/// New object with the same keys and cleared values.
///
/// Strings reset to `""`, arrays to `[]`, objects to `{}`, everything else to
/// null. Used to blank out a form model while keeping its shape.
pub fn clear_object_values(value: &Value) -> Value {
    let Some(fields) = value.as_object() else {
        return value.clone();
    };
    let cleared: Map<String, Value> = fields
        .iter()
        .map(|(k, v)| (k.clone(), cleared_value(v)))
        .collect();
    Value::Object(cleared)
}

fn cleared_value(value: &Value) -> Value {
    match value {
        Value::String(_) => Value::String(String::new()),
        Value::Array(_) => Value::Array(Vec::new()),
        Value::Object(_) => Value::Object(Map::new()),
        _ => Value::Null,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_compact_drops_null_and_empty_strings() {
        let input = json!({
            "name": "ada",
            "nick": "",
            "email": null,
            "age": 0,
            "active": false,
            "tags": [],
        });
        let out = compact_object(&input);
        assert_eq!(out, json!({"name": "ada", "age": 0, "active": false, "tags": []}));
        // input untouched
        assert!(input.get("email").is_some());
    }

    #[test]
    fn test_compact_passes_non_objects_through() {
        assert_eq!(compact_object(&json!([1, null])), json!([1, null]));
        assert_eq!(compact_object(&json!("x")), json!("x"));
    }

    #[test]
    fn test_pick_fields_keeps_named_subset() {
        let input = json!({"a": 1, "b": 2, "c": 3});
        assert_eq!(pick_fields(&input, &["c", "a"]), json!({"a": 1, "c": 3}));
        assert_eq!(pick_fields(&input, &["missing"]), json!({}));
    }

    #[test]
    fn test_clear_object_values_by_kind() {
        let input = json!({
            "s": "text",
            "n": 42,
            "b": true,
            "arr": [1, 2],
            "obj": {"x": 1},
        });
        let out = clear_object_values(&input);
        assert_eq!(
            out,
            json!({"s": "", "n": null, "b": null, "arr": [], "obj": {}})
        );
        assert_eq!(input["arr"], json!([1, 2]));
    }
}
