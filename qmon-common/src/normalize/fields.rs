//! Lenient field access over raw JSON entries

use serde_json::{Map, Value};

/// Entries of a list store: a bare array, or the array under `key`
pub fn entries<'a>(content: &'a Value, key: &str) -> &'a [Value] {
    match content {
        Value::Array(items) => items,
        Value::Object(obj) => obj
            .get(key)
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or(&[]),
        _ => &[],
    }
}

/// First non-null value among `keys`
pub fn first<'a>(obj: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter().filter_map(|k| obj.get(*k)).find(|v| !v.is_null())
}

/// Non-empty string among `keys`; numbers are stringified
pub fn string(obj: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    first(obj, keys).and_then(as_string)
}

pub fn as_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Boolean among `keys`; accepts `"true"`/`"false"` strings
pub fn boolean(obj: &Map<String, Value>, keys: &[&str]) -> Option<bool> {
    first(obj, keys).and_then(|v| match v {
        Value::Bool(b) => Some(*b),
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "pass" | "passed" | "success" => Some(true),
            "false" | "fail" | "failed" | "failure" => Some(false),
            _ => None,
        },
        _ => None,
    })
}

/// Number from a JSON number or numeric string
pub fn number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

/// String list among `keys`; a single string becomes a one-element list
pub fn string_list(obj: &Map<String, Value>, keys: &[&str]) -> Vec<String> {
    match first(obj, keys) {
        Some(Value::Array(items)) => items.iter().filter_map(as_string).collect(),
        Some(value) => as_string(value).into_iter().collect(),
        None => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_entries_shapes() {
        let wrapped = json!({"records": [1, 2]});
        assert_eq!(entries(&wrapped, "records").len(), 2);
        assert!(entries(&wrapped, "other").is_empty());
        assert_eq!(entries(&json!([1]), "records").len(), 1);
        assert!(entries(&json!(3), "records").is_empty());
    }

    #[test]
    fn test_first_skips_null() {
        let obj = json!({"a": null, "b": 2});
        let obj = obj.as_object().unwrap();
        assert_eq!(first(obj, &["a", "b"]), Some(&json!(2)));
    }

    #[test]
    fn test_string_list_variants() {
        let obj = json!({"one": "x", "many": ["a", 3, null, " "], "bad": {}});
        let obj = obj.as_object().unwrap();
        assert_eq!(string_list(obj, &["one"]), vec!["x"]);
        assert_eq!(string_list(obj, &["many"]), vec!["a", "3"]);
        assert!(string_list(obj, &["bad"]).is_empty());
        assert!(string_list(obj, &["missing"]).is_empty());
    }

    #[test]
    fn test_number_and_boolean_strings() {
        assert_eq!(number(&json!("85.5")), Some(85.5));
        assert_eq!(number(&json!("n/a")), None);
        let obj = json!({"pass": "FAILED"});
        assert_eq!(boolean(obj.as_object().unwrap(), &["pass"]), Some(false));
    }
}
