//! Absence-tolerant access to loosely shaped JSON records.
//!
//! Crawl records are produced by several tools and any key may be missing,
//! `null`, or carry an unexpected type. Every accessor here returns a typed
//! default instead of failing.

use serde_json::{Map, Value};

pub type Object = Map<String, Value>;

pub trait FieldExt {
    /// Value for `key`, treating JSON `null` the same as a missing key.
    fn field(&self, key: &str) -> Option<&Value>;

    fn str_or_empty(&self, key: &str) -> &str {
        self.field(key).and_then(Value::as_str).unwrap_or("")
    }

    /// Scalar rendered as text; containers and absence give an empty string.
    fn text(&self, key: &str) -> String {
        match self.field(key) {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Number(n)) => n.to_string(),
            Some(Value::Bool(b)) => b.to_string(),
            _ => String::new(),
        }
    }

    fn int_or_zero(&self, key: &str) -> i64 {
        self.field(key).map(as_int).unwrap_or(0)
    }

    fn flag(&self, key: &str) -> bool {
        self.field(key).map(as_flag).unwrap_or(false)
    }

    fn array(&self, key: &str) -> &[Value] {
        self.field(key).and_then(Value::as_array).map(Vec::as_slice).unwrap_or(&[])
    }

    fn object(&self, key: &str) -> Option<&Object> {
        self.field(key).and_then(Value::as_object)
    }

    /// Element count of an array or object field, 0 for anything else.
    fn len_of(&self, key: &str) -> usize {
        match self.field(key) {
            Some(Value::Array(a)) => a.len(),
            Some(Value::Object(o)) => o.len(),
            _ => 0,
        }
    }
}

impl FieldExt for Object {
    fn field(&self, key: &str) -> Option<&Value> {
        self.get(key).filter(|v| !v.is_null())
    }
}

/// Best-effort integer conversion; anything unparseable becomes 0.
pub fn as_int(value: &Value) -> i64 {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_u64().map(|u| u.min(i64::MAX as u64) as i64))
            .or_else(|| n.as_f64().and_then(truncate))
            .unwrap_or(0),
        Value::Bool(b) => i64::from(*b),
        Value::String(s) => {
            let t = s.trim();
            t.parse::<i64>()
                .ok()
                .or_else(|| t.parse::<f64>().ok().and_then(truncate))
                .unwrap_or(0)
        }
        _ => 0,
    }
}

pub fn as_flag(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(false),
        Value::String(s) => matches!(s.trim().to_ascii_lowercase().as_str(), "true" | "1" | "yes"),
        _ => false,
    }
}

/// Mirrors the usual "empty means absent" reading of optional JSON values.
pub fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64().map(|f| f == 0.0).unwrap_or(false),
        Value::String(s) => s.is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
    }
}

pub fn char_len(s: &str) -> usize {
    s.chars().count()
}

pub fn round3(x: f64) -> f64 {
    (x * 1000.0).round() / 1000.0
}

fn truncate(f: f64) -> Option<i64> {
    // `as` saturates out-of-range floats
    f.is_finite().then(|| f.trunc() as i64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn obj(v: Value) -> Object {
        v.as_object().cloned().unwrap()
    }

    #[test]
    fn missing_and_null_fields_use_defaults() {
        let o = obj(json!({"a": null}));
        assert_eq!(o.str_or_empty("a"), "");
        assert_eq!(o.str_or_empty("missing"), "");
        assert_eq!(o.int_or_zero("a"), 0);
        assert!(!o.flag("a"));
        assert!(o.array("a").is_empty());
        assert!(o.object("a").is_none());
        assert_eq!(o.len_of("a"), 0);
    }

    #[test]
    fn str_or_empty_rejects_non_strings() {
        let o = obj(json!({"url": 42, "title": "hi"}));
        assert_eq!(o.str_or_empty("url"), "");
        assert_eq!(o.str_or_empty("title"), "hi");
    }

    #[test]
    fn text_renders_scalars() {
        let o = obj(json!({"n": 3, "b": true, "s": "X", "a": [1]}));
        assert_eq!(o.text("n"), "3");
        assert_eq!(o.text("b"), "true");
        assert_eq!(o.text("s"), "X");
        assert_eq!(o.text("a"), "");
    }

    #[test]
    fn int_conversion_is_best_effort() {
        assert_eq!(as_int(&json!(404)), 404);
        assert_eq!(as_int(&json!(404.9)), 404);
        assert_eq!(as_int(&json!(" 301 ")), 301);
        assert_eq!(as_int(&json!("200.0")), 200);
        assert_eq!(as_int(&json!("n/a")), 0);
        assert_eq!(as_int(&json!(true)), 1);
        assert_eq!(as_int(&json!([1, 2])), 0);
        assert_eq!(as_int(&json!(u64::MAX)), i64::MAX);
    }

    #[test]
    fn flags_accept_common_spellings() {
        assert!(as_flag(&json!(true)));
        assert!(as_flag(&json!(1)));
        assert!(as_flag(&json!("Yes")));
        assert!(!as_flag(&json!("no")));
        assert!(!as_flag(&json!({})));
    }

    #[test]
    fn falsy_values() {
        for v in [json!(null), json!(false), json!(0), json!(""), json!([]), json!({})] {
            assert!(is_falsy(&v), "{v}");
        }
        for v in [json!(true), json!(1), json!("x"), json!([0]), json!({"k": 1})] {
            assert!(!is_falsy(&v), "{v}");
        }
    }

    #[test]
    fn lengths_count_chars() {
        assert_eq!(char_len("héllo"), 5);
        assert_eq!(round3(2.0 / 3.0), 0.667);
        assert_eq!(round3(0.0), 0.0);
    }
}
