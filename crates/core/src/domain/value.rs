use std::collections::BTreeMap;
use std::fmt::{self, Write};

use serde::{Deserialize, Serialize};

/// Structured value carried by function-mode test cases and harness results.
///
/// Equality is structural: map key order never matters and numbers compare by
/// numeric value, so `3` equals `3.0`. [`Value::canonical`] renders the same
/// notion of equality as text, which is what verdicts show to submitters.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "serde_json::Value", into = "serde_json::Value")]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
    List(Vec<Value>),
    Map(BTreeMap<String, Value>),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Compact JSON with sorted keys and integral floats written as integers.
    pub fn canonical(&self) -> String {
        let mut out = String::new();
        self.write_canonical(&mut out);
        out
    }

    fn write_canonical(&self, out: &mut String) {
        match self {
            Value::Null => out.push_str("null"),
            Value::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
            Value::Integer(i) => {
                let _ = write!(out, "{i}");
            }
            Value::Float(f) => write_float(*f, out),
            Value::String(s) => write_string(s, out),
            Value::List(items) => {
                out.push('[');
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        out.push(',');
                    }
                    item.write_canonical(out);
                }
                out.push(']');
            }
            Value::Map(entries) => {
                out.push('{');
                for (i, (key, value)) in entries.iter().enumerate() {
                    if i > 0 {
                        out.push(',');
                    }
                    write_string(key, out);
                    out.push(':');
                    value.write_canonical(out);
                }
                out.push('}');
            }
        }
    }
}

// 2^53: beyond this an f64 no longer holds every integer exactly.
const EXACT_INT_LIMIT: f64 = 9_007_199_254_740_992.0;

/// The integer an integral float stands for, when it is held exactly.
fn exact_integer(f: f64) -> Option<i64> {
    (f.is_finite() && f.fract() == 0.0 && f.abs() <= EXACT_INT_LIMIT).then_some(f as i64)
}

fn write_float(f: f64, out: &mut String) {
    if let Some(i) = exact_integer(f) {
        let _ = write!(out, "{i}");
        return;
    }
    match serde_json::Number::from_f64(f) {
        Some(number) => {
            let _ = write!(out, "{number}");
        }
        None => out.push_str("null"),
    }
}

fn write_string(s: &str, out: &mut String) {
    let _ = write!(out, "{}", serde_json::Value::String(s.to_string()));
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Integer(a), Value::Integer(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Integer(i), Value::Float(f)) | (Value::Float(f), Value::Integer(i)) => {
                exact_integer(*f) == Some(*i)
            }
            (Value::String(a), Value::String(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Map(a), Value::Map(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonical())
    }
}

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Integer(i),
                None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::List(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(entries) => Value::Map(
                entries
                    .into_iter()
                    .map(|(key, value)| (key, Value::from(value)))
                    .collect(),
            ),
        }
    }
}

impl From<Value> for serde_json::Value {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(b),
            Value::Integer(i) => serde_json::Value::from(i),
            Value::Float(f) => serde_json::Number::from_f64(f)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Value::String(s) => serde_json::Value::String(s),
            Value::List(items) => {
                serde_json::Value::Array(items.into_iter().map(Into::into).collect())
            }
            Value::Map(entries) => serde_json::Value::Object(
                entries
                    .into_iter()
                    .map(|(key, value)| (key, value.into()))
                    .collect(),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Value;

    fn parse(raw: &str) -> Value {
        serde_json::from_str(raw).expect("test value should be valid JSON")
    }

    #[test]
    fn integral_float_equals_integer() {
        assert_eq!(parse("3"), parse("3.0"));
        assert_ne!(parse("3"), parse("3.5"));
        assert_eq!(parse("[1, 2.0]").canonical(), "[1,2]");
    }

    #[test]
    fn equality_agrees_with_canonical_form_near_f64_limit() {
        let pairs = [
            ("9007199254740993", "9007199254740992.0"),
            ("9007199254740992", "9007199254740992.0"),
            ("-9007199254740993", "-9007199254740992.0"),
            ("1152921504606846976", "1152921504606846976.0"),
        ];

        for (int, float) in pairs {
            let (a, b) = (parse(int), parse(float));
            assert_eq!(a == b, a.canonical() == b.canonical(), "{int} vs {float}");
            assert_eq!(b == a, a == b, "{float} vs {int}");
        }
        assert_ne!(parse("9007199254740993"), parse("9007199254740992.0"));
        assert_eq!(parse("9007199254740992"), parse("9007199254740992.0"));
    }

    #[test]
    fn map_key_order_is_irrelevant() {
        let a = parse(r#"{"b": [1, 2], "a": {"y": null, "x": true}}"#);
        let b = parse(r#"{"a": {"x": true, "y": null}, "b": [1, 2]}"#);

        assert_eq!(a, b);
        assert_eq!(a.canonical(), b.canonical());
        assert_eq!(a.canonical(), r#"{"a":{"x":true,"y":null},"b":[1,2]}"#);
    }

    #[test]
    fn list_order_matters() {
        assert_ne!(parse("[0, 1]"), parse("[1, 0]"));
    }

    #[test]
    fn types_do_not_coerce() {
        assert_ne!(parse(r#""1""#), parse("1"));
        assert_ne!(parse("null"), parse("false"));
        assert_ne!(parse("[]"), parse("{}"));
    }

    #[test]
    fn canonical_escapes_strings() {
        let value = Value::String("a\"b\n".to_string());
        assert_eq!(value.canonical(), r#""a\"b\n""#);
    }

    #[test]
    fn serializes_back_to_json() {
        let value = parse(r#"{"nums": [2, 7, 11, 15], "target": 9}"#);
        let json = serde_json::to_string(&value).expect("value should serialize");
        assert_eq!(parse(&json), value);
    }
}
