//! Raw record values.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

/// A loosely-typed value as supplied by the caller.
///
/// No validation happens on construction; the declared field type decides how the
/// value is bound (see [`coerce`](crate::coerce::coerce)).
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Textual form sent for text-bound parameters.
    pub fn to_text(&self) -> Option<String> {
        match self {
            Value::Null => None,
            Value::Bool(b) => Some(if *b { "1" } else { "0" }.to_string()),
            Value::Int(i) => Some(i.to_string()),
            Value::Float(f) => Some(f.to_string()),
            Value::Text(s) => Some(s.clone()),
            Value::Date(d) => Some(d.format("%Y-%m-%d").to_string()),
            Value::DateTime(dt) => Some(dt.format("%Y-%m-%d %H:%M:%S%.f").to_string()),
        }
    }

    /// Textual form sent for integer-bound parameters.
    ///
    /// Booleans become `1`/`0` and floats are truncated toward zero. Non-finite or
    /// out-of-range floats and text are passed through unchanged, so the server
    /// rejects them if they are not integer literals.
    pub fn to_integer_text(&self) -> Option<String> {
        match self {
            Value::Null => None,
            Value::Bool(b) => Some(i64::from(*b).to_string()),
            Value::Int(i) => Some(i.to_string()),
            Value::Float(f) if in_i64_range(*f) => Some((f.trunc() as i64).to_string()),
            Value::Float(f) => Some(f.to_string()),
            Value::Text(s) => Some(s.trim().to_string()),
            Value::Date(_) | Value::DateTime(_) => self.to_text(),
        }
    }
}

fn in_i64_range(f: f64) -> bool {
    // i64::MAX as f64 rounds up to 2^63, which is itself out of range.
    f.is_finite() && f >= i64::MIN as f64 && f < i64::MAX as f64
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

macro_rules! impl_from_int {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Value {
                fn from(v: $t) -> Self {
                    Value::Int(i64::from(v))
                }
            }
        )*
    };
}

impl_from_int!(i8, i16, i32, i64, u8, u16, u32);

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::Float(f64::from(v))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<NaiveDate> for Value {
    fn from(v: NaiveDate) -> Self {
        Value::Date(v)
    }
}

impl From<NaiveDateTime> for Value {
    fn from(v: NaiveDateTime) -> Self {
        Value::DateTime(v)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(v: DateTime<Utc>) -> Self {
        Value::DateTime(v.naive_utc())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

/// Arrays and objects are kept as their JSON text.
impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => match n.as_f64() {
                    Some(f) => Value::Float(f),
                    None => Value::Text(n.to_string()),
                },
            },
            serde_json::Value::String(s) => Value::Text(s),
            other => Value::Text(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn text_forms() {
        assert_eq!(Value::from(5).to_text().as_deref(), Some("5"));
        assert_eq!(Value::from(true).to_text().as_deref(), Some("1"));
        assert_eq!(Value::from(1.5).to_text().as_deref(), Some("1.5"));
        assert_eq!(Value::Null.to_text(), None);

        let d = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        assert_eq!(Value::from(d).to_text().as_deref(), Some("2024-02-29"));
        let dt = d.and_hms_opt(13, 5, 9).unwrap();
        assert_eq!(
            Value::from(dt).to_text().as_deref(),
            Some("2024-02-29 13:05:09")
        );
    }

    #[test]
    fn integer_forms() {
        assert_eq!(Value::from(false).to_integer_text().as_deref(), Some("0"));
        assert_eq!(Value::from(-2.9).to_integer_text().as_deref(), Some("-2"));
        assert_eq!(Value::from(" 42 ").to_integer_text().as_deref(), Some("42"));
    }

    #[test]
    fn integer_forms_keep_unrepresentable_floats() {
        assert_eq!(Value::from(f64::NAN).to_integer_text().as_deref(), Some("NaN"));
        assert_eq!(
            Value::from(f64::INFINITY).to_integer_text().as_deref(),
            Some("inf")
        );
        assert_eq!(
            Value::from(1e30).to_integer_text().as_deref(),
            Some("1000000000000000000000000000000")
        );
    }

    #[test]
    fn from_option() {
        assert_eq!(Value::from(None::<i32>), Value::Null);
        assert_eq!(Value::from(Some("x")), Value::Text("x".into()));
    }

    #[test]
    fn from_json() {
        assert_eq!(Value::from(json!(null)), Value::Null);
        assert_eq!(Value::from(json!(7)), Value::Int(7));
        assert_eq!(Value::from(json!(0.25)), Value::Float(0.25));
        assert_eq!(Value::from(json!("a")), Value::Text("a".into()));
        assert_eq!(Value::from(json!([1, 2])), Value::Text("[1,2]".into()));
    }
}
