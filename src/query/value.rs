use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Scalar carried by predicate leaves, records and pass-through options.
///
/// Timestamps serialize as RFC 3339 text. JSON strings always deserialize
/// as [`Value::String`]; comparisons against a timestamp parse them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(untagged)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    Timestamp(DateTime<Utc>),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_string(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_timestamp(&self) -> Option<DateTime<Utc>> {
        match self {
            Value::Timestamp(t) => Some(*t),
            _ => None,
        }
    }

    /// Orders two values of compatible kinds. Ints and floats compare
    /// numerically, RFC 3339 strings compare with timestamps; other
    /// mismatched kinds are unordered.
    pub fn compare(&self, other: &Value) -> Option<Ordering> {
        match (self, other) {
            (Value::Null, Value::Null) => Some(Ordering::Equal),
            (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
            (Value::Int(a), Value::Int(b)) => Some(a.cmp(b)),
            (Value::Int(_) | Value::Float(_), Value::Int(_) | Value::Float(_)) => {
                self.as_float()?.partial_cmp(&other.as_float()?)
            }
            (Value::Timestamp(a), Value::Timestamp(b)) => Some(a.cmp(b)),
            (Value::Timestamp(a), Value::String(b)) => Some(a.cmp(&parse_timestamp(b)?)),
            (Value::String(a), Value::Timestamp(b)) => Some(parse_timestamp(a)?.cmp(b)),
            (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }

    /// Total order for sorting: kinds first (null, bool, number, string,
    /// timestamp), then values within a kind. Floats use IEEE total order,
    /// so NaN sorts after every number.
    pub fn total_cmp(&self, other: &Value) -> Ordering {
        match (self, other) {
            (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
            (Value::Int(a), Value::Int(b)) => a.cmp(b),
            (Value::Int(_) | Value::Float(_), Value::Int(_) | Value::Float(_)) => {
                let a = self.as_float().unwrap_or(f64::NAN);
                let b = other.as_float().unwrap_or(f64::NAN);
                a.total_cmp(&b)
            }
            (Value::String(a), Value::String(b)) => a.cmp(b),
            (Value::Timestamp(a), Value::Timestamp(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }

    fn rank(&self) -> u8 {
        match self {
            Value::Null => 0,
            Value::Bool(_) => 1,
            Value::Int(_) | Value::Float(_) => 2,
            Value::String(_) => 3,
            Value::Timestamp(_) => 4,
        }
    }

    /// Equality with numeric coercion, used by predicate evaluation.
    pub fn loosely_eq(&self, other: &Value) -> bool {
        self.compare(other) == Some(Ordering::Equal)
    }
}

macro_rules! impl_from_scalar {
    ($($ty:ty => $variant:ident $(as $cast:ty)?),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Value::$variant(v $(as $cast)?)
                }
            }
        )*
    };
}

fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|t| t.with_timezone(&Utc))
}

impl_from_scalar! {
    bool => Bool,
    i64 => Int,
    i32 => Int as i64,
    u32 => Int as i64,
    f64 => Float,
    f32 => Float as f64,
    String => String,
    DateTime<Utc> => Timestamp,
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Value::Null)
    }
}

impl From<&serde_json::Value> for Value {
    /// Scalar conversion; arrays and objects have no scalar form and map to
    /// their JSON text.
    fn from(v: &serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(*b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(s) => Value::String(s.clone()),
            other => Value::String(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_compare_crosses_int_and_float() {
        assert_eq!(Value::Int(2).compare(&Value::Float(2.5)), Some(Ordering::Less));
        assert!(Value::Float(3.0).loosely_eq(&Value::Int(3)));
    }

    #[test]
    fn test_mismatched_kinds_are_unordered() {
        assert_eq!(Value::from("1").compare(&Value::Int(1)), None);
        assert!(!Value::Null.loosely_eq(&Value::Bool(false)));
    }

    #[test]
    fn test_total_cmp_orders_kinds_then_values() {
        let mut values = vec![
            Value::from("b"),
            Value::Float(f64::NAN),
            Value::Int(2),
            Value::Null,
            Value::Float(1.5),
            Value::from("a"),
            Value::Bool(true),
            Value::Int(1),
        ];
        values.sort_by(Value::total_cmp);

        assert_eq!(values[0], Value::Null);
        assert_eq!(values[1], Value::Bool(true));
        assert_eq!(&values[2..5], &[Value::Int(1), Value::Float(1.5), Value::Int(2)]);
        assert!(values[5].as_float().is_some_and(f64::is_nan));
        assert_eq!(&values[6..], &[Value::from("a"), Value::from("b")]);
    }

    #[test]
    fn test_total_cmp_is_transitive_across_kinds() {
        let (one, x, two) = (Value::Int(1), Value::from("x"), Value::Int(2));
        assert_eq!(one.total_cmp(&x), Ordering::Less);
        assert_eq!(two.total_cmp(&x), Ordering::Less);
        assert_eq!(one.total_cmp(&two), Ordering::Less);
    }

    #[test]
    fn test_rfc3339_text_stays_a_string() {
        let text = "2024-03-01T12:00:00Z";
        let value: Value = serde_json::from_value(serde_json::json!(text)).unwrap();
        assert_eq!(value, Value::from(text));

        let stamp = Value::from(DateTime::parse_from_rfc3339(text).unwrap().with_timezone(&Utc));
        assert_eq!(stamp.compare(&value), Some(Ordering::Equal));
        assert_eq!(
            Value::from("2024-01-01T00:00:00+00:00").compare(&stamp),
            Some(Ordering::Less)
        );
        assert_eq!(stamp.compare(&Value::from("not a date")), None);
    }

    #[test]
    fn test_untagged_serialization() {
        let json = serde_json::to_value(vec![
            Value::Null,
            Value::from(7),
            Value::from("x"),
            Value::from(true),
        ])
        .unwrap();
        assert_eq!(json, serde_json::json!([null, 7, "x", true]));
    }
}
