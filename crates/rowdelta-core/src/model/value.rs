//! Typed cell values.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single cell of a snapshot.
///
/// Equality between values is type-aware and is exposed through
/// [`Value::same_as`] and [`Value::key`], not through `PartialEq`, which is
/// structural (so `Decimal(1.0)` and `Integer(1)` are `!=` but `same_as`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Value {
    Null,
    Boolean(bool),
    Integer(i64),
    Decimal(Decimal),
    Float(f64),
    Text(String),
    Bytes(Vec<u8>),
    Date(NaiveDate),
    Time(NaiveTime),
    DateTime(NaiveDateTime),
}

/// Canonical, hashable form of a [`Value`].
///
/// Two values are the same iff their keys are equal. Numbers are folded
/// onto a normalized decimal so that magnitude, not representation or
/// scale, decides equality.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ValueKey {
    Null,
    Boolean(bool),
    Number(Decimal),
    /// Floats with no exact decimal form (NaN, infinities, tiny or long
    /// fractions), keyed by their bits with `-0.0` folded onto `0.0`
    FloatBits(u64),
    Text(String),
    Bytes(Vec<u8>),
    Date(NaiveDate),
    Time(NaiveTime),
    DateTime(NaiveDateTime),
}

/// Declared data type of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueType {
    Boolean,
    Integer,
    Decimal,
    Float,
    Text,
    Bytes,
    Date,
    Time,
    DateTime,
    /// No declared type, or one that maps to nothing above
    Unknown,
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Runtime type of this value; `Null` has no type of its own.
    pub fn value_type(&self) -> Option<ValueType> {
        match self {
            Value::Null => None,
            Value::Boolean(_) => Some(ValueType::Boolean),
            Value::Integer(_) => Some(ValueType::Integer),
            Value::Decimal(_) => Some(ValueType::Decimal),
            Value::Float(_) => Some(ValueType::Float),
            Value::Text(_) => Some(ValueType::Text),
            Value::Bytes(_) => Some(ValueType::Bytes),
            Value::Date(_) => Some(ValueType::Date),
            Value::Time(_) => Some(ValueType::Time),
            Value::DateTime(_) => Some(ValueType::DateTime),
        }
    }

    pub fn key(&self) -> ValueKey {
        match self {
            Value::Null => ValueKey::Null,
            Value::Boolean(b) => ValueKey::Boolean(*b),
            Value::Integer(i) => ValueKey::Number(Decimal::from(*i).normalize()),
            Value::Decimal(d) => ValueKey::Number(d.normalize()),
            Value::Float(f) => float_key(*f),
            Value::Text(s) => ValueKey::Text(s.clone()),
            Value::Bytes(b) => ValueKey::Bytes(b.clone()),
            Value::Date(d) => ValueKey::Date(*d),
            Value::Time(t) => ValueKey::Time(*t),
            Value::DateTime(dt) => ValueKey::DateTime(*dt),
        }
    }

    /// Type-aware equality: numeric by magnitude, binary byte-for-byte,
    /// temporal by calendar fields, text exactly.
    pub fn same_as(&self, other: &Value) -> bool {
        match (self, other) {
            // cheap paths that avoid building keys
            (Value::Null, Value::Null) => true,
            (Value::Text(a), Value::Text(b)) => a == b,
            (Value::Bytes(a), Value::Bytes(b)) => a == b,
            (Value::Integer(a), Value::Integer(b)) => a == b,
            _ => self.key() == other.key(),
        }
    }
}

// A float joins the decimal numbers only when the conversion is exact, so
// two distinct floats never share a key.
fn float_key(f: f64) -> ValueKey {
    match Decimal::from_f64_retain(f) {
        Some(d) if d.to_f64() == Some(f) => ValueKey::Number(d.normalize()),
        _ if f == 0.0 => ValueKey::FloatBits(0.0f64.to_bits()),
        _ => ValueKey::FloatBits(f.to_bits()),
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "NULL"),
            Value::Boolean(b) => write!(f, "{}", b),
            Value::Integer(i) => write!(f, "{}", i),
            Value::Decimal(d) => write!(f, "{}", d),
            Value::Float(x) => write!(f, "{}", x),
            Value::Text(s) => write!(f, "'{}'", s),
            Value::Bytes(b) => write!(f, "x'{}'", hex::encode(b)),
            Value::Date(d) => write!(f, "{}", d),
            Value::Time(t) => write!(f, "{}", t),
            Value::DateTime(dt) => write!(f, "{}", dt),
        }
    }
}

impl ValueType {
    /// Map a SQL declared type to a value type, following SQLite's
    /// affinity rules and recognizing the common temporal names.
    pub fn from_declared(declared: &str) -> ValueType {
        let upper = declared.to_ascii_uppercase();
        if upper.is_empty() {
            ValueType::Unknown
        } else if upper.contains("BOOL") {
            ValueType::Boolean
        } else if upper.contains("DATETIME") || upper.contains("TIMESTAMP") {
            ValueType::DateTime
        } else if upper.contains("DATE") {
            ValueType::Date
        } else if upper.contains("TIME") {
            ValueType::Time
        } else if upper.contains("INT") {
            ValueType::Integer
        } else if upper.contains("CHAR") || upper.contains("CLOB") || upper.contains("TEXT") {
            ValueType::Text
        } else if upper.contains("BLOB") {
            ValueType::Bytes
        } else if upper.contains("REAL") || upper.contains("FLOA") || upper.contains("DOUB") {
            ValueType::Float
        } else if upper.contains("DEC") || upper.contains("NUM") {
            ValueType::Decimal
        } else {
            ValueType::Unknown
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Boolean(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Integer(i64::from(v))
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Integer(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<Decimal> for Value {
    fn from(v: Decimal) -> Self {
        Value::Decimal(v)
    }
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

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Value::Bytes(v)
    }
}

impl From<NaiveDate> for Value {
    fn from(v: NaiveDate) -> Self {
        Value::Date(v)
    }
}

impl From<NaiveTime> for Value {
    fn from(v: NaiveTime) -> Self {
        Value::Time(v)
    }
}

impl From<NaiveDateTime> for Value {
    fn from(v: NaiveDateTime) -> Self {
        Value::DateTime(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Value::Null)
    }
}
