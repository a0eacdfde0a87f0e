//! LogRecord - the value every sink observes
//!
//! A record is built by the emitter, handed to the dispatcher once, and after
//! that only its timestamp may be rewritten (timezone normalization).

use chrono::{DateTime, SecondsFormat, Utc};
use chrono_tz::Tz;
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::fmt;

use crate::Level;

/// Attribute value
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    String(String),
    I64(i64),
    U64(u64),
    F64(f64),
    Bool(bool),
    /// Nested attributes (produced by groups)
    Group(Vec<Attr>),
}

impl Value {
    /// Whether this value is a group with no members
    pub fn is_empty_group(&self) -> bool {
        matches!(self, Value::Group(attrs) if attrs.is_empty())
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(s) => f.write_str(s),
            Value::I64(v) => write!(f, "{v}"),
            Value::U64(v) => write!(f, "{v}"),
            Value::F64(v) => write!(f, "{v}"),
            Value::Bool(v) => write!(f, "{v}"),
            Value::Group(attrs) => {
                f.write_str("[")?;
                for (i, attr) in attrs.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "{attr}")?;
                }
                f.write_str("]")
            }
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::String(s) => serializer.serialize_str(s),
            Value::I64(v) => serializer.serialize_i64(*v),
            Value::U64(v) => serializer.serialize_u64(*v),
            Value::F64(v) => serializer.serialize_f64(*v),
            Value::Bool(v) => serializer.serialize_bool(*v),
            Value::Group(attrs) => {
                let mut map = serializer.serialize_map(Some(attrs.len()))?;
                for attr in attrs {
                    map.serialize_entry(&attr.key, &attr.value)?;
                }
                map.end()
            }
        }
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::F64(v)
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::F64(v as f64)
    }
}

macro_rules! impl_from_signed {
    ($($t:ty),*) => {
        $(impl From<$t> for Value {
            fn from(v: $t) -> Self {
                Value::I64(v as i64)
            }
        })*
    };
}

macro_rules! impl_from_unsigned {
    ($($t:ty),*) => {
        $(impl From<$t> for Value {
            fn from(v: $t) -> Self {
                Value::U64(v as u64)
            }
        })*
    };
}

impl_from_signed!(i8, i16, i32, i64, isize);
impl_from_unsigned!(u8, u16, u32, u64, usize);

/// Key/value attribute
#[derive(Debug, Clone, PartialEq)]
pub struct Attr {
    pub key: String,
    pub value: Value,
}

impl Attr {
    pub fn new(key: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Group attribute nesting `attrs` under `name`
    pub fn group(name: impl Into<String>, attrs: Vec<Attr>) -> Self {
        Self {
            key: name.into(),
            value: Value::Group(attrs),
        }
    }
}

impl fmt::Display for Attr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.key, self.value)
    }
}

/// Shorthand for [`Attr::new`]
pub fn attr(key: impl Into<String>, value: impl Into<Value>) -> Attr {
    Attr::new(key, value)
}

/// A single log record
#[derive(Debug, Clone, PartialEq)]
pub struct LogRecord {
    level: Level,
    time: DateTime<Tz>,
    message: String,
    attrs: Vec<Attr>,
}

impl LogRecord {
    /// Create a record stamped with the current time in UTC
    pub fn new(level: Level, message: impl Into<String>) -> Self {
        Self::at(level, message, Utc::now().with_timezone(&Tz::UTC))
    }

    /// Create a record with an explicit timestamp
    pub fn at(level: Level, message: impl Into<String>, time: DateTime<Tz>) -> Self {
        Self {
            level,
            time,
            message: message.into(),
            attrs: Vec::new(),
        }
    }

    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attrs.push(Attr::new(key, value));
        self
    }

    pub fn with_attrs(mut self, attrs: impl IntoIterator<Item = Attr>) -> Self {
        self.attrs.extend(attrs);
        self
    }

    pub fn level(&self) -> Level {
        self.level
    }

    pub fn time(&self) -> &DateTime<Tz> {
        &self.time
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn attrs(&self) -> &[Attr] {
        &self.attrs
    }

    /// Timestamp as RFC 3339 with millisecond precision
    pub fn rfc3339(&self) -> String {
        self.time.to_rfc3339_opts(SecondsFormat::Millis, true)
    }

    /// Convert the timestamp into `tz`. The instant is unchanged.
    pub fn in_timezone(mut self, tz: Tz) -> Self {
        self.time = self.time.with_timezone(&tz);
        self
    }
}
