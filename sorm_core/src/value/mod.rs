
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value as JsonValue;
use std::fmt;
use uuid::Uuid;

mod to_value;
mod from_value;
mod zero;

#[doc(inline)]
pub use to_value::*;
#[doc(inline)]
pub use from_value::*;
#[doc(inline)]
pub use zero::*;

/// A single bind value as it travels from a query struct to the driver.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum SqlValue {
    #[default]
    Null,
    Bool(bool),
    Tinyint(i8),
    Smallint(i16),
    Int(i32),
    Bigint(i64),
    Float(f32),
    Double(f64),
    Char(char),
    Text(String),
    Json(JsonValue),
    Uuid(Uuid),
    Date(NaiveDate),
    Time(NaiveTime),
    DateTime(NaiveDateTime),
    Timestamp(DateTime<Utc>),
    List(Vec<SqlValue>),
    Between(Box<Between>),
}

/// The two bounds of a `between` / `notBetween` condition.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Between {
    #[serde(rename = "start", default)]
    pub left: SqlValue,
    #[serde(rename = "end", default)]
    pub right: SqlValue,
}

impl Between {
    pub fn new<L: IntoSqlValue, R: IntoSqlValue>(left: L, right: R) -> Self {
        Between {
            left: left.into_value(),
            right: right.into_value(),
        }
    }

    /// Both bounds carry a value, otherwise the condition is dropped.
    pub fn is_complete(&self) -> bool {
        !self.left.is_blank() && !self.right.is_blank()
    }
}

impl SqlValue {
    pub fn is_null(&self) -> bool {
        matches!(self, SqlValue::Null)
    }

    /// Null or the empty string. Conditions over a blank value are skipped.
    pub fn is_blank(&self) -> bool {
        match self {
            SqlValue::Null => true,
            SqlValue::Text(v) => v.is_empty(),
            _ => false,
        }
    }

    /// The "empty" value of the underlying field kind.
    pub fn is_zero(&self) -> bool {
        match self {
            SqlValue::Null => true,
            SqlValue::Bool(v) => !*v,
            SqlValue::Tinyint(v) => *v == 0,
            SqlValue::Smallint(v) => *v == 0,
            SqlValue::Int(v) => *v == 0,
            SqlValue::Bigint(v) => *v == 0,
            SqlValue::Float(v) => *v == 0.0,
            SqlValue::Double(v) => *v == 0.0,
            SqlValue::Char(v) => *v == '\0',
            SqlValue::Text(v) => v.is_empty(),
            SqlValue::Json(v) => v.is_null(),
            SqlValue::Uuid(v) => v.is_nil(),
            SqlValue::Date(v) => *v == NaiveDate::default(),
            SqlValue::Time(v) => *v == NaiveTime::default(),
            SqlValue::DateTime(v) => *v == NaiveDateTime::default(),
            SqlValue::Timestamp(v) => *v == DateTime::<Utc>::default(),
            SqlValue::List(v) => v.is_empty(),
            SqlValue::Between(v) => v.left.is_blank() && v.right.is_blank(),
        }
    }

    pub fn is_scalar(&self) -> bool {
        !matches!(self, SqlValue::List(_) | SqlValue::Between(_))
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            SqlValue::Null => "Null",
            SqlValue::Bool(_) => "Bool",
            SqlValue::Tinyint(_) => "Tinyint",
            SqlValue::Smallint(_) => "Smallint",
            SqlValue::Int(_) => "Int",
            SqlValue::Bigint(_) => "Bigint",
            SqlValue::Float(_) => "Float",
            SqlValue::Double(_) => "Double",
            SqlValue::Char(_) => "Char",
            SqlValue::Text(_) => "Text",
            SqlValue::Json(_) => "Json",
            SqlValue::Uuid(_) => "Uuid",
            SqlValue::Date(_) => "Date",
            SqlValue::Time(_) => "Time",
            SqlValue::DateTime(_) => "DateTime",
            SqlValue::Timestamp(_) => "Timestamp",
            SqlValue::List(_) => "List",
            SqlValue::Between(_) => "Between",
        }
    }

    /// Json objects holding only `start` / `end` become a [`Between`].
    pub fn from_json(value: JsonValue) -> SqlValue {
        match value {
            JsonValue::Null => SqlValue::Null,
            JsonValue::Bool(v) => SqlValue::Bool(v),
            JsonValue::Number(n) => {
                if let Some(v) = n.as_i64() {
                    SqlValue::Bigint(v)
                } else if let Some(v) = n.as_f64() {
                    SqlValue::Double(v)
                } else {
                    SqlValue::Text(n.to_string())
                }
            }
            JsonValue::String(v) => SqlValue::Text(v),
            JsonValue::Array(items) => SqlValue::List(items.into_iter().map(SqlValue::from_json).collect()),
            JsonValue::Object(mut map) => {
                let is_range = !map.is_empty() && map.keys().all(|k| k == "start" || k == "end");
                if is_range {
                    let left = map.remove("start").map(SqlValue::from_json).unwrap_or_default();
                    let right = map.remove("end").map(SqlValue::from_json).unwrap_or_default();
                    SqlValue::Between(Box::new(Between { left, right }))
                } else {
                    SqlValue::Json(JsonValue::Object(map))
                }
            }
        }
    }

    pub fn to_json(&self) -> JsonValue {
        serde_json::to_value(self).unwrap_or(JsonValue::Null)
    }
}

impl fmt::Display for SqlValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SqlValue::Null => write!(f, "NULL"),
            SqlValue::Bool(v) => write!(f, "{}", v),
            SqlValue::Tinyint(v) => write!(f, "{}", v),
            SqlValue::Smallint(v) => write!(f, "{}", v),
            SqlValue::Int(v) => write!(f, "{}", v),
            SqlValue::Bigint(v) => write!(f, "{}", v),
            SqlValue::Float(v) => write!(f, "{}", v),
            SqlValue::Double(v) => write!(f, "{}", v),
            SqlValue::Char(v) => write!(f, "'{}'", v),
            SqlValue::Text(v) => write!(f, "'{}'", v),
            SqlValue::Json(v) => write!(f, "{}", v),
            SqlValue::Uuid(v) => write!(f, "'{}'", v),
            SqlValue::Date(v) => write!(f, "'{}'", v),
            SqlValue::Time(v) => write!(f, "'{}'", v),
            SqlValue::DateTime(v) => write!(f, "'{}'", v),
            SqlValue::Timestamp(v) => write!(f, "'{}'", v.to_rfc3339()),
            SqlValue::List(v) => {
                let items = v.iter().map(ToString::to_string).collect::<Vec<_>>();
                write!(f, "[{}]", items.join(", "))
            }
            SqlValue::Between(v) => write!(f, "{} and {}", v.left, v.right),
        }
    }
}

impl Serialize for SqlValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            SqlValue::Null => serializer.serialize_none(),
            SqlValue::Bool(v) => serializer.serialize_bool(*v),
            SqlValue::Tinyint(v) => serializer.serialize_i8(*v),
            SqlValue::Smallint(v) => serializer.serialize_i16(*v),
            SqlValue::Int(v) => serializer.serialize_i32(*v),
            SqlValue::Bigint(v) => serializer.serialize_i64(*v),
            SqlValue::Float(v) => serializer.serialize_f32(*v),
            SqlValue::Double(v) => serializer.serialize_f64(*v),
            SqlValue::Char(v) => serializer.serialize_char(*v),
            SqlValue::Text(v) => serializer.serialize_str(v),
            SqlValue::Json(v) => v.serialize(serializer),
            SqlValue::Uuid(v) => v.serialize(serializer),
            SqlValue::Date(v) => v.serialize(serializer),
            SqlValue::Time(v) => v.serialize(serializer),
            SqlValue::DateTime(v) => v.serialize(serializer),
            SqlValue::Timestamp(v) => v.serialize(serializer),
            SqlValue::List(v) => serializer.collect_seq(v.iter()),
            SqlValue::Between(v) => v.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for SqlValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        JsonValue::deserialize(deserializer).map(SqlValue::from_json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_and_zero_differ() {
        assert!(SqlValue::Null.is_blank());
        assert!(SqlValue::Text(String::new()).is_blank());
        assert!(!SqlValue::Int(0).is_blank());
        assert!(SqlValue::Int(0).is_zero());
        assert!(SqlValue::DateTime(NaiveDateTime::default()).is_zero());
        assert!(!SqlValue::Date(NaiveDate::from_ymd_opt(2024, 1, 2).unwrap()).is_zero());
        assert!(SqlValue::Bool(false).is_zero());
        assert!(!SqlValue::Text("a".to_string()).is_zero());
        assert!(SqlValue::Between(Box::new(Between::default())).is_zero());
        assert!(!SqlValue::Between(Box::new(Between::new(1, SqlValue::Null))).is_zero());
    }

    #[test]
    fn between_reads_start_and_end() {
        let value: SqlValue = serde_json::from_str(r#"{"start": 10, "end": 20}"#).unwrap();
        assert_eq!(value, SqlValue::Between(Box::new(Between {
            left: SqlValue::Bigint(10),
            right: SqlValue::Bigint(20),
        })));
        let between: Between = serde_json::from_str(r#"{"start": "a"}"#).unwrap();
        assert!(!between.is_complete());
    }

    #[test]
    fn serializes_untagged() {
        let value = SqlValue::List(vec![SqlValue::Int(1), SqlValue::Text("x".to_string()), SqlValue::Null]);
        assert_eq!(serde_json::to_string(&value).unwrap(), r#"[1,"x",null]"#);
    }
}
