/*
 *
 *  *
 *  *      Copyright (c) 2018-2025, SnackCloud All rights reserved.
 *  *
 *  *   Redistribution and use in source and binary forms, with or without
 *  *   modification, are permitted provided that the following conditions are met:
 *  *
 *  *   Redistributions of source code must retain the above copyright notice,
 *  *   this list of conditions and the following disclaimer.
 *  *   Redistributions in binary form must reproduce the above copyright
 *  *   notice, this list of conditions and the following disclaimer in the
 *  *   documentation and/or other materials provided with the distribution.
 *  *   Neither the name of the www.snackcloud.cn developer nor the names of its
 *  *   contributors may be used to endorse or promote products derived from
 *  *   this software without specific prior written permission.
 *  *   Author: SnackCloud
 *  *
 *
 */

use crate::{Between, DataError, SqlValue};
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde_json::Value as JsonValue;
use std::str::FromStr;
use uuid::Uuid;

/// Converts a bind value back into a field type.
///
/// `Null` only converts into `Option<T>` (and [`SqlValue`] itself).
pub trait FromSqlValue: Sized {
    fn from_value_opt(value: &SqlValue) -> Result<Self, DataError>;
}

impl FromSqlValue for SqlValue {
    fn from_value_opt(value: &SqlValue) -> Result<Self, DataError> {
        Ok(value.clone())
    }
}

impl<T: FromSqlValue> FromSqlValue for Option<T> {
    fn from_value_opt(value: &SqlValue) -> Result<Self, DataError> {
        match value {
            SqlValue::Null => Ok(None),
            other => T::from_value_opt(other).map(Some),
        }
    }
}

fn parse_text<T: FromStr>(text: &str, target: &str) -> Result<T, DataError> {
    text.trim()
        .parse::<T>()
        .map_err(|_| DataError::ParseError(format!("Failed to parse '{}' as {}", text, target)))
}

macro_rules! impl_from_sql_value_integer {
    ($($ty:ty),*) => {
        $(
            impl FromSqlValue for $ty {
                fn from_value_opt(value: &SqlValue) -> Result<Self, DataError> {
                    let target = stringify!($ty);
                    let wide: i64 = match value {
                        SqlValue::Bool(v) => *v as i64,
                        SqlValue::Tinyint(v) => *v as i64,
                        SqlValue::Smallint(v) => *v as i64,
                        SqlValue::Int(v) => *v as i64,
                        SqlValue::Bigint(v) => *v,
                        SqlValue::Text(v) => parse_text::<i64>(v, target)?,
                        SqlValue::Null => return Err(DataError::null_value(target)),
                        other => return Err(DataError::type_mismatch(target, other.type_name())),
                    };
                    <$ty>::try_from(wide).map_err(|_| DataError::NumericOverflow { target_type: target.to_string() })
                }
            }
        )*
    };
}

impl_from_sql_value_integer!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

macro_rules! impl_from_sql_value_float {
    ($($ty:ty),*) => {
        $(
            impl FromSqlValue for $ty {
                fn from_value_opt(value: &SqlValue) -> Result<Self, DataError> {
                    let target = stringify!($ty);
                    match value {
                        SqlValue::Tinyint(v) => Ok(*v as $ty),
                        SqlValue::Smallint(v) => Ok(*v as $ty),
                        SqlValue::Int(v) => Ok(*v as $ty),
                        SqlValue::Bigint(v) => Ok(*v as $ty),
                        SqlValue::Float(v) => Ok(*v as $ty),
                        SqlValue::Double(v) => Ok(*v as $ty),
                        SqlValue::Text(v) => parse_text::<$ty>(v, target),
                        SqlValue::Null => Err(DataError::null_value(target)),
                        other => Err(DataError::type_mismatch(target, other.type_name())),
                    }
                }
            }
        )*
    };
}

impl_from_sql_value_float!(f32, f64);

impl FromSqlValue for bool {
    fn from_value_opt(value: &SqlValue) -> Result<Self, DataError> {
        match value {
            SqlValue::Bool(v) => Ok(*v),
            SqlValue::Tinyint(v) => Ok(*v != 0),
            SqlValue::Smallint(v) => Ok(*v != 0),
            SqlValue::Int(v) => Ok(*v != 0),
            SqlValue::Bigint(v) => Ok(*v != 0),
            SqlValue::Text(s) => match s.to_lowercase().as_str() {
                "true" | "1" | "yes" | "on" => Ok(true),
                "false" | "0" | "no" | "off" => Ok(false),
                _ => Err(DataError::ParseError(format!("Failed to parse '{}' as bool", s))),
            },
            SqlValue::Null => Err(DataError::null_value("bool")),
            other => Err(DataError::type_mismatch("bool", other.type_name())),
        }
    }
}

impl FromSqlValue for String {
    fn from_value_opt(value: &SqlValue) -> Result<Self, DataError> {
        match value {
            SqlValue::Text(v) => Ok(v.clone()),
            SqlValue::Char(v) => Ok(v.to_string()),
            SqlValue::Bool(v) => Ok(v.to_string()),
            SqlValue::Tinyint(v) => Ok(v.to_string()),
            SqlValue::Smallint(v) => Ok(v.to_string()),
            SqlValue::Int(v) => Ok(v.to_string()),
            SqlValue::Bigint(v) => Ok(v.to_string()),
            SqlValue::Float(v) => Ok(v.to_string()),
            SqlValue::Double(v) => Ok(v.to_string()),
            SqlValue::Uuid(v) => Ok(v.to_string()),
            SqlValue::Date(v) => Ok(v.to_string()),
            SqlValue::Time(v) => Ok(v.to_string()),
            SqlValue::DateTime(v) => Ok(v.to_string()),
            SqlValue::Timestamp(v) => Ok(v.to_rfc3339()),
            SqlValue::Json(v) => Ok(serde_json::to_string(v)?),
            SqlValue::Null => Err(DataError::null_value("String")),
            other => Err(DataError::type_mismatch("String", other.type_name())),
        }
    }
}

impl FromSqlValue for char {
    fn from_value_opt(value: &SqlValue) -> Result<Self, DataError> {
        match value {
            SqlValue::Char(v) => Ok(*v),
            SqlValue::Text(v) => {
                let mut chars = v.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Ok(c),
                    _ => Err(DataError::ParseError(format!("Failed to parse '{}' as char", v))),
                }
            }
            SqlValue::Null => Err(DataError::null_value("char")),
            other => Err(DataError::type_mismatch("char", other.type_name())),
        }
    }
}

impl FromSqlValue for Uuid {
    fn from_value_opt(value: &SqlValue) -> Result<Self, DataError> {
        match value {
            SqlValue::Uuid(v) => Ok(*v),
            SqlValue::Text(v) => Ok(Uuid::parse_str(v)?),
            SqlValue::Null => Err(DataError::null_value("Uuid")),
            other => Err(DataError::type_mismatch("Uuid", other.type_name())),
        }
    }
}

impl FromSqlValue for NaiveDate {
    fn from_value_opt(value: &SqlValue) -> Result<Self, DataError> {
        match value {
            SqlValue::Date(v) => Ok(*v),
            SqlValue::DateTime(v) => Ok(v.date()),
            SqlValue::Timestamp(v) => Ok(v.date_naive()),
            SqlValue::Text(v) => Ok(NaiveDate::parse_from_str(v, "%Y-%m-%d")?),
            SqlValue::Null => Err(DataError::null_value("NaiveDate")),
            other => Err(DataError::type_mismatch("NaiveDate", other.type_name())),
        }
    }
}

impl FromSqlValue for NaiveTime {
    fn from_value_opt(value: &SqlValue) -> Result<Self, DataError> {
        match value {
            SqlValue::Time(v) => Ok(*v),
            SqlValue::DateTime(v) => Ok(v.time()),
            SqlValue::Text(v) => Ok(NaiveTime::parse_from_str(v, "%H:%M:%S%.f")?),
            SqlValue::Null => Err(DataError::null_value("NaiveTime")),
            other => Err(DataError::type_mismatch("NaiveTime", other.type_name())),
        }
    }
}

impl FromSqlValue for NaiveDateTime {
    fn from_value_opt(value: &SqlValue) -> Result<Self, DataError> {
        match value {
            SqlValue::DateTime(v) => Ok(*v),
            SqlValue::Timestamp(v) => Ok(v.naive_utc()),
            SqlValue::Date(v) => v
                .and_hms_opt(0, 0, 0)
                .ok_or_else(|| DataError::ParseError(format!("Invalid date {}", v))),
            SqlValue::Text(v) => NaiveDateTime::parse_from_str(v, "%Y-%m-%d %H:%M:%S%.f")
                .or_else(|_| NaiveDateTime::parse_from_str(v, "%Y-%m-%dT%H:%M:%S%.f"))
                .map_err(DataError::from),
            SqlValue::Null => Err(DataError::null_value("NaiveDateTime")),
            other => Err(DataError::type_mismatch("NaiveDateTime", other.type_name())),
        }
    }
}

impl FromSqlValue for DateTime<Utc> {
    fn from_value_opt(value: &SqlValue) -> Result<Self, DataError> {
        match value {
            SqlValue::Timestamp(v) => Ok(*v),
            SqlValue::DateTime(v) => Ok(v.and_utc()),
            SqlValue::Text(v) => Ok(DateTime::parse_from_rfc3339(v)?.with_timezone(&Utc)),
            SqlValue::Null => Err(DataError::null_value("DateTime<Utc>")),
            other => Err(DataError::type_mismatch("DateTime<Utc>", other.type_name())),
        }
    }
}

impl FromSqlValue for JsonValue {
    fn from_value_opt(value: &SqlValue) -> Result<Self, DataError> {
        match value {
            SqlValue::Json(v) => Ok(v.clone()),
            SqlValue::Text(v) => Ok(serde_json::from_str(v)?),
            other => Ok(other.to_json()),
        }
    }
}

impl FromSqlValue for Between {
    fn from_value_opt(value: &SqlValue) -> Result<Self, DataError> {
        match value {
            SqlValue::Between(v) => Ok((**v).clone()),
            SqlValue::Null => Err(DataError::null_value("Between")),
            other => Err(DataError::type_mismatch("Between", other.type_name())),
        }
    }
}

impl<T: FromSqlValue> FromSqlValue for Vec<T> {
    fn from_value_opt(value: &SqlValue) -> Result<Self, DataError> {
        match value {
            SqlValue::List(items) => items.iter().map(T::from_value_opt).collect(),
            SqlValue::Null => Err(DataError::null_value("Vec")),
            other => T::from_value_opt(other).map(|v| vec![v]),
        }
    }
}
