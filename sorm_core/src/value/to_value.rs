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

use crate::{Between, SqlValue};
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde_json::Value as JsonValue;
use uuid::Uuid;

pub trait IntoSqlValue {
    fn into_value(&self) -> SqlValue;
}

// Implement conversion for base types
macro_rules! impl_into_sql_value {
    ($($ty:ty => $variant:ident),*) => {
        $(
            impl IntoSqlValue for $ty {
                fn into_value(&self) -> SqlValue {
                    SqlValue::$variant(self.to_owned())
                }
            }
        )*
    };
}

// Casts into a wider signed variant.
macro_rules! impl_widening_into_value {
    ($ty:ty, $variant:ident, $target:ident) => {
        impl IntoSqlValue for $ty {
            fn into_value(&self) -> SqlValue {
                SqlValue::$variant(*self as $target)
            }
        }
    };
}

// Unsigned values widen into the next signed variant.
impl_widening_into_value!(u8, Smallint, i16);
impl_widening_into_value!(u16, Int, i32);
impl_widening_into_value!(u32, Bigint, i64);
// Pointer-sized integers are at most 64 bits wide.
impl_widening_into_value!(isize, Bigint, i64);

impl_into_sql_value! {
    i8 => Tinyint,
    bool => Bool,
    i16 => Smallint,
    i32 => Int,
    i64 => Bigint,
    String => Text,
    f32 => Float,
    f64 => Double,
    char => Char,
    JsonValue => Json,
    Uuid => Uuid,
    NaiveDate => Date,
    NaiveTime => Time,
    NaiveDateTime => DateTime,
    DateTime<Utc> => Timestamp
}

impl IntoSqlValue for u64 {
    fn into_value(&self) -> SqlValue {
        i64::try_from(*self).map(SqlValue::Bigint).unwrap_or_else(|_| SqlValue::Text(self.to_string()))
    }
}

impl IntoSqlValue for usize {
    fn into_value(&self) -> SqlValue {
        i64::try_from(*self).map(SqlValue::Bigint).unwrap_or_else(|_| SqlValue::Text(self.to_string()))
    }
}

impl IntoSqlValue for str {
    fn into_value(&self) -> SqlValue {
        SqlValue::Text(self.to_string())
    }
}

impl IntoSqlValue for SqlValue {
    fn into_value(&self) -> SqlValue {
        self.clone()
    }
}

impl IntoSqlValue for Between {
    fn into_value(&self) -> SqlValue {
        SqlValue::Between(Box::new(self.clone()))
    }
}

impl IntoSqlValue for () {
    fn into_value(&self) -> SqlValue {
        SqlValue::Null
    }
}

// Option Type support
impl<T: IntoSqlValue> IntoSqlValue for Option<T> {
    fn into_value(&self) -> SqlValue {
        match self {
            Some(val) => val.into_value(),
            None => SqlValue::Null,
        }
    }
}

impl<T: IntoSqlValue> IntoSqlValue for Vec<T> {
    fn into_value(&self) -> SqlValue {
        SqlValue::List(self.iter().map(IntoSqlValue::into_value).collect())
    }
}

impl<T: IntoSqlValue> IntoSqlValue for [T] {
    fn into_value(&self) -> SqlValue {
        SqlValue::List(self.iter().map(IntoSqlValue::into_value).collect())
    }
}

impl<T: IntoSqlValue, const N: usize> IntoSqlValue for [T; N] {
    fn into_value(&self) -> SqlValue {
        SqlValue::List(self.iter().map(IntoSqlValue::into_value).collect())
    }
}

impl<T: IntoSqlValue + ?Sized> IntoSqlValue for &T {
    fn into_value(&self) -> SqlValue {
        (**self).into_value()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_collections_and_options() {
        assert_eq!(vec![1, 2].into_value(), SqlValue::List(vec![SqlValue::Int(1), SqlValue::Int(2)]));
        assert_eq!(["a", "b"].into_value(), SqlValue::List(vec![
            SqlValue::Text("a".to_string()),
            SqlValue::Text("b".to_string()),
        ]));
        assert_eq!(Option::<i32>::None.into_value(), SqlValue::Null);
        assert_eq!(Some("x").into_value(), SqlValue::Text("x".to_string()));
        assert_eq!(200u8.into_value(), SqlValue::Smallint(200));
        assert_eq!(u64::MAX.into_value(), SqlValue::Text(u64::MAX.to_string()));
    }

    #[test]
    fn wide_integers_keep_their_sign() {
        assert_eq!((-5isize).into_value(), SqlValue::Bigint(-5));
        assert_eq!(u32::MAX.into_value(), SqlValue::Bigint(u32::MAX as i64));
        assert_eq!(40000u16.into_value(), SqlValue::Int(40000));
    }
}
