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

/// Whether a field still holds the empty value of its type.
///
/// `Option` is only empty when it is `None`, so `Some(0)` takes part in a
/// query while a plain `0` does not.
pub trait ZeroValue {
    fn is_zero_value(&self) -> bool;
}

macro_rules! impl_zero_by_default {
    ($($ty:ty),*) => {
        $(
            impl ZeroValue for $ty {
                fn is_zero_value(&self) -> bool {
                    *self == <$ty>::default()
                }
            }
        )*
    };
}

impl_zero_by_default!(bool, i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64, char, String);
// chrono's defaults are the unix epoch and midnight.
impl_zero_by_default!(NaiveDate, NaiveTime, NaiveDateTime, DateTime<Utc>);

impl ZeroValue for Uuid {
    fn is_zero_value(&self) -> bool {
        self.is_nil()
    }
}

impl ZeroValue for JsonValue {
    fn is_zero_value(&self) -> bool {
        self.is_null()
    }
}

impl ZeroValue for SqlValue {
    fn is_zero_value(&self) -> bool {
        self.is_zero()
    }
}

impl ZeroValue for Between {
    fn is_zero_value(&self) -> bool {
        self.left.is_blank() && self.right.is_blank()
    }
}

impl<T> ZeroValue for Option<T> {
    fn is_zero_value(&self) -> bool {
        self.is_none()
    }
}

impl<T> ZeroValue for Vec<T> {
    fn is_zero_value(&self) -> bool {
        self.is_empty()
    }
}
