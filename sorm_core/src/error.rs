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

use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum DataError {
    TypeMismatch {
        expected: String,
        found: String,
    },
    NullValue {
        target_type: String,
    },
    NumericOverflow {
        target_type: String,
    },
    ParseError(String),
    /// A value whose shape does not fit the operator, e.g. a list given to `eq`.
    MalformedCondition {
        column: String,
        keyword: String,
        reason: String,
    },
    UnknownColumn(String),
}

impl fmt::Display for DataError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataError::TypeMismatch { expected, found } => {
                write!(f, "Type mismatch: expected {}, found {}", expected, found)
            }
            DataError::NullValue { target_type } => {
                write!(f, "Cannot convert null value to {}", target_type)
            }
            DataError::NumericOverflow { target_type } => {
                write!(f, "Numeric overflow when converting to {}", target_type)
            }
            DataError::ParseError(message) => write!(f, "Parse error: {}", message),
            DataError::MalformedCondition { column, keyword, reason } => write!(
                f,
                "Malformed condition `{}` on column `{}`: {}",
                keyword, column, reason
            ),
            DataError::UnknownColumn(column) => write!(f, "Unknown column: {}", column),
        }
    }
}

impl std::error::Error for DataError {}

impl DataError {
    pub fn type_mismatch<T: Into<String>, E: Into<String>>(expected: T, found: E) -> Self {
        DataError::TypeMismatch {
            expected: expected.into(),
            found: found.into(),
        }
    }

    pub fn null_value<T: Into<String>>(target_type: T) -> Self {
        DataError::NullValue { target_type: target_type.into() }
    }

    pub fn malformed<C: Into<String>, K: ToString, R: Into<String>>(column: C, keyword: K, reason: R) -> Self {
        DataError::MalformedCondition {
            column: column.into(),
            keyword: keyword.to_string(),
            reason: reason.into(),
        }
    }
}

impl From<serde_json::Error> for DataError {
    fn from(err: serde_json::Error) -> Self {
        DataError::ParseError(err.to_string())
    }
}

impl From<uuid::Error> for DataError {
    fn from(err: uuid::Error) -> Self {
        DataError::ParseError(err.to_string())
    }
}

impl From<chrono::ParseError> for DataError {
    fn from(err: chrono::ParseError) -> Self {
        DataError::ParseError(err.to_string())
    }
}
