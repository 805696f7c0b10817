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

use crate::DataError;
use std::fmt;
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use tracing::debug;

/// Comparison operator attached to a query field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Keyword {
    #[default]
    Eq,
    Ne,
    In,
    NotIn,
    Gt,
    Lt,
    Ge,
    Le,
    Between,
    NotBetween,
    Like,
    NotLike,
    LikeLeft,
    LikeRight,
}

impl Keyword {
    pub const ALL: [Keyword; 14] = [
        Keyword::Eq,
        Keyword::Ne,
        Keyword::In,
        Keyword::NotIn,
        Keyword::Gt,
        Keyword::Lt,
        Keyword::Ge,
        Keyword::Le,
        Keyword::Between,
        Keyword::NotBetween,
        Keyword::Like,
        Keyword::NotLike,
        Keyword::LikeLeft,
        Keyword::LikeRight,
    ];

    /// The tag spelling, e.g. `notIn`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Keyword::Eq => "eq",
            Keyword::Ne => "ne",
            Keyword::In => "in",
            Keyword::NotIn => "notIn",
            Keyword::Gt => "gt",
            Keyword::Lt => "lt",
            Keyword::Ge => "ge",
            Keyword::Le => "le",
            Keyword::Between => "between",
            Keyword::NotBetween => "notBetween",
            Keyword::Like => "like",
            Keyword::NotLike => "notLike",
            Keyword::LikeLeft => "likeLeft",
            Keyword::LikeRight => "likeRight",
        }
    }

    /// Lenient lookup used for field tags: blank or unknown names fall back to `eq`.
    pub fn parse(tag: &str) -> Keyword {
        let tag = tag.trim();
        if tag.is_empty() {
            return Keyword::Eq;
        }
        match tag.parse::<Keyword>() {
            Ok(keyword) => keyword,
            Err(_) => {
                debug!("unknown keyword `{}`, falling back to eq", tag);
                Keyword::Eq
            }
        }
    }

    /// Splits a `op[,altColumn]` tag into the operator and the optional
    /// comparison column.
    pub fn parse_tag(tag: &str) -> (Keyword, Option<String>) {
        let mut parts = tag.splitn(2, ',');
        let keyword = Keyword::parse(parts.next().unwrap_or_default());
        let column = parts
            .next()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(ToString::to_string);
        (keyword, column)
    }

    pub fn is_range(&self) -> bool {
        matches!(self, Keyword::Between | Keyword::NotBetween)
    }

    pub fn is_list(&self) -> bool {
        matches!(self, Keyword::In | Keyword::NotIn)
    }
}

impl FromStr for Keyword {
    type Err = DataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Keyword::ALL
            .iter()
            .find(|k| k.as_str().eq_ignore_ascii_case(s.trim()))
            .copied()
            .ok_or_else(|| DataError::ParseError(format!("unknown keyword `{}`", s)))
    }
}

impl Display for Keyword {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The join word placed in front of a condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Link {
    #[default]
    And,
    Or,
}

impl Display for Link {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            Link::And => write!(f, "and"),
            Link::Or => write!(f, "or"),
        }
    }
}
