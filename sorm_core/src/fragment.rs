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

//! Renders a single `(column, keyword, value)` triple into a SQL snippet.
//!
//! ```ignore
//! let fragment = render("name", Keyword::Like, &"jo".into_value(), Link::And)?;
//! // Some(" and name like CONCAT('%', ?, '%') ")
//! ```

use crate::{DataError, Keyword, Link, SqlValue};
use std::fmt;
use std::fmt::{Display, Formatter};

/// A rendered condition and its bind values, not yet part of a statement.
#[derive(Debug, Clone, PartialEq)]
pub struct Fragment {
    link: Link,
    body: String,
    values: Vec<SqlValue>,
}

impl Fragment {
    pub fn new<S: Into<String>>(link: Link, body: S, values: Vec<SqlValue>) -> Self {
        Fragment { link, body: body.into(), values }
    }

    pub fn link(&self) -> Link {
        self.link
    }

    /// The condition without its join word.
    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn values(&self) -> &[SqlValue] {
        &self.values
    }

    pub fn with_link(mut self, link: Link) -> Self {
        self.link = link;
        self
    }

    pub fn into_parts(self) -> (Link, String, Vec<SqlValue>) {
        (self.link, self.body, self.values)
    }
}

impl Display for Fragment {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, " {} {} ", self.link, self.body)
    }
}

/// `n` comma separated `?` placeholders.
pub fn placeholders(n: usize) -> String {
    vec!["?"; n].join(",")
}

/// Renders one condition.
///
/// `Ok(None)` means there is nothing to filter on (blank value, empty list,
/// half open range). `Err` means the value has the wrong shape for the
/// operator.
pub fn render(column: &str, keyword: Keyword, value: &SqlValue, link: Link) -> Result<Option<Fragment>, DataError> {
    if value.is_blank() {
        return Ok(None);
    }
    match keyword {
        Keyword::In | Keyword::NotIn => render_list(column, keyword, value, link),
        Keyword::Between | Keyword::NotBetween => render_range(column, keyword, value, link),
        Keyword::Eq => render_scalar(column, keyword, value, link, format!("{} = ?", column)),
        Keyword::Ne => render_scalar(column, keyword, value, link, format!("{} <> ?", column)),
        Keyword::Gt => render_scalar(column, keyword, value, link, format!("{} > ?", column)),
        Keyword::Lt => render_scalar(column, keyword, value, link, format!("{} < ?", column)),
        Keyword::Ge => render_scalar(column, keyword, value, link, format!("{} >= ?", column)),
        Keyword::Le => render_scalar(column, keyword, value, link, format!("{} <= ?", column)),
        Keyword::Like => render_scalar(column, keyword, value, link, format!("{} like CONCAT('%', ?, '%')", column)),
        Keyword::NotLike => render_scalar(column, keyword, value, link, format!("{} not like CONCAT('%', ?, '%')", column)),
        Keyword::LikeLeft => render_scalar(column, keyword, value, link, format!("{} like CONCAT('%', ?)", column)),
        Keyword::LikeRight => render_scalar(column, keyword, value, link, format!("{} like CONCAT(?, '%')", column)),
    }
}

fn render_scalar(column: &str, keyword: Keyword, value: &SqlValue, link: Link, body: String) -> Result<Option<Fragment>, DataError> {
    if !value.is_scalar() {
        return Err(DataError::malformed(
            column,
            keyword,
            format!("expects a single value, found {}", value.type_name()),
        ));
    }
    Ok(Some(Fragment::new(link, body, vec![value.clone()])))
}

fn render_list(column: &str, keyword: Keyword, value: &SqlValue, link: Link) -> Result<Option<Fragment>, DataError> {
    let items = match value {
        SqlValue::List(items) => items.clone(),
        SqlValue::Between(_) => {
            return Err(DataError::malformed(column, keyword, "expects a list, found Between"));
        }
        scalar => vec![scalar.clone()],
    };
    if items.is_empty() {
        return Ok(None);
    }
    if let Some(nested) = items.iter().find(|v| !v.is_scalar()) {
        return Err(DataError::malformed(
            column,
            keyword,
            format!("list items must be single values, found {}", nested.type_name()),
        ));
    }
    let op = if keyword == Keyword::NotIn { "not in" } else { "in" };
    let body = format!("{} {} ({})", column, op, placeholders(items.len()));
    Ok(Some(Fragment::new(link, body, items)))
}

fn render_range(column: &str, keyword: Keyword, value: &SqlValue, link: Link) -> Result<Option<Fragment>, DataError> {
    let range = match value {
        SqlValue::Between(range) => range,
        other => {
            return Err(DataError::malformed(
                column,
                keyword,
                format!("expects a Between value, found {}", other.type_name()),
            ));
        }
    };
    if !range.is_complete() {
        return Ok(None);
    }
    if !range.left.is_scalar() || !range.right.is_scalar() {
        return Err(DataError::malformed(column, keyword, "range bounds must be single values"));
    }
    let op = if keyword == Keyword::NotBetween { "not between" } else { "between" };
    let body = format!("{} {} ? and ?", column, op);
    Ok(Some(Fragment::new(link, body, vec![range.left.clone(), range.right.clone()])))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Between, IntoSqlValue};

    fn text(v: &str) -> SqlValue {
        SqlValue::Text(v.to_string())
    }

    #[test]
    fn renders_every_scalar_shape() {
        let cases = [
            (Keyword::Eq, "a = ?"),
            (Keyword::Ne, "a <> ?"),
            (Keyword::Gt, "a > ?"),
            (Keyword::Lt, "a < ?"),
            (Keyword::Ge, "a >= ?"),
            (Keyword::Le, "a <= ?"),
            (Keyword::Like, "a like CONCAT('%', ?, '%')"),
            (Keyword::NotLike, "a not like CONCAT('%', ?, '%')"),
            (Keyword::LikeLeft, "a like CONCAT('%', ?)"),
            (Keyword::LikeRight, "a like CONCAT(?, '%')"),
        ];
        for (keyword, body) in cases {
            let fragment = render("a", keyword, &text("x"), Link::And).unwrap().unwrap();
            assert_eq!(fragment.body(), body);
            assert_eq!(fragment.values(), &[text("x")]);
        }
    }

    #[test]
    fn blank_values_are_omitted() {
        for keyword in Keyword::ALL {
            assert_eq!(render("a", keyword, &SqlValue::Null, Link::And).unwrap(), None);
            assert_eq!(render("a", keyword, &text(""), Link::Or).unwrap(), None);
        }
    }

    #[test]
    fn in_flattens_lists_and_wraps_scalars() {
        let fragment = render("id", Keyword::In, &vec![1, 2, 3].into_value(), Link::And).unwrap().unwrap();
        assert_eq!(fragment.to_string(), " and id in (?,?,?) ");
        assert_eq!(fragment.values(), &[SqlValue::Int(1), SqlValue::Int(2), SqlValue::Int(3)]);

        let fragment = render("id", Keyword::NotIn, &SqlValue::Int(7), Link::Or).unwrap().unwrap();
        assert_eq!(fragment.to_string(), " or id not in (?) ");

        let empty: Vec<i32> = vec![];
        assert_eq!(render("id", Keyword::In, &empty.into_value(), Link::And).unwrap(), None);
    }

    #[test]
    fn between_needs_both_bounds() {
        let full = Between::new(10, 20).into_value();
        let fragment = render("age", Keyword::Between, &full, Link::And).unwrap().unwrap();
        assert_eq!(fragment.body(), "age between ? and ?");
        assert_eq!(fragment.values(), &[SqlValue::Int(10), SqlValue::Int(20)]);

        let half = Between::new(SqlValue::Null, 20).into_value();
        assert_eq!(render("age", Keyword::NotBetween, &half, Link::And).unwrap(), None);
    }

    #[test]
    fn wrong_shapes_are_errors() {
        assert!(render("age", Keyword::Between, &SqlValue::Int(3), Link::And).is_err());
        assert!(render("age", Keyword::Eq, &vec![1].into_value(), Link::And).is_err());
        assert!(render("age", Keyword::In, &Between::new(1, 2).into_value(), Link::And).is_err());
    }

    #[test]
    fn placeholders_join_with_commas() {
        assert_eq!(placeholders(0), "");
        assert_eq!(placeholders(3), "?,?,?");
    }
}
