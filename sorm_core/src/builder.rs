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

//!
//! Fluent condition builder.
//! ```ignore
//!
//! let mut builder = SelectBuilder::new("select * from sys_user");
//! builder.eq("status", 1).like("name", "jo");
//! let mut group = builder.multiple();
//! group.eq("role", "admin").or().eq("role", "owner");
//! builder.ands(group);
//! let (sql, values) = builder.build();
//! // select * from sys_user WHERE 1=1 and status = ? and name like CONCAT('%', ?, '%') and (role = ? or role = ?)
//! ```
//!

use crate::{extract, render, Between, Criteria, DataError, Fragment, IntoSqlValue, Keyword, Link, SqlValue, TableDescriptor};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::warn;

static WHERE_CLAUSE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\bwhere\b").expect("where pattern is valid"));

/// Leaf condition calls shared by [`SelectBuilder`] and [`FragmentCollector`].
pub trait Conditions {
    /// Records one condition joined with the pending join word.
    fn condition(&mut self, column: &str, keyword: Keyword, value: SqlValue) -> &mut Self;

    /// Sets the join word for the next leaf call only.
    fn next_link(&mut self, link: Link) -> &mut Self;

    fn and(&mut self) -> &mut Self {
        self.next_link(Link::And)
    }

    fn or(&mut self) -> &mut Self {
        self.next_link(Link::Or)
    }

    fn eq<V: IntoSqlValue>(&mut self, column: &str, value: V) -> &mut Self {
        self.condition(column, Keyword::Eq, value.into_value())
    }

    fn ne<V: IntoSqlValue>(&mut self, column: &str, value: V) -> &mut Self {
        self.condition(column, Keyword::Ne, value.into_value())
    }

    fn gt<V: IntoSqlValue>(&mut self, column: &str, value: V) -> &mut Self {
        self.condition(column, Keyword::Gt, value.into_value())
    }

    fn lt<V: IntoSqlValue>(&mut self, column: &str, value: V) -> &mut Self {
        self.condition(column, Keyword::Lt, value.into_value())
    }

    fn ge<V: IntoSqlValue>(&mut self, column: &str, value: V) -> &mut Self {
        self.condition(column, Keyword::Ge, value.into_value())
    }

    fn le<V: IntoSqlValue>(&mut self, column: &str, value: V) -> &mut Self {
        self.condition(column, Keyword::Le, value.into_value())
    }

    /// `column in (?,...)`; a single value is treated as a one element list.
    fn in_list<V: IntoSqlValue>(&mut self, column: &str, values: V) -> &mut Self {
        self.condition(column, Keyword::In, values.into_value())
    }

    fn not_in<V: IntoSqlValue>(&mut self, column: &str, values: V) -> &mut Self {
        self.condition(column, Keyword::NotIn, values.into_value())
    }

    fn between<L: IntoSqlValue, R: IntoSqlValue>(&mut self, column: &str, left: L, right: R) -> &mut Self {
        self.condition(column, Keyword::Between, Between::new(left, right).into_value())
    }

    fn not_between<L: IntoSqlValue, R: IntoSqlValue>(&mut self, column: &str, left: L, right: R) -> &mut Self {
        self.condition(column, Keyword::NotBetween, Between::new(left, right).into_value())
    }

    fn like<V: IntoSqlValue>(&mut self, column: &str, value: V) -> &mut Self {
        self.condition(column, Keyword::Like, value.into_value())
    }

    fn not_like<V: IntoSqlValue>(&mut self, column: &str, value: V) -> &mut Self {
        self.condition(column, Keyword::NotLike, value.into_value())
    }

    fn like_left<V: IntoSqlValue>(&mut self, column: &str, value: V) -> &mut Self {
        self.condition(column, Keyword::LikeLeft, value.into_value())
    }

    fn like_right<V: IntoSqlValue>(&mut self, column: &str, value: V) -> &mut Self {
        self.condition(column, Keyword::LikeRight, value.into_value())
    }
}

fn render_or_record(column: &str, keyword: Keyword, value: &SqlValue, link: Link, errors: &mut Vec<DataError>) -> Option<Fragment> {
    match render(column, keyword, value, link) {
        Ok(fragment) => fragment,
        Err(err) => {
            warn!("skip condition: {}", err);
            errors.push(err);
            None
        }
    }
}

fn has_outer_where(sql: &str) -> bool {
    WHERE_CLAUSE.find_iter(sql).any(|m| is_top_level(&sql[..m.start()]))
}

// Whether the text after `prefix` sits outside any parenthesis or quote.
fn is_top_level(prefix: &str) -> bool {
    let mut depth = 0i32;
    let mut quote: Option<char> = None;
    for c in prefix.chars() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => {}
            None => match c {
                '\'' | '"' | '`' => quote = Some(c),
                '(' => depth += 1,
                ')' => depth -= 1,
                _ => {}
            },
        }
    }
    depth <= 0 && quote.is_none()
}

/// Builds the `WHERE` part of a select statement and collects bind values
/// in placeholder order.
#[derive(Debug, Clone, Default)]
pub struct SelectBuilder {
    sql: String,
    values: Vec<SqlValue>,
    link: Link,
    errors: Vec<DataError>,
}

impl SelectBuilder {
    /// Starts from a base statement, seeding `WHERE 1=1` when it has no `where`
    /// of its own. A `where` inside parentheses or quotes belongs to a
    /// subquery or a literal and does not count.
    pub fn new<S: Into<String>>(base: S) -> Self {
        let mut builder = SelectBuilder::default();
        let base = base.into();
        builder.push_sql(&base);
        if !has_outer_where(&base) {
            builder.push_sql("WHERE 1=1");
        }
        builder
    }

    /// Turns a query struct into a builder, one condition per non-empty field.
    ///
    /// The base statement defaults to `SELECT * FROM <table>`.
    pub fn from_query<Q: Criteria>(query: &Q, base: Option<&str>) -> Self {
        let descriptor = extract(query);
        let base = base
            .map(ToString::to_string)
            .unwrap_or_else(|| format!("SELECT * FROM {}", descriptor.table_name));
        let mut builder = SelectBuilder::new(base);
        builder.apply(&descriptor);
        builder
    }

    /// Adds a condition for every field of an extracted descriptor.
    pub fn apply(&mut self, descriptor: &TableDescriptor) -> &mut Self {
        for field in descriptor.fields.iter() {
            self.condition(&field.compare_column, field.keyword, field.value.clone());
        }
        self
    }

    /// Starts a group of conditions to be joined by [`SelectBuilder::ands`] or
    /// [`SelectBuilder::ors`].
    pub fn multiple(&self) -> FragmentCollector {
        FragmentCollector::default()
    }

    /// Appends `and (<group>)`.
    pub fn ands(&mut self, group: FragmentCollector) -> &mut Self {
        self.group(Link::And, group)
    }

    /// Appends `or (<group>)`.
    pub fn ors(&mut self, group: FragmentCollector) -> &mut Self {
        self.group(Link::Or, group)
    }

    fn group(&mut self, link: Link, group: FragmentCollector) -> &mut Self {
        let (fragments, errors) = group.into_parts();
        self.errors.extend(errors);
        self.link = Link::And;
        if fragments.is_empty() {
            return self;
        }
        let mut body = String::new();
        for (index, fragment) in fragments.into_iter().enumerate() {
            let (inner_link, text, values) = fragment.into_parts();
            // the first join word would dangle right after the parenthesis
            if index > 0 {
                body.push(' ');
                body.push_str(&inner_link.to_string());
                body.push(' ');
            }
            body.push_str(&text);
            self.values.extend(values);
        }
        self.push_sql(&format!("{} ({})", link, body));
        self
    }

    /// Appends raw SQL.
    pub fn append<S: AsRef<str>>(&mut self, sql: S) -> &mut Self {
        self.push_sql(sql.as_ref());
        self
    }

    /// Appends raw SQL along with the values for its placeholders.
    pub fn append_with<S: AsRef<str>, I: IntoIterator<Item = SqlValue>>(&mut self, sql: S, values: I) -> &mut Self {
        self.push_sql(sql.as_ref());
        self.values.extend(values);
        self
    }

    fn push_sql(&mut self, text: &str) {
        let text = text.trim();
        if text.is_empty() {
            return;
        }
        if !self.sql.is_empty() && !self.sql.ends_with(' ') {
            self.sql.push(' ');
        }
        self.sql.push_str(text);
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn values(&self) -> &[SqlValue] {
        &self.values
    }

    /// Conditions skipped because their value did not fit the operator.
    pub fn errors(&self) -> &[DataError] {
        &self.errors
    }

    pub fn build(&self) -> (String, Vec<SqlValue>) {
        (self.sql.clone(), self.values.clone())
    }

    /// Like [`SelectBuilder::build`], but fails if any condition was skipped
    /// for a malformed value.
    pub fn try_build(&self) -> Result<(String, Vec<SqlValue>), DataError> {
        match self.errors.first() {
            Some(err) => Err(err.clone()),
            None => Ok(self.build()),
        }
    }
}

impl Conditions for SelectBuilder {
    fn condition(&mut self, column: &str, keyword: Keyword, value: SqlValue) -> &mut Self {
        let link = std::mem::take(&mut self.link);
        if let Some(fragment) = render_or_record(column, keyword, &value, link, &mut self.errors) {
            let (link, body, values) = fragment.into_parts();
            self.push_sql(&format!("{} {}", link, body));
            self.values.extend(values);
        }
        self
    }

    fn next_link(&mut self, link: Link) -> &mut Self {
        self.link = link;
        self
    }
}

/// Collects fragments instead of appending them, for grouping in parentheses.
#[derive(Debug, Clone, Default)]
pub struct FragmentCollector {
    fragments: Vec<Fragment>,
    link: Link,
    errors: Vec<DataError>,
}

impl FragmentCollector {
    pub fn new() -> Self {
        FragmentCollector::default()
    }

    pub fn push(&mut self, fragment: Fragment) -> &mut Self {
        self.fragments.push(fragment);
        self
    }

    pub fn fragments(&self) -> &[Fragment] {
        &self.fragments
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    pub fn into_parts(self) -> (Vec<Fragment>, Vec<DataError>) {
        (self.fragments, self.errors)
    }
}

impl Conditions for FragmentCollector {
    fn condition(&mut self, column: &str, keyword: Keyword, value: SqlValue) -> &mut Self {
        let link = std::mem::take(&mut self.link);
        if let Some(fragment) = render_or_record(column, keyword, &value, link, &mut self.errors) {
            self.fragments.push(fragment);
        }
        self
    }

    fn next_link(&mut self, link: Link) -> &mut Self {
        self.link = link;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeds_where_when_missing() {
        assert_eq!(SelectBuilder::new("select * from t").sql(), "select * from t WHERE 1=1");
        assert_eq!(SelectBuilder::new("SELECT * FROM t Where a = 1").sql(), "SELECT * FROM t Where a = 1");
        assert_eq!(SelectBuilder::new("select somewhere_id from t").sql(), "select somewhere_id from t WHERE 1=1");
        assert_eq!(SelectBuilder::new("").sql(), "WHERE 1=1");
    }

    #[test]
    fn nested_where_does_not_count() {
        assert_eq!(
            SelectBuilder::new("select * from (select * from a where x = 1) t").sql(),
            "select * from (select * from a where x = 1) t WHERE 1=1"
        );
        assert_eq!(
            SelectBuilder::new("select * from t where note = 'where ('").sql(),
            "select * from t where note = 'where ('"
        );
        assert_eq!(
            SelectBuilder::new("select note from t_note where note <> 'x where y'").sql(),
            "select note from t_note where note <> 'x where y'"
        );
        assert_eq!(
            SelectBuilder::new("select * from t_note where body = ' where '").sql(),
            "select * from t_note where body = ' where '"
        );
        assert_eq!(
            SelectBuilder::new("select 'where' as w from t").sql(),
            "select 'where' as w from t WHERE 1=1"
        );
        assert_eq!(
            SelectBuilder::new("select * from (select id from a) t WHERE t.id > 1").sql(),
            "select * from (select id from a) t WHERE t.id > 1"
        );
    }

    #[test]
    fn eq_appends_one_placeholder() {
        let mut builder = SelectBuilder::new("select * from t");
        builder.eq("id", 5);
        let (sql, values) = builder.build();
        assert_eq!(sql, "select * from t WHERE 1=1 and id = ?");
        assert_eq!(values, vec![SqlValue::Int(5)]);
    }

    #[test]
    fn blank_values_leave_builder_untouched() {
        let mut builder = SelectBuilder::new("select * from t");
        let before = builder.build();
        builder
            .eq("a", "")
            .ne("a", SqlValue::Null)
            .like("a", Option::<String>::None)
            .in_list("a", Vec::<i32>::new())
            .between("a", SqlValue::Null, 3);
        assert_eq!(builder.build(), before);
        assert!(builder.errors().is_empty());
    }

    #[test]
    fn in_list_keeps_order() {
        let mut builder = SelectBuilder::new("select * from t");
        builder.in_list("id", vec![1, 2, 3]);
        let (sql, values) = builder.build();
        assert!(sql.ends_with("id in (?,?,?)"));
        assert_eq!(values, vec![SqlValue::Int(1), SqlValue::Int(2), SqlValue::Int(3)]);
    }

    #[test]
    fn build_is_repeatable() {
        let mut builder = SelectBuilder::new("select * from t");
        builder.eq("a", 1).between("b", 10, 20);
        assert_eq!(builder.build(), builder.build());
    }

    #[test]
    fn or_applies_to_next_call_only() {
        let mut builder = SelectBuilder::new("select * from t");
        builder.eq("a", 1).or().eq("b", 2).eq("c", 3);
        assert_eq!(builder.sql(), "select * from t WHERE 1=1 and a = ? or b = ? and c = ?");
    }

    #[test]
    fn groups_strip_leading_link() {
        let mut builder = SelectBuilder::new("select * from t");
        let mut group = builder.multiple();
        group.eq("a", 1).or().like("b", "x");
        builder.eq("c", 3).ors(group);
        let (sql, values) = builder.build();
        assert_eq!(sql, "select * from t WHERE 1=1 and c = ? or (a = ? or b like CONCAT('%', ?, '%'))");
        assert_eq!(values, vec![SqlValue::Int(3), SqlValue::Int(1), SqlValue::Text("x".to_string())]);
    }

    #[test]
    fn empty_group_appends_nothing_and_resets_link() {
        let mut builder = SelectBuilder::new("select * from t");
        builder.or();
        let group = builder.multiple();
        builder.ors(group);
        assert_eq!(builder.sql(), "select * from t WHERE 1=1");
        builder.eq("a", 1);
        assert_eq!(builder.sql(), "select * from t WHERE 1=1 and a = ?");
    }

    #[test]
    fn malformed_values_surface_through_try_build() {
        let mut builder = SelectBuilder::new("select * from t");
        builder.eq("a", vec![1, 2]).eq("b", 2);
        let (sql, _) = builder.build();
        assert_eq!(sql, "select * from t WHERE 1=1 and b = ?");
        assert!(matches!(builder.try_build(), Err(DataError::MalformedCondition { .. })));

        let mut group = FragmentCollector::new();
        group.between("c", 1, 2).in_list("d", Between::new(1, 2));
        let mut builder = SelectBuilder::new("select * from t");
        builder.ands(group);
        assert_eq!(builder.sql(), "select * from t WHERE 1=1 and (c between ? and ?)");
        assert_eq!(builder.errors().len(), 1);
    }

    #[test]
    fn append_with_adds_values() {
        let mut builder = SelectBuilder::new("select * from t");
        builder.append_with("and deleted = ?", vec![SqlValue::Bool(false)]).append("order by id");
        assert_eq!(builder.sql(), "select * from t WHERE 1=1 and deleted = ? order by id");
        assert_eq!(builder.values(), &[SqlValue::Bool(false)]);
    }
}
