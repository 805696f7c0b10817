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

use crate::errors::{Result, SormError};
use crate::page::{OrderItem, PageInfo};
use once_cell::sync::Lazy;
use regex::Regex;
use sorm_core::{DataError, FieldDescriptor, SelectBuilder, SqlValue, TableDescriptor};

mod mysql;

pub use mysql::MySqlBuilder;

static PLAIN_COLUMN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("column pattern is valid"));

fn write_value(field: &FieldDescriptor) -> Result<SqlValue> {
    if !field.value.is_scalar() {
        return Err(DataError::malformed(
            field.column.as_str(),
            "write",
            format!("cannot store a {} value", field.value.type_name()),
        ).into());
    }
    Ok(field.value.clone())
}

fn ensure_table(descriptor: &TableDescriptor) -> Result<()> {
    if descriptor.table_name.trim().is_empty() {
        return Err(SormError::MissingTable("table name is empty".to_string()));
    }
    Ok(())
}

pub trait SqlBuilder: Send + Sync {
    /// Rewrites `?` placeholders into the dialect's own form.
    fn process_placeholders(&self, sql: &str) -> String;

    /// `INSERT INTO t (a, b) VALUES (?, ?)`
    fn build_insert_sql(&self, descriptor: &TableDescriptor) -> Result<(String, Vec<SqlValue>)> {
        ensure_table(descriptor)?;
        if descriptor.is_empty() {
            return Err(SormError::EmptyData);
        }
        let mut columns = Vec::with_capacity(descriptor.fields.len());
        let mut params = Vec::with_capacity(descriptor.fields.len());
        for field in descriptor.fields.iter() {
            columns.push(field.column.as_str());
            params.push(write_value(field)?);
        }
        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({})",
            descriptor.table_name,
            columns.join(", "),
            vec!["?"; params.len()].join(", ")
        );
        Ok((self.process_placeholders(&sql), params))
    }

    /// `UPDATE t SET a = ?, b = ? WHERE 1=1 AND id = ?`
    ///
    /// Fields named in `conditions` move to the `WHERE` clause; SET values are
    /// bound before condition values.
    fn build_update_sql(&self, descriptor: &TableDescriptor, conditions: &[&str]) -> Result<(String, Vec<SqlValue>)> {
        ensure_table(descriptor)?;
        if conditions.is_empty() {
            return Err(SormError::MissingCondition(format!(
                "update of `{}` needs at least one condition column",
                descriptor.table_name
            )));
        }
        let mut where_parts = Vec::with_capacity(conditions.len());
        let mut where_params = Vec::with_capacity(conditions.len());
        for column in conditions.iter() {
            let field = descriptor.field(column).ok_or_else(|| {
                SormError::MissingCondition(format!("condition column `{}` has no value", column))
            })?;
            where_parts.push(format!("AND {} = ?", field.column));
            where_params.push(write_value(field)?);
        }
        let mut set_parts = Vec::new();
        let mut params = Vec::new();
        for field in descriptor.fields.iter().filter(|f| !conditions.contains(&f.column.as_str())) {
            set_parts.push(format!("{} = ?", field.column));
            params.push(write_value(field)?);
        }
        if set_parts.is_empty() {
            return Err(SormError::EmptyData);
        }
        params.extend(where_params);
        let sql = format!(
            "UPDATE {} SET {} WHERE 1=1 {}",
            descriptor.table_name,
            set_parts.join(", "),
            where_parts.join(" ")
        );
        Ok((self.process_placeholders(&sql), params))
    }

    /// `DELETE FROM t WHERE 1=1 AND a = ?`, every field is a condition.
    fn build_delete_sql(&self, descriptor: &TableDescriptor) -> Result<(String, Vec<SqlValue>)> {
        ensure_table(descriptor)?;
        if descriptor.is_empty() {
            return Err(SormError::MissingCondition(format!(
                "delete from `{}` needs at least one condition",
                descriptor.table_name
            )));
        }
        let mut sql = format!("DELETE FROM {} WHERE 1=1", descriptor.table_name);
        let mut params = Vec::with_capacity(descriptor.fields.len());
        for field in descriptor.fields.iter() {
            sql.push_str(&format!(" AND {} = ?", field.column));
            params.push(write_value(field)?);
        }
        Ok((self.process_placeholders(&sql), params))
    }

    /// `INSERT INTO t (a, b) VALUES (?, ?), (?, ?)`
    ///
    /// Every row must carry the same columns in the same order as the first.
    fn build_insert_batch_sql(&self, descriptors: &[TableDescriptor]) -> Result<(String, Vec<SqlValue>)> {
        let first = descriptors.first().ok_or(SormError::EmptyData)?;
        ensure_table(first)?;
        if first.is_empty() {
            return Err(SormError::EmptyData);
        }
        let columns = first.columns();
        let row = format!("({})", vec!["?"; columns.len()].join(", "));
        let mut rows = Vec::with_capacity(descriptors.len());
        let mut params = Vec::with_capacity(descriptors.len() * columns.len());
        for (index, descriptor) in descriptors.iter().enumerate() {
            if descriptor.columns() != columns {
                return Err(SormError::InvalidField(format!(
                    "row {} of the batch sets ({}), expected ({})",
                    index,
                    descriptor.columns().join(", "),
                    columns.join(", ")
                )));
            }
            for field in descriptor.fields.iter() {
                params.push(write_value(field)?);
            }
            rows.push(row.as_str());
        }
        let sql = format!(
            "INSERT INTO {} ({}) VALUES {}",
            first.table_name,
            columns.join(", "),
            rows.join(", ")
        );
        Ok((self.process_placeholders(&sql), params))
    }

    /// `DELETE FROM t WHERE id in (?, ?)`
    fn build_delete_by_ids_sql(&self, table_name: &str, primary_key: &str, ids: Vec<SqlValue>) -> Result<(String, Vec<SqlValue>)> {
        if table_name.trim().is_empty() {
            return Err(SormError::MissingTable("table name is empty".to_string()));
        }
        if ids.is_empty() {
            return Err(SormError::MissingCondition(format!(
                "delete from `{}` needs at least one id",
                table_name
            )));
        }
        let sql = format!(
            "DELETE FROM {} WHERE {} in ({})",
            table_name,
            primary_key,
            vec!["?"; ids.len()].join(", ")
        );
        Ok((self.process_placeholders(&sql), ids))
    }

    /// `SELECT <columns|*> FROM t WHERE 1=1 <conditions>`
    ///
    /// A field whose value does not fit its operator fails the build.
    fn build_select_sql(&self, descriptor: &TableDescriptor, columns: &[&str]) -> Result<(String, Vec<SqlValue>)> {
        ensure_table(descriptor)?;
        let base = format!("SELECT {} FROM {}", self.build_column_list(columns), descriptor.table_name);
        let (sql, params) = SelectBuilder::new(base).apply(descriptor).try_build()?;
        Ok((self.process_placeholders(&sql), params))
    }

    /// `SELECT count(*) FROM t WHERE 1=1 <conditions>`
    fn build_count_sql(&self, descriptor: &TableDescriptor) -> Result<(String, Vec<SqlValue>)> {
        ensure_table(descriptor)?;
        let base = format!("SELECT count(*) FROM {}", descriptor.table_name);
        let (sql, params) = SelectBuilder::new(base).apply(descriptor).try_build()?;
        Ok((self.process_placeholders(&sql), params))
    }

    /// Counts the rows of an arbitrary query.
    fn wrap_count_sql(&self, sql: &str) -> String {
        self.process_placeholders(&format!("SELECT count(*) FROM ({}) t", sql.trim()))
    }

    /// Wraps a query into one page of it; binds `[size, offset]` after the
    /// query's own values.
    fn build_page_sql(&self, sql: &str, page: &PageInfo) -> Result<(String, Vec<SqlValue>)> {
        let mut parts = vec![format!("SELECT * FROM ({}) t", sql.trim())];
        let order_by = self.build_order_by_clause(&page.orders)?;
        if !order_by.is_empty() {
            parts.push(format!("ORDER BY {}", order_by));
        }
        parts.push(self.build_pagination_clause());
        let out_of_range = || SormError::InvalidField(format!("page {} of size {} is out of range", page.current, page.size));
        let size = i64::try_from(page.size).map_err(|_| out_of_range())?;
        let offset = page
            .offset()
            .and_then(|offset| i64::try_from(offset).ok())
            .ok_or_else(out_of_range)?;
        let params = vec![SqlValue::Bigint(size), SqlValue::Bigint(offset)];
        Ok((self.process_placeholders(&parts.join(" ")), params))
    }

    /// Order columns are bare identifiers; the paged query only exposes the
    /// columns of the derived table `t`.
    fn build_order_by_clause(&self, orders: &[OrderItem]) -> Result<String> {
        let mut items = Vec::with_capacity(orders.len());
        for order in orders.iter() {
            let column = order.column.trim();
            if !PLAIN_COLUMN.is_match(column) {
                return Err(SormError::InvalidField(format!("invalid order column `{}`", order.column)));
            }
            items.push(format!("{} {}", column, if order.asc { "asc" } else { "desc" }));
        }
        Ok(items.join(", "))
    }

    /// Build paging clauses - default MySQL style
    fn build_pagination_clause(&self) -> String {
        "LIMIT ? OFFSET ?".to_string()
    }

    /// Building a list of fields
    fn build_column_list(&self, columns: &[&str]) -> String {
        let columns = columns
            .iter()
            .map(|c| c.trim())
            .filter(|c| !c.is_empty())
            .collect::<Vec<_>>();
        if columns.is_empty() {
            "*".to_string()
        } else {
            columns.join(", ")
        }
    }
}
