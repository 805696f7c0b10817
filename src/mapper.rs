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
//! Mapper operations over an [`Executor`].
//!
use std::sync::Arc;

use sorm_core::{extract, extract_with_fill, table_meta, Criteria, FillRegistry, FromRow, IntoSqlValue, Mode, Rows, SelectBuilder, SqlValue};
use tracing::{debug, error, info};

use crate::config::{LogLevel, SormConfig};
use crate::errors::{Result, SormError};
use crate::executor::Executor;
use crate::page::{IPage, PageInfo};
use crate::sql::{MySqlBuilder, SqlBuilder};

/// Runs statements built from query structs against an executor.
///
/// The executor may be a pool, a single connection or a transaction handle;
/// `Sorm<&Tx>` runs every operation inside that transaction.
#[derive(Clone)]
pub struct Sorm<E> {
    executor: E,
    fills: Arc<FillRegistry>,
    config: SormConfig,
    sql_builder: MySqlBuilder,
}

impl<E: Executor> Sorm<E> {
    pub fn new(executor: E) -> Self {
        Sorm {
            executor,
            fills: Arc::new(FillRegistry::empty()),
            config: SormConfig::default(),
            sql_builder: MySqlBuilder,
        }
    }

    pub fn with_fills<F: Into<Arc<FillRegistry>>>(mut self, fills: F) -> Self {
        self.fills = fills.into();
        self
    }

    pub fn with_config(mut self, config: SormConfig) -> Self {
        self.config = config;
        self
    }

    pub fn executor(&self) -> &E {
        &self.executor
    }

    pub fn fills(&self) -> &FillRegistry {
        &self.fills
    }

    pub fn config(&self) -> &SormConfig {
        &self.config
    }

    /// The same mapper over another executor, e.g. a transaction.
    pub fn with_executor<T: Executor>(&self, executor: T) -> Sorm<T> {
        Sorm {
            executor,
            fills: self.fills.clone(),
            config: self.config.clone(),
            sql_builder: self.sql_builder,
        }
    }

    fn log_statement(&self, sql: &str, params: &[SqlValue]) {
        if !self.config.show_sql() {
            debug!("[Sorm]: Prepare SQL: {} params: {:?}", sql, params);
            return;
        }
        match self.config.log_level() {
            LogLevel::Debug => debug!("[Sorm]: Prepare SQL: {} params: {:?}", sql, params),
            LogLevel::Info => info!("[Sorm]: Prepare SQL: {} params: {:?}", sql, params),
            LogLevel::Error => error!("[Sorm]: Prepare SQL: {} params: {:?}", sql, params),
        }
    }

    fn query(&self, sql: &str, params: &[SqlValue]) -> Result<Rows> {
        self.log_statement(sql, params);
        self.executor.query(sql, params).map_err(|source| {
            error!("[Sorm]: Failed SQL: {} cause: {:#}", sql, source);
            SormError::Execute { sql: sql.to_string(), source }
        })
    }

    fn execute(&self, sql: &str, params: &[SqlValue]) -> Result<u64> {
        self.log_statement(sql, params);
        self.executor.execute(sql, params).map_err(|source| {
            error!("[Sorm]: Failed SQL: {} cause: {:#}", sql, source);
            SormError::Execute { sql: sql.to_string(), source }
        })
    }

    fn decode<R: FromRow>(rows: &Rows) -> Result<Vec<R>> {
        rows.iter().map(|row| R::from_row(row).map_err(SormError::from)).collect()
    }

    /// Runs a raw select and decodes every row.
    pub fn select_sql<R: FromRow>(&self, sql: &str, values: &[SqlValue]) -> Result<Vec<R>> {
        let rows = self.query(sql, values)?;
        Self::decode(&rows)
    }

    /// Runs the statement of a builder, failing on any skipped condition.
    pub fn select_builder<R: FromRow>(&self, builder: &SelectBuilder) -> Result<Vec<R>> {
        let (sql, values) = builder.try_build()?;
        self.select_sql(&sql, &values)
    }

    /// Counts the rows of an arbitrary select.
    pub fn select_count(&self, sql: &str, values: &[SqlValue]) -> Result<u64> {
        let count_sql = self.sql_builder.wrap_count_sql(sql);
        self.read_count(&count_sql, values)
    }

    fn read_count(&self, sql: &str, values: &[SqlValue]) -> Result<u64> {
        let rows = self.query(sql, values)?;
        match rows.first() {
            Some(row) => Ok(u64::from_row(row)?),
            None => Ok(0),
        }
    }

    /// Counts the rows matching a query struct.
    pub fn get_count<Q: Criteria>(&self, query: &Q) -> Result<u64> {
        let (sql, values) = self.sql_builder.build_count_sql(&extract(query))?;
        self.read_count(&sql, &values)
    }

    pub fn exists<Q: Criteria>(&self, query: &Q) -> Result<bool> {
        self.get_count(query).map(|count| count > 0)
    }

    /// Selects the rows matching a query struct; an empty projection selects `*`.
    pub fn select_list<R: FromRow, Q: Criteria>(&self, query: &Q, columns: &[&str]) -> Result<Vec<R>> {
        let (sql, values) = self.sql_builder.build_select_sql(&extract(query), columns)?;
        self.select_sql(&sql, &values)
    }

    /// The first matching row, if any.
    pub fn select_one<R: FromRow, Q: Criteria>(&self, query: &Q, columns: &[&str]) -> Result<Option<R>> {
        let (sql, values) = self.sql_builder.build_select_sql(&extract(query), columns)?;
        let rows = self.query(&sql, &values)?;
        rows.first().map(R::from_row).transpose().map_err(SormError::from)
    }

    /// One page of an arbitrary select.
    ///
    /// The total is counted first; the page itself is only queried when the
    /// total is not zero.
    pub fn select_page<R: FromRow>(&self, page: &PageInfo, sql: &str, values: &[SqlValue]) -> Result<IPage<R>> {
        let mut page = page.clone();
        if let Some(max) = self.config.max_page_size() {
            if page.size == 0 || page.size > max {
                page.size = max;
            }
        }
        let current = page.current();
        let total = self.select_count(sql, values)?;
        if total == 0 {
            return Ok(IPage::empty(current, page.size));
        }
        let (page_sql, page_values) = self.sql_builder.build_page_sql(sql, &page)?;
        let mut params = values.to_vec();
        params.extend(page_values);
        let records = self.select_sql(&page_sql, &params)?;
        Ok(IPage::new(current, page.size, total, records))
    }

    /// One page of the rows matching a query struct.
    pub fn select_page_by<R: FromRow, Q: Criteria>(&self, page: &PageInfo, query: &Q, columns: &[&str]) -> Result<IPage<R>> {
        let (sql, values) = self.sql_builder.build_select_sql(&extract(query), columns)?;
        self.select_page(page, &sql, &values)
    }

    /// Inserts the non-empty fields of `entity`, running insert fills first.
    pub fn insert<T: Criteria>(&self, entity: &mut T) -> Result<u64> {
        let descriptor = extract_with_fill(entity, Mode::Insert, &self.fills)?;
        let (sql, values) = self.sql_builder.build_insert_sql(&descriptor)?;
        self.execute(&sql, &values)
    }

    /// Inserts every entity in one statement, running insert fills on each.
    ///
    /// All entities must end up with the same set of columns.
    pub fn insert_batch<T: Criteria>(&self, entities: &mut [T]) -> Result<u64> {
        if entities.is_empty() {
            return Err(SormError::EmptyData);
        }
        let descriptors = entities
            .iter_mut()
            .map(|entity| extract_with_fill(entity, Mode::Insert, &self.fills))
            .collect::<std::result::Result<Vec<_>, _>>()?;
        let (sql, values) = self.sql_builder.build_insert_batch_sql(&descriptors)?;
        self.execute(&sql, &values)
    }

    /// Updates the row addressed by the primary key of `entity`.
    pub fn update_by_id<T: Criteria>(&self, entity: &mut T) -> Result<u64> {
        let descriptor = extract_with_fill(entity, Mode::Update, &self.fills)?;
        let primary_key = descriptor
            .primary_key
            .clone()
            .ok_or_else(|| SormError::MissingIdent(format!("`{}` has no primary key", descriptor.table_name)))?;
        if descriptor.field(&primary_key).is_none() {
            return Err(SormError::MissingIdent(format!("primary key `{}` has no value", primary_key)));
        }
        let (sql, values) = self.sql_builder.build_update_sql(&descriptor, &[primary_key.as_str()])?;
        self.execute(&sql, &values)
    }

    /// Updates rows, using the named columns of `entity` as conditions.
    pub fn update<T: Criteria>(&self, entity: &mut T, conditions: &[&str]) -> Result<u64> {
        if conditions.is_empty() {
            return Err(SormError::MissingCondition(format!(
                "update of `{}` needs at least one condition column",
                table_meta::<T>().table_name
            )));
        }
        let descriptor = extract_with_fill(entity, Mode::Update, &self.fills)?;
        let (sql, values) = self.sql_builder.build_update_sql(&descriptor, conditions)?;
        self.execute(&sql, &values)
    }

    /// Deletes the rows matching every non-empty field of `query`.
    pub fn delete<Q: Criteria>(&self, query: &Q) -> Result<u64> {
        let (sql, values) = self.sql_builder.build_delete_sql(&extract(query))?;
        self.execute(&sql, &values)
    }

    /// Deletes the rows whose primary key is one of `ids`.
    pub fn delete_by_ids<T: Criteria, V: IntoSqlValue>(&self, ids: &[V]) -> Result<u64> {
        let meta = table_meta::<T>();
        let primary_key = meta
            .primary_key()
            .ok_or_else(|| SormError::MissingIdent(format!("`{}` has no primary key", meta.table_name)))?;
        let ids = ids.iter().map(IntoSqlValue::into_value).collect();
        let (sql, values) = self.sql_builder.build_delete_by_ids_sql(&meta.table_name, &primary_key.column, ids)?;
        self.execute(&sql, &values)
    }
}
