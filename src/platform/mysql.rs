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
//! MySQL modules.
//!
use std::sync::RwLock;

use anyhow::anyhow;
use mysql::consts::ColumnType;
use mysql::prelude::Queryable;
use mysql::{Opts, Params as MysqlParams, Pool, PooledConn, Row as MysqlRow, Value as MysqlValue};
use sorm_core::{DataError, Row, Rows, SqlValue};

use crate::config::{Platform, SormConfig};
use crate::errors::{Result, SormError};
use crate::executor::Executor;

/// A blocking executor over a `mysql` connection pool; every statement
/// takes a connection from the pool.
#[derive(Clone)]
pub struct MysqlExecutor {
    pool: Pool,
}

impl MysqlExecutor {
    pub fn new(config: &SormConfig) -> Result<Self> {
        if config.platform() != &Platform::Mysql {
            return Err(SormError::Config(format!("unsupported platform: {:?}", config.platform())));
        }
        let url = config.url().ok_or_else(|| SormError::Config("missing database url".to_string()))?;
        let opts = Opts::from_url(url).map_err(|e| SormError::Config(e.to_string()))?;
        let pool = Pool::new(opts).map_err(|e| SormError::Config(e.to_string()))?;
        Ok(Self::from_pool(pool))
    }

    pub fn from_pool(pool: Pool) -> Self {
        MysqlExecutor { pool }
    }

    /// A dedicated connection, e.g. to run a transaction on.
    pub fn get_conn(&self) -> Result<MysqlConnection> {
        self.pool
            .get_conn()
            .map(MysqlConnection::new)
            .map_err(|e| SormError::Execute { sql: String::new(), source: e.into() })
    }
}

impl Executor for MysqlExecutor {
    fn query(&self, sql: &str, params: &[SqlValue]) -> anyhow::Result<Rows> {
        MysqlConnection::new(self.pool.get_conn()?).query(sql, params)
    }

    fn execute(&self, sql: &str, params: &[SqlValue]) -> anyhow::Result<u64> {
        MysqlConnection::new(self.pool.get_conn()?).execute(sql, params)
    }
}

/// One pooled connection. Statements run through `&MysqlConnection` between
/// [`MysqlConnection::start_transaction`] and commit or rollback share the
/// transaction.
pub struct MysqlConnection {
    conn: RwLock<PooledConn>,
}

impl MysqlConnection {
    pub fn new(conn: PooledConn) -> Self {
        Self { conn: RwLock::new(conn) }
    }

    /// Start the transaction
    pub fn start_transaction(&self) -> anyhow::Result<()> {
        self.query_drop("START TRANSACTION")
    }

    /// Submit transactions
    pub fn commit_transaction(&self) -> anyhow::Result<()> {
        self.query_drop("COMMIT")
    }

    /// Roll back transactions
    pub fn rollback_transaction(&self) -> anyhow::Result<()> {
        self.query_drop("ROLLBACK")
    }

    fn query_drop(&self, sql: &str) -> anyhow::Result<()> {
        let mut conn = self.conn.write().map_err(|_| anyhow!("Can't get the connection."))?;
        conn.query_drop(sql)?;
        Ok(())
    }

    /// Get the last inserted ID
    pub fn last_insert_id(&self) -> u64 {
        self.conn.read().map(|conn| conn.last_insert_id()).unwrap_or_default()
    }
}

impl Executor for MysqlConnection {
    fn query(&self, sql: &str, params: &[SqlValue]) -> anyhow::Result<Rows> {
        let mut conn = self.conn.write().map_err(|_| anyhow!("Can't get the connection."))?;
        let stmt = conn.prep(sql)?;
        let rows = conn.exec_map(&stmt, convert_to_mysql_params(params), convert_mysql_row)?;
        Ok(rows.into_iter().collect::<std::result::Result<Rows, DataError>>()?)
    }

    fn execute(&self, sql: &str, params: &[SqlValue]) -> anyhow::Result<u64> {
        let mut conn = self.conn.write().map_err(|_| anyhow!("Can't get the connection."))?;
        let stmt = conn.prep(sql)?;
        conn.exec_drop(&stmt, convert_to_mysql_params(params))?;
        Ok(conn.affected_rows())
    }
}

fn convert_to_mysql_params(params: &[SqlValue]) -> MysqlParams {
    if params.is_empty() {
        return MysqlParams::Empty;
    }
    MysqlParams::Positional(params.iter().map(convert_value_to_mysql).collect())
}

/// Converted Value To MySQL Value
fn convert_value_to_mysql(value: &SqlValue) -> MysqlValue {
    match value {
        SqlValue::Null => MysqlValue::NULL,
        SqlValue::Bool(b) => MysqlValue::from(*b),
        SqlValue::Tinyint(i) => MysqlValue::from(*i),
        SqlValue::Smallint(i) => MysqlValue::from(*i),
        SqlValue::Int(i) => MysqlValue::from(*i),
        SqlValue::Bigint(i) => MysqlValue::from(*i),
        SqlValue::Float(f) => MysqlValue::from(*f),
        SqlValue::Double(d) => MysqlValue::from(*d),
        SqlValue::Char(c) => MysqlValue::from(c.to_string()),
        SqlValue::Text(s) => MysqlValue::from(s.clone()),
        SqlValue::Json(j) => MysqlValue::from(j.to_string()),
        SqlValue::Uuid(uuid) => MysqlValue::from(uuid.to_string()),
        SqlValue::Date(date) => MysqlValue::from(*date),
        SqlValue::Time(time) => MysqlValue::from(*time),
        SqlValue::DateTime(dt) => MysqlValue::from(*dt),
        SqlValue::Timestamp(ts) => MysqlValue::from(ts.naive_utc()),
        // Expanded by the builder; stored as JSON if one slips through.
        SqlValue::List(_) | SqlValue::Between(_) => MysqlValue::from(value.to_json().to_string()),
    }
}

/// Converted MySQL Row To Row
fn convert_mysql_row(mysql_row: MysqlRow) -> std::result::Result<Row, DataError> {
    let columns: Vec<(String, ColumnType)> = mysql_row
        .columns_ref()
        .iter()
        .map(|col| (col.name_str().to_string(), col.column_type()))
        .collect();
    let values = mysql_row.unwrap();
    columns
        .into_iter()
        .zip(values)
        .map(|((name, column_type), value)| convert_mysql_value(value, column_type).map(|value| (name, value)))
        .collect()
}

/// Converted MySQL Value To Value
fn convert_mysql_value(mysql_value: MysqlValue, column_type: ColumnType) -> std::result::Result<SqlValue, DataError> {
    if mysql_value == MysqlValue::NULL {
        return Ok(SqlValue::Null);
    }

    match column_type {
        ColumnType::MYSQL_TYPE_TINY => try_convert::<i8>(mysql_value).map(SqlValue::Tinyint),
        ColumnType::MYSQL_TYPE_SHORT | ColumnType::MYSQL_TYPE_YEAR => try_convert::<i16>(mysql_value).map(SqlValue::Smallint),
        ColumnType::MYSQL_TYPE_LONG | ColumnType::MYSQL_TYPE_INT24 => try_convert::<i32>(mysql_value).map(SqlValue::Int),
        ColumnType::MYSQL_TYPE_LONGLONG => try_convert::<i64>(mysql_value).map(SqlValue::Bigint),
        ColumnType::MYSQL_TYPE_FLOAT => try_convert::<f32>(mysql_value).map(SqlValue::Float),
        ColumnType::MYSQL_TYPE_DOUBLE => try_convert::<f64>(mysql_value).map(SqlValue::Double),
        ColumnType::MYSQL_TYPE_TIMESTAMP => {
            let val: chrono::NaiveDateTime = try_convert(mysql_value)?;
            Ok(SqlValue::Timestamp(chrono::DateTime::from_naive_utc_and_offset(val, chrono::Utc)))
        }
        ColumnType::MYSQL_TYPE_DATE | ColumnType::MYSQL_TYPE_NEWDATE => try_convert(mysql_value).map(SqlValue::Date),
        ColumnType::MYSQL_TYPE_TIME => try_convert(mysql_value).map(SqlValue::Time),
        ColumnType::MYSQL_TYPE_DATETIME => try_convert(mysql_value).map(SqlValue::DateTime),
        ColumnType::MYSQL_TYPE_JSON => {
            let val: String = try_convert(mysql_value)?;
            Ok(SqlValue::Json(serde_json::from_str(&val)?))
        }
        ColumnType::MYSQL_TYPE_BIT => {
            let bytes: Vec<u8> = try_convert(mysql_value)?;
            match bytes.as_slice() {
                [bit] => Ok(SqlValue::Bool(*bit != 0)),
                _ => Ok(SqlValue::Text(String::from_utf8_lossy(&bytes).into_owned())),
            }
        }
        // Decimals and strings arrive as text.
        _ => try_generic_conversion(mysql_value),
    }
}

/// Generic type conversion
fn try_generic_conversion(mysql_value: MysqlValue) -> std::result::Result<SqlValue, DataError> {
    if let Ok(s) = String::try_from(mysql_value.clone()) {
        return Ok(SqlValue::Text(s));
    }
    if let Ok(i) = mysql::from_value_opt::<i64>(mysql_value.clone()) {
        return Ok(SqlValue::Bigint(i));
    }
    if let Ok(f) = mysql::from_value_opt::<f64>(mysql_value.clone()) {
        return Ok(SqlValue::Double(f));
    }
    match mysql::from_value_opt::<Vec<u8>>(mysql_value) {
        Ok(bytes) => Ok(SqlValue::Text(String::from_utf8_lossy(&bytes).into_owned())),
        Err(e) => Err(DataError::ParseError(e.to_string())),
    }
}

/// Type-safe conversion
fn try_convert<T>(value: MysqlValue) -> std::result::Result<T, DataError>
where
    T: mysql::prelude::FromValue,
{
    mysql::from_value_opt::<T>(value).map_err(|e| DataError::ParseError(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_bind_values() {
        assert_eq!(convert_value_to_mysql(&SqlValue::Null), MysqlValue::NULL);
        assert_eq!(convert_value_to_mysql(&SqlValue::Bigint(7)), MysqlValue::Int(7));
        assert_eq!(convert_value_to_mysql(&SqlValue::Text("jo".to_string())), MysqlValue::Bytes(b"jo".to_vec()));
        assert!(matches!(convert_to_mysql_params(&[]), MysqlParams::Empty));
    }

    #[test]
    fn converts_column_values() {
        assert_eq!(convert_mysql_value(MysqlValue::NULL, ColumnType::MYSQL_TYPE_LONG).unwrap(), SqlValue::Null);
        assert_eq!(convert_mysql_value(MysqlValue::Int(3), ColumnType::MYSQL_TYPE_LONGLONG).unwrap(), SqlValue::Bigint(3));
        assert_eq!(
            convert_mysql_value(MysqlValue::Bytes(b"12.50".to_vec()), ColumnType::MYSQL_TYPE_NEWDECIMAL).unwrap(),
            SqlValue::Text("12.50".to_string())
        );
        assert_eq!(convert_mysql_value(MysqlValue::Bytes(vec![1]), ColumnType::MYSQL_TYPE_BIT).unwrap(), SqlValue::Bool(true));
    }
}
