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
#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Mutex;

use anyhow::anyhow;
use chrono::{NaiveDate, NaiveDateTime};
use sorm::prelude::*;
use sorm::{Row, Rows};

#[derive(Criteria, FromRow, Clone, Default, Debug, PartialEq)]
#[table(name = "t_user")]
pub struct User {
    #[field(name = "user_id", primary_key)]
    pub uid: i64,
    pub id: Option<i64>,
    #[serde(rename = "nickName")]
    pub nick_name: String,
    pub status: Option<u8>,
    pub created_at: Option<NaiveDateTime>,
    pub updated_at: Option<NaiveDateTime>,
    #[field(exist = false)]
    pub cache: Vec<u8>,
}

/// Date bounds spliced into other query structs.
#[derive(Criteria, Default, Debug)]
pub struct Audit {
    #[field(keyword = "ge,created_at")]
    pub created_from: Option<NaiveDateTime>,
    #[field(keyword = "le", column = "created_at")]
    pub created_to: Option<NaiveDateTime>,
}

#[derive(Criteria, Default, Debug)]
#[table(name = "t_user")]
pub struct UserQuery {
    pub id: i64,
    #[field(keyword = "like")]
    pub name: String,
    #[field(keyword = "between")]
    pub age: Between,
    #[field(keyword = "in")]
    pub status: Vec<u8>,
    #[field(flatten)]
    pub audit: Audit,
}

#[derive(Criteria, Default, Debug)]
pub struct SysLoginLog {
    pub id: i64,
    pub account: String,
}

pub fn stamp() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 5, 1)
        .and_then(|d| d.and_hms_opt(8, 30, 0))
        .unwrap_or_default()
}

pub fn count_row(count: i64) -> Rows {
    vec![Row::new().with("count(*)", count)]
}

/// Records every statement and answers queries from a queue.
#[derive(Default)]
pub struct RecordingExecutor {
    statements: Mutex<Vec<(String, Vec<SqlValue>)>>,
    responses: Mutex<VecDeque<Rows>>,
    fail: bool,
}

impl RecordingExecutor {
    pub fn new() -> Self {
        RecordingExecutor::default()
    }

    /// Fails every statement with a driver error.
    pub fn failing() -> Self {
        RecordingExecutor { fail: true, ..Default::default() }
    }

    pub fn respond(self, rows: Rows) -> Self {
        if let Ok(mut responses) = self.responses.lock() {
            responses.push_back(rows);
        }
        self
    }

    pub fn statements(&self) -> Vec<(String, Vec<SqlValue>)> {
        self.statements.lock().map(|s| s.clone()).unwrap_or_default()
    }

    fn record(&self, sql: &str, params: &[SqlValue]) -> anyhow::Result<()> {
        self.statements
            .lock()
            .map_err(|_| anyhow!("poisoned"))?
            .push((sql.to_string(), params.to_vec()));
        if self.fail {
            return Err(anyhow!("connection refused"));
        }
        Ok(())
    }
}

impl Executor for RecordingExecutor {
    fn query(&self, sql: &str, params: &[SqlValue]) -> anyhow::Result<Rows> {
        self.record(sql, params)?;
        let mut responses = self.responses.lock().map_err(|_| anyhow!("poisoned"))?;
        Ok(responses.pop_front().unwrap_or_default())
    }

    fn execute(&self, sql: &str, params: &[SqlValue]) -> anyhow::Result<u64> {
        self.record(sql, params)?;
        Ok(1)
    }
}
