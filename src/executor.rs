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

use sorm_core::{Rows, SqlValue};

/// The one capability sorm needs from a database client: run a statement
/// with `?` placeholders and positional values.
///
/// Connections, pools and transaction handles all implement it, so every
/// mapper operation also runs inside a transaction.
pub trait Executor {
    fn query(&self, sql: &str, params: &[SqlValue]) -> anyhow::Result<Rows>;

    /// Returns the number of affected rows.
    fn execute(&self, sql: &str, params: &[SqlValue]) -> anyhow::Result<u64>;
}

impl<E: Executor + ?Sized> Executor for &E {
    fn query(&self, sql: &str, params: &[SqlValue]) -> anyhow::Result<Rows> {
        (**self).query(sql, params)
    }

    fn execute(&self, sql: &str, params: &[SqlValue]) -> anyhow::Result<u64> {
        (**self).execute(sql, params)
    }
}

impl<E: Executor + ?Sized> Executor for Box<E> {
    fn query(&self, sql: &str, params: &[SqlValue]) -> anyhow::Result<Rows> {
        (**self).query(sql, params)
    }

    fn execute(&self, sql: &str, params: &[SqlValue]) -> anyhow::Result<u64> {
        (**self).execute(sql, params)
    }
}

impl<E: Executor + ?Sized> Executor for std::sync::Arc<E> {
    fn query(&self, sql: &str, params: &[SqlValue]) -> anyhow::Result<Rows> {
        (**self).query(sql, params)
    }

    fn execute(&self, sql: &str, params: &[SqlValue]) -> anyhow::Result<u64> {
        (**self).execute(sql, params)
    }
}
