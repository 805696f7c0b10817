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

use crate::{IntoSqlValue, Mode, SqlValue};
use indexmap::IndexMap;
use std::fmt;
use std::sync::Arc;

/// Produces a value for an empty column; `None` leaves the column out.
pub type FillFn = Arc<dyn Fn() -> Option<SqlValue> + Send + Sync>;

/// Fill functions keyed by column, one table per write mode.
///
/// Built once through [`FillRegistry::builder`] and read-only afterwards, so
/// it can be shared between threads behind an `Arc`.
#[derive(Clone, Default)]
pub struct FillRegistry {
    insert: IndexMap<String, FillFn>,
    update: IndexMap<String, FillFn>,
}

impl FillRegistry {
    pub fn builder() -> FillRegistryBuilder {
        FillRegistryBuilder::default()
    }

    pub fn empty() -> Self {
        FillRegistry::default()
    }

    fn table(&self, mode: Mode) -> Option<&IndexMap<String, FillFn>> {
        match mode {
            Mode::Read => None,
            Mode::Insert => Some(&self.insert),
            Mode::Update => Some(&self.update),
        }
    }

    pub fn contains(&self, mode: Mode, column: &str) -> bool {
        self.table(mode).map(|t| t.contains_key(column)).unwrap_or(false)
    }

    /// Runs the fill function registered for `column`, if any.
    pub fn fill(&self, mode: Mode, column: &str) -> Option<SqlValue> {
        let f = self.table(mode)?.get(column)?;
        f().filter(|v| !v.is_null())
    }
}

impl fmt::Debug for FillRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FillRegistry")
            .field("insert", &self.insert.keys().collect::<Vec<_>>())
            .field("update", &self.update.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[derive(Default)]
pub struct FillRegistryBuilder {
    registry: FillRegistry,
}

fn wrap<F, V>(f: F) -> FillFn
where
    F: Fn() -> Option<V> + Send + Sync + 'static,
    V: IntoSqlValue,
{
    Arc::new(move || f().map(|v| v.into_value()))
}

impl FillRegistryBuilder {
    pub fn on_insert<F, V>(mut self, column: &str, f: F) -> Self
    where
        F: Fn() -> Option<V> + Send + Sync + 'static,
        V: IntoSqlValue,
    {
        self.registry.insert.insert(column.to_string(), wrap(f));
        self
    }

    pub fn on_update<F, V>(mut self, column: &str, f: F) -> Self
    where
        F: Fn() -> Option<V> + Send + Sync + 'static,
        V: IntoSqlValue,
    {
        self.registry.update.insert(column.to_string(), wrap(f));
        self
    }

    /// Registers the same function for inserts and updates.
    pub fn on_write<F, V>(mut self, column: &str, f: F) -> Self
    where
        F: Fn() -> Option<V> + Send + Sync + 'static,
        V: IntoSqlValue,
    {
        let f = wrap(f);
        self.registry.insert.insert(column.to_string(), f.clone());
        self.registry.update.insert(column.to_string(), f);
        self
    }

    pub fn build(self) -> FillRegistry {
        self.registry
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_mode_never_fills() {
        let registry = FillRegistry::builder().on_write("updated_by", || Some("admin")).build();
        assert_eq!(registry.fill(Mode::Read, "updated_by"), None);
        assert_eq!(registry.fill(Mode::Insert, "updated_by"), Some(SqlValue::Text("admin".to_string())));
        assert!(registry.contains(Mode::Update, "updated_by"));
        assert!(!registry.contains(Mode::Update, "created_by"));
    }

    #[test]
    fn null_results_count_as_absent() {
        let registry = FillRegistry::builder().on_insert("a", || Some(SqlValue::Null)).build();
        assert_eq!(registry.fill(Mode::Insert, "a"), None);
    }
}
