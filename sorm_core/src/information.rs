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

use crate::{DataError, FillRegistry, Keyword, SqlValue};
use dashmap::DashMap;
use once_cell::sync::Lazy;
use std::any::{type_name, TypeId};
use std::sync::Arc;
use tracing::{trace, warn};

/// Static description of one column of a query struct.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnMeta {
    pub field: String,
    pub column: String,
    pub keyword: Keyword,
    /// Column used on the left hand side of the condition.
    pub compare_column: String,
    pub primary_key: bool,
}

impl ColumnMeta {
    pub fn new(field: &str, column: &str) -> Self {
        ColumnMeta {
            field: field.to_string(),
            column: column.to_string(),
            keyword: Keyword::Eq,
            compare_column: column.to_string(),
            primary_key: false,
        }
    }

    /// Applies an `op[,altColumn]` keyword tag.
    pub fn keyword(mut self, tag: &str) -> Self {
        let (keyword, alt) = Keyword::parse_tag(tag);
        self.keyword = keyword;
        if let Some(alt) = alt {
            self.compare_column = alt;
        }
        self
    }

    pub fn compare_column(mut self, column: &str) -> Self {
        if !column.is_empty() {
            self.compare_column = column.to_string();
        }
        self
    }

    pub fn primary_key(mut self, primary_key: bool) -> Self {
        self.primary_key = primary_key;
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableMeta {
    pub table_name: String,
    pub columns: Vec<ColumnMeta>,
}

impl TableMeta {
    pub fn new<S: Into<String>>(table_name: S, columns: Vec<ColumnMeta>) -> Self {
        TableMeta { table_name: table_name.into(), columns }
    }

    /// An explicitly marked column wins over one named `id`; the last match wins.
    pub fn primary_key(&self) -> Option<&ColumnMeta> {
        self.columns
            .iter()
            .rev()
            .find(|c| c.primary_key)
            .or_else(|| self.columns.iter().rev().find(|c| c.column.eq_ignore_ascii_case("id")))
    }

    pub fn column(&self, column: &str) -> Option<&ColumnMeta> {
        self.columns.iter().find(|c| c.column == column)
    }
}

/// Implemented by query structs, normally through `#[derive(Criteria)]`.
pub trait Criteria: Sized + 'static {
    fn table_meta() -> TableMeta;

    /// One entry per column of [`Criteria::table_meta`], `None` while the
    /// field still holds its empty value.
    fn values(&self) -> Vec<Option<SqlValue>>;

    /// Writes a generated value back into the field mapped to `column`.
    /// Returns `false` when no field maps to it.
    fn fill_value(&mut self, column: &str, value: &SqlValue) -> Result<bool, DataError>;
}

static TABLE_METAS: Lazy<DashMap<TypeId, Arc<TableMeta>>> = Lazy::new(DashMap::new);

/// The cached metadata of a query struct, computed once per type.
pub fn table_meta<T: Criteria>() -> Arc<TableMeta> {
    let key = TypeId::of::<T>();
    if let Some(meta) = TABLE_METAS.get(&key) {
        return meta.clone();
    }
    trace!("caching table meta of {}", type_name::<T>());
    let meta = Arc::new(T::table_meta());
    TABLE_METAS.entry(key).or_insert(meta).clone()
}

/// What the extracted fields are used for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Mode {
    #[default]
    Read,
    Insert,
    Update,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldDescriptor {
    pub name: String,
    pub column: String,
    pub keyword: Keyword,
    pub compare_column: String,
    pub value: SqlValue,
}

impl FieldDescriptor {
    fn new(meta: &ColumnMeta, value: SqlValue) -> Self {
        FieldDescriptor {
            name: meta.field.clone(),
            column: meta.column.clone(),
            keyword: meta.keyword,
            compare_column: meta.compare_column.clone(),
            value,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableDescriptor {
    pub table_name: String,
    pub primary_key: Option<String>,
    pub fields: Vec<FieldDescriptor>,
}

impl TableDescriptor {
    pub fn field(&self, column: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.column == column)
    }

    pub fn columns(&self) -> Vec<&str> {
        self.fields.iter().map(|f| f.column.as_str()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

fn describe(meta: &TableMeta, fields: Vec<FieldDescriptor>) -> TableDescriptor {
    TableDescriptor {
        table_name: meta.table_name.clone(),
        primary_key: meta.primary_key().map(|c| c.column.clone()),
        fields,
    }
}

/// Extracts the non-empty fields of a query struct.
pub fn extract<T: Criteria>(object: &T) -> TableDescriptor {
    let meta = table_meta::<T>();
    let fields = meta
        .columns
        .iter()
        .zip(object.values())
        .filter_map(|(column, value)| value.map(|value| FieldDescriptor::new(column, value)))
        .collect();
    describe(&meta, fields)
}

/// Extracts fields for a write, filling empty ones from the registry.
///
/// A generated value is written back into `object` before it is recorded.
pub fn extract_with_fill<T: Criteria>(object: &mut T, mode: Mode, fills: &FillRegistry) -> Result<TableDescriptor, DataError> {
    let meta = table_meta::<T>();
    let values = object.values();
    let mut fields = Vec::with_capacity(values.len());
    for (column, value) in meta.columns.iter().zip(values) {
        let value = match value {
            Some(value) => value,
            None => match fills.fill(mode, &column.column) {
                Some(generated) => {
                    if !object.fill_value(&column.column, &generated)? {
                        warn!("fill value of `{}` has no field on {}", column.column, type_name::<T>());
                    }
                    generated
                }
                None => continue,
            },
        };
        fields.push(FieldDescriptor::new(column, value));
    }
    Ok(describe(&meta, fields))
}

/// `SysUser` becomes `sys_user`.
pub fn to_underscore(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    for (index, ch) in name.chars().enumerate() {
        if ch.is_uppercase() {
            if index != 0 {
                out.push('_');
            }
            out.extend(ch.to_lowercase());
        } else {
            out.push(ch);
        }
    }
    out
}
