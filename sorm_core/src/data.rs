
use crate::{DataError, FromSqlValue, IntoSqlValue, SqlValue};
use indexmap::IndexMap;
use serde::Serialize;

/// One result row, columns kept in select order.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(transparent)]
pub struct Row {
    columns: IndexMap<String, SqlValue>,
}

pub type Rows = Vec<Row>;

impl Row {
    pub fn new() -> Self {
        Row::default()
    }

    pub fn insert<K: Into<String>, V: IntoSqlValue>(&mut self, column: K, value: V) -> Option<SqlValue> {
        self.columns.insert(column.into(), value.into_value())
    }

    pub fn with<K: Into<String>, V: IntoSqlValue>(mut self, column: K, value: V) -> Self {
        self.insert(column, value);
        self
    }

    pub fn get(&self, column: &str) -> Option<&SqlValue> {
        self.columns.get(column)
    }

    /// Converts a column, failing when it is missing.
    pub fn get_as<T: FromSqlValue>(&self, column: &str) -> Result<T, DataError> {
        match self.columns.get(column) {
            Some(value) => T::from_value_opt(value),
            None => Err(DataError::UnknownColumn(column.to_string())),
        }
    }

    /// Converts a column, using the default for a missing or `NULL` column.
    pub fn get_or_default<T: FromSqlValue + Default>(&self, column: &str) -> Result<T, DataError> {
        match self.columns.get(column) {
            None | Some(SqlValue::Null) => Ok(T::default()),
            Some(value) => T::from_value_opt(value),
        }
    }

    pub fn first(&self) -> Option<&SqlValue> {
        self.columns.get_index(0).map(|(_, v)| v)
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn into_inner(self) -> IndexMap<String, SqlValue> {
        self.columns
    }
}

impl FromIterator<(String, SqlValue)> for Row {
    fn from_iter<I: IntoIterator<Item = (String, SqlValue)>>(iter: I) -> Self {
        Row { columns: iter.into_iter().collect() }
    }
}

/// Builds a value from a result row, normally through `#[derive(FromRow)]`.
pub trait FromRow: Sized {
    fn from_row(row: &Row) -> Result<Self, DataError>;
}

impl FromRow for Row {
    fn from_row(row: &Row) -> Result<Self, DataError> {
        Ok(row.clone())
    }
}

impl FromRow for IndexMap<String, SqlValue> {
    fn from_row(row: &Row) -> Result<Self, DataError> {
        Ok(row.columns.clone())
    }
}

// Scalars read the first column, as in `select count(*) ...`.
macro_rules! impl_from_row_scalar {
    ($($ty:ty),*) => {
        $(
            impl FromRow for $ty {
                fn from_row(row: &Row) -> Result<Self, DataError> {
                    let value = row.first().ok_or_else(|| DataError::UnknownColumn("<first>".to_string()))?;
                    <$ty as FromSqlValue>::from_value_opt(value)
                }
            }
        )*
    };
}

impl_from_row_scalar!(i8, i16, i32, i64, u8, u16, u32, u64, usize, f32, f64, bool, String, SqlValue);
