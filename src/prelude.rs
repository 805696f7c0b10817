//!
//! Common Use.
//!
pub use crate::{
    Between, Conditions, Criteria, Executor, FillRegistry, FromRow, IPage, IntoSqlValue, OrderItem, PageInfo, Result,
    SelectBuilder, Sorm, SormConfig, SormError, SqlBuilder, SqlValue,
};
#[cfg(feature = "mysql-sync")]
pub use crate::{MysqlConnection, MysqlExecutor};
