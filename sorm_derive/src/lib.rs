
//! Derive macros for sorm query structs.

extern crate proc_macro;

use proc_macro::TokenStream;
use proc_macro_error::proc_macro_error;

mod comm;
mod util;
mod criteria_derive;
mod row_derive;

/// Generate the column table and value accessors of a query struct.
/// ```ignore
/// /// Annotion Support: table (name), field (name, keyword, column, exist, primary_key, flatten)
/// #[derive(Debug, Default, Criteria)]
/// #[table(name = "sys_user")]
/// struct UserQuery {
///     id: Option<i64>,
///     #[field(keyword = "like")]
///     name: String,
///     #[field(keyword = "between")]
///     age: Between,
///     #[field(exist = false)]
///     cache: Vec<u8>,
/// }
/// ```
///
#[proc_macro_derive(Criteria, attributes(field, table, serde))]
#[proc_macro_error]
pub fn to_criteria(input: TokenStream) -> TokenStream {
    criteria_derive::impl_criteria(input)
}

/// Build the struct from a result row, matching columns by name.
#[proc_macro_derive(FromRow, attributes(field, table, serde))]
#[proc_macro_error]
pub fn from_row(input: TokenStream) -> TokenStream {
    row_derive::impl_from_row(input)
}
