
use crate::comm::StructExtra;
use crate::util::{collect_field_info, find_struct_annotations, to_underscore};
use proc_macro::TokenStream;
use quote::quote;

pub fn impl_criteria(input: TokenStream) -> TokenStream {
    let ast: syn::DeriveInput = match syn::parse(input) {
        Ok(ast) => ast,
        Err(err) => return err.to_compile_error().into(),
    };
    let struct_info = &ast.ident;
    let (impl_generics, ty_generics, where_clause) = ast.generics.split_for_impl();
    let table_name = find_struct_annotations(&ast.attrs)
        .into_iter()
        .map(|extra| match extra {
            StructExtra::Table(name) => name,
        })
        .last()
        .unwrap_or_else(|| to_underscore(&struct_info.to_string()));
    let fields = collect_field_info(&ast, "Criteria");
    let fields = fields.iter().filter(|f| f.exist).collect::<Vec<_>>();

    let columns = fields.iter().map(|info| {
        let ty = &info.field.ty;
        if info.flatten {
            return quote!(columns.extend(<#ty as sorm::core::Criteria>::table_meta().columns););
        }
        let field_name = info.ident.to_string();
        let column = &info.column;
        let keyword = &info.keyword;
        let compare_column = &info.compare_column;
        let primary_key = info.primary_key;
        quote!(
            columns.push(
                sorm::core::ColumnMeta::new(#field_name, #column)
                    .keyword(#keyword)
                    .compare_column(#compare_column)
                    .primary_key(#primary_key)
            );
        )
    });

    let values = fields.iter().map(|info| {
        let ident = &info.ident;
        if info.flatten {
            return quote!(values.extend(sorm::core::Criteria::values(&self.#ident)););
        }
        quote!(
            values.push(if sorm::core::ZeroValue::is_zero_value(&self.#ident) {
                None
            } else {
                Some(sorm::core::IntoSqlValue::into_value(&self.#ident))
            });
        )
    });

    let fills = fields.iter().map(|info| {
        let ident = &info.ident;
        if info.flatten {
            return quote!(
                if sorm::core::Criteria::fill_value(&mut self.#ident, column, value)? {
                    return Ok(true);
                }
            );
        }
        let column = &info.column;
        quote!(
            if column == #column {
                self.#ident = sorm::core::FromSqlValue::from_value_opt(value)?;
                return Ok(true);
            }
        )
    });

    quote!(
        impl #impl_generics sorm::core::Criteria for #struct_info #ty_generics #where_clause {
            #[allow(unused_mut)]
            fn table_meta() -> sorm::core::TableMeta {
                let mut columns = Vec::new();
                #(#columns)*
                sorm::core::TableMeta::new(#table_name, columns)
            }

            #[allow(unused_mut)]
            fn values(&self) -> Vec<Option<sorm::core::SqlValue>> {
                let mut values = Vec::new();
                #(#values)*
                values
            }

            #[allow(unused_variables)]
            fn fill_value(&mut self, column: &str, value: &sorm::core::SqlValue) -> ::std::result::Result<bool, sorm::core::DataError> {
                #(#fills)*
                Ok(false)
            }
        }
    ).into()
}
