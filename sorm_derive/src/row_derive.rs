
use crate::util::collect_field_info;
use proc_macro::TokenStream;
use quote::quote;

pub fn impl_from_row(input: TokenStream) -> TokenStream {
    let ast: syn::DeriveInput = match syn::parse(input) {
        Ok(ast) => ast,
        Err(err) => return err.to_compile_error().into(),
    };
    let struct_info = &ast.ident;
    let (impl_generics, ty_generics, where_clause) = ast.generics.split_for_impl();
    let fields = collect_field_info(&ast, "FromRow");

    let assigns = fields.iter().map(|info| {
        let ident = &info.ident;
        let ty = &info.field.ty;
        if !info.exist {
            quote!(#ident: <#ty as ::std::default::Default>::default(),)
        } else if info.flatten {
            quote!(#ident: <#ty as sorm::core::FromRow>::from_row(row)?,)
        } else {
            let column = &info.column;
            quote!(#ident: row.get_or_default::<#ty>(#column)?,)
        }
    });

    quote!(
        impl #impl_generics sorm::core::FromRow for #struct_info #ty_generics #where_clause {
            fn from_row(row: &sorm::core::Row) -> ::std::result::Result<Self, sorm::core::DataError> {
                Ok(#struct_info {
                    #(#assigns)*
                })
            }
        }
    ).into()
}
