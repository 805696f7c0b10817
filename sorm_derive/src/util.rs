
use crate::comm::{FieldExtra, FieldInformation, StructExtra};
use proc_macro_error::abort;
use quote::ToTokens;
use syn::{self, parse_quote, spanned::Spanned};

pub fn lit_to_string(lit: &syn::Lit) -> Option<String> {
    match *lit {
        syn::Lit::Str(ref s) => Some(s.value()),
        _ => None,
    }
}

pub fn lit_to_bool(lit: &syn::Lit) -> Option<bool> {
    match *lit {
        syn::Lit::Bool(ref s) => Some(s.value),
        syn::Lit::Str(ref s) => s.value().parse::<bool>().ok(),
        _ => None,
    }
}

/// `SysUser` becomes `sys_user`, `userId` becomes `user_id`.
pub fn to_underscore(name: &str) -> String {
    let name = name.trim_start_matches("r#");
    let mut new_name = String::with_capacity(name.len() + 4);
    for (index, x) in name.chars().enumerate() {
        if x.is_uppercase() {
            if index != 0 {
                new_name.push('_');
            }
            new_name.extend(x.to_lowercase());
        } else {
            new_name.push(x);
        }
    }
    new_name
}

pub fn find_struct_annotations(struct_attrs: &[syn::Attribute]) -> Vec<StructExtra> {
    let mut annotations = Vec::new();
    for attr in struct_attrs {
        if attr.path != parse_quote!(table) {
            continue;
        }
        match attr.parse_meta() {
            Ok(syn::Meta::List(list)) => {
                for nested in list.nested.iter() {
                    match nested {
                        syn::NestedMeta::Meta(syn::Meta::NameValue(nv)) if nv.path.is_ident("name") => {
                            match lit_to_string(&nv.lit) {
                                Some(name) => annotations.push(StructExtra::Table(name)),
                                None => abort!(nv.lit.span(), "invalid argument for `name` annotion: only strings are allowed"),
                            }
                        }
                        syn::NestedMeta::Lit(lit) => match lit_to_string(lit) {
                            Some(name) => annotations.push(StructExtra::Table(name)),
                            None => abort!(lit.span(), "table name must be a string"),
                        },
                        other => abort!(other.span(), "expected `name = \"...\"`"),
                    }
                }
            }
            Ok(syn::Meta::NameValue(nv)) => match lit_to_string(&nv.lit) {
                Some(name) => annotations.push(StructExtra::Table(name)),
                None => abort!(nv.lit.span(), "table name must be a string"),
            },
            Ok(other) => abort!(other.span(), "expected #[table(name = \"...\")]"),
            Err(err) => abort!(attr.span(), "unable to parse #[table]: {}", err),
        }
    }
    annotations
}

pub fn collect_fields(ast: &syn::DeriveInput, derive: &str) -> Vec<syn::Field> {
    match ast.data {
        syn::Data::Struct(syn::DataStruct { ref fields, .. }) => {
            if fields.iter().any(|field| field.ident.is_none()) {
                abort!(
                    fields.span(),
                    "struct has unnamed fields";
                    help = "#[derive({})] can only be used on structs with named fields", derive;
                );
            }
            fields.iter().cloned().collect::<Vec<_>>()
        }
        _ => abort!(ast.span(), "#[derive({})] can only be used with structs", derive),
    }
}

/// Find everything we need to know about a field
pub fn find_extra_for_field(field: &syn::Field) -> Vec<FieldExtra> {
    let field_ident = field.ident.as_ref().map(ToString::to_string).unwrap_or_default();
    let mut extras = vec![];

    for attr in &field.attrs {
        if attr.path == parse_quote!(serde) {
            extras.extend(find_serde_rename(attr));
            continue;
        }
        if attr.path != parse_quote!(field) {
            continue;
        }
        let nested = match attr.parse_meta() {
            Ok(syn::Meta::List(syn::MetaList { nested, .. })) => nested,
            Ok(syn::Meta::NameValue(nv)) => {
                // #[field = "column"]
                match lit_to_string(&nv.lit) {
                    Some(s) => extras.push(FieldExtra::Name(s)),
                    None => abort!(nv.lit.span(), "Invalid attribute #[field] on field `{}`: only strings are allowed", field_ident),
                }
                continue;
            }
            Ok(other) => abort!(other.span(), "Invalid attribute #[field] on field `{}`", field_ident),
            Err(err) => abort!(attr.span(), "Unable to parse #[field] on field `{}`: {}", field_ident, err),
        };
        for meta_item in nested.iter() {
            match meta_item {
                syn::NestedMeta::Meta(syn::Meta::Path(path)) => {
                    match path.get_ident().map(ToString::to_string).unwrap_or_default().as_ref() {
                        "primary_key" => extras.push(FieldExtra::PrimaryKey),
                        "flatten" => extras.push(FieldExtra::Flatten),
                        "skip" => extras.push(FieldExtra::Exist(false)),
                        _ => {
                            let mut ident = proc_macro2::TokenStream::new();
                            path.to_tokens(&mut ident);
                            abort!(path.span(), "Unexpected annotion: {}", ident)
                        }
                    }
                }
                syn::NestedMeta::Meta(syn::Meta::NameValue(syn::MetaNameValue { path, lit, .. })) => {
                    let ident = path.get_ident().map(ToString::to_string).unwrap_or_default();
                    match ident.as_ref() {
                        "name" => match lit_to_string(lit) {
                            Some(s) => extras.push(FieldExtra::Name(s)),
                            None => abort!(lit.span(), "invalid argument for `name` annotion: only strings are allowed"),
                        },
                        "keyword" => match lit_to_string(lit) {
                            Some(s) => extras.push(FieldExtra::Keyword(s)),
                            None => abort!(lit.span(), "invalid argument for `keyword` annotion: only strings are allowed"),
                        },
                        "column" => match lit_to_string(lit) {
                            Some(s) if s.trim() == "-" => extras.push(FieldExtra::Exist(false)),
                            Some(s) => extras.push(FieldExtra::Column(s)),
                            None => abort!(lit.span(), "invalid argument for `column` annotion: only strings are allowed"),
                        },
                        "exist" => match lit_to_bool(lit) {
                            Some(b) => extras.push(FieldExtra::Exist(b)),
                            None => abort!(lit.span(), "invalid argument for `exist` annotion: only boolean are allowed"),
                        },
                        v => abort!(
                            path.span(),
                            "unknown argument `{}` for #[field] (it only has `name`, `keyword`, `column`, `exist`, `primary_key`, `flatten`)",
                            v
                        ),
                    }
                }
                other => abort!(other.span(), "Invalid attribute #[field] on field `{}`", field_ident),
            }
        }
    }
    extras
}

/// `#[serde(rename = "...")]`; other serde options are ignored.
fn find_serde_rename(attr: &syn::Attribute) -> Option<FieldExtra> {
    match attr.parse_meta() {
        Ok(syn::Meta::List(list)) => list.nested.iter().find_map(|nested| match nested {
            syn::NestedMeta::Meta(syn::Meta::NameValue(nv)) if nv.path.is_ident("rename") => {
                lit_to_string(&nv.lit).map(FieldExtra::Rename)
            }
            _ => None,
        }),
        _ => None,
    }
}

/// Resolves column, keyword and flags for every field of the struct.
///
/// The column comes from `#[field(name)]`, then `#[serde(rename)]`, then the
/// underscore form of the field name.
pub fn collect_field_info(ast: &syn::DeriveInput, derive: &str) -> Vec<FieldInformation> {
    collect_fields(ast, derive)
        .into_iter()
        .map(|field| {
            let ident = match field.ident.clone() {
                Some(ident) => ident,
                None => abort!(field.span(), "struct has unnamed fields"),
            };
            let extras = find_extra_for_field(&field);
            let mut db_name = None;
            let mut rename = None;
            let mut keyword = String::new();
            let mut alt_column = None;
            let mut primary_key = false;
            let mut exist = true;
            let mut flatten = false;
            for extra in extras.into_iter() {
                match extra {
                    FieldExtra::Name(v) => {
                        let mut parts = v.split(',').map(str::trim);
                        db_name = parts.next().filter(|s| !s.is_empty()).map(ToString::to_string);
                        if parts.any(|p| p == "primary_key") {
                            primary_key = true;
                        }
                    }
                    FieldExtra::Rename(v) => rename = Some(v),
                    FieldExtra::Keyword(v) => keyword = v,
                    FieldExtra::Column(v) => alt_column = Some(v),
                    FieldExtra::PrimaryKey => primary_key = true,
                    FieldExtra::Exist(v) => exist = v,
                    FieldExtra::Flatten => flatten = true,
                }
            }
            if db_name.as_deref() == Some("-") {
                exist = false;
            }
            let column = db_name
                .or(rename)
                .unwrap_or_else(|| to_underscore(&ident.to_string()));
            let compare_column = alt_column.unwrap_or_default();
            FieldInformation {
                field,
                ident,
                column,
                keyword,
                compare_column,
                primary_key,
                exist,
                flatten,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn underscore_follows_upper_case_letters() {
        assert_eq!(to_underscore("SysUser"), "sys_user");
        assert_eq!(to_underscore("createdAt"), "created_at");
        assert_eq!(to_underscore("r#type"), "type");
        assert_eq!(to_underscore("user_name"), "user_name");
    }
}
