//! Derive support for tapi structured records.
//!
//! `#[derive(Record)]` describes a struct with named fields to tapi's schema
//! machinery. It implements `tapi::Reflect` and `tapi::Record`; serialization
//! itself is still derived with serde, and the serde field attributes that
//! change the wire shape (`rename`, `skip`, `default`) are mirrored here.

use proc_macro::TokenStream;
use quote::quote;
use syn::{
    meta::ParseNestedMeta, parse_macro_input, token, Data, DeriveInput, Expr, Fields, LitStr,
    Result as SynResult, Token,
};

struct FieldDef {
    wire_name: String,
    ty: syn::Type,
    has_default: bool,
}

#[derive(Default)]
struct SerdeFieldAttrs {
    rename: Option<String>,
    skip: bool,
    default: bool,
}

fn skip_meta(meta: ParseNestedMeta) -> SynResult<()> {
    if meta.input.peek(Token![=]) {
        meta.value()?.parse::<Expr>()?;
    } else if meta.input.peek(token::Paren) {
        meta.parse_nested_meta(skip_meta)?;
    }
    Ok(())
}

fn serde_field_attrs(attrs: &[syn::Attribute]) -> SynResult<SerdeFieldAttrs> {
    let mut out = SerdeFieldAttrs::default();
    for attr in attrs.iter().filter(|a| a.path().is_ident("serde")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("rename") && meta.input.peek(Token![=]) {
                let lit: LitStr = meta.value()?.parse()?;
                out.rename = Some(lit.value());
                Ok(())
            } else if meta.path.is_ident("skip") {
                out.skip = true;
                Ok(())
            } else if meta.path.is_ident("default") {
                out.default = true;
                skip_meta(meta)
            } else {
                skip_meta(meta)
            }
        })?;
    }
    Ok(out)
}

fn reject_rename_all(attrs: &[syn::Attribute]) -> SynResult<()> {
    for attr in attrs.iter().filter(|a| a.path().is_ident("serde")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("rename_all") {
                return Err(meta.error(
                    "tapi records do not follow serde(rename_all); rename fields individually",
                ));
            }
            skip_meta(meta)
        })?;
    }
    Ok(())
}

fn collect_fields(input: &DeriveInput) -> SynResult<Vec<FieldDef>> {
    let data = match &input.data {
        Data::Struct(data) => data,
        _ => {
            return Err(syn::Error::new_spanned(
                &input.ident,
                "Record can only be derived for structs with named fields",
            ))
        }
    };
    let named = match &data.fields {
        Fields::Named(named) => named,
        _ => {
            return Err(syn::Error::new_spanned(
                &input.ident,
                "Record can only be derived for structs with named fields",
            ))
        }
    };

    let mut fields = Vec::new();
    for field in &named.named {
        let attrs = serde_field_attrs(&field.attrs)?;
        if attrs.skip {
            continue;
        }
        let ident = match &field.ident {
            Some(ident) => ident,
            None => continue,
        };
        let raw = ident.to_string();
        let wire_name = attrs
            .rename
            .unwrap_or_else(|| raw.trim_start_matches("r#").to_string());
        fields.push(FieldDef {
            wire_name,
            ty: field.ty.clone(),
            has_default: attrs.default,
        });
    }
    Ok(fields)
}

#[proc_macro_derive(Record)]
pub fn derive_record(item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as DeriveInput);

    if !input.generics.params.is_empty() {
        return syn::Error::new_spanned(&input.generics, "generic records are not supported")
            .to_compile_error()
            .into();
    }
    if let Err(err) = reject_rename_all(&input.attrs) {
        return err.to_compile_error().into();
    }
    let fields = match collect_fields(&input) {
        Ok(fields) => fields,
        Err(err) => return err.to_compile_error().into(),
    };

    let ident = &input.ident;
    let field_exprs = fields.iter().map(|f| {
        let name = &f.wire_name;
        let ty = &f.ty;
        if f.has_default {
            quote! {
                ::tapi::FieldDescriptor::new(#name, <#ty as ::tapi::Reflect>::descriptor()).optional()
            }
        } else {
            quote! {
                ::tapi::FieldDescriptor::new(#name, <#ty as ::tapi::Reflect>::descriptor())
            }
        }
    });

    let expanded = quote! {
        impl ::tapi::Reflect for #ident {
            fn descriptor() -> ::tapi::TypeDescriptor {
                ::tapi::TypeDescriptor::Record(::tapi::RecordDescriptor::new(
                    ::std::concat!(::std::module_path!(), "::", ::std::stringify!(#ident)),
                    <#ident as ::tapi::Record>::fields,
                ))
            }
        }

        impl ::tapi::Record for #ident {
            fn fields() -> ::std::vec::Vec<::tapi::FieldDescriptor> {
                ::std::vec![#(#field_exprs),*]
            }
        }
    };
    TokenStream::from(expanded)
}
