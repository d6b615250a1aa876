use proc_macro::TokenStream;
use proc_macro2::{Span, TokenStream as TokenStream2};
use quote::quote;
use syn::{spanned::Spanned, ItemStruct, LitStr};

use crate::schema_extraction::{
    collect_doc_comments, collect_field_docs, ensure_named_struct, infer_description,
    infer_schema_name, parse_completion_schema_args, CompletionSchemaArgs,
};

/// Longest `json_schema.name` accepted by chat-completion providers.
const MAX_SCHEMA_NAME_LEN: usize = 64;

pub fn completion_schema(attr: TokenStream, item: TokenStream) -> TokenStream {
    let expanded = parse_completion_schema_args(attr).and_then(|args| {
        let item_struct: ItemStruct = syn::parse(item)?;
        expand(&args, item_struct)
    });

    match expanded {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

fn expand(args: &CompletionSchemaArgs, item_struct: ItemStruct) -> syn::Result<TokenStream2> {
    let schema_name = infer_schema_name(&item_struct, args.name.as_ref());

    // Report every shape problem at once rather than one per compile.
    let mut errors: Option<syn::Error> = None;
    let checks = [
        ensure_named_struct(&item_struct),
        ensure_not_generic(&item_struct),
        validate_schema_name(&schema_name),
    ];
    for err in checks.into_iter().filter_map(Result::err) {
        match errors.as_mut() {
            Some(existing) => existing.combine(err),
            None => errors = Some(err),
        }
    }
    if let Some(err) = errors {
        return Err(err);
    }

    let description = match infer_description(
        args.description.as_ref(),
        collect_doc_comments(&item_struct.attrs),
    ) {
        Some(lit) => quote! { Some(#lit) },
        None => quote! { None },
    };
    let field_docs = field_doc_pairs(&item_struct);
    let type_name = LitStr::new(&item_struct.ident.to_string(), Span::call_site());
    let ident = &item_struct.ident;

    Ok(quote! {
        #item_struct

        const _: fn() = || {
            fn requires_json_schema<T: schemars::JsonSchema>() {}
            requires_json_schema::<#ident>();
        };

        impl itinerae::schema::CompletionSchema for #ident {
            fn schema() -> &'static itinerae::schema::SchemaHandle {
                static HANDLE: std::sync::OnceLock<itinerae::schema::SchemaHandle> =
                    std::sync::OnceLock::new();
                HANDLE.get_or_init(|| {
                    let mut root = schemars::schema_for!(Self);
                    itinerae::schema::apply_doc_comments(
                        &mut root,
                        #schema_name,
                        #description,
                        &[#(#field_docs),*],
                    );
                    itinerae::schema::SchemaHandle::from_root_schema(#schema_name, #type_name, root)
                })
            }
        }
    })
}

/// `(wire_name, doc)` tuples for every documented field.
fn field_doc_pairs(item: &ItemStruct) -> Vec<TokenStream2> {
    collect_field_docs(item)
        .iter()
        .map(|(field, doc)| {
            let field = LitStr::new(field, Span::call_site());
            let doc = LitStr::new(doc, Span::call_site());
            quote! { (#field, #doc) }
        })
        .collect()
}

fn ensure_not_generic(item: &ItemStruct) -> syn::Result<()> {
    if item.generics.params.is_empty() {
        Ok(())
    } else {
        Err(syn::Error::new(
            item.generics.span(),
            "`#[completion_schema]` does not support generic structs",
        ))
    }
}

/// The name travels as `response_format.json_schema.name`, which providers restrict to
/// ASCII letters, digits, `_` and `-`, at most 64 characters.
fn validate_schema_name(name: &LitStr) -> syn::Result<()> {
    let value = name.value();
    let allowed = |c: char| c.is_ascii_alphanumeric() || c == '_' || c == '-';

    if value.is_empty() || value.len() > MAX_SCHEMA_NAME_LEN || !value.chars().all(allowed) {
        return Err(syn::Error::new(
            name.span(),
            format!(
                "schema name `{value}` must be 1-{MAX_SCHEMA_NAME_LEN} characters of [A-Za-z0-9_-]"
            ),
        ));
    }
    Ok(())
}
