use proc_macro2::TokenStream;
use quote::quote;
use syn::{
    Data, DeriveInput, Error, Field, Fields, Generics, Type, Variant, WhereClause,
    punctuated::Punctuated, token::Comma,
};

pub fn where_clause_with_bounds(
    where_clause: Option<&WhereClause>,
    bounds: &[TokenStream],
) -> TokenStream {
    if bounds.is_empty() {
        return where_clause
            .as_ref()
            .map_or_else(|| quote!(), |wc| quote!(#wc));
    }

    if let Some(wc) = where_clause {
        let preds = &wc.predicates;
        quote!(where #preds, #(#bounds),*)
    } else {
        quote!(where #(#bounds),*)
    }
}

/// One `T: Trait` predicate per type parameter.
pub fn type_param_bounds(generics: &Generics, bound: &TokenStream) -> Vec<TokenStream> {
    generics
        .type_params()
        .map(|param| {
            let ident = &param.ident;
            quote!(#ident: #bound)
        })
        .collect()
}

pub fn is_key(field: &Field) -> bool {
    field.attrs.iter().any(|attr| attr.path().is_ident("key"))
}

pub fn named_fields<'a>(
    input: &'a DeriveInput,
    derive: &str,
) -> Result<&'a Punctuated<Field, Comma>, Error> {
    let message = format!("{derive} can only be derived for structs with named fields");

    match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(named) => Ok(&named.named),
            other => Err(Error::new_spanned(other, message)),
        },
        _ => Err(Error::new_spanned(&input.ident, message)),
    }
}

/// Payload types of a unit or tuple variant.
pub fn variant_types(variant: &Variant) -> Result<Vec<&Type>, Error> {
    match &variant.fields {
        Fields::Unit => Ok(Vec::new()),
        Fields::Unnamed(fields) => Ok(fields.unnamed.iter().map(|field| &field.ty).collect()),
        Fields::Named(_) => Err(Error::new_spanned(
            variant,
            "enum variants with named fields are not supported",
        )),
    }
}

/// Last path segment of a type, e.g. `Vec` for `std::vec::Vec<u8>`.
pub fn type_ident(ty: &Type) -> Option<String> {
    let Type::Path(path) = ty else {
        return None;
    };

    path.path
        .segments
        .last()
        .map(|segment| segment.ident.to_string())
}
