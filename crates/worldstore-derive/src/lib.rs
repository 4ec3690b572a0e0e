use proc_macro::TokenStream;

mod felt_serde;
mod introspect;
mod model;
mod util;

/// Unpacked layout: struct fields and enum payloads each get their own slots.
#[proc_macro_derive(Introspect, attributes(key))]
pub fn derive_introspect(input: TokenStream) -> TokenStream {
    introspect::derive_introspect(input.into(), false).into()
}

/// Packed layout: every value field is merged into one `Fixed` bit layout.
#[proc_macro_derive(IntrospectPacked, attributes(key))]
pub fn derive_introspect_packed(input: TokenStream) -> TokenStream {
    introspect::derive_introspect(input.into(), true).into()
}

#[proc_macro_derive(FeltSerde)]
pub fn derive_felt_serde(input: TokenStream) -> TokenStream {
    felt_serde::derive_felt_serde(input.into()).into()
}

#[proc_macro_derive(Model, attributes(key))]
pub fn derive_model(input: TokenStream) -> TokenStream {
    model::derive_model(input.into()).into()
}
