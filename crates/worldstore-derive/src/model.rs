use crate::util::{is_key, named_fields, type_param_bounds, where_clause_with_bounds};
use proc_macro2::TokenStream;
use quote::quote;
use syn::{DeriveInput, Error};

// derive_model
pub fn derive_model(input: TokenStream) -> TokenStream {
    let input: DeriveInput = match syn::parse2(input) {
        Ok(input) => input,
        Err(err) => return err.to_compile_error(),
    };

    let fields = match named_fields(&input, "Model") {
        Ok(fields) => fields,
        Err(err) => return err.to_compile_error(),
    };

    let (keys, values): (Vec<_>, Vec<_>) = fields.iter().partition(|field| is_key(field));
    if keys.is_empty() {
        return Error::new_spanned(&input.ident, "Model must have at least one #[key] field")
            .to_compile_error();
    }
    if values.is_empty() {
        return Error::new_spanned(&input.ident, "Model must have at least one value field")
            .to_compile_error();
    }

    let key_idents: Vec<_> = keys.iter().filter_map(|field| field.ident.as_ref()).collect();
    let value_idents: Vec<_> = values.iter().filter_map(|field| field.ident.as_ref()).collect();

    // struct literal fields are evaluated in declaration order, which keeps
    // each reader consuming its felts in sequence
    let literal_fields = fields.iter().filter_map(|field| {
        let ident = field.ident.as_ref()?;
        let reader = if is_key(field) {
            quote!(key_reader)
        } else {
            quote!(value_reader)
        };

        Some(quote! {
            #ident: ::worldstore::serialize::FeltSerde::deserialize(&mut #reader)?
        })
    });

    let ident = &input.ident;
    let name = ident.to_string();
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();
    let bounds = type_param_bounds(
        &input.generics,
        &quote!(::worldstore::serialize::FeltSerde + ::worldstore::meta::Introspect),
    );
    let where_clause = where_clause_with_bounds(where_clause, &bounds);

    quote! {
        impl #impl_generics ::worldstore::model::Model for #ident #ty_generics #where_clause {
            const NAME: &'static str = #name;

            fn keys(&self) -> Vec<::worldstore::felt::Felt> {
                let mut out = Vec::new();
                #(::worldstore::serialize::FeltSerde::serialize(&self.#key_idents, &mut out);)*

                out
            }

            fn values(&self) -> Vec<::worldstore::felt::Felt> {
                let mut out = Vec::new();
                #(::worldstore::serialize::FeltSerde::serialize(&self.#value_idents, &mut out);)*

                out
            }

            fn from_parts(
                keys: &[::worldstore::felt::Felt],
                values: &[::worldstore::felt::Felt],
            ) -> Result<Self, ::worldstore::serialize::SerdeError> {
                let mut key_reader = ::worldstore::serialize::FeltReader::new(keys);
                let mut value_reader = ::worldstore::serialize::FeltReader::new(values);
                let model = Self {
                    #(#literal_fields),*
                };
                key_reader.finish()?;
                value_reader.finish()?;

                Ok(model)
            }
        }
    }
}
