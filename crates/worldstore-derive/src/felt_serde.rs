use crate::util::{type_param_bounds, variant_types, where_clause_with_bounds};
use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::{Data, DataEnum, DataStruct, DeriveInput, Error, Fields, Index};

// derive_felt_serde
pub fn derive_felt_serde(input: TokenStream) -> TokenStream {
    let input: DeriveInput = match syn::parse2(input) {
        Ok(input) => input,
        Err(err) => return err.to_compile_error(),
    };

    let body = match &input.data {
        Data::Struct(data) => Ok(struct_body(data)),
        Data::Enum(data) => enum_body(data, &input),
        Data::Union(_) => Err(Error::new_spanned(
            &input.ident,
            "FeltSerde cannot be derived for unions",
        )),
    };
    let body = match body {
        Ok(body) => body,
        Err(err) => return err.to_compile_error(),
    };

    let ident = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();
    let bounds = type_param_bounds(
        &input.generics,
        &quote!(::worldstore::serialize::FeltSerde),
    );
    let where_clause = where_clause_with_bounds(where_clause, &bounds);

    quote! {
        impl #impl_generics ::worldstore::serialize::FeltSerde for #ident #ty_generics #where_clause {
            #body
        }
    }
}

// Fields in declaration order, no framing.
fn struct_body(data: &DataStruct) -> TokenStream {
    let (serialize, deserialize) = match &data.fields {
        Fields::Named(named) => {
            let idents: Vec<_> = named.named.iter().filter_map(|f| f.ident.as_ref()).collect();

            (
                quote!(#(::worldstore::serialize::FeltSerde::serialize(&self.#idents, out);)*),
                quote! {
                    Ok(Self {
                        #(#idents: ::worldstore::serialize::FeltSerde::deserialize(reader)?,)*
                    })
                },
            )
        }
        Fields::Unnamed(unnamed) => {
            let indexes: Vec<Index> = (0..unnamed.unnamed.len()).map(Index::from).collect();
            let reads = indexes
                .iter()
                .map(|_| quote!(::worldstore::serialize::FeltSerde::deserialize(reader)?));

            (
                quote!(#(::worldstore::serialize::FeltSerde::serialize(&self.#indexes, out);)*),
                quote!(Ok(Self(#(#reads),*))),
            )
        }
        Fields::Unit => (quote!(), quote!(Ok(Self))),
    };

    quote! {
        #[allow(unused_variables)]
        fn serialize(&self, out: &mut Vec<::worldstore::felt::Felt>) {
            #serialize
        }

        #[allow(unused_variables)]
        fn deserialize(
            reader: &mut ::worldstore::serialize::FeltReader<'_>,
        ) -> Result<Self, ::worldstore::serialize::SerdeError> {
            #deserialize
        }
    }
}

// Variant index first, then the payload.
fn enum_body(data: &DataEnum, input: &DeriveInput) -> Result<TokenStream, Error> {
    if data.variants.is_empty() {
        return Err(Error::new_spanned(
            &input.ident,
            "FeltSerde needs at least one enum variant",
        ));
    }

    let name = input.ident.to_string();
    let mut serialize_arms = Vec::new();
    let mut deserialize_arms = Vec::new();

    for (index, variant) in data.variants.iter().enumerate() {
        let variant_ident = &variant.ident;
        let types = variant_types(variant)?;
        let selector = index as u64;
        let discriminant = index as u128;

        if types.is_empty() {
            serialize_arms.push(quote! {
                Self::#variant_ident => out.push(::worldstore::felt::Felt::from(#selector)),
            });
            deserialize_arms.push(quote! {
                Some(#discriminant) => Ok(Self::#variant_ident),
            });
            continue;
        }

        let bindings: Vec<_> = (0..types.len())
            .map(|i| format_ident!("field_{i}"))
            .collect();
        let reads = bindings
            .iter()
            .map(|_| quote!(::worldstore::serialize::FeltSerde::deserialize(reader)?));

        serialize_arms.push(quote! {
            Self::#variant_ident(#(#bindings),*) => {
                out.push(::worldstore::felt::Felt::from(#selector));
                #(::worldstore::serialize::FeltSerde::serialize(#bindings, out);)*
            }
        });
        deserialize_arms.push(quote! {
            Some(#discriminant) => Ok(Self::#variant_ident(#(#reads),*)),
        });
    }

    Ok(quote! {
        fn serialize(&self, out: &mut Vec<::worldstore::felt::Felt>) {
            match self {
                #(#serialize_arms)*
            }
        }

        fn deserialize(
            reader: &mut ::worldstore::serialize::FeltReader<'_>,
        ) -> Result<Self, ::worldstore::serialize::SerdeError> {
            let variant = reader.next_felt()?;

            match ::worldstore::felt::felt_to_u128(&variant) {
                #(#deserialize_arms)*
                _ => Err(::worldstore::serialize::SerdeError::InvalidVariant {
                    ty: #name,
                    variant,
                }),
            }
        }
    })
}
