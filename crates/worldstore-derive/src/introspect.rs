use crate::util::{
    is_key, named_fields, type_ident, type_param_bounds, variant_types, where_clause_with_bounds,
};
use proc_macro2::TokenStream;
use quote::{ToTokens, quote};
use syn::{Data, DataEnum, DeriveInput, Error, Type};

// derive_introspect
pub fn derive_introspect(input: TokenStream, packed: bool) -> TokenStream {
    let input: DeriveInput = match syn::parse2(input) {
        Ok(input) => input,
        Err(err) => return err.to_compile_error(),
    };

    let generic = !input.generics.params.is_empty();
    let body = match &input.data {
        Data::Struct(_) => struct_body(&input, packed, generic),
        Data::Enum(data) => enum_body(data, &input, packed, generic),
        Data::Union(_) => Err(Error::new_spanned(
            &input.ident,
            "Introspect cannot be derived for unions",
        )),
    };
    let (body, outer) = match body {
        Ok(parts) => parts,
        Err(err) => return err.to_compile_error(),
    };

    let ident = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();
    let bounds = type_param_bounds(&input.generics, &quote!(::worldstore::meta::Introspect));
    let where_clause = where_clause_with_bounds(where_clause, &bounds);

    quote! {
        impl #impl_generics ::worldstore::meta::Introspect for #ident #ty_generics #where_clause {
            #body
        }

        #outer
    }
}

// Packed members must all flatten to `Fixed`. Non-generic types are checked
// by a free constant; generic ones when `layout` is instantiated.
fn packable_check(types: &[&Type], generic: bool) -> (TokenStream, TokenStream) {
    let check = quote! {
        assert!(
            true #(&& <#types as ::worldstore::meta::Introspect>::PACKABLE)*,
            "A packed model layout must contain Fixed layouts only.",
        )
    };

    if generic {
        (quote!(const { #check };), quote!())
    } else {
        (quote!(), quote!(const _: () = #check;))
    }
}

fn struct_body(
    input: &DeriveInput,
    packed: bool,
    generic: bool,
) -> Result<(TokenStream, TokenStream), Error> {
    let derive = if packed { "IntrospectPacked" } else { "Introspect" };
    let fields = named_fields(input, derive)?;
    let name = input.ident.to_string();

    let values: Vec<_> = fields.iter().filter(|field| !is_key(field)).collect();
    if packed {
        for field in &values {
            ensure_packable(&field.ty)?;
        }
    }

    let value_types: Vec<&Type> = values.iter().map(|field| &field.ty).collect();
    let (inline_check, outer) = if packed {
        packable_check(&value_types, generic)
    } else {
        (quote!(), quote!())
    };
    let layout = if packed {
        quote! {
            #inline_check
            ::worldstore::meta::Layout::packed(
                vec![#(<#value_types as ::worldstore::meta::Introspect>::layout()),*],
            )
            .unwrap_or_else(|err| panic!("{err}"))
        }
    } else {
        let field_layouts = values.iter().map(|field| {
            let ty = &field.ty;
            let field_name = field.ident.as_ref().map(ToString::to_string);

            quote! {
                ::worldstore::meta::FieldLayout::new(
                    ::worldstore::naming::selector_from_name(#field_name),
                    <#ty as ::worldstore::meta::Introspect>::layout(),
                )
            }
        });

        quote!(::worldstore::meta::Layout::Struct(vec![#(#field_layouts),*]))
    };

    let members = fields.iter().map(|field| {
        let ty = &field.ty;
        let field_name = field.ident.as_ref().map(ToString::to_string);
        let attrs = if is_key(field) {
            quote!(vec![::worldstore::meta::KEY_ATTR.to_string()])
        } else {
            quote!(Vec::new())
        };

        quote! {
            ::worldstore::meta::Member::new(
                #field_name,
                #attrs,
                <#ty as ::worldstore::meta::Introspect>::ty(),
            )
        }
    });

    let packable = packed.then(|| quote!(const PACKABLE: bool = true;));

    let body = quote! {
        #packable

        fn size() -> Option<usize> {
            Some(0 #(+ <#value_types as ::worldstore::meta::Introspect>::size()?)*)
        }

        fn layout() -> ::worldstore::meta::Layout {
            #layout
        }

        fn ty() -> ::worldstore::meta::Ty {
            ::worldstore::meta::Ty::Struct(::worldstore::meta::Struct::new(
                #name,
                vec![#(#members),*],
            ))
        }
    };

    Ok((body, outer))
}

fn enum_body(
    data: &DataEnum,
    input: &DeriveInput,
    packed: bool,
    generic: bool,
) -> Result<(TokenStream, TokenStream), Error> {
    let name = input.ident.to_string();
    let mut payload_types = Vec::new();

    let mut sizes = Vec::new();
    let mut layouts = Vec::new();
    let mut tys = Vec::new();

    for variant in &data.variants {
        let types = variant_types(variant)?;
        if packed {
            for ty in &types {
                ensure_packable(ty)?;
            }
            payload_types.extend(types.iter().copied());
        }

        let (size, layout, ty) = match types.as_slice() {
            [] => (
                quote!(Some(0)),
                quote!(::worldstore::meta::Layout::unit()),
                quote!(::worldstore::meta::Ty::Tuple(Vec::new())),
            ),
            [single] => (
                quote!(<#single as ::worldstore::meta::Introspect>::size()),
                quote!(<#single as ::worldstore::meta::Introspect>::layout()),
                quote!(<#single as ::worldstore::meta::Introspect>::ty()),
            ),
            many => (
                quote! {
                    (|| Some(0 #(+ <#many as ::worldstore::meta::Introspect>::size()?)*))()
                },
                quote! {
                    ::worldstore::meta::Layout::Tuple(
                        vec![#(<#many as ::worldstore::meta::Introspect>::layout()),*],
                    )
                },
                quote! {
                    ::worldstore::meta::Ty::Tuple(
                        vec![#(<#many as ::worldstore::meta::Introspect>::ty()),*],
                    )
                },
            ),
        };

        let variant_name = variant.ident.to_string();
        tys.push(quote!(::worldstore::meta::EnumVariant::new(#variant_name, #ty)));
        sizes.push(size);
        layouts.push(layout);
    }

    let (inline_check, outer) = if packed {
        packable_check(&payload_types, generic)
    } else {
        (quote!(), quote!())
    };
    let layout = if packed {
        quote! {
            #inline_check
            ::worldstore::meta::Layout::packed_enum(vec![#(#layouts),*])
                .unwrap_or_else(|err| panic!("{err}"))
        }
    } else {
        let field_layouts = layouts.iter().enumerate().map(|(index, layout)| {
            let index = index as u64;

            quote! {
                ::worldstore::meta::FieldLayout::new(
                    ::worldstore::felt::Felt::from(#index),
                    #layout,
                )
            }
        });

        quote!(::worldstore::meta::Layout::Enum(vec![#(#field_layouts),*]))
    };

    let packable = packed.then(|| quote!(const PACKABLE: bool = true;));

    let body = quote! {
        #packable

        fn size() -> Option<usize> {
            ::worldstore::meta::enum_size(&[#(#sizes),*])
        }

        fn layout() -> ::worldstore::meta::Layout {
            #layout
        }

        fn ty() -> ::worldstore::meta::Ty {
            ::worldstore::meta::Ty::Enum(::worldstore::meta::Enum::new(
                #name,
                vec![#(#tys),*],
            ))
        }
    };

    Ok((body, outer))
}

// Packed layouts cannot hold anything dynamically sized or discriminated.
fn ensure_packable(ty: &Type) -> Result<(), Error> {
    match type_ident(ty).as_deref() {
        Some("Vec" | "String" | "ByteArray") => Err(Error::new_spanned(
            ty,
            "Array field cannot be packed.",
        )),
        Some("Option") => {
            let rendered = ty.to_token_stream().to_string().replace(' ', "");

            Err(Error::new_spanned(ty, format!("{rendered} cannot be packed.")))
        }
        _ => Ok(()),
    }
}
