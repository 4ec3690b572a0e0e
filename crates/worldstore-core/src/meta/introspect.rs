use crate::{
    felt::{ClassHash, ContractAddress, EthAddress, Felt, U256},
    meta::{Enum, EnumVariant, FieldLayout, Layout, Ty},
};
use worldstore_primitives::PrimitiveKind;

///
/// Introspect
///
/// Static layout, schema, and unpacked size of a storable type.
///

pub trait Introspect {
    /// Whether the layout flattens into a packed `Fixed` layout.
    const PACKABLE: bool = false;

    /// Felts occupied when stored unpacked, or `None` for dynamically sized types.
    fn size() -> Option<usize>;

    fn layout() -> Layout;

    fn ty() -> Ty;
}

/// Size of an enum: one discriminant felt plus the payload, provided every
/// variant has the same known payload size.
#[must_use]
pub fn enum_size(variant_sizes: &[Option<usize>]) -> Option<usize> {
    let (first, rest) = variant_sizes.split_first()?;
    let size = (*first)?;

    rest.iter()
        .all(|other| *other == Some(size))
        .then_some(size + 1)
}

// primitives

macro_rules! impl_introspect_primitive {
    ($($ty:ty => $kind:ident),* $(,)?) => {
        $(
            impl Introspect for $ty {
                const PACKABLE: bool = true;

                fn size() -> Option<usize> {
                    Some(PrimitiveKind::$kind.felt_count())
                }

                fn layout() -> Layout {
                    Layout::fixed(PrimitiveKind::$kind.widths())
                }

                fn ty() -> Ty {
                    Ty::Primitive(PrimitiveKind::$kind)
                }
            }
        )*
    };
}

impl_introspect_primitive!(
    bool => Bool,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    u128 => U128,
    U256 => U256,
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    i128 => I128,
    Felt => Felt252,
    ClassHash => ClassHash,
    ContractAddress => ContractAddress,
    EthAddress => EthAddress,
);

impl Introspect for String {
    fn size() -> Option<usize> {
        None
    }

    fn layout() -> Layout {
        Layout::ByteArray
    }

    fn ty() -> Ty {
        Ty::ByteArray
    }
}

// containers

impl<T: Introspect> Introspect for Vec<T> {
    fn size() -> Option<usize> {
        None
    }

    fn layout() -> Layout {
        Layout::Array(Box::new(T::layout()))
    }

    fn ty() -> Ty {
        Ty::Array(Box::new(T::ty()))
    }
}

impl<T: Introspect, const N: usize> Introspect for [T; N] {
    const PACKABLE: bool = T::PACKABLE;

    fn size() -> Option<usize> {
        T::size().map(|size| size * N)
    }

    fn layout() -> Layout {
        Layout::FixedArray(Box::new(T::layout()), fixed_len::<N>())
    }

    fn ty() -> Ty {
        Ty::FixedArray(Box::new(T::ty()), fixed_len::<N>())
    }
}

fn fixed_len<const N: usize>() -> u32 {
    u32::try_from(N).unwrap_or(u32::MAX)
}

// Some = 0, None = 1
impl<T: Introspect> Introspect for Option<T> {
    fn size() -> Option<usize> {
        None
    }

    fn layout() -> Layout {
        Layout::Enum(vec![
            FieldLayout::new(Felt::ZERO, T::layout()),
            FieldLayout::new(Felt::ONE, Layout::unit()),
        ])
    }

    fn ty() -> Ty {
        let inner = T::ty();

        Ty::Enum(Enum::new(
            format!("Option<{}>", inner.name()),
            vec![
                EnumVariant::new("Some", inner),
                EnumVariant::new("None", Ty::Tuple(Vec::new())),
            ],
        ))
    }
}

impl Introspect for () {
    const PACKABLE: bool = true;

    fn size() -> Option<usize> {
        Some(0)
    }

    fn layout() -> Layout {
        Layout::unit()
    }

    fn ty() -> Ty {
        Ty::Tuple(Vec::new())
    }
}

macro_rules! impl_introspect_tuple {
    ($($name:ident),+) => {
        impl<$($name: Introspect),+> Introspect for ($($name,)+) {
            const PACKABLE: bool = true $(&& $name::PACKABLE)+;

            fn size() -> Option<usize> {
                Some(0 $(+ $name::size()?)+)
            }

            fn layout() -> Layout {
                Layout::Tuple(vec![$($name::layout()),+])
            }

            fn ty() -> Ty {
                Ty::Tuple(vec![$($name::ty()),+])
            }
        }
    };
}

impl_introspect_tuple!(A);
impl_introspect_tuple!(A, B);
impl_introspect_tuple!(A, B, C);
impl_introspect_tuple!(A, B, C, D);
impl_introspect_tuple!(A, B, C, D, E);
impl_introspect_tuple!(A, B, C, D, E, F);
impl_introspect_tuple!(A, B, C, D, E, F, G);
impl_introspect_tuple!(A, B, C, D, E, F, G, H);
