#[macro_export]
macro_rules! primitive_kind_registry_entries {
    ($macro:ident $(, @args $($args:tt)+ )?) => {
        $macro! {
            $(
                @args $($args)+;
            )?
            @entries
            (Bool, "bool", Bool, widths = [1], signed = false),
            (U8, "u8", Unsigned, widths = [8], signed = false),
            (U16, "u16", Unsigned, widths = [16], signed = false),
            (U32, "u32", Unsigned, widths = [32], signed = false),
            (U64, "u64", Unsigned, widths = [64], signed = false),
            (U128, "u128", Unsigned, widths = [128], signed = false),
            (U256, "u256", Unsigned, widths = [128, 128], signed = false),
            (I8, "i8", Signed, widths = [251], signed = true),
            (I16, "i16", Signed, widths = [251], signed = true),
            (I32, "i32", Signed, widths = [251], signed = true),
            (I64, "i64", Signed, widths = [251], signed = true),
            (I128, "i128", Signed, widths = [251], signed = true),
            (Felt252, "felt252", Word, widths = [251], signed = false),
            (ClassHash, "ClassHash", Address, widths = [251], signed = false),
            (ContractAddress, "ContractAddress", Address, widths = [251], signed = false),
            (EthAddress, "EthAddress", Address, widths = [160], signed = false),
        }
    };
}

#[macro_export]
macro_rules! primitive_kind_registry {
    ($macro:ident) => {
        $crate::primitive_kind_registry_entries!($macro)
    };
    ($macro:ident, $($args:tt)+) => {
        $crate::primitive_kind_registry_entries!($macro, @args $($args)+)
    };
}

macro_rules! metadata_from_registry {
    ( @args $kind:expr; @entries $( ($prim:ident, $name:literal, $family:ident, widths = [$($width:literal),*], signed = $signed:expr) ),* $(,)? ) => {
        match $kind {
            $(
                $crate::PrimitiveKind::$prim => $crate::PrimitiveMetadata {
                    name: $name,
                    family: $crate::PrimitiveFamily::$family,
                    widths: &[$($width),*],
                    is_signed: $signed,
                },
            )*
        }
    };
}

macro_rules! all_kinds_from_registry {
    ( @entries $( ($prim:ident, $name:literal, $family:ident, widths = [$($width:literal),*], signed = $signed:expr) ),* $(,)? ) => {
        [ $( $crate::PrimitiveKind::$prim ),* ]
    };
}
