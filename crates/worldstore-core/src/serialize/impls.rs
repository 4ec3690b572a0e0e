use crate::{
    felt::{
        ClassHash, ContractAddress, EthAddress, Felt, U256, felt_from_i128, felt_from_usize,
        felt_to_i128, felt_to_u128, felt_to_usize,
    },
    serialize::{FeltReader, FeltSerde, SerdeError, decode_byte_array, encode_byte_array},
};

impl FeltSerde for Felt {
    fn serialize(&self, out: &mut Vec<Felt>) {
        out.push(*self);
    }

    fn deserialize(reader: &mut FeltReader<'_>) -> Result<Self, SerdeError> {
        reader.next_felt()
    }
}

impl FeltSerde for bool {
    fn serialize(&self, out: &mut Vec<Felt>) {
        out.push(if *self { Felt::ONE } else { Felt::ZERO });
    }

    fn deserialize(reader: &mut FeltReader<'_>) -> Result<Self, SerdeError> {
        let value = reader.next_felt()?;

        match felt_to_u128(&value) {
            Some(0) => Ok(false),
            Some(1) => Ok(true),
            _ => Err(SerdeError::OutOfRange { ty: "bool", value }),
        }
    }
}

macro_rules! impl_felt_serde_unsigned {
    ($($ty:ty),* $(,)?) => {
        $(
            impl FeltSerde for $ty {
                fn serialize(&self, out: &mut Vec<Felt>) {
                    out.push(Felt::from(*self));
                }

                fn deserialize(reader: &mut FeltReader<'_>) -> Result<Self, SerdeError> {
                    let value = reader.next_felt()?;

                    felt_to_u128(&value)
                        .and_then(|raw| <$ty>::try_from(raw).ok())
                        .ok_or(SerdeError::OutOfRange { ty: stringify!($ty), value })
                }
            }
        )*
    };
}

impl_felt_serde_unsigned!(u8, u16, u32, u64, u128);

macro_rules! impl_felt_serde_signed {
    ($($ty:ty),* $(,)?) => {
        $(
            impl FeltSerde for $ty {
                fn serialize(&self, out: &mut Vec<Felt>) {
                    out.push(felt_from_i128(i128::from(*self)));
                }

                fn deserialize(reader: &mut FeltReader<'_>) -> Result<Self, SerdeError> {
                    let value = reader.next_felt()?;

                    felt_to_i128(&value)
                        .and_then(|raw| <$ty>::try_from(raw).ok())
                        .ok_or(SerdeError::OutOfRange { ty: stringify!($ty), value })
                }
            }
        )*
    };
}

impl_felt_serde_signed!(i8, i16, i32, i64, i128);

// low limb first
impl FeltSerde for U256 {
    fn serialize(&self, out: &mut Vec<Felt>) {
        out.push(Felt::from(self.low));
        out.push(Felt::from(self.high));
    }

    fn deserialize(reader: &mut FeltReader<'_>) -> Result<Self, SerdeError> {
        let low = u128::deserialize(reader)?;
        let high = u128::deserialize(reader)?;

        Ok(Self { high, low })
    }
}

impl FeltSerde for ContractAddress {
    fn serialize(&self, out: &mut Vec<Felt>) {
        out.push(self.0);
    }

    fn deserialize(reader: &mut FeltReader<'_>) -> Result<Self, SerdeError> {
        reader.next_felt().map(Self)
    }
}

impl FeltSerde for ClassHash {
    fn serialize(&self, out: &mut Vec<Felt>) {
        out.push(self.0);
    }

    fn deserialize(reader: &mut FeltReader<'_>) -> Result<Self, SerdeError> {
        reader.next_felt().map(Self)
    }
}

impl FeltSerde for EthAddress {
    fn serialize(&self, out: &mut Vec<Felt>) {
        out.push(self.felt());
    }

    fn deserialize(reader: &mut FeltReader<'_>) -> Result<Self, SerdeError> {
        let value = reader.next_felt()?;

        Self::new(value).ok_or(SerdeError::OutOfRange {
            ty: "EthAddress",
            value,
        })
    }
}

impl FeltSerde for String {
    fn serialize(&self, out: &mut Vec<Felt>) {
        encode_byte_array(self.as_bytes(), out);
    }

    fn deserialize(reader: &mut FeltReader<'_>) -> Result<Self, SerdeError> {
        let bytes = decode_byte_array(reader)?;

        Self::from_utf8(bytes).map_err(|err| SerdeError::InvalidByteArray {
            reason: err.to_string(),
        })
    }
}

impl<T: FeltSerde> FeltSerde for Vec<T> {
    fn serialize(&self, out: &mut Vec<Felt>) {
        out.push(felt_from_usize(self.len()));
        for item in self {
            item.serialize(out);
        }
    }

    fn deserialize(reader: &mut FeltReader<'_>) -> Result<Self, SerdeError> {
        let len = reader.next_felt()?;
        let len = felt_to_usize(&len)
            .filter(|len| *len <= reader.remaining())
            .ok_or(SerdeError::OutOfRange {
                ty: "array length",
                value: len,
            })?;

        (0..len).map(|_| T::deserialize(reader)).collect()
    }
}

impl<T: FeltSerde, const N: usize> FeltSerde for [T; N] {
    fn serialize(&self, out: &mut Vec<Felt>) {
        for item in self {
            item.serialize(out);
        }
    }

    fn deserialize(reader: &mut FeltReader<'_>) -> Result<Self, SerdeError> {
        let items = (0..N)
            .map(|_| T::deserialize(reader))
            .collect::<Result<Vec<T>, _>>()?;

        items.try_into().map_err(|_| SerdeError::UnexpectedEnd {
            position: reader.position(),
        })
    }
}

// Some = 0, None = 1
impl<T: FeltSerde> FeltSerde for Option<T> {
    fn serialize(&self, out: &mut Vec<Felt>) {
        match self {
            Some(value) => {
                out.push(Felt::ZERO);
                value.serialize(out);
            }
            None => out.push(Felt::ONE),
        }
    }

    fn deserialize(reader: &mut FeltReader<'_>) -> Result<Self, SerdeError> {
        let variant = reader.next_felt()?;

        match felt_to_u128(&variant) {
            Some(0) => T::deserialize(reader).map(Some),
            Some(1) => Ok(None),
            _ => Err(SerdeError::InvalidVariant {
                ty: "Option",
                variant,
            }),
        }
    }
}

impl FeltSerde for () {
    fn serialize(&self, _out: &mut Vec<Felt>) {}

    fn deserialize(_reader: &mut FeltReader<'_>) -> Result<Self, SerdeError> {
        Ok(())
    }
}

macro_rules! impl_felt_serde_tuple {
    ($($name:ident . $idx:tt),+) => {
        impl<$($name: FeltSerde),+> FeltSerde for ($($name,)+) {
            fn serialize(&self, out: &mut Vec<Felt>) {
                $(self.$idx.serialize(out);)+
            }

            fn deserialize(reader: &mut FeltReader<'_>) -> Result<Self, SerdeError> {
                Ok(($($name::deserialize(reader)?,)+))
            }
        }
    };
}

impl_felt_serde_tuple!(A.0);
impl_felt_serde_tuple!(A.0, B.1);
impl_felt_serde_tuple!(A.0, B.1, C.2);
impl_felt_serde_tuple!(A.0, B.1, C.2, D.3);
impl_felt_serde_tuple!(A.0, B.1, C.2, D.3, E.4);
impl_felt_serde_tuple!(A.0, B.1, C.2, D.3, E.4, F.5);
impl_felt_serde_tuple!(A.0, B.1, C.2, D.3, E.4, F.5, G.6);
impl_felt_serde_tuple!(A.0, B.1, C.2, D.3, E.4, F.5, G.6, H.7);
