use super::*;
use crate::felt::{EthAddress, U256, short_string};
use proptest::prelude::*;

#[test]
fn byte_array_layout_for_short_string() {
    let felts = "test".to_string().to_felts();

    assert_eq!(felts, vec![Felt::ZERO, short_string("test"), Felt::from(4_u64)]);
}

#[test]
fn byte_array_splits_full_words() {
    let text = "a".repeat(BYTES_IN_WORD + 2);
    let felts = text.to_felts();

    assert_eq!(felts.len(), 4);
    assert_eq!(felts[0], Felt::ONE);
    assert_eq!(felts[1], short_string(&"a".repeat(BYTES_IN_WORD)));
    assert_eq!(felts[2], short_string("aa"));
    assert_eq!(felts[3], Felt::from(2_u64));
    assert_eq!(String::from_felts(&felts).unwrap(), text);
}

#[test]
fn byte_array_rejects_oversized_pending_len() {
    let felts = [Felt::ZERO, Felt::ZERO, Felt::from(31_u64)];

    assert!(matches!(
        String::from_felts(&felts),
        Err(SerdeError::InvalidByteArray { .. })
    ));
}

#[test]
fn byte_array_rejects_pending_word_wider_than_len() {
    let felts = [Felt::ZERO, short_string("abc"), Felt::from(2_u64)];

    assert!(matches!(
        String::from_felts(&felts),
        Err(SerdeError::InvalidByteArray { .. })
    ));
}

#[test]
fn byte_array_word_count_is_bounded_by_input() {
    let felts = [Felt::from(1_u64 << 58), Felt::ZERO, Felt::ZERO];

    let Err(SerdeError::InvalidByteArray { reason }) = String::from_felts(&felts) else {
        panic!("expected an invalid byte array");
    };
    assert!(reason.starts_with("word count"));
}

#[test]
fn u256_is_low_then_high() {
    let value = U256::new(2, 1);

    assert_eq!(value.to_felts(), vec![Felt::ONE, Felt::from(2_u64)]);
    assert_eq!(U256::from_felts(&value.to_felts()).unwrap(), value);
}

#[test]
fn option_uses_zero_for_some() {
    assert_eq!(Some(9_u8).to_felts(), vec![Felt::ZERO, Felt::from(9_u64)]);
    assert_eq!(None::<u8>.to_felts(), vec![Felt::ONE]);
    assert_eq!(
        Option::<u8>::from_felts(&[Felt::from(2_u64)]),
        Err(SerdeError::InvalidVariant {
            ty: "Option",
            variant: Felt::from(2_u64)
        })
    );
}

#[test]
fn vec_is_length_prefixed() {
    let felts = vec![1_u32, 2, 3].to_felts();

    assert_eq!(felts[0], Felt::from(3_u64));
    assert_eq!(Vec::<u32>::from_felts(&felts).unwrap(), vec![1, 2, 3]);
}

#[test]
fn vec_length_beyond_input_is_rejected() {
    let felts = [Felt::from(5_u64), Felt::ONE];

    assert!(matches!(
        Vec::<u8>::from_felts(&felts),
        Err(SerdeError::OutOfRange { .. })
    ));
}

#[test]
fn narrowing_checks_range() {
    assert_eq!(
        u8::from_felts(&[Felt::from(256_u64)]),
        Err(SerdeError::OutOfRange {
            ty: "u8",
            value: Felt::from(256_u64)
        })
    );
    assert!(bool::from_felts(&[Felt::from(2_u64)]).is_err());
    assert!(EthAddress::from_felts(&[Felt::MAX]).is_err());
}

#[test]
fn negative_integers_are_field_wrapped() {
    let felts = (-1_i8).to_felts();

    assert_eq!(felts, vec![Felt::ZERO - Felt::ONE]);
    assert_eq!(i8::from_felts(&felts).unwrap(), -1);
    assert!(i8::from_felts(&(-200_i32).to_felts()).is_err());
}

#[test]
fn trailing_input_is_rejected() {
    assert_eq!(
        u8::from_felts(&[Felt::ONE, Felt::ONE]),
        Err(SerdeError::TrailingFelts { count: 1 })
    );
}

#[test]
fn short_input_reports_position() {
    let mut reader = FeltReader::new(&[]);

    assert_eq!(
        u32::deserialize(&mut reader),
        Err(SerdeError::UnexpectedEnd { position: 0 })
    );
}

#[test]
fn tuples_and_fixed_arrays_concatenate() {
    let value = ((1_u8, true), [7_u16, 8]);
    let felts = value.to_felts();

    assert_eq!(felts.len(), 4);
    assert_eq!(<((u8, bool), [u16; 2])>::from_felts(&felts).unwrap(), value);
}

proptest! {
    #[test]
    fn strings_round_trip(text in ".{0,80}") {
        prop_assert_eq!(String::from_felts(&text.to_felts()).unwrap(), text);
    }

    #[test]
    fn nested_values_round_trip(value in any::<(u64, Option<i32>, Vec<u16>)>()) {
        let decoded = <(u64, Option<i32>, Vec<u16>)>::from_felts(&value.to_felts()).unwrap();
        prop_assert_eq!(decoded, value);
    }
}
