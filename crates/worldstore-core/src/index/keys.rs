//! Storage addresses of index state. Each structure lives under its own
//! short-string tag so the tables never collide.

use crate::{
    felt::{Felt, felt_from_usize, short_string},
    storage::storage_address,
};

const LENS_TAG: &str = "dojo_index_lens";
const ITEMS_TAG: &str = "dojo_indexes";
const IDS_TAG: &str = "dojo_index_ids";
const KEY_LENS_TAG: &str = "dojo_index_key_len";
const KEY_ITEMS_TAG: &str = "dojo_index_key";

pub(crate) fn length_address(table: Felt) -> Felt {
    storage_address(&[short_string(LENS_TAG), table])
}

pub(crate) fn item_address(table: Felt, position: usize) -> Felt {
    storage_address(&[short_string(ITEMS_TAG), table, felt_from_usize(position)])
}

pub(crate) fn position_address(table: Felt, id: Felt) -> Felt {
    storage_address(&[short_string(IDS_TAG), table, id])
}

pub(crate) fn key_length_address(table: Felt, key: Felt) -> Felt {
    storage_address(&[short_string(KEY_LENS_TAG), table, key])
}

pub(crate) fn key_item_address(table: Felt, key: Felt, position: usize) -> Felt {
    storage_address(&[short_string(KEY_ITEMS_TAG), table, key, felt_from_usize(position)])
}
