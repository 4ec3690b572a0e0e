#![allow(dead_code)]

use worldstore::prelude::*;

#[derive(IntrospectPacked)]
struct Inventory {
    #[key]
    player: ContractAddress,
    items: Vec<u8>,
}

fn main() {}
