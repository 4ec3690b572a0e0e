#![allow(dead_code)]

use worldstore::prelude::*;

#[derive(IntrospectPacked)]
struct Health {
    #[key]
    player: ContractAddress,
    shield: Option<u8>,
}

fn main() {}
