#![allow(dead_code)]

use worldstore::prelude::*;

#[derive(Model)]
struct Marker {
    #[key]
    player: ContractAddress,
}

fn main() {}
