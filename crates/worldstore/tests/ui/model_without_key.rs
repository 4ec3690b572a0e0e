#![allow(dead_code)]

use worldstore::prelude::*;

#[derive(Model)]
struct Score {
    value: u32,
}

fn main() {}
