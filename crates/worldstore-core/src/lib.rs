//! Core runtime for worldstore: layout and schema introspection, the packing
//! codec, layout-driven entity storage, the entity index, the permission gate,
//! and the world dispatch that ties them together.
#![warn(unreachable_pub)]

extern crate self as worldstore;

// public exports are one module level down
pub mod config;
pub mod error;
pub mod felt;
pub mod hash;
pub mod index;
pub mod meta;
pub mod model;
pub mod naming;
pub mod obs;
pub mod packing;
pub mod permission;
pub mod serialize;
pub mod storage;
pub mod world;

pub use worldstore_primitives as primitives;

///
/// CONSTANTS
///

/// Storage domain used when no configuration overrides it.
pub const DEFAULT_STORAGE_DOMAIN: u32 = 0;

/// Upper bound for stored array and byte-array lengths.
pub const MAX_ARRAY_LENGTH: u32 = u32::MAX;

///
/// Prelude
///
/// Prelude contains only domain vocabulary.
/// No errors, stores, or helpers are re-exported here.
///

pub mod prelude {
    pub use crate::{
        felt::{ClassHash, ContractAddress, EthAddress, Felt, U256},
        meta::{FieldLayout, Introspect, Layout, Ty},
        model::Model,
        serialize::FeltSerde,
        world::{ModelIndex, World},
    };
}
