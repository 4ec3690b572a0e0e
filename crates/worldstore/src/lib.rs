//! ## Crate layout
//! - `meta`: layouts, schemas, and the `Introspect` trait.
//! - `packing`: bit packing of fixed layouts into felt words.
//! - `serialize`: felt-sequence encoding of storable values.
//! - `storage`: flat slot storage and layout-driven entity I/O.
//! - `index`: per-model entity index.
//! - `permission`: resource registry and the owner/writer gate.
//! - `world`: entity dispatch tying the pieces together.
//!
//! Derives (`Introspect`, `IntrospectPacked`, `FeltSerde`, `Model`) expand to
//! `::worldstore::` paths, so downstream crates only depend on this one.

pub use worldstore_core::{
    config, error, felt, hash, index, meta, model, naming, obs, packing, permission, serialize,
    storage, world,
};
pub use worldstore_derive::{FeltSerde, Introspect, IntrospectPacked, Model};
pub use worldstore_primitives as primitives;

//
// Consts
//

/// Workspace version re-export for downstream tooling/tests.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use error::InternalError as Error;

///
/// Prelude
/// Derive macros live in the macro namespace, so they sit next to the
/// traits of the same name without conflict.
///

pub mod prelude {
    pub use crate::{FeltSerde, Introspect, IntrospectPacked, Model};
    pub use worldstore_core::prelude::*;
}
