//! Physical layouts, logical schemas, and the introspection trait deriving
//! both from a Rust type.

mod introspect;
mod layout;
mod ty;


pub use introspect::{Introspect, enum_size};
pub use layout::{FieldLayout, Layout, LayoutError};
pub use ty::{Enum, EnumVariant, Member, Struct, Ty, TyIter};

/// Attribute carried by key members in a struct schema.
pub const KEY_ATTR: &str = "key";
