use crate::{
    felt::Felt,
    hash::entity_id_from_keys,
    meta::{Introspect, Ty},
    naming::{bytearray_hash, selector_from_hashes},
    serialize::SerdeError,
};

///
/// Model
///
/// A record type stored in the world: key fields address the entity, value
/// fields are stored under the model's layout. The layout and schema come
/// from [`Introspect`]; the layout covers value fields only.
///

pub trait Model: Introspect + Sized {
    const NAME: &'static str;

    const VERSION: u8 = 1;

    /// Key fields, serialized in declaration order.
    fn keys(&self) -> Vec<Felt>;

    /// Value fields, serialized in declaration order.
    fn values(&self) -> Vec<Felt>;

    /// Rebuild a record from its serialized keys and values.
    fn from_parts(keys: &[Felt], values: &[Felt]) -> Result<Self, SerdeError>;

    fn entity_id(&self) -> Felt {
        entity_id_from_keys(&self.keys())
    }

    #[must_use]
    fn name_hash() -> Felt {
        bytearray_hash(Self::NAME)
    }

    /// Table selector of this model inside the namespace hashed to `namespace_hash`.
    #[must_use]
    fn selector(namespace_hash: Felt) -> Felt {
        selector_from_hashes(namespace_hash, Self::name_hash())
    }

    #[must_use]
    fn schema() -> Ty {
        Self::ty()
    }

    #[must_use]
    fn unpacked_size() -> Option<usize> {
        Self::size()
    }

    /// Storage words of the packed layout, `None` unless the layout is `Fixed`.
    #[must_use]
    fn packed_size() -> Option<usize> {
        Self::layout().packed_size()
    }
}

///
/// TESTS
///
