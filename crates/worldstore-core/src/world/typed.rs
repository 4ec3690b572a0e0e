//! Typed access through [`Model`] implementations.

use crate::{
    error::InternalError,
    felt::{ContractAddress, Felt},
    model::Model,
    naming::{bytearray_hash, selector_from_name},
    obs::event::EventSink,
    permission::PermissionRegistry,
    serialize::FeltSerde,
    storage::FlatStorage,
    world::{ModelIndex, World},
};

impl<S, P, E> World<S, P, E>
where
    S: FlatStorage,
    P: PermissionRegistry,
    E: EventSink,
{
    /// Register `M` under `namespace`, named after [`Model::NAME`].
    pub fn register<M: Model>(
        &mut self,
        caller: ContractAddress,
        namespace: &str,
        address: ContractAddress,
    ) -> Result<Felt, InternalError> {
        self.register_model(caller, namespace, M::NAME, address)
    }

    pub fn write_model<M: Model>(
        &mut self,
        caller: ContractAddress,
        namespace: &str,
        model: &M,
    ) -> Result<(), InternalError> {
        self.set_entity(
            caller,
            model_selector::<M>(namespace),
            &ModelIndex::Keys(model.keys()),
            &model.values(),
            &M::layout(),
        )
    }

    /// Read the record stored under `keys`; unwritten records decode from zeros.
    pub fn read_model<M: Model, K: FeltSerde>(
        &self,
        namespace: &str,
        keys: &K,
    ) -> Result<M, InternalError> {
        let keys = keys.to_felts();
        let values = self.entity(
            model_selector::<M>(namespace),
            &ModelIndex::Keys(keys.clone()),
            &M::layout(),
        )?;

        Ok(M::from_parts(&keys, &values)?)
    }

    pub fn erase_model<M: Model>(
        &mut self,
        caller: ContractAddress,
        namespace: &str,
        model: &M,
    ) -> Result<(), InternalError> {
        self.delete_entity(
            caller,
            model_selector::<M>(namespace),
            &ModelIndex::Keys(model.keys()),
            &M::layout(),
        )
    }

    /// Overwrite a single member of the entity `entity_id`.
    pub fn write_member<M: Model, T: FeltSerde>(
        &mut self,
        caller: ContractAddress,
        namespace: &str,
        entity_id: Felt,
        member: &str,
        value: &T,
    ) -> Result<(), InternalError> {
        self.set_entity(
            caller,
            model_selector::<M>(namespace),
            &ModelIndex::MemberId(entity_id, selector_from_name(member)),
            &value.to_felts(),
            &M::layout(),
        )
    }

    pub fn read_member<M: Model, T: FeltSerde>(
        &self,
        namespace: &str,
        entity_id: Felt,
        member: &str,
    ) -> Result<T, InternalError> {
        let values = self.entity(
            model_selector::<M>(namespace),
            &ModelIndex::MemberId(entity_id, selector_from_name(member)),
            &M::layout(),
        )?;

        Ok(T::from_felts(&values)?)
    }
}

fn model_selector<M: Model>(namespace: &str) -> Felt {
    M::selector(bytearray_hash(namespace))
}
