//! The world: entity dispatch over flat storage, gated by the permission
//! registry, with every mutation mirrored to the event stream.

mod dispatch;
mod typed;

#[cfg(test)]
mod tests;

use crate::{
    config::WorldConfig,
    error::InternalError,
    felt::{ContractAddress, Felt},
    hash::entity_id_from_keys,
    index::{Index, IndexCorruption},
    meta::Layout,
    obs::event::{EventLog, EventSink, WorldEvent},
    permission::{
        Permission, PermissionError, PermissionRegistry, Resource, ResourceRegistry,
        check_permission,
    },
    storage::{EntityStorage, EntityStorageError, FlatStorage, MemoryStorage},
};
use thiserror::Error as ThisError;

///
/// DispatchError
///

#[derive(Debug, Eq, PartialEq, ThisError)]
pub enum DispatchError {
    #[error(transparent)]
    Storage(#[from] EntityStorageError),

    #[error(transparent)]
    Index(#[from] IndexCorruption),

    #[error("cannot delete entity member")]
    CannotDeleteMember,

    #[error("bad member id")]
    BadMemberId { member: Felt },

    #[error("Unexpected layout type for a model.")]
    UnexpectedLayout { kind: &'static str },
}

///
/// ModelIndex
///
/// How an entity is addressed inside a model table.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ModelIndex {
    /// Serialized key fields; the entity id is their hash.
    Keys(Vec<Felt>),

    /// A precomputed entity id.
    Id(Felt),

    /// One struct member of an entity: `(entity_id, member_selector)`.
    MemberId(Felt, Felt),
}

impl ModelIndex {
    /// Entity id the descriptor resolves to.
    #[must_use]
    pub fn entity_id(&self) -> Felt {
        match self {
            Self::Keys(keys) => entity_id_from_keys(keys),
            Self::Id(id) | Self::MemberId(id, _) => *id,
        }
    }
}

///
/// World
///

pub struct World<S, P = ResourceRegistry, E = EventLog> {
    storage: S,
    permissions: P,
    events: E,
    entities: EntityStorage,
    index: Index,
}

impl World<MemoryStorage, ResourceRegistry, EventLog> {
    /// Fresh in-memory world owned by `creator`.
    #[must_use]
    pub fn in_memory(creator: ContractAddress) -> Self {
        Self::new(
            MemoryStorage::new(),
            ResourceRegistry::new(creator),
            EventLog::new(),
        )
    }
}

impl<S, P, E> World<S, P, E>
where
    S: FlatStorage,
    P: PermissionRegistry,
    E: EventSink,
{
    #[must_use]
    pub fn new(storage: S, permissions: P, events: E) -> Self {
        Self::with_config(storage, permissions, events, &WorldConfig::default())
    }

    #[must_use]
    pub const fn with_config(storage: S, permissions: P, events: E, config: &WorldConfig) -> Self {
        Self {
            storage,
            permissions,
            events,
            entities: config.entity_storage(),
            index: config.index(),
        }
    }

    #[must_use]
    pub const fn storage(&self) -> &S {
        &self.storage
    }

    #[must_use]
    pub const fn permissions(&self) -> &P {
        &self.permissions
    }

    #[must_use]
    pub const fn events(&self) -> &E {
        &self.events
    }

    pub const fn events_mut(&mut self) -> &mut E {
        &mut self.events
    }

    pub fn into_parts(self) -> (S, P, E) {
        (self.storage, self.permissions, self.events)
    }

    // ------------------------------------------------------------------
    // gated entity API
    // ------------------------------------------------------------------

    /// Write an entity as `caller`, who must hold `Writer` on the model.
    pub fn set_entity(
        &mut self,
        caller: ContractAddress,
        model: Felt,
        index: &ModelIndex,
        values: &[Felt],
        layout: &Layout,
    ) -> Result<(), InternalError> {
        self.ensure_model_writer(caller, model)?;
        self.write_entity(model, index, values, layout)?;

        Ok(())
    }

    /// Delete an entity as `caller`, who must hold `Writer` on the model.
    pub fn delete_entity(
        &mut self,
        caller: ContractAddress,
        model: Felt,
        index: &ModelIndex,
        layout: &Layout,
    ) -> Result<(), InternalError> {
        self.ensure_model_writer(caller, model)?;
        self.erase_entity(model, index, layout)?;

        Ok(())
    }

    fn ensure_model_writer(
        &self,
        caller: ContractAddress,
        model: Felt,
    ) -> Result<(), PermissionError> {
        match self.permissions.resource(model) {
            Resource::Model { .. } => {
                check_permission(&self.permissions, model, caller, Permission::Writer)
            }
            Resource::Unregistered => Err(PermissionError::NotRegistered { selector: model }),
            other => Err(PermissionError::Conflict {
                selector: model,
                expected: "model",
                found: other.kind_name(),
            }),
        }
    }

    // ------------------------------------------------------------------
    // registration
    // ------------------------------------------------------------------

    pub fn register_namespace(
        &mut self,
        caller: ContractAddress,
        namespace: &str,
    ) -> Result<Felt, InternalError> {
        let hash = self.permissions.register_namespace(caller, namespace)?;
        self.events.emit(WorldEvent::NamespaceRegistered {
            namespace: namespace.to_string(),
            hash,
        });

        Ok(hash)
    }

    pub fn register_model(
        &mut self,
        caller: ContractAddress,
        namespace: &str,
        name: &str,
        address: ContractAddress,
    ) -> Result<Felt, InternalError> {
        let selector = self
            .permissions
            .register_model(caller, namespace, name, address)?;
        self.events.emit(WorldEvent::ModelRegistered {
            name: name.to_string(),
            namespace: namespace.to_string(),
            address,
        });

        Ok(selector)
    }

    pub fn register_event(
        &mut self,
        caller: ContractAddress,
        namespace: &str,
        name: &str,
        address: ContractAddress,
    ) -> Result<Felt, InternalError> {
        let selector = self
            .permissions
            .register_event(caller, namespace, name, address)?;
        self.events.emit(WorldEvent::EventRegistered {
            name: name.to_string(),
            namespace: namespace.to_string(),
            address,
        });

        Ok(selector)
    }

    pub fn register_contract(
        &mut self,
        caller: ContractAddress,
        namespace: &str,
        name: &str,
        address: ContractAddress,
    ) -> Result<Felt, InternalError> {
        let selector = self
            .permissions
            .register_contract(caller, namespace, name, address)?;
        self.events.emit(WorldEvent::ContractRegistered {
            name: name.to_string(),
            namespace: namespace.to_string(),
            address,
        });

        Ok(selector)
    }

    // ------------------------------------------------------------------
    // roles
    // ------------------------------------------------------------------

    pub fn grant_owner(
        &mut self,
        caller: ContractAddress,
        resource: Felt,
        principal: ContractAddress,
    ) -> Result<(), InternalError> {
        self.permissions.grant_owner(caller, resource, principal)?;
        self.emit_owner_updated(resource, principal, true);

        Ok(())
    }

    pub fn revoke_owner(
        &mut self,
        caller: ContractAddress,
        resource: Felt,
        principal: ContractAddress,
    ) -> Result<(), InternalError> {
        self.permissions.revoke_owner(caller, resource, principal)?;
        self.emit_owner_updated(resource, principal, false);

        Ok(())
    }

    pub fn grant_writer(
        &mut self,
        caller: ContractAddress,
        resource: Felt,
        principal: ContractAddress,
    ) -> Result<(), InternalError> {
        self.permissions.grant_writer(caller, resource, principal)?;
        self.emit_writer_updated(resource, principal, true);

        Ok(())
    }

    pub fn revoke_writer(
        &mut self,
        caller: ContractAddress,
        resource: Felt,
        principal: ContractAddress,
    ) -> Result<(), InternalError> {
        self.permissions.revoke_writer(caller, resource, principal)?;
        self.emit_writer_updated(resource, principal, false);

        Ok(())
    }

    fn emit_owner_updated(&mut self, resource: Felt, principal: ContractAddress, value: bool) {
        self.events.emit(WorldEvent::OwnerUpdated {
            resource,
            principal,
            value,
        });
    }

    fn emit_writer_updated(&mut self, resource: Felt, principal: ContractAddress, value: bool) {
        self.events.emit(WorldEvent::WriterUpdated {
            resource,
            principal,
            value,
        });
    }

    // ------------------------------------------------------------------
    // queries
    // ------------------------------------------------------------------

    /// Live entity ids of `model`, in index order.
    pub fn entity_ids(&self, model: Felt) -> Result<Vec<Felt>, InternalError> {
        Ok(self.index.query(&self.storage, model)?)
    }

    /// Ids ever written under `key` through a `Keys` write. Deleted entities
    /// are not removed from this list.
    pub fn entity_ids_by_key(&self, model: Felt, key: Felt) -> Result<Vec<Felt>, InternalError> {
        Ok(self.index.get_by_key(&self.storage, model, key)?)
    }

    /// Every live entity of `model` with its values read through `layout`.
    pub fn entities(
        &self,
        model: Felt,
        layout: &Layout,
    ) -> Result<Vec<(Felt, Vec<Felt>)>, InternalError> {
        self.entity_ids(model)?
            .into_iter()
            .map(|id| {
                let values = self.entity(model, &ModelIndex::Id(id), layout)?;
                Ok::<_, InternalError>((id, values))
            })
            .collect()
    }

    #[must_use]
    pub fn is_indexed(&self, model: Felt, entity_id: Felt) -> bool {
        self.index.exists(&self.storage, model, entity_id)
    }
}
