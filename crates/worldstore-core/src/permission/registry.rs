use crate::{
    felt::{ContractAddress, Felt},
    naming::{bytearray_hash, get_tag, is_name_valid, selector_from_hashes},
    permission::{
        Permission, PermissionError, PermissionOracle, Resource, WORLD_SELECTOR, check_permission,
    },
};
use std::collections::{HashMap, HashSet};

///
/// PermissionRegistry
///
/// Write side of the permission state. Implementors provide the raw setters;
/// the provided methods gate every mutation through [`check_permission`].
///

pub trait PermissionRegistry: PermissionOracle {
    /// Record `resource` under `selector` with a display label. Ungated.
    fn set_resource(&mut self, selector: Felt, resource: Resource, label: String);

    /// Ungated.
    fn set_owner(&mut self, resource: Felt, principal: ContractAddress, value: bool);

    /// Ungated.
    fn set_writer(&mut self, resource: Felt, principal: ContractAddress, value: bool);

    /// Register a namespace; the caller becomes its owner.
    fn register_namespace(
        &mut self,
        caller: ContractAddress,
        namespace: &str,
    ) -> Result<Felt, PermissionError> {
        ensure_valid(namespace)?;
        let hash = bytearray_hash(namespace);

        match self.resource(hash) {
            Resource::Unregistered => {}
            Resource::Namespace { .. } => {
                return Err(PermissionError::AlreadyRegistered {
                    selector: hash,
                    kind: "namespace",
                });
            }
            other => {
                return Err(PermissionError::Conflict {
                    selector: hash,
                    expected: "namespace",
                    found: other.kind_name(),
                });
            }
        }

        self.set_resource(
            hash,
            Resource::Namespace {
                name: namespace.to_string(),
            },
            namespace.to_string(),
        );
        self.set_owner(hash, caller, true);

        Ok(hash)
    }

    /// Register a model; the caller must own the namespace.
    fn register_model(
        &mut self,
        caller: ContractAddress,
        namespace: &str,
        name: &str,
        address: ContractAddress,
    ) -> Result<Felt, PermissionError> {
        register_scoped(self, caller, namespace, name, |namespace_hash| {
            Resource::Model {
                address,
                namespace_hash,
            }
        })
    }

    fn register_event(
        &mut self,
        caller: ContractAddress,
        namespace: &str,
        name: &str,
        address: ContractAddress,
    ) -> Result<Felt, PermissionError> {
        register_scoped(self, caller, namespace, name, |namespace_hash| {
            Resource::Event {
                address,
                namespace_hash,
            }
        })
    }

    fn register_contract(
        &mut self,
        caller: ContractAddress,
        namespace: &str,
        name: &str,
        address: ContractAddress,
    ) -> Result<Felt, PermissionError> {
        register_scoped(self, caller, namespace, name, |namespace_hash| {
            Resource::Contract {
                address,
                namespace_hash,
            }
        })
    }

    fn grant_owner(
        &mut self,
        caller: ContractAddress,
        resource: Felt,
        principal: ContractAddress,
    ) -> Result<(), PermissionError> {
        ensure_owner(&*self, caller, resource)?;
        self.set_owner(resource, principal, true);

        Ok(())
    }

    fn revoke_owner(
        &mut self,
        caller: ContractAddress,
        resource: Felt,
        principal: ContractAddress,
    ) -> Result<(), PermissionError> {
        ensure_owner(&*self, caller, resource)?;
        self.set_owner(resource, principal, false);

        Ok(())
    }

    fn grant_writer(
        &mut self,
        caller: ContractAddress,
        resource: Felt,
        principal: ContractAddress,
    ) -> Result<(), PermissionError> {
        ensure_owner(&*self, caller, resource)?;
        self.set_writer(resource, principal, true);

        Ok(())
    }

    fn revoke_writer(
        &mut self,
        caller: ContractAddress,
        resource: Felt,
        principal: ContractAddress,
    ) -> Result<(), PermissionError> {
        ensure_owner(&*self, caller, resource)?;
        self.set_writer(resource, principal, false);

        Ok(())
    }
}

fn ensure_valid(name: &str) -> Result<(), PermissionError> {
    if is_name_valid(name) {
        Ok(())
    } else {
        Err(PermissionError::InvalidName {
            name: name.to_string(),
        })
    }
}

// role changes need a registered resource and owner rights on it
fn ensure_owner<R: PermissionRegistry + ?Sized>(
    registry: &R,
    caller: ContractAddress,
    resource: Felt,
) -> Result<(), PermissionError> {
    if !registry.resource(resource).is_registered() {
        return Err(PermissionError::NotRegistered { selector: resource });
    }

    check_permission(registry, resource, caller, Permission::Owner)
}

fn register_scoped<R: PermissionRegistry + ?Sized>(
    registry: &mut R,
    caller: ContractAddress,
    namespace: &str,
    name: &str,
    make: impl FnOnce(Felt) -> Resource,
) -> Result<Felt, PermissionError> {
    ensure_valid(namespace)?;
    ensure_valid(name)?;

    let namespace_hash = bytearray_hash(namespace);
    match registry.resource(namespace_hash) {
        Resource::Namespace { .. } => {}
        Resource::Unregistered => {
            return Err(PermissionError::NotRegistered {
                selector: namespace_hash,
            });
        }
        other => {
            return Err(PermissionError::Conflict {
                selector: namespace_hash,
                expected: "namespace",
                found: other.kind_name(),
            });
        }
    }
    check_permission(&*registry, namespace_hash, caller, Permission::Owner)?;

    let selector = selector_from_hashes(namespace_hash, bytearray_hash(name));
    let existing = registry.resource(selector);
    if existing.is_registered() {
        return Err(PermissionError::AlreadyRegistered {
            selector,
            kind: existing.kind_name(),
        });
    }

    registry.set_resource(selector, make(namespace_hash), get_tag(namespace, name));

    Ok(selector)
}

///
/// ResourceRegistry
///
/// In-memory permission state. The world is registered at
/// [`WORLD_SELECTOR`] and owned by its creator.
///

#[derive(Clone, Debug)]
pub struct ResourceRegistry {
    resources: HashMap<Felt, Resource>,
    labels: HashMap<Felt, String>,
    owners: HashSet<(Felt, ContractAddress)>,
    writers: HashSet<(Felt, ContractAddress)>,
}

impl ResourceRegistry {
    #[must_use]
    pub fn new(creator: ContractAddress) -> Self {
        let mut registry = Self {
            resources: HashMap::new(),
            labels: HashMap::new(),
            owners: HashSet::new(),
            writers: HashSet::new(),
        };
        registry.set_resource(WORLD_SELECTOR, Resource::World, "world".to_string());
        registry.set_owner(WORLD_SELECTOR, creator, true);

        registry
    }

    /// Every registered selector with its resource, in no particular order.
    pub fn resources(&self) -> impl Iterator<Item = (&Felt, &Resource)> {
        self.resources.iter()
    }

    #[must_use]
    pub fn label(&self, selector: Felt) -> Option<&str> {
        self.labels.get(&selector).map(String::as_str)
    }
}

impl PermissionOracle for ResourceRegistry {
    fn is_owner(&self, resource: Felt, principal: ContractAddress) -> bool {
        self.owners.contains(&(resource, principal))
    }

    fn is_writer(&self, resource: Felt, principal: ContractAddress) -> bool {
        self.writers.contains(&(resource, principal))
    }

    fn resource(&self, selector: Felt) -> Resource {
        self.resources
            .get(&selector)
            .cloned()
            .unwrap_or(Resource::Unregistered)
    }

    fn describe(&self, selector: Felt) -> String {
        match (self.resources.get(&selector), self.labels.get(&selector)) {
            (Some(Resource::World), _) => "world".to_string(),
            (Some(resource), Some(label)) => format!("{} `{label}`", resource.kind_name()),
            _ => format!("resource {selector:#x}"),
        }
    }
}

impl PermissionRegistry for ResourceRegistry {
    fn set_resource(&mut self, selector: Felt, resource: Resource, label: String) {
        self.resources.insert(selector, resource);
        self.labels.insert(selector, label);
    }

    fn set_owner(&mut self, resource: Felt, principal: ContractAddress, value: bool) {
        if value {
            self.owners.insert((resource, principal));
        } else {
            self.owners.remove(&(resource, principal));
        }
    }

    fn set_writer(&mut self, resource: Felt, principal: ContractAddress, value: bool) {
        if value {
            self.writers.insert((resource, principal));
        } else {
            self.writers.remove(&(resource, principal));
        }
    }
}
