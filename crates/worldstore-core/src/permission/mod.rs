//! Permission gate over registered resources.
//!
//! A check walks a fixed precedence and stops at the first grant:
//! writer of the resource, owner of the resource, owner of the world, then
//! (for models, events and contracts only) writer and owner of the parent
//! namespace. Anything else is denied.

mod registry;


pub use registry::{PermissionRegistry, ResourceRegistry};

use crate::{
    felt::{ContractAddress, Felt},
    obs::sink::{self, MetricsEvent},
};
use std::fmt;
use thiserror::Error as ThisError;

/// Selector under which the world itself is registered.
pub const WORLD_SELECTOR: Felt = Felt::ZERO;

///
/// PermissionError
///

#[derive(Debug, Eq, PartialEq, ThisError)]
pub enum PermissionError {
    #[error("resource {selector:#x} is not registered")]
    NotRegistered { selector: Felt },

    #[error("resource {selector:#x} is registered as {found}, expected {expected}")]
    Conflict {
        selector: Felt,
        expected: &'static str,
        found: &'static str,
    },

    #[error("{kind} {selector:#x} is already registered")]
    AlreadyRegistered { selector: Felt, kind: &'static str },

    #[error("invalid resource name `{name}`")]
    InvalidName { name: String },

    #[error("account `{caller}` does NOT have {permission} role on {resource}")]
    Denied {
        caller: ContractAddress,
        permission: Permission,
        resource: String,
    },
}

///
/// Permission
///

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Permission {
    Owner,
    Writer,
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Owner => "OWNER",
            Self::Writer => "WRITER",
        };
        write!(f, "{label}")
    }
}

///
/// Resource
///
/// Kind of a registered selector, with the parent namespace where one exists.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Resource {
    Model {
        address: ContractAddress,
        namespace_hash: Felt,
    },
    Event {
        address: ContractAddress,
        namespace_hash: Felt,
    },
    Contract {
        address: ContractAddress,
        namespace_hash: Felt,
    },
    Namespace {
        name: String,
    },
    World,
    Unregistered,
}

impl Resource {
    /// Parent namespace of a model, event or contract.
    #[must_use]
    pub const fn namespace_hash(&self) -> Option<Felt> {
        match self {
            Self::Model { namespace_hash, .. }
            | Self::Event { namespace_hash, .. }
            | Self::Contract { namespace_hash, .. } => Some(*namespace_hash),
            _ => None,
        }
    }

    #[must_use]
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Self::Model { .. } => "model",
            Self::Event { .. } => "event",
            Self::Contract { .. } => "contract",
            Self::Namespace { .. } => "namespace",
            Self::World => "world",
            Self::Unregistered => "unregistered",
        }
    }

    #[must_use]
    pub const fn is_registered(&self) -> bool {
        !matches!(self, Self::Unregistered)
    }
}

///
/// PermissionOracle
///
/// Read side of the permission state.
///

pub trait PermissionOracle {
    fn is_owner(&self, resource: Felt, principal: ContractAddress) -> bool;

    fn is_writer(&self, resource: Felt, principal: ContractAddress) -> bool;

    fn resource(&self, selector: Felt) -> Resource;

    /// Human-readable descriptor used in denial messages.
    fn describe(&self, selector: Felt) -> String {
        match self.resource(selector) {
            Resource::World => "world".to_string(),
            Resource::Namespace { name } => format!("namespace `{name}`"),
            resource => format!("{} {selector:#x}", resource.kind_name()),
        }
    }
}

/// Check that `caller` holds `permission` on `resource`.
///
/// Precedence, first grant wins:
/// 1. writer of the resource (writer checks only)
/// 2. owner of the resource
/// 3. owner of the world
/// 4. writer of the parent namespace (writer checks only)
/// 5. owner of the parent namespace
///
/// Steps 4 and 5 exist only for models, events and contracts. An
/// unregistered resource that reaches them fails as not registered.
pub fn check_permission<O: PermissionOracle + ?Sized>(
    oracle: &O,
    resource: Felt,
    caller: ContractAddress,
    permission: Permission,
) -> Result<(), PermissionError> {
    let result = evaluate(oracle, resource, caller, permission);

    if result.is_err() {
        sink::record(MetricsEvent::PermissionDenied { resource });
    }

    result
}

/// Non-failing form of [`check_permission`].
#[must_use]
pub fn has_permission<O: PermissionOracle + ?Sized>(
    oracle: &O,
    resource: Felt,
    caller: ContractAddress,
    permission: Permission,
) -> bool {
    evaluate(oracle, resource, caller, permission).is_ok()
}

fn evaluate<O: PermissionOracle + ?Sized>(
    oracle: &O,
    resource: Felt,
    caller: ContractAddress,
    permission: Permission,
) -> Result<(), PermissionError> {
    let writer = permission == Permission::Writer;

    if writer && oracle.is_writer(resource, caller) {
        return Ok(());
    }
    if oracle.is_owner(resource, caller) {
        return Ok(());
    }
    if oracle.is_owner(WORLD_SELECTOR, caller) {
        return Ok(());
    }

    let namespace_hash = match oracle.resource(resource) {
        Resource::Unregistered => {
            return Err(PermissionError::NotRegistered { selector: resource });
        }
        found => found
            .namespace_hash()
            .ok_or_else(|| denied(oracle, resource, caller, permission))?,
    };

    if writer && oracle.is_writer(namespace_hash, caller) {
        return Ok(());
    }
    if oracle.is_owner(namespace_hash, caller) {
        return Ok(());
    }

    Err(denied(oracle, resource, caller, permission))
}

fn denied<O: PermissionOracle + ?Sized>(
    oracle: &O,
    resource: Felt,
    caller: ContractAddress,
    permission: Permission,
) -> PermissionError {
    PermissionError::Denied {
        caller,
        permission,
        resource: oracle.describe(resource),
    }
}
