use crate::{
    config::ConfigError, index::IndexCorruption, meta::LayoutError, naming::NamingError,
    packing::PackingError, permission::PermissionError, serialize::SerdeError,
    storage::EntityStorageError, world::DispatchError,
};
use std::fmt;
use thiserror::Error as ThisError;

///
/// InternalError
///
/// Structured runtime error with a stable internal classification.
/// Every module error converts into this type at the world boundary.
///

#[derive(Debug, ThisError)]
#[error("{message}")]
pub struct InternalError {
    pub class: ErrorClass,
    pub origin: ErrorOrigin,
    pub message: String,

    /// Optional structured error detail.
    /// The variant (if present) must correspond to `origin`.
    pub detail: Option<ErrorDetail>,
}

impl InternalError {
    pub fn new(class: ErrorClass, origin: ErrorOrigin, message: impl Into<String>) -> Self {
        Self {
            class,
            origin,
            message: message.into(),
            detail: None,
        }
    }

    /// Construct a corruption error for a specific origin.
    pub(crate) fn corruption(origin: ErrorOrigin, message: impl Into<String>) -> Self {
        Self::new(ErrorClass::Corruption, origin, message.into())
    }

    /// Construct a world-origin invalid-input error.
    pub(crate) fn world_invalid_input(message: impl Into<String>) -> Self {
        Self::new(ErrorClass::InvalidInput, ErrorOrigin::World, message.into())
    }

    /// Construct a world-origin unsupported error.
    pub(crate) fn world_unsupported(message: impl Into<String>) -> Self {
        Self::new(ErrorClass::Unsupported, ErrorOrigin::World, message.into())
    }

    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        matches!(self.class, ErrorClass::Unauthorized)
    }

    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self.class, ErrorClass::NotFound)
    }

    /// Borrow the permission failure carried by this error, if any.
    #[must_use]
    pub const fn permission_detail(&self) -> Option<&PermissionError> {
        match &self.detail {
            Some(ErrorDetail::Permission(err)) => Some(err),
            _ => None,
        }
    }

    #[must_use]
    pub fn display_with_class(&self) -> String {
        format!("{}:{}: {}", self.origin, self.class, self.message)
    }
}

///
/// ErrorDetail
///
/// Structured, origin-specific error detail carried by [`InternalError`].
///

#[derive(Debug, ThisError)]
pub enum ErrorDetail {
    #[error("{0}")]
    Permission(PermissionError),

    #[error("{0}")]
    Packing(PackingError),
}

impl From<PermissionError> for InternalError {
    fn from(err: PermissionError) -> Self {
        let class = match &err {
            PermissionError::NotRegistered { .. } => ErrorClass::NotFound,
            PermissionError::Conflict { .. } | PermissionError::AlreadyRegistered { .. } => {
                ErrorClass::Conflict
            }
            PermissionError::InvalidName { .. } => ErrorClass::InvalidInput,
            PermissionError::Denied { .. } => ErrorClass::Unauthorized,
        };

        Self {
            class,
            origin: ErrorOrigin::Permission,
            message: err.to_string(),
            detail: Some(ErrorDetail::Permission(err)),
        }
    }
}

impl From<PackingError> for InternalError {
    fn from(err: PackingError) -> Self {
        let class = match &err {
            PackingError::WidthTooLarge { .. } => ErrorClass::Configuration,
            PackingError::ValueOverflow { .. } | PackingError::LengthMismatch { .. } => {
                ErrorClass::InvalidInput
            }
            PackingError::Truncated { .. } => ErrorClass::Corruption,
        };

        Self {
            class,
            origin: ErrorOrigin::Packing,
            message: err.to_string(),
            detail: Some(ErrorDetail::Packing(err)),
        }
    }
}

impl From<LayoutError> for InternalError {
    fn from(err: LayoutError) -> Self {
        Self::new(ErrorClass::Configuration, ErrorOrigin::Layout, err.to_string())
    }
}

impl From<SerdeError> for InternalError {
    fn from(err: SerdeError) -> Self {
        let class = match &err {
            SerdeError::UnexpectedEnd { .. } | SerdeError::InvalidByteArray { .. } => {
                ErrorClass::Corruption
            }
            _ => ErrorClass::InvalidInput,
        };

        Self::new(class, ErrorOrigin::Serialize, err.to_string())
    }
}

impl From<NamingError> for InternalError {
    fn from(err: NamingError) -> Self {
        Self::new(ErrorClass::InvalidInput, ErrorOrigin::World, err.to_string())
    }
}

impl From<IndexCorruption> for InternalError {
    fn from(err: IndexCorruption) -> Self {
        Self::corruption(ErrorOrigin::Index, err.to_string())
    }
}

impl From<EntityStorageError> for InternalError {
    fn from(err: EntityStorageError) -> Self {
        match err {
            EntityStorageError::Packing(inner) => inner.into(),
            EntityStorageError::InvalidLength { .. } | EntityStorageError::UnknownVariant { .. } => {
                Self::corruption(ErrorOrigin::Storage, err.to_string())
            }
            _ => Self::new(ErrorClass::InvalidInput, ErrorOrigin::Storage, err.to_string()),
        }
    }
}

impl From<DispatchError> for InternalError {
    fn from(err: DispatchError) -> Self {
        match err {
            DispatchError::Storage(inner) => inner.into(),
            DispatchError::Index(inner) => inner.into(),
            DispatchError::CannotDeleteMember => Self::world_unsupported(err.to_string()),
            DispatchError::BadMemberId { .. } | DispatchError::UnexpectedLayout { .. } => {
                Self::world_invalid_input(err.to_string())
            }
        }
    }
}

impl From<ConfigError> for InternalError {
    fn from(err: ConfigError) -> Self {
        Self::new(ErrorClass::Configuration, ErrorOrigin::Config, err.to_string())
    }
}

///
/// ErrorClass
/// Internal error taxonomy for runtime classification.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorClass {
    Configuration,
    Unauthorized,
    NotFound,
    Conflict,
    Corruption,
    Unsupported,
    InvalidInput,
}

impl fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Configuration => "configuration",
            Self::Unauthorized => "unauthorized",
            Self::NotFound => "not_found",
            Self::Conflict => "conflict",
            Self::Corruption => "corruption",
            Self::Unsupported => "unsupported",
            Self::InvalidInput => "invalid_input",
        };
        write!(f, "{label}")
    }
}

///
/// ErrorOrigin
/// Internal origin taxonomy for runtime classification.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorOrigin {
    Layout,
    Packing,
    Serialize,
    Storage,
    Index,
    Permission,
    World,
    Config,
}

impl fmt::Display for ErrorOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Layout => "layout",
            Self::Packing => "packing",
            Self::Serialize => "serialize",
            Self::Storage => "storage",
            Self::Index => "index",
            Self::Permission => "permission",
            Self::World => "world",
            Self::Config => "config",
        };
        write!(f, "{label}")
    }
}

///
/// TESTS
///
