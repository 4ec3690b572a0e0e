//! World configuration.
//!
//! Loaded from TOML; every key is optional and unknown keys are rejected.
//!
//! ```toml
//! storage_domain = 0
//! index_domain = 0
//! zero_stale_index_slots = true
//! max_array_length = 4096
//! ```

use crate::{DEFAULT_STORAGE_DOMAIN, MAX_ARRAY_LENGTH, index::Index, storage::EntityStorage};
use serde::{Deserialize, Serialize};
use std::{fs, io, path::Path};
use thiserror::Error as ThisError;

///
/// ConfigError
///

#[derive(Debug, ThisError)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config value for `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

///
/// WorldConfig
///

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct WorldConfig {
    /// Address domain for entity records.
    pub storage_domain: u32,

    /// Address domain for the entity index.
    pub index_domain: u32,

    /// Zero the vacated last index slot after a swap-delete.
    pub zero_stale_index_slots: bool,

    pub max_array_length: u32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            storage_domain: DEFAULT_STORAGE_DOMAIN,
            index_domain: DEFAULT_STORAGE_DOMAIN,
            zero_stale_index_slots: false,
            max_array_length: MAX_ARRAY_LENGTH,
        }
    }
}

impl WorldConfig {
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;

        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let source = fs::read_to_string(path)?;

        Self::from_toml_str(&source)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_array_length == 0 {
            return Err(ConfigError::Invalid {
                field: "max_array_length",
                reason: "must be greater than zero".to_string(),
            });
        }

        Ok(())
    }

    #[must_use]
    pub const fn entity_storage(&self) -> EntityStorage {
        EntityStorage::new(self.storage_domain).with_max_array_length(self.max_array_length)
    }

    #[must_use]
    pub const fn index(&self) -> Index {
        Index::new(self.index_domain).with_zero_stale_slots(self.zero_stale_index_slots)
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_source_is_default() {
        assert_eq!(WorldConfig::from_toml_str("").unwrap(), WorldConfig::default());
    }

    #[test]
    fn partial_source_keeps_defaults() {
        let config = WorldConfig::from_toml_str(
            r"
            index_domain = 7
            zero_stale_index_slots = true
            ",
        )
        .unwrap();

        assert_eq!(config.index_domain, 7);
        assert!(config.zero_stale_index_slots);
        assert_eq!(config.storage_domain, DEFAULT_STORAGE_DOMAIN);
        assert_eq!(config.max_array_length, MAX_ARRAY_LENGTH);
        assert_eq!(config.index().domain(), 7);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = WorldConfig::from_toml_str("storage_domian = 1").unwrap_err();

        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn zero_array_length_is_invalid() {
        let err = WorldConfig::from_toml_str("max_array_length = 0").unwrap_err();

        assert!(matches!(
            err,
            ConfigError::Invalid {
                field: "max_array_length",
                ..
            }
        ));
    }

    #[test]
    fn config_serializes_as_json() {
        let json = serde_json::to_value(WorldConfig::default()).unwrap();

        assert_eq!(json["storage_domain"], 0);
        assert_eq!(json["zero_stale_index_slots"], false);
    }
}
