//! Registry configuration from the process environment.
//!
//! This module manages registry access configuration with sensible defaults,
//! merging values from `REMO_*` environment variables. No files are read;
//! the environment is the only external source.

use crate::error::{RemoError, Result};
use config::{Config as ConfigRs, Environment};
use serde::{Deserialize, Serialize};


/// Environment variable prefix for all configuration keys.
const ENV_PREFIX: &str = "REMO";

/// Registry access configuration.
///
/// `username` and `password` each hold a comma-delimited list; entries are
/// paired positionally when credentials are aggregated, so the two lists
/// must stay the same length.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct RegistryConfig {
    /// Comma-delimited usernames (`REMO_USERNAME`).
    #[serde(default)]
    pub username: String,

    /// Comma-delimited passwords, paired with `username` (`REMO_PASSWORD`).
    #[serde(default)]
    pub password: String,

    /// Opaque registry token passed through unchanged (`REMO_REGISTRY_TOKEN`).
    #[serde(default)]
    pub registry_token: String,

    /// Allow plain-HTTP registry access (`REMO_NON_SSL`).
    #[serde(default)]
    pub non_ssl: bool,
}

impl RegistryConfig {
    /// Loads configuration from `REMO_*` process environment variables.
    ///
    /// Unset variables keep their defaults (empty strings, `false`).
    pub fn from_env() -> Result<Self> {
        Self::from_environment(Environment::with_prefix(ENV_PREFIX).try_parsing(true))
    }

    /// Loads configuration from the given environment source.
    ///
    /// Tests inject a prepared [`Environment`] here instead of mutating
    /// process-wide environment variables.
    pub fn from_environment(environment: Environment) -> Result<Self> {
        let defaults = ConfigRs::try_from(&RegistryConfig::default()).map_err(|e| {
            RemoError::config_with_source("Failed to collect configuration defaults", e)
        })?;

        ConfigRs::builder()
            .add_source(defaults)
            .add_source(environment)
            .build()
            .and_then(|cfg| cfg.try_deserialize())
            .map_err(|e| RemoError::config_with_source("Failed to deserialize configuration", e))
    }
}
