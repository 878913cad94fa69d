//! Configuration System
//!
//! Layered configuration for the console: built-in defaults, the global config
//! file, an optional explicit file, then `REDIRECT_CONSOLE__*` environment
//! overrides. Operator defaults (username, default URL) are not configuration;
//! they live in the settings file, see [`crate::settings`].

use crate::error::ConfigError;
use crate::logging::LoggingConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

mod merge {
    pub mod merge_policy;
}
mod sources {
    pub mod environment;
    pub mod explicit_file;
    pub mod global_file;
}

pub use merge::merge_policy::DEFAULT_ENDPOINT;
pub use sources::environment::ENV_PREFIX;
pub use sources::global_file::global_config_path;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConsoleConfig {
    /// Redirection service connection
    #[serde(default)]
    pub service: ServiceConfig,

    /// Settings file location (defaults to ~/.redirect-console)
    #[serde(default)]
    pub settings_file: Option<PathBuf>,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Connection to the redirection service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// XML-RPC endpoint URL
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Skip TLS certificate verification
    #[serde(default = "default_true")]
    pub accept_invalid_certs: bool,

    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

fn default_true() -> bool {
    true
}

fn default_connect_timeout() -> u64 {
    10
}

fn default_request_timeout() -> u64 {
    60
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            accept_invalid_certs: default_true(),
            connect_timeout_secs: default_connect_timeout(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

impl ServiceConfig {
    pub fn validate(&self) -> Result<(), String> {
        if !(self.endpoint.starts_with("https://") || self.endpoint.starts_with("http://")) {
            return Err(format!(
                "service.endpoint must be an http(s) URL, got {:?}",
                self.endpoint
            ));
        }
        if self.connect_timeout_secs == 0 || self.request_timeout_secs == 0 {
            return Err("service timeouts must be greater than zero".to_string());
        }
        Ok(())
    }
}

impl ConsoleConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.service.validate().map_err(ConfigError::Invalid)?;
        self.logging.validate().map_err(ConfigError::Invalid)?;
        Ok(())
    }
}

/// Loads [`ConsoleConfig`] from the layered sources.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load defaults, the global file (if present), `explicit` (if given) and the
    /// environment.
    pub fn load(explicit: Option<&Path>) -> Result<ConsoleConfig, ConfigError> {
        let builder = merge::merge_policy::builder_with_defaults()?;
        let mut builder = sources::global_file::add_to_builder(builder)?;
        if let Some(path) = explicit {
            builder = sources::explicit_file::add_to_builder(builder, path)?;
        }
        let builder = sources::environment::add_to_builder(builder)?;
        Self::finish(builder)
    }

    /// Load defaults and `path` only, ignoring the global file and environment.
    pub fn load_from_file(path: &Path) -> Result<ConsoleConfig, ConfigError> {
        let builder = merge::merge_policy::builder_with_defaults()?;
        let builder = sources::explicit_file::add_to_builder(builder, path)?;
        Self::finish(builder)
    }

    fn finish(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> Result<ConsoleConfig, ConfigError> {
        let config: ConsoleConfig = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }
}
