//! Merge rules: defaults, override order.
//!
//! Order (lowest to highest): built-in defaults, global file, `--config` file,
//! environment.

use config::Config;
use config::ConfigBuilder;
use config::ConfigError;

/// Production endpoint of the redirection service.
pub const DEFAULT_ENDPOINT: &str = "https://secure-provisioning.snom.com:8083/xmlrpc/";

/// Create a Config builder with merge policy defaults applied.
pub fn builder_with_defaults() -> Result<ConfigBuilder<config::builder::DefaultState>, ConfigError>
{
    Config::builder()
        .set_default("service.endpoint", DEFAULT_ENDPOINT)?
        .set_default("service.accept_invalid_certs", true)?
        .set_default("service.connect_timeout_secs", 10)?
        .set_default("service.request_timeout_secs", 60)
}
