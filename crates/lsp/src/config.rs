//! Server settings read from `initializationOptions`.

use serde::Deserialize;
use tracing::warn;

pub const DEFAULT_PREFIX: &str = "example";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ServerConfig {
    /// First segment of every namespace id, `<prefix>.storage.<Contract>`.
    pub namespace_prefix: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            namespace_prefix: DEFAULT_PREFIX.to_owned(),
        }
    }
}

impl ServerConfig {
    /// Settings from the client's `initializationOptions`. Missing or
    /// malformed options fall back to the defaults.
    pub fn from_initialization_options(options: Option<serde_json::Value>) -> Self {
        let Some(options) = options else {
            return ServerConfig::default();
        };
        if options.is_null() {
            return ServerConfig::default();
        }
        match serde_json::from_value::<ServerConfig>(options) {
            Ok(config) if config.namespace_prefix.trim().is_empty() => {
                warn!("empty namespacePrefix, using {DEFAULT_PREFIX:?}");
                ServerConfig::default()
            }
            Ok(config) => config,
            Err(e) => {
                warn!(error = %e, "ignoring malformed initializationOptions");
                ServerConfig::default()
            }
        }
    }
}
