//! Router configuration — cache key layout.
//!
//! Every field has a default, so an empty TOML document is a valid configuration:
//!
//! ```toml
//! index_key = "router.index"   # cache key of the route index snapshot
//! key_prefix = "r."            # prefix of per-route cache keys
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::router::RouteId;

/// Default cache key of the route index snapshot.
pub const DEFAULT_INDEX_KEY: &str = "router.index";

/// Default prefix of per-route cache keys.
pub const DEFAULT_KEY_PREFIX: &str = "r.";

/// Errors produced while loading a [`RouterConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config field `{field}`: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

/// Cache key layout used by a [`Router`](crate::Router).
///
/// # Examples
///
/// ```
/// use rttp_router::RouterConfig;
///
/// let config = RouterConfig::new().with_index_key("app.routes").with_key_prefix("route.");
/// assert_eq!(config.index_key(), "app.routes");
///
/// let parsed = RouterConfig::from_toml_str(r#"key_prefix = "route.""#).unwrap();
/// assert_eq!(parsed.index_key(), "router.index");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RouterConfig {
    index_key: String,
    key_prefix: String,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            index_key: DEFAULT_INDEX_KEY.to_owned(),
            key_prefix: DEFAULT_KEY_PREFIX.to_owned(),
        }
    }
}

impl RouterConfig {
    /// Creates the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the cache key of the route index snapshot.
    pub fn with_index_key(mut self, key: impl Into<String>) -> Self {
        self.index_key = key.into();
        self
    }

    /// Sets the prefix of per-route cache keys.
    pub fn with_key_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.key_prefix = prefix.into();
        self
    }

    pub fn index_key(&self) -> &str {
        &self.index_key
    }

    pub fn key_prefix(&self) -> &str {
        &self.key_prefix
    }

    /// Derives the cache key for a template or request path.
    pub fn route_id(&self, value: &str) -> RouteId {
        RouteId::derive(&self.key_prefix, value)
    }

    /// Parses and validates a TOML document.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Parse`] on malformed TOML or unknown fields,
    /// [`ConfigError::Invalid`] if a key is empty.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a TOML file.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Io`] if the file cannot be read, otherwise as
    /// [`from_toml_str`](Self::from_toml_str).
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let source = fs::read_to_string(path)?;
        Self::from_toml_str(&source)
    }

    /// Checks that both keys are usable.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Invalid`] naming the first empty field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.index_key.is_empty() {
            return Err(ConfigError::Invalid {
                field: "index_key",
                reason: "must not be empty",
            });
        }
        if self.key_prefix.is_empty() {
            return Err(ConfigError::Invalid {
                field: "key_prefix",
                reason: "must not be empty",
            });
        }
        Ok(())
    }
}
