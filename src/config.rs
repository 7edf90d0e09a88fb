//! Editor configuration.
//!
//! Every key is optional when loading from JSON; missing keys take the
//! defaults below.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use serde::Deserialize;

pub const DEFAULT_STORAGE_KEY: &str = "learningBuilder";
pub const DEFAULT_CONTAINERS: [&str; 2] = ["left", "right"];
pub const DEFAULT_REPLY_DELAY_MS: u64 = 500;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid config json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("storage key must not be empty")]
    EmptyStorageKey,
    #[error("at least one container is required")]
    NoContainers,
    #[error("container names must be non-empty")]
    EmptyContainerName,
    #[error("duplicate container name: {0}")]
    DuplicateContainer(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct BuilderConfig {
    /// Key the project blob is stored under.
    pub storage_key: String,
    /// Drop targets, in page order.
    pub containers: Vec<String>,
    /// Delay the host waits before showing an assistant reply.
    pub reply_delay_ms: u64,
}

impl Default for BuilderConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_owned(),
            containers: DEFAULT_CONTAINERS.iter().map(|&name| name.to_owned()).collect(),
            reply_delay_ms: DEFAULT_REPLY_DELAY_MS,
        }
    }
}

impl BuilderConfig {
    /// Parse and validate a JSON config object.
    ///
    /// # Errors
    ///
    /// Returns `Json` for malformed input, or the first validation failure.
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Check the invariants the editor relies on.
    ///
    /// # Errors
    ///
    /// Returns the first violated rule.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.storage_key.trim().is_empty() {
            return Err(ConfigError::EmptyStorageKey);
        }
        if self.containers.is_empty() {
            return Err(ConfigError::NoContainers);
        }
        for (i, name) in self.containers.iter().enumerate() {
            if name.trim().is_empty() {
                return Err(ConfigError::EmptyContainerName);
            }
            if self.containers[..i].contains(name) {
                return Err(ConfigError::DuplicateContainer(name.clone()));
            }
        }
        Ok(())
    }
}
