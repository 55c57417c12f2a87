//! Configuration types for mirage.
//!
//! A YAML file supplies the base values; command-line flags and environment
//! variables, collected into [`Overrides`], take precedence.

mod listen;
mod storage;

use std::path::Path;

use serde::{Deserialize, Serialize};

pub use listen::{ListenConfig, LogFormat, LoggingConfig};
pub use storage::{StorageConfig, WorkspacesConfig, IN_MEMORY_PATH};

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub listen: ListenConfig,
    #[serde(default)]
    pub workspaces: WorkspacesConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Values from the command line or environment. `None` keeps the file value.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub workspaces: Option<bool>,
    pub store_path: Option<String>,
    pub log_format: Option<LogFormat>,
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, anyhow::Error> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml(&contents)
    }

    pub fn from_yaml(contents: &str) -> Result<Self, anyhow::Error> {
        let config: Config = serde_yaml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Layer overrides on top of this config and re-validate.
    pub fn with_overrides(mut self, overrides: Overrides) -> Result<Self, anyhow::Error> {
        if let Some(host) = overrides.host {
            self.listen.host = host;
        }
        if let Some(port) = overrides.port {
            self.listen.port = port;
        }
        if let Some(enabled) = overrides.workspaces {
            self.workspaces.enabled = enabled;
        }
        if let Some(path) = overrides.store_path {
            self.storage.path = Some(path);
        }
        if let Some(format) = overrides.log_format {
            self.logging.format = format;
        }
        self.validate()?;
        Ok(self)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.listen.port == 0 {
            anyhow::bail!("listen.port must be greater than 0");
        }
        if self.listen.host.trim().is_empty() {
            anyhow::bail!("listen.host cannot be empty");
        }
        if let Some(path) = &self.storage.path {
            if path.trim().is_empty() {
                anyhow::bail!(
                    "storage.path cannot be empty; omit it or use '{}' for in-memory storage",
                    IN_MEMORY_PATH
                );
            }
        }
        Ok(())
    }
}
