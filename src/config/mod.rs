//! Application configuration.
//!
//! Loaded from `netgrid.toml` (section files mirror the TOML layout),
//! overridden by CLI arguments, then installed into the global handle.

mod defaults;
mod error;
mod handle;
mod page;
mod serve;
mod ui;

pub use error::ConfigError;
pub use handle::{cfg, init_config};
pub use page::PageConfig;
pub use serve::ServeConfig;
pub use ui::{UiConfig, ViewMode};

use crate::cli::{Cli, Commands};
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};

/// Root configuration for the panel server.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    /// `[ui]` - gallery presentation.
    #[serde(default)]
    pub ui: UiConfig,

    /// `[serve]` - server bind settings.
    #[serde(default)]
    pub serve: ServeConfig,

    /// `[[pages]]` - asset categories, one tab each.
    #[serde(default)]
    pub pages: Vec<PageConfig>,
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let content =
            fs::read_to_string(path).map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;
        let config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Apply CLI overrides on top of file values.
    pub fn update_with_cli(&mut self, cli: &Cli) {
        if let Commands::Serve { interface, port } = &cli.command {
            if let Some(interface) = interface {
                self.serve.interface = interface.clone();
            }
            if let Some(port) = port {
                self.serve.port = *port;
            }
        }
    }

    /// Validate cross-field constraints not expressible in serde.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.pages.is_empty() {
            return Err(ConfigError::Validation(
                "no [[pages]] configured; nothing to browse".into(),
            ));
        }

        for page in &self.pages {
            if page.title.trim().is_empty() {
                return Err(ConfigError::Validation("page with empty title".into()));
            }
            if page.directories.is_empty() {
                return Err(ConfigError::Validation(format!(
                    "page `{}` has no directories",
                    page.title
                )));
            }
        }

        Ok(())
    }
}
