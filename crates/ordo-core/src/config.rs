use serde::{Deserialize, Serialize};
use std::path::Path;

use ordo_util::errors::OrdoError;

use crate::behavior::DependencyBehavior;

/// File name searched for when no config path is given.
pub const CONFIG_FILE_NAME: &str = "Ordo.toml";

/// User configuration loaded from `Ordo.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrdoConfig {
    #[serde(default)]
    pub resolver: ResolverConfig,
}

/// Resolver settings from `[resolver]`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResolverConfig {
    #[serde(default, rename = "dependency-behavior")]
    pub dependency_behavior: DependencyBehavior,
    /// Upper bound on solver moves before giving up.
    #[serde(default, rename = "max-steps")]
    pub max_steps: Option<u64>,
}

impl OrdoConfig {
    /// Parse a config from a TOML string.
    pub fn parse_toml(content: &str) -> miette::Result<Self> {
        toml::from_str(content).map_err(|e| {
            OrdoError::Config {
                message: format!("Failed to parse config: {e}"),
            }
            .into()
        })
    }

    /// Load and parse a config file.
    pub fn from_path(path: &Path) -> miette::Result<Self> {
        let content = ordo_util::fs::read_text(path, "config")?;
        Self::parse_toml(&content)
    }

    /// Load the nearest `Ordo.toml` at or above `start`, or return defaults if there is none.
    pub fn discover(start: &Path) -> miette::Result<Self> {
        match ordo_util::fs::find_file_upwards(start, CONFIG_FILE_NAME) {
            Some(path) => {
                tracing::debug!("Using config {}", path.display());
                Self::from_path(&path)
            }
            None => Ok(Self::default()),
        }
    }
}
