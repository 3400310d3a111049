//! CLI configuration file handling.

use anyhow::{Context, Result};
use directories::ProjectDirs;
use quickplay::{CacheConfig, QuickplayConfig};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::output::OutputFormat;

/// CLI configuration, read from a TOML file.
///
/// Every field is optional; a missing file means defaults. The service and
/// cache sections are the library's own config types, so anything the
/// library can be tuned with can be set here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Steam Web API key
    pub api_key: Option<String>,

    /// Default output format
    pub output_format: Option<OutputFormat>,

    /// Path to the curated blacklist file
    #[serde(default = "default_blacklist")]
    pub blacklist: PathBuf,

    /// Path to the curated greylist file
    #[serde(default = "default_greylist")]
    pub greylist: PathBuf,

    /// Pipeline tuning: catalog filter, fetch cap, probe timeout
    #[serde(default)]
    pub service: QuickplayConfig,

    /// Cache backend and freshness windows
    #[serde(default)]
    pub cache: CacheConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            output_format: None,
            blacklist: default_blacklist(),
            greylist: default_greylist(),
            service: QuickplayConfig::default(),
            cache: CacheConfig::default(),
        }
    }
}

// Default value functions for serde.
fn default_blacklist() -> PathBuf {
    PathBuf::from("blacklist.json")
}

fn default_greylist() -> PathBuf {
    PathBuf::from("greylist.json")
}

impl AppConfig {
    /// Returns the default config file path.
    pub fn path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("org", "truequickplay", "qplay")
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;
        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Loads configuration.
    ///
    /// With an explicit path the file must exist and parse; at the default
    /// path a missing file quietly yields defaults.
    pub fn load(override_path: Option<&Path>) -> Result<Self> {
        if let Some(path) = override_path {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("could not read config file {}", path.display()))?;
            return toml::from_str(&content)
                .with_context(|| format!("could not parse config file {}", path.display()));
        }

        let path = Self::path()?;
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("could not read config file {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("could not parse config file {}", path.display()))
    }
}
