//! YAML configuration: named servers plus global rsync defaults.

use crate::deployer::RsyncDeployer;
use crate::error::{Error, Result};
use crate::paths;
use crate::registry::Plum;
use crate::server::Server;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlumConfig {
    /// Options for the rsync deployer when a server sets none.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rsync_options: Option<String>,
    /// Local directory to transfer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default)]
    pub servers: BTreeMap<String, Server>,
}

/// A configuration together with the file it was read from.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub path: PathBuf,
    pub config: PlumConfig,
}

/// Parse configuration from a YAML string.
///
/// `origin` only labels errors.
pub fn from_str(content: &str, origin: &str) -> Result<PlumConfig> {
    // An empty file is an empty configuration, not a YAML error.
    if content.trim().is_empty() {
        return Ok(PlumConfig::default());
    }
    serde_yml::from_str(content).map_err(|e| Error::config_invalid_yaml(origin, e))
}

pub fn load_file(path: &Path) -> Result<PlumConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        Error::internal_io(e.to_string(), Some(format!("read {}", path.display())))
    })?;
    from_str(&content, &path.display().to_string())
}

/// Find and load the configuration file.
///
/// See [`paths::config_candidates`] for the lookup order. An explicit path
/// that does not exist is an error rather than a fallback.
pub fn load(explicit: Option<&str>) -> Result<LoadedConfig> {
    let candidates = paths::config_candidates(explicit);

    for path in &candidates {
        if path.is_file() {
            log_status!("config", "Using {}", path.display());
            let config = load_file(path)?;
            return Ok(LoadedConfig {
                path: path.clone(),
                config,
            });
        }
    }

    Err(Error::config_missing_file(
        candidates
            .iter()
            .map(|p| p.display().to_string())
            .collect(),
    ))
}

impl PlumConfig {
    /// Build the registry: every configured server plus the rsync deployer.
    ///
    /// Servers are validated here so a broken entry is reported by name.
    pub fn into_registry(self) -> Result<Plum> {
        let mut plum = Plum::new();

        let rsync = match self.rsync_options.filter(|o| !o.trim().is_empty()) {
            Some(options) => RsyncDeployer::new().with_default_options(options),
            None => RsyncDeployer::new(),
        };
        plum.add_deployer(Box::new(rsync));

        for (name, server) in self.servers {
            plum.add_server(name, server)?;
        }

        Ok(plum)
    }
}
