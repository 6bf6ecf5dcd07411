use crate::error::{Error, Result};
use std::env;
use std::path::PathBuf;

/// Configuration file name looked up in the working directory and config dir
pub const CONFIG_FILE: &str = "plum.yml";

/// Environment variable overriding the configuration file location
pub const CONFIG_ENV: &str = "PLUM_CONFIG";

/// Base plum config directory (~/.config/plum/ on Unix, %APPDATA%\plum on Windows)
pub fn plum() -> Result<PathBuf> {
    #[cfg(windows)]
    {
        let appdata = env::var("APPDATA").map_err(|_| {
            Error::internal_unexpected(
                "APPDATA environment variable not set on Windows".to_string(),
            )
        })?;
        Ok(PathBuf::from(appdata).join("plum"))
    }

    #[cfg(not(windows))]
    {
        let home = env::var("HOME").map_err(|_| {
            Error::internal_unexpected(
                "HOME environment variable not set on Unix-like system".to_string(),
            )
        })?;
        Ok(PathBuf::from(home).join(".config").join("plum"))
    }
}

/// Global plum.yml path
pub fn global_config() -> Result<PathBuf> {
    Ok(plum()?.join(CONFIG_FILE))
}

/// Project-local plum.yml path (relative to the working directory)
pub fn local_config() -> PathBuf {
    PathBuf::from(CONFIG_FILE)
}

/// Candidate configuration files in lookup order.
///
/// An explicit path wins, then `PLUM_CONFIG`, then `./plum.yml`, then the
/// global file. The global entry is skipped when no home directory is known.
pub fn config_candidates(explicit: Option<&str>) -> Vec<PathBuf> {
    if let Some(path) = explicit {
        return vec![PathBuf::from(shellexpand::tilde(path).to_string())];
    }

    let mut candidates = Vec::new();
    if let Ok(path) = env::var(CONFIG_ENV) {
        if !path.is_empty() {
            candidates.push(PathBuf::from(shellexpand::tilde(&path).to_string()));
        }
    }
    candidates.push(local_config());
    if let Ok(path) = global_config() {
        candidates.push(path);
    }
    candidates
}
