use crate::error::{Error, Result};
use crate::utils::shell;
use serde::{Deserialize, Serialize};

/// A deployment target reachable over SSH.
///
/// Fields are read-only once the server is built; the name is assigned by
/// the registry from the configuration key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Server {
    #[serde(skip_deserializing, default)]
    name: String,
    host: String,
    #[serde(default = "default_port")]
    port: u16,
    user: String,
    dir: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    excludes: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    exclude_from: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    identity_file: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    rsync_options: Option<String>,
}

fn default_port() -> u16 {
    22
}

impl Server {
    pub fn new(
        host: impl Into<String>,
        user: impl Into<String>,
        dir: impl Into<String>,
        port: Option<u16>,
    ) -> Self {
        Self {
            name: String::new(),
            host: host.into(),
            port: port.unwrap_or_else(default_port),
            user: user.into(),
            dir: dir.into(),
            excludes: Vec::new(),
            exclude_from: None,
            identity_file: None,
            rsync_options: None,
        }
    }

    pub fn with_excludes(mut self, excludes: Vec<String>) -> Self {
        self.excludes = excludes;
        self
    }

    pub fn with_exclude_from(mut self, path: impl Into<String>) -> Self {
        self.exclude_from = Some(path.into());
        self
    }

    pub fn with_identity_file(mut self, path: impl Into<String>) -> Self {
        self.identity_file = Some(path.into());
        self
    }

    pub fn with_rsync_options(mut self, options: impl Into<String>) -> Self {
        self.rsync_options = Some(options.into());
        self
    }

    pub(crate) fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn user(&self) -> &str {
        &self.user
    }

    pub fn dir(&self) -> &str {
        &self.dir
    }

    pub fn excludes(&self) -> &[String] {
        &self.excludes
    }

    pub fn rsync_options(&self) -> Option<&str> {
        self.rsync_options.as_deref()
    }

    /// Identity file with `~` expanded, if one is configured.
    pub fn identity_file(&self) -> Option<String> {
        self.identity_file
            .as_deref()
            .filter(|path| !path.is_empty())
            .map(|path| shellexpand::tilde(path).to_string())
    }

    /// Fail when a configured identity file does not exist.
    pub fn check_identity_file(&self) -> Result<()> {
        match self.identity_file() {
            Some(path) if !std::path::Path::new(&path).exists() => {
                Err(Error::ssh_identity_file_not_found(self.name.clone(), path))
            }
            _ => Ok(()),
        }
    }

    /// Remote shell passed to rsync's `-e`.
    pub fn ssh_info(&self) -> String {
        let mut ssh = format!("ssh -p {}", self.port);
        if let Some(identity_file) = self.identity_file() {
            ssh.push_str(" -i ");
            ssh.push_str(&shell::quote_arg(&identity_file));
        }
        ssh
    }

    /// Login and remote directory in rsync destination form (`user@host:dir`).
    pub fn login_info(&self) -> String {
        format!("{}@{}:{}", self.user, self.host, self.dir)
    }

    /// rsync exclude arguments, or an empty string when nothing is excluded.
    pub fn exclude_info(&self) -> String {
        let mut args: Vec<String> = self
            .excludes
            .iter()
            .map(|pattern| format!("--exclude={}", shell::quote_arg(pattern)))
            .collect();

        if let Some(path) = self.exclude_from.as_deref().filter(|p| !p.is_empty()) {
            args.push(format!("--exclude-from={}", shell::quote_path(path)));
        }

        args.join(" ")
    }

    pub fn validate(&self) -> Result<()> {
        let mut missing = Vec::new();
        if self.host.trim().is_empty() {
            missing.push("host".to_string());
        }
        if self.user.trim().is_empty() {
            missing.push("user".to_string());
        }
        if self.dir.trim().is_empty() {
            missing.push("dir".to_string());
        }
        if self.port == 0 {
            missing.push("port".to_string());
        }

        if missing.is_empty() {
            Ok(())
        } else {
            Err(Error::ssh_server_invalid(self.name.clone(), missing))
        }
    }
}
