use std::collections::BTreeMap;

use crate::deployer::{DeployOptions, DeployReport, Deployer};
use crate::error::{Error, Result};
use crate::server::Server;
use crate::similar;

/// Name of the deployer used when none is requested.
pub const DEFAULT_DEPLOYER: &str = "rsync";

/// Named servers and deployers.
///
/// Filled once from configuration, then only queried.
#[derive(Default)]
pub struct Plum {
    servers: BTreeMap<String, Server>,
    deployers: BTreeMap<String, Box<dyn Deployer>>,
}

impl Plum {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a server under `name`, replacing any previous entry.
    pub fn add_server(&mut self, name: impl Into<String>, server: Server) -> Result<()> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(Error::validation_invalid_argument(
                "server",
                "Server name cannot be empty",
                None,
            ));
        }

        let server = server.named(name.clone());
        server.validate()?;
        self.servers.insert(name, server);
        Ok(())
    }

    pub fn add_deployer(&mut self, deployer: Box<dyn Deployer>) {
        self.deployers.insert(deployer.name().to_string(), deployer);
    }

    pub fn has_server(&self, name: &str) -> bool {
        self.servers.contains_key(name)
    }

    pub fn server(&self, name: &str) -> Result<&Server> {
        self.servers.get(name).ok_or_else(|| {
            Error::server_not_found(
                name,
                similar::find_similar(name, self.servers.keys().map(String::as_str)),
            )
        })
    }

    pub fn servers(&self) -> impl Iterator<Item = &Server> {
        self.servers.values()
    }

    pub fn server_names(&self) -> Vec<String> {
        self.servers.keys().cloned().collect()
    }

    pub fn deployer(&self, name: &str) -> Result<&dyn Deployer> {
        self.deployers
            .get(name)
            .map(|d| d.as_ref())
            .ok_or_else(|| {
                Error::deployer_not_found(
                    name,
                    similar::find_similar(name, self.deployers.keys().map(String::as_str)),
                )
            })
    }

    /// Deploy to a named server with a named deployer.
    ///
    /// Both names are resolved before the deployer runs, so an unknown
    /// server never reaches a subprocess.
    pub fn deploy(
        &self,
        server: &str,
        deployer: &str,
        options: &DeployOptions,
    ) -> Result<DeployReport> {
        let server = self.server(server)?;
        let deployer = self.deployer(deployer)?;
        deployer.deploy(server, options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    struct CountingDeployer {
        calls: Rc<Cell<usize>>,
    }

    impl Deployer for CountingDeployer {
        fn name(&self) -> &str {
            "counting"
        }

        fn deploy(&self, server: &Server, options: &DeployOptions) -> Result<DeployReport> {
            self.calls.set(self.calls.get() + 1);
            Ok(DeployReport {
                deployer: "counting".to_string(),
                server: server.name().to_string(),
                command: server.login_info(),
                dry_run: options.dry_run,
                exit_code: 0,
                success: true,
                stdout: None,
                stderr: None,
            })
        }
    }

    fn registry(calls: Rc<Cell<usize>>) -> Plum {
        let mut plum = Plum::new();
        plum.add_server(
            "production",
            Server::new("www.mywebsite.com", "julien", "/var/www/sfblog/", None),
        )
        .unwrap();
        plum.add_server(
            "staging",
            Server::new("staging.mywebsite.com", "deploy", "/srv/staging", Some(2200)),
        )
        .unwrap();
        plum.add_deployer(Box::new(CountingDeployer { calls }));
        plum
    }

    #[test]
    fn lookup_returns_configured_values() {
        let plum = registry(Rc::new(Cell::new(0)));
        let staging = plum.server("staging").unwrap();
        assert_eq!(staging.name(), "staging");
        assert_eq!(staging.host(), "staging.mywebsite.com");
        assert_eq!(staging.port(), 2200);
        assert_eq!(staging.user(), "deploy");
        assert_eq!(staging.dir(), "/srv/staging");
        assert!(plum.has_server("production"));
        assert_eq!(plum.server_names(), vec!["production", "staging"]);
    }

    #[test]
    fn unknown_server_suggests_similar_names() {
        let plum = registry(Rc::new(Cell::new(0)));
        let err = plum.server("prod").unwrap_err();
        assert_eq!(err.code, crate::ErrorCode::ServerNotFound);
        assert_eq!(err.details["suggestions"][0], "production");
    }

    #[test]
    fn unknown_server_never_reaches_deployer() {
        let calls = Rc::new(Cell::new(0));
        let plum = registry(calls.clone());
        let err = plum
            .deploy("missing", "counting", &DeployOptions::default())
            .unwrap_err();
        assert_eq!(err.code, crate::ErrorCode::ServerNotFound);
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn unknown_deployer_is_an_error() {
        let plum = registry(Rc::new(Cell::new(0)));
        let err = plum
            .deploy("production", "ftp", &DeployOptions::default())
            .unwrap_err();
        assert_eq!(err.code, crate::ErrorCode::DeployerNotFound);
    }

    #[test]
    fn deploy_hands_server_to_deployer() {
        let calls = Rc::new(Cell::new(0));
        let plum = registry(calls.clone());
        let report = plum
            .deploy("production", "counting", &DeployOptions::default())
            .unwrap();
        assert_eq!(calls.get(), 1);
        assert_eq!(report.server, "production");
        assert_eq!(report.command, "julien@www.mywebsite.com:/var/www/sfblog/");
    }

    #[test]
    fn invalid_server_is_rejected_on_add() {
        let mut plum = Plum::new();
        let err = plum
            .add_server("broken", Server::new("host", "", "/srv", None))
            .unwrap_err();
        assert_eq!(err.code, crate::ErrorCode::SshServerInvalid);
        assert!(!plum.has_server("broken"));
    }
}
