// Public modules
pub mod config;
pub mod deployer;
pub mod error;
pub mod executor;
pub mod registry;
pub mod server;

// Internal modules - not part of public API
pub(crate) mod paths;
pub(crate) mod similar;

// Re-export common types for convenience
pub use deployer::{DeployOptions, DeployReport, Deployer, RsyncDeployer};
pub use error::{Error, ErrorCode, Result};
pub use registry::Plum;
pub use server::Server;
