use clap::Args;
use serde::Serialize;

use plum::deployer::{DeployOptions, DeployReport, DEFAULT_SOURCE};
use plum::registry::DEFAULT_DEPLOYER;

use super::CmdResult;

pub const LONG_ABOUT: &str = "\
Deploys the project to a server configured in plum.yml:

  plum deploy production

The server must be configured in plum.yml:

  servers:
    production:
      host: www.mywebsite.com
      port: 22
      user: julien
      dir: /var/www/sfblog/

The transfer runs rsync over SSH, as a dry run unless --go is given.
SSH access must work without a password prompt (use a key, optionally
set with identity_file).";

#[derive(Args)]
pub struct DeployArgs {
    /// The server name
    pub server: String,

    /// The deployer name
    #[arg(default_value = DEFAULT_DEPLOYER)]
    pub deployer: String,

    /// Run the transfer for real (otherwise rsync runs with --dry-run).
    /// A -n or --dry-run inside the rsync options still applies.
    #[arg(long)]
    pub go: bool,

    /// Options passed to rsync (default: from plum.yml, else "-azC --force --delete --progress")
    #[arg(long, value_name = "OPTIONS", allow_hyphen_values = true)]
    pub rsync_options: Option<String>,

    /// Local directory to deploy (default: from plum.yml, else ./)
    #[arg(long, value_name = "DIR")]
    pub source: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeployOutput {
    pub command: String,
    pub server: String,
    pub config_path: String,
    pub report: DeployReport,
}

pub fn run(args: DeployArgs, global: &crate::commands::GlobalArgs) -> CmdResult<DeployOutput> {
    let loaded = global.load_config()?;
    let config_path = loaded.path.display().to_string();

    let source = args
        .source
        .or_else(|| loaded.config.source.clone())
        .unwrap_or_else(|| DEFAULT_SOURCE.to_string());

    let plum = loaded.config.into_registry()?;

    // Resolve everything that can fail before anything is printed or spawned
    plum.server(&args.server)?.check_identity_file()?;
    plum.deployer(&args.deployer)?;

    let options = DeployOptions {
        dry_run: !args.go,
        rsync_options: args.rsync_options,
        source,
        passthrough: !global.json,
    };

    if !global.json {
        println!(
            "Starting {} to {}{}",
            args.deployer,
            args.server,
            if options.dry_run { " (dry run mode)" } else { "" }
        );
    }

    let report = plum.deploy(&args.server, &args.deployer, &options)?;

    if !global.json {
        println!("Successfully {} to {}", args.deployer, args.server);
    }

    Ok((
        DeployOutput {
            command: "deploy.run".to_string(),
            server: args.server,
            config_path,
            report,
        },
        0,
    ))
}
