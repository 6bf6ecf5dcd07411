use clap::{Args, Subcommand};
use serde::Serialize;

use plum::server::Server;

use super::CmdResult;

#[derive(Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerOutput {
    command: String,
    config_path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    server: Option<Server>,
    #[serde(skip_serializing_if = "Option::is_none")]
    servers: Option<Vec<Server>>,
}

#[derive(Args)]
pub struct ServerArgs {
    #[command(subcommand)]
    command: ServerCommand,
}

#[derive(Subcommand)]
enum ServerCommand {
    /// Display server configuration
    Show {
        /// Server name
        server: String,
    },
    /// List all configured servers
    List,
}

fn describe(server: &Server) -> String {
    format!("{}  {} (port {})", server.name(), server.login_info(), server.port())
}

pub fn run(args: ServerArgs, global: &crate::commands::GlobalArgs) -> CmdResult<ServerOutput> {
    let loaded = global.load_config()?;
    let config_path = loaded.path.display().to_string();
    let plum = loaded.config.into_registry()?;

    match args.command {
        ServerCommand::Show { server } => {
            let server = plum.server(&server)?.clone();

            if !global.json {
                println!("{}", describe(&server));
                println!("  ssh: {}", server.ssh_info());
                let excludes = server.exclude_info();
                if !excludes.is_empty() {
                    println!("  excludes: {}", excludes);
                }
            }

            Ok((
                ServerOutput {
                    command: "server.show".to_string(),
                    config_path,
                    server: Some(server),
                    ..Default::default()
                },
                0,
            ))
        }
        ServerCommand::List => {
            let servers: Vec<Server> = plum.servers().cloned().collect();

            if !global.json {
                if servers.is_empty() {
                    println!("No servers configured in {}", config_path);
                }
                for server in &servers {
                    println!("{}", describe(server));
                }
            }

            Ok((
                ServerOutput {
                    command: "server.list".to_string(),
                    config_path,
                    servers: Some(servers),
                    ..Default::default()
                },
                0,
            ))
        }
    }
}
