use clap::{Parser, Subcommand};

use commands::GlobalArgs;

mod commands;
mod output;

use commands::{deploy, server};

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Parser)]
#[command(name = "plum")]
#[command(version = VERSION)]
#[command(about = "Deploy a project to a remote server with rsync over SSH")]
struct Cli {
    /// Configuration file (default: $PLUM_CONFIG, ./plum.yml, then ~/.config/plum/plum.yml)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<String>,

    /// Print a JSON response instead of status lines
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Deploy the project to a configured server
    #[command(long_about = deploy::LONG_ABOUT)]
    Deploy(deploy::DeployArgs),
    /// Inspect configured servers
    Server(server::ServerArgs),
}

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();

    let global = GlobalArgs {
        config: cli.config,
        json: cli.json,
    };

    let (result, exit_code) = commands::run_json(cli.command, &global);

    if global.json {
        if let Err(err) = output::print_json_result(result) {
            eprintln!("Error: {}", err);
        }
    } else if let Err(err) = result {
        output::print_error(&err);
    }

    std::process::ExitCode::from(exit_code_to_u8(exit_code))
}

fn exit_code_to_u8(code: i32) -> u8 {
    if code <= 0 {
        0
    } else if code >= 255 {
        255
    } else {
        code as u8
    }
}
