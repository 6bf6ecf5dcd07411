//! Deployers turn a server record into a file transfer.
//!
//! The registry holds deployers by name; `rsync` is the built-in one and the
//! default for the deploy command.

use serde::Serialize;

use crate::error::Result;
use crate::executor::{self, CommandOutput};
use crate::server::Server;
use crate::utils::shell;

/// rsync options used when neither the command line nor the configuration
/// provides any.
pub const DEFAULT_RSYNC_OPTIONS: &str = "-azC --force --delete --progress";

/// Local directory transferred when none is configured. The trailing slash
/// makes rsync copy the directory contents.
pub const DEFAULT_SOURCE: &str = "./";

/// Whether an rsync option string asks for a dry run on its own, through
/// `--dry-run` or an `n` inside a short-option cluster such as `-azn`.
pub fn rsync_options_request_dry_run(options: &str) -> bool {
    options.split_whitespace().any(|option| {
        option == "--dry-run"
            || (option.starts_with('-')
                && !option.starts_with("--")
                && option[1..].chars().all(|c| c.is_ascii_alphabetic())
                && option[1..].contains('n'))
    })
}

/// Per-run options handed to a deployer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployOptions {
    pub dry_run: bool,
    /// Explicit rsync options. Takes precedence over the server's own.
    pub rsync_options: Option<String>,
    pub source: String,
    /// Stream rsync output to the terminal instead of capturing it.
    pub passthrough: bool,
}

impl Default for DeployOptions {
    fn default() -> Self {
        Self {
            dry_run: true,
            rsync_options: None,
            source: DEFAULT_SOURCE.to_string(),
            passthrough: true,
        }
    }
}

/// What a deployer ran and how it ended.
///
/// A non-zero exit code is reported, not raised.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeployReport {
    pub deployer: String,
    pub server: String,
    pub command: String,
    pub dry_run: bool,
    pub exit_code: i32,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stdout: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stderr: Option<String>,
}

pub trait Deployer {
    fn name(&self) -> &str;

    fn deploy(&self, server: &Server, options: &DeployOptions) -> Result<DeployReport>;
}

/// Runs a shell command string and reports how it exited.
pub trait CommandRunner {
    fn run(&self, command: &str, passthrough: bool) -> CommandOutput;
}

/// Runs commands through the platform shell.
pub struct ShellRunner;

impl CommandRunner for ShellRunner {
    fn run(&self, command: &str, passthrough: bool) -> CommandOutput {
        if passthrough {
            executor::execute_local_command_passthrough(command, None)
        } else {
            executor::execute_local_command(command, None)
        }
    }
}

pub struct RsyncDeployer<R: CommandRunner = ShellRunner> {
    runner: R,
    default_options: String,
}

impl RsyncDeployer {
    pub fn new() -> Self {
        Self::with_runner(ShellRunner)
    }
}

impl Default for RsyncDeployer {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: CommandRunner> RsyncDeployer<R> {
    pub fn with_runner(runner: R) -> Self {
        Self {
            runner,
            default_options: DEFAULT_RSYNC_OPTIONS.to_string(),
        }
    }

    /// Replace the options used when neither the run nor the server sets any.
    pub fn with_default_options(mut self, options: impl Into<String>) -> Self {
        self.default_options = options.into();
        self
    }

    fn effective_options<'a>(&'a self, server: &'a Server, options: &'a DeployOptions) -> &'a str {
        options
            .rsync_options
            .as_deref()
            .or(server.rsync_options())
            .unwrap_or(self.default_options.as_str())
    }

    /// Build the rsync command line for a server.
    ///
    /// `--dry-run` is present exactly when `options.dry_run` is set.
    pub fn build_command(&self, server: &Server, options: &DeployOptions) -> String {
        let dry_run = if options.dry_run { "--dry-run" } else { "" };
        let source = if options.source.is_empty() {
            DEFAULT_SOURCE
        } else {
            options.source.as_str()
        };

        shell::join_fragments([
            "rsync".to_string(),
            dry_run.to_string(),
            self.effective_options(server, options).to_string(),
            "-e".to_string(),
            shell::quote_arg(&server.ssh_info()),
            server.exclude_info(),
            shell::quote_arg(source),
            shell::quote_arg(&server.login_info()),
        ])
    }
}

impl<R: CommandRunner> Deployer for RsyncDeployer<R> {
    fn name(&self) -> &str {
        "rsync"
    }

    fn deploy(&self, server: &Server, options: &DeployOptions) -> Result<DeployReport> {
        server.check_identity_file()?;

        let command = self.build_command(server, options);
        if !options.dry_run
            && rsync_options_request_dry_run(self.effective_options(server, options))
        {
            log_status!(
                "deploy",
                "rsync options contain a dry-run flag; --go will not transfer files"
            );
        }
        log_status!("deploy", "{}", command);

        let output = self.runner.run(&command, options.passthrough);
        if !output.success {
            log_status!(
                "deploy",
                "rsync exited with code {}{}",
                output.exit_code,
                if output.stderr.is_empty() {
                    String::new()
                } else {
                    format!(": {}", output.stderr.trim())
                }
            );
        }

        Ok(DeployReport {
            deployer: self.name().to_string(),
            server: server.name().to_string(),
            command,
            dry_run: options.dry_run,
            exit_code: output.exit_code,
            success: output.success,
            stdout: (!options.passthrough).then_some(output.stdout),
            stderr: (!options.passthrough).then_some(output.stderr),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    struct Recorder {
        commands: RefCell<Vec<String>>,
        exit_code: i32,
    }

    impl Recorder {
        fn exiting(exit_code: i32) -> Self {
            Self {
                commands: RefCell::new(Vec::new()),
                exit_code,
            }
        }
    }

    impl CommandRunner for &Recorder {
        fn run(&self, command: &str, _passthrough: bool) -> CommandOutput {
            self.commands.borrow_mut().push(command.to_string());
            CommandOutput {
                stdout: "sent 1,024 bytes".to_string(),
                stderr: String::new(),
                success: self.exit_code == 0,
                exit_code: self.exit_code,
            }
        }
    }

    fn production() -> Server {
        Server::new("www.mywebsite.com", "julien", "/var/www/sfblog/", None).named("production")
    }

    #[test]
    fn dry_run_command_matches_expected_layout() {
        let deployer = RsyncDeployer::new();
        let command = deployer.build_command(&production(), &DeployOptions::default());
        assert_eq!(
            command,
            "rsync --dry-run -azC --force --delete --progress -e 'ssh -p 22' ./ \
             julien@www.mywebsite.com:/var/www/sfblog/"
        );
    }

    #[test]
    fn go_drops_dry_run_flag() {
        let deployer = RsyncDeployer::new();
        let options = DeployOptions {
            dry_run: false,
            ..DeployOptions::default()
        };
        let command = deployer.build_command(&production(), &options);
        assert!(!command.contains("--dry-run"));
        assert!(command.starts_with("rsync -azC"));
    }

    #[test]
    fn option_precedence_run_then_server_then_default() {
        let deployer = RsyncDeployer::new().with_default_options("-a");
        let server = production().with_rsync_options("-rlt");

        let from_run = DeployOptions {
            rsync_options: Some("-av".to_string()),
            ..DeployOptions::default()
        };
        assert!(deployer
            .build_command(&server, &from_run)
            .starts_with("rsync --dry-run -av -e"));
        assert!(deployer
            .build_command(&server, &DeployOptions::default())
            .starts_with("rsync --dry-run -rlt -e"));
        assert!(deployer
            .build_command(&production(), &DeployOptions::default())
            .starts_with("rsync --dry-run -a -e"));
    }

    #[test]
    fn dry_run_flags_in_options_are_detected() {
        assert!(rsync_options_request_dry_run("-azn --delete"));
        assert!(rsync_options_request_dry_run("-n"));
        assert!(rsync_options_request_dry_run("-az --dry-run"));
        assert!(!rsync_options_request_dry_run(DEFAULT_RSYNC_OPTIONS));
        assert!(!rsync_options_request_dry_run("--numeric-ids -az"));
        assert!(!rsync_options_request_dry_run("--exclude=node_modules"));
    }

    #[test]
    fn go_keeps_dry_run_from_explicit_options() {
        let recorder = Recorder::exiting(0);
        let deployer = RsyncDeployer::with_runner(&recorder);
        let options = DeployOptions {
            dry_run: false,
            rsync_options: Some("-azn".to_string()),
            ..DeployOptions::default()
        };
        let report = deployer.deploy(&production(), &options).unwrap();

        assert!(!report.dry_run);
        assert!(report.command.starts_with("rsync -azn -e"));
        assert!(rsync_options_request_dry_run(
            deployer.effective_options(&production(), &options)
        ));
    }

    #[test]
    fn excludes_and_source_are_interpolated() {
        let deployer = RsyncDeployer::new();
        let server = production().with_excludes(vec!["var/cache".to_string()]);
        let options = DeployOptions {
            source: "build/my app/".to_string(),
            ..DeployOptions::default()
        };
        let command = deployer.build_command(&server, &options);
        assert!(command.contains(
            "-e 'ssh -p 22' --exclude=var/cache 'build/my app/' julien@www.mywebsite.com:"
        ));
    }

    #[test]
    fn deploy_runs_built_command_once() {
        let recorder = Recorder::exiting(0);
        let deployer = RsyncDeployer::with_runner(&recorder);
        let report = deployer
            .deploy(&production(), &DeployOptions::default())
            .unwrap();

        let commands = recorder.commands.borrow();
        assert_eq!(commands.len(), 1);
        assert_eq!(commands[0], report.command);
        assert_eq!(report.server, "production");
        assert_eq!(report.deployer, "rsync");
        assert!(report.dry_run);
        assert!(report.success);
    }

    #[test]
    fn failed_rsync_is_reported_not_raised() {
        let recorder = Recorder::exiting(23);
        let deployer = RsyncDeployer::with_runner(&recorder);
        let report = deployer
            .deploy(&production(), &DeployOptions::default())
            .unwrap();
        assert_eq!(report.exit_code, 23);
        assert!(!report.success);
        assert!(report.stdout.is_none());
    }

    #[test]
    fn captured_output_lands_in_report() {
        let recorder = Recorder::exiting(0);
        let deployer = RsyncDeployer::with_runner(&recorder);
        let options = DeployOptions {
            passthrough: false,
            ..DeployOptions::default()
        };
        let report = deployer.deploy(&production(), &options).unwrap();
        assert_eq!(report.stdout.as_deref(), Some("sent 1,024 bytes"));
        assert_eq!(report.stderr.as_deref(), Some(""));
    }

    #[test]
    fn missing_identity_file_fails_before_running() {
        let recorder = Recorder::exiting(0);
        let deployer = RsyncDeployer::with_runner(&recorder);
        let server = production().with_identity_file("/nonexistent/plum/id_rsa");

        let err = deployer
            .deploy(&server, &DeployOptions::default())
            .unwrap_err();
        assert_eq!(err.code, crate::ErrorCode::SshIdentityFileNotFound);
        assert!(recorder.commands.borrow().is_empty());
    }
}
