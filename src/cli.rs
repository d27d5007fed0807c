use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Onboard LUNs - node-attribute driven LUN provisioning for Windows hosts
#[derive(Parser)]
#[command(name = "onboard-luns")]
#[command(about = "Deploys and runs the LUN onboarding script for a node's storage units")]
#[command(version)]
pub struct Cli {
    /// Dry-run mode: show what would be executed without making changes.
    ///
    /// In this mode the onboarding script is not written to the target
    /// path and destructive script invocations are skipped and logged.
    /// The platform gate and per-unit argument checks still run so the
    /// preview is realistic.
    #[arg(long, global = true)]
    pub dry_run: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the full pipeline: gate, deploy, provision every storage unit
    Run {
        /// Path to the node attribute snapshot (JSON)
        #[arg(short, long)]
        node: PathBuf,

        /// Where to place the onboarding script on the host
        #[arg(long, default_value = "c:/onboard-luns.ps1")]
        target: PathBuf,

        /// Deploy this script file instead of the bundled one
        #[arg(long)]
        script: Option<PathBuf>,

        /// Interpreter program to run the script with (defaults to powershell.exe)
        #[arg(long)]
        interpreter: Option<String>,

        /// Kill a unit's script run after this many seconds
        #[arg(long)]
        timeout_secs: Option<u64>,

        /// Write a JSON run report to this path
        #[arg(long)]
        report: Option<PathBuf>,

        /// Exit non-zero when any unit fails to provision
        #[arg(long)]
        strict: bool,
    },
    /// Validate a node snapshot without provisioning anything
    Validate {
        /// Path to the node attribute snapshot (JSON)
        node: PathBuf,
    },
    /// Deploy the onboarding script without provisioning
    Deploy {
        /// Where to place the onboarding script
        #[arg(long, default_value = "c:/onboard-luns.ps1")]
        target: PathBuf,

        /// Deploy this script file instead of the bundled one
        #[arg(long)]
        script: Option<PathBuf>,
    },
}

impl Cli {
    pub fn parse_args() -> Self {
        <Self as clap::Parser>::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_cli_requires_subcommand() {
        let result = Cli::try_parse_from(["onboard-luns"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_run_defaults() {
        let result = Cli::try_parse_from(["onboard-luns", "run", "--node", "/etc/node.json"]);
        assert!(result.is_ok());
        let cli = result.unwrap();
        assert!(!cli.dry_run);
        match cli.command {
            Commands::Run {
                node,
                target,
                script,
                interpreter,
                timeout_secs,
                report,
                strict,
            } => {
                assert_eq!(node.to_str().unwrap(), "/etc/node.json");
                assert_eq!(
                    target.to_str().unwrap(),
                    crate::deploy::DEFAULT_TARGET_PATH,
                    "CLI default must match the library default"
                );
                assert!(script.is_none());
                assert!(interpreter.is_none());
                assert!(timeout_secs.is_none());
                assert!(report.is_none());
                assert!(!strict);
            }
            _ => panic!("Expected Run command"),
        }
    }

    #[test]
    fn test_cli_dry_run_is_global() {
        let result = Cli::try_parse_from([
            "onboard-luns",
            "run",
            "--node",
            "/etc/node.json",
            "--dry-run",
        ]);
        assert!(result.is_ok());
        assert!(result.unwrap().dry_run);
    }

    #[test]
    fn test_cli_run_all_options() {
        let result = Cli::try_parse_from([
            "onboard-luns",
            "run",
            "-n",
            "node.json",
            "--target",
            "d:/scripts/onboard.ps1",
            "--script",
            "custom.ps1",
            "--interpreter",
            "pwsh",
            "--timeout-secs",
            "300",
            "--report",
            "report.json",
            "--strict",
        ]);
        assert!(result.is_ok());
        match result.unwrap().command {
            Commands::Run {
                target,
                script,
                interpreter,
                timeout_secs,
                strict,
                ..
            } => {
                assert_eq!(target.to_str().unwrap(), "d:/scripts/onboard.ps1");
                assert_eq!(script.unwrap().to_str().unwrap(), "custom.ps1");
                assert_eq!(interpreter.as_deref(), Some("pwsh"));
                assert_eq!(timeout_secs, Some(300));
                assert!(strict);
            }
            _ => panic!("Expected Run command"),
        }
    }

    #[test]
    fn test_cli_validate_command() {
        let result = Cli::try_parse_from(["onboard-luns", "validate", "/etc/node.json"]);
        assert!(result.is_ok());
        match result.unwrap().command {
            Commands::Validate { node } => {
                assert_eq!(node.to_str().unwrap(), "/etc/node.json");
            }
            _ => panic!("Expected Validate command"),
        }
    }

    #[test]
    fn test_cli_deploy_command() {
        let result = Cli::try_parse_from(["onboard-luns", "deploy", "--target", "/tmp/o.ps1"]);
        assert!(result.is_ok());
        match result.unwrap().command {
            Commands::Deploy { target, script } => {
                assert_eq!(target.to_str().unwrap(), "/tmp/o.ps1");
                assert!(script.is_none());
            }
            _ => panic!("Expected Deploy command"),
        }
    }
}
