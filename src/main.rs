//! Onboard LUNs - Main entry point
//!
//! Provisions LUN-backed drives on a Windows node from its attribute
//! snapshot: deploys the onboarding PowerShell script, then runs it once
//! per configured storage unit.

use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use anyhow::{Result, bail};
use tracing::{debug, error, info, warn};

use onboard_luns::cli::{Cli, Commands};
use onboard_luns::deploy::{ScriptDeployer, ScriptSource};
use onboard_luns::gate;
use onboard_luns::node::NodeAttributes;
use onboard_luns::orchestrator::Orchestrator;
use onboard_luns::provision::LunProvisioner;
use onboard_luns::sanity;
use onboard_luns::script_runner::{Interpreter, ScriptRunner};

/// Initialize tracing with appropriate settings
fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();
}

/// Install a Ctrl-C handler that requests a stop between units.
///
/// The current script invocation is allowed to finish; remaining units
/// are skipped and recorded as such in the run report.
fn install_interrupt_flag() -> Arc<AtomicBool> {
    let flag = Arc::new(AtomicBool::new(false));
    let handler_flag = Arc::clone(&flag);
    if let Err(e) = ctrlc::set_handler(move || {
        handler_flag.store(true, Ordering::SeqCst);
        warn!("Interrupt received; finishing the current unit then stopping");
    }) {
        warn!("Failed to install Ctrl-C handler: {}", e);
        // Continue anyway - Ctrl-C will just kill the process outright
    }
    flag
}

/// Main application entry point
fn main() -> Result<()> {
    init_tracing();
    info!("onboard-luns starting up");

    let cli = Cli::parse_args();
    debug!("CLI arguments parsed");

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
            info!("Loading node snapshot from {:?}", node);
            let attributes = NodeAttributes::load_from_file(&node)?;

            let source = script.map(ScriptSource::File).unwrap_or_default();
            let deployer = ScriptDeployer::new(source).with_dry_run(cli.dry_run);

            let interp = match interpreter.as_deref() {
                Some(program) => Interpreter::custom(program, &[]),
                None => Interpreter::powershell(),
            };

            // Advisory only, and only when something will actually spawn
            if gate::applies(&attributes)
                && !attributes.storage_units().is_empty()
                && !cli.dry_run
            {
                sanity::preflight(&interp);
            }

            let interrupt = install_interrupt_flag();
            let runner = ScriptRunner::new(interp)
                .with_timeout(timeout_secs.map(Duration::from_secs))
                .with_dry_run(cli.dry_run);
            let provisioner = LunProvisioner::new(runner).with_interrupt(interrupt);

            let orchestrator = Orchestrator::new(deployer, provisioner, target.clone());
            let run_report = orchestrator.run(&attributes)?;

            println!("{}", run_report.summary());

            if let Some(path) = report {
                run_report.save_to_file(&path)?;
                info!("Run report written to {:?}", path);
            }

            if strict && run_report.has_failures() {
                bail!(
                    "{} of {} storage units failed to provision",
                    run_report.failed,
                    run_report.units_total
                );
            }
        }
        Commands::Validate { node } => {
            info!("Validating node snapshot: {:?}", node);
            validate_snapshot(&node)?;
        }
        Commands::Deploy { target, script } => {
            let source = script.map(ScriptSource::File).unwrap_or_default();
            info!("Deploying {} to {:?}", source, target);
            let deployer = ScriptDeployer::new(source).with_dry_run(cli.dry_run);
            let outcome = deployer.deploy(&target)?;
            println!("✓ Onboarding script at {}: {}", target.display(), outcome);
        }
    }

    Ok(())
}

/// Validate a node snapshot: report the gate decision and check every
/// storage unit for the fields provisioning needs.
fn validate_snapshot(path: &Path) -> Result<()> {
    let attributes = match NodeAttributes::load_from_file(path) {
        Ok(attributes) => attributes,
        Err(e) => {
            error!("Failed to load node snapshot: {:#}", e);
            eprintln!("✗ Failed to load node snapshot: {:#}", e);
            std::process::exit(1);
        }
    };

    match gate::evaluate(&attributes).skip_reason() {
        Some(reason) => println!("Gate: would skip ({})", reason),
        None => println!("Gate: applies"),
    }

    let units = attributes.storage_units();
    let mut problems = 0usize;
    for (index, unit) in units.iter().enumerate() {
        let missing = unit.missing_fields();
        if missing.is_empty() {
            println!("✓ Unit {}: {}", index + 1, unit.describe());
        } else {
            println!(
                "✗ Unit {}: {} - missing {}",
                index + 1,
                unit.describe(),
                missing.join(", ")
            );
            problems += 1;
        }
    }

    if problems > 0 {
        error!("Node snapshot has {} malformed storage unit(s)", problems);
        bail!(
            "{} of {} storage units are missing required fields",
            problems,
            units.len()
        );
    }

    info!("Node snapshot validation successful");
    println!("✓ Node snapshot is valid: {} storage unit(s)", units.len());
    Ok(())
}
