//! The end-to-end onboarding pipeline.
//!
//! `Orchestrator::run` ties the stages together in a fixed order: evaluate
//! the platform gate, deploy the onboarding script, then provision every
//! storage unit. A gate skip short-circuits to an empty report without
//! touching the filesystem. A deploy failure is fatal and aborts the run
//! before any unit is attempted. Per-unit failures are recorded in the
//! report and do not fail the run itself.

use std::path::PathBuf;

use thiserror::Error;
use tracing::info;

use crate::deploy::{DeployError, ScriptDeployer};
use crate::gate;
use crate::node::NodeAttributes;
use crate::provision::LunProvisioner;
use crate::report::ProvisionReport;

/// Errors that abort a run outright.
#[derive(Debug, Error)]
pub enum OrchestratorError {
    #[error("script deployment failed: {0}")]
    DeployFailed(#[from] DeployError),
}

/// Drives the gate -> deploy -> provision sequence for one node.
pub struct Orchestrator {
    deployer: ScriptDeployer,
    provisioner: LunProvisioner,
    target: PathBuf,
}

impl Orchestrator {
    pub fn new(
        deployer: ScriptDeployer,
        provisioner: LunProvisioner,
        target: impl Into<PathBuf>,
    ) -> Self {
        Self {
            deployer,
            provisioner,
            target: target.into(),
        }
    }

    /// Runs the pipeline against one node snapshot.
    pub fn run(&self, node: &NodeAttributes) -> Result<ProvisionReport, OrchestratorError> {
        let decision = gate::evaluate(node);
        if let Some(reason) = decision.skip_reason() {
            info!("Skipping LUN onboarding: {}", reason);
            let mut report = ProvisionReport::skipped(node, reason);
            report.dry_run = self.provisioner.is_dry_run();
            return Ok(report);
        }

        let deploy = self.deployer.deploy(&self.target)?;
        info!(
            "Onboarding script at {}: {}",
            self.target.display(),
            deploy
        );

        let units = node.storage_units();
        info!("Provisioning {} storage unit(s)", units.len());
        let results = self.provisioner.provision_all(units, &self.target);

        Ok(ProvisionReport::from_results(
            node,
            &self.target,
            deploy,
            self.provisioner.is_dry_run(),
            &results,
        ))
    }
}
