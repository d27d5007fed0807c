//! Per-unit LUN provisioning.
//!
//! The provisioner walks the node's storage units in input order, strictly
//! one at a time, and invokes the deployed onboarding script once per unit.
//! A unit that fails (malformed fields, spawn error, non-zero exit, deadline
//! kill) is recorded and the loop moves on: one bad unit must never block
//! the disks behind it. There are no retries.
//!
//! An optional interrupt flag stops the loop between units: the unit that is
//! currently running always finishes, later units are recorded as skipped.

use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use thiserror::Error;
use tracing::{error, info, warn};

use crate::node::StorageUnit;
use crate::script_runner::{ScriptOutput, ScriptRunError, ScriptRunner};
use crate::scripts::onboard::{MissingFieldsError, OnboardLunArgs};

/// Why a single unit was not provisioned.
#[derive(Debug, Error)]
pub enum ProvisionError {
    /// The unit is missing required fields; the script was never invoked.
    #[error("malformed storage unit: {0}")]
    MissingFields(#[from] MissingFieldsError),

    /// The invocation never produced an exit (spawn/wait failure, deadline kill).
    #[error("script execution failed: {0}")]
    Run(#[from] ScriptRunError),

    /// The script ran and exited non-zero.
    #[error("onboarding script failed (exit code {code}): {stderr}")]
    ScriptFailed { code: i32, stderr: String },

    /// The run was interrupted before this unit was attempted.
    #[error("interrupted before this unit was provisioned")]
    Interrupted,
}

/// Outcome of one unit, in input order.
#[derive(Debug)]
pub struct UnitProvisionResult {
    /// Position of the unit in the node's storage list.
    pub index: usize,
    /// The unit as it appeared in the snapshot.
    pub unit: StorageUnit,
    pub outcome: Result<ScriptOutput, ProvisionError>,
}

impl UnitProvisionResult {
    pub fn succeeded(&self) -> bool {
        self.outcome.is_ok()
    }

    pub fn was_skipped(&self) -> bool {
        matches!(self.outcome, Err(ProvisionError::Interrupted))
    }

    /// The failure reason, or `None` on success.
    pub fn failure_reason(&self) -> Option<String> {
        self.outcome.as_ref().err().map(|err| err.to_string())
    }
}

/// Invokes the onboarding script once per storage unit.
pub struct LunProvisioner {
    runner: ScriptRunner,
    interrupt: Option<Arc<AtomicBool>>,
}

impl LunProvisioner {
    pub fn new(runner: ScriptRunner) -> Self {
        Self {
            runner,
            interrupt: None,
        }
    }

    /// Stop between units once `flag` is set. The flag never kills a unit
    /// that is already running.
    pub fn with_interrupt(mut self, flag: Arc<AtomicBool>) -> Self {
        self.interrupt = Some(flag);
        self
    }

    pub fn is_dry_run(&self) -> bool {
        self.runner.is_dry_run()
    }

    fn interrupted(&self) -> bool {
        self.interrupt
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::SeqCst))
    }

    /// Provision every unit against the deployed script, in order.
    ///
    /// Returns one result per unit, index-aligned with the input. Failures
    /// never short-circuit: unit `i` failing does not prevent the attempt
    /// at unit `i + 1`. Empty input yields empty output and zero
    /// invocations.
    pub fn provision_all(
        &self,
        units: &[StorageUnit],
        script_path: &Path,
    ) -> Vec<UnitProvisionResult> {
        let mut results = Vec::with_capacity(units.len());

        for (index, unit) in units.iter().enumerate() {
            let outcome = self.provision_one(index, unit, script_path);

            match &outcome {
                Ok(_) => info!("Unit {} ({}) provisioned", index, unit.describe()),
                Err(ProvisionError::Interrupted) => {
                    warn!("Unit {} ({}) skipped: interrupted", index, unit.describe());
                }
                Err(err) => {
                    error!("Unit {} ({}) failed: {}", index, unit.describe(), err);
                }
            }

            results.push(UnitProvisionResult {
                index,
                unit: unit.clone(),
                outcome,
            });
        }

        results
    }

    fn provision_one(
        &self,
        index: usize,
        unit: &StorageUnit,
        script_path: &Path,
    ) -> Result<ScriptOutput, ProvisionError> {
        if self.interrupted() {
            return Err(ProvisionError::Interrupted);
        }

        // Fail fast on malformed units, before anything is spawned
        let args = OnboardLunArgs::from_unit(unit)?;

        info!("Provisioning unit {}: {}", index, unit.describe());
        let output = self.runner.run(script_path, &args)?;

        if !output.success {
            return Err(ProvisionError::ScriptFailed {
                code: output.exit_code.unwrap_or(-1),
                stderr: output.stderr.trim().to_string(),
            });
        }

        Ok(output)
    }
}
