//! Run reports: what a provisioning run did, unit by unit.
//!
//! A report is produced for every successful orchestrator run, including
//! runs where the gate skipped the node (an empty report) and runs where
//! individual units failed. The tallies are derived from the per-unit
//! outcomes at construction time so they cannot disagree with the list.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;

use crate::deploy::DeployOutcome;
use crate::node::{NodeAttributes, StorageUnit};
use crate::provision::{ProvisionError, UnitProvisionResult};

/// Terminal state of one storage unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum UnitStatus {
    /// The onboarding script ran and exited zero (or was dry-run skipped).
    Succeeded,
    /// The unit was attempted and failed; `reason` says why.
    Failed { reason: String },
    /// The unit was never attempted because the run was interrupted.
    Skipped { reason: String },
}

/// One unit's entry in the report, in input order.
#[derive(Debug, Clone, Serialize)]
pub struct UnitOutcome {
    pub index: usize,
    pub unit: StorageUnit,
    #[serde(flatten)]
    pub status: UnitStatus,
}

/// Everything a provisioning run did (or declined to do).
#[derive(Debug, Clone, Serialize)]
pub struct ProvisionReport {
    /// Raw platform family from the node snapshot.
    pub platform_family: String,
    /// Whether the gate let the run proceed.
    pub applied: bool,
    /// Why the run was skipped, when it was.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skip_reason: Option<String>,
    /// Where the script was deployed, when the run proceeded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub script_path: Option<PathBuf>,
    /// What the deploy step did, when the run proceeded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deploy: Option<DeployOutcome>,
    /// Whether this was a dry run.
    pub dry_run: bool,
    pub units_total: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub skipped: usize,
    pub outcomes: Vec<UnitOutcome>,
}

impl ProvisionReport {
    /// The empty report for a node the gate skipped: nothing was written,
    /// nothing was invoked.
    pub fn skipped(node: &NodeAttributes, reason: String) -> Self {
        Self {
            platform_family: node.platform_family.clone(),
            applied: false,
            skip_reason: Some(reason),
            script_path: None,
            deploy: None,
            dry_run: false,
            units_total: 0,
            succeeded: 0,
            failed: 0,
            skipped: 0,
            outcomes: Vec::new(),
        }
    }

    /// Build the report for a run that passed the gate, tallying counts
    /// from the per-unit results.
    pub fn from_results(
        node: &NodeAttributes,
        script_path: &Path,
        deploy: DeployOutcome,
        dry_run: bool,
        results: &[UnitProvisionResult],
    ) -> Self {
        let outcomes: Vec<UnitOutcome> = results
            .iter()
            .map(|result| UnitOutcome {
                index: result.index,
                unit: result.unit.clone(),
                status: match &result.outcome {
                    Ok(_) => UnitStatus::Succeeded,
                    Err(err @ ProvisionError::Interrupted) => UnitStatus::Skipped {
                        reason: err.to_string(),
                    },
                    Err(err) => UnitStatus::Failed {
                        reason: err.to_string(),
                    },
                },
            })
            .collect();

        let succeeded = outcomes
            .iter()
            .filter(|o| matches!(o.status, UnitStatus::Succeeded))
            .count();
        let failed = outcomes
            .iter()
            .filter(|o| matches!(o.status, UnitStatus::Failed { .. }))
            .count();
        let skipped = outcomes
            .iter()
            .filter(|o| matches!(o.status, UnitStatus::Skipped { .. }))
            .count();

        Self {
            platform_family: node.platform_family.clone(),
            applied: true,
            skip_reason: None,
            script_path: Some(script_path.to_path_buf()),
            deploy: Some(deploy),
            dry_run,
            units_total: outcomes.len(),
            succeeded,
            failed,
            skipped,
            outcomes,
        }
    }

    /// True when any unit failed (interrupt skips do not count).
    pub fn has_failures(&self) -> bool {
        self.failed > 0
    }

    /// Returns a summary of the run for logging/display.
    pub fn summary(&self) -> String {
        let mut lines = vec![format!(
            "Provision Report: platform_family={}",
            if self.platform_family.is_empty() {
                "(unset)"
            } else {
                &self.platform_family
            }
        )];

        if !self.applied {
            lines.push(format!(
                "  Skipped: {}",
                self.skip_reason.as_deref().unwrap_or("not applicable")
            ));
            return lines.join("\n");
        }

        if let Some(path) = &self.script_path {
            lines.push(format!("  Script: {}", path.display()));
        }
        if let Some(deploy) = &self.deploy {
            lines.push(format!("  Deploy: {}", deploy));
        }
        if self.dry_run {
            lines.push("  Mode: dry-run".to_string());
        }
        lines.push(format!(
            "  Units ({}): {} succeeded, {} failed, {} skipped",
            self.units_total, self.succeeded, self.failed, self.skipped
        ));
        for outcome in &self.outcomes {
            let status = match &outcome.status {
                UnitStatus::Succeeded => "ok".to_string(),
                UnitStatus::Failed { reason } => format!("failed: {}", reason),
                UnitStatus::Skipped { reason } => format!("skipped: {}", reason),
            };
            lines.push(format!(
                "    {}. {} - {}",
                outcome.index + 1,
                outcome.unit.describe(),
                status
            ));
        }
        lines.join("\n")
    }

    /// Write the report as pretty-printed JSON.
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json =
            serde_json::to_string_pretty(self).context("Failed to serialize report to JSON")?;

        fs::write(&path, json)
            .with_context(|| format!("Failed to write report to {:?}", path.as_ref()))?;

        Ok(())
    }
}
