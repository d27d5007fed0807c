//! Onboard LUNs Library
//!
//! This library provides the core functionality for node-attribute driven
//! LUN onboarding: a platform gate, an idempotent script deployer, and a
//! sequential per-unit provisioner, tied together by an orchestrator.

pub mod cli;
pub mod deploy;
pub mod gate;
pub mod node;
pub mod orchestrator;
pub mod provision;
pub mod report;
pub mod sanity;
pub mod script_runner;
pub mod script_traits;
pub mod scripts;
pub mod types;

// Re-export main types for convenience
pub use deploy::{DEFAULT_TARGET_PATH, DeployError, DeployOutcome, ScriptDeployer, ScriptSource};
pub use gate::GateDecision;
pub use node::{NodeAttributes, StorageUnit};
pub use orchestrator::{Orchestrator, OrchestratorError};
pub use provision::{LunProvisioner, ProvisionError, UnitProvisionResult};
pub use report::{ProvisionReport, UnitOutcome, UnitStatus};
pub use script_runner::{Interpreter, ScriptOutput, ScriptRunError, ScriptRunner};
pub use script_traits::ScriptArgs;
pub use scripts::onboard::{MissingFieldsError, OnboardLunArgs};
pub use types::PlatformFamily;
