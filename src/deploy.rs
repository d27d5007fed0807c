//! Provisioning script deployment.
//!
//! The onboarding script must exist at a canonical path on the node before
//! any unit is provisioned. This module owns that copy step: it sources the
//! script (the bundled asset by default, or an on-disk file), compares it
//! byte-for-byte with whatever is already at the target, and writes only
//! when they differ. Repeated deploys therefore leave the target
//! byte-identical, and an up-to-date target is not rewritten at all.
//!
//! Deployment failures are fatal to an onboarding run: provisioning against
//! a missing or stale script would onboard disks with the wrong logic.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};

/// Canonical path the provisioning script is deployed to on a node.
pub const DEFAULT_TARGET_PATH: &str = "c:/onboard-luns.ps1";

/// The script shipped inside this binary.
const BUNDLED_SCRIPT: &str = include_str!("../assets/onboard-luns.ps1");

/// Where the deployable script comes from.
#[derive(Debug, Clone, Default)]
pub enum ScriptSource {
    /// The `onboard-luns.ps1` asset compiled into the binary.
    #[default]
    Bundled,
    /// A script file read from disk at deploy time.
    File(PathBuf),
}

impl ScriptSource {
    fn content(&self) -> Result<String, DeployError> {
        match self {
            Self::Bundled => Ok(BUNDLED_SCRIPT.to_string()),
            Self::File(path) => {
                fs::read_to_string(path).map_err(|source| match source.kind() {
                    std::io::ErrorKind::NotFound => DeployError::AssetMissing {
                        path: path.clone(),
                    },
                    _ => DeployError::AssetUnreadable {
                        path: path.clone(),
                        source,
                    },
                })
            }
        }
    }
}

impl std::fmt::Display for ScriptSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bundled => write!(f, "bundled onboard-luns.ps1"),
            Self::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Errors raised while deploying the provisioning script.
#[derive(Debug, Error)]
pub enum DeployError {
    /// A file-sourced script does not exist.
    #[error("provisioning script asset not found at {path:?}")]
    AssetMissing { path: PathBuf },

    /// A file-sourced script exists but could not be read.
    #[error("failed to read provisioning script asset {path:?}: {source}")]
    AssetUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The target path could not be written.
    #[error("failed to write provisioning script to {path:?}: {source}")]
    TargetUnwritable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// What a deploy did to the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeployOutcome {
    /// The target was created or its content replaced.
    Written,
    /// The target already matched the source byte-for-byte; nothing written.
    Unchanged,
    /// Dry-run: the target differs but was left untouched.
    WouldWrite,
}

impl std::fmt::Display for DeployOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Written => write!(f, "written"),
            Self::Unchanged => write!(f, "already current"),
            Self::WouldWrite => write!(f, "would write (dry-run)"),
        }
    }
}

/// Copies the provisioning script to its canonical target, idempotently.
#[derive(Debug, Clone, Default)]
pub struct ScriptDeployer {
    source: ScriptSource,
    dry_run: bool,
}

impl ScriptDeployer {
    pub fn new(source: ScriptSource) -> Self {
        Self {
            source,
            dry_run: false,
        }
    }

    /// Report instead of writing when the target would change.
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn source(&self) -> &ScriptSource {
        &self.source
    }

    /// Deploy the script to `target`.
    ///
    /// Reads the source, byte-compares against any existing target, and
    /// writes the full content only when they differ. At most one write
    /// happens per call.
    pub fn deploy(&self, target: &Path) -> Result<DeployOutcome, DeployError> {
        let desired = self.source.content()?;

        if let Ok(existing) = fs::read(target) {
            if existing == desired.as_bytes() {
                debug!("{:?} already matches {}; not rewriting", target, self.source);
                return Ok(DeployOutcome::Unchanged);
            }
        }

        if self.dry_run {
            info!(
                "[DRY RUN] Would write {} bytes from {} to {:?}",
                desired.len(),
                self.source,
                target
            );
            return Ok(DeployOutcome::WouldWrite);
        }

        fs::write(target, &desired).map_err(|source| DeployError::TargetUnwritable {
            path: target.to_path_buf(),
            source,
        })?;

        info!(
            "Deployed {} ({} bytes) to {:?}",
            self.source,
            desired.len(),
            target
        );
        Ok(DeployOutcome::Written)
    }
}
