//! Type-safe script execution.
//!
//! This module provides the ONLY sanctioned way to execute the provisioning
//! script. All invocations go through [`ScriptRunner::run`] to ensure:
//!
//! - Type-safe argument passing via the `ScriptArgs` trait
//! - Captured stdout/stderr and a classified exit
//! - Dry-run handling for destructive scripts
//! - An optional deadline for runaway invocations
//!
//! # Exit Classification
//!
//! A script that runs and exits non-zero is NOT an `Err`: it returns
//! `Ok(ScriptOutput { success: false, .. })` so the caller decides what a
//! failure means. `Err` is reserved for invocations that never produced an
//! exit: spawn failures, wait failures, and deadline kills.

use std::io::Read;
use std::path::Path;
use std::process::{Child, Command, Output, Stdio};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use anyhow::Result;
use thiserror::Error;
use tracing::{info, warn};

use crate::script_traits::ScriptArgs;

/// How often a child with a deadline is polled for exit.
const POLL_INTERVAL: Duration = Duration::from_millis(25);

/// The program that executes the provisioning script, plus the arguments
/// that precede the script path.
///
/// The default launcher is Windows PowerShell in non-interactive mode. Tests
/// and embedders substitute their own (e.g. `sh` with no leading arguments)
/// via [`Interpreter::custom`].
#[derive(Debug, Clone)]
pub struct Interpreter {
    /// Executable name or path (e.g. "powershell.exe").
    pub program: String,
    /// Arguments inserted before the script path.
    pub leading_args: Vec<String>,
}

impl Interpreter {
    /// Windows PowerShell, configured for unattended execution.
    pub fn powershell() -> Self {
        Self {
            program: "powershell.exe".to_string(),
            leading_args: vec![
                "-NoProfile".to_string(),
                "-NonInteractive".to_string(),
                "-ExecutionPolicy".to_string(),
                "Bypass".to_string(),
                "-File".to_string(),
            ],
        }
    }

    /// An arbitrary launcher program.
    pub fn custom(program: impl Into<String>, leading_args: &[&str]) -> Self {
        Self {
            program: program.into(),
            leading_args: leading_args.iter().map(|a| a.to_string()).collect(),
        }
    }

    /// Build the base command for a script path: program, leading args,
    /// then the script.
    pub fn command(&self, script_path: &Path) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.leading_args).arg(script_path);
        cmd
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::powershell()
    }
}

/// Errors for invocations that never produced an exit status.
#[derive(Debug, Error)]
pub enum ScriptRunError {
    /// The interpreter process could not be started.
    #[error("failed to spawn {program} for {script}: {source}")]
    Spawn {
        program: String,
        script: String,
        #[source]
        source: std::io::Error,
    },

    /// Waiting on the child failed.
    #[error("failed waiting for {script}: {source}")]
    Wait {
        script: String,
        #[source]
        source: std::io::Error,
    },

    /// The script outlived its deadline and was killed.
    #[error("{script} did not finish within {}s and was killed", .timeout.as_secs())]
    Timeout { script: String, timeout: Duration },
}

/// Executes external scripts with typed arguments.
#[derive(Debug, Clone)]
pub struct ScriptRunner {
    interpreter: Interpreter,
    timeout: Option<Duration>,
    dry_run: bool,
}

impl ScriptRunner {
    /// Runner with no deadline and dry-run disabled.
    pub fn new(interpreter: Interpreter) -> Self {
        Self {
            interpreter,
            timeout: None,
            dry_run: false,
        }
    }

    /// Kill invocations that run longer than `timeout`. `None` means wait
    /// forever, which matches the historical behavior of this pipeline.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Skip destructive scripts, returning a stub success instead.
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn interpreter(&self) -> &Interpreter {
        &self.interpreter
    }

    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    /// Execute a script with type-safe arguments.
    ///
    /// The exact program, script path, and argument vector are logged before
    /// anything is spawned. Stdin is null: the script must not prompt.
    ///
    /// # Returns
    ///
    /// - `Ok(output)` - the script ran to completion (its exit code may still
    ///   be non-zero; check `output.success`)
    /// - `Err` - the script could not be spawned, waited on, or was killed
    ///   at the deadline
    pub fn run<T: ScriptArgs>(
        &self,
        script_path: &Path,
        args: &T,
    ) -> Result<ScriptOutput, ScriptRunError> {
        let script_name = args.script_name();
        let cli_args = args.to_cli_args();
        let env_vars = args.get_env_vars();

        // Log exact command and environment for transparency
        info!(
            "run_script: {} {} args={:?} env={:?}",
            self.interpreter.program,
            script_path.display(),
            cli_args,
            env_vars
        );

        if self.dry_run && args.is_destructive() {
            info!("[DRY RUN] Skipped: {}", script_name);
            return Ok(ScriptOutput {
                stdout: format!("[DRY RUN] Skipped: {}\n", script_name),
                stderr: String::new(),
                exit_code: Some(0),
                success: true,
                dry_run: true,
            });
        }

        let mut cmd = self.interpreter.command(script_path);
        cmd.args(&cli_args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        // Inject environment variables from typed args
        for (key, value) in &env_vars {
            cmd.env(key, value);
        }

        let child = cmd.spawn().map_err(|source| ScriptRunError::Spawn {
            program: self.interpreter.program.clone(),
            script: script_name.to_string(),
            source,
        })?;

        let output = match self.timeout {
            None => child
                .wait_with_output()
                .map_err(|source| ScriptRunError::Wait {
                    script: script_name.to_string(),
                    source,
                })?,
            Some(limit) => wait_with_deadline(child, limit, script_name)?,
        };

        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();
        let exit_code = output.status.code();

        if output.status.success() {
            info!("Script {} executed successfully", script_name);
            Ok(ScriptOutput {
                stdout,
                stderr,
                exit_code,
                success: true,
                dry_run: false,
            })
        } else {
            let code = exit_code.unwrap_or(-1);
            info!("Script {} failed with exit code {}", script_name, code);
            Ok(ScriptOutput {
                stdout,
                stderr,
                exit_code,
                success: false,
                dry_run: false,
            })
        }
    }
}

/// Poll the child until it exits or the deadline passes, draining its pipes
/// on reader threads the whole time. A chatty script would otherwise fill a
/// pipe buffer and deadlock against our poll loop.
fn wait_with_deadline(
    mut child: Child,
    limit: Duration,
    script_name: &str,
) -> Result<Output, ScriptRunError> {
    let stdout_reader = child.stdout.take().map(spawn_pipe_reader);
    let stderr_reader = child.stderr.take().map(spawn_pipe_reader);

    let deadline = Instant::now() + limit;
    let status = loop {
        match child.try_wait() {
            Ok(Some(status)) => break status,
            Ok(None) => {
                if Instant::now() >= deadline {
                    if let Err(err) = child.kill() {
                        warn!("Failed to kill timed-out script {}: {}", script_name, err);
                    }
                    // Reap so no zombie is left behind
                    let _ = child.wait();
                    return Err(ScriptRunError::Timeout {
                        script: script_name.to_string(),
                        timeout: limit,
                    });
                }
                std::thread::sleep(POLL_INTERVAL);
            }
            Err(source) => {
                return Err(ScriptRunError::Wait {
                    script: script_name.to_string(),
                    source,
                });
            }
        }
    };

    let stdout = stdout_reader.map(join_pipe_reader).unwrap_or_default();
    let stderr = stderr_reader.map(join_pipe_reader).unwrap_or_default();

    Ok(Output {
        status,
        stdout,
        stderr,
    })
}

fn spawn_pipe_reader<R: Read + Send + 'static>(mut pipe: R) -> JoinHandle<Vec<u8>> {
    std::thread::spawn(move || {
        let mut buf = Vec::new();
        let _ = pipe.read_to_end(&mut buf);
        buf
    })
}

fn join_pipe_reader(handle: JoinHandle<Vec<u8>>) -> Vec<u8> {
    handle.join().unwrap_or_default()
}

/// Output from a script execution.
#[derive(Debug, Clone)]
pub struct ScriptOutput {
    /// Standard output from the script.
    pub stdout: String,
    /// Standard error from the script.
    pub stderr: String,
    /// Exit code (None if terminated by signal).
    pub exit_code: Option<i32>,
    /// Whether the script exited successfully (exit code 0).
    pub success: bool,
    /// Whether execution was skipped in dry-run mode.
    pub dry_run: bool,
}

impl ScriptOutput {
    /// Check if the script succeeded and return an error if not.
    pub fn ensure_success(&self, context: &str) -> Result<()> {
        if self.success {
            Ok(())
        } else {
            let code = self.exit_code.unwrap_or(-1);
            anyhow::bail!(
                "{} failed (exit code {}): {}",
                context,
                code,
                self.stderr.trim()
            )
        }
    }
}
