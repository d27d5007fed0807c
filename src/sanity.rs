//! Pre-flight checks for the runtime environment.
//!
//! Before a real run spawns anything, we verify the configured script
//! interpreter can be found. The check is advisory: a missing interpreter
//! is logged as a warning, and the run proceeds so that dry runs and
//! cross-platform validation still work on hosts without PowerShell.

use std::env;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::script_runner::Interpreter;

/// Result of looking up one interpreter binary.
#[derive(Debug)]
pub struct InterpreterCheck {
    pub program: String,
    pub found: Option<PathBuf>,
}

impl InterpreterCheck {
    /// Returns true if the interpreter was located.
    pub fn is_ok(&self) -> bool {
        self.found.is_some()
    }
}

/// Filenames to try for `program` inside one PATH directory.
///
/// On Windows, commands are usually typed without their extension, so
/// each PATHEXT suffix is tried in addition to the bare name.
fn candidates(dir: &Path, program: &str) -> Vec<PathBuf> {
    let direct = dir.join(program);
    #[cfg(windows)]
    {
        let mut list = vec![direct];
        if Path::new(program).extension().is_none() {
            let exts = env::var("PATHEXT").unwrap_or_else(|_| ".COM;.EXE;.BAT;.CMD".to_string());
            for ext in exts.split(';').filter(|e| !e.is_empty()) {
                list.push(dir.join(format!("{}{}", program, ext)));
            }
        }
        list
    }
    #[cfg(not(windows))]
    {
        vec![direct]
    }
}

/// Locate `program` the way the OS command loader would.
///
/// A name containing a path separator is checked directly; a bare name is
/// searched across every PATH entry.
pub fn find_on_path(program: &str) -> Option<PathBuf> {
    let as_path = Path::new(program);
    if as_path.components().count() > 1 {
        return as_path.is_file().then(|| as_path.to_path_buf());
    }

    let path_var = env::var_os("PATH")?;
    for dir in env::split_paths(&path_var) {
        for candidate in candidates(&dir, program) {
            if candidate.is_file() {
                return Some(candidate);
            }
        }
    }
    None
}

/// Look up the interpreter's binary without spawning it.
pub fn check_interpreter(interpreter: &Interpreter) -> InterpreterCheck {
    InterpreterCheck {
        program: interpreter.program.clone(),
        found: find_on_path(&interpreter.program),
    }
}

/// Run the advisory pre-flight checks and log the outcome.
pub fn preflight(interpreter: &Interpreter) {
    let check = check_interpreter(interpreter);
    match &check.found {
        Some(path) => debug!("Interpreter {} found at {:?}", check.program, path),
        None => warn!(
            "Interpreter {} not found on PATH; script execution will fail to spawn",
            check.program
        ),
    }
}
