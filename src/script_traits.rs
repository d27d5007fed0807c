//! Type-safe script argument contracts.
//!
//! This module provides the `ScriptArgs` trait for ensuring compile-time correctness
//! of script arguments. Instead of raw string vectors, Rust structs implement
//! this trait to produce validated CLI arguments and environment variables.
//!
//! # Design Goals
//!
//! 1. **Compile-Time Safety**: Parameter mismatches (e.g., `-DLunId` vs `-LunId`)
//!    are caught at compile time, not runtime.
//! 2. **Single Source of Truth**: The struct definition IS the contract.
//! 3. **Discrete Arguments**: Values travel as separate argv entries, never
//!    interpolated into a shell line, so field content cannot change the
//!    command's structure.

/// Trait for typed script arguments.
///
/// Implementors define the mapping between Rust struct fields and the
/// parameters of an external script. This ensures the compiler catches
/// parameter mismatches.
///
/// # Contract
///
/// - `to_cli_args()`: Returns CLI arguments exactly as the script expects them.
/// - `get_env_vars()`: Returns environment variables required by the script.
/// - `script_name()`: Returns the script filename (e.g., "onboard-luns.ps1").
/// - `is_destructive()`: Whether the script changes machine state; destructive
///   scripts are skipped in dry-run mode.
///
/// # Invariants
///
/// - The returned CLI args MUST match the script's parameter parser.
/// - Environment variables MUST match the script's environment contract.
/// - Scripts are identified by name only (path is resolved at execution time).
///
/// # Example
///
/// ```ignore
/// use onboard_luns::script_traits::ScriptArgs;
/// use onboard_luns::scripts::onboard::OnboardLunArgs;
///
/// let args = OnboardLunArgs {
///     lun_id: "1".to_string(),
///     drive_letter: "E".to_string(),
///     drive_label: "fast_disk".to_string(),
/// };
///
/// // Compiler enforces correct parameter names
/// let cli_args = args.to_cli_args();
/// // ["-DLunId", "1", "-DriveLetter", "E", "-DriveLabel", "fast_disk"]
/// ```
pub trait ScriptArgs {
    /// Convert struct fields to CLI arguments.
    ///
    /// Returns a vector of strings exactly as they should be passed to the script.
    /// Example: `["-DLunId", "1", "-DriveLetter", "E"]`
    fn to_cli_args(&self) -> Vec<String>;

    /// Get required environment variables.
    ///
    /// Returns key-value pairs for environment variables the script requires.
    fn get_env_vars(&self) -> Vec<(String, String)>;

    /// Get the script filename.
    ///
    /// Returns the script name without path (e.g., "onboard-luns.ps1").
    /// The execution layer resolves the full path.
    fn script_name(&self) -> &'static str;

    /// Whether the script modifies machine state.
    ///
    /// Destructive scripts are skipped in dry-run mode; non-destructive ones
    /// still execute so the preview stays realistic.
    fn is_destructive(&self) -> bool {
        false
    }
}
