//! Type-safe arguments for the LUN onboarding script.
//!
//! This module provides the typed argument struct for `onboard-luns.ps1`:
//! - `OnboardLunArgs` with the `-DLunId`, `-DriveLetter`, `-DriveLabel` parameters
//!
//! # Why This Exists
//!
//! The PowerShell script takes named parameters, and an earlier rendition of
//! this pipeline interpolated node attribute values straight into a command
//! line string. Typed structs make the mapping explicit, verified at compile
//! time, and keep every value a discrete argv entry.

use thiserror::Error;

use crate::node::StorageUnit;
use crate::script_traits::ScriptArgs;

/// Error for a storage unit that cannot be turned into script arguments.
///
/// Raised before any invocation happens: a malformed unit never reaches the
/// script.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("missing required field(s): {}", .fields.join(", "))]
pub struct MissingFieldsError {
    /// Attribute-schema names of the absent or blank fields.
    pub fields: Vec<&'static str>,
}

/// Type-safe arguments for `onboard-luns.ps1`.
///
/// # Field to Parameter Mapping
///
/// | Rust Field     | Unit Field | CLI Parameter  |
/// |----------------|------------|----------------|
/// | `lun_id`       | `LUN`      | `-DLunId`      |
/// | `drive_letter` | `Path`     | `-DriveLetter` |
/// | `drive_label`  | `Name`     | `-DriveLabel`  |
///
/// Values are passed through verbatim with no quoting or normalization.
///
/// # Example
///
/// ```
/// use onboard_luns::script_traits::ScriptArgs;
/// use onboard_luns::scripts::onboard::OnboardLunArgs;
///
/// let args = OnboardLunArgs {
///     lun_id: "1".to_string(),
///     drive_letter: "E".to_string(),
///     drive_label: "fast_disk".to_string(),
/// };
///
/// assert_eq!(
///     args.to_cli_args(),
///     vec!["-DLunId", "1", "-DriveLetter", "E", "-DriveLabel", "fast_disk"]
/// );
/// assert!(args.get_env_vars().is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OnboardLunArgs {
    /// SCSI LUN id of the disk to onboard. Maps to `-DLunId`.
    pub lun_id: String,

    /// Drive letter to assign. Maps to `-DriveLetter`.
    pub drive_letter: String,

    /// Volume label to apply. Maps to `-DriveLabel`.
    pub drive_label: String,
}

impl OnboardLunArgs {
    /// Build arguments from a storage unit, failing fast when any required
    /// field is absent or blank.
    pub fn from_unit(unit: &StorageUnit) -> Result<Self, MissingFieldsError> {
        let missing = unit.missing_fields();
        if !missing.is_empty() {
            return Err(MissingFieldsError { fields: missing });
        }

        Ok(Self {
            lun_id: unit.lun.clone().unwrap_or_default(),
            drive_letter: unit.path.clone().unwrap_or_default(),
            drive_label: unit.name.clone().unwrap_or_default(),
        })
    }
}

impl ScriptArgs for OnboardLunArgs {
    /// Convert to CLI arguments for onboard-luns.ps1.
    ///
    /// # Output Format
    ///
    /// `["-DLunId", "<lun>", "-DriveLetter", "<letter>", "-DriveLabel", "<label>"]`
    fn to_cli_args(&self) -> Vec<String> {
        vec![
            "-DLunId".to_string(),
            self.lun_id.clone(),
            "-DriveLetter".to_string(),
            self.drive_letter.clone(),
            "-DriveLabel".to_string(),
            self.drive_label.clone(),
        ]
    }

    /// onboard-luns.ps1 reads everything from its parameters.
    fn get_env_vars(&self) -> Vec<(String, String)> {
        vec![]
    }

    /// Returns "onboard-luns.ps1".
    fn script_name(&self) -> &'static str {
        "onboard-luns.ps1"
    }

    /// Onboarding initializes and formats disks.
    fn is_destructive(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args() -> OnboardLunArgs {
        OnboardLunArgs {
            lun_id: "2".to_string(),
            drive_letter: "F".to_string(),
            drive_label: "backup".to_string(),
        }
    }

    #[test]
    fn test_cli_args_exact_order() {
        let cli_args = args().to_cli_args();

        assert_eq!(
            cli_args,
            vec!["-DLunId", "2", "-DriveLetter", "F", "-DriveLabel", "backup"]
        );
    }

    #[test]
    fn test_values_follow_their_parameters() {
        let cli_args = args().to_cli_args();

        let lun_pos = cli_args.iter().position(|a| a == "-DLunId").unwrap();
        assert_eq!(cli_args[lun_pos + 1], "2");

        let letter_pos = cli_args.iter().position(|a| a == "-DriveLetter").unwrap();
        assert_eq!(cli_args[letter_pos + 1], "F");

        let label_pos = cli_args.iter().position(|a| a == "-DriveLabel").unwrap();
        assert_eq!(cli_args[label_pos + 1], "backup");
    }

    #[test]
    fn test_values_passed_verbatim() {
        let spaced = OnboardLunArgs {
            lun_id: "3".to_string(),
            drive_letter: "G".to_string(),
            drive_label: "my data; $(rm -rf /)".to_string(),
        };

        let cli_args = spaced.to_cli_args();
        // One argv entry, exactly as given: content cannot restructure the command
        assert_eq!(cli_args[5], "my data; $(rm -rf /)");
        assert_eq!(cli_args.len(), 6);
    }

    #[test]
    fn test_script_name() {
        assert_eq!(args().script_name(), "onboard-luns.ps1");
    }

    #[test]
    fn test_is_destructive() {
        assert!(args().is_destructive(), "Onboarding formats volumes");
    }

    #[test]
    fn test_no_env_vars() {
        assert!(args().get_env_vars().is_empty());
    }

    #[test]
    fn test_from_unit_complete() {
        let unit = StorageUnit::new("1", "E", "fast_disk");
        let built = OnboardLunArgs::from_unit(&unit).expect("should build");
        assert_eq!(built.lun_id, "1");
        assert_eq!(built.drive_letter, "E");
        assert_eq!(built.drive_label, "fast_disk");
    }

    #[test]
    fn test_from_unit_missing_field() {
        let unit = StorageUnit {
            lun: Some("1".to_string()),
            path: None,
            name: Some("data".to_string()),
        };

        let err = OnboardLunArgs::from_unit(&unit).unwrap_err();
        assert_eq!(err.fields, vec!["Path"]);
        assert!(err.to_string().contains("Path"));
    }

    #[test]
    fn test_from_unit_blank_field() {
        let mut unit = StorageUnit::new("1", "E", "data");
        unit.name = Some("  ".to_string());

        let err = OnboardLunArgs::from_unit(&unit).unwrap_err();
        assert_eq!(err.fields, vec!["Name"]);
    }

    #[test]
    fn test_from_unit_all_missing_lists_all() {
        let err = OnboardLunArgs::from_unit(&StorageUnit::default()).unwrap_err();
        assert_eq!(err.fields, vec!["LUN", "Path", "Name"]);
        assert!(err.to_string().contains("LUN, Path, Name"));
    }
}
