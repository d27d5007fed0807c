//! Node attribute snapshot handling.
//!
//! A node attribute snapshot is a JSON document describing the machine to
//! provision. Only two attributes matter here: `platform_family` and the
//! optional `storage` array. Snapshots routinely carry many unrelated
//! attributes, so unknown fields are ignored on load.
//!
//! Storage units use the upstream attribute schema verbatim (`LUN`, `Path`,
//! `Name`). Each field is optional at the type level: a malformed unit must
//! survive loading so it can be reported as a per-unit failure at
//! provisioning time instead of poisoning the whole snapshot.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::types::PlatformFamily;

/// The slice of a node's attributes that drives LUN onboarding.
///
/// Treated as an immutable snapshot: every consumer takes `&NodeAttributes`
/// and nothing mutates it after load.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NodeAttributes {
    /// Raw platform family value (e.g. "windows", "debian").
    #[serde(default)]
    pub platform_family: String,

    /// Storage units to onboard. `None` means the attribute is absent,
    /// which is a meaningful skip signal, not an error. An empty list
    /// still counts as present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage: Option<Vec<StorageUnit>>,
}

impl NodeAttributes {
    /// Load a node attribute snapshot from a JSON file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read node snapshot from {:?}", path.as_ref()))?;

        let node: Self =
            serde_json::from_str(&content).context("Failed to parse node snapshot JSON")?;

        Ok(node)
    }

    /// Parsed view of `platform_family`.
    pub fn family(&self) -> PlatformFamily {
        PlatformFamily::parse(&self.platform_family)
    }

    /// The storage units, or an empty slice when the attribute is absent.
    pub fn storage_units(&self) -> &[StorageUnit] {
        self.storage.as_deref().unwrap_or(&[])
    }
}

/// One storage unit descriptor from the node's `storage` attribute.
///
/// Field names mirror the attribute schema: `LUN` is the SCSI LUN id,
/// `Path` the drive letter to assign, `Name` the volume label.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageUnit {
    #[serde(rename = "LUN", default, skip_serializing_if = "Option::is_none")]
    pub lun: Option<String>,

    #[serde(rename = "Path", default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    #[serde(rename = "Name", default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl StorageUnit {
    /// Create a fully-populated unit.
    pub fn new(
        lun: impl Into<String>,
        path: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            lun: Some(lun.into()),
            path: Some(path.into()),
            name: Some(name.into()),
        }
    }

    /// Names of required fields that are absent or blank.
    ///
    /// A field that deserialized to an empty or whitespace-only string is
    /// as unusable as a missing one, so both count.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if Self::blank(&self.lun) {
            missing.push("LUN");
        }
        if Self::blank(&self.path) {
            missing.push("Path");
        }
        if Self::blank(&self.name) {
            missing.push("Name");
        }
        missing
    }

    fn blank(field: &Option<String>) -> bool {
        field.as_deref().is_none_or(|value| value.trim().is_empty())
    }

    /// Short human-readable form for logs and summaries.
    pub fn describe(&self) -> String {
        format!(
            "LUN {} -> {}: ({})",
            self.lun.as_deref().unwrap_or("?"),
            self.path.as_deref().unwrap_or("?"),
            self.name.as_deref().unwrap_or("?"),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_snapshot_with_storage() {
        let json = r#"{
            "platform_family": "windows",
            "storage": [
                { "LUN": "1", "Path": "E", "Name": "fast_disk" },
                { "LUN": "2", "Path": "F", "Name": "slow_disk" }
            ]
        }"#;

        let node: NodeAttributes = serde_json::from_str(json).expect("should parse");
        assert_eq!(node.platform_family, "windows");
        let units = node.storage_units();
        assert_eq!(units.len(), 2);
        assert_eq!(units[0].lun.as_deref(), Some("1"));
        assert_eq!(units[0].path.as_deref(), Some("E"));
        assert_eq!(units[1].name.as_deref(), Some("slow_disk"));
    }

    #[test]
    fn test_parse_snapshot_ignores_unknown_attributes() {
        let json = r#"{
            "platform_family": "windows",
            "hostname": "db-04",
            "kernel": { "release": "10.0.20348" },
            "storage": []
        }"#;

        let node: NodeAttributes = serde_json::from_str(json).expect("should parse");
        assert!(node.storage.is_some());
        assert!(node.storage_units().is_empty());
    }

    #[test]
    fn test_absent_storage_is_none() {
        let json = r#"{ "platform_family": "windows" }"#;
        let node: NodeAttributes = serde_json::from_str(json).expect("should parse");
        assert!(node.storage.is_none());
        assert!(node.storage_units().is_empty());
    }

    #[test]
    fn test_absent_platform_family_defaults_empty() {
        let node: NodeAttributes = serde_json::from_str("{}").expect("should parse");
        assert_eq!(node.platform_family, "");
        assert!(!node.family().is_windows());
    }

    #[test]
    fn test_malformed_unit_survives_parsing() {
        let json = r#"{
            "platform_family": "windows",
            "storage": [ { "LUN": "3" } ]
        }"#;

        let node: NodeAttributes = serde_json::from_str(json).expect("should parse");
        let unit = &node.storage_units()[0];
        assert_eq!(unit.lun.as_deref(), Some("3"));
        assert_eq!(unit.missing_fields(), vec!["Path", "Name"]);
    }

    #[test]
    fn test_missing_fields_complete_unit() {
        let unit = StorageUnit::new("1", "E", "data");
        assert!(unit.missing_fields().is_empty());
    }

    #[test]
    fn test_blank_field_counts_as_missing() {
        let mut unit = StorageUnit::new("1", "E", "data");
        unit.name = Some("   ".to_string());
        assert_eq!(unit.missing_fields(), vec!["Name"]);

        unit.lun = Some(String::new());
        assert_eq!(unit.missing_fields(), vec!["LUN", "Name"]);
    }

    #[test]
    fn test_describe_fills_gaps() {
        let unit = StorageUnit {
            lun: Some("2".to_string()),
            path: None,
            name: Some("logs".to_string()),
        };
        assert_eq!(unit.describe(), "LUN 2 -> ?: (logs)");
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().expect("temp file");
        write!(
            file,
            r#"{{ "platform_family": "windows", "storage": [ {{ "LUN": "7", "Path": "G", "Name": "scratch" }} ] }}"#
        )
        .expect("write");

        let node = NodeAttributes::load_from_file(file.path()).expect("should load");
        assert!(node.family().is_windows());
        assert_eq!(node.storage_units()[0].lun.as_deref(), Some("7"));
    }

    #[test]
    fn test_load_from_file_missing() {
        let result = NodeAttributes::load_from_file("/nonexistent/node.json");
        assert!(result.is_err());
        let msg = format!("{:#}", result.unwrap_err());
        assert!(msg.contains("Failed to read node snapshot"));
    }

    #[test]
    fn test_load_from_file_invalid_json() {
        let mut file = NamedTempFile::new().expect("temp file");
        write!(file, "not json").expect("write");

        let result = NodeAttributes::load_from_file(file.path());
        assert!(result.is_err());
        let msg = format!("{:#}", result.unwrap_err());
        assert!(msg.contains("Failed to parse node snapshot JSON"));
    }

    #[test]
    fn test_unit_serializes_with_schema_names() {
        let unit = StorageUnit::new("1", "E", "fast_disk");
        let value = serde_json::to_value(&unit).expect("serialize");
        assert_eq!(value["LUN"], "1");
        assert_eq!(value["Path"], "E");
        assert_eq!(value["Name"], "fast_disk");
    }
}
