//! Platform gate: decides whether LUN onboarding applies to a node.
//!
//! Onboarding applies only when the node's platform family is exactly
//! `windows` AND the `storage` attribute is present. An empty storage list
//! still counts as present (the deploy step runs, the provisioning loop
//! just has nothing to do). The gate is a pure predicate: no side effects,
//! no error conditions.

use std::fmt;

use crate::node::NodeAttributes;

/// Outcome of evaluating the gate against a node, carrying the skip reason
/// when onboarding does not apply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    /// The node is a Windows machine with a storage attribute.
    Applies,
    /// The platform family is not `windows`. The raw value is kept for
    /// logs and the report.
    SkippedPlatform { family: String },
    /// The platform is Windows but the node has no storage attribute.
    SkippedNoStorage,
}

impl GateDecision {
    /// The skip reason, or `None` when onboarding applies.
    pub fn skip_reason(&self) -> Option<String> {
        match self {
            Self::Applies => None,
            _ => Some(self.to_string()),
        }
    }
}

impl fmt::Display for GateDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Applies => write!(f, "applies"),
            Self::SkippedPlatform { family } => {
                write!(f, "platform family '{}' does not use LUN onboarding", family)
            }
            Self::SkippedNoStorage => write!(f, "no storage attribute present"),
        }
    }
}

/// Evaluate the gate against a node snapshot.
pub fn evaluate(node: &NodeAttributes) -> GateDecision {
    if !node.family().is_windows() {
        return GateDecision::SkippedPlatform {
            family: node.platform_family.clone(),
        };
    }
    if node.storage.is_none() {
        return GateDecision::SkippedNoStorage;
    }
    GateDecision::Applies
}

/// True when onboarding applies to the node.
pub fn applies(node: &NodeAttributes) -> bool {
    matches!(evaluate(node), GateDecision::Applies)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::StorageUnit;

    fn node(platform_family: &str, storage: Option<Vec<StorageUnit>>) -> NodeAttributes {
        NodeAttributes {
            platform_family: platform_family.to_string(),
            storage,
        }
    }

    #[test]
    fn test_windows_with_storage_applies() {
        let n = node("windows", Some(vec![StorageUnit::new("1", "E", "data")]));
        assert_eq!(evaluate(&n), GateDecision::Applies);
        assert!(applies(&n));
    }

    #[test]
    fn test_windows_with_empty_storage_applies() {
        // Present-but-empty still passes the gate
        let n = node("windows", Some(vec![]));
        assert_eq!(evaluate(&n), GateDecision::Applies);
    }

    #[test]
    fn test_windows_without_storage_skips() {
        let n = node("windows", None);
        assert_eq!(evaluate(&n), GateDecision::SkippedNoStorage);
        assert!(!applies(&n));
    }

    #[test]
    fn test_other_platform_skips_even_with_storage() {
        let n = node("debian", Some(vec![StorageUnit::new("1", "E", "data")]));
        assert_eq!(
            evaluate(&n),
            GateDecision::SkippedPlatform {
                family: "debian".to_string()
            }
        );
    }

    #[test]
    fn test_capitalized_windows_skips() {
        let n = node("Windows", Some(vec![]));
        assert_eq!(
            evaluate(&n),
            GateDecision::SkippedPlatform {
                family: "Windows".to_string()
            }
        );
    }

    #[test]
    fn test_empty_platform_family_skips() {
        let n = node("", Some(vec![]));
        assert!(matches!(
            evaluate(&n),
            GateDecision::SkippedPlatform { .. }
        ));
    }

    #[test]
    fn test_skip_reason_text() {
        assert_eq!(GateDecision::Applies.skip_reason(), None);

        let reason = evaluate(&node("rhel", None)).skip_reason().unwrap();
        assert!(reason.contains("rhel"));

        let reason = evaluate(&node("windows", None)).skip_reason().unwrap();
        assert!(reason.contains("storage"));
    }
}
