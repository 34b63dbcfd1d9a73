//! Section visibility levels and per-task permission policies.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// How a section appears to the assignee of a task.
///
/// Declared in order of increasing access. Resolution is a plain lookup;
/// levels are never combined or compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PermissionLevel {
    #[serde(rename = "HIDDEN")]
    Hidden,
    #[serde(rename = "READONLY")]
    ReadOnly,
    #[serde(rename = "EDITABLE")]
    Editable,
}

impl PermissionLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Hidden => "HIDDEN",
            Self::ReadOnly => "READONLY",
            Self::Editable => "EDITABLE",
        }
    }
}

impl fmt::Display for PermissionLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A task's permission policy: per-section overrides over a task-wide default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Permissions {
    pub default: PermissionLevel,

    #[serde(default)]
    pub section_permissions: BTreeMap<String, PermissionLevel>,
}

impl Permissions {
    /// A policy with no section overrides.
    pub const fn new(default: PermissionLevel) -> Self {
        Self {
            default,
            section_permissions: BTreeMap::new(),
        }
    }

    /// Add (or replace) the override for `section`.
    pub fn section(mut self, section: impl Into<String>, level: PermissionLevel) -> Self {
        self.section_permissions.insert(section.into(), level);
        self
    }

    /// Effective level for `section` under this policy.
    pub fn resolve(&self, section: &str) -> PermissionLevel {
        resolve_section(self, section)
    }
}

/// The override for `section` when present, otherwise the policy default.
pub fn resolve_section(permissions: &Permissions, section: &str) -> PermissionLevel {
    permissions
        .section_permissions
        .get(section)
        .copied()
        .unwrap_or(permissions.default)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn override_wins_over_default() {
        let perms = Permissions::new(PermissionLevel::Hidden)
            .section("Employee Onboarding", PermissionLevel::Editable);
        assert_eq!(resolve_section(&perms, "Employee Onboarding"), PermissionLevel::Editable);
    }

    #[test]
    fn missing_section_falls_back_to_default() {
        let perms = Permissions::new(PermissionLevel::ReadOnly)
            .section("HR Comments", PermissionLevel::Hidden);
        assert_eq!(perms.resolve("IT Assets Allocated"), PermissionLevel::ReadOnly);
        assert_eq!(perms.resolve("HR Comments"), PermissionLevel::Hidden);
    }

    #[test]
    fn override_may_lower_access() {
        for default in [PermissionLevel::Hidden, PermissionLevel::ReadOnly, PermissionLevel::Editable] {
            for level in [PermissionLevel::Hidden, PermissionLevel::ReadOnly, PermissionLevel::Editable] {
                let perms = Permissions::new(default).section("S", level);
                assert_eq!(perms.resolve("S"), level);
                assert_eq!(perms.resolve("T"), default);
            }
        }
    }

    #[test]
    fn section_lookup_is_exact() {
        let perms = Permissions::new(PermissionLevel::Hidden).section("S1", PermissionLevel::Editable);
        assert_eq!(perms.resolve("s1"), PermissionLevel::Hidden);
        assert_eq!(perms.resolve("S1 "), PermissionLevel::Hidden);
    }

    #[test]
    fn decode_levels_and_missing_overrides() {
        let yaml = "default: READONLY\n";
        let perms: Permissions = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(perms, Permissions::new(PermissionLevel::ReadOnly));

        let yaml = "default: HIDDEN\nsection_permissions:\n  A: EDITABLE\n";
        let perms: Permissions = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(perms.resolve("A"), PermissionLevel::Editable);
        assert!(serde_yaml::from_str::<Permissions>("default: hidden\n").is_err());
    }
}
