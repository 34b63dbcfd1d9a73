//! The write-template document, also the shape of a submitted payload.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::value::ValueContainer;

/// Section name to the containers submitted for it, in form order.
pub type SectionValues = IndexMap<String, Vec<ValueContainer>>;

/// `{ user, step_index, data }`.
///
/// As a template, `data` is `None` when the user may not write at the current
/// step. As a payload, `step_index` (when present) names the step the client
/// believes is current.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct WriteTemplate {
    #[serde(default)]
    pub user: Option<String>,

    #[serde(default)]
    pub step_index: Option<usize>,

    #[serde(default)]
    pub data: Option<SectionValues>,
}

impl WriteTemplate {
    /// A payload carrying `data` for `user` at `step_index`.
    pub fn payload(user: impl Into<String>, step_index: usize, data: SectionValues) -> Self {
        Self {
            user: Some(user.into()),
            step_index: Some(step_index),
            data: Some(data),
        }
    }

    /// Returns `true` when no section is writable (the denial sentinel).
    pub fn is_denied(&self) -> bool {
        self.data.is_none()
    }

    /// Names of the sections present in `data`.
    pub fn section_names(&self) -> Vec<&str> {
        self.data
            .as_ref()
            .map(|d| d.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }

    /// Find a submitted value by section and field id.
    pub fn value(&self, section: &str, field_id: &str) -> Option<&ValueContainer> {
        self.data
            .as_ref()?
            .get(section)?
            .iter()
            .find(|c| c.id() == field_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn denied_template_serializes_null_data() {
        let t = WriteTemplate {
            user: Some("mallory".into()),
            step_index: Some(0),
            data: None,
        };
        let json = serde_json::to_value(&t).unwrap();
        assert_eq!(json, serde_json::json!({"user": "mallory", "step_index": 0, "data": null}));
        assert!(t.is_denied());
    }

    #[test]
    fn decode_payload_and_find_value() {
        let yaml = r#"
user: ian@test.com
step_index: 0
data:
  Employee Onboarding:
    - type: text
      id: Employee_s_Name
      value: Jane
    - type: bool
      id: external_email
      value: true
"#;
        let t: WriteTemplate = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(t.section_names(), vec!["Employee Onboarding"]);
        assert_eq!(
            t.value("Employee Onboarding", "Employee_s_Name").and_then(|v| v.as_text()),
            Some("Jane")
        );
        assert_eq!(t.value("Employee Onboarding", "external_email").and_then(|v| v.as_bool()), Some(true));
        assert!(t.value("Employee Onboarding", "missing").is_none());
    }

    #[test]
    fn empty_document_is_all_none() {
        let t: WriteTemplate = serde_yaml::from_str("{}").unwrap();
        assert_eq!(t, WriteTemplate::default());
        assert!(t.section_names().is_empty());
    }
}
