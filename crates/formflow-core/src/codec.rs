//! Load and dump application and payload documents (YAML and JSON).
//!
//! Decoding an [`App`] runs every construction invariant, so a successfully
//! parsed document is always a valid app.

use std::path::Path;

use tracing::debug;

use crate::app::App;
use crate::error::{ModelError, Result};
use crate::submission::WriteTemplate;

/// Supported document encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Yaml,
    Json,
}

impl DocumentFormat {
    /// Pick a format from a file extension. `None` when the extension is
    /// missing or unknown.
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => Some(Self::Yaml),
            Some("json") => Some(Self::Json),
            _ => None,
        }
    }
}

/// Parse an app from a YAML string.
pub fn parse_app_yaml(content: &str) -> Result<App> {
    serde_yaml::from_str(content).map_err(|e| ModelError::Parse(e.to_string()))
}

/// Parse an app from a JSON string.
pub fn parse_app_json(content: &str) -> Result<App> {
    serde_json::from_str(content).map_err(|e| ModelError::Parse(e.to_string()))
}

/// Parse an app in the given format.
pub fn parse_app(content: &str, format: DocumentFormat) -> Result<App> {
    match format {
        DocumentFormat::Yaml => parse_app_yaml(content),
        DocumentFormat::Json => parse_app_json(content),
    }
}

/// Load an app from a file, choosing the format by extension.
///
/// Files without a recognised extension are tried as YAML, then JSON.
pub fn load_app(path: &Path) -> Result<App> {
    let content = std::fs::read_to_string(path)?;
    debug!(path = %path.display(), "loading app document");
    match DocumentFormat::from_path(path) {
        Some(format) => parse_app(&content, format),
        None => parse_app_yaml(&content).or_else(|_| parse_app_json(&content)),
    }
}

pub fn dump_app_yaml(app: &App) -> Result<String> {
    serde_yaml::to_string(app).map_err(|e| ModelError::Parse(e.to_string()))
}

pub fn dump_app_json(app: &App) -> Result<String> {
    serde_json::to_string_pretty(app).map_err(|e| ModelError::Parse(e.to_string()))
}

/// Parse a submitted payload.
pub fn parse_write_template(content: &str, format: DocumentFormat) -> Result<WriteTemplate> {
    match format {
        DocumentFormat::Yaml => {
            serde_yaml::from_str(content).map_err(|e| ModelError::Parse(e.to_string()))
        }
        DocumentFormat::Json => {
            serde_json::from_str(content).map_err(|e| ModelError::Parse(e.to_string()))
        }
    }
}

/// Load a payload from a file, choosing the format by extension (YAML by default).
pub fn load_write_template(path: &Path) -> Result<WriteTemplate> {
    let content = std::fs::read_to_string(path)?;
    parse_write_template(&content, DocumentFormat::from_path(path).unwrap_or(DocumentFormat::Yaml))
}

pub fn dump_write_template(template: &WriteTemplate, format: DocumentFormat) -> Result<String> {
    match format {
        DocumentFormat::Yaml => {
            serde_yaml::to_string(template).map_err(|e| ModelError::Parse(e.to_string()))
        }
        DocumentFormat::Json => {
            serde_json::to_string_pretty(template).map_err(|e| ModelError::Parse(e.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::InputField;
    use crate::form::{Form, Section};
    use crate::permission::{PermissionLevel, Permissions};
    use crate::submission::SectionValues;
    use crate::task::{AdvancedAllowedApprover, Branch, Task};
    use crate::value::ValueContainer;
    use crate::workflow::Workflow;
    use pretty_assertions::assert_eq;

    fn sample_app() -> App {
        let mut approval = Task::approval(
            "Approve",
            ["form.reporting manager"],
            Permissions::new(PermissionLevel::Hidden).section("S1", PermissionLevel::ReadOnly),
        );
        if let Task::Approval(a) = &mut approval {
            a.advanced_allowed_approver = AdvancedAllowedApprover::InitiatorsDepartmentHead;
        }
        App::new(
            "Sample",
            Some("round trip".into()),
            Form::new([
                Section::new("S1")
                    .help_text("first")
                    .field(InputField::text("Name"))
                    .field(InputField::user("Manager").optional())
                    .field(InputField::boolean("Ok?").with_id("ok")),
                Section::new("S2"),
            ]),
            Workflow::new(vec![
                Task::start(
                    "*@test.com",
                    Permissions::new(PermissionLevel::Hidden).section("S1", PermissionLevel::Editable),
                ),
                approval,
                Task::parallel(vec![Branch::new(
                    "b",
                    "IT_Assets_Required=1",
                    vec![Task::input("Inner", ["req.initiator"], Permissions::new(PermissionLevel::ReadOnly))],
                )]),
                Task::goto("Approve", "TRUE"),
            ])
            .unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn yaml_round_trip() {
        let app = sample_app();
        let yaml = dump_app_yaml(&app).unwrap();
        assert_eq!(parse_app_yaml(&yaml).unwrap(), app);
    }

    #[test]
    fn json_round_trip() {
        let app = sample_app();
        let json = dump_app_json(&app).unwrap();
        assert_eq!(parse_app_json(&json).unwrap(), app);
    }

    #[test]
    fn dumped_documents_use_discriminators() {
        let json: serde_json::Value = serde_json::from_str(&dump_app_json(&sample_app()).unwrap()).unwrap();
        assert_eq!(json["form"]["sections"][0]["type"], "section");
        assert_eq!(json["form"]["sections"][0]["fields"][2]["type"], "yesno");
        assert_eq!(json["workflow"]["tasks"][0]["type"], "start");
        assert_eq!(json["workflow"]["tasks"][2]["type"], "parallel");
        assert_eq!(json["workflow"]["tasks"][1]["permissions"]["default"], "HIDDEN");
    }

    #[test]
    fn invalid_app_document_is_rejected() {
        let yaml = r#"
name: Broken
form:
  sections:
    - type: section
      name: S1
workflow:
  tasks:
    - type: start
      who_can_start_it: anyone
      permissions:
        default: HIDDEN
        section_permissions:
          S9: EDITABLE
"#;
        let err = parse_app_yaml(yaml).unwrap_err();
        assert!(err.to_string().contains("S9"), "{}", err);
    }

    #[test]
    fn load_app_by_extension_and_fallback() {
        let dir = tempfile::tempdir().unwrap();
        let app = sample_app();

        let json_path = dir.path().join("app.json");
        std::fs::write(&json_path, dump_app_json(&app).unwrap()).unwrap();
        assert_eq!(load_app(&json_path).unwrap(), app);

        let bare_path = dir.path().join("app");
        std::fs::write(&bare_path, dump_app_json(&app).unwrap()).unwrap();
        assert_eq!(load_app(&bare_path).unwrap(), app);

        assert!(matches!(load_app(&dir.path().join("missing.yaml")), Err(ModelError::Io(_))));
    }

    #[test]
    fn write_template_round_trip() {
        let mut data = SectionValues::new();
        data.insert(
            "S1".to_string(),
            vec![ValueContainer::Text { id: "Name".into(), value: "Jane".into() }],
        );
        let template = WriteTemplate::payload("u", 0, data);
        for format in [DocumentFormat::Yaml, DocumentFormat::Json] {
            let text = dump_write_template(&template, format).unwrap();
            assert_eq!(parse_write_template(&text, format).unwrap(), template);
        }
    }
}
