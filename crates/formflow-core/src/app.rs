//! Applications: a form bound to a workflow.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ModelError, Result};
use crate::form::Form;
use crate::task::StartTask;
use crate::workflow::Workflow;

/// A registered workflow application.
///
/// Construction (and decoding) fails unless every section named by any task
/// policy exists in the form. Apps are immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "AppDoc")]
pub struct App {
    name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    form: Form,
    workflow: Workflow,
}

#[derive(Deserialize)]
struct AppDoc {
    name: String,
    #[serde(default)]
    description: Option<String>,
    form: Form,
    workflow: Workflow,
}

impl TryFrom<AppDoc> for App {
    type Error = ModelError;

    fn try_from(doc: AppDoc) -> Result<Self> {
        Self::new(doc.name, doc.description, doc.form, doc.workflow)
    }
}

impl App {
    pub fn new(
        name: impl Into<String>,
        description: Option<String>,
        form: Form,
        workflow: Workflow,
    ) -> Result<Self> {
        let app = Self {
            name: name.into(),
            description,
            form,
            workflow,
        };
        app.validate()?;
        Ok(app)
    }

    /// Check that every permission key names a form section.
    pub fn validate(&self) -> Result<()> {
        for task in self.workflow.all_tasks() {
            for section in task.permissions().section_permissions.keys() {
                if !self.form.has_section(section) {
                    return Err(ModelError::UnknownSection {
                        task: task.name().to_string(),
                        section: section.clone(),
                    });
                }
            }
        }
        debug!(app = %self.name, "app validated");
        Ok(())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn form(&self) -> &Form {
        &self.form
    }

    pub fn workflow(&self) -> &Workflow {
        &self.workflow
    }

    pub fn start_task(&self) -> &StartTask {
        self.workflow.start_task()
    }

    /// Whether `user` may start this application. Always allowed; engines
    /// layer their own start policy on top.
    pub fn can_start(&self, _user: &str) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::InputField;
    use crate::form::Section;
    use crate::permission::{PermissionLevel, Permissions};
    use crate::task::{Branch, Task};

    fn form() -> Form {
        Form::new([
            Section::new("S1").field(InputField::text("Name")),
            Section::new("S2"),
        ])
    }

    fn workflow(perms: Permissions) -> Workflow {
        Workflow::new(vec![
            Task::start("anyone", Permissions::new(PermissionLevel::Hidden)),
            Task::input("T1", ["req.initiator"], perms),
        ])
        .unwrap()
    }

    #[test]
    fn known_sections_pass() {
        let perms = Permissions::new(PermissionLevel::Hidden)
            .section("S1", PermissionLevel::ReadOnly)
            .section("S2", PermissionLevel::Editable);
        let app = App::new("Onboarding", None, form(), workflow(perms)).unwrap();
        assert_eq!(app.name(), "Onboarding");
        assert!(app.description().is_none());
        assert!(app.can_start("anyone@test.com"));
    }

    #[test]
    fn unknown_section_fails() {
        let perms = Permissions::new(PermissionLevel::Hidden).section("S3", PermissionLevel::Editable);
        match App::new("Onboarding", None, form(), workflow(perms)) {
            Err(ModelError::UnknownSection { task, section }) => {
                assert_eq!(task, "T1");
                assert_eq!(section, "S3");
            }
            other => panic!("expected UnknownSection, got {:?}", other),
        }
    }

    #[test]
    fn unknown_section_in_branch_task_fails() {
        let nested = Task::input(
            "Inner",
            ["req.initiator"],
            Permissions::new(PermissionLevel::Hidden).section("Nope", PermissionLevel::ReadOnly),
        );
        let wf = Workflow::new(vec![
            Task::start("anyone", Permissions::new(PermissionLevel::Hidden)),
            Task::parallel(vec![Branch::new("b", "TRUE", vec![nested])]),
        ])
        .unwrap();
        let err = App::new("A", None, form(), wf).unwrap_err();
        assert!(err.is_invariant());
        assert!(err.to_string().contains("Nope"));
    }

    #[test]
    fn section_names_are_case_sensitive() {
        let perms = Permissions::new(PermissionLevel::Hidden).section("s1", PermissionLevel::Editable);
        assert!(App::new("A", None, form(), workflow(perms)).is_err());
    }
}
