//! Forms and their sections.

use serde::{Deserialize, Serialize};

use crate::field::InputField;
use crate::value::ValueContainer;

fn default_section_name() -> String {
    "untitled Section".to_string()
}

/// A named group of fields. The name is the key used by task permissions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    #[serde(default = "default_section_name")]
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub help_text: Option<String>,

    #[serde(default)]
    pub fields: Vec<InputField>,
}

impl Section {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            help_text: None,
            fields: Vec::new(),
        }
    }

    pub fn help_text(mut self, help: impl Into<String>) -> Self {
        self.help_text = Some(help.into());
        self
    }

    pub fn field(mut self, field: InputField) -> Self {
        self.fields.push(field);
        self
    }

    /// Look up a field by id.
    pub fn find_field(&self, id: &str) -> Option<&InputField> {
        self.fields.iter().find(|f| f.id() == id)
    }

    /// One fresh container per field, in declaration order.
    pub fn value_containers(&self, placeholder: &str) -> Vec<ValueContainer> {
        self.fields
            .iter()
            .map(|f| ValueContainer::for_field(f, placeholder))
            .collect()
    }
}

/// The kinds of block a form can hold. Only plain sections exist today; the
/// `type` discriminator leaves room for tables later.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum FormSection {
    #[serde(rename = "section")]
    Section(Section),
}

impl FormSection {
    pub fn name(&self) -> &str {
        match self {
            Self::Section(section) => &section.name,
        }
    }
}

impl From<Section> for FormSection {
    fn from(section: Section) -> Self {
        Self::Section(section)
    }
}

/// An ordered list of sections.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Form {
    #[serde(default)]
    pub sections: Vec<FormSection>,
}

impl Form {
    pub fn new(sections: impl IntoIterator<Item = Section>) -> Self {
        Self {
            sections: sections.into_iter().map(FormSection::from).collect(),
        }
    }

    /// Section names in declaration order.
    pub fn section_names(&self) -> Vec<&str> {
        self.sections.iter().map(FormSection::name).collect()
    }

    pub fn has_section(&self, name: &str) -> bool {
        self.sections.iter().any(|s| s.name() == name)
    }

    pub fn find_section(&self, name: &str) -> Option<&FormSection> {
        self.sections.iter().find(|s| s.name() == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample_form() -> Form {
        Form::new([
            Section::new("Employee Onboarding")
                .field(InputField::text("Employee's Name"))
                .field(InputField::boolean("External Email").with_id("external_email")),
            Section::new("HR Comments").help_text("Internal only"),
        ])
    }

    #[test]
    fn section_names_follow_declaration_order() {
        let form = sample_form();
        assert_eq!(form.section_names(), vec!["Employee Onboarding", "HR Comments"]);
        assert!(form.has_section("HR Comments"));
        assert!(!form.has_section("hr comments"));
    }

    #[test]
    fn value_containers_follow_field_order() {
        let form = sample_form();
        let FormSection::Section(section) = form.find_section("Employee Onboarding").unwrap();
        let containers = section.value_containers("x");
        let ids: Vec<&str> = containers.iter().map(|c| c.id()).collect();
        assert_eq!(ids, vec!["Employee_s_Name", "external_email"]);
        assert_eq!(containers[0].as_text(), Some("x"));
    }

    #[test]
    fn decode_section_defaults() {
        let yaml = "sections:\n  - type: section\n    name: Document Proofs\n  - type: section\n";
        let form: Form = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(form.section_names(), vec!["Document Proofs", "untitled Section"]);
        let FormSection::Section(section) = &form.sections[0];
        assert!(section.fields.is_empty());
        assert!(section.help_text.is_none());
    }

    #[test]
    fn decode_requires_section_tag() {
        let yaml = "sections:\n  - name: Missing tag\n";
        assert!(serde_yaml::from_str::<Form>(yaml).is_err());
    }
}
