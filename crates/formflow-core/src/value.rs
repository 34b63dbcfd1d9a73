//! Value containers holding submitted answers.

use serde::{Deserialize, Serialize};

use crate::field::InputField;

/// Placeholder written into fresh text containers.
pub const DEFAULT_TEXT_PLACEHOLDER: &str = "some text here";

fn default_text() -> String {
    DEFAULT_TEXT_PLACEHOLDER.to_string()
}

/// A typed answer for one field, keyed by the field's id.
///
/// Text and user fields share the `text` container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ValueContainer {
    #[serde(rename = "text")]
    Text {
        id: String,
        #[serde(default = "default_text")]
        value: String,
    },

    #[serde(rename = "bool")]
    Bool {
        id: String,
        #[serde(default)]
        value: bool,
    },
}

impl ValueContainer {
    /// A fresh, default-valued container for `field`.
    pub fn for_field(field: &InputField, placeholder: &str) -> Self {
        let id = field.id().to_string();
        match field {
            InputField::Text(_) | InputField::User(_) => Self::Text {
                id,
                value: placeholder.to_string(),
            },
            InputField::Boolean(_) => Self::Bool { id, value: false },
        }
    }

    pub fn id(&self) -> &str {
        match self {
            Self::Text { id, .. } | Self::Bool { id, .. } => id,
        }
    }

    /// The document discriminator for this container.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Text { .. } => "text",
            Self::Bool { .. } => "bool",
        }
    }

    /// Returns `true` if this container is the right kind to answer `field`.
    pub fn fits(&self, field: &InputField) -> bool {
        match (self, field) {
            (Self::Text { .. }, InputField::Text(_) | InputField::User(_)) => true,
            (Self::Bool { .. }, InputField::Boolean(_)) => true,
            (Self::Text { .. }, InputField::Boolean(_)) => false,
            (Self::Bool { .. }, InputField::Text(_) | InputField::User(_)) => false,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text { value, .. } => Some(value),
            Self::Bool { .. } => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool { value, .. } => Some(*value),
            Self::Text { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn user_and_text_fields_share_text_container() {
        let text = ValueContainer::for_field(&InputField::text("Name"), DEFAULT_TEXT_PLACEHOLDER);
        let user = ValueContainer::for_field(&InputField::user("Manager"), DEFAULT_TEXT_PLACEHOLDER);
        assert_eq!(text.kind(), "text");
        assert_eq!(user.kind(), "text");
        assert_eq!(user.id(), "Manager");
        assert_eq!(user.as_text(), Some("some text here"));
    }

    #[test]
    fn boolean_field_defaults_to_false() {
        let field = InputField::boolean("Other Assets Required?");
        let container = ValueContainer::for_field(&field, "ignored");
        assert_eq!(
            container,
            ValueContainer::Bool {
                id: "Other_Assets_Required_".into(),
                value: false
            }
        );
        assert!(container.fits(&field));
        assert!(!container.fits(&InputField::text("Other Assets Required?")));
    }

    #[test]
    fn decode_fills_missing_values() {
        let yaml = "- type: text\n  id: a\n- type: bool\n  id: b\n";
        let values: Vec<ValueContainer> = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(values[0].as_text(), Some(DEFAULT_TEXT_PLACEHOLDER));
        assert_eq!(values[1].as_bool(), Some(false));
    }
}
