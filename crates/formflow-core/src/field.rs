//! Typed input fields.
//!
//! Every field kind shares the same attributes ([`FieldSpec`]); the kind only
//! decides which value container collects its answer. Documents discriminate
//! the kinds with `type: text | user | yesno`.

use serde::{Deserialize, Serialize};

/// Derive a stable field id from a display label.
///
/// Every character that is not alphabetic or numeric becomes `_`, so
/// `"Employee's Name"` turns into `"Employee_s_Name"`.
pub fn slugify(label: &str) -> String {
    label
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '_' })
        .collect()
}

fn default_required() -> bool {
    true
}

/// Attributes shared by every field kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "FieldSpecDoc")]
pub struct FieldSpec {
    /// Display label.
    pub label: String,

    /// Stable identifier; defaults to [`slugify`] of the label.
    pub id: String,

    /// Whether an answer is mandatory.
    pub required: bool,
}

/// On-disk shape: `id` and `required` may be omitted.
#[derive(Deserialize)]
struct FieldSpecDoc {
    label: String,
    #[serde(default)]
    id: Option<String>,
    #[serde(default = "default_required")]
    required: bool,
}

impl From<FieldSpecDoc> for FieldSpec {
    fn from(doc: FieldSpecDoc) -> Self {
        let id = doc.id.unwrap_or_else(|| slugify(&doc.label));
        Self {
            label: doc.label,
            id,
            required: doc.required,
        }
    }
}

impl FieldSpec {
    /// A required field whose id is derived from `label`.
    pub fn new(label: impl Into<String>) -> Self {
        let label = label.into();
        Self {
            id: slugify(&label),
            label,
            required: true,
        }
    }
}

/// A typed input field declared in a form section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum InputField {
    /// Free text.
    #[serde(rename = "text")]
    Text(FieldSpec),

    /// An identity (collected as free text).
    #[serde(rename = "user")]
    User(FieldSpec),

    /// Yes / no.
    #[serde(rename = "yesno")]
    Boolean(FieldSpec),
}

impl InputField {
    pub fn text(label: impl Into<String>) -> Self {
        Self::Text(FieldSpec::new(label))
    }

    pub fn user(label: impl Into<String>) -> Self {
        Self::User(FieldSpec::new(label))
    }

    pub fn boolean(label: impl Into<String>) -> Self {
        Self::Boolean(FieldSpec::new(label))
    }

    /// Override the derived id.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.spec_mut().id = id.into();
        self
    }

    /// Mark the field as optional.
    pub fn optional(mut self) -> Self {
        self.spec_mut().required = false;
        self
    }

    pub fn spec(&self) -> &FieldSpec {
        match self {
            Self::Text(spec) | Self::User(spec) | Self::Boolean(spec) => spec,
        }
    }

    fn spec_mut(&mut self) -> &mut FieldSpec {
        match self {
            Self::Text(spec) | Self::User(spec) | Self::Boolean(spec) => spec,
        }
    }

    pub fn id(&self) -> &str {
        &self.spec().id
    }

    pub fn label(&self) -> &str {
        &self.spec().label
    }

    pub fn required(&self) -> bool {
        self.spec().required
    }

    /// The document discriminator for this kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Text(_) => "text",
            Self::User(_) => "user",
            Self::Boolean(_) => "yesno",
        }
    }
}
