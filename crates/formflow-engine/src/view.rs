//! Per-user projections of an instance: the read view and the write template.

use std::fmt;

use formflow_core::submission::{SectionValues, WriteTemplate};
use formflow_core::{FormSection, PermissionLevel, Permissions, Section, resolve_section};
use serde::Serialize;
use tracing::debug;

use crate::instance::AppInstance;

/// How a visible section is presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionMode {
    ReadOnly,
    ReadWrite,
}

impl SectionMode {
    fn from_level(level: PermissionLevel) -> Option<Self> {
        match level {
            PermissionLevel::Hidden => None,
            PermissionLevel::ReadOnly => Some(Self::ReadOnly),
            PermissionLevel::Editable => Some(Self::ReadWrite),
        }
    }
}

impl fmt::Display for SectionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::ReadOnly => "readonly",
            Self::ReadWrite => "readwrite",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldView {
    pub label: String,
    pub id: String,
    pub kind: &'static str,
    pub required: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SectionView {
    pub name: String,
    pub mode: SectionMode,
    pub fields: Vec<FieldView>,
}

impl SectionView {
    fn new(section: &Section, mode: SectionMode) -> Self {
        Self {
            name: section.name.clone(),
            mode,
            fields: section
                .fields
                .iter()
                .map(|f| FieldView {
                    label: f.label().to_string(),
                    id: f.id().to_string(),
                    kind: f.kind(),
                    required: f.required(),
                })
                .collect(),
        }
    }
}

/// The sections a user may see at the current step, in form order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedView {
    pub task: String,
    pub sections: Vec<SectionView>,
}

impl fmt::Display for RenderedView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Task::: {}", self.task)?;
        for section in &self.sections {
            write!(f, "\n{}:{}", section.name, section.mode)?;
            for field in &section.fields {
                let marker = if field.required { '*' } else { ' ' };
                write!(f, "\nField: {} {} {} {}", field.label, field.id, field.kind, marker)?;
            }
        }
        Ok(())
    }
}

/// Result of asking for a read view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ViewOutcome {
    Granted(RenderedView),
    /// The requester is not the current assignee.
    Denied { assignee: Option<String> },
}

impl ViewOutcome {
    pub fn is_granted(&self) -> bool {
        matches!(self, Self::Granted(_))
    }

    pub fn view(&self) -> Option<&RenderedView> {
        match self {
            Self::Granted(view) => Some(view),
            Self::Denied { .. } => None,
        }
    }
}

impl fmt::Display for ViewOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Granted(view) => view.fmt(f),
            Self::Denied { assignee } => {
                write!(f, "you are not {}", assignee.as_deref().unwrap_or("null"))
            }
        }
    }
}

fn visible_sections<'a>(
    sections: &'a [FormSection],
    permissions: &'a Permissions,
) -> impl Iterator<Item = (&'a Section, PermissionLevel)> + 'a {
    sections.iter().map(move |form_section| match form_section {
        FormSection::Section(section) => (section, resolve_section(permissions, &section.name)),
    })
}

impl AppInstance {
    /// What `user` may see at the current step.
    pub fn view_as(&self, user: &str) -> ViewOutcome {
        let task = match self.current_task() {
            Some(task) if self.is_assignee(user) => task,
            _ => {
                debug!(step = %self.current_step(), user, "view denied");
                return ViewOutcome::Denied {
                    assignee: self.current_assignee().map(str::to_string),
                };
            }
        };

        let sections = visible_sections(&self.app().form().sections, task.permissions())
            .filter_map(|(section, level)| {
                SectionMode::from_level(level).map(|mode| SectionView::new(section, mode))
            })
            .collect();

        debug!(step = %self.current_step(), user, "view granted");
        ViewOutcome::Granted(RenderedView {
            task: task.name().to_string(),
            sections,
        })
    }

    /// The write template for `user`, with the default text placeholder.
    pub fn write_template(&self, user: &str) -> WriteTemplate {
        self.write_template_with(user, formflow_core::value::DEFAULT_TEXT_PLACEHOLDER)
    }

    /// The write template for `user`: default containers for every editable
    /// section in form order, or no data when `user` may not write now.
    /// Nobody may write to a completed instance.
    pub fn write_template_with(&self, user: &str, placeholder: &str) -> WriteTemplate {
        let data = self
            .current_task()
            .filter(|_| !self.is_completed() && self.is_assignee(user))
            .map(|task| {
                visible_sections(&self.app().form().sections, task.permissions())
                    .filter(|(_, level)| *level == PermissionLevel::Editable)
                    .map(|(section, _)| {
                        (section.name.clone(), section.value_containers(placeholder))
                    })
                    .collect::<SectionValues>()
            });

        debug!(step = %self.current_step(), user, writable = data.is_some(), "write template");
        WriteTemplate {
            user: Some(user.to_string()),
            step_index: self.current_step_index(),
            data,
        }
    }
}
