//! Checks a submitted payload against the instance's current step.

use std::collections::BTreeSet;

use formflow_core::submission::WriteTemplate;
use formflow_core::value::ValueContainer;
use formflow_core::{FormSection, PermissionLevel, Section, resolve_section};

use crate::error::SubmissionError;
use crate::instance::AppInstance;

/// Every rule `payload` breaks when submitted by `user`, in check order:
/// identity, staleness, then per-section content.
pub fn check_submission(
    instance: &AppInstance,
    user: &str,
    payload: &WriteTemplate,
    check_step_index: bool,
) -> Vec<SubmissionError> {
    let mut violations = Vec::new();

    if !instance.is_assignee(user) {
        violations.push(SubmissionError::NotAssignee {
            user: user.to_string(),
            assignee: instance.current_assignee().map(str::to_string),
        });
    }

    if let Some(prepared_for) = payload.user.as_deref() {
        if prepared_for != user {
            violations.push(SubmissionError::UserMismatch {
                acting: user.to_string(),
                payload: prepared_for.to_string(),
            });
        }
    }

    if check_step_index {
        if let Some(submitted) = payload.step_index {
            let expected = instance.current_step_index();
            if expected != Some(submitted) {
                violations.push(SubmissionError::StaleSubmission {
                    expected,
                    submitted,
                });
            }
        }
    }

    let (Some(data), Some(task)) = (payload.data.as_ref(), instance.current_task()) else {
        return violations;
    };

    for (name, values) in data {
        let Some(form_section) = instance.app().form().find_section(name) else {
            violations.push(SubmissionError::UnknownSection(name.clone()));
            continue;
        };
        let level = resolve_section(task.permissions(), name);
        if level != PermissionLevel::Editable {
            violations.push(SubmissionError::ForbiddenSection {
                section: name.clone(),
                level,
            });
            continue;
        }
        match form_section {
            FormSection::Section(section) => check_section(section, values, &mut violations),
        }
    }

    violations
}

fn check_section(section: &Section, values: &[ValueContainer], out: &mut Vec<SubmissionError>) {
    let mut seen = BTreeSet::new();

    for value in values {
        let id = value.id();
        if !seen.insert(id) {
            out.push(SubmissionError::DuplicateField {
                section: section.name.clone(),
                field: id.to_string(),
            });
            continue;
        }
        match section.find_field(id) {
            None => out.push(SubmissionError::UnknownField {
                section: section.name.clone(),
                field: id.to_string(),
            }),
            Some(field) if !value.fits(field) => out.push(SubmissionError::FieldTypeMismatch {
                section: section.name.clone(),
                field: id.to_string(),
                expected: field.kind(),
                found: value.kind(),
            }),
            Some(_) => {}
        }
    }

    for field in section.fields.iter().filter(|f| f.required()) {
        if !seen.contains(field.id()) {
            out.push(SubmissionError::MissingRequiredField {
                section: section.name.clone(),
                field: field.id().to_string(),
            });
        }
    }
}
