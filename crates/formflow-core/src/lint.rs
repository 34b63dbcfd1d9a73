//! Non-fatal checks over a constructed app.
//!
//! Checks for:
//! - Task names used more than once (names are step identifiers)
//! - Section names used more than once (names are permission keys)
//! - Input / approval tasks with no assignee
//! - Goto tasks pointing at a step that does not exist
//! - Tasks for which every section is hidden

use std::collections::HashSet;
use std::fmt;

use crate::app::App;
use crate::permission::PermissionLevel;
use crate::task::Task;

/// A problem worth reporting that does not invalidate the app.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LintWarning {
    DuplicateTaskName(String),
    DuplicateSectionName(String),
    NoAssignees(String),
    UnknownGotoTarget { task: String, target: String },
    NothingVisible(String),
}

impl fmt::Display for LintWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateTaskName(name) => write!(f, "task name '{}' is used more than once", name),
            Self::DuplicateSectionName(name) => {
                write!(f, "section name '{}' is used more than once", name)
            }
            Self::NoAssignees(task) => write!(f, "task '{}' has no assignee", task),
            Self::UnknownGotoTarget { task, target } => {
                write!(f, "task '{}' jumps to unknown step '{}'", task, target)
            }
            Self::NothingVisible(task) => write!(f, "task '{}' hides every section", task),
        }
    }
}

/// Run every check over `app`, in workflow order.
pub fn lint(app: &App) -> Vec<LintWarning> {
    let mut warnings = Vec::new();
    let tasks = app.workflow().all_tasks();
    let section_names = app.form().section_names();

    let mut seen = HashSet::new();
    for name in &section_names {
        if !seen.insert(*name) {
            warnings.push(LintWarning::DuplicateSectionName(name.to_string()));
        }
    }

    let mut seen = HashSet::new();
    for task in &tasks {
        if !seen.insert(task.name()) {
            warnings.push(LintWarning::DuplicateTaskName(task.name().to_string()));
        }
    }

    for task in &tasks {
        match task {
            Task::Input(_) | Task::Approval(_) => {
                if task.assignees().is_some_and(|a| a.is_empty()) {
                    warnings.push(LintWarning::NoAssignees(task.name().to_string()));
                }
            }
            Task::Goto(goto) => {
                if !tasks.iter().any(|t| t.name() == goto.step_name) {
                    warnings.push(LintWarning::UnknownGotoTarget {
                        task: goto.name.clone(),
                        target: goto.step_name.clone(),
                    });
                }
            }
            Task::Start(_) | Task::Parallel(_) => {}
        }

        let perms = task.permissions();
        if !section_names.is_empty()
            && section_names
                .iter()
                .all(|s| perms.resolve(s) == PermissionLevel::Hidden)
        {
            warnings.push(LintWarning::NothingVisible(task.name().to_string()));
        }
    }

    warnings
}
