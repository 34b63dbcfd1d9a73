//! Workflow tasks.
//!
//! [`Task`] is a closed sum over the five task kinds, discriminated in
//! documents by `type: start | input | approval | parallel | goto`. Parallel
//! branches and goto jumps are declared here but the engine does not execute
//! them; their guard expressions are opaque strings.

use serde::{Deserialize, Serialize};

use crate::permission::{PermissionLevel, Permissions};

/// Fixed step name of the start task.
pub const START_TASK_NAME: &str = "start";

/// Fixed step name of a parallel-branches task.
pub const PARALLEL_TASK_NAME: &str = "permission_branch";

/// Permissions every parallel-branches task carries.
static PARALLEL_PERMISSIONS: Permissions = Permissions::new(PermissionLevel::ReadOnly);

/// A guard expression. Never interpreted by this crate.
pub type Logic = String;

fn default_logic() -> Logic {
    "TRUE".to_string()
}

fn default_branch_name() -> String {
    "Untitled Branch".to_string()
}

fn default_goto_name() -> String {
    "goto_".to_string()
}

fn readonly_permissions() -> Permissions {
    Permissions::new(PermissionLevel::ReadOnly)
}

/// Escalation rule attached to input and approval tasks. Carried as metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AdvancedAllowedApprover {
    #[default]
    Nobody,
    Initiator,
    InitiatorsManager,
    InitiatorsDepartmentHead,
    InitiatorsLocationHead,
}

/// The unique entry point of a workflow. Its assignee is the instance creator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartTask {
    pub who_can_start_it: String,
    pub permissions: Permissions,
}

/// A data-entry step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputTask {
    pub name: String,
    pub allowed_inputer: Vec<String>,
    #[serde(default)]
    pub advanced_allowed_inputer: AdvancedAllowedApprover,
    pub permissions: Permissions,
}

/// An approval step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApprovalTask {
    pub name: String,
    pub allowed_approvers: Vec<String>,
    #[serde(default)]
    pub advanced_allowed_approver: AdvancedAllowedApprover,
    pub permissions: Permissions,
}

/// One arm of a parallel-branches task, active when `happens` holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Branch {
    #[serde(default = "default_branch_name")]
    pub name: String,
    #[serde(default = "default_logic")]
    pub happens: Logic,
    #[serde(default)]
    pub tasks: Vec<Task>,
}

impl Branch {
    pub fn new(name: impl Into<String>, happens: impl Into<Logic>, tasks: Vec<Task>) -> Self {
        Self {
            name: name.into(),
            happens: happens.into(),
            tasks,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParallelBranchesTask {
    pub branches: Vec<Branch>,
}

/// Jump to `step_name` when `condition` holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GotoTask {
    pub step_name: String,
    #[serde(default = "default_logic")]
    pub condition: Logic,
    #[serde(default = "readonly_permissions")]
    pub permissions: Permissions,
    #[serde(default = "default_goto_name")]
    pub name: String,
}

/// One step of a workflow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Task {
    Start(StartTask),
    Input(InputTask),
    Approval(ApprovalTask),
    Parallel(ParallelBranchesTask),
    Goto(GotoTask),
}

impl Task {
    pub fn start(who_can_start_it: impl Into<String>, permissions: Permissions) -> Self {
        Self::Start(StartTask {
            who_can_start_it: who_can_start_it.into(),
            permissions,
        })
    }

    pub fn input<I, S>(name: impl Into<String>, allowed_inputer: I, permissions: Permissions) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Input(InputTask {
            name: name.into(),
            allowed_inputer: allowed_inputer.into_iter().map(Into::into).collect(),
            advanced_allowed_inputer: AdvancedAllowedApprover::Nobody,
            permissions,
        })
    }

    pub fn approval<I, S>(name: impl Into<String>, allowed_approvers: I, permissions: Permissions) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Approval(ApprovalTask {
            name: name.into(),
            allowed_approvers: allowed_approvers.into_iter().map(Into::into).collect(),
            advanced_allowed_approver: AdvancedAllowedApprover::Nobody,
            permissions,
        })
    }

    pub fn parallel(branches: Vec<Branch>) -> Self {
        Self::Parallel(ParallelBranchesTask { branches })
    }

    pub fn goto(step_name: impl Into<String>, condition: impl Into<Logic>) -> Self {
        Self::Goto(GotoTask {
            step_name: step_name.into(),
            condition: condition.into(),
            permissions: readonly_permissions(),
            name: default_goto_name(),
        })
    }

    /// The step identifier of this task.
    pub fn name(&self) -> &str {
        match self {
            Self::Start(_) => START_TASK_NAME,
            Self::Input(t) => &t.name,
            Self::Approval(t) => &t.name,
            Self::Parallel(_) => PARALLEL_TASK_NAME,
            Self::Goto(t) => &t.name,
        }
    }

    /// The permission policy active while this task is current.
    pub fn permissions(&self) -> &Permissions {
        match self {
            Self::Start(t) => &t.permissions,
            Self::Input(t) => &t.permissions,
            Self::Approval(t) => &t.permissions,
            Self::Parallel(_) => &PARALLEL_PERMISSIONS,
            Self::Goto(t) => &t.permissions,
        }
    }

    /// The document discriminator for this kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Start(_) => "start",
            Self::Input(_) => "input",
            Self::Approval(_) => "approval",
            Self::Parallel(_) => "parallel",
            Self::Goto(_) => "goto",
        }
    }

    /// Assignee expressions, for the kinds that have assignees.
    pub fn assignees(&self) -> Option<&[String]> {
        match self {
            Self::Input(t) => Some(&t.allowed_inputer),
            Self::Approval(t) => Some(&t.allowed_approvers),
            Self::Start(_) | Self::Parallel(_) | Self::Goto(_) => None,
        }
    }

    pub fn is_start(&self) -> bool {
        matches!(self, Self::Start(_))
    }

    /// This task followed by every task nested in its branches, depth first.
    pub fn flatten(&self) -> Vec<&Task> {
        let mut out = vec![self];
        match self {
            Self::Parallel(p) => {
                for branch in &p.branches {
                    for task in &branch.tasks {
                        out.extend(task.flatten());
                    }
                }
            }
            Self::Start(_) | Self::Input(_) | Self::Approval(_) | Self::Goto(_) => {}
        }
        out
    }
}
