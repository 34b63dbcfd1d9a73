//! One running execution of an app.
//!
//! The step pointer (`current_step`) is the only mutable state that matters
//! for authorization. It starts at the start task and moves to the next
//! declared task on every accepted write. Parallel branches and goto jumps
//! are not executed: the workflow is walked as a flat list.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use formflow_core::submission::{SectionValues, WriteTemplate};
use formflow_core::task::START_TASK_NAME;
use formflow_core::{App, Task};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::collab::{INITIATOR_ALIAS, IdentityResolver, InstanceContext};
use crate::error::SubmissionError;
use crate::options::{EngineOptions, WriteValidation};
use crate::validate::check_submission;

/// Lifecycle of an instance. Completed instances are kept, never erased.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InstanceStatus {
    Active,
    Completed,
}

/// An accepted write, kept in submission order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Submission {
    /// Step that was current when the write was accepted.
    pub step: String,
    pub user: String,
    pub data: SectionValues,
    pub submitted_at: DateTime<Utc>,
}

/// What an accepted write did to the instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum WriteOutcome {
    /// The step pointer moved to the next task.
    Advanced { from: String, to: String },
    /// The write was accepted at the last task; the instance is now complete.
    Completed { step: String },
    /// The instance had already completed; nothing was recorded.
    AlreadyCompleted,
}

#[derive(Debug, Clone)]
pub struct AppInstance {
    app: Arc<App>,
    creator: String,
    current_step: String,
    status: InstanceStatus,
    submissions: Vec<Submission>,
}

impl AppInstance {
    /// Start a new instance of `app` on behalf of `creator`.
    pub fn new(app: Arc<App>, creator: impl Into<String>) -> Self {
        Self {
            app,
            creator: creator.into(),
            current_step: START_TASK_NAME.to_string(),
            status: InstanceStatus::Active,
            submissions: Vec::new(),
        }
    }

    pub fn app(&self) -> &App {
        &self.app
    }

    pub fn creator(&self) -> &str {
        &self.creator
    }

    pub fn current_step(&self) -> &str {
        &self.current_step
    }

    pub fn status(&self) -> InstanceStatus {
        self.status
    }

    pub fn is_completed(&self) -> bool {
        self.status == InstanceStatus::Completed
    }

    /// Accepted writes, oldest first.
    pub fn submissions(&self) -> &[Submission] {
        &self.submissions
    }

    pub fn current_task(&self) -> Option<&Task> {
        self.app.workflow().task(&self.current_step)
    }

    pub fn current_step_index(&self) -> Option<usize> {
        self.app.workflow().position(&self.current_step)
    }

    /// The identity expression allowed to act at the current step.
    ///
    /// The creator for the start task, the first listed assignee for input
    /// and approval tasks, and nobody for parallel and goto tasks.
    pub fn current_assignee(&self) -> Option<&str> {
        match self.current_task()? {
            Task::Start(_) => Some(&self.creator),
            task @ (Task::Input(_) | Task::Approval(_)) => {
                task.assignees().and_then(|a| a.first()).map(String::as_str)
            }
            Task::Parallel(_) | Task::Goto(_) => None,
        }
    }

    /// `true` if `expression` names `user` literally, or is the initiator
    /// alias and `user` created this instance.
    pub fn compare_user(&self, expression: Option<&str>, user: &str) -> bool {
        match expression {
            Some(expr) if expr == user => true,
            Some(INITIATOR_ALIAS) => self.creator == user,
            _ => false,
        }
    }

    pub fn is_assignee(&self, user: &str) -> bool {
        self.compare_user(self.current_assignee(), user)
    }

    pub fn context(&self) -> InstanceContext<'_> {
        InstanceContext {
            creator: &self.creator,
            current_step: &self.current_step,
            submissions: &self.submissions,
        }
    }

    /// The current assignee mapped to a concrete identity by `resolver`.
    pub fn resolved_assignee(&self, resolver: &dyn IdentityResolver) -> Option<String> {
        let expression = self.current_assignee()?;
        resolver.resolve(expression, &self.context())
    }

    /// Submit `payload` as `user` with the default (strict) options.
    pub fn write_as(
        &mut self,
        user: &str,
        payload: &WriteTemplate,
    ) -> Result<WriteOutcome, SubmissionError> {
        self.write_as_with(user, payload, &EngineOptions::default())
    }

    /// Submit `payload` as `user`.
    ///
    /// The payload is checked according to `options.write_validation`, then
    /// recorded and the instance advanced. Writes to a completed instance are
    /// no-ops returning [`WriteOutcome::AlreadyCompleted`].
    pub fn write_as_with(
        &mut self,
        user: &str,
        payload: &WriteTemplate,
        options: &EngineOptions,
    ) -> Result<WriteOutcome, SubmissionError> {
        if self.is_completed() {
            debug!(app = %self.app.name(), user, "write to completed instance ignored");
            return Ok(WriteOutcome::AlreadyCompleted);
        }

        match options.write_validation {
            WriteValidation::Off => {}
            WriteValidation::Warn => {
                for violation in check_submission(self, user, payload, options.check_step_index) {
                    warn!(step = %self.current_step, user, "{}", violation);
                }
            }
            WriteValidation::Strict => {
                let violations = check_submission(self, user, payload, options.check_step_index);
                if let Some(first) = violations.into_iter().next() {
                    return Err(first);
                }
            }
        }

        info!(app = %self.app.name(), step = %self.current_step, user, "persisting submission");
        self.submissions.push(Submission {
            step: self.current_step.clone(),
            user: user.to_string(),
            data: payload.data.clone().unwrap_or_default(),
            submitted_at: Utc::now(),
        });

        Ok(self.advance())
    }

    fn advance(&mut self) -> WriteOutcome {
        let next = self
            .app
            .workflow()
            .next_after(&self.current_step)
            .map(|t| t.name().to_string());
        match next {
            Some(to) => {
                let from = std::mem::replace(&mut self.current_step, to.clone());
                info!(from = %from, to = %to, "step advanced");
                WriteOutcome::Advanced { from, to }
            }
            None => {
                self.status = InstanceStatus::Completed;
                info!(app = %self.app.name(), step = %self.current_step, "app finished");
                WriteOutcome::Completed {
                    step: self.current_step.clone(),
                }
            }
        }
    }
}
