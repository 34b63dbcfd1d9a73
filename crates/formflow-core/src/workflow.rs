//! Ordered task sequences.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ModelError, Result};
use crate::task::{StartTask, Task};

/// An ordered list of tasks that begins with exactly one start task.
///
/// The invariant is checked by [`Workflow::new`] and on every decode, so a
/// `Workflow` value is always well formed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "WorkflowDoc")]
pub struct Workflow {
    tasks: Vec<Task>,
}

#[derive(Deserialize)]
struct WorkflowDoc {
    tasks: Vec<Task>,
}

impl TryFrom<WorkflowDoc> for Workflow {
    type Error = ModelError;

    fn try_from(doc: WorkflowDoc) -> Result<Self> {
        Self::new(doc.tasks)
    }
}

impl Workflow {
    /// Build a workflow, checking the start-task invariant.
    pub fn new(tasks: Vec<Task>) -> Result<Self> {
        match tasks.first() {
            Some(first) if first.is_start() => {}
            _ => return Err(ModelError::MissingStartTask),
        }
        if let Some(position) = tasks.iter().skip(1).position(Task::is_start) {
            return Err(ModelError::MisplacedStartTask {
                position: position + 1,
            });
        }
        Ok(Self { tasks })
    }

    /// Top-level tasks in declaration order.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Every task, including those nested inside parallel branches.
    pub fn all_tasks(&self) -> Vec<&Task> {
        self.tasks.iter().flat_map(Task::flatten).collect()
    }

    pub fn start_task(&self) -> &StartTask {
        match &self.tasks[0] {
            Task::Start(start) => start,
            // Unreachable: `new` guarantees the first task is a start task.
            Task::Input(_) | Task::Approval(_) | Task::Parallel(_) | Task::Goto(_) => {
                unreachable!("workflow invariant broken: first task is not a start task")
            }
        }
    }

    /// First top-level task named `name`.
    pub fn task(&self, name: &str) -> Option<&Task> {
        debug!(step = name, "looking up task");
        self.tasks.iter().find(|t| t.name() == name)
    }

    /// Ordinal of the first top-level task named `name`.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.tasks.iter().position(|t| t.name() == name)
    }

    /// The task declared right after `name`, if any.
    pub fn next_after(&self, name: &str) -> Option<&Task> {
        self.position(name).and_then(|i| self.tasks.get(i + 1))
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}
