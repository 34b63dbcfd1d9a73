//! Output formatting helpers for the `formflow` CLI.

use std::io::{self, Write};

use formflow_core::task::Task;
use formflow_engine::WriteOutcome;
use serde::Serialize;

/// Print a value as pretty-printed JSON to stdout.
///
/// Terminates the process with exit code 1 if serialization fails.
pub fn output_json<T: Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            // Broken pipes (e.g. piped to `head`) are not errors.
            let _ = writeln!(handle, "{}", json);
        }
        Err(e) => {
            eprintln!("Error: failed to serialize JSON: {}", e);
            std::process::exit(1);
        }
    }
}

/// One line describing what a write did.
pub fn format_outcome(outcome: &WriteOutcome) -> String {
    match outcome {
        WriteOutcome::Advanced { from, to } => format!("{} -> {}", from, to),
        WriteOutcome::Completed { step } => format!("{} -> completed", step),
        WriteOutcome::AlreadyCompleted => "already completed (ignored)".to_string(),
    }
}

/// The workflow as indented lines, with parallel branches nested under their
/// task.
pub fn format_workflow(tasks: &[Task]) -> Vec<String> {
    let mut lines = Vec::new();
    for (position, task) in tasks.iter().enumerate() {
        push_task(&mut lines, &format!("{:>2}.", position), task, 1);
    }
    lines
}

fn push_task(lines: &mut Vec<String>, label: &str, task: &Task, depth: usize) {
    let indent = "  ".repeat(depth);
    let detail = match task {
        Task::Start(t) => format!("who can start: {}", t.who_can_start_it),
        Task::Input(_) | Task::Approval(_) => match task.assignees() {
            Some(assignees) if !assignees.is_empty() => format!("assignee: {}", assignees.join(", ")),
            _ => "assignee: none".to_string(),
        },
        Task::Parallel(p) => format!("{} branch(es)", p.branches.len()),
        Task::Goto(t) => format!("goto {} when {}", t.step_name, t.condition),
    };
    lines.push(format!("{}{} [{}] {}  ({})", indent, label, task.kind(), task.name(), detail));

    if let Task::Parallel(p) = task {
        for branch in &p.branches {
            lines.push(format!("{}  branch '{}' when {}", indent, branch.name, branch.happens));
            for nested in &branch.tasks {
                push_task(lines, "-", nested, depth + 2);
            }
        }
    }
}
