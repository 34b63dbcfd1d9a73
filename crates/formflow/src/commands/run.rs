//! `formflow run` -- replay submissions and report each outcome.

use anyhow::{Result, bail};
use formflow_engine::{InstanceStatus, WriteOutcome};
use serde::Serialize;

use crate::cli::ReplayArgs;
use crate::commands::session::Session;
use crate::context::RuntimeContext;
use crate::output::{format_outcome, output_json};

#[derive(Serialize)]
struct WriteRecord {
    user: String,
    file: String,
    step: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    outcome: Option<WriteOutcome>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

#[derive(Serialize)]
struct RunReport {
    app: String,
    creator: String,
    writes: Vec<WriteRecord>,
    status: InstanceStatus,
    current_step: String,
}

/// Execute the `formflow run` command.
///
/// Every submission is attempted even after a rejection. The command fails
/// if any was rejected.
pub fn run(ctx: &RuntimeContext, args: &ReplayArgs) -> Result<()> {
    let mut session = Session::start(ctx, args)?;

    let mut writes = Vec::with_capacity(args.submit.len());
    for spec in &args.submit {
        let step = session.instance().current_step().to_string();
        let (outcome, error) = match session.submit(spec)? {
            Ok(outcome) => (Some(outcome), None),
            Err(e) => (None, Some(e.to_string())),
        };
        writes.push(WriteRecord {
            user: spec.user.clone(),
            file: spec.file.display().to_string(),
            step,
            outcome,
            error,
        });
    }

    let instance = session.instance();
    let report = RunReport {
        app: instance.app().name().to_string(),
        creator: instance.creator().to_string(),
        writes,
        status: instance.status(),
        current_step: instance.current_step().to_string(),
    };

    if ctx.json {
        output_json(&report);
    } else {
        for (i, write) in report.writes.iter().enumerate() {
            let result = match (&write.outcome, &write.error) {
                (Some(outcome), _) => format_outcome(outcome),
                (None, Some(error)) => format!("rejected: {}", error),
                (None, None) => String::new(),
            };
            println!("{:>2}. {} at {}: {}", i + 1, write.user, write.step, result);
        }
        let status = match report.status {
            InstanceStatus::Active => "active",
            InstanceStatus::Completed => "completed",
        };
        println!("status: {} (step: {})", status, report.current_step);
    }

    let rejected = report.writes.iter().filter(|w| w.error.is_some()).count();
    if rejected > 0 {
        bail!("{} of {} submission(s) rejected", rejected, report.writes.len());
    }
    Ok(())
}
