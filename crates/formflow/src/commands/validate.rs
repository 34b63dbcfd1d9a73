//! `formflow validate` -- decode an app and lint it.

use anyhow::{Context, Result};
use formflow_core::codec::load_app;
use formflow_core::lint::lint;
use tracing::warn;

use crate::cli::AppArgs;
use crate::context::RuntimeContext;
use crate::output::output_json;

/// Execute the `formflow validate` command.
///
/// Invariant violations fail the command; lint findings are only reported.
pub fn run(ctx: &RuntimeContext, args: &AppArgs) -> Result<()> {
    let app = load_app(&args.app)
        .with_context(|| format!("invalid app document {}", args.app.display()))?;

    let warnings: Vec<String> = lint(&app).iter().map(ToString::to_string).collect();
    for warning in &warnings {
        warn!(app = %app.name(), "{}", warning);
    }

    if ctx.json {
        output_json(&serde_json::json!({
            "app": app.name(),
            "valid": true,
            "warnings": warnings,
        }));
    } else if warnings.is_empty() {
        println!("{}: ok", app.name());
    } else {
        println!("{}: ok, {} warning(s)", app.name(), warnings.len());
        for warning in &warnings {
            println!("  - {}", warning);
        }
    }

    Ok(())
}
