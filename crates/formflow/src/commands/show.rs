//! `formflow show` -- summarize an app.

use anyhow::{Context, Result};
use formflow_core::FormSection;
use formflow_core::codec::load_app;

use crate::cli::AppArgs;
use crate::context::RuntimeContext;
use crate::output::{format_workflow, output_json};

/// Execute the `formflow show` command.
pub fn run(ctx: &RuntimeContext, args: &AppArgs) -> Result<()> {
    let app = load_app(&args.app)
        .with_context(|| format!("failed to load app from {}", args.app.display()))?;

    if ctx.json {
        output_json(&app);
        return Ok(());
    }

    println!("{}", app.name());
    if let Some(description) = app.description() {
        println!("  {}", description);
    }

    let sections = &app.form().sections;
    println!();
    println!("Sections ({}):", sections.len());
    for form_section in sections {
        match form_section {
            FormSection::Section(section) => {
                println!("  {}  ({} field(s))", section.name, section.fields.len());
                for field in &section.fields {
                    let marker = if field.required() { " *" } else { "" };
                    println!("    {} [{}] {}{}", field.id(), field.kind(), field.label(), marker);
                }
            }
        }
    }

    let tasks = app.workflow().tasks();
    println!();
    println!("Workflow ({} task(s)):", tasks.len());
    for line in format_workflow(tasks) {
        println!("{}", line);
    }

    Ok(())
}
