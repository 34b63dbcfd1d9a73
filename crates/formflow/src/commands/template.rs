//! `formflow template` -- the write template for a user at the current step.

use anyhow::Result;
use formflow_core::codec::{DocumentFormat, dump_write_template};

use crate::cli::ProjectionArgs;
use crate::commands::session::Session;
use crate::context::RuntimeContext;

/// Execute the `formflow template` command.
///
/// The output is a ready-to-edit payload for `--submit`.
pub fn run(ctx: &RuntimeContext, args: &ProjectionArgs) -> Result<()> {
    let mut session = Session::start(ctx, &args.replay)?;
    session.replay(&args.replay.submit)?;

    let user = args.as_user.as_deref().unwrap_or(&ctx.actor);
    let template = session.engine.write_template(session.instance, user)?;

    let format = if ctx.json {
        DocumentFormat::Json
    } else {
        DocumentFormat::Yaml
    };
    let rendered = dump_write_template(&template, format)?;
    print!("{}", rendered);
    if !rendered.ends_with('\n') {
        println!();
    }
    Ok(())
}
