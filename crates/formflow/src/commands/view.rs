//! `formflow view` -- the read view for a user at the current step.

use anyhow::Result;

use crate::cli::ProjectionArgs;
use crate::commands::session::Session;
use crate::context::RuntimeContext;
use crate::output::output_json;

/// Execute the `formflow view` command.
///
/// A denied view is printed like any other outcome; it is not an error.
pub fn run(ctx: &RuntimeContext, args: &ProjectionArgs) -> Result<()> {
    let mut session = Session::start(ctx, &args.replay)?;
    session.replay(&args.replay.submit)?;

    let user = args.as_user.as_deref().unwrap_or(&ctx.actor);
    let outcome = session.engine.view_as(session.instance, user)?;

    if ctx.json {
        output_json(&outcome);
    } else {
        println!("{}", outcome);
    }
    Ok(())
}
