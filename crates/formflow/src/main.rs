//! `formflow` -- permission-driven form workflows.
//!
//! Parses CLI arguments with clap, sets up logging, resolves the runtime
//! context and dispatches to command handlers.

mod cli;
mod commands;
mod context;
mod output;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};
use context::RuntimeContext;

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("formflow=debug,formflow_core=debug,formflow_engine=debug,formflow_config=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.global.verbose);

    let result = RuntimeContext::from_global_args(&cli.global).and_then(|ctx| match &cli.command {
        Some(Commands::Validate(args)) => commands::validate::run(&ctx, args),
        Some(Commands::Show(args)) => commands::show::run(&ctx, args),
        Some(Commands::View(args)) => commands::view::run(&ctx, args),
        Some(Commands::Template(args)) => commands::template::run(&ctx, args),
        Some(Commands::Run(args)) => commands::run::run(&ctx, args),
        Some(Commands::Completion(args)) => commands::completion::run(&ctx, args),
        Some(Commands::Version) => commands::version::run(&ctx),
        None => {
            use clap::CommandFactory;
            Cli::command().print_help().ok();
            println!();
            Ok(())
        }
    });

    if let Err(e) = result {
        if cli.global.json {
            let err_json = serde_json::json!({
                "error": format!("{:#}", e),
            });
            if let Ok(s) = serde_json::to_string_pretty(&err_json) {
                eprintln!("{}", s);
            }
        } else {
            eprintln!("Error: {:#}", e);
        }
        std::process::exit(1);
    }
}
