//! Clap CLI definitions for the `formflow` command.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// formflow -- permission-driven form workflows.
///
/// Load an app document (a form plus the workflow that fills it in), then
/// inspect it or replay submissions against a fresh instance.
#[derive(Parser, Debug)]
#[command(
    name = "formflow",
    about = "Permission-driven form workflows",
    version,
    propagate_version = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Global flags available to all subcommands.
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Config file (default: nearest formflow.yaml, formflow.yml or formflow.toml).
    #[arg(long, global = true, env = "FORMFLOW_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output in JSON format.
    #[arg(long, global = true)]
    pub json: bool,

    /// Enable verbose/debug output.
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    /// Acting user (default: $FORMFLOW_ACTOR, $USER).
    #[arg(long, global = true, env = "FORMFLOW_ACTOR")]
    pub actor: Option<String>,
}

/// All available subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Decode an app, checking its invariants, and report lint warnings.
    Validate(AppArgs),

    /// Summarize an app's sections and workflow.
    Show(AppArgs),

    /// Print what a user sees at the current step.
    View(ProjectionArgs),

    /// Print the write template a user would fill in at the current step.
    Template(ProjectionArgs),

    /// Replay submissions and report the outcome of each.
    Run(ReplayArgs),

    /// Generate shell completions.
    Completion(CompletionArgs),

    /// Print version information.
    Version,
}

#[derive(Args, Debug)]
pub struct AppArgs {
    /// App document (YAML or JSON).
    pub app: PathBuf,
}

/// An instance to create and the writes to replay against it.
#[derive(Args, Debug)]
pub struct ReplayArgs {
    /// App document (YAML or JSON).
    pub app: PathBuf,

    /// Instance creator (default: the acting user).
    #[arg(long)]
    pub creator: Option<String>,

    /// Submit FILE as USER, in order. Repeatable.
    #[arg(long = "submit", value_name = "USER=FILE", value_parser = parse_submit)]
    pub submit: Vec<SubmitSpec>,
}

#[derive(Args, Debug)]
pub struct ProjectionArgs {
    #[command(flatten)]
    pub replay: ReplayArgs,

    /// Project for this user (default: the acting user).
    #[arg(long = "as", value_name = "USER")]
    pub as_user: Option<String>,
}

/// One `--submit USER=FILE` pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitSpec {
    pub user: String,
    pub file: PathBuf,
}

fn parse_submit(raw: &str) -> Result<SubmitSpec, String> {
    match raw.split_once('=') {
        Some((user, file)) if !user.is_empty() && !file.is_empty() => Ok(SubmitSpec {
            user: user.to_string(),
            file: PathBuf::from(file),
        }),
        _ => Err(format!("expected USER=FILE, got '{}'", raw)),
    }
}

#[derive(Args, Debug)]
pub struct CompletionArgs {
    #[command(subcommand)]
    pub command: CompletionCommands,
}

/// Completion subcommands.
#[derive(Subcommand, Debug)]
pub enum CompletionCommands {
    /// Generate Bash completions.
    Bash,
    /// Generate Zsh completions.
    Zsh,
    /// Generate Fish completions.
    Fish,
    /// Generate PowerShell completions.
    Powershell,
}
