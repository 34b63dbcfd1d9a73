//! Runtime context for command execution.

use std::env;

use anyhow::{Context, Result};
use formflow_config::discover::find_config_file;
use formflow_config::{FormflowConfig, load_config};
use formflow_engine::EngineOptions;
use tracing::debug;

use crate::cli::GlobalArgs;

/// Runtime context passed to every command handler.
///
/// Constructed once in `main` after CLI parsing, before command dispatch.
#[derive(Debug)]
pub struct RuntimeContext {
    /// Acting user for views, templates and instance creation.
    pub actor: String,

    /// Whether to produce JSON output.
    pub json: bool,

    pub config: FormflowConfig,
}

impl RuntimeContext {
    /// Build a `RuntimeContext` from parsed global arguments.
    ///
    /// An explicit `--config` must exist. Otherwise the nearest config file
    /// above the current directory is used when there is one.
    pub fn from_global_args(global: &GlobalArgs) -> Result<Self> {
        let config_path = match &global.config {
            Some(path) => Some(path.clone()),
            None => env::current_dir().ok().and_then(|dir| find_config_file(&dir)),
        };
        debug!(path = ?config_path, "resolved config file");

        let config = load_config(config_path.as_deref()).with_context(|| match &config_path {
            Some(path) => format!("failed to load config from {}", path.display()),
            None => "failed to load config from environment".to_string(),
        })?;

        Ok(Self {
            actor: resolve_actor(global.actor.as_deref()),
            json: global.json || config.output.json,
            config,
        })
    }

    pub fn engine_options(&self) -> EngineOptions {
        self.config.engine_options()
    }
}

/// Resolves the acting user.
///
/// Priority: explicit flag > FORMFLOW_ACTOR env > USER env > "unknown".
fn resolve_actor(flag_value: Option<&str>) -> String {
    if let Some(actor) = flag_value.filter(|a| !a.is_empty()) {
        return actor.to_string();
    }

    for var in ["FORMFLOW_ACTOR", "USER", "USERNAME"] {
        if let Ok(actor) = env::var(var) {
            if !actor.is_empty() {
                return actor;
            }
        }
    }

    "unknown".to_string()
}
