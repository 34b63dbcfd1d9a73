//! A single-instance engine shared by `view`, `template` and `run`.

use std::path::Path;

use anyhow::{Context, Result};
use formflow_core::codec::{DocumentFormat, load_app};
use formflow_engine::{AppInstance, Engine, EngineError, WriteOutcome};
use tracing::info;

use crate::cli::{ReplayArgs, SubmitSpec};
use crate::context::RuntimeContext;

/// An engine holding one app and one instance of it.
pub struct Session {
    pub engine: Engine,
    pub instance: usize,
}

impl Session {
    /// Load the app and start an instance for `--creator` (or the actor).
    pub fn start(ctx: &RuntimeContext, args: &ReplayArgs) -> Result<Self> {
        let app = load_app(&args.app)
            .with_context(|| format!("failed to load app from {}", args.app.display()))?;

        let mut engine = Engine::with_options(ctx.engine_options());
        engine.on_complete(|index, instance| {
            info!(index, app = %instance.app().name(), "instance completed");
        });

        let app_index = engine.register_app(app);
        let creator = args.creator.as_deref().unwrap_or(&ctx.actor);
        let instance = engine.new_app_instance(app_index, creator)?;
        Ok(Self { engine, instance })
    }

    pub fn instance(&self) -> &AppInstance {
        &self.engine.instances()[self.instance]
    }

    /// Submit one payload file. The outer error covers reading the file; the
    /// inner one is the engine's verdict.
    pub fn submit(&mut self, spec: &SubmitSpec) -> Result<std::result::Result<WriteOutcome, EngineError>> {
        let content = read_payload(&spec.file)?;
        let format = DocumentFormat::from_path(&spec.file).unwrap_or(DocumentFormat::Yaml);
        Ok(self
            .engine
            .write_as_document(self.instance, &spec.user, &content, format))
    }

    /// Submit every payload in order, stopping at the first rejection.
    pub fn replay(&mut self, specs: &[SubmitSpec]) -> Result<()> {
        for spec in specs {
            self.submit(spec)?.with_context(|| {
                format!("submission by {} from {} rejected", spec.user, spec.file.display())
            })?;
        }
        Ok(())
    }
}

fn read_payload(path: &Path) -> Result<String> {
    std::fs::read_to_string(path)
        .with_context(|| format!("failed to read payload {}", path.display()))
}
