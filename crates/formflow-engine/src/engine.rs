//! Registry of apps and their running instances.

use std::fmt;
use std::sync::Arc;

use formflow_core::App;
use formflow_core::codec::{self, DocumentFormat};
use formflow_core::submission::WriteTemplate;
use tracing::{debug, info};

use crate::collab::{AllowAll, StartPolicy};
use crate::error::{EngineError, Result};
use crate::instance::{AppInstance, WriteOutcome};
use crate::options::EngineOptions;
use crate::view::ViewOutcome;

type CompletionHook = Box<dyn Fn(usize, &AppInstance)>;

/// Owns registered apps and live instances. Both are addressed by the index
/// returned when they were added; nothing is ever removed.
pub struct Engine {
    apps: Vec<Arc<App>>,
    instances: Vec<AppInstance>,
    options: EngineOptions,
    start_policy: Box<dyn StartPolicy>,
    completion_hooks: Vec<CompletionHook>,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Engine")
            .field("apps", &self.apps.len())
            .field("instances", &self.instances.len())
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl Engine {
    pub fn new() -> Self {
        Self::with_options(EngineOptions::default())
    }

    pub fn with_options(options: EngineOptions) -> Self {
        Self {
            apps: Vec::new(),
            instances: Vec::new(),
            options,
            start_policy: Box::new(AllowAll),
            completion_hooks: Vec::new(),
        }
    }

    /// Replace the gate consulted by [`Engine::new_app_instance`].
    pub fn with_start_policy(mut self, policy: impl StartPolicy + 'static) -> Self {
        self.start_policy = Box::new(policy);
        self
    }

    /// Run `hook` each time an instance completes.
    pub fn on_complete(&mut self, hook: impl Fn(usize, &AppInstance) + 'static) {
        self.completion_hooks.push(Box::new(hook));
    }

    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    // ------------------------------------------------------------------
    // Apps
    // ------------------------------------------------------------------

    pub fn register_app(&mut self, app: App) -> usize {
        let index = self.apps.len();
        info!(index, app = %app.name(), "registered app");
        self.apps.push(Arc::new(app));
        index
    }

    pub fn apps(&self) -> &[Arc<App>] {
        &self.apps
    }

    pub fn app(&self, index: usize) -> Result<&App> {
        self.apps
            .get(index)
            .map(Arc::as_ref)
            .ok_or(EngineError::UnknownApp(index))
    }

    // ------------------------------------------------------------------
    // Instances
    // ------------------------------------------------------------------

    /// Start an instance of app `app_index` for `user`.
    pub fn new_app_instance(&mut self, app_index: usize, user: &str) -> Result<usize> {
        let app = self
            .apps
            .get(app_index)
            .cloned()
            .ok_or(EngineError::UnknownApp(app_index))?;

        if !self.start_policy.can_start(&app, user) {
            return Err(EngineError::StartDenied {
                app: app.name().to_string(),
                user: user.to_string(),
            });
        }

        let index = self.instances.len();
        info!(index, app = %app.name(), creator = user, "created instance");
        self.instances.push(AppInstance::new(app, user));
        Ok(index)
    }

    pub fn instance(&self, index: usize) -> Result<&AppInstance> {
        self.instances
            .get(index)
            .ok_or(EngineError::UnknownInstance(index))
    }

    pub fn instances(&self) -> &[AppInstance] {
        &self.instances
    }

    fn instance_mut(&mut self, index: usize) -> Result<&mut AppInstance> {
        self.instances
            .get_mut(index)
            .ok_or(EngineError::UnknownInstance(index))
    }

    pub fn view_as(&self, instance: usize, user: &str) -> Result<ViewOutcome> {
        Ok(self.instance(instance)?.view_as(user))
    }

    pub fn write_template(&self, instance: usize, user: &str) -> Result<WriteTemplate> {
        let placeholder = &self.options.text_placeholder;
        Ok(self.instance(instance)?.write_template_with(user, placeholder))
    }

    /// Submit `payload` to instance `index` as `user`, under the engine's
    /// options. Completion hooks fire on the write that completes the
    /// instance and never again.
    pub fn write_as(
        &mut self,
        index: usize,
        user: &str,
        payload: &WriteTemplate,
    ) -> Result<WriteOutcome> {
        let options = self.options.clone();
        let outcome = self
            .instance_mut(index)?
            .write_as_with(user, payload, &options)?;

        if let WriteOutcome::Completed { .. } = outcome {
            let instance = &self.instances[index];
            debug!(index, hooks = self.completion_hooks.len(), "running completion hooks");
            for hook in &self.completion_hooks {
                hook(index, instance);
            }
        }
        Ok(outcome)
    }

    /// Decode a write-template document and submit it.
    pub fn write_as_document(
        &mut self,
        index: usize,
        user: &str,
        content: &str,
        format: DocumentFormat,
    ) -> Result<WriteOutcome> {
        let payload = codec::parse_write_template(content, format)?;
        self.write_as(index, user, &payload)
    }
}
