//! Runtime for formflow applications.
//!
//! An [`AppInstance`] walks an app's workflow one task at a time. For any
//! user it projects a read view and a write template from the current task's
//! permission policy, and it advances when the current assignee submits.
//! The [`Engine`] owns registered apps and live instances, both identified by
//! their index.

pub mod collab;
pub mod engine;
pub mod error;
pub mod instance;
pub mod options;
pub mod validate;
pub mod view;

pub use collab::{
    AllowAll, GuardEvaluator, IdentityResolver, InstanceContext, LiteralIdentityResolver,
    StartPolicy, INITIATOR_ALIAS,
};
pub use engine::Engine;
pub use error::{EngineError, Result, SubmissionError};
pub use instance::{AppInstance, InstanceStatus, Submission, WriteOutcome};
pub use options::{EngineOptions, WriteValidation};
pub use view::{FieldView, RenderedView, SectionMode, SectionView, ViewOutcome};
