//! Core types for formflow applications.
//!
//! An application is a [`Form`](form::Form) (named sections of typed fields)
//! bound to a [`Workflow`](workflow::Workflow) (an ordered list of tasks, each
//! with a section permission policy). This crate holds the closed data model,
//! its construction invariants, permission resolution and the document codec.
//! The runtime state machine lives in `formflow-engine`.

pub mod app;
pub mod codec;
pub mod error;
pub mod field;
pub mod form;
pub mod lint;
pub mod permission;
pub mod submission;
pub mod task;
pub mod value;
pub mod workflow;

pub use app::App;
pub use error::{ModelError, Result};
pub use field::InputField;
pub use form::{Form, FormSection, Section};
pub use permission::{PermissionLevel, Permissions, resolve_section};
pub use submission::WriteTemplate;
pub use task::{AdvancedAllowedApprover, Branch, Task};
pub use value::ValueContainer;
pub use workflow::Workflow;
