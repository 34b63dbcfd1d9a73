//! Engine error types.

use formflow_core::{ModelError, PermissionLevel};

fn or_null<T: std::fmt::Display>(value: &Option<T>) -> String {
    value
        .as_ref()
        .map(ToString::to_string)
        .unwrap_or_else(|| "null".to_string())
}

/// Why a submitted payload was refused.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubmissionError {
    /// The acting user is not the assignee of the current step.
    #[error("{user} is not the current assignee ({})", or_null(.assignee))]
    NotAssignee {
        user: String,
        assignee: Option<String>,
    },

    /// The payload names a different user than the one acting.
    #[error("payload was prepared for {payload}, submitted by {acting}")]
    UserMismatch { acting: String, payload: String },

    /// The payload was prepared for a step that is no longer current.
    #[error("stale submission for step {submitted} (current step is {})", or_null(.expected))]
    StaleSubmission {
        expected: Option<usize>,
        submitted: usize,
    },

    /// The section exists but is not editable at the current step.
    #[error("section '{section}' is {level} at this step")]
    ForbiddenSection {
        section: String,
        level: PermissionLevel,
    },

    #[error("unknown section '{0}'")]
    UnknownSection(String),

    #[error("unknown field '{field}' in section '{section}'")]
    UnknownField { section: String, field: String },

    #[error("field '{field}' in section '{section}' expects a {expected} field, got a {found} value")]
    FieldTypeMismatch {
        section: String,
        field: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("field '{field}' submitted more than once in section '{section}'")]
    DuplicateField { section: String, field: String },

    #[error("required field '{field}' missing from section '{section}'")]
    MissingRequiredField { section: String, field: String },
}

/// Errors raised by the engine.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("no app registered at index {0}")]
    UnknownApp(usize),

    #[error("no instance at index {0}")]
    UnknownInstance(usize),

    /// The start policy refused to let `user` start the app.
    #[error("access denied: {user} may not start '{app}'")]
    StartDenied { app: String, user: String },

    #[error("submission rejected: {0}")]
    Submission(#[from] SubmissionError),

    #[error(transparent)]
    Model(#[from] ModelError),
}

impl EngineError {
    /// Returns `true` for access-control failures (start denial or a write
    /// by someone other than the assignee).
    pub fn is_access_denied(&self) -> bool {
        matches!(
            self,
            Self::StartDenied { .. } | Self::Submission(SubmissionError::NotAssignee { .. })
        )
    }
}

/// Convenience alias used throughout the engine crate.
pub type Result<T> = std::result::Result<T, EngineError>;
