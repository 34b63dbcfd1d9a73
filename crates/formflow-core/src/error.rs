//! Model error types.

/// Errors raised while building or decoding an application.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    /// The workflow does not begin with a start task (or is empty).
    #[error("workflow must contain one, and only one, start task at the beginning")]
    MissingStartTask,

    /// A start task appears after the first position.
    #[error("workflow has a second start task at position {position}")]
    MisplacedStartTask {
        /// Zero-based position of the offending task.
        position: usize,
    },

    /// A task's permission policy names a section the form does not have.
    #[error("unknown section '{section}' in permissions of task '{task}'")]
    UnknownSection {
        /// Name of the task carrying the policy.
        task: String,
        /// The section name that could not be found.
        section: String,
    },

    /// The document could not be decoded or encoded.
    #[error("parse error: {0}")]
    Parse(String),

    /// A document file could not be read or written.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ModelError {
    /// Returns `true` if this error is a violated construction invariant
    /// rather than a codec or I/O failure.
    pub fn is_invariant(&self) -> bool {
        matches!(
            self,
            Self::MissingStartTask | Self::MisplacedStartTask { .. } | Self::UnknownSection { .. }
        )
    }
}

/// Convenience alias used throughout the core crate.
pub type Result<T> = std::result::Result<T, ModelError>;
