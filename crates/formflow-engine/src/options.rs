//! Runtime knobs for the write path and template projection.

use std::fmt;

use formflow_core::value::DEFAULT_TEXT_PLACEHOLDER;
use serde::{Deserialize, Serialize};

/// How strictly submitted payloads are checked before the instance advances.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WriteValidation {
    /// Accept every payload and advance unconditionally.
    Off,
    /// Check, log each violation, then accept.
    Warn,
    /// Reject the first violation.
    #[default]
    Strict,
}

impl fmt::Display for WriteValidation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Off => "off",
            Self::Warn => "warn",
            Self::Strict => "strict",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineOptions {
    pub write_validation: WriteValidation,

    /// Reject payloads whose `step_index` is not the live step.
    pub check_step_index: bool,

    /// Value of fresh text containers in write templates.
    pub text_placeholder: String,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            write_validation: WriteValidation::default(),
            check_step_index: true,
            text_placeholder: DEFAULT_TEXT_PLACEHOLDER.to_string(),
        }
    }
}

impl EngineOptions {
    /// Options that reproduce the unchecked write path.
    pub fn permissive() -> Self {
        Self {
            write_validation: WriteValidation::Off,
            check_step_index: false,
            ..Self::default()
        }
    }
}
