//! Configuration types and layered loading.
//!
//! Keys use kebab-case, matching the YAML file:
//!
//! ```yaml
//! engine:
//!   write-validation: strict
//!   check-step-index: true
//!   text-placeholder: some text here
//! output:
//!   json: false
//! ```
//!
//! Environment variables override the file. `FORMFLOW_ENGINE__WRITE_VALIDATION=warn`
//! sets `engine.write-validation`: the prefix is stripped, `__` separates
//! nesting levels and `_` stands for `-`.

use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Format, Toml, Yaml};
use formflow_engine::{EngineOptions, WriteValidation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Prefix of environment variables read by [`load_config`].
pub const ENV_PREFIX: &str = "FORMFLOW_";

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    /// An explicitly requested config file does not exist.
    #[error("config file not found: {}", .0.display())]
    NotFound(PathBuf),

    /// A layer could not be read, or a value had the wrong shape.
    #[error("invalid configuration: {0}")]
    Invalid(#[from] figment::Error),
}

impl ConfigError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

pub type Result<T> = std::result::Result<T, ConfigError>;

// ---------------------------------------------------------------------------
// Sections
// ---------------------------------------------------------------------------

/// `engine.*` keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// `off` | `warn` | `strict`.
    #[serde(default, rename = "write-validation")]
    pub write_validation: WriteValidation,

    #[serde(default = "default_true", rename = "check-step-index")]
    pub check_step_index: bool,

    /// Scalars are taken as text, so `42` or `true` are valid placeholders.
    #[serde(
        default = "default_text_placeholder",
        rename = "text-placeholder",
        deserialize_with = "deserialize_scalar_as_string"
    )]
    pub text_placeholder: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            write_validation: WriteValidation::default(),
            check_step_index: default_true(),
            text_placeholder: default_text_placeholder(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_text_placeholder() -> String {
    EngineOptions::default().text_placeholder
}

fn deserialize_scalar_as_string<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de;

    struct ScalarVisitor;

    impl de::Visitor<'_> for ScalarVisitor {
        type Value = String;

        fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
            formatter.write_str("a string, number or boolean")
        }

        fn visit_str<E: de::Error>(self, v: &str) -> std::result::Result<Self::Value, E> {
            Ok(v.to_string())
        }

        fn visit_string<E: de::Error>(self, v: String) -> std::result::Result<Self::Value, E> {
            Ok(v)
        }

        fn visit_bool<E: de::Error>(self, v: bool) -> std::result::Result<Self::Value, E> {
            Ok(v.to_string())
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> std::result::Result<Self::Value, E> {
            Ok(v.to_string())
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> std::result::Result<Self::Value, E> {
            Ok(v.to_string())
        }

        fn visit_i128<E: de::Error>(self, v: i128) -> std::result::Result<Self::Value, E> {
            Ok(v.to_string())
        }

        fn visit_u128<E: de::Error>(self, v: u128) -> std::result::Result<Self::Value, E> {
            Ok(v.to_string())
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> std::result::Result<Self::Value, E> {
            Ok(v.to_string())
        }
    }

    deserializer.deserialize_any(ScalarVisitor)
}

/// `output.*` keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct OutputConfig {
    /// Print JSON instead of human-readable text.
    #[serde(default)]
    pub json: bool,
}

/// The full configuration. Every key is optional.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct FormflowConfig {
    #[serde(default)]
    pub engine: EngineConfig,

    #[serde(default)]
    pub output: OutputConfig,
}

impl FormflowConfig {
    pub fn engine_options(&self) -> EngineOptions {
        EngineOptions {
            write_validation: self.engine.write_validation,
            check_step_index: self.engine.check_step_index,
            text_placeholder: self.engine.text_placeholder.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

fn env_layer(prefix: &str) -> Env {
    Env::prefixed(prefix).map(|key| key.as_str().replace("__", ".").replace('_', "-").into())
}

fn layered(path: Option<&Path>, env_prefix: &str) -> Figment {
    let mut figment = Figment::new();
    if let Some(path) = path {
        figment = match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => figment.merge(Toml::file(path)),
            _ => figment.merge(Yaml::file(path)),
        };
    }
    figment.merge(env_layer(env_prefix))
}

fn load_with_prefix(path: Option<&Path>, env_prefix: &str) -> Result<FormflowConfig> {
    if let Some(path) = path {
        if !path.is_file() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }
    }
    debug!(path = ?path, "loading configuration");
    Ok(layered(path, env_prefix).extract()?)
}

/// Load configuration from `path` (if any) and the environment.
///
/// A `.toml` extension selects TOML; anything else is read as YAML. With no
/// path only defaults and environment variables apply.
///
/// # Errors
///
/// Returns [`ConfigError::NotFound`] if `path` is given but missing, or
/// [`ConfigError::Invalid`] if a layer fails to parse or holds a value of
/// the wrong type.
pub fn load_config(path: Option<&Path>) -> Result<FormflowConfig> {
    load_with_prefix(path, ENV_PREFIX)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
