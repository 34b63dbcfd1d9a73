//! Configuration for formflow.
//!
//! [`FormflowConfig`] is layered by [`load_config`]: built-in defaults, then
//! a `formflow.yaml` (or `.toml`) file, then `FORMFLOW_*` environment
//! variables. [`discover::find_config_file`] locates the file by walking up
//! from a starting directory.

pub mod config;
pub mod discover;

pub use config::{ConfigError, EngineConfig, FormflowConfig, OutputConfig, Result, load_config};
