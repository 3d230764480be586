// Configuration Management
//
// This crate turns raw key/value environment definitions into validated,
// typed configurations for the two MCP servers. It provides:
// - Configuration structs with role-specific defaults
// - A pure loading contract (the origin of the key/value mapping is
//   irrelevant) plus process-env and env-file entry points
// - Secret marking for key material so it never reaches logs
//
// Loading happens once at process start; a loaded configuration is immutable
// and can be shared freely between tasks.

use std::collections::HashMap;
use std::path::Path;

use thiserror::Error;

pub mod types;

// Re-export all configuration types
pub use types::*;

/// Startup-fatal configuration errors.
///
/// The loaders fail fast: the first error encountered is returned. Messages
/// name the offending key; secret values are never echoed.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required configuration key {key}")]
    MissingRequired { key: &'static str },

    #[error("configuration key {key} has invalid value {value:?}")]
    InvalidType { key: &'static str, value: String },

    #[error("configuration key {key} has unsupported value {value:?} (expected one of: debug, info, warn, error)")]
    InvalidEnum { key: &'static str, value: String },

    #[error("configuration key {key} points to {path:?}, which is not an existing directory")]
    InvalidPath { key: &'static str, path: String },

    #[error("failed to read env file: {source}")]
    EnvFile {
        #[from]
        source: dotenvy::Error,
    },
}

impl SearchServerConfig {
    /// Load from a snapshot of the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::load(&env_snapshot())
    }

    /// Load from a `KEY=value` env file without touching the process
    /// environment. `#` comments, including comment text trailing a value,
    /// are stripped.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        Self::load(&file_snapshot(path)?)
    }
}

impl FilesystemServerConfig {
    /// Load from a snapshot of the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::load(&env_snapshot())
    }

    /// Load from a `KEY=value` env file without touching the process
    /// environment.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        Self::load(&file_snapshot(path)?)
    }
}

fn env_snapshot() -> HashMap<String, String> {
    std::env::vars().collect()
}

fn file_snapshot<P: AsRef<Path>>(path: P) -> Result<HashMap<String, String>, ConfigError> {
    let mut raw = HashMap::new();
    for item in dotenvy::from_path_iter(path)? {
        let (key, value) = item?;
        raw.insert(key, value);
    }
    Ok(raw)
}
