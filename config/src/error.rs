//! Configuration errors

use std::path::PathBuf;

use thiserror::Error;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
  /// Configuration file does not exist
  #[error("configuration file not found: {}", .0.display())]
  NotFound(PathBuf),

  /// Configuration file could not be read
  #[error("failed to read {}: {source}", path.display())]
  Read {
    path: PathBuf,
    source: std::io::Error,
  },

  /// Configuration file is not valid YAML for the expected schema
  #[error("failed to parse {}: {source}", path.display())]
  Parse {
    path: PathBuf,
    source: serde_yaml::Error,
  },

  /// Configuration file could not be written back
  #[error("failed to write {}: {message}", path.display())]
  Write { path: PathBuf, message: String },

  /// A required key is absent or empty
  #[error("missing `{0}` in configuration; add it under the `skydeck` section")]
  MissingKey(&'static str),

  /// A `KEY=VALUE` override could not be applied
  #[error("invalid override `{key}`: {reason}")]
  InvalidOverride { key: String, reason: String },

  /// No home directory to place the default configuration in
  #[error("no home directory found; pass --config or set {0}")]
  NoHomeDir(&'static str),
}

/// Alias for Result<T, ConfigError>
pub type Result<T> = std::result::Result<T, ConfigError>;
