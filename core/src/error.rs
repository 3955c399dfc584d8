//! Session error types

use reqwest::StatusCode;
use thiserror::Error;

/// Errors surfaced by the session client and the chat driver
#[derive(Error, Debug)]
pub enum SessionError {
  /// Credentials or settings are missing or unreadable
  #[error("Configuration error: {0}")]
  Config(String),

  /// Network-level failure; never retried
  #[error("Transport error: {0}")]
  Transport(#[from] reqwest::Error),

  /// Renewal failed, or the request stayed unauthorized after renewal
  #[error("Authentication failed: {0}")]
  Auth(String),

  /// Non-success status other than an unauthorized one
  #[error("Upstream returned HTTP {status}: {body}")]
  Upstream { status: StatusCode, body: String },

  /// Response body did not have the expected shape
  #[error("Failed to decode response ({message}); body: {body}")]
  Decode { message: String, body: String },

  /// Nothing to send
  #[error("Invalid input: {0}")]
  InvalidInput(String),

  /// The browser could not be launched
  #[error("Failed to open browser: {0}")]
  Browser(String),

  /// Writing the reply failed
  #[error("IO error: {0}")]
  Io(#[from] std::io::Error),
}

impl From<lazyai_config::ConfigError> for SessionError {
  fn from(error: lazyai_config::ConfigError) -> Self {
    Self::Config(error.to_string())
  }
}

/// Alias for Result<T, SessionError>
pub type Result<T> = std::result::Result<T, SessionError>;
