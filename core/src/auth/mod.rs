//! Credential handling
//!
//! The access token rides on every request as a session cookie and is
//! renewed in place when it expires; the refresh token is only ever sent to
//! the renewal endpoint.

pub mod storage;

pub use storage::{CredentialStore, MemoryCredentialStore, YamlCredentialStore};

use std::fmt;

/// Access/refresh token pair
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
  /// Short-lived session credential
  pub access_token: String,

  /// Long-lived renewal credential
  pub refresh_token: String,
}

impl Credentials {
  pub fn new(access_token: impl Into<String>, refresh_token: impl Into<String>) -> Self {
    Self {
      access_token: access_token.into(),
      refresh_token: refresh_token.into(),
    }
  }
}

impl fmt::Debug for Credentials {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Credentials")
      .field("access_token", &"[REDACTED]")
      .field("refresh_token", &"[REDACTED]")
      .finish()
  }
}

/// Everything the store knows at process start
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredSession {
  /// Credentials to authenticate with
  pub credentials: Credentials,

  /// Conversation used by the previous invocation
  pub conversation_id: Option<u64>,
}
