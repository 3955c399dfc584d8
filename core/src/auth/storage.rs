//! Credential storage
//!
//! Reads the credentials and last conversation at start-up and persists the
//! values a session changes.

use std::sync::{Mutex, MutexGuard, PoisonError};

use lazyai_config::{ACCESS_TOKEN_KEY, CONVERSATION_ID_KEY, ConfigLoader};
use serde_yaml::Value;
use tracing::debug;

use super::{Credentials, StoredSession};
use crate::error::Result;

/// Credential storage trait
#[async_trait::async_trait]
pub trait CredentialStore: Send + Sync {
  /// Load credentials and the persisted conversation
  async fn load(&self) -> Result<StoredSession>;

  /// Persist a renewed access token
  async fn save_access_token(&self, access_token: &str) -> Result<()>;

  /// Persist the conversation the next invocation should continue
  async fn save_conversation_id(&self, conversation_id: u64) -> Result<()>;
}

/// Store backed by the `skydeck` section of the YAML configuration file
pub struct YamlCredentialStore {
  loader: ConfigLoader,
}

impl YamlCredentialStore {
  pub fn new(loader: ConfigLoader) -> Self {
    Self { loader }
  }

  pub fn loader(&self) -> &ConfigLoader {
    &self.loader
  }
}

#[async_trait::async_trait]
impl CredentialStore for YamlCredentialStore {
  async fn load(&self) -> Result<StoredSession> {
    let config = self.loader.load()?;
    let (access_token, refresh_token) = config.skydeck.require_credentials()?;
    Ok(StoredSession {
      credentials: Credentials::new(access_token, refresh_token),
      conversation_id: config.skydeck.conversation_id(),
    })
  }

  async fn save_access_token(&self, access_token: &str) -> Result<()> {
    self
      .loader
      .set_value(ACCESS_TOKEN_KEY, Value::String(access_token.to_string()))?;
    debug!(path = %self.loader.path().display(), "persisted renewed access token");
    Ok(())
  }

  async fn save_conversation_id(&self, conversation_id: u64) -> Result<()> {
    self
      .loader
      .set_value(CONVERSATION_ID_KEY, Value::Number(conversation_id.into()))?;
    debug!(conversation_id, "persisted conversation id");
    Ok(())
  }
}

/// In-memory store (for testing)
///
/// Keeps a log of every write so callers can check how often a value was
/// persisted, not only its final state.
pub struct MemoryCredentialStore {
  state: Mutex<MemoryState>,
}

struct MemoryState {
  session: StoredSession,
  access_token_writes: Vec<String>,
  conversation_writes: Vec<u64>,
}

impl MemoryCredentialStore {
  pub fn new(credentials: Credentials, conversation_id: Option<u64>) -> Self {
    Self {
      state: Mutex::new(MemoryState {
        session: StoredSession {
          credentials,
          conversation_id,
        },
        access_token_writes: Vec::new(),
        conversation_writes: Vec::new(),
      }),
    }
  }

  /// Current stored session
  pub fn snapshot(&self) -> StoredSession {
    self.lock().session.clone()
  }

  /// Every access token written, oldest first
  pub fn access_token_writes(&self) -> Vec<String> {
    self.lock().access_token_writes.clone()
  }

  /// Every conversation id written, oldest first
  pub fn conversation_writes(&self) -> Vec<u64> {
    self.lock().conversation_writes.clone()
  }

  fn lock(&self) -> MutexGuard<'_, MemoryState> {
    self.state.lock().unwrap_or_else(PoisonError::into_inner)
  }
}

#[async_trait::async_trait]
impl CredentialStore for MemoryCredentialStore {
  async fn load(&self) -> Result<StoredSession> {
    Ok(self.snapshot())
  }

  async fn save_access_token(&self, access_token: &str) -> Result<()> {
    let mut state = self.lock();
    state.session.credentials.access_token = access_token.to_string();
    state.access_token_writes.push(access_token.to_string());
    Ok(())
  }

  async fn save_conversation_id(&self, conversation_id: u64) -> Result<()> {
    let mut state = self.lock();
    state.session.conversation_id = Some(conversation_id);
    state.conversation_writes.push(conversation_id);
    Ok(())
  }
}
