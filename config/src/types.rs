// Configuration Types
// Schema of the `~/.lazyai.yml` document

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

pub const DEFAULT_BASE_URL: &str = "https://admin.skydeck.ai";
pub const DEFAULT_REFERRER: &str = "https://eastagile.skydeck.ai/";
pub const DEFAULT_WEB_URL: &str = "https://eastagile.skydeck.ai";
pub const DEFAULT_MODEL_ID: u32 = 4094;
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Dotted keys of the values the session rewrites in place.
pub const ACCESS_TOKEN_KEY: &str = "skydeck.accessToken";
pub const REFRESH_TOKEN_KEY: &str = "skydeck.refreshToken";
pub const CONVERSATION_ID_KEY: &str = "skydeck.convoID";

/// Main configuration structure
///
/// Only the `skydeck` section is typed; other sections of the document are
/// left alone and survive in-place rewrites.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
  /// SkyDeck chat settings and credentials
  #[serde(default)]
  pub skydeck: SkydeckConfig,
}

// ============================================================================
// SKYDECK
// ============================================================================

/// SkyDeck section
#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkydeckConfig {
  /// Short-lived session credential
  #[serde(default)]
  pub access_token: String,
  /// Long-lived credential used only for renewal
  #[serde(default)]
  pub refresh_token: String,
  /// Conversation used by the previous message, `0` meaning none
  #[serde(default, rename = "convoID")]
  pub convo_id: Option<u64>,
  /// API origin
  #[serde(default = "default_base_url")]
  pub base_url: String,
  /// `Referer` header value the API insists on
  #[serde(default = "default_referrer")]
  pub referrer: String,
  /// Web UI origin used to build conversation links
  #[serde(default = "default_web_url")]
  pub web_url: String,
  /// Model submitted with every message
  #[serde(default = "default_model_id")]
  pub model_id: u32,
  /// Deadline for every outbound call
  #[serde(default = "default_timeout_secs")]
  pub timeout_secs: u64,
  /// Streaming endpoint contract
  #[serde(default)]
  pub streaming: StreamingConfig,
}

impl Default for SkydeckConfig {
  fn default() -> Self {
    Self {
      access_token: String::new(),
      refresh_token: String::new(),
      convo_id: None,
      base_url: default_base_url(),
      referrer: default_referrer(),
      web_url: default_web_url(),
      model_id: default_model_id(),
      timeout_secs: default_timeout_secs(),
      streaming: StreamingConfig::default(),
    }
  }
}

impl fmt::Debug for SkydeckConfig {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("SkydeckConfig")
      .field("access_token", &"[REDACTED]")
      .field("refresh_token", &"[REDACTED]")
      .field("convo_id", &self.convo_id)
      .field("base_url", &self.base_url)
      .field("referrer", &self.referrer)
      .field("web_url", &self.web_url)
      .field("model_id", &self.model_id)
      .field("timeout_secs", &self.timeout_secs)
      .field("streaming", &self.streaming)
      .finish()
  }
}

impl SkydeckConfig {
  /// Persisted conversation, treating `0` as "none".
  pub fn conversation_id(&self) -> Option<u64> {
    self.convo_id.filter(|id| *id != 0)
  }

  /// Both credentials, failing on the first one that is missing.
  pub fn require_credentials(&self) -> Result<(&str, &str)> {
    let access = self.access_token.trim();
    if access.is_empty() {
      return Err(ConfigError::MissingKey(ACCESS_TOKEN_KEY));
    }
    let refresh = self.refresh_token.trim();
    if refresh.is_empty() {
      return Err(ConfigError::MissingKey(REFRESH_TOKEN_KEY));
    }
    Ok((access, refresh))
  }
}

fn default_base_url() -> String {
  DEFAULT_BASE_URL.to_string()
}

fn default_referrer() -> String {
  DEFAULT_REFERRER.to_string()
}

fn default_web_url() -> String {
  DEFAULT_WEB_URL.to_string()
}

fn default_model_id() -> u32 {
  DEFAULT_MODEL_ID
}

fn default_timeout_secs() -> u64 {
  DEFAULT_TIMEOUT_SECS
}

// ============================================================================
// STREAMING
// ============================================================================

/// Streaming endpoint contract
///
/// The upstream has shipped both request shapes and both response formats;
/// which one is live is a deployment fact, not something the client guesses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamingConfig {
  /// How the assistant message id is sent
  #[serde(default)]
  pub request: StreamRequestShape,
  /// How the reply comes back
  #[serde(default)]
  pub response: StreamResponseFormat,
}

/// Streaming request shapes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StreamRequestShape {
  /// `GET ?message_id=N`
  #[default]
  Query,
  /// `POST {"message_id": N}`
  JsonBody,
}

/// Streaming response formats
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StreamResponseFormat {
  /// Reply text streamed token by token
  #[default]
  Raw,
  /// JSON envelope carrying a `messages` array
  Envelope,
}

impl FromStr for StreamRequestShape {
  type Err = String;

  fn from_str(value: &str) -> std::result::Result<Self, Self::Err> {
    match value {
      "query" => Ok(Self::Query),
      "json_body" => Ok(Self::JsonBody),
      other => Err(format!("expected `query` or `json_body`, got `{other}`")),
    }
  }
}

impl FromStr for StreamResponseFormat {
  type Err = String;

  fn from_str(value: &str) -> std::result::Result<Self, Self::Err> {
    match value {
      "raw" => Ok(Self::Raw),
      "envelope" => Ok(Self::Envelope),
      other => Err(format!("expected `raw` or `envelope`, got `{other}`")),
    }
  }
}
