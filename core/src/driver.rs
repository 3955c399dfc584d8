//! Chat command driver
//!
//! One invocation: load the stored session, pick a conversation, submit the
//! message, remember the conversation, then either hand off to the web UI
//! or copy the reply to the caller's sink.

use std::sync::Arc;

use tokio::io::AsyncWrite;
use tracing::{debug, info};

use lazyai_config::SkydeckConfig;
use lazyai_protocol::SendMessageRequest;

use crate::auth::CredentialStore;
use crate::browser::{BrowserLauncher, conversation_url};
use crate::conversation::{conversation_to_persist, resolve_conversation};
use crate::error::{Result, SessionError};
use crate::session::{ClientSettings, SessionClient};

/// Per-invocation options
#[derive(Debug, Clone, Default)]
pub struct ChatOptions {
  /// Message text; surrounding whitespace is ignored
  pub message: String,
  /// `--conversation`
  pub conversation: Option<u64>,
  /// `--new`
  pub new_conversation: bool,
  /// `--open`
  pub open_in_browser: bool,
}

/// What a completed invocation did
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatOutcome {
  /// Conversation the message landed in
  pub conversation_id: u64,
  /// Pending assistant reply
  pub assistant_message_id: u64,
  /// Set when the reply was handed off to the browser
  pub opened_url: Option<String>,
  /// Reply bytes copied to the sink
  pub bytes_streamed: u64,
}

pub struct ChatDriver {
  config: SkydeckConfig,
  store: Arc<dyn CredentialStore>,
  browser: Arc<dyn BrowserLauncher>,
}

impl ChatDriver {
  pub fn new(
    config: SkydeckConfig,
    store: Arc<dyn CredentialStore>,
    browser: Arc<dyn BrowserLauncher>,
  ) -> Self {
    Self {
      config,
      store,
      browser,
    }
  }

  /// Run one chat invocation, writing the reply to `sink` unless the
  /// browser hand-off was requested.
  pub async fn run<W>(&self, options: ChatOptions, sink: &mut W) -> Result<ChatOutcome>
  where
    W: AsyncWrite + Unpin,
  {
    let message = options.message.trim();
    if message.is_empty() {
      return Err(SessionError::InvalidInput(
        "message must not be empty".to_string(),
      ));
    }

    let stored = self.store.load().await?;
    let conversation_id = resolve_conversation(
      stored.conversation_id,
      options.conversation,
      options.new_conversation,
    );
    debug!(
      persisted = ?stored.conversation_id,
      explicit = ?options.conversation,
      new = options.new_conversation,
      resolved = ?conversation_id,
      "conversation resolved"
    );

    let mut client = SessionClient::new(
      ClientSettings::from(&self.config),
      stored.credentials,
      Arc::clone(&self.store),
    )?;

    let request = SendMessageRequest::new(message, self.config.model_id, conversation_id);
    let submitted = client.submit(&request).await?;

    let persisted = conversation_to_persist(options.conversation, submitted.conversation_id);
    self.store.save_conversation_id(persisted).await?;

    // The web UI shows the conversation the next invocation will continue.
    if options.open_in_browser {
      let url = conversation_url(&self.config.web_url, persisted);
      info!(%url, "handing off to browser");
      self.browser.open(&url)?;
      return Ok(ChatOutcome {
        conversation_id: submitted.conversation_id,
        assistant_message_id: submitted.assistant_message_id,
        opened_url: Some(url),
        bytes_streamed: 0,
      });
    }

    let bytes_streamed = client
      .stream_reply(submitted.assistant_message_id, sink)
      .await?;

    Ok(ChatOutcome {
      conversation_id: submitted.conversation_id,
      assistant_message_id: submitted.assistant_message_id,
      opened_url: None,
      bytes_streamed,
    })
  }
}
