use serde::{Deserialize, Serialize};

/// `regenerate_message_id` value meaning "this is a fresh message".
pub const NOT_A_REGENERATION: i64 = -1;

/// Outbound chat message.
///
/// The chat endpoint takes this as multipart form fields, not JSON; see
/// [`SendMessageRequest::form_fields`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SendMessageRequest {
  pub message: String,
  pub model_id: u32,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub conversation_id: Option<u64>,
  pub regenerate_message_id: i64,
  pub non_ai: bool,
}

impl SendMessageRequest {
  /// Build a fresh (non-regenerated, AI-answered) message.
  pub fn new(message: impl Into<String>, model_id: u32, conversation_id: Option<u64>) -> Self {
    Self {
      message: message.into(),
      model_id,
      conversation_id,
      regenerate_message_id: NOT_A_REGENERATION,
      non_ai: false,
    }
  }

  /// Form fields in the order the web client sends them.
  ///
  /// `conversation_id` is only emitted when a conversation was chosen.
  pub fn form_fields(&self) -> Vec<(&'static str, String)> {
    let mut fields = vec![
      ("message", self.message.clone()),
      ("model_id", self.model_id.to_string()),
    ];
    if let Some(conversation_id) = self.conversation_id {
      fields.push(("conversation_id", conversation_id.to_string()));
    }
    fields.push((
      "regenerate_message_id",
      self.regenerate_message_id.to_string(),
    ));
    fields.push(("non_ai", self.non_ai.to_string()));
    fields
  }
}

/// Body of a successful chat submission.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SubmitEnvelope {
  pub data: SubmitData,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SubmitData {
  pub conversation_id: u64,
  pub assistant_message_id: u64,
  #[serde(default)]
  pub rememberizer_api_query: Option<serde_json::Value>,
}

/// Conversation and pending assistant message produced by a submission.
///
/// `assistant_message_id` names a reply that is still being generated and
/// must be fetched exactly once through the streaming endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmitResult {
  pub conversation_id: u64,
  pub assistant_message_id: u64,
}

impl From<SubmitEnvelope> for SubmitResult {
  fn from(envelope: SubmitEnvelope) -> Self {
    Self {
      conversation_id: envelope.data.conversation_id,
      assistant_message_id: envelope.data.assistant_message_id,
    }
  }
}
