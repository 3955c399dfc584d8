use serde::{Deserialize, Serialize};

/// JSON body for the `POST` revision of the streaming endpoint.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct StreamingRequest {
  pub message_id: u64,
}

/// Envelope returned by the JSON revision of the streaming endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StreamingEnvelope {
  pub data: StreamingData,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StreamingData {
  #[serde(default)]
  pub conversation_id: Option<u64>,
  #[serde(default)]
  pub messages: Vec<StreamedMessage>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StreamedMessage {
  pub id: u64,
  #[serde(rename = "type")]
  pub kind: String,
  #[serde(default)]
  pub content: String,
  #[serde(default)]
  pub streaming: bool,
}

impl StreamingEnvelope {
  /// Content of the first assistant message still flagged as streaming.
  pub fn streaming_assistant_content(&self) -> Option<&str> {
    self
      .data
      .messages
      .iter()
      .find(|message| message.kind == "assistant" && message.streaming)
      .map(|message| message.content.as_str())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn picks_streaming_assistant_message() {
    let body = r#"{
      "data": {
        "conversation_id": 42,
        "messages": [
          {"id": 98, "type": "user", "content": "Hello", "streaming": false},
          {"id": 99, "type": "assistant", "content": "Hi there", "streaming": true}
        ]
      }
    }"#;

    let envelope: StreamingEnvelope = serde_json::from_str(body).expect("decode envelope");
    assert_eq!(envelope.streaming_assistant_content(), Some("Hi there"));
  }

  #[test]
  fn finished_assistant_messages_are_ignored() {
    let body = r#"{"data": {"messages": [
      {"id": 5, "type": "assistant", "content": "old", "streaming": false}
    ]}}"#;

    let envelope: StreamingEnvelope = serde_json::from_str(body).expect("decode envelope");
    assert_eq!(envelope.streaming_assistant_content(), None);
  }

  #[test]
  fn streaming_request_serializes_message_id() {
    let json = serde_json::to_string(&StreamingRequest { message_id: 99 }).expect("serialize");
    assert_eq!(json, r#"{"message_id":99}"#);
  }
}
