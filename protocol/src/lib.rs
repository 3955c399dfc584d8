// LazyAI Protocol
// Upstream wire types and prompt templates

pub mod prompts;
pub mod protocol;

pub use protocol::messages::{
  NOT_A_REGENERATION, SendMessageRequest, SubmitData, SubmitEnvelope, SubmitResult,
};
pub use protocol::streaming::{StreamedMessage, StreamingData, StreamingEnvelope, StreamingRequest};
