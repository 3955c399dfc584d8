// LazyAI Protocol Layer
// SkyDeck conversation API payloads

pub mod messages;
pub mod streaming;
