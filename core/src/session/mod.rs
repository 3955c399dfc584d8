//! Authenticated SkyDeck session
//!
//! [`SessionClient`] submits chat messages and streams replies, renewing the
//! access token at most once per operation when the upstream answers 401.

pub mod client;
pub mod cookies;
pub mod stream;

pub use client::{CHAT_PATH, ClientSettings, REFRESH_PATH, STREAMING_PATH, SessionClient};
pub use cookies::{ACCESS_COOKIE, REFRESH_COOKIE};
pub use stream::{pipe_stream, write_envelope_reply};
