// LazyAI Core Library

pub mod auth;
pub mod browser;
pub mod conversation;
pub mod driver;
pub mod error;
pub mod session;

pub use auth::{CredentialStore, Credentials, MemoryCredentialStore, StoredSession, YamlCredentialStore};
pub use browser::{BrowserLauncher, SystemBrowser, conversation_url};
pub use conversation::{conversation_to_persist, resolve_conversation};
pub use driver::{ChatDriver, ChatOptions, ChatOutcome};
pub use error::{Result, SessionError};
pub use session::{ClientSettings, SessionClient};
