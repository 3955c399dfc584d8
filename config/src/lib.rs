// LazyAI Configuration System
// YAML-backed settings and credentials

pub mod error;
pub mod loader;
pub mod types;

pub use error::ConfigError;
pub use loader::{CONFIG_ENV_VAR, ConfigLoader, parse_override};
pub use types::*;
