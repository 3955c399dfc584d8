//! Browser hand-off

use std::process::Command;

use tracing::debug;

use crate::error::{Result, SessionError};

/// Opens a URL for the user
pub trait BrowserLauncher: Send + Sync {
  fn open(&self, url: &str) -> Result<()>;
}

/// Launches the platform's default URL opener
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemBrowser;

impl BrowserLauncher for SystemBrowser {
  fn open(&self, url: &str) -> Result<()> {
    debug!(url, "opening browser");
    opener_command(url)?
      .spawn()
      .map(|_| ())
      .map_err(|e| SessionError::Browser(e.to_string()))
  }
}

#[cfg(target_os = "macos")]
fn opener_command(url: &str) -> Result<Command> {
  let mut command = Command::new("open");
  command.arg(url);
  Ok(command)
}

#[cfg(target_os = "linux")]
fn opener_command(url: &str) -> Result<Command> {
  let mut command = Command::new("xdg-open");
  command.arg(url);
  Ok(command)
}

#[cfg(target_os = "windows")]
fn opener_command(url: &str) -> Result<Command> {
  let mut command = Command::new("rundll32");
  command.args(["url.dll,FileProtocolHandler", url]);
  Ok(command)
}

#[cfg(not(any(target_os = "macos", target_os = "linux", target_os = "windows")))]
fn opener_command(_url: &str) -> Result<Command> {
  Err(SessionError::Browser(format!(
    "unsupported platform: {}",
    std::env::consts::OS
  )))
}

/// Web UI link for a conversation
pub fn conversation_url(web_url: &str, conversation_id: u64) -> String {
  format!(
    "{}/conversations/{conversation_id}",
    web_url.trim_end_matches('/')
  )
}
