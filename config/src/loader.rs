// Configuration Loader
// Locates, reads, overrides and rewrites the YAML document

use std::path::{Path, PathBuf};

use serde_yaml::{Mapping, Value};
use tracing::debug;

use crate::error::{ConfigError, Result};
use crate::types::Config;

/// Environment variable pointing at an alternative configuration file.
pub const CONFIG_ENV_VAR: &str = "LAZYAI_CONFIG";

const DEFAULT_FILE_NAME: &str = ".lazyai.yml";

/// Configuration loader bound to one file
#[derive(Debug, Clone)]
pub struct ConfigLoader {
  path: PathBuf,
}

impl ConfigLoader {
  /// Loader for the file named by `LAZYAI_CONFIG`, else `~/.lazyai.yml`.
  pub fn new() -> Result<Self> {
    if let Some(path) = std::env::var_os(CONFIG_ENV_VAR).filter(|value| !value.is_empty()) {
      return Ok(Self::with_path(path));
    }

    let home = dirs::home_dir().ok_or(ConfigError::NoHomeDir(CONFIG_ENV_VAR))?;
    Ok(Self::with_path(home.join(DEFAULT_FILE_NAME)))
  }

  /// Loader for an explicit file
  pub fn with_path(path: impl Into<PathBuf>) -> Self {
    Self { path: path.into() }
  }

  pub fn path(&self) -> &Path {
    &self.path
  }

  /// Read and parse the file.
  pub fn load(&self) -> Result<Config> {
    let content = self.read()?;
    let config: Config = serde_yaml::from_str(&content).map_err(|source| ConfigError::Parse {
      path: self.path.clone(),
      source,
    })?;
    debug!(path = %self.path.display(), "loaded configuration");
    Ok(config)
  }

  /// Read the file, then apply `KEY=VALUE` overrides in order.
  ///
  /// Overrides live only in the returned value; the file is untouched.
  pub fn load_with_cli_overrides(&self, overrides: &[(String, String)]) -> Result<Config> {
    let mut config = self.load()?;
    for (key, value) in overrides {
      apply_override(&mut config, key, value)?;
    }
    Ok(config)
  }

  /// Rewrite one dotted key in place, keeping every other key of the document.
  ///
  /// Intermediate mappings are created when missing. A missing file is
  /// treated as an empty document.
  pub fn set_value(&self, dotted_key: &str, value: Value) -> Result<()> {
    let mut document = if self.path.exists() {
      let content = self.read()?;
      serde_yaml::from_str::<Value>(&content).map_err(|source| ConfigError::Parse {
        path: self.path.clone(),
        source,
      })?
    } else {
      Value::Mapping(Mapping::new())
    };

    set_dotted(&mut document, dotted_key, value).map_err(|message| ConfigError::Write {
      path: self.path.clone(),
      message,
    })?;

    let rendered = serde_yaml::to_string(&document).map_err(|e| ConfigError::Write {
      path: self.path.clone(),
      message: e.to_string(),
    })?;

    if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
      std::fs::create_dir_all(parent).map_err(|e| ConfigError::Write {
        path: self.path.clone(),
        message: format!("failed to create config directory: {e}"),
      })?;
    }
    std::fs::write(&self.path, rendered).map_err(|e| ConfigError::Write {
      path: self.path.clone(),
      message: e.to_string(),
    })?;

    debug!(key = dotted_key, path = %self.path.display(), "configuration key rewritten");
    Ok(())
  }

  fn read(&self) -> Result<String> {
    std::fs::read_to_string(&self.path).map_err(|source| {
      if source.kind() == std::io::ErrorKind::NotFound {
        ConfigError::NotFound(self.path.clone())
      } else {
        ConfigError::Read {
          path: self.path.clone(),
          source,
        }
      }
    })
  }
}

/// Split a `KEY=VALUE` command-line override.
pub fn parse_override(raw: &str) -> Result<(String, String)> {
  let Some((key, value)) = raw.split_once('=') else {
    return Err(ConfigError::InvalidOverride {
      key: raw.to_string(),
      reason: "expected KEY=VALUE".to_string(),
    });
  };
  let key = key.trim();
  if key.is_empty() {
    return Err(ConfigError::InvalidOverride {
      key: raw.to_string(),
      reason: "empty key".to_string(),
    });
  }
  Ok((key.to_string(), value.trim().to_string()))
}

/// Apply a single CLI override
///
/// Credentials and the persisted conversation are not overridable.
fn apply_override(config: &mut Config, key: &str, value: &str) -> Result<()> {
  let invalid = |reason: String| ConfigError::InvalidOverride {
    key: key.to_string(),
    reason,
  };

  let skydeck = &mut config.skydeck;
  match key {
    "skydeck.baseUrl" => skydeck.base_url = value.to_string(),
    "skydeck.referrer" => skydeck.referrer = value.to_string(),
    "skydeck.webUrl" => skydeck.web_url = value.to_string(),
    "skydeck.modelId" => {
      skydeck.model_id = value.parse().map_err(|e| invalid(format!("{e}")))?;
    }
    "skydeck.timeoutSecs" => {
      skydeck.timeout_secs = value.parse().map_err(|e| invalid(format!("{e}")))?;
    }
    "skydeck.streaming.request" => {
      skydeck.streaming.request = value.parse().map_err(invalid)?;
    }
    "skydeck.streaming.response" => {
      skydeck.streaming.response = value.parse().map_err(invalid)?;
    }
    _ => return Err(invalid("unknown or non-overridable key".to_string())),
  }
  Ok(())
}

fn set_dotted(document: &mut Value, dotted_key: &str, value: Value) -> std::result::Result<(), String> {
  let segments: Vec<&str> = dotted_key.split('.').collect();
  let Some((last, parents)) = segments.split_last() else {
    return Err("empty key".to_string());
  };

  let mut node = document;
  for segment in parents {
    let Value::Mapping(map) = node else {
      return Err(format!("`{segment}` is not inside a mapping"));
    };
    let key = Value::String((*segment).to_string());
    if !matches!(map.get(&key), Some(Value::Mapping(_))) {
      map.insert(key.clone(), Value::Mapping(Mapping::new()));
    }
    node = map
      .get_mut(&key)
      .ok_or_else(|| format!("failed to descend into `{segment}`"))?;
  }

  let Value::Mapping(map) = node else {
    return Err(format!("parent of `{last}` is not a mapping"));
  };
  map.insert(Value::String((*last).to_string()), value);
  Ok(())
}
