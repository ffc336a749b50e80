//! On-disk API key store.
//!
//! The key lives in a small JSON file (`~/.aireadme.json` by default):
//!
//! ```json
//! {
//!   "OPENROUTER_API_KEY": "sk-or-..."
//! }
//! ```
//!
//! The `OPENROUTER_API_KEY` environment variable takes priority over the
//! file. A file that fails to parse is deleted and treated as absent.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::CredentialProvider;
use crate::error::{ConfigError, IoError, Result};

/// Environment variable holding the API key.
pub const API_KEY_ENV: &str = "OPENROUTER_API_KEY";

/// Environment variable overriding the config file location.
pub const CONFIG_ENV: &str = "AIREADME_CONFIG";

/// Config file name under the home directory.
pub const CONFIG_FILE_NAME: &str = ".aireadme.json";

/// Number of key characters shown by [`ConfigStore::key_preview`].
const PREVIEW_LEN: usize = 10;

/// Contents of the config file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredConfig {
    /// Stored API key.
    #[serde(
        rename = "OPENROUTER_API_KEY",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub api_key: Option<String>,
}

/// JSON-file credential store.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
    env_var: Option<&'static str>,
}

impl ConfigStore {
    /// Store at `path` that also honors [`API_KEY_ENV`].
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            env_var: Some(API_KEY_ENV),
        }
    }

    /// Resolves the store location: explicit path, else `~/.aireadme.json`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NoHomeDirectory`] when no path is given and
    /// the home directory is unknown.
    pub fn resolve(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Ok(Self::new(path));
        }
        let home = dirs::home_dir().ok_or(ConfigError::NoHomeDirectory)?;
        Ok(Self::new(home.join(CONFIG_FILE_NAME)))
    }

    /// Ignores the environment variable; only the file counts.
    #[must_use]
    pub const fn without_env(mut self) -> Self {
        self.env_var = None;
        self
    }

    /// Returns the config file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the config file.
    ///
    /// Returns `None` if the file is missing or unreadable. A corrupted
    /// file is removed.
    pub fn read(&self) -> Option<StoredConfig> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "cannot read config file");
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(config) => Some(config),
            Err(e) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "config file corrupted, resetting"
                );
                if let Err(e) = std::fs::remove_file(&self.path) {
                    tracing::warn!(error = %e, "failed to remove corrupted config file");
                }
                None
            }
        }
    }

    /// Writes `config`, replacing the file.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization, directory creation or the write fails.
    pub fn save(&self, config: &StoredConfig) -> Result<()> {
        let json = serde_json::to_string_pretty(config).map_err(ConfigError::from)?;

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|e| IoError::DirectoryFailed {
                path: parent.to_string_lossy().to_string(),
                reason: e.to_string(),
            })?;
        }

        std::fs::write(&self.path, json).map_err(|e| IoError::WriteFailed {
            path: self.path.to_string_lossy().to_string(),
            reason: e.to_string(),
        })?;
        Ok(())
    }

    /// Deletes the config file. Returns whether a file was removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be removed.
    pub fn delete(&self) -> Result<bool> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(IoError::WriteFailed {
                path: self.path.to_string_lossy().to_string(),
                reason: e.to_string(),
            }
            .into()),
        }
    }

    /// Stores `key`, replacing any previous configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidApiKey`] for an empty key, or a write error.
    pub fn set_api_key(&self, key: &str) -> Result<()> {
        let key = key.trim();
        if key.is_empty() {
            return Err(ConfigError::InvalidApiKey.into());
        }
        self.save(&StoredConfig {
            api_key: Some(key.to_string()),
        })
    }

    /// Whether a key is available from any source.
    #[must_use]
    pub fn has_api_key(&self) -> bool {
        self.api_key().is_some()
    }

    /// First characters of the key followed by `...`.
    #[must_use]
    pub fn key_preview(&self) -> Option<String> {
        self.api_key()
            .map(|key| format!("{}...", key.chars().take(PREVIEW_LEN).collect::<String>()))
    }

    /// Where the effective key comes from: `"env"` or `"file"`.
    #[must_use]
    pub fn key_source(&self) -> Option<&'static str> {
        if self.env_key().is_some() {
            Some("env")
        } else if self.read().and_then(|c| c.api_key).is_some_and(|k| !k.is_empty()) {
            Some("file")
        } else {
            None
        }
    }

    fn env_key(&self) -> Option<String> {
        self.env_var
            .and_then(|var| std::env::var(var).ok())
            .filter(|key| !key.is_empty())
    }
}

impl CredentialProvider for ConfigStore {
    fn api_key(&self) -> Option<String> {
        self.env_key().or_else(|| {
            self.read()
                .and_then(|config| config.api_key)
                .filter(|key| !key.is_empty())
        })
    }
}
