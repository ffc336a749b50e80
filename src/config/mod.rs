//! Credential configuration.
//!
//! The API key reaches the pipeline through the [`CredentialProvider`]
//! capability instead of global state. [`ConfigStore`] is the on-disk
//! implementation used by the CLI; [`StaticCredential`] holds a fixed value.

pub mod store;

pub use store::{API_KEY_ENV, CONFIG_ENV, CONFIG_FILE_NAME, ConfigStore, StoredConfig};

/// Source of the completion service API key.
pub trait CredentialProvider: Send + Sync {
    /// Returns the key, or `None` if none is configured.
    fn api_key(&self) -> Option<String>;
}

/// A fixed, in-memory credential.
#[derive(Clone, Default)]
pub struct StaticCredential(Option<String>);

impl StaticCredential {
    /// Wraps `key`; `None` means "not configured".
    #[must_use]
    pub const fn new(key: Option<String>) -> Self {
        Self(key)
    }
}

impl std::fmt::Debug for StaticCredential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("StaticCredential")
            .field(&self.0.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl CredentialProvider for StaticCredential {
    fn api_key(&self) -> Option<String> {
        self.0.clone()
    }
}
