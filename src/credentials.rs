//! Credentials file loading.

use crate::error::{Error, Result};
use serde::Deserialize;
use std::fmt;
use std::fs;
use std::path::Path;

/// API credentials read from a JSON file.
///
/// Loaded once per invocation and never written back.
#[derive(Clone, Deserialize)]
pub struct Credentials {
    pub client_id: String,
    pub client_secret: String,
    pub username: String,
    pub password: String,
}

impl Credentials {
    /// Reads and parses the credentials file at `path`.
    ///
    /// Every field is required; a missing file, bad JSON or an absent field
    /// all surface as [`Error::Config`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let config_err = |message: String| Error::Config {
            path: path.to_path_buf(),
            message,
        };

        let contents = fs::read_to_string(path).map_err(|e| config_err(e.to_string()))?;
        let credentials =
            serde_json::from_str(&contents).map_err(|e| config_err(e.to_string()))?;

        log::debug!("Loaded credentials from {}", path.display());
        Ok(credentials)
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}
