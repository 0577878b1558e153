//! Browser-visible configuration.
//!
//! SYSTEM CONTEXT
//! ==============
//! The server renders [`ClientConfig`] as JSON inside the HTML shell
//! (`<script id="finder-config" type="application/json">`). The hydrated app
//! reads it back before providing any gateway; a missing or incomplete
//! document leaves the app on a configuration error screen.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use serde::{Deserialize, Serialize};

/// DOM id of the embedded configuration script.
pub const CONFIG_ELEMENT_ID: &str = "finder-config";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("configuration document not found")]
    NotFound,
    #[error("configuration document is malformed: {0}")]
    Malformed(String),
    #[error("configuration value {0} is empty")]
    Missing(&'static str),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the hospital lookup backend.
    pub lookup_api_url: String,
    pub maps_api_key: String,
    pub firebase_api_key: String,
    #[serde(default)]
    pub google_client_id: Option<String>,
}

impl ClientConfig {
    /// Reject blank required values.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Missing`] naming the first blank field.
    pub fn validate(self) -> Result<Self, ConfigError> {
        for (name, value) in [
            ("lookup_api_url", &self.lookup_api_url),
            ("maps_api_key", &self.maps_api_key),
            ("firebase_api_key", &self.firebase_api_key),
        ] {
            if value.trim().is_empty() {
                return Err(ConfigError::Missing(name));
            }
        }
        Ok(self)
    }

    /// Parse and validate the embedded JSON document.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Malformed`] for undecodable JSON, otherwise see [`ClientConfig::validate`].
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(raw).map_err(|e| ConfigError::Malformed(e.to_string()))?;
        config.validate()
    }

    /// JSON safe to place inside a `<script>` element.
    #[must_use]
    pub fn to_embedded_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_owned()).replace('<', "\\u003c")
    }

    /// Read the configuration embedded in the current document.
    ///
    /// # Errors
    ///
    /// [`ConfigError::NotFound`] when the script element is absent (always the
    /// case off-browser), otherwise see [`ClientConfig::from_json`].
    pub fn from_document() -> Result<Self, ConfigError> {
        #[cfg(feature = "hydrate")]
        {
            let raw = web_sys::window()
                .and_then(|w| w.document())
                .and_then(|d| d.get_element_by_id(CONFIG_ELEMENT_ID))
                .and_then(|el| el.text_content())
                .ok_or(ConfigError::NotFound)?;
            Self::from_json(&raw)
        }
        #[cfg(not(feature = "hydrate"))]
        {
            Err(ConfigError::NotFound)
        }
    }
}
