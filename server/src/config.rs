//! Server configuration parsed from environment variables.
//!
//! Everything is read once at startup; a missing or malformed value aborts
//! the process before it binds a port.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use client::config::ClientConfig;

pub const DEFAULT_PORT: u16 = 3000;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing required environment variable {var}")]
    Missing { var: &'static str },
    #[error("invalid value for {var}: {reason}")]
    Invalid { var: &'static str, reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Base URL of the hospital lookup backend, without a trailing slash.
    pub lookup_api_url: String,
    pub maps_api_key: String,
    pub firebase_api_key: String,
    pub google_client_id: Option<String>,
    pub port: u16,
}

impl AppConfig {
    /// Build typed config from environment variables.
    ///
    /// Required:
    /// - `LOOKUP_API_URL`: absolute `http(s)` URL
    /// - `GOOGLE_MAPS_API_KEY`
    /// - `FIREBASE_API_KEY`
    ///
    /// Optional:
    /// - `GOOGLE_OAUTH_CLIENT_ID`: enables Google sign-in
    /// - `PORT`: default 3000
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`AppConfig::from_env`] but reading values through `get`.
    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let non_empty = |var: &str| get(var).map(|v| v.trim().to_owned()).filter(|v| !v.is_empty());
        let required = |var: &'static str| non_empty(var).ok_or(ConfigError::Missing { var });

        let lookup_api_url = parse_base_url("LOOKUP_API_URL", &required("LOOKUP_API_URL")?)?;
        let maps_api_key = required("GOOGLE_MAPS_API_KEY")?;
        let firebase_api_key = required("FIREBASE_API_KEY")?;
        let google_client_id = non_empty("GOOGLE_OAUTH_CLIENT_ID");
        let port = match non_empty("PORT") {
            Some(raw) => raw
                .parse::<u16>()
                .map_err(|e| ConfigError::Invalid { var: "PORT", reason: e.to_string() })?,
            None => DEFAULT_PORT,
        };

        Ok(Self { lookup_api_url, maps_api_key, firebase_api_key, google_client_id, port })
    }

    /// The subset of this config the browser needs.
    #[must_use]
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            lookup_api_url: self.lookup_api_url.clone(),
            maps_api_key: self.maps_api_key.clone(),
            firebase_api_key: self.firebase_api_key.clone(),
            google_client_id: self.google_client_id.clone(),
        }
    }
}

fn parse_base_url(var: &'static str, raw: &str) -> Result<String, ConfigError> {
    let url = url::Url::parse(raw).map_err(|e| ConfigError::Invalid { var, reason: e.to_string() })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::Invalid { var, reason: format!("unsupported scheme {}", url.scheme()) });
    }
    Ok(url.as_str().trim_end_matches('/').to_owned())
}
