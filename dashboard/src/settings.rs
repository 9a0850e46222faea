//! Dashboard configuration loaded via OrthoConfig.
//!
//! Values layer CLI flags over `SGG_*` environment variables over the
//! optional configuration file.

use std::path::PathBuf;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use thiserror::Error;
use url::Url;

const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// A configured value could not be interpreted.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// `identity_url` is not an absolute HTTP(S) URL.
    #[error("identity_url {value:?} is not a valid http(s) URL: {reason}")]
    InvalidIdentityUrl {
        /// Raw configured value.
        value: String,
        /// Why it was refused.
        reason: String,
    },
}

/// Configuration values controlling the identity backend connection.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "SGG")]
pub struct DashboardSettings {
    /// Base URL of the identity service. The in-memory fixture is used when
    /// absent.
    pub identity_url: Option<String>,
    /// Public API key sent in the `apikey` header.
    pub api_key: Option<String>,
    /// Per-request timeout in seconds. Absent or zero selects the default.
    pub request_timeout_secs: Option<u64>,
    /// File holding the access token between runs. Tokens stay in memory
    /// when absent.
    pub session_file: Option<PathBuf>,
}

impl DashboardSettings {
    /// Parsed identity service endpoint, if configured.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::InvalidIdentityUrl`] when the value does not
    /// parse or does not use `http`/`https`.
    pub fn identity_endpoint(&self) -> Result<Option<Url>, SettingsError> {
        let Some(raw) = self.identity_url.as_deref().map(str::trim) else {
            return Ok(None);
        };
        if raw.is_empty() {
            return Ok(None);
        }
        let invalid = |reason: String| SettingsError::InvalidIdentityUrl {
            value: raw.to_owned(),
            reason,
        };
        let url = Url::parse(raw).map_err(|error| invalid(error.to_string()))?;
        match url.scheme() {
            "http" | "https" => Ok(Some(url)),
            other => Err(invalid(format!("unsupported scheme {other}"))),
        }
    }

    /// Request timeout, never zero.
    pub fn request_timeout(&self) -> Duration {
        match self.request_timeout_secs {
            None | Some(0) => Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            Some(secs) => Duration::from_secs(secs),
        }
    }

    /// API key, ignoring blank values.
    pub fn api_key(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }
}
