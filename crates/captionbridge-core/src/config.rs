//! Configuration module
//!
//! Settings are read from the process environment (after loading `.env`).
//! Numeric settings that fail to parse fall back to their defaults.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::constants::{
    CONVERSION_MAX_POLLS, CONVERSION_POLL_INTERVAL_MS, DEFAULT_API_URL,
    DEFAULT_CONVERSION_API_URL, HTTP_TIMEOUT_SECS,
};
use crate::error::UploadError;

/// Conversion service settings. Present only when both the auth key and the
/// template id are configured.
#[derive(Clone, Debug, PartialEq)]
pub struct ConversionConfig {
    pub api_url: String,
    pub auth_key: String,
    pub template_id: String,
    pub poll_interval: Duration,
    pub max_polls: u32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    pub api_key: String,
    pub api_url: String,
    pub cache_dir: PathBuf,
    pub http_timeout: Duration,
    pub conversion: Option<ConversionConfig>,
}

impl Config {
    pub fn from_env() -> Result<Self, UploadError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, UploadError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup("CAPTIONBRIDGE_API_KEY")
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty())
            .ok_or(UploadError::Credential)?;

        let api_url = lookup("CAPTIONBRIDGE_API_URL")
            .unwrap_or_else(|| DEFAULT_API_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        let cache_dir = lookup("CAPTIONBRIDGE_CACHE_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(default_cache_dir);

        let http_timeout = Duration::from_secs(
            lookup("HTTP_TIMEOUT_SECS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(HTTP_TIMEOUT_SECS),
        );

        let conversion = match (
            non_blank(lookup("TRANSLOADIT_AUTH_KEY")),
            non_blank(lookup("TRANSLOADIT_TEMPLATE_ID")),
        ) {
            (Some(auth_key), Some(template_id)) => Some(ConversionConfig {
                api_url: lookup("TRANSLOADIT_API_URL")
                    .unwrap_or_else(|| DEFAULT_CONVERSION_API_URL.to_string())
                    .trim_end_matches('/')
                    .to_string(),
                auth_key,
                template_id,
                poll_interval: Duration::from_millis(
                    lookup("CONVERSION_POLL_INTERVAL_MS")
                        .and_then(|v| v.parse().ok())
                        .unwrap_or(CONVERSION_POLL_INTERVAL_MS),
                ),
                max_polls: lookup("CONVERSION_MAX_POLLS")
                    .and_then(|v| v.parse().ok())
                    .filter(|max: &u32| *max > 0)
                    .unwrap_or(CONVERSION_MAX_POLLS),
            }),
            _ => {
                tracing::debug!("Transloadit credentials not set, conversion disabled");
                None
            }
        };

        Ok(Self {
            api_key,
            api_url,
            cache_dir,
            http_timeout,
            conversion,
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn default_cache_dir() -> PathBuf {
    env::var("XDG_CACHE_HOME")
        .map(PathBuf::from)
        .or_else(|_| env::var("HOME").map(|home| PathBuf::from(home).join(".cache")))
        .unwrap_or_else(|_| env::temp_dir())
        .join("captionbridge")
}
