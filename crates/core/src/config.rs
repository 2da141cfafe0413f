//! Core runtime configuration.
//!
//! Configuration is resolved once at process startup and then passed into core services. Core
//! code never reads process-wide environment variables itself; binaries hand in a lookup
//! function (normally `std::env::var`) so that tests can supply their own values.

use crate::constants::{DEFAULT_CHAT_MODEL, DEFAULT_CHAT_URL, DEFAULT_HTTP_TIMEOUT_SECS};
use crate::{HospitalError, HospitalResult};
use std::time::Duration;

pub const ENV_BACKEND_URL: &str = "HPMS_BACKEND_URL";
pub const ENV_BACKEND_KEY: &str = "HPMS_BACKEND_KEY";
pub const ENV_CHAT_API_KEY: &str = "HPMS_CHAT_API_KEY";
pub const ENV_CHAT_URL: &str = "HPMS_CHAT_URL";
pub const ENV_CHAT_MODEL: &str = "HPMS_CHAT_MODEL";
pub const ENV_HTTP_TIMEOUT_SECS: &str = "HPMS_HTTP_TIMEOUT_SECS";

/// Where patient data lives.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BackendConfig {
    /// Hosted table API reachable at `url`, authenticated with `key`.
    Hosted { url: String, key: String },
    /// Process-local tables. Data is lost on exit.
    Memory,
}

/// Chat-completion endpoint settings.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChatConfig {
    pub endpoint: String,
    pub model: String,
    /// `None` leaves the relay reachable but every request fails with
    /// [`HospitalError::ChatNotConfigured`].
    pub api_key: Option<String>,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_CHAT_URL.into(),
            model: DEFAULT_CHAT_MODEL.into(),
            api_key: None,
        }
    }
}

/// Core configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct CoreConfig {
    backend: BackendConfig,
    chat: ChatConfig,
    http_timeout: Duration,
}

impl CoreConfig {
    pub fn new(backend: BackendConfig, chat: ChatConfig, http_timeout: Duration) -> Self {
        Self {
            backend,
            chat,
            http_timeout,
        }
    }

    /// Resolve configuration from a key lookup such as `|k| std::env::var(k).ok()`.
    ///
    /// # Errors
    ///
    /// Returns `HospitalError::Config` if a backend URL is given without a key, or if the
    /// timeout is not a positive integer.
    pub fn from_lookup<F>(lookup: F) -> HospitalResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let backend = backend_from_env_values(lookup(ENV_BACKEND_URL), lookup(ENV_BACKEND_KEY))?;
        let chat = chat_from_env_values(
            lookup(ENV_CHAT_API_KEY),
            lookup(ENV_CHAT_URL),
            lookup(ENV_CHAT_MODEL),
        );
        let http_timeout = timeout_from_env_value(lookup(ENV_HTTP_TIMEOUT_SECS))?;

        Ok(Self::new(backend, chat, http_timeout))
    }

    pub fn backend(&self) -> &BackendConfig {
        &self.backend
    }

    pub fn chat(&self) -> &ChatConfig {
        &self.chat
    }

    pub fn http_timeout(&self) -> Duration {
        self.http_timeout
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Pick the record backend from optional URL and key values.
///
/// No URL selects the in-memory backend. A URL without a key is rejected because every hosted
/// call would fail with an authorisation error.
pub fn backend_from_env_values(
    url: Option<String>,
    key: Option<String>,
) -> HospitalResult<BackendConfig> {
    match (non_blank(url), non_blank(key)) {
        (None, _) => Ok(BackendConfig::Memory),
        (Some(_), None) => Err(HospitalError::Config(format!(
            "{ENV_BACKEND_URL} is set but {ENV_BACKEND_KEY} is missing"
        ))),
        (Some(url), Some(key)) => Ok(BackendConfig::Hosted {
            url: url.trim_end_matches('/').to_string(),
            key,
        }),
    }
}

pub fn chat_from_env_values(
    api_key: Option<String>,
    endpoint: Option<String>,
    model: Option<String>,
) -> ChatConfig {
    let defaults = ChatConfig::default();
    ChatConfig {
        endpoint: non_blank(endpoint).unwrap_or(defaults.endpoint),
        model: non_blank(model).unwrap_or(defaults.model),
        api_key: non_blank(api_key),
    }
}

/// Parse the outbound HTTP timeout in whole seconds, defaulting when absent.
pub fn timeout_from_env_value(value: Option<String>) -> HospitalResult<Duration> {
    let Some(raw) = non_blank(value) else {
        return Ok(Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS));
    };

    match raw.parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
        _ => Err(HospitalError::Config(format!(
            "{ENV_HTTP_TIMEOUT_SECS} must be a positive integer, got {raw:?}"
        ))),
    }
}
