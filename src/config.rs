use std::env;
use std::fmt;
use std::time::Duration;

use crate::error::{ClientError, Result};

/// Timeout used by [`ApiConfig::nano_banana`]. Image generation is slow.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(300);

/// Connection settings for the Nano Banana backend.
///
/// Built once and never mutated afterwards; the builder methods consume
/// `self` and hand back the updated value.
#[derive(Clone, PartialEq)]
pub struct ApiConfig {
    base_url: String,
    api_key: Option<String>,
    timeout: Option<Duration>,
    headers: Vec<(String, String)>,
}

// Keeps the key and extra header values out of logs and panic messages.
impl fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let header_names: Vec<&str> = self.headers.iter().map(|(name, _)| name.as_str()).collect();
        f.debug_struct("ApiConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("timeout", &self.timeout)
            .field("headers", &header_names)
            .finish()
    }
}

fn normalize(base_url: String) -> String {
    base_url.trim_end_matches('/').to_string()
}

impl ApiConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        ApiConfig {
            base_url: normalize(base_url.into()),
            api_key: None,
            timeout: None,
            headers: Vec::new(),
        }
    }

    /// The preset used by [`create_nano_banana_client`](crate::create_nano_banana_client):
    /// a five minute timeout and an explicit JSON content type.
    pub fn nano_banana(base_url: impl Into<String>, api_key: Option<String>) -> Self {
        let config = ApiConfig::new(base_url)
            .with_timeout(DEFAULT_TIMEOUT)
            .with_header("Content-Type", "application/json");
        match api_key {
            Some(key) => config.with_api_key(key),
            None => config,
        }
    }

    /// Reads `NANO_BANANA_BASE_URL`, `NANO_BANANA_API_KEY` and
    /// `NANO_BANANA_TIMEOUT_SECS`.
    pub fn from_env() -> Result<Self> {
        let base_url = env::var("NANO_BANANA_BASE_URL")
            .map_err(|_| ClientError::Config("NANO_BANANA_BASE_URL is not set".into()))?;
        let api_key = env::var("NANO_BANANA_API_KEY").ok().filter(|k| !k.is_empty());

        let mut config = ApiConfig::nano_banana(base_url, api_key);
        if let Ok(raw) = env::var("NANO_BANANA_TIMEOUT_SECS") {
            let secs: u64 = raw.parse().map_err(|_| {
                ClientError::Config(format!("NANO_BANANA_TIMEOUT_SECS is not a number: {}", raw))
            })?;
            config = config.with_timeout(Duration::from_secs(secs));
        }
        Ok(config)
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Adds an extra header. Extra headers are sent after the defaults and
    /// win over them when names collide.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    /// Joins an API path onto the base URL.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}
