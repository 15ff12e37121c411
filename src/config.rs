//! API Configuration
//!
//! Built once at start-up and injected into the client.

use std::time::Duration;
use url::Url;

pub const BASE_URL_VAR: &str = "NEXT_PUBLIC_API_BASE_URL";
pub const API_KEY_VAR: &str = "NEXT_PUBLIC_API_KEY";

pub const CONTACT_PATH: &str = "/contact/";

const PLACEHOLDER_MARKERS: &[&str] = &["your_", "tu_"];

#[derive(Clone, Default)]
pub struct ApiConfig {
    pub base_url: String,
    pub api_key: String,
    /// `None` leaves the transport default in place.
    pub timeout: Option<Duration>,
}

impl ApiConfig {
    /// Both values are stored trimmed.
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim().to_string(),
            api_key: api_key.into().trim().to_string(),
            timeout: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Read `NEXT_PUBLIC_API_BASE_URL` and `NEXT_PUBLIC_API_KEY`. Missing means empty.
    pub fn from_env() -> Self {
        let config = Self::new(
            std::env::var(BASE_URL_VAR).unwrap_or_default(),
            std::env::var(API_KEY_VAR).unwrap_or_default(),
        );
        let found = |v: &str| if v.is_empty() { "MISSING" } else { "FOUND" };
        tracing::debug!(
            base_url = found(&config.base_url),
            api_key = found(&config.api_key),
            "api config loaded from environment"
        );
        config
    }

    /// False when either value is empty or still a template placeholder.
    pub fn is_configured(&self) -> bool {
        is_real_value(&self.base_url) && is_real_value(&self.api_key)
    }

    pub fn contact_endpoint(&self) -> Result<Url, url::ParseError> {
        let base = self.base_url.trim().trim_end_matches('/');
        Url::parse(&format!("{}{}", base, CONTACT_PATH))
    }

    pub fn masked_key(&self) -> String {
        if self.api_key.is_empty() {
            return String::new();
        }
        let prefix: String = self.api_key.chars().take(10).collect();
        format!("{}...", prefix)
    }
}

impl std::fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &self.masked_key())
            .field("timeout", &self.timeout)
            .finish()
    }
}

fn is_real_value(value: &str) -> bool {
    let value = value.trim();
    if value.is_empty() {
        return false;
    }
    let lower = value.to_lowercase();
    !PLACEHOLDER_MARKERS.iter().any(|m| lower.contains(m))
}
