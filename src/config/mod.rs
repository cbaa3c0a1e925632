//! API endpoint configuration.
//!
//! The backend is a mockapi.io project; the project token selects the
//! instance, and every resource lives under
//! `https://<token>.mockapi.io/api/v1`. Tests and self-hosted mirrors can
//! bypass token assembly with an explicit base URL.

use serde::{Deserialize, Serialize};

/// Environment variable holding a full base URL (wins over the token).
const URL_ENV: &str = "GALAXY_API_URL";

/// Environment variable holding the mockapi.io project token.
const TOKEN_ENV: &str = "GALAXY_API_TOKEN";

/// Remote API connection configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the REST API, without a trailing slash.
    pub base_url: String,
}

impl ApiConfig {
    /// Build a config from an explicit base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self { base_url }
    }

    /// Build a config from a mockapi.io project token.
    pub fn for_project(token: &str) -> Self {
        Self::new(format!("https://{token}.mockapi.io/api/v1"))
    }

    /// Load from environment variables.
    ///
    /// `GALAXY_API_URL` takes precedence; otherwise the base URL is
    /// assembled from `GALAXY_API_TOKEN`. `None` when neither is set.
    pub fn from_env() -> Option<Self> {
        if let Ok(url) = std::env::var(URL_ENV) {
            if !url.is_empty() {
                return Some(Self::new(url));
            }
        }
        let token = std::env::var(TOKEN_ENV).ok()?;
        if token.is_empty() {
            return None;
        }
        Some(Self::for_project(&token))
    }

    /// URL of the shared customer collection (also the user directory).
    pub fn customers_url(&self) -> String {
        format!("{}/customers", self.base_url)
    }

    /// URL of a single customer record.
    pub fn customer_url(&self, id: &str) -> String {
        format!("{}/customers/{}", self.base_url, id)
    }
}

// ── Tests ───────────────────────────────────────────────────────────
