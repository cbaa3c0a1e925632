//! Remote user directory client.
//!
//! The mock backend exposes the full user collection as one unauthenticated
//! GET (no pagination, no server-side filtering), so lookups are linear
//! over a fresh fetch. Nothing is cached: every call refetches, and
//! directory edits are visible on the next call. Acceptable only for small
//! mock datasets.

use serde::{Deserialize, Serialize};

use crate::config::ApiConfig;
use crate::error::NetworkError;

/// HTTP request timeout.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// A user record in the remote directory.
///
/// The directory is the system of record; the client only ever holds
/// read-only copies. `email` is the natural key; uniqueness is assumed,
/// not enforced here. The mock backend stores plaintext passwords and the
/// field is carried as-is for login matching.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    pub name: String,
    pub lastname: String,
    #[serde(rename = "createdAt")]
    pub created_at: String,
    pub password: String,
}

/// Client for the remote user directory.
pub struct UserDirectory {
    config: ApiConfig,
    http: reqwest::Client,
}

impl UserDirectory {
    /// Create a directory client for the given API endpoint.
    pub fn new(config: ApiConfig) -> Result<Self, NetworkError> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self { config, http })
    }

    /// Fetch the entire user collection.
    pub async fn fetch_all(&self) -> Result<Vec<User>, NetworkError> {
        let resp = self.http.get(self.config.customers_url()).send().await?;

        if !resp.status().is_success() {
            return Err(NetworkError::Status(resp.status().as_u16()));
        }

        resp.json().await.map_err(NetworkError::Body)
    }

    /// First user whose email matches exactly (case-sensitive).
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, NetworkError> {
        let users = self.fetch_all().await?;
        Ok(users.into_iter().find(|u| u.email == email))
    }
}

// ── Tests ───────────────────────────────────────────────────────────
