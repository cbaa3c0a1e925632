//! Mock bearer-token codec.
//!
//! Tokens are plain base64 over colon-joined fields:
//! - login:   `base64("<email>:<epoch_millis>")`
//! - refresh: `base64("refresh:<email>:<epoch_millis>")`
//!
//! No signature, no tamper detection: any client can forge a token for any
//! email. The format exists only to mirror the mock backend.
//!
//! The two variants are not self-describing: they differ by field position
//! alone. Decoding a refresh token with the login layout yields the literal
//! `refresh` marker in the email slot; callers that index positionally
//! inherit that ambiguity.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;

/// Marker segment prefixing refresh tokens.
const REFRESH_MARKER: &str = "refresh";

/// Failure to decode a token into its payload.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DecodeError {
    /// The token is not valid base64.
    #[error("token is not valid base64")]
    InvalidBase64,
    /// The decoded payload is not UTF-8.
    #[error("token payload is not valid UTF-8")]
    InvalidPayload,
}

/// Issue a login token for `email` at the current time.
pub fn issue(email: &str) -> String {
    issue_at(email, epoch_millis())
}

/// Issue a login token with an explicit issuance time (epoch millis).
pub fn issue_at(email: &str, issued_at_millis: u64) -> String {
    STANDARD.encode(format!("{email}:{issued_at_millis}"))
}

/// Issue a refresh token for `email` at the current time.
pub fn issue_refresh(email: &str) -> String {
    STANDARD.encode(format!("{REFRESH_MARKER}:{email}:{}", epoch_millis()))
}

/// Decode a token into its raw colon-joined payload.
pub fn decode(token: &str) -> Result<String, DecodeError> {
    let bytes = STANDARD
        .decode(token)
        .map_err(|_| DecodeError::InvalidBase64)?;
    String::from_utf8(bytes).map_err(|_| DecodeError::InvalidPayload)
}

/// Email field of a decoded login token (position 0).
pub fn login_email(payload: &str) -> &str {
    payload.split(':').next().unwrap_or_default()
}

/// Issued-at millis of a decoded login token (position 1), if parsable.
pub fn login_issued_at(payload: &str) -> Option<u64> {
    payload.split(':').nth(1)?.parse().ok()
}

/// Field at position 1 of the payload, the email slot of the refresh
/// layout. On a login token this is the timestamp instead.
pub fn refresh_email(payload: &str) -> Option<&str> {
    payload.split(':').nth(1)
}

/// Current Unix epoch in milliseconds.
pub(crate) fn epoch_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

// ── Tests ───────────────────────────────────────────────────────────
