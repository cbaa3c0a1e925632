//! Customer records and the rules applied before they reach the wire.
//!
//! Validation mirrors the admin panel's form schema: every field is
//! trimmed, the e-mail is restricted to the Galaxy domain and lowercased
//! for the wire, and per-field minimum lengths apply. Drafts are validated
//! locally before any network call; the mock backend accepts anything.

pub mod api;

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;
use thiserror::Error;

/// A customer record in the remote collection.
///
/// Same collection the user directory reads; this is the full field set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Customer {
    pub id: String,
    #[serde(rename = "createdAt")]
    pub created_at: String,
    pub name: String,
    pub lastname: String,
    pub email: String,
    pub phone: String,
    pub user: String,
    pub password: String,
}

/// Create/update payload. `id` and `createdAt` are server-assigned.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CustomerDraft {
    pub name: String,
    pub lastname: String,
    pub email: String,
    pub phone: String,
    pub user: String,
    pub password: String,
}

/// A field that failed validation, with the rule it broke.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("{field}: {reason}")]
pub struct ValidationError {
    pub field: &'static str,
    pub reason: &'static str,
}

/// Accepted e-mail shape: Galaxy accounts only.
fn email_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[\w.%+-]+@gmail\.com$").expect("static pattern"))
}

impl CustomerDraft {
    /// Validate and normalise the draft.
    ///
    /// Trims every field and lowercases the e-mail, returning the draft as
    /// it will be sent on the wire. The e-mail pattern is checked before
    /// lowercasing, so an uppercased domain is rejected.
    pub fn validated(&self) -> Result<CustomerDraft, ValidationError> {
        let name = required_min(self.name.trim(), 2, "name", "name required")?;
        let lastname = required_min(self.lastname.trim(), 2, "lastname", "lastname required")?;

        let email = self.email.trim();
        if !email_pattern().is_match(email) {
            return Err(ValidationError {
                field: "email",
                reason: "only Galaxy domains are allowed",
            });
        }

        let phone = required_min(self.phone.trim(), 9, "phone", "invalid phone")?;
        let user = required_min(self.user.trim(), 3, "user", "user required")?;
        let password = required_min(self.password.trim(), 6, "password", "minimum 6 characters")?;

        Ok(CustomerDraft {
            name: name.to_string(),
            lastname: lastname.to_string(),
            email: email.to_lowercase(),
            phone: phone.to_string(),
            user: user.to_string(),
            password: password.to_string(),
        })
    }
}

fn required_min<'a>(
    value: &'a str,
    min: usize,
    field: &'static str,
    reason: &'static str,
) -> Result<&'a str, ValidationError> {
    if value.chars().count() < min {
        return Err(ValidationError { field, reason });
    }
    Ok(value)
}

// ── Tests ───────────────────────────────────────────────────────────
