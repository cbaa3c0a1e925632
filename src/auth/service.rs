//! Credential check, token issuance and token validation.
//!
//! Orchestrates the token codec and the user directory. There is no
//! server-side session: login is a plaintext credential match against the
//! fetched directory, and validation is a decode plus a directory lookup.

use thiserror::Error;
use tracing::debug;

use crate::auth::directory::{User, UserDirectory};
use crate::auth::store::StoreError;
use crate::auth::token;
use crate::error::NetworkError;

/// Login input. Ephemeral: never persisted, only used to produce a
/// session.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub email: String,
    pub password: String,
    pub remember_me: bool,
}

/// Successful login payload.
///
/// The user keeps the password field: the mock backend returns it and the
/// client stores the record verbatim (wire parity, not a recommendation).
#[derive(Debug, Clone)]
pub struct AuthResponse {
    pub user: User,
    pub token: String,
    pub refresh_token: Option<String>,
}

/// Auth operation failure.
#[derive(Debug, Error)]
pub enum AuthError {
    /// No directory user matches the supplied email + password.
    #[error("invalid email or password")]
    InvalidCredentials,
    /// Token validation failed: undecodable token, unreachable directory,
    /// or the user is gone. Collapsed into one variant on purpose; callers
    /// react identically to all three.
    #[error("invalid or expired token")]
    InvalidToken,
    /// Refresh could not decode the presented token.
    #[error("could not refresh the session")]
    Refresh,
    /// The directory could not be fetched during login.
    #[error(transparent)]
    Network(#[from] NetworkError),
    /// The session could not be read or written locally.
    #[error("session storage failure: {0}")]
    Store(#[from] StoreError),
}

/// Auth orchestration over the token codec and the user directory.
pub struct AuthService {
    directory: UserDirectory,
}

impl AuthService {
    pub fn new(directory: UserDirectory) -> Self {
        Self { directory }
    }

    /// Check credentials against the directory and issue a session.
    ///
    /// Plaintext comparison; the mock stores passwords in the clear.
    pub async fn login(&self, credentials: &Credentials) -> Result<AuthResponse, AuthError> {
        debug!(email = %credentials.email, "login attempt");
        let users = self.directory.fetch_all().await?;

        let user = users
            .into_iter()
            .find(|u| u.email == credentials.email && u.password == credentials.password)
            .ok_or(AuthError::InvalidCredentials)?;

        let token = token::issue(&user.email);
        let refresh_token = token::issue_refresh(&user.email);

        Ok(AuthResponse {
            user,
            token,
            refresh_token: Some(refresh_token),
        })
    }

    /// Log out. No server-side session exists, so this always succeeds;
    /// the signature stays fallible as the seam for a real backend.
    pub async fn logout(&self) -> Result<(), AuthError> {
        debug!("logout: no server-side session to revoke");
        Ok(())
    }

    /// Re-validate a token against the directory and return its user.
    ///
    /// Decode failure, fetch failure and lookup miss all collapse to
    /// [`AuthError::InvalidToken`].
    pub async fn get_current_user(&self, token: &str) -> Result<User, AuthError> {
        let payload = token::decode(token).map_err(|_| AuthError::InvalidToken)?;
        let email = token::login_email(&payload);

        let user = self
            .directory
            .find_by_email(email)
            .await
            .map_err(|_| AuthError::InvalidToken)?;

        user.ok_or(AuthError::InvalidToken)
    }

    /// Reissue a login token from a refresh token.
    ///
    /// Reads the email from position 1 of the payload, matching the refresh
    /// layout. Handed a *login* token, position 1 is the timestamp: the
    /// codec's positional collision, reproduced rather than fixed. Not
    /// invoked by the state machine; kept as public API.
    pub async fn refresh_token(&self, token: &str) -> Result<String, AuthError> {
        let payload = token::decode(token).map_err(|_| AuthError::Refresh)?;
        let email = token::refresh_email(&payload).ok_or(AuthError::Refresh)?;

        Ok(token::issue(email))
    }
}

// ── Tests ───────────────────────────────────────────────────────────
