//! Login / logout / check-auth state machine.
//!
//! Single-owner state container: the caller holds one [`AuthManager`] and
//! drives it with at most one transition at a time (submit affordances stay
//! disabled while `is_loading`, a UI-level invariant not enforced here).
//! Transitions mutate [`AuthState`] in place and persist or clear the
//! session store as they go.
//!
//! A generation counter guards the one race this design admits: a
//! `check_auth` whose directory call is still in flight when a logout (or a
//! fresh login) lands. The counter is bumped whenever the session identity
//! changes and a superseded check discards its result instead of
//! re-authenticating.

use tracing::{debug, warn};

use crate::auth::directory::User;
use crate::auth::service::{AuthError, AuthService, Credentials};
use crate::auth::store::{Session, SessionStore};
use crate::auth::token;

/// Durable-session lifetime: 30 days (millis).
const REMEMBERED_MAX_AGE_MILLIS: u64 = 30 * 24 * 60 * 60 * 1000;

/// Ephemeral-session lifetime: 24 hours (millis).
const EPHEMERAL_MAX_AGE_MILLIS: u64 = 24 * 60 * 60 * 1000;

/// Derived, in-memory view of the session.
///
/// Rebuilt from the store on startup via `check_auth`; the loading flag has
/// no persisted counterpart.
#[derive(Debug, Clone, Default)]
pub struct AuthState {
    pub user: Option<User>,
    pub token: Option<String>,
    pub is_authenticated: bool,
    pub is_loading: bool,
}

/// Owner of the auth lifecycle.
pub struct AuthManager {
    service: AuthService,
    store: SessionStore,
    state: AuthState,
    /// Bumped on every session-identity change (login, logout). An
    /// in-flight `check_auth` compares its snapshot against this and
    /// discards stale results.
    generation: u64,
}

impl AuthManager {
    /// Starts in the loading state; `check_auth` resolves it.
    pub fn new(service: AuthService, store: SessionStore) -> Self {
        Self {
            service,
            store,
            state: AuthState {
                is_loading: true,
                ..AuthState::default()
            },
            generation: 0,
        }
    }

    /// Current state snapshot.
    pub fn state(&self) -> &AuthState {
        &self.state
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.is_authenticated
    }

    /// Authenticate and persist the session.
    ///
    /// On failure the loading flag drops, the error propagates to the
    /// caller, and the state stays anonymous.
    pub async fn login(&mut self, credentials: &Credentials) -> Result<(), AuthError> {
        self.state.is_loading = true;

        match self.try_login(credentials).await {
            Ok(()) => Ok(()),
            Err(e) => {
                self.state.is_loading = false;
                Err(e)
            }
        }
    }

    async fn try_login(&mut self, credentials: &Credentials) -> Result<(), AuthError> {
        let response = self.service.login(credentials).await?;

        let session = Session {
            user: response.user,
            token: response.token,
            remembered: credentials.remember_me,
        };
        self.store.save(&session)?;

        self.generation += 1;
        self.state = AuthState {
            user: Some(session.user),
            token: Some(session.token),
            is_authenticated: true,
            is_loading: false,
        };
        Ok(())
    }

    /// Drop the session: service call best-effort, local state always
    /// reaches anonymous.
    pub async fn logout(&mut self) {
        if let Err(e) = self.service.logout().await {
            warn!("logout service call failed, clearing locally anyway: {e}");
        }
        if let Err(e) = self.store.clear() {
            warn!("failed to clear session storage: {e}");
        }

        self.generation += 1;
        self.state = AuthState::default();
    }

    /// Rebuild auth state from the persisted session, if still valid.
    ///
    /// Invoked once at startup. Missing session → anonymous. A session past
    /// its tier's maximum age (30 days remembered, 24 hours otherwise,
    /// measured from the token's embedded issue time) or one that fails
    /// directory re-validation runs the logout transition.
    pub async fn check_auth(&mut self) {
        self.state.is_loading = true;

        let session = match self.store.load() {
            Ok(Some(session)) => session,
            Ok(None) => {
                self.state.is_loading = false;
                return;
            }
            Err(e) => {
                warn!("failed to read session storage: {e}");
                self.logout().await;
                return;
            }
        };

        if session_expired(&session) {
            debug!("stored session expired");
            self.logout().await;
            return;
        }

        let snapshot = self.generation;
        let result = self.service.get_current_user(&session.token).await;
        self.apply_check(snapshot, session.token, result).await;
    }

    /// Apply the outcome of a directory re-validation, unless a newer
    /// login or logout superseded the check while it was in flight.
    async fn apply_check(&mut self, snapshot: u64, token: String, result: Result<User, AuthError>) {
        if self.generation != snapshot {
            debug!("discarding stale check_auth result");
            return;
        }

        match result {
            Ok(user) => {
                self.state = AuthState {
                    user: Some(user),
                    token: Some(token),
                    is_authenticated: true,
                    is_loading: false,
                };
            }
            Err(e) => {
                debug!("stored token failed re-validation: {e}");
                self.logout().await;
            }
        }
    }
}

/// Whether the session is past its tier's maximum age.
///
/// Age is measured against the issue time embedded in the login token. A
/// token whose issue time cannot be recovered counts as expired.
fn session_expired(session: &Session) -> bool {
    let max_age = if session.remembered {
        REMEMBERED_MAX_AGE_MILLIS
    } else {
        EPHEMERAL_MAX_AGE_MILLIS
    };

    let issued_at = token::decode(&session.token)
        .ok()
        .and_then(|payload| token::login_issued_at(&payload));

    match issued_at {
        Some(issued_at) => token::epoch_millis().saturating_sub(issued_at) > max_age,
        None => true,
    }
}

// ── Tests ───────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::directory::UserDirectory;
    use crate::config::ApiConfig;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const DAY_MILLIS: u64 = 24 * 60 * 60 * 1000;

    fn one_user() -> serde_json::Value {
        json!([{
            "id": "1",
            "email": "a@gmail.com",
            "name": "Ada",
            "lastname": "Lovelace",
            "createdAt": "2025-01-15T10:00:00.000Z",
            "password": "secret1",
        }])
    }

    async fn server_with_directory(users: serde_json::Value) -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/customers"))
            .respond_with(ResponseTemplate::new(200).set_body_json(users))
            .mount(&server)
            .await;
        server
    }

    fn manager_for(server: &MockServer) -> AuthManager {
        let directory = UserDirectory::new(ApiConfig::new(server.uri())).unwrap();
        AuthManager::new(
            AuthService::new(directory),
            SessionStore::in_memory().unwrap(),
        )
    }

    fn sample_user() -> User {
        User {
            id: "1".into(),
            email: "a@gmail.com".into(),
            name: "Ada".into(),
            lastname: "Lovelace".into(),
            created_at: "2025-01-15T10:00:00.000Z".into(),
            password: "secret1".into(),
        }
    }

    fn stored_session(issued_at: u64, remembered: bool) -> Session {
        Session {
            user: sample_user(),
            token: token::issue_at("a@gmail.com", issued_at),
            remembered,
        }
    }

    fn credentials(email: &str, password: &str, remember_me: bool) -> Credentials {
        Credentials {
            email: email.into(),
            password: password.into(),
            remember_me,
        }
    }

    #[test]
    fn starts_loading_and_anonymous() {
        let server_less = UserDirectory::new(ApiConfig::new("http://127.0.0.1:1")).unwrap();
        let manager = AuthManager::new(
            AuthService::new(server_less),
            SessionStore::in_memory().unwrap(),
        );

        assert!(manager.state().is_loading);
        assert!(!manager.is_authenticated());
    }

    #[tokio::test]
    async fn login_success_authenticates_and_persists() {
        let server = server_with_directory(one_user()).await;
        let mut manager = manager_for(&server);

        manager
            .login(&credentials("a@gmail.com", "secret1", false))
            .await
            .unwrap();

        let state = manager.state();
        assert!(state.is_authenticated);
        assert!(!state.is_loading);
        assert_eq!(state.user.as_ref().unwrap().email, "a@gmail.com");

        let session = manager.store.load().unwrap().unwrap();
        assert!(!session.remembered);
        let payload = token::decode(&session.token).unwrap();
        assert_eq!(token::login_email(&payload), "a@gmail.com");
    }

    #[tokio::test]
    async fn login_failure_stays_anonymous_and_propagates() {
        let server = server_with_directory(one_user()).await;
        let mut manager = manager_for(&server);

        let err = manager
            .login(&credentials("a@gmail.com", "wrong", false))
            .await
            .unwrap_err();

        assert!(matches!(err, AuthError::InvalidCredentials));
        assert!(!manager.is_authenticated());
        assert!(!manager.state().is_loading);
        assert!(manager.store.load().unwrap().is_none());
    }

    #[tokio::test]
    async fn check_auth_without_session_is_anonymous() {
        let server = server_with_directory(one_user()).await;
        let mut manager = manager_for(&server);

        manager.check_auth().await;

        assert!(!manager.is_authenticated());
        assert!(!manager.state().is_loading);
    }

    #[tokio::test]
    async fn check_auth_revalidates_fresh_session() {
        let server = server_with_directory(one_user()).await;
        let mut manager = manager_for(&server);
        manager
            .store
            .save(&stored_session(token::epoch_millis(), true))
            .unwrap();

        manager.check_auth().await;

        assert!(manager.is_authenticated());
        assert_eq!(
            manager.state().user.as_ref().unwrap().email,
            "a@gmail.com"
        );
    }

    #[tokio::test]
    async fn check_auth_expires_remembered_session_after_30_days() {
        let server = server_with_directory(one_user()).await;
        let mut manager = manager_for(&server);
        let issued_at = token::epoch_millis() - 31 * DAY_MILLIS;
        manager.store.save(&stored_session(issued_at, true)).unwrap();

        manager.check_auth().await;

        assert!(!manager.is_authenticated());
        // Expiry runs the logout transition: both tiers are cleared.
        assert!(manager.store.load().unwrap().is_none());
    }

    #[tokio::test]
    async fn check_auth_keeps_remembered_session_under_30_days() {
        let server = server_with_directory(one_user()).await;
        let mut manager = manager_for(&server);
        let issued_at = token::epoch_millis() - 29 * DAY_MILLIS;
        manager.store.save(&stored_session(issued_at, true)).unwrap();

        manager.check_auth().await;

        assert!(manager.is_authenticated());
    }

    #[tokio::test]
    async fn check_auth_expires_ephemeral_session_after_24_hours() {
        let server = server_with_directory(one_user()).await;
        let mut manager = manager_for(&server);
        let issued_at = token::epoch_millis() - 25 * 60 * 60 * 1000;
        manager.store.save(&stored_session(issued_at, false)).unwrap();

        manager.check_auth().await;

        assert!(!manager.is_authenticated());
        assert!(manager.store.load().unwrap().is_none());
    }

    #[tokio::test]
    async fn check_auth_keeps_ephemeral_session_under_24_hours() {
        let server = server_with_directory(one_user()).await;
        let mut manager = manager_for(&server);
        let issued_at = token::epoch_millis() - 23 * 60 * 60 * 1000;
        manager.store.save(&stored_session(issued_at, false)).unwrap();

        manager.check_auth().await;

        assert!(manager.is_authenticated());
    }

    #[tokio::test]
    async fn check_auth_logs_out_when_user_gone_from_directory() {
        let server = server_with_directory(json!([])).await;
        let mut manager = manager_for(&server);
        manager
            .store
            .save(&stored_session(token::epoch_millis(), true))
            .unwrap();

        manager.check_auth().await;

        assert!(!manager.is_authenticated());
        assert!(manager.store.load().unwrap().is_none());
    }

    #[tokio::test]
    async fn check_auth_treats_unparsable_issue_time_as_expired() {
        let server = server_with_directory(one_user()).await;
        let mut manager = manager_for(&server);
        manager
            .store
            .save(&Session {
                user: sample_user(),
                // Valid base64, but no timestamp field to recover.
                token: "bm90LWEtdG9rZW4=".into(),
                remembered: true,
            })
            .unwrap();

        manager.check_auth().await;

        assert!(!manager.is_authenticated());
    }

    #[tokio::test]
    async fn logout_reaches_anonymous_and_empties_both_tiers() {
        let server = server_with_directory(one_user()).await;
        let mut manager = manager_for(&server);
        manager
            .login(&credentials("a@gmail.com", "secret1", true))
            .await
            .unwrap();

        manager.logout().await;

        let state = manager.state();
        assert!(!state.is_authenticated);
        assert!(state.user.is_none());
        assert!(state.token.is_none());
        assert!(manager.store.load().unwrap().is_none());
    }

    #[tokio::test]
    async fn stale_check_result_is_discarded_after_logout() {
        let server = server_with_directory(one_user()).await;
        let mut manager = manager_for(&server);

        // A check_auth snapshots the generation, then a logout lands while
        // its directory call is in flight.
        let snapshot = manager.generation;
        manager.logout().await;

        let token = token::issue("a@gmail.com");
        manager
            .apply_check(snapshot, token, Ok(sample_user()))
            .await;

        assert!(!manager.is_authenticated());
        assert!(manager.state().user.is_none());
    }

    #[tokio::test]
    async fn current_check_result_is_applied() {
        let server = server_with_directory(one_user()).await;
        let mut manager = manager_for(&server);

        let snapshot = manager.generation;
        let token = token::issue("a@gmail.com");
        manager
            .apply_check(snapshot, token, Ok(sample_user()))
            .await;

        assert!(manager.is_authenticated());
    }
}
