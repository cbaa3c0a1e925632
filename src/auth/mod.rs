//! Session/auth lifecycle for the Galaxy admin client.
//!
//! Components, leaf-first:
//! - [`token`]: mock bearer-token codec (base64, unsigned)
//! - [`directory`]: remote user directory client
//! - [`service`]: credential check, token issuance and validation
//! - [`store`]: two-tier session persistence
//! - [`state`]: login / logout / check-auth state machine
//!
//! ## Design Decisions
//! - The token scheme mirrors the mock backend: unsigned base64 over
//!   `email:timestamp`, forgeable by anyone. It exists for behavioral
//!   parity with the backend, not as a security boundary.
//! - The user directory is refetched on every auth operation; directory
//!   edits become visible on the next call. Acceptable only for small mock
//!   datasets.
//! - Sessions live in exactly one of two tiers (durable vs process-scoped),
//!   chosen by the remember-me flag at login time.

pub mod directory;
pub mod service;
pub mod state;
pub mod store;
pub mod token;

pub use directory::{User, UserDirectory};
pub use service::{AuthError, AuthResponse, AuthService, Credentials};
pub use state::{AuthManager, AuthState};
pub use store::{Session, SessionStore};
