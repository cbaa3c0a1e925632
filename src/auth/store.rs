//! Two-tier session persistence.
//!
//! Mirrors the browser storage split the admin panel relied on: a durable
//! tier that survives restarts (SQLite key-value table) and an ephemeral
//! tier scoped to the process (in-memory map), the analogue of per-tab
//! storage. The remember-me flag picks the tier at login time and the
//! choice does not change without a fresh login.
//!
//! `clear` always wipes both tiers: a leftover from a prior session that
//! used the other tier must not survive a logout.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::auth::directory::User;

/// Storage keys, shared by both tiers.
const TOKEN_KEY: &str = "auth_token";
const USER_KEY: &str = "auth_user";

/// Remember marker. Durable tier only; written only when remembering.
const REMEMBER_KEY: &str = "remember_me";

/// A persisted logged-in session.
#[derive(Debug, Clone)]
pub struct Session {
    pub user: User,
    pub token: String,
    /// Which tier holds the session: durable when true.
    pub remembered: bool,
}

/// Session persistence failure.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage failure: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("storage io failure: {0}")]
    Io(#[from] std::io::Error),
    #[error("corrupt stored user record: {0}")]
    Serde(#[from] serde_json::Error),
}

/// A flat string key-value tier.
trait Tier {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn put(&self, key: &str, value: &str) -> Result<(), StoreError>;
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}

/// SQLite-backed durable tier.
struct DurableTier {
    conn: Mutex<rusqlite::Connection>,
}

impl DurableTier {
    fn open(db_path: &Path) -> Result<Self, StoreError> {
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let conn = rusqlite::Connection::open(db_path)?;
        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;",
        )?;
        Self::init_tables(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn in_memory() -> Result<Self, StoreError> {
        let conn = rusqlite::Connection::open_in_memory()?;
        Self::init_tables(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn init_tables(conn: &rusqlite::Connection) -> Result<(), StoreError> {
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS session_kv (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );",
        )?;
        Ok(())
    }
}

impl Tier for DurableTier {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let conn = self.conn.lock();
        let row = conn.query_row(
            "SELECT value FROM session_kv WHERE key = ?1",
            rusqlite::params![key],
            |row| row.get(0),
        );

        match row {
            Ok(value) => Ok(Some(value)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn put(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let conn = self.conn.lock();
        conn.execute(
            "INSERT INTO session_kv (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            rusqlite::params![key, value],
        )?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        let conn = self.conn.lock();
        conn.execute(
            "DELETE FROM session_kv WHERE key = ?1",
            rusqlite::params![key],
        )?;
        Ok(())
    }
}

/// Process-lifetime ephemeral tier.
#[derive(Default)]
struct EphemeralTier {
    map: Mutex<HashMap<String, String>>,
}

impl Tier for EphemeralTier {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.map.lock().get(key).cloned())
    }

    fn put(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.map.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.map.lock().remove(key);
        Ok(())
    }
}

/// Two-tier session store.
pub struct SessionStore {
    durable: DurableTier,
    ephemeral: EphemeralTier,
}

impl SessionStore {
    /// Open a store with a file-backed durable tier, creating parent
    /// directories as needed.
    pub fn open(db_path: &Path) -> Result<Self, StoreError> {
        Ok(Self {
            durable: DurableTier::open(db_path)?,
            ephemeral: EphemeralTier::default(),
        })
    }

    /// Fully in-memory store. Both tiers die with the process; intended for
    /// tests.
    pub fn in_memory() -> Result<Self, StoreError> {
        Ok(Self {
            durable: DurableTier::in_memory()?,
            ephemeral: EphemeralTier::default(),
        })
    }

    /// Default on-disk location for the durable tier.
    pub fn default_db_path() -> Option<PathBuf> {
        let dirs = directories::ProjectDirs::from("", "", "galaxy-admin")?;
        Some(dirs.data_dir().join("session.db"))
    }

    fn tier(&self, remembered: bool) -> &dyn Tier {
        if remembered {
            &self.durable
        } else {
            &self.ephemeral
        }
    }

    /// Persist a session into the tier selected by its remember flag.
    ///
    /// The remember marker goes to the durable tier only, and only when
    /// remembering; `load` uses it to pick the tier to read.
    pub fn save(&self, session: &Session) -> Result<(), StoreError> {
        let tier = self.tier(session.remembered);
        tier.put(TOKEN_KEY, &session.token)?;
        tier.put(USER_KEY, &serde_json::to_string(&session.user)?)?;

        if session.remembered {
            self.durable.put(REMEMBER_KEY, "true")?;
        }
        Ok(())
    }

    /// Load the persisted session, if any.
    ///
    /// The remember marker decides which tier to read; absent unless both
    /// token and user are present there.
    pub fn load(&self) -> Result<Option<Session>, StoreError> {
        let remembered = self.durable.get(REMEMBER_KEY)?.is_some();
        let tier = self.tier(remembered);

        let (token, raw_user) = match (tier.get(TOKEN_KEY)?, tier.get(USER_KEY)?) {
            (Some(token), Some(raw_user)) => (token, raw_user),
            _ => return Ok(None),
        };

        let user: User = serde_json::from_str(&raw_user)?;
        Ok(Some(Session {
            user,
            token,
            remembered,
        }))
    }

    /// Remove token, user and remember marker from both tiers.
    pub fn clear(&self) -> Result<(), StoreError> {
        for tier in [&self.durable as &dyn Tier, &self.ephemeral as &dyn Tier] {
            tier.remove(TOKEN_KEY)?;
            tier.remove(USER_KEY)?;
            tier.remove(REMEMBER_KEY)?;
        }
        Ok(())
    }
}

// ── Tests ───────────────────────────────────────────────────────────
