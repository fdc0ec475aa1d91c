//! # Session Store
//!
//! Typed front of a [`SessionBackend`]: generates ids, encodes sessions to
//! JSON and decides what an absent entry means.
//!
//! ## Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Session Lifecycle                                 │
//! │                                                                         │
//! │  new_session() ──► defaults stored, expires at now + ttl                │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  load(id) ──► copy of the session       (ttl NOT extended)              │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  save(id, s) ──► value swapped wholesale (ttl NOT extended)             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  now ≥ expires_at ──► load/save return SessionError::Expired            │
//! │                       entry removed lazily or by the sweeper            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Expiry is absolute from creation, so memory use is bounded by the
//! creation rate no matter how often a visitor comes back.

use std::fmt;
use std::sync::{Arc, Weak};
use std::time::Duration;

use chrono::{DateTime, Utc};
use picofi_core::{Currency, Session};
use serde::{Deserialize, Serialize};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::backend::{MemoryBackend, SessionBackend};
use crate::error::{SessionError, SessionResult};

/// Default retention window: 24 hours.
pub const DEFAULT_SESSION_TTL: Duration = Duration::from_secs(24 * 60 * 60);

// =============================================================================
// Session Id
// =============================================================================

/// Opaque session identifier, as carried in the `session-id` cookie.
///
/// Generated ids are random UUID v4 strings (122 random bits). Ids coming
/// back from a browser are not validated: an unknown id simply has no entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    /// Generates a fresh random id.
    pub fn generate() -> Self {
        SessionId(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for SessionId {
    fn from(value: String) -> Self {
        SessionId(value)
    }
}

impl From<&str> for SessionId {
    fn from(value: &str) -> Self {
        SessionId(value.to_owned())
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// =============================================================================
// Configuration
// =============================================================================

/// Session store configuration.
///
/// ## Example
/// ```rust
/// use std::time::Duration;
/// use picofi_core::Currency;
/// use picofi_session::SessionConfig;
///
/// let config = SessionConfig::new(Currency::Eur).ttl(Duration::from_secs(3600));
/// assert_eq!(config.ttl, Duration::from_secs(3600));
/// ```
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Retention window, counted from creation.
    /// Default: 24 hours
    pub ttl: Duration,

    /// Currency of the default session.
    pub currency: Currency,
}

impl SessionConfig {
    pub fn new(currency: Currency) -> Self {
        SessionConfig {
            ttl: DEFAULT_SESSION_TTL,
            currency,
        }
    }

    /// Sets the retention window.
    pub fn ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig::new(Currency::default())
    }
}

// =============================================================================
// Store
// =============================================================================

/// Per-visitor session storage with a fixed retention window.
///
/// ## Thread Safety
/// The store holds no lock of its own. Sessions are encoded before they
/// reach the backend and swapped in as one immutable buffer, so concurrent
/// loads see either the old or the new value, never a mix.
#[derive(Debug)]
pub struct SessionStore<B = MemoryBackend> {
    backend: B,
    config: SessionConfig,
}

impl SessionStore<MemoryBackend> {
    /// Creates a store over a fresh in-memory backend.
    pub fn in_memory(config: SessionConfig) -> Self {
        SessionStore::new(MemoryBackend::new(), config)
    }
}

impl<B: SessionBackend> SessionStore<B> {
    pub fn new(backend: B, config: SessionConfig) -> Self {
        SessionStore { backend, config }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Allocates a new id and seeds it with the default session.
    pub fn new_session(&self) -> SessionResult<SessionId> {
        let id = SessionId::generate();
        let encoded = encode(&Session::defaults(self.config.currency))?;

        self.backend.insert(id.as_str(), encoded, self.config.ttl)?;

        info!(session_id = %id, ttl_secs = self.config.ttl.as_secs(), "new session created");
        Ok(id)
    }

    /// Returns a copy of the session stored under `id`.
    ///
    /// Does not extend the session's lifetime.
    pub fn load(&self, id: &SessionId) -> SessionResult<Session> {
        debug!(session_id = %id, "retrieving session data");

        let Some(bytes) = self.backend.get(id.as_str())? else {
            info!(session_id = %id, "session not found in cache");
            return Err(SessionError::Expired(id.clone()));
        };

        serde_json::from_slice(&bytes).map_err(|e| {
            warn!(session_id = %id, error = %e, "stored session data is unreadable");
            SessionError::Serialization(e)
        })
    }

    /// Replaces the session stored under `id` with `session`.
    ///
    /// The previous value is discarded, not merged. The remaining lifetime is
    /// unchanged. Fails with [`SessionError::Expired`] if the entry is gone.
    pub fn save(&self, id: &SessionId, session: &Session) -> SessionResult<()> {
        debug!(session_id = %id, rows = session.savings.len(), "updating session data");

        let encoded = encode(session)?;
        if !self.backend.replace(id.as_str(), encoded)? {
            info!(session_id = %id, "session expired before it could be saved");
            return Err(SessionError::Expired(id.clone()));
        }
        Ok(())
    }

    /// Wall-clock time at which a live session expires.
    pub fn expires_at(&self, id: &SessionId) -> SessionResult<DateTime<Utc>> {
        let remaining = self
            .backend
            .time_to_live(id.as_str())?
            .ok_or_else(|| SessionError::Expired(id.clone()))?;

        let remaining = chrono::Duration::from_std(remaining).unwrap_or(chrono::Duration::MAX);
        Ok(Utc::now()
            .checked_add_signed(remaining)
            .unwrap_or(DateTime::<Utc>::MAX_UTC))
    }

    /// Removes expired entries now.
    pub fn sweep(&self) -> SessionResult<usize> {
        let removed = self.backend.sweep()?;
        if removed > 0 {
            debug!(removed, "swept expired sessions");
        }
        Ok(removed)
    }
}

impl<B: SessionBackend + 'static> SessionStore<B> {
    /// Spawns a task that sweeps expired sessions every `every`.
    ///
    /// The task holds only a weak reference and ends once the store is
    /// dropped. Must be called from within a tokio runtime.
    pub fn spawn_sweeper(self: &Arc<Self>, every: Duration) -> JoinHandle<()> {
        let store: Weak<Self> = Arc::downgrade(self);

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(every);
            // First tick completes immediately
            ticker.tick().await;

            loop {
                ticker.tick().await;
                let Some(store) = store.upgrade() else {
                    debug!("session store dropped, sweeper exiting");
                    break;
                };
                if let Err(e) = store.sweep() {
                    warn!(error = %e, "session sweep failed");
                }
            }
        })
    }
}

fn encode(session: &Session) -> SessionResult<Arc<[u8]>> {
    let bytes = serde_json::to_vec(session)?;
    Ok(Arc::from(bytes))
}

// =============================================================================
// Unit Tests
// =============================================================================
