//! # Session Error Types
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  Backend failure (StoreError)    serde_json::Error                     │
//! │       │                               │                                 │
//! │       ▼                               ▼                                 │
//! │  SessionError::Store          SessionError::Serialization              │
//! │       │                               │                                 │
//! │       └──────────────┬────────────────┘                                 │
//! │                      ▼                                                  │
//! │       ApiError (500, detail logged, generic message)                   │
//! │                                                                         │
//! │  SessionError::Expired ──► web layer mints a new session (routine)     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

use crate::SessionId;

/// Errors from the session store.
#[derive(Debug, Error)]
pub enum SessionError {
    /// No live entry for the id: it never existed or its TTL elapsed.
    ///
    /// This is a routine condition, not a fault.
    #[error("session {0} expired and data purged from cache")]
    Expired(SessionId),

    /// A session could not be encoded, or stored bytes could not be decoded.
    #[error("session data could not be (de)serialized: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The backing store rejected or failed the operation.
    #[error("session store failure: {0}")]
    Store(#[from] StoreError),
}

impl SessionError {
    /// True for the routine "start over with a new session" case.
    pub fn is_expired(&self) -> bool {
        matches!(self, SessionError::Expired(_))
    }
}

/// Failures reported by a [`crate::SessionBackend`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// Encoded value is larger than the backend accepts.
    #[error("entry of {size} bytes exceeds the {max} byte limit")]
    EntryTooLarge { size: usize, max: usize },

    /// The requested lifetime puts the expiry past what the clock can represent.
    #[error("ttl of {0:?} is out of range")]
    TtlOutOfRange(std::time::Duration),

    /// The backend cannot be reached.
    #[error("backend unavailable: {0}")]
    Unavailable(String),
}

/// Result type for session store operations.
pub type SessionResult<T> = Result<T, SessionError>;

/// Result type for backend operations.
pub type StoreResult<T> = Result<T, StoreError>;
