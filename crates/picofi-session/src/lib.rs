//! # picofi-session: Session Storage for PicoFI
//!
//! Keeps each visitor's income, expenses and savings rows for a fixed
//! retention window.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        PicoFI Data Flow                                 │
//! │                                                                         │
//! │  Request with cookie session-id=<uuid>                                 │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  picofi-session (THIS CRATE)                    │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌─────────────────┐    ┌─────────────┐  │   │
//! │  │   │ SessionStore  │    │ SessionBackend  │    │ Sweeper     │  │   │
//! │  │   │  (store.rs)   │───►│  (backend.rs)   │◄───│ (tokio task)│  │   │
//! │  │   │               │    │                 │    │             │  │   │
//! │  │   │ ids, JSON,    │    │ MemoryBackend   │    │ every N sec │  │   │
//! │  │   │ expiry rules  │    │ DashMap + TTL   │    │             │  │   │
//! │  │   └───────────────┘    └─────────────────┘    └─────────────┘  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Session (a copy; callers save it back explicitly)                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use picofi_core::Currency;
//! use picofi_session::{SessionConfig, SessionStore};
//!
//! let store = SessionStore::in_memory(SessionConfig::new(Currency::Eur));
//! let id = store.new_session().unwrap();
//!
//! let mut session = store.load(&id).unwrap();
//! session.savings.clear();
//! store.save(&id, &session).unwrap();
//!
//! assert!(store.load(&id).unwrap().savings.is_empty());
//! ```

pub mod backend;
pub mod error;
pub mod store;

pub use backend::{MemoryBackend, SessionBackend};
pub use error::{SessionError, SessionResult, StoreError, StoreResult};
pub use store::{SessionConfig, SessionId, SessionStore, DEFAULT_SESSION_TTL};
