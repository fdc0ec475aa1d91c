//! # Cookie Session Protocol
//!
//! ```text
//! request ──► cookie "session-id"?
//!               │ no                          │ yes
//!               ▼                             ▼
//!        new_session() ◄── Expired ──── store.load(id)
//!               │                             │ ok
//!               ▼                             ▼
//!        Set-Cookie: session-id=<new>   ActiveSession { id, session, expires_at }
//! ```
//!
//! An expired or unknown id is routine: the visitor silently starts over
//! with the default figures. Only store faults become errors.
//!
//! The expiry is read once, at resolution, and carried with the session so
//! rendering never has to go back to the store.

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use chrono::{DateTime, Utc};
use picofi_core::Session;
use picofi_session::{SessionId, SessionResult, SessionStore};
use tracing::{debug, info};

use crate::error::ApiError;

/// Name of the cookie carrying the session id.
pub const SESSION_COOKIE: &str = "session-id";

/// A resolved session plus the cookie jar to send back.
#[derive(Debug)]
pub struct ActiveSession {
    pub id: SessionId,
    pub session: Session,
    /// Wall-clock expiry, fixed when the session was created.
    pub expires_at: DateTime<Utc>,
    pub jar: CookieJar,
}

/// Resolves the visitor's session, minting a new one when needed.
pub fn resolve(store: &SessionStore, jar: CookieJar) -> Result<ActiveSession, ApiError> {
    let Some(cookie) = jar.get(SESSION_COOKIE) else {
        debug!("no session-id found in cookie");
        return start(store, jar);
    };

    let id = SessionId::from(cookie.value());
    match fetch(store, &id) {
        Ok((session, expires_at)) => Ok(ActiveSession {
            id,
            session,
            expires_at,
            jar,
        }),
        Err(e) if e.is_expired() => {
            info!(session_id = %id, "session expired, starting a new one");
            start(store, jar)
        }
        Err(e) => Err(e.into()),
    }
}

impl ActiveSession {
    /// Stores `session` as the visitor's new state.
    ///
    /// If the entry expired since it was resolved, the update lands on a
    /// fresh session and the cookie is replaced.
    pub fn save(self, store: &SessionStore, session: Session) -> Result<ActiveSession, ApiError> {
        match store.save(&self.id, &session) {
            Ok(()) => {
                debug!(session_id = %self.id, "session saved");
                Ok(ActiveSession { session, ..self })
            }
            Err(e) if e.is_expired() => {
                let fresh = start(store, self.jar)?;
                store.save(&fresh.id, &session)?;
                info!(session_id = %fresh.id, "update moved to a new session");
                Ok(ActiveSession { session, ..fresh })
            }
            Err(e) => Err(e.into()),
        }
    }
}

fn start(store: &SessionStore, jar: CookieJar) -> Result<ActiveSession, ApiError> {
    let id = store.new_session()?;
    let (session, expires_at) = fetch(store, &id)?;
    let jar = jar.add(session_cookie(&id));
    Ok(ActiveSession {
        id,
        session,
        expires_at,
        jar,
    })
}

/// Expiry first: it never moves, so a successful load proves it still holds.
fn fetch(store: &SessionStore, id: &SessionId) -> SessionResult<(Session, DateTime<Utc>)> {
    let expires_at = store.expires_at(id)?;
    let session = store.load(id)?;
    Ok((session, expires_at))
}

fn session_cookie(id: &SessionId) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, id.to_string()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
}
