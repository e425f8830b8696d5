//! Session lifecycle — opening, code rotation, closure.
//!
//! State machine: `Pending --open--> Active --close--> Closed`, with
//! `Closed` terminal. Mutations on the same session are serialized
//! through a per-session async lock; the verifier only ever reads.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::Duration;
use tokio::sync::Mutex as AsyncMutex;
use tracing::{debug, info};
use uuid::Uuid;

use rollcall_core::clock::Clock;
use rollcall_core::error::{RollcallError, RollcallResult};
use rollcall_core::models::session::{Session, SessionState};
use rollcall_core::store::SessionStore;

use crate::code;
use crate::config::SessionConfig;

/// Creates sessions, rotates/expires codes, closes sessions.
///
/// The lifecycle is the only writer of `state` and `current_code`.
pub struct SessionLifecycle<S, C> {
    store: S,
    clock: C,
    config: SessionConfig,
    /// Per-session mutual exclusion for lifecycle mutations. Guards
    /// release on every exit path, error paths included.
    locks: Mutex<HashMap<Uuid, Arc<AsyncMutex<()>>>>,
}

impl<S: SessionStore, C: Clock> SessionLifecycle<S, C> {
    pub fn new(store: S, clock: C, config: SessionConfig) -> Self {
        Self {
            store,
            clock,
            config,
            locks: Mutex::new(HashMap::new()),
        }
    }

    fn session_lock(&self, id: Uuid) -> Arc<AsyncMutex<()>> {
        let mut locks = self.locks.lock().unwrap_or_else(|e| e.into_inner());
        locks.entry(id).or_default().clone()
    }

    fn code_ttl(&self) -> Duration {
        Duration::seconds(self.config.code_ttl_secs as i64)
    }

    /// Open a new session: constructed `Pending`, first code and beacon
    /// id issued, stored as `Active`.
    pub async fn open_session(
        &self,
        owner_id: &str,
        duration: Duration,
    ) -> RollcallResult<Session> {
        if duration <= Duration::zero() {
            return Err(RollcallError::InvalidDuration);
        }

        let now = self.clock.now();
        let mut session = Session {
            id: Uuid::new_v4(),
            owner_id: owner_id.to_string(),
            beacon_id: code::generate_beacon_id(),
            valid_from: now,
            valid_until: now + duration,
            state: SessionState::Pending,
            current_code: code::generate_code(None),
            code_issued_at: now,
            code_expires_at: now + self.code_ttl(),
        };
        session.state = SessionState::Active;

        self.store.put_session(session.clone()).await?;

        info!(
            session_id = %session.id,
            owner_id = %session.owner_id,
            valid_until = %session.valid_until,
            "Session opened"
        );
        Ok(session)
    }

    /// Rotate the verification code. Valid only while the session is
    /// `Active`; the new code is always distinct from the one it
    /// replaces.
    pub async fn rotate_code(&self, session_id: Uuid) -> RollcallResult<String> {
        let lock = self.session_lock(session_id);
        let _guard = lock.lock().await;

        let mut session = self.store.get_session(session_id).await?;
        if session.state != SessionState::Active {
            return Err(RollcallError::SessionNotActive);
        }

        let now = self.clock.now();
        session.current_code = code::generate_code(Some(&session.current_code));
        session.code_issued_at = now;
        session.code_expires_at = now + self.code_ttl();

        self.store.update_session(session.clone()).await?;

        debug!(session_id = %session_id, expires_at = %session.code_expires_at, "Code rotated");
        Ok(session.current_code)
    }

    /// Close a session. Idempotent: closing an already-closed session
    /// is a no-op, not an error.
    pub async fn close_session(&self, session_id: Uuid) -> RollcallResult<()> {
        let lock = self.session_lock(session_id);
        let _guard = lock.lock().await;

        let mut session = self.store.get_session(session_id).await?;
        if session.state == SessionState::Closed {
            return Ok(());
        }

        session.state = SessionState::Closed;
        self.store.update_session(session).await?;

        // Closed is terminal; the lock entry will never be needed again.
        self.locks
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .remove(&session_id);

        info!(session_id = %session_id, "Session closed");
        Ok(())
    }
}
