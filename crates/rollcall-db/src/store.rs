//! SurrealDB implementation of [`SessionStore`].
//!
//! The conditional attendance insert is a `CREATE` on a record id
//! derived from `(session_id, student_id)` — if the record already
//! exists the CREATE fails, and that failure is the `false` return,
//! not an error. Every query runs under a timeout so a slow store
//! surfaces as `StoreUnavailable` instead of stalling verification.

use std::time::Duration;

use chrono::{DateTime, Utc};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use tracing::warn;
use uuid::Uuid;

use rollcall_core::error::RollcallResult;
use rollcall_core::models::attendance::AttendanceRecord;
use rollcall_core::models::session::{Session, SessionState};
use rollcall_core::store::SessionStore;

use crate::error::DbError;

#[derive(Debug, SurrealValue)]
struct SessionRow {
    owner_id: String,
    beacon_id: String,
    valid_from: DateTime<Utc>,
    valid_until: DateTime<Utc>,
    state: String,
    current_code: String,
    code_issued_at: DateTime<Utc>,
    code_expires_at: DateTime<Utc>,
}

#[derive(Debug, SurrealValue)]
struct AttendanceRow {
    session_id: String,
    student_id: String,
    device_id: String,
    accepted_at: DateTime<Utc>,
}

fn state_to_str(state: SessionState) -> &'static str {
    match state {
        SessionState::Pending => "Pending",
        SessionState::Active => "Active",
        SessionState::Closed => "Closed",
    }
}

fn state_from_str(raw: &str) -> Result<SessionState, DbError> {
    match raw {
        "Pending" => Ok(SessionState::Pending),
        "Active" => Ok(SessionState::Active),
        "Closed" => Ok(SessionState::Closed),
        other => Err(DbError::Migration(format!("invalid session state: {other}"))),
    }
}

fn row_to_session(row: SessionRow, id: Uuid) -> Result<Session, DbError> {
    Ok(Session {
        id,
        owner_id: row.owner_id,
        beacon_id: row.beacon_id,
        valid_from: row.valid_from,
        valid_until: row.valid_until,
        state: state_from_str(&row.state)?,
        current_code: row.current_code,
        code_issued_at: row.code_issued_at,
        code_expires_at: row.code_expires_at,
    })
}

fn row_to_record(row: AttendanceRow) -> Result<AttendanceRecord, DbError> {
    let session_id = Uuid::parse_str(&row.session_id)
        .map_err(|e| DbError::Migration(format!("invalid session UUID: {e}")))?;
    Ok(AttendanceRecord {
        session_id,
        student_id: row.student_id,
        device_id: row.device_id,
        accepted_at: row.accepted_at,
    })
}

/// SurrealDB-backed session store.
#[derive(Clone)]
pub struct SurrealSessionStore<C: Connection> {
    db: Surreal<C>,
    timeout: Duration,
}

impl<C: Connection> SurrealSessionStore<C> {
    pub fn new(db: Surreal<C>, query_timeout: Duration) -> Self {
        Self {
            db,
            timeout: query_timeout,
        }
    }

    /// Run a store operation under the configured latency bound.
    async fn bounded<T, F>(&self, op: &'static str, fut: F) -> RollcallResult<T>
    where
        F: Future<Output = Result<T, DbError>>,
    {
        match tokio::time::timeout(self.timeout, fut).await {
            Ok(result) => result.map_err(Into::into),
            Err(_) => {
                let ms = self.timeout.as_millis() as u64;
                warn!(op, timeout_ms = ms, "Store query timed out");
                Err(DbError::Timeout(ms).into())
            }
        }
    }
}

impl<C: Connection> SessionStore for SurrealSessionStore<C> {
    async fn put_session(&self, session: Session) -> RollcallResult<()> {
        self.bounded("put_session", async {
            self.db
                .query(
                    "CREATE type::record('session', $id) SET \
                     owner_id = $owner_id, \
                     beacon_id = $beacon_id, \
                     valid_from = $valid_from, \
                     valid_until = $valid_until, \
                     state = $state, \
                     current_code = $current_code, \
                     code_issued_at = $code_issued_at, \
                     code_expires_at = $code_expires_at",
                )
                .bind(("id", session.id.to_string()))
                .bind(("owner_id", session.owner_id))
                .bind(("beacon_id", session.beacon_id))
                .bind(("valid_from", session.valid_from))
                .bind(("valid_until", session.valid_until))
                .bind(("state", state_to_str(session.state).to_string()))
                .bind(("current_code", session.current_code))
                .bind(("code_issued_at", session.code_issued_at))
                .bind(("code_expires_at", session.code_expires_at))
                .await?
                .check()?;
            Ok(())
        })
        .await
    }

    async fn get_session(&self, id: Uuid) -> RollcallResult<Session> {
        self.bounded("get_session", async {
            let id_str = id.to_string();
            let mut result = self
                .db
                .query("SELECT * FROM type::record('session', $id)")
                .bind(("id", id_str.clone()))
                .await?;

            let rows: Vec<SessionRow> = result.take(0)?;
            let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
                entity: "session".into(),
                id: id_str,
            })?;

            row_to_session(row, id)
        })
        .await
    }

    async fn update_session(&self, session: Session) -> RollcallResult<()> {
        self.bounded("update_session", async {
            let id_str = session.id.to_string();
            let mut result = self
                .db
                .query(
                    "UPDATE type::record('session', $id) SET \
                     owner_id = $owner_id, \
                     beacon_id = $beacon_id, \
                     valid_from = $valid_from, \
                     valid_until = $valid_until, \
                     state = $state, \
                     current_code = $current_code, \
                     code_issued_at = $code_issued_at, \
                     code_expires_at = $code_expires_at",
                )
                .bind(("id", id_str.clone()))
                .bind(("owner_id", session.owner_id))
                .bind(("beacon_id", session.beacon_id))
                .bind(("valid_from", session.valid_from))
                .bind(("valid_until", session.valid_until))
                .bind(("state", state_to_str(session.state).to_string()))
                .bind(("current_code", session.current_code))
                .bind(("code_issued_at", session.code_issued_at))
                .bind(("code_expires_at", session.code_expires_at))
                .await?;

            let rows: Vec<SessionRow> = result.take(0)?;
            if rows.is_empty() {
                return Err(DbError::NotFound {
                    entity: "session".into(),
                    id: id_str,
                });
            }
            Ok(())
        })
        .await
    }

    async fn try_insert_attendance(&self, record: AttendanceRecord) -> RollcallResult<bool> {
        self.bounded("try_insert_attendance", async {
            let key = format!("{}:{}", record.session_id, record.student_id);
            let result = self
                .db
                .query(
                    "CREATE type::record('attendance', $key) SET \
                     session_id = $session_id, \
                     student_id = $student_id, \
                     device_id = $device_id, \
                     accepted_at = $accepted_at",
                )
                .bind(("key", key.clone()))
                .bind(("session_id", record.session_id.to_string()))
                .bind(("student_id", record.student_id))
                .bind(("device_id", record.device_id))
                .bind(("accepted_at", record.accepted_at))
                .await?;

            match result.check() {
                Ok(_) => Ok(true),
                Err(e) => {
                    // The error message wording is not stable across
                    // SurrealDB versions, so classify by re-reading:
                    // if a record for this (session, student) exists
                    // now, the CREATE lost to it.
                    let mut probe = self
                        .db
                        .query("SELECT * FROM type::record('attendance', $key)")
                        .bind(("key", key))
                        .await?;
                    let rows: Vec<AttendanceRow> = probe.take(0)?;
                    if rows.is_empty() {
                        Err(DbError::Surreal(e))
                    } else {
                        Ok(false)
                    }
                }
            }
        })
        .await
    }

    async fn list_attendance(&self, session_id: Uuid) -> RollcallResult<Vec<AttendanceRecord>> {
        self.bounded("list_attendance", async {
            let mut result = self
                .db
                .query(
                    "SELECT * FROM attendance \
                     WHERE session_id = $session_id \
                     ORDER BY accepted_at ASC, id ASC",
                )
                .bind(("session_id", session_id.to_string()))
                .await?;

            let rows: Vec<AttendanceRow> = result.take(0)?;
            rows.into_iter().map(row_to_record).collect()
        })
        .await
    }
}
