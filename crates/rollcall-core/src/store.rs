//! Store contract for sessions and attendance records.
//!
//! All operations are async with bounded latency — implementations
//! surface timeouts as [`RollcallError::StoreUnavailable`] rather than
//! hanging a verification in flight.
//!
//! [`RollcallError::StoreUnavailable`]: crate::error::RollcallError

use uuid::Uuid;

use crate::error::RollcallResult;
use crate::models::attendance::AttendanceRecord;
use crate::models::session::Session;

pub trait SessionStore: Send + Sync {
    /// Insert a new session record.
    fn put_session(&self, session: Session) -> impl Future<Output = RollcallResult<()>> + Send;

    /// Fetch a whole session by id, or `SessionNotFound`.
    ///
    /// Reads are whole-record so the verifier always observes a
    /// consistent `(state, current_code, code_expires_at)` snapshot —
    /// no field tearing against a concurrent rotation.
    fn get_session(&self, id: Uuid) -> impl Future<Output = RollcallResult<Session>> + Send;

    /// Replace an existing session record. Only the lifecycle calls
    /// this.
    fn update_session(&self, session: Session) -> impl Future<Output = RollcallResult<()>> + Send;

    /// Insert iff no record exists for `(session_id, student_id)`;
    /// returns whether the insert happened.
    ///
    /// This single conditional insert is the concurrency anchor for
    /// duplicate-claim prevention and must be atomic regardless of the
    /// backing storage.
    fn try_insert_attendance(
        &self,
        record: AttendanceRecord,
    ) -> impl Future<Output = RollcallResult<bool>> + Send;

    /// All accepted records for a session, ordered by acceptance time
    /// with the `(session_id, student_id)` key as a deterministic
    /// tiebreaker for records accepted at the same instant.
    fn list_attendance(
        &self,
        session_id: Uuid,
    ) -> impl Future<Output = RollcallResult<Vec<AttendanceRecord>>> + Send;
}
