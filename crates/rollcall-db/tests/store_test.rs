//! Integration tests for the SurrealDB session store using the
//! in-memory engine.

use std::time::Duration;

use chrono::{TimeZone, Utc};
use rollcall_core::error::RollcallError;
use rollcall_core::models::attendance::AttendanceRecord;
use rollcall_core::models::session::{Session, SessionState};
use rollcall_core::store::SessionStore;
use rollcall_db::SurrealSessionStore;
use surrealdb::Surreal;
use surrealdb::engine::local::Mem;
use uuid::Uuid;

const QUERY_TIMEOUT: Duration = Duration::from_secs(5);

/// Helper: spin up in-memory DB, run migrations, wrap in the store.
async fn setup() -> SurrealSessionStore<surrealdb::engine::local::Db> {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    rollcall_db::run_migrations(&db).await.unwrap();
    SurrealSessionStore::new(db, QUERY_TIMEOUT)
}

fn sample_session() -> Session {
    let t0 = Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap();
    Session {
        id: Uuid::new_v4(),
        owner_id: "teacher-7".into(),
        beacon_id: "k3x9p2".into(),
        valid_from: t0,
        valid_until: t0 + chrono::Duration::minutes(10),
        state: SessionState::Active,
        current_code: "042137".into(),
        code_issued_at: t0,
        code_expires_at: t0 + chrono::Duration::seconds(30),
    }
}

fn record(session_id: Uuid, student_id: &str, device_id: &str) -> AttendanceRecord {
    AttendanceRecord {
        session_id,
        student_id: student_id.into(),
        device_id: device_id.into(),
        accepted_at: Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 10).unwrap(),
    }
}

// -----------------------------------------------------------------------
// Session round-trips
// -----------------------------------------------------------------------

#[tokio::test]
async fn put_and_get_session() {
    let store = setup().await;
    let session = sample_session();

    store.put_session(session.clone()).await.unwrap();
    let fetched = store.get_session(session.id).await.unwrap();

    assert_eq!(fetched.id, session.id);
    assert_eq!(fetched.owner_id, session.owner_id);
    assert_eq!(fetched.beacon_id, session.beacon_id);
    assert_eq!(fetched.state, SessionState::Active);
    assert_eq!(fetched.current_code, session.current_code);
    assert_eq!(fetched.valid_from, session.valid_from);
    assert_eq!(fetched.valid_until, session.valid_until);
    assert_eq!(fetched.code_issued_at, session.code_issued_at);
    assert_eq!(fetched.code_expires_at, session.code_expires_at);
}

#[tokio::test]
async fn get_missing_session_is_not_found() {
    let store = setup().await;
    let result = store.get_session(Uuid::new_v4()).await;
    assert!(matches!(result, Err(RollcallError::SessionNotFound { .. })));
}

#[tokio::test]
async fn update_session_persists_new_code_and_state() {
    let store = setup().await;
    let mut session = sample_session();
    store.put_session(session.clone()).await.unwrap();

    session.current_code = "771204".into();
    session.state = SessionState::Closed;
    store.update_session(session.clone()).await.unwrap();

    let fetched = store.get_session(session.id).await.unwrap();
    assert_eq!(fetched.current_code, "771204");
    assert_eq!(fetched.state, SessionState::Closed);
}

#[tokio::test]
async fn update_missing_session_is_not_found() {
    let store = setup().await;
    let result = store.update_session(sample_session()).await;
    assert!(matches!(result, Err(RollcallError::SessionNotFound { .. })));
}

// -----------------------------------------------------------------------
// Attendance conditional insert
// -----------------------------------------------------------------------

#[tokio::test]
async fn first_attendance_insert_wins() {
    let store = setup().await;
    let session_id = Uuid::new_v4();

    let first = store
        .try_insert_attendance(record(session_id, "s1", "dev-a"))
        .await
        .unwrap();
    let second = store
        .try_insert_attendance(record(session_id, "s1", "dev-b"))
        .await
        .unwrap();

    assert!(first);
    assert!(!second);

    let records = store.list_attendance(session_id).await.unwrap();
    assert_eq!(records.len(), 1);
    // First-accepted-wins: the original device id survives.
    assert_eq!(records[0].device_id, "dev-a");
}

#[tokio::test]
async fn duplicate_insert_reports_false_not_error() {
    let store = setup().await;
    let session_id = Uuid::new_v4();

    assert!(
        store
            .try_insert_attendance(record(session_id, "s1", "dev-a"))
            .await
            .unwrap()
    );

    // Losing inserts stay a value, never a storage error, no matter
    // how often they are retried.
    for _ in 0..3 {
        let result = store
            .try_insert_attendance(record(session_id, "s1", "dev-b"))
            .await;
        assert!(matches!(result, Ok(false)));
    }

    assert_eq!(store.list_attendance(session_id).await.unwrap().len(), 1);
}

#[tokio::test]
async fn same_student_across_sessions_is_independent() {
    let store = setup().await;
    let a = Uuid::new_v4();
    let b = Uuid::new_v4();

    assert!(
        store
            .try_insert_attendance(record(a, "s1", "dev"))
            .await
            .unwrap()
    );
    assert!(
        store
            .try_insert_attendance(record(b, "s1", "dev"))
            .await
            .unwrap()
    );
}

#[tokio::test]
async fn list_attendance_preserves_insertion_order() {
    let store = setup().await;
    let session_id = Uuid::new_v4();
    let t0 = Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap();

    for (i, student) in ["s1", "s2", "s3"].iter().enumerate() {
        let rec = AttendanceRecord {
            session_id,
            student_id: (*student).into(),
            device_id: format!("dev-{i}"),
            accepted_at: t0 + chrono::Duration::seconds(i as i64),
        };
        assert!(store.try_insert_attendance(rec).await.unwrap());
    }

    let records = store.list_attendance(session_id).await.unwrap();
    let students: Vec<&str> = records.iter().map(|r| r.student_id.as_str()).collect();
    assert_eq!(students, ["s1", "s2", "s3"]);
}

#[tokio::test]
async fn simultaneous_accepts_list_in_stable_order() {
    let store = setup().await;
    let session_id = Uuid::new_v4();
    let at = Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 10).unwrap();

    // Identical acceptance instants, inserted out of key order; the
    // record key breaks the tie deterministically.
    for student in ["s3", "s1", "s2"] {
        let rec = AttendanceRecord {
            session_id,
            student_id: student.into(),
            device_id: "dev".into(),
            accepted_at: at,
        };
        assert!(store.try_insert_attendance(rec).await.unwrap());
    }

    let records = store.list_attendance(session_id).await.unwrap();
    let students: Vec<&str> = records.iter().map(|r| r.student_id.as_str()).collect();
    assert_eq!(students, ["s1", "s2", "s3"]);
}

#[tokio::test]
async fn concurrent_inserts_have_single_winner() {
    let store = setup().await;
    let session_id = Uuid::new_v4();

    let mut handles = Vec::new();
    for i in 0..16 {
        let store = store.clone();
        handles.push(tokio::spawn(async move {
            store
                .try_insert_attendance(record(session_id, "s1", &format!("dev-{i}")))
                .await
                .unwrap()
        }));
    }

    let mut winners = 0;
    for handle in handles {
        if handle.await.unwrap() {
            winners += 1;
        }
    }

    assert_eq!(winners, 1, "exactly one concurrent insert may succeed");
    assert_eq!(store.list_attendance(session_id).await.unwrap().len(), 1);
}

// -----------------------------------------------------------------------
// Bounded latency
// -----------------------------------------------------------------------

#[tokio::test]
async fn exhausted_timeout_surfaces_store_unavailable_on_every_operation() {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    rollcall_db::run_migrations(&db).await.unwrap();

    // A zero budget elapses before any query completes; every
    // operation must return the retryable error instead of hanging.
    let store = SurrealSessionStore::new(db, Duration::ZERO);
    let session = sample_session();

    assert!(matches!(
        store.put_session(session.clone()).await,
        Err(RollcallError::StoreUnavailable(_))
    ));
    assert!(matches!(
        store.get_session(session.id).await,
        Err(RollcallError::StoreUnavailable(_))
    ));
    assert!(matches!(
        store.update_session(session.clone()).await,
        Err(RollcallError::StoreUnavailable(_))
    ));
    assert!(matches!(
        store
            .try_insert_attendance(record(session.id, "s1", "dev-1"))
            .await,
        Err(RollcallError::StoreUnavailable(_))
    ));
    assert!(matches!(
        store.list_attendance(session.id).await,
        Err(RollcallError::StoreUnavailable(_))
    ));
}

// -----------------------------------------------------------------------
// Migrations
// -----------------------------------------------------------------------

#[tokio::test]
async fn migrations_are_idempotent() {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    rollcall_db::run_migrations(&db).await.unwrap();
    rollcall_db::run_migrations(&db).await.unwrap();
}
