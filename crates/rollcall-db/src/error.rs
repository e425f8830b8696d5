//! Database-specific error types and conversions.

use rollcall_core::error::RollcallError;

/// Database-layer error type.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("SurrealDB error: {0}")]
    Surreal(#[from] surrealdb::Error),

    #[error("Migration failed: {0}")]
    Migration(String),

    #[error("Record not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },

    #[error("Query timed out after {0} ms")]
    Timeout(u64),
}

impl From<DbError> for RollcallError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { id, .. } => RollcallError::SessionNotFound { id },
            DbError::Timeout(ms) => {
                RollcallError::StoreUnavailable(format!("query timed out after {ms} ms"))
            }
            other => RollcallError::Database(other.to_string()),
        }
    }
}
