//! Database-specific error types and conversions.

use dietly_core::error::DietlyError;

/// Database-layer error type.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("SurrealDB error: {0}")]
    Surreal(#[from] surrealdb::Error),

    #[error("Query failed: {0}")]
    Query(String),

    #[error("Record not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },

    #[error("Duplicate record: {entity}")]
    Conflict { entity: String },
}

impl From<DbError> for DietlyError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => DietlyError::NotFound { entity, id },
            DbError::Conflict { entity } => DietlyError::AlreadyExists { entity },
            other => DietlyError::Database(other.to_string()),
        }
    }
}

/// Map a statement-level error on a write query, turning unique-index
/// violations into [`DbError::Conflict`] for the given entity.
pub(crate) fn write_error(err: surrealdb::Error, entity: &str) -> DbError {
    let msg = err.to_string();
    if msg.contains("already contains") {
        DbError::Conflict {
            entity: entity.into(),
        }
    } else {
        DbError::Query(msg)
    }
}
