//! Schema definitions and migration runner for SurrealDB.
//!
//! All table definitions use SCHEMAFULL mode for data integrity.
//! UUIDs and dates are stored as strings. Enums are stored as strings
//! with ASSERT constraints for validation.

use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use tracing::info;

use crate::error::DbError;

// -----------------------------------------------------------------------
// Migration tracking
// -----------------------------------------------------------------------

const MIGRATION_TABLE_DDL: &str = "\
DEFINE TABLE IF NOT EXISTS _migration SCHEMAFULL;
DEFINE FIELD IF NOT EXISTS version ON TABLE _migration TYPE int;
DEFINE FIELD IF NOT EXISTS name ON TABLE _migration TYPE string;
DEFINE FIELD IF NOT EXISTS applied_at ON TABLE _migration TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX IF NOT EXISTS idx_migration_version ON TABLE _migration \
    COLUMNS version UNIQUE;
";

#[derive(Debug, SurrealValue)]
struct MigrationRecord {
    version: u32,
    #[allow(dead_code)]
    name: String,
}

struct Migration {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

static MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    name: "initial_schema",
    sql: SCHEMA_V1,
}];

// -----------------------------------------------------------------------
// Schema v1 — initial table definitions
// -----------------------------------------------------------------------

const SCHEMA_V1: &str = "\
-- =======================================================================
-- Tenants (clinics, global scope)
-- =======================================================================
DEFINE TABLE tenant SCHEMAFULL;
DEFINE FIELD name ON TABLE tenant TYPE string;
DEFINE FIELD status ON TABLE tenant TYPE string \
    ASSERT $value IN ['ACTIVE', 'INACTIVE', 'SUSPENDED'];
DEFINE FIELD subscription ON TABLE tenant TYPE string \
    ASSERT $value IN ['FREE', 'BASIC', 'PREMIUM'];
DEFINE FIELD created_at ON TABLE tenant TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE tenant TYPE datetime \
    DEFAULT time::now();

-- =======================================================================
-- Users
-- =======================================================================
-- username and email are unique across ALL tenants: they are login
-- identifiers. tenant_id is NONE for SuperAdmin accounts only.
DEFINE TABLE user SCHEMAFULL;
DEFINE FIELD tenant_id ON TABLE user TYPE option<string>;
DEFINE FIELD name ON TABLE user TYPE string;
DEFINE FIELD email ON TABLE user TYPE string;
DEFINE FIELD username ON TABLE user TYPE string;
DEFINE FIELD password_hash ON TABLE user TYPE string;
DEFINE FIELD role ON TABLE user TYPE string \
    ASSERT $value IN ['SUPER_ADMIN', 'ADMIN', 'DIETITIAN', 'PATIENT'];
DEFINE FIELD created_at ON TABLE user TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE user TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_user_username ON TABLE user \
    COLUMNS username UNIQUE;
DEFINE INDEX idx_user_email ON TABLE user \
    COLUMNS email UNIQUE;
DEFINE INDEX idx_user_tenant ON TABLE user COLUMNS tenant_id;

-- =======================================================================
-- Dietitian profiles (1:1 with user, cascade-deleted with it)
-- =======================================================================
DEFINE TABLE dietitian_profile SCHEMAFULL;
DEFINE FIELD user_id ON TABLE dietitian_profile TYPE string;
DEFINE FIELD tenant_id ON TABLE dietitian_profile TYPE string;
DEFINE FIELD specialization ON TABLE dietitian_profile TYPE string;
DEFINE FIELD years_of_experience ON TABLE dietitian_profile TYPE int;
DEFINE FIELD bio ON TABLE dietitian_profile TYPE option<string>;
DEFINE FIELD created_at ON TABLE dietitian_profile TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE dietitian_profile TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_dietitian_user ON TABLE dietitian_profile \
    COLUMNS user_id UNIQUE;
DEFINE INDEX idx_dietitian_tenant ON TABLE dietitian_profile \
    COLUMNS tenant_id;

-- =======================================================================
-- Patient profiles (1:1 with user, cascade-deleted with it)
-- =======================================================================
DEFINE TABLE patient_profile SCHEMAFULL;
DEFINE FIELD user_id ON TABLE patient_profile TYPE string;
DEFINE FIELD tenant_id ON TABLE patient_profile TYPE string;
DEFINE FIELD date_of_birth ON TABLE patient_profile TYPE string;
DEFINE FIELD gender ON TABLE patient_profile TYPE string \
    ASSERT $value IN ['MALE', 'FEMALE', 'OTHER'];
DEFINE FIELD height_cm ON TABLE patient_profile TYPE float;
DEFINE FIELD weight_kg ON TABLE patient_profile TYPE float;
DEFINE FIELD initial_weight_kg ON TABLE patient_profile \
    TYPE option<float>;
DEFINE FIELD goal_weight_kg ON TABLE patient_profile \
    TYPE option<float>;
DEFINE FIELD activity_level ON TABLE patient_profile \
    TYPE option<string>;
DEFINE FIELD medical_conditions ON TABLE patient_profile \
    TYPE option<string>;
DEFINE FIELD dietary_preferences ON TABLE patient_profile \
    TYPE option<string>;
DEFINE FIELD created_at ON TABLE patient_profile TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE patient_profile TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_patient_user ON TABLE patient_profile \
    COLUMNS user_id UNIQUE;
DEFINE INDEX idx_patient_tenant ON TABLE patient_profile \
    COLUMNS tenant_id;
";

// -----------------------------------------------------------------------
// Public API
// -----------------------------------------------------------------------

/// Run all pending migrations against the given SurrealDB client.
///
/// Creates a `_migration` tracking table on first run, then applies
/// each migration whose version exceeds the current maximum.
/// All DEFINE statements are idempotent so re-running is safe.
pub async fn run_migrations<C: Connection>(db: &Surreal<C>) -> Result<(), DbError> {
    // Ensure migration tracking table exists (idempotent).
    db.query(MIGRATION_TABLE_DDL)
        .await?
        .check()
        .map_err(|e| DbError::Query(e.to_string()))?;

    // Determine current schema version.
    let mut result = db
        .query("SELECT * FROM _migration ORDER BY version DESC LIMIT 1")
        .await?;
    let records: Vec<MigrationRecord> = result.take(0)?;
    let current_version = records.first().map(|m| m.version).unwrap_or(0);

    for migration in MIGRATIONS {
        if migration.version > current_version {
            info!(
                version = migration.version,
                name = migration.name,
                "Applying migration"
            );
            db.query(migration.sql).await?.check().map_err(|e| {
                DbError::Query(format!(
                    "Migration v{} '{}' failed: {}",
                    migration.version, migration.name, e,
                ))
            })?;

            // Record the applied migration.
            db.query(
                "CREATE _migration SET version = $version, \
                 name = $name",
            )
            .bind(("version", migration.version))
            .bind(("name", migration.name))
            .await?
            .check()
            .map_err(|e| {
                DbError::Query(format!(
                    "Failed to record migration v{}: {}",
                    migration.version, e,
                ))
            })?;

            info!(
                version = migration.version,
                "Migration applied successfully"
            );
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_v1_is_nonempty() {
        assert!(!SCHEMA_V1.is_empty());
    }

    #[test]
    fn migrations_are_ordered() {
        for window in MIGRATIONS.windows(2) {
            assert!(
                window[0].version < window[1].version,
                "Migrations must be in ascending version order"
            );
        }
    }
}
