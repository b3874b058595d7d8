//! The access-control schema for the `postgres` provider.

use sqlx::PgPool;
use sqlx::migrate::Migrator;
use tracing::info;

use docvault_core::error::{AppError, ErrorKind};
use docvault_core::result::AppResult;

/// Migrations embedded from the workspace `migrations/` directory.
pub static MIGRATOR: Migrator = sqlx::migrate!("../../migrations");

/// Bring the schema up to date. Returns the versions this build knows.
pub async fn apply(pool: &PgPool) -> AppResult<Vec<i64>> {
    MIGRATOR.run(pool).await.map_err(|e| {
        AppError::with_source(
            ErrorKind::Database,
            format!("Schema migration failed: {e}"),
            e,
        )
    })?;

    let versions: Vec<i64> = MIGRATOR.iter().map(|m| m.version).collect();
    info!(versions = ?versions, "Access-control schema is current");
    Ok(versions)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_schema_defines_acl_tables() {
        let sql: String = MIGRATOR.iter().map(|m| m.sql.as_ref()).collect();
        for table in ["folders", "documents", "folder_acl", "document_acl"] {
            assert!(
                sql.contains(&format!("CREATE TABLE {table}")),
                "missing table {table}"
            );
        }
    }
}
