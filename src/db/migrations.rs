//! Embedded schema migrations.
//!
//! Diesel's migration harness is synchronous, so every operation opens a
//! dedicated `PgConnection` on a blocking thread.

use diesel::Connection;
use diesel::pg::PgConnection;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};

use crate::error::{AppError, AppResult};

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Names of migrations not yet applied.
pub async fn pending_migrations(database_url: &str) -> AppResult<Vec<String>> {
    with_connection(database_url, |conn| {
        let pending = conn
            .pending_migrations(MIGRATIONS)
            .map_err(|e| migration_error("check pending migrations", e))?;
        Ok(pending.iter().map(|m| m.name().to_string()).collect())
    })
    .await
}

/// Apply every pending migration and return the applied versions.
pub async fn run_migrations(database_url: &str) -> AppResult<Vec<String>> {
    with_connection(database_url, |conn| {
        let applied = conn
            .run_pending_migrations(MIGRATIONS)
            .map_err(|e| migration_error("run pending migrations", e))?;
        Ok(applied.iter().map(|v| v.to_string()).collect())
    })
    .await
}

/// Revert the last `steps` applied migrations and return the reverted versions.
pub async fn revert_migrations(database_url: &str, steps: u32) -> AppResult<Vec<String>> {
    if steps == 0 {
        return Err(AppError::invalid_input(
            "Number of rollback steps must be greater than 0",
        ));
    }

    with_connection(database_url, move |conn| {
        let applied = conn
            .applied_migrations()
            .map_err(|e| migration_error("list applied migrations", e))?;

        if applied.len() < steps as usize {
            return Err(AppError::invalid_input(format!(
                "Cannot rollback {} migrations - only {} applied migrations available",
                steps,
                applied.len()
            )));
        }

        let mut reverted = Vec::with_capacity(steps as usize);
        for _ in 0..steps {
            let version = conn
                .revert_last_migration(MIGRATIONS)
                .map_err(|e| migration_error("revert migration", e))?;
            reverted.push(version.to_string());
        }
        Ok(reverted)
    })
    .await
}

async fn with_connection<T, F>(database_url: &str, operation: F) -> AppResult<T>
where
    T: Send + 'static,
    F: FnOnce(&mut PgConnection) -> AppResult<T> + Send + 'static,
{
    let database_url = database_url.to_string();
    tokio::task::spawn_blocking(move || {
        let mut conn = PgConnection::establish(&database_url).map_err(|e| AppError::Database {
            operation: "establish connection for migrations".to_string(),
            source: anyhow::Error::new(e),
        })?;
        operation(&mut conn)
    })
    .await
    .map_err(|e| AppError::Internal {
        source: anyhow::Error::new(e),
    })?
}

fn migration_error(
    operation: &str,
    error: Box<dyn std::error::Error + Send + Sync>,
) -> AppError {
    AppError::Database {
        operation: operation.to_string(),
        source: anyhow::anyhow!("Migration error: {}", error),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use diesel::migration::MigrationSource;
    use diesel::pg::Pg;

    #[test]
    fn test_embedded_migrations_cover_all_tables() {
        let migrations = MigrationSource::<Pg>::migrations(&MIGRATIONS).unwrap();
        let names: Vec<String> = migrations.iter().map(|m| m.name().to_string()).collect();

        assert_eq!(names.len(), 3);
        assert!(names[0].ends_with("create_products"));
        assert!(names[1].ends_with("create_recommendations"));
        assert!(names[2].ends_with("create_reviews"));
    }

    #[tokio::test]
    async fn test_zero_rollback_steps_rejected_before_connecting() {
        let result = revert_migrations("postgres://unused/db", 0).await;
        match result {
            Err(AppError::InvalidInput { message }) => {
                assert!(message.contains("must be greater than 0"))
            }
            other => panic!("Expected InvalidInput, got {:?}", other),
        }
    }
}
