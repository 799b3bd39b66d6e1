//! Migrate command handler
//!
//! Applies, previews or reverts the embedded schema migrations.

use crate::config::settings::Settings;
use crate::config::DatabaseBackend;
use crate::db::{pending_migrations, revert_migrations, run_migrations};
use crate::error::{AppError, AppResult};

pub struct MigrateCommandHandler {
    config: Settings,
}

impl MigrateCommandHandler {
    pub fn new(config: Settings) -> Self {
        Self { config }
    }

    /// Execute the migrate command with dry-run and rollback support
    ///
    /// # Errors
    /// - The memory backend is configured
    /// - Database connection or migration failures
    pub async fn execute(&self, dry_run: bool, rollback: Option<u32>) -> AppResult<()> {
        self.ensure_postgres()?;
        self.config.database.validate()?;

        if dry_run {
            return self.show_pending_migrations().await;
        }

        match rollback {
            Some(steps) => self.rollback_migrations(steps).await,
            None => self.run_migrations().await,
        }
    }

    fn ensure_postgres(&self) -> AppResult<()> {
        if self.config.database.backend == DatabaseBackend::Memory {
            return Err(AppError::invalid_input(
                "Migrations require the postgres database backend",
            ));
        }
        Ok(())
    }

    async fn show_pending_migrations(&self) -> AppResult<()> {
        println!("Checking for pending migrations...");

        let pending = pending_migrations(&self.config.database.url).await?;
        if pending.is_empty() {
            println!("✓ No pending migrations found - database is up to date");
        } else {
            println!("Found {} pending migration(s):", pending.len());
            for name in &pending {
                println!("  - {}", name);
            }
            println!("\nRun without --dry-run to apply these migrations");
        }

        Ok(())
    }

    async fn run_migrations(&self) -> AppResult<()> {
        println!("Running database migrations...");

        let applied = run_migrations(&self.config.database.url).await?;
        if applied.is_empty() {
            println!("✓ No migrations to apply - database is already up to date");
        } else {
            println!("✓ Applied {} migration(s):", applied.len());
            for version in &applied {
                println!("  - {}", version);
            }
            tracing::info!(count = applied.len(), "Database migrations applied");
        }

        Ok(())
    }

    async fn rollback_migrations(&self, steps: u32) -> AppResult<()> {
        println!("Rolling back {} migration(s)...", steps);

        let reverted = revert_migrations(&self.config.database.url, steps).await?;
        println!("✓ Reverted {} migration(s):", reverted.len());
        for version in &reverted {
            println!("  - {}", version);
        }
        tracing::warn!(count = reverted.len(), "Database migrations reverted");

        Ok(())
    }
}
