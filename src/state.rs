//! Application state for the Axum router.
//!
//! Each role serves exactly one service, so the state is one variant per
//! role rather than a bag of optional services.

use std::sync::Arc;

use anyhow::Context;

use crate::config::{DatabaseBackend, DatabaseConfig, ServiceRole, Settings};
use crate::db::{establish_async_connection_pool, run_migrations};
use crate::external::{HttpIntegration, build_http_client};
use crate::repositories::Repositories;
use crate::services::{
    CompositeService, ProductService, RecommendationService, ReviewService, ServiceAddress,
};

/// The service behind the running role.
///
/// Cloning is cheap; every service holds its dependencies behind `Arc`.
#[derive(Clone)]
pub enum AppState {
    Product(ProductService),
    Recommendation(RecommendationService),
    Review(ReviewService),
    Composite(CompositeService),
}

impl AppState {
    /// Builds the state for the configured role.
    ///
    /// Core roles open their store; the composite builds its HTTP clients.
    pub async fn from_settings(settings: &Settings) -> anyhow::Result<Self> {
        let role = settings.service.role;
        let address = ServiceAddress::resolve(
            settings.server.port,
            settings.service.advertised_address.as_deref(),
        );
        tracing::info!(%role, %address, "Service address resolved");

        let state = match role {
            ServiceRole::Composite => {
                let http = build_http_client(&settings.integration)?;
                let integration = HttpIntegration::new(&settings.integration, http);
                tracing::info!(
                    product = %settings.integration.product_service_url,
                    recommendation = %settings.integration.recommendation_service_url,
                    review = %settings.integration.review_service_url,
                    "Downstream services configured"
                );
                AppState::Composite(CompositeService::new(Arc::new(integration), address))
            }
            ServiceRole::Product => {
                let repos = open_repositories(&settings.database).await?;
                AppState::Product(ProductService::new(repos.products, address))
            }
            ServiceRole::Recommendation => {
                let repos = open_repositories(&settings.database).await?;
                AppState::Recommendation(RecommendationService::new(
                    repos.recommendations,
                    address,
                ))
            }
            ServiceRole::Review => {
                let repos = open_repositories(&settings.database).await?;
                AppState::Review(ReviewService::new(repos.reviews, address))
            }
        };

        Ok(state)
    }

    pub fn role(&self) -> ServiceRole {
        match self {
            AppState::Product(_) => ServiceRole::Product,
            AppState::Recommendation(_) => ServiceRole::Recommendation,
            AppState::Review(_) => ServiceRole::Review,
            AppState::Composite(_) => ServiceRole::Composite,
        }
    }
}

/// Opens the configured store, running pending migrations first when
/// `database.auto_migrate` is set.
async fn open_repositories(database: &DatabaseConfig) -> anyhow::Result<Repositories> {
    match database.backend {
        DatabaseBackend::Memory => {
            tracing::warn!("Using in-memory store, data is lost on shutdown");
            Ok(Repositories::in_memory())
        }
        DatabaseBackend::Postgres => {
            if database.auto_migrate {
                let applied = run_migrations(&database.url)
                    .await
                    .context("Failed to run pending migrations")?;
                tracing::info!(count = applied.len(), "Migrations applied");
            }

            tracing::info!("Initializing database connection pool...");
            let pool = establish_async_connection_pool(database).await?;
            tracing::info!("Database connection pool initialized");
            Ok(Repositories::postgres(pool))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_backend_builds_core_state() {
        let mut settings = Settings::default();
        settings.service.role = ServiceRole::Review;
        settings.database.backend = DatabaseBackend::Memory;

        let state = AppState::from_settings(&settings).await.unwrap();
        assert_eq!(state.role(), ServiceRole::Review);
    }

    #[tokio::test]
    async fn test_composite_state_needs_no_database() {
        let settings = Settings::default();
        let state = AppState::from_settings(&settings).await.unwrap();
        assert_eq!(state.role(), ServiceRole::Composite);
    }
}
