//! Service layer for business logic operations.
//!
//! Core services validate input, translate repository errors into the
//! domain's messages and stamp responses with the instance address. The
//! composite service merges the core services through the integration layer.

mod composite_service;
mod product_service;
mod recommendation_service;
mod review_service;
mod service_address;

pub use composite_service::{CompositeService, build_aggregate};
pub use product_service::ProductService;
pub use recommendation_service::RecommendationService;
pub use review_service::ReviewService;
pub use service_address::ServiceAddress;

use async_trait::async_trait;

use crate::error::{AppError, AppResult};

/// Rejects product ids below 1 before any repository access.
pub(crate) fn ensure_valid_product_id(product_id: i32) -> AppResult<()> {
    if product_id < 1 {
        return Err(AppError::invalid_input(format!(
            "Invalid productId: {}",
            product_id
        )));
    }
    Ok(())
}

/// Store reachability of a core service, reported by `/actuator/health`.
#[async_trait]
pub trait StorePing: Clone + Send + Sync + 'static {
    async fn ping_store(&self) -> AppResult<()>;
}

#[async_trait]
impl StorePing for ProductService {
    async fn ping_store(&self) -> AppResult<()> {
        self.ping().await
    }
}

#[async_trait]
impl StorePing for RecommendationService {
    async fn ping_store(&self) -> AppResult<()> {
        self.ping().await
    }
}

#[async_trait]
impl StorePing for ReviewService {
    async fn ping_store(&self) -> AppResult<()> {
        self.ping().await
    }
}
