//! Repository layer for data access operations.
//!
//! Each core entity has one async trait with a PostgreSQL implementation
//! (diesel_async over the bb8 pool) and an in-memory implementation.

mod memory;
mod product_repo;
mod recommendation_repo;
mod review_repo;

pub use memory::{InMemoryProductRepository, InMemoryRecommendationRepository, InMemoryReviewRepository};
pub use product_repo::PgProductRepository;
pub use recommendation_repo::PgRecommendationRepository;
pub use review_repo::PgReviewRepository;

use std::sync::Arc;

use async_trait::async_trait;

use crate::db::AsyncDbPool;
use crate::error::AppResult;
use crate::models::{
    NewProduct, NewRecommendation, NewReview, Product, Recommendation, Review, ReviewChanges,
};

#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Inserts a product; an existing `product_id` yields `AppError::Duplicate`.
    async fn create(&self, product: NewProduct) -> AppResult<Product>;

    async fn find_by_product_id(&self, product_id: i32) -> AppResult<Option<Product>>;

    /// Returns the number of deleted rows (0 or 1).
    async fn delete_by_product_id(&self, product_id: i32) -> AppResult<usize>;

    /// Cheap round trip to the store, used by the health endpoint.
    async fn ping(&self) -> AppResult<()>;
}

#[async_trait]
pub trait RecommendationRepository: Send + Sync {
    /// Inserts a recommendation; an existing `(product_id, recommendation_id)`
    /// yields `AppError::Duplicate`.
    async fn create(&self, recommendation: NewRecommendation) -> AppResult<Recommendation>;

    /// All recommendations of a product ordered by `recommendation_id`.
    async fn find_by_product_id(&self, product_id: i32) -> AppResult<Vec<Recommendation>>;

    async fn delete_by_product_id(&self, product_id: i32) -> AppResult<usize>;

    async fn ping(&self) -> AppResult<()>;
}

#[async_trait]
pub trait ReviewRepository: Send + Sync {
    /// Inserts a review; an existing `(product_id, review_id)` yields
    /// `AppError::Duplicate`.
    async fn create(&self, review: NewReview) -> AppResult<Review>;

    /// All reviews of a product ordered by `review_id`.
    async fn find_by_product_id(&self, product_id: i32) -> AppResult<Vec<Review>>;

    /// Optimistic-lock update.
    ///
    /// Succeeds only if the stored row still has `expected_version`, and bumps
    /// the version by one. A missing row is `NotFound`, a stale version is
    /// `Conflict`.
    async fn update(
        &self,
        product_id: i32,
        review_id: i32,
        expected_version: i32,
        changes: ReviewChanges,
    ) -> AppResult<Review>;

    async fn delete_by_product_id(&self, product_id: i32) -> AppResult<usize>;

    async fn ping(&self) -> AppResult<()>;
}

/// The three repositories behind the core services.
///
/// Cloning only bumps reference counts.
#[derive(Clone)]
pub struct Repositories {
    pub products: Arc<dyn ProductRepository>,
    pub recommendations: Arc<dyn RecommendationRepository>,
    pub reviews: Arc<dyn ReviewRepository>,
}

impl Repositories {
    /// PostgreSQL repositories sharing one connection pool.
    pub fn postgres(pool: AsyncDbPool) -> Self {
        Self {
            products: Arc::new(PgProductRepository::new(pool.clone())),
            recommendations: Arc::new(PgRecommendationRepository::new(pool.clone())),
            reviews: Arc::new(PgReviewRepository::new(pool)),
        }
    }

    /// Process-local repositories with no persistence.
    pub fn in_memory() -> Self {
        Self {
            products: Arc::new(InMemoryProductRepository::new()),
            recommendations: Arc::new(InMemoryRecommendationRepository::new()),
            reviews: Arc::new(InMemoryReviewRepository::new()),
        }
    }
}
