//! PostgreSQL review repository.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::db::AsyncDbPool;
use crate::error::{AppError, AppResult, DatabaseErrorConverter};
use crate::models::{NewReview, Review, ReviewChanges};
use crate::repositories::ReviewRepository;

#[derive(Clone)]
pub struct PgReviewRepository {
    pool: AsyncDbPool,
}

impl PgReviewRepository {
    pub fn new(pool: AsyncDbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReviewRepository for PgReviewRepository {
    async fn create(&self, new_review: NewReview) -> AppResult<Review> {
        use crate::schema::reviews::dsl::*;
        let mut conn = self.pool.get().await?;

        diesel::insert_into(reviews)
            .values(&new_review)
            .returning(Review::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(|e| DatabaseErrorConverter::convert_diesel_error(e, "insert review"))
    }

    async fn find_by_product_id(&self, wanted: i32) -> AppResult<Vec<Review>> {
        use crate::schema::reviews::dsl::*;
        let mut conn = self.pool.get().await?;

        reviews
            .filter(product_id.eq(wanted))
            .order(review_id.asc())
            .select(Review::as_select())
            .load(&mut conn)
            .await
            .map_err(|e| DatabaseErrorConverter::convert_diesel_error(e, "load reviews"))
    }

    async fn update(
        &self,
        wanted_product: i32,
        wanted_review: i32,
        expected_version: i32,
        changes: ReviewChanges,
    ) -> AppResult<Review> {
        use crate::schema::reviews::dsl::*;
        let mut conn = self.pool.get().await?;

        let updated = diesel::update(
            reviews
                .filter(product_id.eq(wanted_product))
                .filter(review_id.eq(wanted_review))
                .filter(version.eq(expected_version)),
        )
        .set((&changes, version.eq(version + 1)))
        .returning(Review::as_returning())
        .get_result(&mut conn)
        .await
        .optional()
        .map_err(|e| DatabaseErrorConverter::convert_diesel_error(e, "update review"))?;

        if let Some(review) = updated {
            return Ok(review);
        }

        // Nothing matched: tell a stale version apart from a missing row.
        let current: Option<i32> = reviews
            .filter(product_id.eq(wanted_product))
            .filter(review_id.eq(wanted_review))
            .select(version)
            .first(&mut conn)
            .await
            .optional()
            .map_err(AppError::from)?;

        Err(match current {
            Some(stored) => AppError::Conflict {
                message: format!(
                    "Review {} of product {} was modified concurrently (expected version {}, found {})",
                    wanted_review, wanted_product, expected_version, stored
                ),
            },
            None => AppError::not_found(format!(
                "No review found for productId: {}, reviewId: {}",
                wanted_product, wanted_review
            )),
        })
    }

    async fn delete_by_product_id(&self, wanted: i32) -> AppResult<usize> {
        use crate::schema::reviews::dsl::*;
        let mut conn = self.pool.get().await?;

        diesel::delete(reviews.filter(product_id.eq(wanted)))
            .execute(&mut conn)
            .await
            .map_err(|e| DatabaseErrorConverter::convert_diesel_error(e, "delete reviews"))
    }

    async fn ping(&self) -> AppResult<()> {
        let mut conn = self.pool.get().await?;
        diesel::sql_query("SELECT 1")
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(|e| DatabaseErrorConverter::convert_diesel_error(e, "ping reviews store"))
    }
}
