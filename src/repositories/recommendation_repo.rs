//! PostgreSQL recommendation repository.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::db::AsyncDbPool;
use crate::error::{AppResult, DatabaseErrorConverter};
use crate::models::{NewRecommendation, Recommendation};
use crate::repositories::RecommendationRepository;

#[derive(Clone)]
pub struct PgRecommendationRepository {
    pool: AsyncDbPool,
}

impl PgRecommendationRepository {
    pub fn new(pool: AsyncDbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RecommendationRepository for PgRecommendationRepository {
    async fn create(&self, new_recommendation: NewRecommendation) -> AppResult<Recommendation> {
        use crate::schema::recommendations::dsl::*;
        let mut conn = self.pool.get().await?;

        diesel::insert_into(recommendations)
            .values(&new_recommendation)
            .returning(Recommendation::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(|e| DatabaseErrorConverter::convert_diesel_error(e, "insert recommendation"))
    }

    async fn find_by_product_id(&self, wanted: i32) -> AppResult<Vec<Recommendation>> {
        use crate::schema::recommendations::dsl::*;
        let mut conn = self.pool.get().await?;

        recommendations
            .filter(product_id.eq(wanted))
            .order(recommendation_id.asc())
            .select(Recommendation::as_select())
            .load(&mut conn)
            .await
            .map_err(|e| DatabaseErrorConverter::convert_diesel_error(e, "load recommendations"))
    }

    async fn delete_by_product_id(&self, wanted: i32) -> AppResult<usize> {
        use crate::schema::recommendations::dsl::*;
        let mut conn = self.pool.get().await?;

        diesel::delete(recommendations.filter(product_id.eq(wanted)))
            .execute(&mut conn)
            .await
            .map_err(|e| DatabaseErrorConverter::convert_diesel_error(e, "delete recommendations"))
    }

    async fn ping(&self) -> AppResult<()> {
        let mut conn = self.pool.get().await?;
        diesel::sql_query("SELECT 1")
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(|e| {
                DatabaseErrorConverter::convert_diesel_error(e, "ping recommendations store")
            })
    }
}
