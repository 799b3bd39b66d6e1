//! Recommendation service.

use std::sync::Arc;

use tracing::debug;

use crate::api::dto::RecommendationDto;
use crate::error::{AppError, AppResult};
use crate::repositories::RecommendationRepository;
use crate::services::{ServiceAddress, ensure_valid_product_id};

#[derive(Clone)]
pub struct RecommendationService {
    repo: Arc<dyn RecommendationRepository>,
    address: ServiceAddress,
}

impl RecommendationService {
    pub fn new(repo: Arc<dyn RecommendationRepository>, address: ServiceAddress) -> Self {
        Self { repo, address }
    }

    /// All recommendations of a product, ordered by recommendation id.
    /// Unknown products yield an empty list.
    pub async fn get_recommendations(&self, product_id: i32) -> AppResult<Vec<RecommendationDto>> {
        ensure_valid_product_id(product_id)?;

        let found = self.repo.find_by_product_id(product_id).await?;
        debug!(product_id, count = found.len(), "Recommendations found");

        Ok(found
            .into_iter()
            .map(|r| RecommendationDto::from_model(r, self.address.as_str()))
            .collect())
    }

    pub async fn create_recommendation(
        &self,
        body: RecommendationDto,
    ) -> AppResult<RecommendationDto> {
        ensure_valid_product_id(body.product_id)?;
        let (product_id, recommendation_id) = (body.product_id, body.recommendation_id);

        let created = self
            .repo
            .create(body.into_new_model())
            .await
            .map_err(|e| match e {
                AppError::Duplicate { .. } => AppError::invalid_input(format!(
                    "Duplicate key, Product Id: {}, Recommendation Id:{}",
                    product_id, recommendation_id
                )),
                other => other,
            })?;

        debug!(product_id, recommendation_id, "Recommendation created");
        Ok(RecommendationDto::from_model(created, self.address.as_str()))
    }

    /// Deletes every recommendation of a product. Deleting nothing is not an
    /// error.
    pub async fn delete_recommendations(&self, product_id: i32) -> AppResult<()> {
        ensure_valid_product_id(product_id)?;

        let affected = self.repo.delete_by_product_id(product_id).await?;
        debug!(product_id, affected, "Recommendations deleted");
        Ok(())
    }

    pub async fn ping(&self) -> AppResult<()> {
        self.repo.ping().await
    }
}
