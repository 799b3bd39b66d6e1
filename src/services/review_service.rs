//! Review service.

use std::sync::Arc;

use tracing::debug;

use crate::api::dto::{ReviewDto, ReviewUpdateDto};
use crate::error::{AppError, AppResult};
use crate::repositories::ReviewRepository;
use crate::services::{ServiceAddress, ensure_valid_product_id};

#[derive(Clone)]
pub struct ReviewService {
    repo: Arc<dyn ReviewRepository>,
    address: ServiceAddress,
}

impl ReviewService {
    pub fn new(repo: Arc<dyn ReviewRepository>, address: ServiceAddress) -> Self {
        Self { repo, address }
    }

    pub async fn get_reviews(&self, product_id: i32) -> AppResult<Vec<ReviewDto>> {
        ensure_valid_product_id(product_id)?;

        let found = self.repo.find_by_product_id(product_id).await?;
        debug!(product_id, count = found.len(), "Reviews found");

        Ok(found
            .into_iter()
            .map(|r| ReviewDto::from_model(r, self.address.as_str()))
            .collect())
    }

    pub async fn create_review(&self, body: ReviewDto) -> AppResult<ReviewDto> {
        ensure_valid_product_id(body.product_id)?;
        let (product_id, review_id) = (body.product_id, body.review_id);

        let created = self
            .repo
            .create(body.into_new_model())
            .await
            .map_err(|e| match e {
                AppError::Duplicate { .. } => AppError::invalid_input(format!(
                    "Duplicate key, Product Id: {}, Review Id:{}",
                    product_id, review_id
                )),
                other => other,
            })?;

        debug!(product_id, review_id, "Review created");
        Ok(ReviewDto::from_model(created, self.address.as_str()))
    }

    /// Applies an edit if the stored review still has the supplied version.
    ///
    /// # Errors
    /// `NotFound` when the review does not exist, `Conflict` when another
    /// writer got there first.
    pub async fn update_review(&self, body: ReviewUpdateDto) -> AppResult<ReviewDto> {
        ensure_valid_product_id(body.product_id)?;

        let updated = self
            .repo
            .update(body.product_id, body.review_id, body.version, body.changes())
            .await?;

        debug!(
            product_id = updated.product_id,
            review_id = updated.review_id,
            version = updated.version,
            "Review updated"
        );
        Ok(ReviewDto::from_model(updated, self.address.as_str()))
    }

    pub async fn delete_reviews(&self, product_id: i32) -> AppResult<()> {
        ensure_valid_product_id(product_id)?;

        let affected = self.repo.delete_by_product_id(product_id).await?;
        debug!(product_id, affected, "Reviews deleted");
        Ok(())
    }

    pub async fn ping(&self) -> AppResult<()> {
        self.repo.ping().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::InMemoryReviewRepository;

    fn service() -> ReviewService {
        ReviewService::new(
            Arc::new(InMemoryReviewRepository::new()),
            ServiceAddress::from_parts(Some("review-host"), Some("10.0.0.7"), 7003),
        )
    }

    fn body(product_id: i32, review_id: i32) -> ReviewDto {
        ReviewDto {
            product_id,
            review_id,
            author: "author".to_string(),
            subject: "subject".to_string(),
            content: "content".to_string(),
            service_address: String::new(),
            version: 0,
        }
    }

    fn edit(version: i32, author: &str) -> ReviewUpdateDto {
        ReviewUpdateDto {
            product_id: 1,
            review_id: 1,
            author: author.to_string(),
            subject: "subject".to_string(),
            content: "edited".to_string(),
            version,
        }
    }

    #[tokio::test]
    async fn test_create_then_get_round_trips() {
        let service = service();
        let created = service.create_review(body(1, 1)).await.unwrap();

        let found = service.get_reviews(1).await.unwrap();
        assert_eq!(found, vec![created]);
        assert_eq!(found[0].service_address, "review-host/10.0.0.7:7003");
    }

    #[tokio::test]
    async fn test_duplicate_message() {
        let service = service();
        service.create_review(body(1, 1)).await.unwrap();

        let err = service.create_review(body(1, 1)).await.unwrap_err();
        assert_eq!(err.to_string(), "Duplicate key, Product Id: 1, Review Id:1");
    }

    #[tokio::test]
    async fn test_update_with_current_then_stale_version() {
        let service = service();
        service.create_review(body(1, 1)).await.unwrap();

        let updated = service.update_review(edit(0, "second")).await.unwrap();
        assert_eq!(updated.author, "second");

        let err = service.update_review(edit(0, "third")).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict { .. }));
        assert_eq!(service.get_reviews(1).await.unwrap()[0].author, "second");
    }

    #[tokio::test]
    async fn test_delete_then_requery_is_empty() {
        let service = service();
        service.create_review(body(1, 1)).await.unwrap();
        service.create_review(body(1, 2)).await.unwrap();

        service.delete_reviews(1).await.unwrap();
        assert!(service.get_reviews(1).await.unwrap().is_empty());
    }
}
