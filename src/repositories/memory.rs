//! In-memory repositories backed by `DashMap`.
//!
//! Keys mirror the unique indexes of the PostgreSQL schema, and duplicate
//! inserts are reported exactly like a unique violation from the database.

use std::sync::atomic::{AtomicI32, Ordering};

use async_trait::async_trait;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

use crate::error::{AppError, AppResult};
use crate::models::{
    NewProduct, NewRecommendation, NewReview, Product, Recommendation, Review, ReviewChanges,
};
use crate::repositories::{ProductRepository, RecommendationRepository, ReviewRepository};

fn duplicate(entity: &str, field: &str, value: String) -> AppError {
    AppError::Duplicate {
        entity: entity.to_string(),
        field: field.to_string(),
        value,
    }
}

#[derive(Default)]
pub struct InMemoryProductRepository {
    rows: DashMap<i32, Product>,
    next_id: AtomicI32,
}

impl InMemoryProductRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProductRepository for InMemoryProductRepository {
    async fn create(&self, product: NewProduct) -> AppResult<Product> {
        match self.rows.entry(product.product_id) {
            Entry::Occupied(_) => Err(duplicate(
                "products",
                "product_id",
                product.product_id.to_string(),
            )),
            Entry::Vacant(slot) => {
                let row = Product {
                    id: self.next_id.fetch_add(1, Ordering::Relaxed) + 1,
                    version: 0,
                    product_id: product.product_id,
                    name: product.name,
                    weight: product.weight,
                };
                slot.insert(row.clone());
                Ok(row)
            }
        }
    }

    async fn find_by_product_id(&self, product_id: i32) -> AppResult<Option<Product>> {
        Ok(self.rows.get(&product_id).map(|row| row.value().clone()))
    }

    async fn delete_by_product_id(&self, product_id: i32) -> AppResult<usize> {
        Ok(usize::from(self.rows.remove(&product_id).is_some()))
    }

    async fn ping(&self) -> AppResult<()> {
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryRecommendationRepository {
    rows: DashMap<(i32, i32), Recommendation>,
    next_id: AtomicI32,
}

impl InMemoryRecommendationRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RecommendationRepository for InMemoryRecommendationRepository {
    async fn create(&self, recommendation: NewRecommendation) -> AppResult<Recommendation> {
        let key = (recommendation.product_id, recommendation.recommendation_id);
        match self.rows.entry(key) {
            Entry::Occupied(_) => Err(duplicate(
                "recommendations",
                "product_id, recommendation_id",
                format!("{}, {}", key.0, key.1),
            )),
            Entry::Vacant(slot) => {
                let row = Recommendation {
                    id: self.next_id.fetch_add(1, Ordering::Relaxed) + 1,
                    version: 0,
                    product_id: recommendation.product_id,
                    recommendation_id: recommendation.recommendation_id,
                    author: recommendation.author,
                    rate: recommendation.rate,
                    content: recommendation.content,
                };
                slot.insert(row.clone());
                Ok(row)
            }
        }
    }

    async fn find_by_product_id(&self, product_id: i32) -> AppResult<Vec<Recommendation>> {
        let mut found: Vec<Recommendation> = self
            .rows
            .iter()
            .filter(|row| row.key().0 == product_id)
            .map(|row| row.value().clone())
            .collect();
        found.sort_by_key(|r| r.recommendation_id);
        Ok(found)
    }

    async fn delete_by_product_id(&self, product_id: i32) -> AppResult<usize> {
        let mut removed = 0;
        self.rows.retain(|key, _| {
            let keep = key.0 != product_id;
            removed += usize::from(!keep);
            keep
        });
        Ok(removed)
    }

    async fn ping(&self) -> AppResult<()> {
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryReviewRepository {
    rows: DashMap<(i32, i32), Review>,
    next_id: AtomicI32,
}

impl InMemoryReviewRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ReviewRepository for InMemoryReviewRepository {
    async fn create(&self, review: NewReview) -> AppResult<Review> {
        let key = (review.product_id, review.review_id);
        match self.rows.entry(key) {
            Entry::Occupied(_) => Err(duplicate(
                "reviews",
                "product_id, review_id",
                format!("{}, {}", key.0, key.1),
            )),
            Entry::Vacant(slot) => {
                let row = Review {
                    id: self.next_id.fetch_add(1, Ordering::Relaxed) + 1,
                    version: 0,
                    product_id: review.product_id,
                    review_id: review.review_id,
                    author: review.author,
                    subject: review.subject,
                    content: review.content,
                };
                slot.insert(row.clone());
                Ok(row)
            }
        }
    }

    async fn find_by_product_id(&self, product_id: i32) -> AppResult<Vec<Review>> {
        let mut found: Vec<Review> = self
            .rows
            .iter()
            .filter(|row| row.key().0 == product_id)
            .map(|row| row.value().clone())
            .collect();
        found.sort_by_key(|r| r.review_id);
        Ok(found)
    }

    async fn update(
        &self,
        product_id: i32,
        review_id: i32,
        expected_version: i32,
        changes: ReviewChanges,
    ) -> AppResult<Review> {
        let Some(mut row) = self.rows.get_mut(&(product_id, review_id)) else {
            return Err(AppError::not_found(format!(
                "No review found for productId: {}, reviewId: {}",
                product_id, review_id
            )));
        };

        if row.version != expected_version {
            return Err(AppError::Conflict {
                message: format!(
                    "Review {} of product {} was modified concurrently (expected version {}, found {})",
                    review_id, product_id, expected_version, row.version
                ),
            });
        }

        row.author = changes.author;
        row.subject = changes.subject;
        row.content = changes.content;
        row.version += 1;
        Ok(row.clone())
    }

    async fn delete_by_product_id(&self, product_id: i32) -> AppResult<usize> {
        let mut removed = 0;
        self.rows.retain(|key, _| {
            let keep = key.0 != product_id;
            removed += usize::from(!keep);
            keep
        });
        Ok(removed)
    }

    async fn ping(&self) -> AppResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_review(product_id: i32, review_id: i32) -> NewReview {
        NewReview {
            product_id,
            review_id,
            author: "a".to_string(),
            subject: "s".to_string(),
            content: "c".to_string(),
        }
    }

    fn changes(author: &str) -> ReviewChanges {
        ReviewChanges {
            author: author.to_string(),
            subject: "s2".to_string(),
            content: "c2".to_string(),
        }
    }

    #[tokio::test]
    async fn test_duplicate_product_is_rejected_and_first_kept() {
        let repo = InMemoryProductRepository::new();
        let first = NewProduct {
            product_id: 1,
            name: "first".to_string(),
            weight: 1,
        };
        repo.create(first).await.unwrap();

        let second = NewProduct {
            product_id: 1,
            name: "second".to_string(),
            weight: 2,
        };
        let err = repo.create(second).await.unwrap_err();
        assert!(matches!(err, AppError::Duplicate { ref entity, .. } if entity == "products"));

        let stored = repo.find_by_product_id(1).await.unwrap().unwrap();
        assert_eq!(stored.name, "first");
    }

    #[tokio::test]
    async fn test_recommendations_sorted_and_scoped_to_product() {
        let repo = InMemoryRecommendationRepository::new();
        for (product_id, recommendation_id) in [(1, 3), (1, 1), (2, 1), (1, 2)] {
            repo.create(NewRecommendation {
                product_id,
                recommendation_id,
                author: "a".to_string(),
                rate: 1,
                content: "c".to_string(),
            })
            .await
            .unwrap();
        }

        let ids: Vec<i32> = repo
            .find_by_product_id(1)
            .await
            .unwrap()
            .iter()
            .map(|r| r.recommendation_id)
            .collect();
        assert_eq!(ids, vec![1, 2, 3]);

        assert_eq!(repo.delete_by_product_id(1).await.unwrap(), 3);
        assert!(repo.find_by_product_id(1).await.unwrap().is_empty());
        assert_eq!(repo.find_by_product_id(2).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_review_update_bumps_version() {
        let repo = InMemoryReviewRepository::new();
        let created = repo.create(new_review(1, 1)).await.unwrap();
        assert_eq!(created.version, 0);

        let updated = repo.update(1, 1, 0, changes("b")).await.unwrap();
        assert_eq!(updated.version, 1);
        assert_eq!(updated.author, "b");
    }

    #[tokio::test]
    async fn test_review_update_with_stale_version_conflicts() {
        let repo = InMemoryReviewRepository::new();
        repo.create(new_review(1, 1)).await.unwrap();
        repo.update(1, 1, 0, changes("b")).await.unwrap();

        let err = repo.update(1, 1, 0, changes("c")).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict { .. }));

        let stored = repo.find_by_product_id(1).await.unwrap();
        assert_eq!(stored[0].author, "b");
    }

    #[tokio::test]
    async fn test_review_update_missing_row() {
        let repo = InMemoryReviewRepository::new();
        let err = repo.update(9, 9, 0, changes("x")).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound { .. }));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_bulk_delete_counts_only_removed_rows() {
        let repo = std::sync::Arc::new(InMemoryReviewRepository::new());
        for review_id in 1..=50 {
            repo.create(new_review(1, review_id)).await.unwrap();
        }

        let writer = {
            let repo = repo.clone();
            tokio::spawn(async move {
                for review_id in 1..=200 {
                    repo.create(new_review(2, review_id)).await.unwrap();
                }
            })
        };
        let removed = repo.delete_by_product_id(1).await.unwrap();
        writer.await.unwrap();

        assert_eq!(removed, 50);
        assert!(repo.find_by_product_id(1).await.unwrap().is_empty());
        assert_eq!(repo.find_by_product_id(2).await.unwrap().len(), 200);
    }

    #[tokio::test]
    async fn test_delete_unknown_product_reports_zero_rows() {
        let repo = InMemoryProductRepository::new();
        assert_eq!(repo.delete_by_product_id(42).await.unwrap(), 0);
    }
}
