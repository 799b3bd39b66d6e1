//! Composite service: merges the three core services into one aggregate view.

use std::sync::Arc;

use tracing::{debug, info};

use crate::api::dto::{
    HealthDto, HealthStatus, ProductAggregateDto, ProductDto, RecommendationDto,
    RecommendationSummaryDto, ReviewDto, ReviewSummaryDto, ServiceAddressesDto,
};
use crate::error::AppResult;
use crate::external::CoreIntegration;
use crate::services::ServiceAddress;

#[derive(Clone)]
pub struct CompositeService {
    integration: Arc<dyn CoreIntegration>,
    address: ServiceAddress,
}

impl CompositeService {
    pub fn new(integration: Arc<dyn CoreIntegration>, address: ServiceAddress) -> Self {
        Self {
            integration,
            address,
        }
    }

    /// Fetches product, recommendations and reviews in that order and merges
    /// them. The first failing fetch aborts the whole aggregate.
    pub async fn get_product_aggregate(&self, product_id: i32) -> AppResult<ProductAggregateDto> {
        debug!(product_id, "Building product aggregate");

        let product = self.integration.get_product(product_id).await?;
        let recommendations = self.integration.get_recommendations(product_id).await?;
        let reviews = self.integration.get_reviews(product_id).await?;

        Ok(build_aggregate(
            product,
            &recommendations,
            &reviews,
            self.address.as_str(),
        ))
    }

    /// Creates the product, then every recommendation and review of the
    /// draft. Stops at the first failure; earlier writes are not undone.
    pub async fn create_product_aggregate(&self, draft: ProductAggregateDto) -> AppResult<()> {
        let product_id = draft.product_id;
        info!(product_id, "Creating product aggregate");

        let product = ProductDto {
            product_id,
            name: draft.name,
            weight: draft.weight,
            service_address: String::new(),
        };
        self.integration.create_product(&product).await?;

        for summary in draft.recommendations {
            let recommendation = RecommendationDto {
                product_id,
                recommendation_id: summary.recommendation_id,
                author: summary.author,
                rate: summary.rate,
                content: summary.content,
                service_address: String::new(),
            };
            self.integration
                .create_recommendation(&recommendation)
                .await?;
        }

        for summary in draft.reviews {
            let review = ReviewDto {
                product_id,
                review_id: summary.review_id,
                author: summary.author,
                subject: summary.subject,
                content: summary.content,
                service_address: String::new(),
                version: 0,
            };
            self.integration.create_review(&review).await?;
        }

        Ok(())
    }

    /// Deletes the product, then its recommendations, then its reviews.
    pub async fn delete_product_aggregate(&self, product_id: i32) -> AppResult<()> {
        info!(product_id, "Deleting product aggregate");

        self.integration.delete_product(product_id).await?;
        self.integration.delete_recommendations(product_id).await?;
        self.integration.delete_reviews(product_id).await?;
        Ok(())
    }

    /// Probes the three core services one after another.
    ///
    /// The overall status is `UP` only when every probe is `UP`.
    pub async fn health(&self) -> HealthDto {
        let product = self.integration.product_health().await;
        let recommendation = self.integration.recommendation_health().await;
        let review = self.integration.review_health().await;

        let overall = if [product, recommendation, review].iter().all(HealthStatus::is_up) {
            HealthStatus::Up
        } else {
            HealthStatus::Down
        };

        HealthDto::new(overall)
            .with_component("product", product)
            .with_component("recommendation", recommendation)
            .with_component("review", review)
    }
}

/// Merges one product with its recommendations and reviews.
///
/// Review and recommendation addresses come from the first element of each
/// list, or stay empty when the list is empty.
pub fn build_aggregate(
    product: ProductDto,
    recommendations: &[RecommendationDto],
    reviews: &[ReviewDto],
    composite_address: &str,
) -> ProductAggregateDto {
    let service_addresses = ServiceAddressesDto {
        composite_address: composite_address.to_string(),
        product_address: product.service_address.clone(),
        review_address: reviews
            .first()
            .map(|r| r.service_address.clone())
            .unwrap_or_default(),
        recommendation_address: recommendations
            .first()
            .map(|r| r.service_address.clone())
            .unwrap_or_default(),
    };

    ProductAggregateDto {
        product_id: product.product_id,
        name: product.name,
        weight: product.weight,
        recommendations: recommendations
            .iter()
            .map(RecommendationSummaryDto::from)
            .collect(),
        reviews: reviews.iter().map(ReviewSummaryDto::from).collect(),
        service_addresses,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::external::StubIntegration;

    fn composite(stub: StubIntegration) -> (CompositeService, Arc<StubIntegration>) {
        let stub = Arc::new(stub);
        let service = CompositeService::new(
            stub.clone(),
            ServiceAddress::from_parts(Some("composite-host"), Some("10.0.0.2"), 7000),
        );
        (service, stub)
    }

    fn product() -> ProductDto {
        ProductDto {
            product_id: 7,
            name: "p".to_string(),
            weight: 3,
            service_address: "product-addr".to_string(),
        }
    }

    #[test]
    fn test_build_aggregate_with_empty_lists() {
        let aggregate = build_aggregate(product(), &[], &[], "composite-addr");

        assert!(aggregate.recommendations.is_empty());
        assert!(aggregate.reviews.is_empty());
        assert_eq!(aggregate.service_addresses.composite_address, "composite-addr");
        assert_eq!(aggregate.service_addresses.product_address, "product-addr");
        assert_eq!(aggregate.service_addresses.review_address, "");
        assert_eq!(aggregate.service_addresses.recommendation_address, "");
    }

    #[test]
    fn test_build_aggregate_uses_first_list_addresses() {
        let recommendation = |id: i32, address: &str| RecommendationDto {
            product_id: 7,
            recommendation_id: id,
            author: "a".to_string(),
            rate: id,
            content: "c".to_string(),
            service_address: address.to_string(),
        };
        let recommendations = vec![recommendation(1, "rec-1"), recommendation(2, "rec-2")];

        let aggregate = build_aggregate(product(), &recommendations, &[], "c");
        assert_eq!(aggregate.recommendations.len(), 2);
        assert_eq!(aggregate.recommendations[1].rate, 2);
        assert_eq!(aggregate.service_addresses.recommendation_address, "rec-1");
    }

    #[tokio::test]
    async fn test_get_aggregate_for_known_product() {
        let (service, _) = composite(StubIntegration::default());
        let aggregate = service.get_product_aggregate(1).await.unwrap();

        assert_eq!(aggregate.product_id, 1);
        assert_eq!(aggregate.recommendations.len(), 1);
        assert_eq!(aggregate.reviews.len(), 1);
        assert_eq!(aggregate.service_addresses.product_address, "mock-address");
        assert_eq!(
            aggregate.service_addresses.composite_address,
            "composite-host/10.0.0.2:7000"
        );
    }

    #[tokio::test]
    async fn test_get_aggregate_propagates_downstream_errors() {
        let (service, _) = composite(StubIntegration::default());

        let err = service.get_product_aggregate(2).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound { ref message } if message == "NOT FOUND: 2"));

        let err = service.get_product_aggregate(3).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidInput { ref message } if message == "INVALID: 3"));
    }

    #[tokio::test]
    async fn test_failed_review_fetch_aborts_aggregate() {
        let (service, _) = composite(StubIntegration {
            fail_reviews: true,
            ..Default::default()
        });

        let err = service.get_product_aggregate(1).await.unwrap_err();
        assert!(matches!(err, AppError::ServiceUnavailable { .. }));
    }

    #[tokio::test]
    async fn test_create_aggregate_creates_children_under_product_id() {
        let (service, stub) = composite(StubIntegration::default());
        let draft = ProductAggregateDto {
            product_id: 5,
            name: "p".to_string(),
            weight: 1,
            recommendations: vec![RecommendationSummaryDto {
                recommendation_id: 1,
                author: "a".to_string(),
                rate: 1,
                content: "c".to_string(),
            }],
            reviews: vec![ReviewSummaryDto {
                review_id: 2,
                author: "a".to_string(),
                subject: "s".to_string(),
                content: "c".to_string(),
            }],
            service_addresses: ServiceAddressesDto::default(),
        };

        service.create_product_aggregate(draft).await.unwrap();
        assert_eq!(
            *stub.created.lock().unwrap(),
            vec!["product 5", "recommendation 5/1", "review 5/2"]
        );
    }

    #[tokio::test]
    async fn test_delete_aggregate_order() {
        let (service, stub) = composite(StubIntegration::default());
        service.delete_product_aggregate(4).await.unwrap();

        assert_eq!(
            *stub.deleted.lock().unwrap(),
            vec!["product 4", "recommendations 4", "reviews 4"]
        );
    }

    #[tokio::test]
    async fn test_health_is_down_when_any_probe_is_down() {
        let (service, _) = composite(StubIntegration::default());
        assert!(service.health().await.is_up());

        let (service, _) = composite(StubIntegration {
            health: [HealthStatus::Up, HealthStatus::Up, HealthStatus::Down],
            ..Default::default()
        });
        let health = service.health().await;
        assert!(!health.is_up());
        assert_eq!(health.details["review"]["status"], "DOWN");
        assert_eq!(health.details["product"]["status"], "UP");
    }
}
