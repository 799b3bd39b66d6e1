//! The composite's view of the three core services.

use async_trait::async_trait;
use reqwest::Client;
use tracing::warn;

use crate::api::dto::{HealthStatus, ProductDto, RecommendationDto, ReviewDto};
use crate::config::IntegrationConfig;
use crate::error::AppResult;
use crate::external::{ProductClient, RecommendationClient, ReviewClient, ServiceClient};

/// One method per remote operation of the core services.
///
/// Health probes never fail: any failure is reported as `Down`.
#[async_trait]
pub trait CoreIntegration: Send + Sync {
    async fn get_product(&self, product_id: i32) -> AppResult<ProductDto>;
    async fn create_product(&self, body: &ProductDto) -> AppResult<ProductDto>;
    async fn delete_product(&self, product_id: i32) -> AppResult<()>;

    async fn get_recommendations(&self, product_id: i32) -> AppResult<Vec<RecommendationDto>>;
    async fn create_recommendation(&self, body: &RecommendationDto)
    -> AppResult<RecommendationDto>;
    async fn delete_recommendations(&self, product_id: i32) -> AppResult<()>;

    async fn get_reviews(&self, product_id: i32) -> AppResult<Vec<ReviewDto>>;
    async fn create_review(&self, body: &ReviewDto) -> AppResult<ReviewDto>;
    async fn delete_reviews(&self, product_id: i32) -> AppResult<()>;

    async fn product_health(&self) -> HealthStatus;
    async fn recommendation_health(&self) -> HealthStatus;
    async fn review_health(&self) -> HealthStatus;
}

/// HTTP implementation sharing one pooled client between the three
/// downstream clients.
#[derive(Clone)]
pub struct HttpIntegration {
    products: ProductClient,
    recommendations: RecommendationClient,
    reviews: ReviewClient,
}

impl HttpIntegration {
    pub fn new(config: &IntegrationConfig, http: Client) -> Self {
        Self {
            products: ProductClient::new(&config.product_service_url, http.clone()),
            recommendations: RecommendationClient::new(
                &config.recommendation_service_url,
                http.clone(),
            ),
            reviews: ReviewClient::new(&config.review_service_url, http),
        }
    }
}

async fn probe(client: &ServiceClient) -> HealthStatus {
    match client.health().await {
        Ok(health) if health.is_up() => HealthStatus::Up,
        Ok(health) => {
            warn!(service = client.name(), status = %health.status, "Downstream service reports unhealthy");
            HealthStatus::Down
        }
        Err(e) => {
            warn!(service = client.name(), error = %e, "Health probe failed");
            HealthStatus::Down
        }
    }
}

#[async_trait]
impl CoreIntegration for HttpIntegration {
    async fn get_product(&self, product_id: i32) -> AppResult<ProductDto> {
        self.products.get_product(product_id).await
    }

    async fn create_product(&self, body: &ProductDto) -> AppResult<ProductDto> {
        self.products.create_product(body).await
    }

    async fn delete_product(&self, product_id: i32) -> AppResult<()> {
        self.products.delete_product(product_id).await
    }

    async fn get_recommendations(&self, product_id: i32) -> AppResult<Vec<RecommendationDto>> {
        self.recommendations.get_recommendations(product_id).await
    }

    async fn create_recommendation(
        &self,
        body: &RecommendationDto,
    ) -> AppResult<RecommendationDto> {
        self.recommendations.create_recommendation(body).await
    }

    async fn delete_recommendations(&self, product_id: i32) -> AppResult<()> {
        self.recommendations.delete_recommendations(product_id).await
    }

    async fn get_reviews(&self, product_id: i32) -> AppResult<Vec<ReviewDto>> {
        self.reviews.get_reviews(product_id).await
    }

    async fn create_review(&self, body: &ReviewDto) -> AppResult<ReviewDto> {
        self.reviews.create_review(body).await
    }

    async fn delete_reviews(&self, product_id: i32) -> AppResult<()> {
        self.reviews.delete_reviews(product_id).await
    }

    async fn product_health(&self) -> HealthStatus {
        probe(self.products.service()).await
    }

    async fn recommendation_health(&self) -> HealthStatus {
        probe(self.recommendations.service()).await
    }

    async fn review_health(&self) -> HealthStatus {
        probe(self.reviews.service()).await
    }
}

/// Scripted integration for tests.
///
/// Product 1 exists with one recommendation and one review, product 2 is
/// unknown and product 3 is rejected as invalid. Created records and deleted
/// product ids are recorded.
#[cfg(test)]
pub struct StubIntegration {
    pub health: [HealthStatus; 3],
    pub created: std::sync::Mutex<Vec<String>>,
    pub deleted: std::sync::Mutex<Vec<String>>,
    pub fail_reviews: bool,
}

#[cfg(test)]
impl Default for StubIntegration {
    fn default() -> Self {
        Self {
            health: [HealthStatus::Up; 3],
            created: Default::default(),
            deleted: Default::default(),
            fail_reviews: false,
        }
    }
}

#[cfg(test)]
impl StubIntegration {
    fn record(log: &std::sync::Mutex<Vec<String>>, entry: String) {
        if let Ok(mut log) = log.lock() {
            log.push(entry);
        }
    }
}

#[cfg(test)]
#[async_trait]
impl CoreIntegration for StubIntegration {
    async fn get_product(&self, product_id: i32) -> AppResult<ProductDto> {
        use crate::error::AppError;
        match product_id {
            1 => Ok(ProductDto {
                product_id: 1,
                name: "name".to_string(),
                weight: 1,
                service_address: "mock-address".to_string(),
            }),
            2 => Err(AppError::not_found(format!("NOT FOUND: {}", product_id))),
            3 => Err(AppError::invalid_input(format!("INVALID: {}", product_id))),
            _ => Err(AppError::not_found(format!("No product found for productId: {}", product_id))),
        }
    }

    async fn create_product(&self, body: &ProductDto) -> AppResult<ProductDto> {
        Self::record(&self.created, format!("product {}", body.product_id));
        Ok(body.clone())
    }

    async fn delete_product(&self, product_id: i32) -> AppResult<()> {
        Self::record(&self.deleted, format!("product {}", product_id));
        Ok(())
    }

    async fn get_recommendations(&self, product_id: i32) -> AppResult<Vec<RecommendationDto>> {
        if product_id != 1 {
            return Ok(vec![]);
        }
        Ok(vec![RecommendationDto {
            product_id,
            recommendation_id: 1,
            author: "author".to_string(),
            rate: 1,
            content: "content".to_string(),
            service_address: "mock address".to_string(),
        }])
    }

    async fn create_recommendation(
        &self,
        body: &RecommendationDto,
    ) -> AppResult<RecommendationDto> {
        Self::record(
            &self.created,
            format!("recommendation {}/{}", body.product_id, body.recommendation_id),
        );
        Ok(body.clone())
    }

    async fn delete_recommendations(&self, product_id: i32) -> AppResult<()> {
        Self::record(&self.deleted, format!("recommendations {}", product_id));
        Ok(())
    }

    async fn get_reviews(&self, product_id: i32) -> AppResult<Vec<ReviewDto>> {
        if self.fail_reviews {
            return Err(crate::error::AppError::service_unavailable(
                "review service not available: connection refused",
            ));
        }
        if product_id != 1 {
            return Ok(vec![]);
        }
        Ok(vec![ReviewDto {
            product_id,
            review_id: 1,
            author: "author".to_string(),
            subject: "subject".to_string(),
            content: "content".to_string(),
            service_address: "mock address".to_string(),
            version: 0,
        }])
    }

    async fn create_review(&self, body: &ReviewDto) -> AppResult<ReviewDto> {
        Self::record(
            &self.created,
            format!("review {}/{}", body.product_id, body.review_id),
        );
        Ok(body.clone())
    }

    async fn delete_reviews(&self, product_id: i32) -> AppResult<()> {
        Self::record(&self.deleted, format!("reviews {}", product_id));
        Ok(())
    }

    async fn product_health(&self) -> HealthStatus {
        self.health[0]
    }

    async fn recommendation_health(&self) -> HealthStatus {
        self.health[1]
    }

    async fn review_health(&self) -> HealthStatus {
        self.health[2]
    }
}
