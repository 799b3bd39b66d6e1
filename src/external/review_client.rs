use reqwest::Client;

use crate::api::dto::ReviewDto;
use crate::error::AppResult;
use crate::external::ServiceClient;

/// Client of the review service.
#[derive(Clone)]
pub struct ReviewClient {
    inner: ServiceClient,
}

impl ReviewClient {
    pub fn new(base_url: impl Into<String>, http: Client) -> Self {
        Self {
            inner: ServiceClient::new("review", base_url, http),
        }
    }

    pub async fn get_reviews(&self, product_id: i32) -> AppResult<Vec<ReviewDto>> {
        self.inner
            .get_json(&format!("/review?productId={}", product_id))
            .await
    }

    pub async fn create_review(&self, body: &ReviewDto) -> AppResult<ReviewDto> {
        self.inner.post_json("/review", body).await
    }

    pub async fn delete_reviews(&self, product_id: i32) -> AppResult<()> {
        self.inner
            .delete(&format!("/review?productId={}", product_id))
            .await
    }

    pub fn service(&self) -> &ServiceClient {
        &self.inner
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::IntegrationConfig;
    use crate::error::AppError;
    use crate::external::build_http_client;
    use httpmock::prelude::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_invalid_input_from_review_service() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/review");
            then.status(400).json_body(json!({
                "timestamp": "2025-01-15T10:00:00Z",
                "path": "/review",
                "httpStatus": "BAD_REQUEST",
                "message": "Duplicate key, Product Id: 1, Review Id:1"
            }));
        });

        let http = build_http_client(&IntegrationConfig::default()).unwrap();
        let body = ReviewDto {
            product_id: 1,
            review_id: 1,
            author: "a".to_string(),
            subject: "s".to_string(),
            content: "c".to_string(),
            service_address: String::new(),
            version: 0,
        };

        let err = ReviewClient::new(server.base_url(), http)
            .create_review(&body)
            .await
            .unwrap_err();
        assert!(
            matches!(err, AppError::InvalidInput { ref message } if message == "Duplicate key, Product Id: 1, Review Id:1")
        );
    }
}
