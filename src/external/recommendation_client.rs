use reqwest::Client;

use crate::api::dto::RecommendationDto;
use crate::error::AppResult;
use crate::external::ServiceClient;

/// Client of the recommendation service.
#[derive(Clone)]
pub struct RecommendationClient {
    inner: ServiceClient,
}

impl RecommendationClient {
    pub fn new(base_url: impl Into<String>, http: Client) -> Self {
        Self {
            inner: ServiceClient::new("recommendation", base_url, http),
        }
    }

    pub async fn get_recommendations(&self, product_id: i32) -> AppResult<Vec<RecommendationDto>> {
        self.inner
            .get_json(&format!("/recommendation?productId={}", product_id))
            .await
    }

    pub async fn create_recommendation(
        &self,
        body: &RecommendationDto,
    ) -> AppResult<RecommendationDto> {
        self.inner.post_json("/recommendation", body).await
    }

    pub async fn delete_recommendations(&self, product_id: i32) -> AppResult<()> {
        self.inner
            .delete(&format!("/recommendation?productId={}", product_id))
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
    use crate::external::build_http_client;
    use httpmock::prelude::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_get_recommendations_passes_query() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/recommendation")
                .query_param("productId", "1");
            then.status(200).json_body(json!([{
                "productId": 1,
                "recommendationId": 1,
                "author": "author",
                "rate": 1,
                "content": "content",
                "serviceAddress": "rec-host/10.0.0.6:7002"
            }]));
        });

        let http = build_http_client(&IntegrationConfig::default()).unwrap();
        let found = RecommendationClient::new(server.base_url(), http)
            .get_recommendations(1)
            .await
            .unwrap();

        mock.assert();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].service_address, "rec-host/10.0.0.6:7002");
    }

    #[tokio::test]
    async fn test_delete_recommendations() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(DELETE)
                .path("/recommendation")
                .query_param("productId", "7");
            then.status(200);
        });

        let http = build_http_client(&IntegrationConfig::default()).unwrap();
        RecommendationClient::new(server.base_url(), http)
            .delete_recommendations(7)
            .await
            .unwrap();
        mock.assert();
    }
}
