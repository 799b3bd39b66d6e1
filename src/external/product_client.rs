use reqwest::Client;

use crate::api::dto::ProductDto;
use crate::error::AppResult;
use crate::external::ServiceClient;

/// Client of the product service.
#[derive(Clone)]
pub struct ProductClient {
    inner: ServiceClient,
}

impl ProductClient {
    pub fn new(base_url: impl Into<String>, http: Client) -> Self {
        Self {
            inner: ServiceClient::new("product", base_url, http),
        }
    }

    pub async fn get_product(&self, product_id: i32) -> AppResult<ProductDto> {
        self.inner.get_json(&format!("/product/{}", product_id)).await
    }

    pub async fn create_product(&self, body: &ProductDto) -> AppResult<ProductDto> {
        self.inner.post_json("/product", body).await
    }

    pub async fn delete_product(&self, product_id: i32) -> AppResult<()> {
        self.inner.delete(&format!("/product/{}", product_id)).await
    }

    pub fn service(&self) -> &ServiceClient {
        &self.inner
    }
}
