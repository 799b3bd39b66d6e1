use std::time::Duration;

use reqwest::{Client, Method, RequestBuilder, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::api::dto::HealthDto;
use crate::config::IntegrationConfig;
use crate::error::{AppError, AppResult};
use crate::external::{decode_error_response, transport_error};

/// Builds the pooled HTTP client shared by every downstream client.
///
/// No request timeout is set; only connection establishment is bounded.
pub fn build_http_client(config: &IntegrationConfig) -> AppResult<Client> {
    Client::builder()
        .connect_timeout(Duration::from_secs(config.connect_timeout))
        .pool_max_idle_per_host(config.pool_max_idle_per_host)
        .pool_idle_timeout(Duration::from_secs(config.pool_idle_timeout))
        .gzip(true)
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| AppError::Internal {
            source: anyhow::Error::new(e).context("Failed to build HTTP client"),
        })
}

/// Base URL plus client for one named downstream service.
///
/// Non-2xx responses are decoded into [`AppError`] variants; connection
/// failures become `ServiceUnavailable`.
#[derive(Clone)]
pub struct ServiceClient {
    name: &'static str,
    base_url: String,
    http: Client,
}

impl ServiceClient {
    pub fn new(name: &'static str, base_url: impl Into<String>, http: Client) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            name,
            base_url,
            http,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = self.url(path);
        debug!(service = self.name, %method, %url, "Calling downstream service");
        self.http.request(method, url)
    }

    async fn send(&self, request: RequestBuilder) -> AppResult<Response> {
        let response = request
            .send()
            .await
            .map_err(|e| transport_error(self.name, &e))?;

        if response.status().is_success() {
            Ok(response)
        } else {
            Err(decode_error_response(response).await)
        }
    }

    async fn read_json<T: DeserializeOwned>(&self, response: Response) -> AppResult<T> {
        response.json::<T>().await.map_err(|e| AppError::Internal {
            source: anyhow::Error::new(e)
                .context(format!("Invalid response body from {} service", self.name)),
        })
    }

    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> AppResult<T> {
        let response = self.send(self.request(Method::GET, path)).await?;
        self.read_json(response).await
    }

    pub async fn post_json<B, T>(&self, path: &str, body: &B) -> AppResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self.send(self.request(Method::POST, path).json(body)).await?;
        self.read_json(response).await
    }

    pub async fn delete(&self, path: &str) -> AppResult<()> {
        self.send(self.request(Method::DELETE, path)).await?;
        Ok(())
    }

    /// Fetches `/actuator/health`. Any failure is reported as an error; the
    /// caller decides how to collapse it.
    pub async fn health(&self) -> AppResult<HealthDto> {
        self.get_json("/actuator/health").await
    }
}
