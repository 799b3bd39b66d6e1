//! Outbound HTTP integration with the three core services.
//!
//! One typed client per core service sits on top of a shared
//! [`ServiceClient`]; [`HttpIntegration`] bundles them behind the
//! [`CoreIntegration`] trait consumed by the composite service.

mod client;
mod error_decoder;
mod integration;
mod product_client;
mod recommendation_client;
mod review_client;

pub use client::{ServiceClient, build_http_client};
pub use error_decoder::{decode_error_response, transport_error};
pub use integration::{CoreIntegration, HttpIntegration};
pub use product_client::ProductClient;
pub use recommendation_client::RecommendationClient;
pub use review_client::ReviewClient;

#[cfg(test)]
pub use integration::StubIntegration;
