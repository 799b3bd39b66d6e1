//! Router configuration for the API.
//!
//! One route set per role, wrapped in the same middleware stack.

use axum::{Router, middleware};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;

use crate::api::handlers;
use crate::api::middleware::{
    error_envelope_middleware, logging_middleware, request_id_middleware,
};
use crate::state::AppState;

/// Creates the router for the role held by `state`.
///
/// # Middleware Order
/// Layers run outermost first:
/// 1. Request ID - generates or propagates `x-request-id`
/// 2. Logging - logs request and response with the request ID
/// 3. CORS and compression
/// 4. Error envelope - stamps the request path on error bodies and rewrites
///    framework errors
/// 5. Panic catcher - turns handler panics into 500 responses
pub fn create_router(state: AppState) -> Router {
    let routes = match state {
        AppState::Product(service) => handlers::product::product_routes()
            .merge(handlers::health::core_health_routes())
            .with_state(service),
        AppState::Recommendation(service) => handlers::recommendation::recommendation_routes()
            .merge(handlers::health::core_health_routes())
            .with_state(service),
        AppState::Review(service) => handlers::review::review_routes()
            .merge(handlers::health::core_health_routes())
            .with_state(service),
        AppState::Composite(service) => {
            handlers::composite::composite_routes().with_state(service)
        }
    };

    // Middleware is applied in reverse order - last added runs first
    routes
        .layer(CatchPanicLayer::new())
        .layer(middleware::from_fn(error_envelope_middleware))
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
        .layer(middleware::from_fn(logging_middleware))
        .layer(middleware::from_fn(request_id_middleware))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::handlers::test_support::send;
    use crate::repositories::Repositories;
    use crate::services::{ProductService, ServiceAddress};
    use axum::http::{Method, StatusCode};

    #[tokio::test]
    async fn test_core_router_has_no_composite_routes() {
        let service = ProductService::new(
            Repositories::in_memory().products,
            ServiceAddress::from_parts(None, None, 7001),
        );
        let router = create_router(AppState::Product(service));

        let (status, body) = send(&router, Method::GET, "/product-composite/1", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["path"], "/product-composite/1");
    }
}
