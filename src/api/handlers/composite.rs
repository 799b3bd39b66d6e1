//! Composite request handlers.

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    response::Json,
    routing::{get, post},
};
use crate::api::doc::{ApiDoc, COMPOSITE_TAG, HEALTH_TAG, openapi_document};
use crate::api::dto::{ApiErrorResponse, HealthDto, ProductAggregateDto};
use crate::api::extract::{ApiJson, ProductIdPath};
use crate::api::handlers::health::liveness_check;
use crate::error::AppError;
use crate::services::CompositeService;

/// Routes:
/// - GET /product-composite/{productId}
/// - POST /product-composite
/// - DELETE /product-composite/{productId}
/// - GET /actuator/health
/// - GET /actuator/health/liveness
/// - GET /v3/api-docs
pub fn composite_routes() -> Router<CompositeService> {
    Router::new()
        .route("/product-composite", post(create_product_aggregate))
        .route(
            "/product-composite/{productId}",
            get(get_product_aggregate).delete(delete_product_aggregate),
        )
        .route("/actuator/health", get(composite_health))
        .route("/actuator/health/liveness", get(liveness_check))
        .route("/v3/api-docs", get(openapi_document::<ApiDoc>))
}

/// Returns composite information for one product
#[utoipa::path(
    get,
    path = "/product-composite/{productId}",
    params(("productId" = i32, Path, description = "Product id")),
    responses(
        (status = 200, description = "Aggregate of the product", body = ProductAggregateDto),
        (status = 400, description = "Invalid request information", body = ApiErrorResponse),
        (status = 404, description = "Product not found", body = ApiErrorResponse)
    ),
    tag = COMPOSITE_TAG
)]
pub async fn get_product_aggregate(
    State(service): State<CompositeService>,
    ProductIdPath(product_id): ProductIdPath,
) -> Result<Json<ProductAggregateDto>, AppError> {
    Ok(Json(service.get_product_aggregate(product_id).await?))
}

/// Creates a product with its recommendations and reviews
#[utoipa::path(
    post,
    path = "/product-composite",
    request_body = ProductAggregateDto,
    responses(
        (status = 200, description = "Aggregate created"),
        (status = 400, description = "Invalid request information", body = ApiErrorResponse)
    ),
    tag = COMPOSITE_TAG
)]
pub async fn create_product_aggregate(
    State(service): State<CompositeService>,
    ApiJson(draft): ApiJson<ProductAggregateDto>,
) -> Result<StatusCode, AppError> {
    service.create_product_aggregate(draft).await?;
    Ok(StatusCode::OK)
}

/// Deletes a product with its recommendations and reviews
#[utoipa::path(
    delete,
    path = "/product-composite/{productId}",
    params(("productId" = i32, Path, description = "Product id")),
    responses(
        (status = 200, description = "Aggregate deleted"),
        (status = 404, description = "Product not found", body = ApiErrorResponse)
    ),
    tag = COMPOSITE_TAG
)]
pub async fn delete_product_aggregate(
    State(service): State<CompositeService>,
    ProductIdPath(product_id): ProductIdPath,
) -> Result<StatusCode, AppError> {
    service.delete_product_aggregate(product_id).await?;
    Ok(StatusCode::OK)
}

/// Health of the three core services
#[utoipa::path(
    get,
    path = "/actuator/health",
    responses(
        (status = 200, description = "All core services are up", body = HealthDto),
        (status = 503, description = "At least one core service is down", body = HealthDto)
    ),
    tag = HEALTH_TAG
)]
pub async fn composite_health(
    State(service): State<CompositeService>,
) -> (StatusCode, Json<HealthDto>) {
    let health = service.health().await;
    let status = if health.is_up() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (status, Json(health))
}
