//! Product request handlers.

use axum::{Router, extract::State, http::StatusCode, response::Json, routing::get, routing::post};

use crate::api::doc::{ProductApiDoc, PRODUCT_TAG, openapi_document};
use crate::api::dto::{ApiErrorResponse, ProductDto};
use crate::api::extract::{ApiJson, ProductIdPath};
use crate::error::AppError;
use crate::services::ProductService;

/// Routes:
/// - GET /product/{productId}
/// - POST /product
/// - DELETE /product/{productId}
/// - GET /v3/api-docs
pub fn product_routes() -> Router<ProductService> {
    Router::new()
        .route("/product", post(create_product))
        .route("/product/{productId}", get(get_product).delete(delete_product))
        .route("/v3/api-docs", get(openapi_document::<ProductApiDoc>))
}

#[utoipa::path(
    get,
    path = "/product/{productId}",
    params(("productId" = i32, Path, description = "Product id, must be 1 or greater")),
    responses(
        (status = 200, description = "Product found", body = ProductDto),
        (status = 400, description = "Invalid product id", body = ApiErrorResponse),
        (status = 404, description = "No such product", body = ApiErrorResponse)
    ),
    tag = PRODUCT_TAG
)]
pub async fn get_product(
    State(service): State<ProductService>,
    ProductIdPath(product_id): ProductIdPath,
) -> Result<Json<ProductDto>, AppError> {
    Ok(Json(service.get_product(product_id).await?))
}

#[utoipa::path(
    post,
    path = "/product",
    request_body = ProductDto,
    responses(
        (status = 200, description = "Product created", body = ProductDto),
        (status = 400, description = "Invalid or duplicate product", body = ApiErrorResponse)
    ),
    tag = PRODUCT_TAG
)]
pub async fn create_product(
    State(service): State<ProductService>,
    ApiJson(body): ApiJson<ProductDto>,
) -> Result<Json<ProductDto>, AppError> {
    Ok(Json(service.create_product(body).await?))
}

#[utoipa::path(
    delete,
    path = "/product/{productId}",
    params(("productId" = i32, Path, description = "Product id")),
    responses(
        (status = 200, description = "Product deleted"),
        (status = 404, description = "No such product", body = ApiErrorResponse)
    ),
    tag = PRODUCT_TAG
)]
pub async fn delete_product(
    State(service): State<ProductService>,
    ProductIdPath(product_id): ProductIdPath,
) -> Result<StatusCode, AppError> {
    service.delete_product(product_id).await?;
    Ok(StatusCode::OK)
}
