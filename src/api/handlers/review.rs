//! Review request handlers.

use axum::{Router, extract::State, http::StatusCode, response::Json, routing::get};

use crate::api::doc::{ReviewApiDoc, REVIEW_TAG, openapi_document};
use crate::api::dto::{ApiErrorResponse, ReviewDto, ReviewUpdateDto};
use crate::api::extract::{ApiJson, ProductIdQuery};
use crate::error::AppError;
use crate::services::ReviewService;

/// Routes:
/// - GET /review?productId=
/// - POST /review
/// - PUT /review
/// - DELETE /review?productId=
/// - GET /v3/api-docs
pub fn review_routes() -> Router<ReviewService> {
    Router::new()
        .route(
            "/review",
            get(get_reviews)
                .post(create_review)
                .put(update_review)
                .delete(delete_reviews),
        )
        .route("/v3/api-docs", get(openapi_document::<ReviewApiDoc>))
}

#[utoipa::path(
    get,
    path = "/review",
    params(("productId" = i32, Query, description = "Product id")),
    responses(
        (status = 200, description = "Reviews of the product", body = [ReviewDto]),
        (status = 400, description = "Missing or invalid product id", body = ApiErrorResponse)
    ),
    tag = REVIEW_TAG
)]
pub async fn get_reviews(
    State(service): State<ReviewService>,
    ProductIdQuery(product_id): ProductIdQuery,
) -> Result<Json<Vec<ReviewDto>>, AppError> {
    Ok(Json(service.get_reviews(product_id).await?))
}

#[utoipa::path(
    post,
    path = "/review",
    request_body = ReviewDto,
    responses(
        (status = 200, description = "Review created", body = ReviewDto),
        (status = 400, description = "Invalid or duplicate review", body = ApiErrorResponse)
    ),
    tag = REVIEW_TAG
)]
pub async fn create_review(
    State(service): State<ReviewService>,
    ApiJson(body): ApiJson<ReviewDto>,
) -> Result<Json<ReviewDto>, AppError> {
    Ok(Json(service.create_review(body).await?))
}

#[utoipa::path(
    put,
    path = "/review",
    request_body = ReviewUpdateDto,
    responses(
        (status = 200, description = "Review updated", body = ReviewDto),
        (status = 404, description = "No such review", body = ApiErrorResponse),
        (status = 409, description = "Stale version", body = ApiErrorResponse)
    ),
    tag = REVIEW_TAG
)]
pub async fn update_review(
    State(service): State<ReviewService>,
    ApiJson(body): ApiJson<ReviewUpdateDto>,
) -> Result<Json<ReviewDto>, AppError> {
    Ok(Json(service.update_review(body).await?))
}

#[utoipa::path(
    delete,
    path = "/review",
    params(("productId" = i32, Query, description = "Product id")),
    responses((status = 200, description = "Reviews deleted")),
    tag = REVIEW_TAG
)]
pub async fn delete_reviews(
    State(service): State<ReviewService>,
    ProductIdQuery(product_id): ProductIdQuery,
) -> Result<StatusCode, AppError> {
    service.delete_reviews(product_id).await?;
    Ok(StatusCode::OK)
}
