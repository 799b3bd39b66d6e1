//! Recommendation request handlers.

use axum::{Router, extract::State, http::StatusCode, response::Json, routing::get};

use crate::api::doc::{RecommendationApiDoc, RECOMMENDATION_TAG, openapi_document};
use crate::api::dto::{ApiErrorResponse, RecommendationDto};
use crate::api::extract::{ApiJson, ProductIdQuery};
use crate::error::AppError;
use crate::services::RecommendationService;

/// Routes:
/// - GET /recommendation?productId=
/// - POST /recommendation
/// - DELETE /recommendation?productId=
/// - GET /v3/api-docs
pub fn recommendation_routes() -> Router<RecommendationService> {
    Router::new()
        .route(
            "/recommendation",
            get(get_recommendations)
                .post(create_recommendation)
                .delete(delete_recommendations),
        )
        .route("/v3/api-docs", get(openapi_document::<RecommendationApiDoc>))
}

#[utoipa::path(
    get,
    path = "/recommendation",
    params(("productId" = i32, Query, description = "Product id")),
    responses(
        (status = 200, description = "Recommendations of the product", body = [RecommendationDto]),
        (status = 400, description = "Missing or invalid product id", body = ApiErrorResponse)
    ),
    tag = RECOMMENDATION_TAG
)]
pub async fn get_recommendations(
    State(service): State<RecommendationService>,
    ProductIdQuery(product_id): ProductIdQuery,
) -> Result<Json<Vec<RecommendationDto>>, AppError> {
    Ok(Json(service.get_recommendations(product_id).await?))
}

#[utoipa::path(
    post,
    path = "/recommendation",
    request_body = RecommendationDto,
    responses(
        (status = 200, description = "Recommendation created", body = RecommendationDto),
        (status = 400, description = "Invalid or duplicate recommendation", body = ApiErrorResponse)
    ),
    tag = RECOMMENDATION_TAG
)]
pub async fn create_recommendation(
    State(service): State<RecommendationService>,
    ApiJson(body): ApiJson<RecommendationDto>,
) -> Result<Json<RecommendationDto>, AppError> {
    Ok(Json(service.create_recommendation(body).await?))
}

#[utoipa::path(
    delete,
    path = "/recommendation",
    params(("productId" = i32, Query, description = "Product id")),
    responses((status = 200, description = "Recommendations deleted")),
    tag = RECOMMENDATION_TAG
)]
pub async fn delete_recommendations(
    State(service): State<RecommendationService>,
    ProductIdQuery(product_id): ProductIdQuery,
) -> Result<StatusCode, AppError> {
    service.delete_recommendations(product_id).await?;
    Ok(StatusCode::OK)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::handlers::test_support::send;
    use crate::api::routes::create_router;
    use crate::repositories::Repositories;
    use crate::services::ServiceAddress;
    use crate::state::AppState;
    use axum::http::Method;
    use serde_json::{Value, json};

    fn router() -> Router {
        let service = RecommendationService::new(
            Repositories::in_memory().recommendations,
            ServiceAddress::from_parts(Some("rec-host"), Some("10.0.0.6"), 7002),
        );
        create_router(AppState::Recommendation(service))
    }

    fn body(recommendation_id: i32) -> Value {
        json!({
            "productId": 1,
            "recommendationId": recommendation_id,
            "author": "author",
            "rate": 1,
            "content": "content"
        })
    }

    #[tokio::test]
    async fn test_missing_product_id_names_the_parameter() {
        let (status, error) = send(&router(), Method::GET, "/recommendation", None).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(error["path"], "/recommendation");
        assert_eq!(
            error["message"],
            "Required request parameter 'productId' is not present"
        );
    }

    #[tokio::test]
    async fn test_unknown_product_returns_empty_list() {
        let (status, list) =
            send(&router(), Method::GET, "/recommendation?productId=113", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(list, json!([]));
    }

    #[tokio::test]
    async fn test_create_list_and_bulk_delete() {
        let router = router();
        for id in [1, 2, 3] {
            let (status, _) = send(&router, Method::POST, "/recommendation", Some(body(id))).await;
            assert_eq!(status, StatusCode::OK);
        }

        let (_, list) = send(&router, Method::GET, "/recommendation?productId=1", None).await;
        assert_eq!(list.as_array().unwrap().len(), 3);
        assert_eq!(list[0]["serviceAddress"], "rec-host/10.0.0.6:7002");

        let (status, _) = send(&router, Method::DELETE, "/recommendation?productId=1", None).await;
        assert_eq!(status, StatusCode::OK);

        let (_, list) = send(&router, Method::GET, "/recommendation?productId=1", None).await;
        assert_eq!(list, json!([]));
    }

    #[tokio::test]
    async fn test_duplicate_is_400() {
        let router = router();
        send(&router, Method::POST, "/recommendation", Some(body(1))).await;

        let (status, error) = send(&router, Method::POST, "/recommendation", Some(body(1))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            error["message"],
            "Duplicate key, Product Id: 1, Recommendation Id:1"
        );
    }
}
