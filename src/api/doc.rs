use axum::response::Json;
use utoipa::OpenApi;

pub const COMPOSITE_TAG: &str = "ProductComposite";
pub const PRODUCT_TAG: &str = "Product";
pub const RECOMMENDATION_TAG: &str = "Recommendation";
pub const REVIEW_TAG: &str = "Review";
pub const HEALTH_TAG: &str = "Health";

/// OpenAPI document served by the composite at `/v3/api-docs`.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Product Composite API",
        description = "Aggregated view of products with their recommendations and reviews",
    ),
    paths(
        crate::api::handlers::composite::get_product_aggregate,
        crate::api::handlers::composite::create_product_aggregate,
        crate::api::handlers::composite::delete_product_aggregate,
        crate::api::handlers::composite::composite_health,
        crate::api::handlers::health::liveness_check,
    ),
    components(
        schemas(
            crate::api::dto::ApiErrorResponse,
            crate::api::dto::HealthDto,
            crate::api::dto::ProductAggregateDto,
            crate::api::dto::RecommendationSummaryDto,
            crate::api::dto::ReviewSummaryDto,
            crate::api::dto::ServiceAddressesDto,
        )
    ),
    tags(
        (name = COMPOSITE_TAG, description = "Composite product endpoints"),
        (name = HEALTH_TAG, description = "Health check endpoints"),
    )
)]
pub struct ApiDoc;

/// OpenAPI document served by the product service at `/v3/api-docs`.
#[derive(OpenApi)]
#[openapi(
    info(title = "Product API", description = "Products keyed by productId"),
    paths(
        crate::api::handlers::product::get_product,
        crate::api::handlers::product::create_product,
        crate::api::handlers::product::delete_product,
        crate::api::handlers::health::liveness_check,
    ),
    components(schemas(
        crate::api::dto::ApiErrorResponse,
        crate::api::dto::HealthDto,
        crate::api::dto::ProductDto,
    )),
    tags(
        (name = PRODUCT_TAG, description = "Product endpoints"),
        (name = HEALTH_TAG, description = "Health check endpoints"),
    )
)]
pub struct ProductApiDoc;

/// OpenAPI document served by the recommendation service at `/v3/api-docs`.
#[derive(OpenApi)]
#[openapi(
    info(title = "Recommendation API", description = "Recommendations of a product"),
    paths(
        crate::api::handlers::recommendation::get_recommendations,
        crate::api::handlers::recommendation::create_recommendation,
        crate::api::handlers::recommendation::delete_recommendations,
        crate::api::handlers::health::liveness_check,
    ),
    components(schemas(
        crate::api::dto::ApiErrorResponse,
        crate::api::dto::HealthDto,
        crate::api::dto::RecommendationDto,
    )),
    tags(
        (name = RECOMMENDATION_TAG, description = "Recommendation endpoints"),
        (name = HEALTH_TAG, description = "Health check endpoints"),
    )
)]
pub struct RecommendationApiDoc;

/// OpenAPI document served by the review service at `/v3/api-docs`.
#[derive(OpenApi)]
#[openapi(
    info(title = "Review API", description = "Reviews of a product"),
    paths(
        crate::api::handlers::review::get_reviews,
        crate::api::handlers::review::create_review,
        crate::api::handlers::review::update_review,
        crate::api::handlers::review::delete_reviews,
        crate::api::handlers::health::liveness_check,
    ),
    components(schemas(
        crate::api::dto::ApiErrorResponse,
        crate::api::dto::HealthDto,
        crate::api::dto::ReviewDto,
        crate::api::dto::ReviewUpdateDto,
    )),
    tags(
        (name = REVIEW_TAG, description = "Review endpoints"),
        (name = HEALTH_TAG, description = "Health check endpoints"),
    )
)]
pub struct ReviewApiDoc;

/// Handler serving the document `D` as JSON.
pub async fn openapi_document<D: OpenApi>() -> Json<utoipa::openapi::OpenApi> {
    Json(D::openapi())
}
