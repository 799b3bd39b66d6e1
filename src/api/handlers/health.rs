//! Health check endpoints of the core roles.
//!
//! `/actuator/health` pings the backing store; `/actuator/health/liveness`
//! only proves the process answers.

use axum::{Router, extract::State, http::StatusCode, response::Json, routing::get};
use tracing::warn;

use crate::api::dto::{HealthDto, HealthStatus};
use crate::services::StorePing;

/// Routes:
/// - GET /actuator/health
/// - GET /actuator/health/liveness
pub fn core_health_routes<S: StorePing>() -> Router<S> {
    Router::new()
        .route("/actuator/health", get(core_health::<S>))
        .route("/actuator/health/liveness", get(liveness_check))
}

/// Reports `UP` with a `db` component when the store answers a ping,
/// otherwise `DOWN` with status 503.
pub async fn core_health<S: StorePing>(State(service): State<S>) -> (StatusCode, Json<HealthDto>) {
    let db = match service.ping_store().await {
        Ok(()) => HealthStatus::Up,
        Err(e) => {
            warn!(error = %e, "Store ping failed");
            HealthStatus::Down
        }
    };

    let status = if db.is_up() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (status, Json(HealthDto::new(db).with_component("db", db)))
}

/// Liveness probe; never touches dependencies.
#[utoipa::path(
    get,
    path = "/actuator/health/liveness",
    responses((status = 200, description = "Process is alive", body = HealthDto)),
    tag = crate::api::doc::HEALTH_TAG
)]
pub async fn liveness_check() -> Json<HealthDto> {
    Json(HealthDto::new(HealthStatus::Up))
}
