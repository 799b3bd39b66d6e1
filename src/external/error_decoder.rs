//! Translation of downstream failures into [`AppError`] variants.

use reqwest::{Response, StatusCode};
use tracing::warn;

use crate::api::dto::ApiErrorResponse;
use crate::error::AppError;

/// Decodes a non-2xx response.
///
/// The body is read as an error envelope when possible; the envelope message
/// is kept and the status decides the variant.
pub async fn decode_error_response(response: Response) -> AppError {
    let status = response.status();
    let url = response.url().to_string();
    let body = response.text().await.unwrap_or_default();

    warn!(%status, %url, "Downstream service returned an error");
    decode_error(status, &body)
}

pub fn decode_error(status: StatusCode, body: &str) -> AppError {
    let message = serde_json::from_str::<ApiErrorResponse>(body)
        .ok()
        .and_then(|envelope| envelope.message)
        .filter(|m| !m.is_empty());

    match status {
        StatusCode::NOT_FOUND => {
            AppError::not_found(message.unwrap_or_else(|| "Not found".to_string()))
        }
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
            AppError::invalid_input(message.unwrap_or_else(|| "Bad Request".to_string()))
        }
        StatusCode::SERVICE_UNAVAILABLE => AppError::service_unavailable(
            message.unwrap_or_else(|| "Service Unavailable".to_string()),
        ),
        other => AppError::Internal {
            source: anyhow::anyhow!(
                "Unexpected HTTP status {}: {}",
                other,
                message.unwrap_or_else(|| body.to_string())
            ),
        },
    }
}

/// The request never produced a response.
pub fn transport_error(service: &str, error: &reqwest::Error) -> AppError {
    warn!(service, error = %error, "Downstream service not reachable");
    AppError::service_unavailable(format!("{} service not available: {}", service, error))
}
