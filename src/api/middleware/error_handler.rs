//! Error handler for converting AppError to HTTP responses.
//!
//! `AppError` renders the envelope without a path and stashes it in the
//! response extensions; [`error_envelope_middleware`] stamps the request path
//! on it and rewrites the framework's own non-JSON error responses (unknown
//! route, wrong method, caught panics) into the same envelope.

use axum::{
    Json,
    body::to_bytes,
    extract::Request,
    http::{StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::{error, warn};

use crate::api::dto::ApiErrorResponse;
use crate::error::AppError;

/// Upper bound for reading a framework error body
const MAX_ERROR_BODY: usize = 64 * 1024;

/// Maps an AppError variant to its HTTP status code.
pub fn error_status(error: &AppError) -> StatusCode {
    match error {
        AppError::NotFound { .. } => StatusCode::NOT_FOUND,
        AppError::InvalidInput { .. }
        | AppError::Duplicate { .. }
        | AppError::BadRequest { .. } => StatusCode::BAD_REQUEST,
        AppError::Conflict { .. } => StatusCode::CONFLICT,
        AppError::ServiceUnavailable { .. } | AppError::ConnectionPool { .. } => {
            StatusCode::SERVICE_UNAVAILABLE
        }
        AppError::Database { .. } | AppError::Configuration { .. } | AppError::Internal { .. } => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

/// Client-facing message. Server-side failures are prefixed with the error
/// kind and include the innermost cause.
fn error_message(error: &AppError, status: StatusCode) -> String {
    if status != StatusCode::INTERNAL_SERVER_ERROR {
        return error.to_string();
    }

    let mut message = format!("{}: {}", error.kind(), error);
    let mut source = std::error::Error::source(error);
    let mut root = None;
    while let Some(cause) = source {
        root = Some(cause.to_string());
        source = cause.source();
    }
    if let Some(root) = root {
        message.push_str(": ");
        message.push_str(&root);
    }
    message
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = error_status(&self);
        let message = error_message(&self, status);

        if status.is_server_error() {
            error!(kind = self.kind(), error = ?self, "Request failed");
        } else {
            warn!(kind = self.kind(), %message, "Request rejected");
        }

        let envelope = ApiErrorResponse::new(status, message);
        let mut response = (status, Json(envelope.clone())).into_response();
        response.extensions_mut().insert(envelope);
        response
    }
}

/// Renders every error response as an [`ApiErrorResponse`] carrying the
/// request path.
pub async fn error_envelope_middleware(request: Request, next: Next) -> Response {
    let path = request.uri().path().to_string();
    let response = next.run(request).await;
    let status = response.status();

    if !(status.is_client_error() || status.is_server_error()) {
        return response;
    }

    if let Some(envelope) = response.extensions().get::<ApiErrorResponse>().cloned() {
        let (mut parts, _) = response.into_parts();
        parts.headers.remove(header::CONTENT_LENGTH);
        let body = Json(envelope.with_path(path));
        return (parts, body).into_response();
    }

    let is_json = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.contains("application/json"));
    if is_json {
        return response;
    }

    let (mut parts, body) = response.into_parts();
    let text = to_bytes(body, MAX_ERROR_BODY)
        .await
        .map(|bytes| String::from_utf8_lossy(&bytes).trim().to_string())
        .unwrap_or_default();

    let reason = status.canonical_reason().unwrap_or("Error").to_string();
    let detail = if text.is_empty() { reason } else { text };
    let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
        format!("InternalError: {}", detail)
    } else {
        detail
    };

    parts.headers.remove(header::CONTENT_LENGTH);
    parts.headers.remove(header::CONTENT_TYPE);
    let envelope = ApiErrorResponse::new(status, message).with_path(path);
    (parts, Json(envelope)).into_response()
}
