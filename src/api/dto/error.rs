//! Error envelope DTO.

use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Body of every error response.
///
/// `httpStatus` is the upper snake case name of the status code, e.g.
/// `NOT_FOUND`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[schema(example = json!({
    "timestamp": "2025-01-15T10:00:00.000Z",
    "path": "/product-composite/2",
    "httpStatus": "NOT_FOUND",
    "message": "NOT FOUND: 2"
}))]
pub struct ApiErrorResponse {
    #[serde(default)]
    pub timestamp: String,
    #[serde(default)]
    pub path: String,
    #[serde(default)]
    pub http_status: String,
    pub message: Option<String>,
}

impl ApiErrorResponse {
    /// Envelope stamped with the current time; the path is filled in later by
    /// the error middleware.
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            timestamp: jiff::Timestamp::now().to_string(),
            path: String::new(),
            http_status: status_name(status),
            message: Some(message.into()),
        }
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }
}

/// `StatusCode::NOT_FOUND` -> `"NOT_FOUND"`
pub fn status_name(status: StatusCode) -> String {
    status
        .canonical_reason()
        .map(|reason| {
            reason
                .chars()
                .map(|c| match c {
                    ' ' | '-' => '_',
                    c => c.to_ascii_uppercase(),
                })
                .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
                .collect()
        })
        .unwrap_or_else(|| status.as_u16().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_names() {
        assert_eq!(status_name(StatusCode::NOT_FOUND), "NOT_FOUND");
        assert_eq!(status_name(StatusCode::BAD_REQUEST), "BAD_REQUEST");
        assert_eq!(
            status_name(StatusCode::INTERNAL_SERVER_ERROR),
            "INTERNAL_SERVER_ERROR"
        );
        assert_eq!(
            status_name(StatusCode::SERVICE_UNAVAILABLE),
            "SERVICE_UNAVAILABLE"
        );
        assert_eq!(status_name(StatusCode::METHOD_NOT_ALLOWED), "METHOD_NOT_ALLOWED");
    }

    #[test]
    fn test_envelope_serialization() {
        let envelope =
            ApiErrorResponse::new(StatusCode::NOT_FOUND, "NOT FOUND: 2").with_path("/product-composite/2");
        let value = serde_json::to_value(&envelope).unwrap();

        assert_eq!(value["path"], "/product-composite/2");
        assert_eq!(value["httpStatus"], "NOT_FOUND");
        assert_eq!(value["message"], "NOT FOUND: 2");
        assert!(value["timestamp"].as_str().unwrap().ends_with('Z'));
    }
}
