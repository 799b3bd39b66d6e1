//! Health check DTOs.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum HealthStatus {
    Up,
    Down,
}

impl HealthStatus {
    pub fn is_up(&self) -> bool {
        matches!(self, HealthStatus::Up)
    }
}

/// Health payload in the actuator layout:
/// `{"status": "UP", "details": {"db": {"status": "UP"}}}`.
///
/// Probes read `status` as a plain string so that any value other than
/// `UP` can be treated as down.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[schema(example = json!({
    "status": "UP",
    "details": {
        "product": {"status": "UP"},
        "recommendation": {"status": "UP"},
        "review": {"status": "DOWN"}
    }
}))]
pub struct HealthDto {
    pub status: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    #[schema(value_type = Object)]
    pub details: BTreeMap<String, serde_json::Value>,
}

impl HealthDto {
    pub fn new(status: HealthStatus) -> Self {
        Self {
            status: status_name(status).to_string(),
            details: BTreeMap::new(),
        }
    }

    /// Adds a `{"status": ...}` entry for a named component.
    pub fn with_component(mut self, name: &str, status: HealthStatus) -> Self {
        self.details.insert(
            name.to_string(),
            serde_json::json!({ "status": status_name(status) }),
        );
        self
    }

    pub fn is_up(&self) -> bool {
        self.status == status_name(HealthStatus::Up)
    }
}

fn status_name(status: HealthStatus) -> &'static str {
    match status {
        HealthStatus::Up => "UP",
        HealthStatus::Down => "DOWN",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_health_status_serialization() {
        assert_eq!(serde_json::to_string(&HealthStatus::Up).unwrap(), "\"UP\"");
        assert_eq!(
            serde_json::to_string(&HealthStatus::Down).unwrap(),
            "\"DOWN\""
        );
    }

    #[test]
    fn test_health_with_components() {
        let health = HealthDto::new(HealthStatus::Down)
            .with_component("product", HealthStatus::Up)
            .with_component("review", HealthStatus::Down);

        assert_eq!(
            serde_json::to_value(&health).unwrap(),
            json!({
                "status": "DOWN",
                "details": {
                    "product": {"status": "UP"},
                    "review": {"status": "DOWN"}
                }
            })
        );
        assert!(!health.is_up());
    }

    #[test]
    fn test_foreign_status_string_is_not_up() {
        let health: HealthDto = serde_json::from_value(json!({"status": "OUT_OF_SERVICE"})).unwrap();
        assert!(!health.is_up());
        assert!(health.details.is_empty());
    }
}
