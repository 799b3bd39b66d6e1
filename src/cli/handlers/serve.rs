//! Serve command handler
//!
//! Handles the serve command including dry-run validation and server startup.

use crate::config::settings::Settings;
use crate::config::DatabaseBackend;
use crate::server::Server;

/// Handler for the serve command
pub struct ServeCommandHandler {
    config: Settings,
}

impl ServeCommandHandler {
    pub fn new(config: Settings) -> Self {
        Self { config }
    }

    /// Run the server, or only validate the configuration when `dry_run` is set.
    pub async fn execute(self, dry_run: bool) -> anyhow::Result<()> {
        if dry_run {
            self.validate_only()?;
            return Ok(());
        }

        Server::new(self.config).run().await
    }

    /// Validate configuration without starting the server
    pub fn validate_only(&self) -> anyhow::Result<Vec<String>> {
        self.config.validate()?;

        let report = self.describe();
        for line in &report {
            println!("✓ {}", line);
        }
        println!("Dry run completed successfully - configuration is ready for deployment");
        Ok(report)
    }

    fn describe(&self) -> Vec<String> {
        let mut report = vec![
            "Configuration is valid".to_string(),
            format!("Role: {}", self.config.service.role.as_str()),
            format!("Server would bind to: {}", self.config.server.address()),
        ];

        if self.config.service.role.is_core() {
            match self.config.database.backend {
                DatabaseBackend::Memory => {
                    report.push("Storage: in-memory (data is lost on restart)".to_string())
                }
                DatabaseBackend::Postgres => {
                    report.push("Storage: PostgreSQL URL is configured".to_string())
                }
            }
        } else {
            let integration = &self.config.integration;
            report.push(format!("Product service: {}", integration.product_service_url));
            report.push(format!(
                "Recommendation service: {}",
                integration.recommendation_service_url
            ));
            report.push(format!("Review service: {}", integration.review_service_url));
        }

        report
    }

    pub fn config(&self) -> &Settings {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ServiceRole;

    #[test]
    fn test_dry_run_reports_composite_targets() {
        let handler = ServeCommandHandler::new(Settings::default());
        let report = handler.validate_only().unwrap();
        assert!(report.iter().any(|line| line == "Role: composite"));
        assert!(report.iter().any(|line| line.starts_with("Review service: http://")));
    }

    #[test]
    fn test_dry_run_reports_memory_storage_for_core_role() {
        let mut settings = Settings::default();
        settings.service.role = ServiceRole::Review;
        settings.database.backend = DatabaseBackend::Memory;

        let report = ServeCommandHandler::new(settings).validate_only().unwrap();
        assert!(report.iter().any(|line| line.starts_with("Storage: in-memory")));
    }

    #[tokio::test]
    async fn test_dry_run_rejects_invalid_configuration() {
        let mut settings = Settings::default();
        settings.service.role = ServiceRole::Product;

        let result = ServeCommandHandler::new(settings).execute(true).await;
        assert!(result.is_err());
    }
}
