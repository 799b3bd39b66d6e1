//! Configuration validation logic

use crate::config::error::ConfigError;
use crate::config::settings::{
    DatabaseBackend, DatabaseConfig, FileSettings, IntegrationConfig, LoggerSettings,
    ServerConfig, ServiceConfig, Settings,
};

const VALID_LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

const VALID_LOG_FORMATS: &[&str] = &["full", "compact", "json"];

impl ServerConfig {
    /// Validate server configuration
    ///
    /// # Validation Rules
    /// - Host must not be empty
    /// - Port must be between 1 and 65535
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.host.trim().is_empty() {
            return Err(ConfigError::validation(
                "server.host",
                "Server host cannot be empty.",
            ));
        }

        if self.port == 0 {
            return Err(ConfigError::validation(
                "server.port",
                "Port must be between 1 and 65535. Please specify a valid port number.",
            ));
        }

        Ok(())
    }
}

impl ServiceConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(address) = &self.advertised_address
            && address.trim().is_empty()
        {
            return Err(ConfigError::validation(
                "service.advertised_address",
                "Advertised address cannot be blank. Remove the key to use the resolved address.",
            ));
        }
        Ok(())
    }
}

impl DatabaseConfig {
    /// Validate database configuration
    ///
    /// The memory backend needs no connection settings. For PostgreSQL:
    /// - URL must be a `postgres://` or `postgresql://` URL
    /// - Max and min connections must be greater than 0
    /// - Min connections must not exceed max connections
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.backend == DatabaseBackend::Memory {
            return Ok(());
        }

        if self.url.is_empty() {
            return Err(ConfigError::validation(
                "database.url",
                "Database URL is required. Please specify a valid database connection string.",
            ));
        }

        if !self.is_valid_database_url() {
            return Err(ConfigError::validation(
                "database.url",
                "Invalid database URL format. Expected format: postgres://[user:password@]host[:port]/database",
            ));
        }

        if self.max_connections == 0 {
            return Err(ConfigError::validation(
                "database.max_connections",
                "Max connections must be greater than 0.",
            ));
        }

        if self.min_connections == 0 {
            return Err(ConfigError::validation(
                "database.min_connections",
                "Min connections must be greater than 0.",
            ));
        }

        if self.min_connections > self.max_connections {
            return Err(ConfigError::validation(
                "database.min_connections",
                format!(
                    "Min connections ({}) cannot exceed max connections ({}).",
                    self.min_connections, self.max_connections
                ),
            ));
        }

        Ok(())
    }

    fn is_valid_database_url(&self) -> bool {
        ["postgres://", "postgresql://"]
            .iter()
            .any(|scheme| self.url.starts_with(scheme))
    }
}

impl IntegrationConfig {
    /// Every base URL must be an absolute http(s) URL.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let urls = [
            ("integration.product_service_url", &self.product_service_url),
            (
                "integration.recommendation_service_url",
                &self.recommendation_service_url,
            ),
            ("integration.review_service_url", &self.review_service_url),
        ];

        for (field, url) in urls {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(ConfigError::validation(
                    field,
                    format!("Invalid service URL '{}'. Expected http:// or https://", url),
                ));
            }
        }

        if self.connect_timeout == 0 {
            return Err(ConfigError::validation(
                "integration.connect_timeout",
                "Connect timeout must be greater than 0 seconds.",
            ));
        }

        Ok(())
    }
}

impl FileSettings {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.enabled && self.path.trim().is_empty() {
            return Err(ConfigError::validation(
                "logger.file.path",
                "File path is required when file logging is enabled.",
            ));
        }

        if !VALID_LOG_FORMATS.contains(&self.format.to_lowercase().as_str()) {
            return Err(ConfigError::validation(
                "logger.file.format",
                format!(
                    "Invalid log format '{}'. Valid formats are: {}",
                    self.format,
                    VALID_LOG_FORMATS.join(", ")
                ),
            ));
        }

        Ok(())
    }
}

impl LoggerSettings {
    /// Validate logger settings
    ///
    /// A plain level must be one of trace, debug, info, warn, error. Values
    /// containing `=` are treated as `EnvFilter` directives and accepted as is.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let level = self.level.to_lowercase();
        if !level.contains('=') && !VALID_LOG_LEVELS.contains(&level.as_str()) {
            return Err(ConfigError::validation(
                "logger.level",
                format!(
                    "Invalid log level '{}'. Valid levels are: {}",
                    self.level,
                    VALID_LOG_LEVELS.join(", ")
                ),
            ));
        }

        self.file.validate()
    }
}

impl Settings {
    /// Validate the sections the configured role actually uses.
    ///
    /// Core roles need a usable database section; the composite needs the
    /// integration section instead.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.server.validate()?;
        self.service.validate()?;
        if self.service.role.is_core() {
            self.database.validate()?;
        } else {
            self.integration.validate()?;
        }
        self.logger.validate()?;
        Ok(())
    }
}
