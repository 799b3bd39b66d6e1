//! Configuration loader
//!
//! `ConfigLoader` assembles the layered configuration sources in precedence
//! order and deserializes them into `Settings`.

use std::path::{Path, PathBuf};

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, Environment, File, FileFormat};

use crate::config::environment::Environment as AppEnvironment;
use crate::config::error::ConfigError;
use crate::config::settings::Settings;

/// Environment variable for configuration directory
pub const CONFIG_DIR_ENV: &str = "PRODUCT_SERVICES_CONFIG_DIR";

/// Environment variable for a single configuration file
pub const CONFIG_FILE_ENV: &str = "PRODUCT_SERVICES_CONFIG_FILE";

const DEFAULT_CONFIG_DIR: &str = "config";

/// Prefix of environment variable overrides
const ENV_PREFIX: &str = "PRODUCT_SERVICES";

/// Separator for nested configuration keys in environment variables
const ENV_SEPARATOR: &str = "__";

/// Layered configuration loader
///
/// Sources, lowest priority first:
/// 1. `default.toml` (required)
/// 2. `{environment}.toml` (optional)
/// 3. `local.toml` (optional)
/// 4. `PRODUCT_SERVICES_*` environment variables
///
/// When a single configuration file is selected, steps 1-3 are replaced by
/// that file.
#[derive(Debug)]
pub struct ConfigLoader {
    config_dir: PathBuf,
    config_file: Option<PathBuf>,
    environment: AppEnvironment,
}

impl ConfigLoader {
    /// Create a loader from the process environment.
    ///
    /// # Errors
    ///
    /// Returns an error if both `PRODUCT_SERVICES_CONFIG_DIR` and
    /// `PRODUCT_SERVICES_CONFIG_FILE` are set.
    pub fn new() -> Result<Self, ConfigError> {
        let dir_override = std::env::var(CONFIG_DIR_ENV).ok();
        let config_file = std::env::var(CONFIG_FILE_ENV).ok().map(PathBuf::from);

        if config_file.is_some() && dir_override.is_some() {
            return Err(ConfigError::mutual_exclusivity(format!(
                "{} and {} cannot both be set. Use {} for layered configuration or \
                 {} for a single configuration file.",
                CONFIG_DIR_ENV, CONFIG_FILE_ENV, CONFIG_DIR_ENV, CONFIG_FILE_ENV
            )));
        }

        Ok(Self {
            config_dir: dir_override
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_DIR)),
            config_file,
            environment: AppEnvironment::from_env(),
        })
    }

    /// Load a single file instead of the layered directory.
    pub fn with_config_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_file = Some(path.into());
        self
    }

    /// Override the environment picked from `PRODUCT_SERVICES_APP_ENV`.
    pub fn with_environment(mut self, environment: AppEnvironment) -> Self {
        self.environment = environment;
        self
    }

    pub fn environment(&self) -> AppEnvironment {
        self.environment
    }

    /// Load and validate the configuration.
    pub fn load(&self) -> Result<Settings, ConfigError> {
        let settings = self.load_unvalidated()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load the configuration without validating it.
    ///
    /// Callers that apply further overrides validate the final result themselves.
    pub fn load_unvalidated(&self) -> Result<Settings, ConfigError> {
        let config = self.build_config()?;
        config.try_deserialize().map_err(|e| {
            ConfigError::ParseError(format!("Failed to deserialize configuration: {}", e))
        })
    }

    fn build_config(&self) -> Result<Config, ConfigError> {
        let builder = Config::builder();

        let builder = match self.config_file {
            Some(ref config_file) => Self::add_file_source(builder, config_file, true)?,
            None => self.build_layered_config(builder)?,
        };

        // PRODUCT_SERVICES_SERVER__PORT -> server.port
        let builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator(ENV_SEPARATOR)
                .ignore_empty(true)
                .try_parsing(true),
        );

        builder.build().map_err(ConfigError::from)
    }

    fn build_layered_config(
        &self,
        builder: ConfigBuilder<DefaultState>,
    ) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        let builder = Self::add_file_source(builder, &self.config_dir.join("default.toml"), true)?;

        let env_path = self
            .config_dir
            .join(format!("{}.toml", self.environment.as_str()));
        let builder = Self::add_file_source(builder, &env_path, false)?;

        Self::add_file_source(builder, &self.config_dir.join("local.toml"), false)
    }

    fn add_file_source(
        builder: ConfigBuilder<DefaultState>,
        path: &Path,
        required: bool,
    ) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        if required && !path.exists() {
            return Err(ConfigError::FileNotFound(path.to_path_buf()));
        }

        let name = path.to_str().ok_or_else(|| {
            ConfigError::ParseError(format!(
                "Configuration path is not valid UTF-8: {}",
                path.display()
            ))
        })?;

        Ok(builder.add_source(File::new(name, FileFormat::Toml).required(required)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::settings::{DatabaseBackend, ServiceRole};
    use std::fs;
    use std::sync::Mutex;
    use tempfile::TempDir;

    // Tests touching process environment variables run one at a time.
    static TEST_MUTEX: Mutex<()> = Mutex::new(());

    const PRODUCT_ROLE_ENV: &str = "PRODUCT_SERVICES_SERVICE__ROLE";
    const SERVER_PORT_ENV: &str = "PRODUCT_SERVICES_SERVER__PORT";

    fn setup_config_dir(files: &[(&str, &str)]) -> TempDir {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        for (name, content) in files {
            fs::write(temp_dir.path().join(name), content).expect("Failed to write config file");
        }
        temp_dir
    }

    /// Sets environment variables for one test and restores them on drop
    struct EnvGuard {
        vars_to_restore: Vec<(String, Option<String>)>,
    }

    impl EnvGuard {
        fn new() -> Self {
            let mut guard = Self {
                vars_to_restore: Vec::new(),
            };
            for key in [
                CONFIG_DIR_ENV,
                CONFIG_FILE_ENV,
                AppEnvironment::ENV_VAR,
                PRODUCT_ROLE_ENV,
                SERVER_PORT_ENV,
            ] {
                guard.remove(key);
            }
            guard
        }

        fn set(&mut self, key: &str, value: &str) {
            self.vars_to_restore
                .push((key.to_string(), std::env::var(key).ok()));
            unsafe {
                std::env::set_var(key, value);
            }
        }

        fn remove(&mut self, key: &str) {
            self.vars_to_restore
                .push((key.to_string(), std::env::var(key).ok()));
            unsafe {
                std::env::remove_var(key);
            }
        }
    }

    impl Drop for EnvGuard {
        fn drop(&mut self) {
            for (key, original_value) in self.vars_to_restore.iter().rev() {
                unsafe {
                    match original_value {
                        Some(value) => std::env::set_var(key, value),
                        None => std::env::remove_var(key),
                    }
                }
            }
        }
    }

    const DEFAULT_TOML: &str = r#"
[application]
name = "product-services"
version = "1.0.0"

[server]
host = "127.0.0.1"
port = 7000

[service]
role = "composite"

[database]
backend = "memory"

[integration]
product_service_url = "http://localhost:7001"
recommendation_service_url = "http://localhost:7002"
review_service_url = "http://localhost:7003"

[logger]
level = "info"
"#;

    #[test]
    fn test_new_uses_default_directory() {
        let _lock = TEST_MUTEX.lock().unwrap();
        let _env = EnvGuard::new();

        let loader = ConfigLoader::new().expect("Should create loader");
        assert_eq!(loader.config_dir, PathBuf::from("config"));
        assert!(loader.config_file.is_none());
        assert_eq!(loader.environment(), AppEnvironment::Development);
    }

    #[test]
    fn test_dir_and_file_are_mutually_exclusive() {
        let _lock = TEST_MUTEX.lock().unwrap();
        let mut env = EnvGuard::new();
        env.set(CONFIG_DIR_ENV, "/custom/config");
        env.set(CONFIG_FILE_ENV, "/path/to/config.toml");

        match ConfigLoader::new() {
            Err(ConfigError::MutualExclusivityError(msg)) => {
                assert!(msg.contains(CONFIG_DIR_ENV));
                assert!(msg.contains(CONFIG_FILE_ENV));
            }
            other => panic!("Expected MutualExclusivityError, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_default_toml() {
        let _lock = TEST_MUTEX.lock().unwrap();
        let mut env = EnvGuard::new();
        let temp_dir = setup_config_dir(&[]);
        env.set(CONFIG_DIR_ENV, temp_dir.path().to_str().unwrap());

        match ConfigLoader::new().unwrap().load() {
            Err(ConfigError::FileNotFound(path)) => assert!(path.ends_with("default.toml")),
            other => panic!("Expected FileNotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_full_precedence_chain() {
        let _lock = TEST_MUTEX.lock().unwrap();
        let mut env = EnvGuard::new();

        let staging = r#"
[application]
name = "staging-services"

[server]
port = 7100
"#;
        let local = r#"
[server]
port = 7200
host = "0.0.0.0"
"#;
        let temp_dir = setup_config_dir(&[
            ("default.toml", DEFAULT_TOML),
            ("staging.toml", staging),
            ("local.toml", local),
        ]);
        env.set(CONFIG_DIR_ENV, temp_dir.path().to_str().unwrap());
        env.set(AppEnvironment::ENV_VAR, "staging");
        env.set(SERVER_PORT_ENV, "7300");

        let settings = ConfigLoader::new().unwrap().load().expect("Should load settings");

        assert_eq!(settings.server.port, 7300);
        assert_eq!(settings.server.host, "0.0.0.0");
        assert_eq!(settings.application.name, "staging-services");
        assert_eq!(settings.application.version, "1.0.0");
        assert_eq!(settings.database.backend, DatabaseBackend::Memory);
    }

    #[test]
    fn test_with_environment_overrides_env_var() {
        let _lock = TEST_MUTEX.lock().unwrap();
        let mut env = EnvGuard::new();

        let test_overlay = r#"
[service]
role = "review"
"#;
        let temp_dir = setup_config_dir(&[
            ("default.toml", DEFAULT_TOML),
            ("test.toml", test_overlay),
        ]);
        env.set(CONFIG_DIR_ENV, temp_dir.path().to_str().unwrap());
        env.set(AppEnvironment::ENV_VAR, "production");

        let settings = ConfigLoader::new()
            .unwrap()
            .with_environment(AppEnvironment::Test)
            .load()
            .unwrap();

        assert_eq!(settings.service.role, ServiceRole::Review);
    }

    #[test]
    fn test_env_var_selects_role() {
        let _lock = TEST_MUTEX.lock().unwrap();
        let mut env = EnvGuard::new();
        let temp_dir = setup_config_dir(&[("default.toml", DEFAULT_TOML)]);
        env.set(CONFIG_DIR_ENV, temp_dir.path().to_str().unwrap());
        env.set(PRODUCT_ROLE_ENV, "product");

        let settings = ConfigLoader::new().unwrap().load().unwrap();
        assert_eq!(settings.service.role, ServiceRole::Product);
    }

    #[test]
    fn test_single_file_mode_ignores_directory_layers() {
        let _lock = TEST_MUTEX.lock().unwrap();
        let _env = EnvGuard::new();

        let single = r#"
[server]
port = 7001

[service]
role = "product"

[database]
url = "postgres://single/products"
"#;
        let temp_dir = setup_config_dir(&[("single.toml", single)]);

        let settings = ConfigLoader::new()
            .unwrap()
            .with_config_file(temp_dir.path().join("single.toml"))
            .load()
            .unwrap();

        assert_eq!(settings.server.port, 7001);
        assert_eq!(settings.service.role, ServiceRole::Product);
        assert_eq!(settings.database.url, "postgres://single/products");
        assert_eq!(settings.database.backend, DatabaseBackend::Postgres);
    }

    #[test]
    fn test_load_validates_but_load_unvalidated_does_not() {
        let _lock = TEST_MUTEX.lock().unwrap();
        let _env = EnvGuard::new();

        let broken = r#"
[service]
role = "product"
"#;
        let temp_dir = setup_config_dir(&[("broken.toml", broken)]);
        let loader = ConfigLoader::new()
            .unwrap()
            .with_config_file(temp_dir.path().join("broken.toml"));

        assert!(matches!(
            loader.load(),
            Err(ConfigError::ValidationError { .. })
        ));
        assert!(loader.load_unvalidated().is_ok());
    }

    #[test]
    fn test_shipped_configuration_loads_for_every_environment() {
        let _lock = TEST_MUTEX.lock().unwrap();
        let mut env = EnvGuard::new();
        env.set(
            CONFIG_DIR_ENV,
            concat!(env!("CARGO_MANIFEST_DIR"), "/config"),
        );

        for environment in [
            AppEnvironment::Development,
            AppEnvironment::Test,
            AppEnvironment::Staging,
            AppEnvironment::Production,
        ] {
            let settings = ConfigLoader::new()
                .unwrap()
                .with_environment(environment)
                .load()
                .unwrap_or_else(|e| panic!("{} config should load: {}", environment, e));
            assert_eq!(settings.service.role, ServiceRole::Composite);
            assert_eq!(settings.server.port, 7000);
        }

        let development = ConfigLoader::new()
            .unwrap()
            .with_environment(AppEnvironment::Development)
            .load()
            .unwrap();
        assert_eq!(development.database.backend, DatabaseBackend::Memory);
    }
}
