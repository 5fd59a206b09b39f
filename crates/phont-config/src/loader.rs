//! Configuration loader with layered approach.
//!
//! This module provides the [`ConfigLoader`] for loading configuration from
//! multiple sources: defaults, files, strings and environment variables.

use std::env;
use std::fs;
use std::path::Path;

use crate::{ConfigError, LogFormat, PhontConfig, ResponsePreset};

/// Default prefix of environment overrides.
pub const DEFAULT_ENV_PREFIX: &str = "PHONT";

/// Configuration loader with layered approach.
///
/// Layers apply in order, later ones overriding earlier ones:
/// 1. Default values (or a preset)
/// 2. Configuration file or string (TOML or JSON)
/// 3. Environment variables (`PREFIX__SECTION__KEY`)
///
/// A file or string replaces the whole configuration; sections it omits fall
/// back to their defaults, not to the previous layer.
///
/// # Example
///
/// ```no_run
/// use phont_config::ConfigLoader;
///
/// # fn main() -> Result<(), phont_config::ConfigError> {
/// let config = ConfigLoader::new()
///     .with_dotenv()
///     .with_optional_file("phont.toml")?
///     .with_env_prefix("PHONT")
///     .load()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct ConfigLoader {
    config: PhontConfig,
    env_prefix: Option<String>,
    service_env: bool,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    /// Creates a loader starting from the defaults.
    #[must_use]
    pub fn new() -> Self {
        Self {
            config: PhontConfig::default(),
            env_prefix: None,
            service_env: false,
        }
    }

    /// Starts from the default configuration.
    #[must_use]
    pub fn with_defaults(mut self) -> Self {
        self.config = PhontConfig::default();
        self
    }

    /// Starts from the development preset.
    ///
    /// # Example
    ///
    /// ```
    /// use phont_config::ConfigLoader;
    ///
    /// let config = ConfigLoader::new()
    ///     .with_development()
    ///     .load()
    ///     .unwrap();
    ///
    /// assert_eq!(config.logging.level, "debug");
    /// ```
    #[must_use]
    pub fn with_development(mut self) -> Self {
        self.config = PhontConfig::development();
        self
    }

    /// Starts from the production preset.
    #[must_use]
    pub fn with_production(mut self) -> Self {
        self.config = PhontConfig::production();
        self
    }

    /// Loads a configuration file.
    ///
    /// The format is chosen by extension: `.toml` or `.json`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file is missing, unreadable, malformed,
    /// or contains unknown fields.
    pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigError::file_not_found(path));
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::read_error(path, e))?;

        self.config = Self::parse_file(&content, path)?;
        Ok(self)
    }

    /// Loads a configuration file if it exists.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file exists but cannot be loaded.
    pub fn with_optional_file<P: AsRef<Path>>(self, path: P) -> Result<Self, ConfigError> {
        if path.as_ref().exists() {
            self.with_file(path)
        } else {
            Ok(self)
        }
    }

    /// Loads configuration from a string in the given format (`toml` or `json`).
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if parsing fails or the format is unsupported.
    ///
    /// # Example
    ///
    /// ```
    /// use phont_config::ConfigLoader;
    ///
    /// let toml = r#"
    ///     [dispatch]
    ///     request_id_header = "x-correlation-id"
    /// "#;
    ///
    /// let config = ConfigLoader::new()
    ///     .with_string(toml, "toml")
    ///     .unwrap()
    ///     .load()
    ///     .unwrap();
    ///
    /// assert_eq!(config.dispatch.request_id_header, "x-correlation-id");
    /// ```
    pub fn with_string(mut self, content: &str, format: &str) -> Result<Self, ConfigError> {
        self.config = match format.to_lowercase().as_str() {
            "toml" => toml::from_str(content)?,
            "json" => serde_json::from_str(content)?,
            _ => {
                return Err(ConfigError::validation_error(format!(
                    "unsupported configuration format: {format}"
                )))
            }
        };
        Ok(self)
    }

    /// Sets the environment variable prefix for overrides.
    ///
    /// With prefix `PHONT`:
    /// - `PHONT__SERVICE__PORT=8080`
    /// - `PHONT__DISPATCH__REQUEST_ID_HEADER=x-correlation-id`
    /// - `PHONT__RESPONSE__DEFAULT_HEADERS__X_SERVICE=auth` (adds `x-service`)
    /// - `PHONT__SANITIZER__ADDITIONAL_SENSITIVE_FIELDS=phone,ssn`
    #[must_use]
    pub fn with_env_prefix(mut self, prefix: &str) -> Self {
        self.env_prefix = Some(prefix.to_uppercase());
        self
    }

    /// Also reads the unprefixed `ENVIRONMENT` and `PORT` variables.
    ///
    /// Empty values are treated as unset. Prefixed overrides still win.
    #[must_use]
    pub fn with_service_env(mut self) -> Self {
        self.service_env = true;
        self
    }

    /// Loads a `.env` file into the process environment, if one exists.
    #[must_use]
    pub fn with_dotenv(self) -> Self {
        let _ = dotenvy::dotenv();
        self
    }

    /// Applies environment overrides and validates the result.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if an override cannot be parsed or validation
    /// fails.
    pub fn load(mut self) -> Result<PhontConfig, ConfigError> {
        if self.service_env {
            for key in ["ENVIRONMENT", "PORT"] {
                if let Ok(value) = env::var(key) {
                    self.apply_service_var(key, &value)?;
                }
            }
        }

        if let Some(prefix) = self.env_prefix.take() {
            self.apply_env_overrides(&prefix)?;
        }

        self.config.validate()?;

        Ok(self.config)
    }

    /// Returns the configuration without applying overrides or validating.
    #[must_use]
    pub fn load_unvalidated(self) -> PhontConfig {
        self.config
    }

    fn parse_file(content: &str, path: &Path) -> Result<PhontConfig, ConfigError> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase);

        match extension.as_deref() {
            Some("toml") => Ok(toml::from_str(content)?),
            Some("json") => Ok(serde_json::from_str(content)?),
            _ => Err(ConfigError::validation_error(format!(
                "unsupported configuration file format: {}",
                path.display()
            ))),
        }
    }

    fn apply_env_overrides(&mut self, prefix: &str) -> Result<(), ConfigError> {
        let marker = format!("{prefix}__");
        let mut vars: Vec<(String, String)> =
            env::vars().filter(|(k, _)| k.starts_with(&marker)).collect();
        vars.sort();

        for (key, value) in vars {
            self.apply_env_var(&key, &value, prefix)?;
        }

        Ok(())
    }

    fn apply_service_var(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        if value.is_empty() {
            return Ok(());
        }
        match key {
            "ENVIRONMENT" => {
                self.config.service.environment = value
                    .parse()
                    .map_err(|reason: String| ConfigError::env_parse_error(key, reason))?;
            }
            "PORT" => {
                self.config.service.port = parse_port(key, value)?;
            }
            _ => {}
        }
        Ok(())
    }

    fn apply_env_var(&mut self, key: &str, value: &str, prefix: &str) -> Result<(), ConfigError> {
        let key_without_prefix = key
            .strip_prefix(prefix)
            .and_then(|k| k.strip_prefix("__"))
            .ok_or_else(|| ConfigError::env_parse_error(key, "invalid key format"))?;

        let parts: Vec<&str> = key_without_prefix.split("__").collect();

        match parts.as_slice() {
            // Service section
            ["SERVICE", "NAME"] => {
                self.config.service.name = value.to_string();
            }
            ["SERVICE", "ENVIRONMENT"] => {
                self.config.service.environment = value
                    .parse()
                    .map_err(|reason: String| ConfigError::env_parse_error(key, reason))?;
            }
            ["SERVICE", "PORT"] => {
                self.config.service.port = parse_port(key, value)?;
            }

            // Dispatch section
            ["DISPATCH", "REQUEST_ID_HEADER"] => {
                self.config.dispatch.request_id_header = value.to_lowercase();
            }

            // Response section
            ["RESPONSE", "PRESET"] => {
                self.config.response.preset = match value.to_lowercase().as_str() {
                    "default" => ResponsePreset::Default,
                    "minimal" => ResponsePreset::Minimal,
                    _ => {
                        return Err(ConfigError::env_parse_error(
                            key,
                            "expected 'default' or 'minimal'",
                        ))
                    }
                };
            }
            ["RESPONSE", "INCLUDE_TIMESTAMP"] => {
                self.config.response.include_timestamp = Some(
                    parse_bool(value)
                        .ok_or_else(|| ConfigError::env_parse_error(key, "expected boolean"))?,
                );
            }
            ["RESPONSE", "TIMESTAMP_KEY"] => {
                self.config.response.timestamp_key = value.to_string();
            }
            ["RESPONSE", "DEFAULT_HEADERS", name] => {
                let header = name.to_lowercase().replace('_', "-");
                self.config
                    .response
                    .default_headers
                    .insert(header, value.to_string());
            }

            // Sanitizer section
            ["SANITIZER", "REDACTION_TEXT"] => {
                self.config.sanitizer.redaction_text = value.to_string();
            }
            ["SANITIZER", "ADDITIONAL_SENSITIVE_FIELDS"] => {
                self.config.sanitizer.additional_sensitive_fields = value
                    .split(',')
                    .map(str::trim)
                    .filter(|field| !field.is_empty())
                    .map(ToString::to_string)
                    .collect();
            }
            ["SANITIZER", "MAX_DEPTH"] => {
                self.config.sanitizer.max_depth = value
                    .parse()
                    .map_err(|_| ConfigError::env_parse_error(key, "expected integer"))?;
            }

            // Logging section
            ["LOGGING", "ENABLED"] => {
                self.config.logging.enabled = parse_bool(value)
                    .ok_or_else(|| ConfigError::env_parse_error(key, "expected boolean"))?;
            }
            ["LOGGING", "LEVEL"] => {
                self.config.logging.level = value.to_string();
            }
            ["LOGGING", "FORMAT"] => {
                self.config.logging.format = match value.to_lowercase().as_str() {
                    "json" => LogFormat::Json,
                    "pretty" => LogFormat::Pretty,
                    _ => {
                        return Err(ConfigError::env_parse_error(
                            key,
                            "expected 'json' or 'pretty'",
                        ))
                    }
                };
            }
            ["LOGGING", "INCLUDE_LOCATION"] => {
                self.config.logging.include_location = parse_bool(value)
                    .ok_or_else(|| ConfigError::env_parse_error(key, "expected boolean"))?;
            }

            // Metrics section
            ["METRICS", "ENABLED"] => {
                self.config.metrics.enabled = parse_bool(value)
                    .ok_or_else(|| ConfigError::env_parse_error(key, "expected boolean"))?;
            }
            ["METRICS", "ADDR"] => {
                self.config.metrics.addr = if value.is_empty() {
                    None
                } else {
                    Some(value.to_string())
                };
            }

            // Unknown key
            _ => {}
        }

        Ok(())
    }
}

fn parse_port(key: &str, value: &str) -> Result<u16, ConfigError> {
    match value.parse::<u16>() {
        Ok(port) if port > 0 => Ok(port),
        _ => Err(ConfigError::env_parse_error(
            key,
            "expected a positive integer below 65536",
        )),
    }
}

/// Parse a boolean from a string.
fn parse_bool(s: &str) -> Option<bool> {
    match s.to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Environment;
    use std::io::Write;

    #[test]
    fn test_loader_new() {
        let config = ConfigLoader::new().load().unwrap();
        assert_eq!(config, PhontConfig::default());
    }

    #[test]
    fn test_loader_with_production() {
        let config = ConfigLoader::new().with_production().load().unwrap();
        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(config.service.environment, Environment::Production);
    }

    #[test]
    fn test_loader_with_string_json() {
        let json = r#"{"service": {"name": "auth-api", "port": 8080}}"#;

        let config = ConfigLoader::new()
            .with_string(json, "json")
            .unwrap()
            .load()
            .unwrap();

        assert_eq!(config.service.name, "auth-api");
        assert_eq!(config.service.port, 8080);
    }

    #[test]
    fn test_loader_rejects_unknown_fields() {
        let toml = r#"
            [dispatch]
            request_id = "x-request-id"
        "#;

        let result = ConfigLoader::new().with_string(toml, "toml");

        assert!(matches!(result, Err(ConfigError::TomlError(_))));
    }

    #[test]
    fn test_loader_rejects_unknown_format() {
        let result = ConfigLoader::new().with_string("a: b", "yaml");
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn test_loader_with_file() {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .unwrap();
        writeln!(
            file,
            r#"
            [response]
            preset = "minimal"
            timestamp_key = "at"

            [response.default_headers]
            X-Service = "auth"

            [sanitizer]
            redaction_text = "***"
            additional_sensitive_fields = ["phone"]
            "#
        )
        .unwrap();

        let config = ConfigLoader::new().with_file(file.path()).unwrap().load().unwrap();

        assert_eq!(config.response.preset, ResponsePreset::Minimal);
        assert_eq!(config.response.timestamp_key, "at");
        assert_eq!(
            config.response.default_headers.get("X-Service").map(String::as_str),
            Some("auth")
        );
        assert_eq!(config.sanitizer.redaction_text, "***");
        assert_eq!(config.sanitizer.additional_sensitive_fields, ["phone"]);
    }

    #[test]
    fn test_loader_with_unsupported_extension() {
        let file = tempfile::Builder::new()
            .suffix(".yaml")
            .tempfile()
            .unwrap();

        let result = ConfigLoader::new().with_file(file.path());

        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn test_loader_with_file_not_found() {
        let result = ConfigLoader::new().with_file("/nonexistent/phont.toml");
        assert!(matches!(result, Err(ConfigError::FileNotFound { .. })));
    }

    #[test]
    fn test_loader_with_optional_file_not_found() {
        let config = ConfigLoader::new()
            .with_optional_file("/nonexistent/phont.toml")
            .unwrap()
            .load()
            .unwrap();
        assert_eq!(config, PhontConfig::default());
    }

    #[test]
    fn test_validation_runs_on_load() {
        let toml = r#"
            [service]
            port = 0
        "#;

        let result = ConfigLoader::new().with_string(toml, "toml").unwrap().load();

        assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
    }

    #[test]
    fn test_parse_bool() {
        assert_eq!(parse_bool("TRUE"), Some(true));
        assert_eq!(parse_bool("on"), Some(true));
        assert_eq!(parse_bool("0"), Some(false));
        assert_eq!(parse_bool("maybe"), None);
    }

    // Overrides are applied through apply_env_var directly; mutating the
    // process environment needs unsafe code, which the workspace forbids.

    #[test]
    fn test_apply_env_var_service() {
        let mut loader = ConfigLoader::new();
        loader.apply_env_var("TEST__SERVICE__NAME", "auth-api", "TEST").unwrap();
        loader.apply_env_var("TEST__SERVICE__ENVIRONMENT", "staging", "TEST").unwrap();
        loader.apply_env_var("TEST__SERVICE__PORT", "8080", "TEST").unwrap();

        assert_eq!(loader.config.service.name, "auth-api");
        assert_eq!(loader.config.service.environment, Environment::Staging);
        assert_eq!(loader.config.service.port, 8080);
    }

    #[test]
    fn test_apply_env_var_invalid_values() {
        let mut loader = ConfigLoader::new();
        assert!(loader.apply_env_var("TEST__SERVICE__PORT", "0", "TEST").is_err());
        assert!(loader.apply_env_var("TEST__SERVICE__PORT", "-1", "TEST").is_err());
        assert!(loader
            .apply_env_var("TEST__SERVICE__ENVIRONMENT", "qa", "TEST")
            .is_err());
        assert!(loader.apply_env_var("TEST__LOGGING__FORMAT", "xml", "TEST").is_err());
        assert!(loader
            .apply_env_var("TEST__RESPONSE__INCLUDE_TIMESTAMP", "sometimes", "TEST")
            .is_err());
    }

    #[test]
    fn test_apply_env_var_response() {
        let mut loader = ConfigLoader::new();
        loader.apply_env_var("TEST__RESPONSE__PRESET", "minimal", "TEST").unwrap();
        loader.apply_env_var("TEST__RESPONSE__INCLUDE_TIMESTAMP", "yes", "TEST").unwrap();
        loader
            .apply_env_var("TEST__RESPONSE__DEFAULT_HEADERS__X_SERVICE", "auth", "TEST")
            .unwrap();

        assert_eq!(loader.config.response.preset, ResponsePreset::Minimal);
        assert_eq!(loader.config.response.include_timestamp, Some(true));
        assert_eq!(
            loader.config.response.default_headers.get("x-service").map(String::as_str),
            Some("auth")
        );
    }

    #[test]
    fn test_apply_env_var_sanitizer_fields() {
        let mut loader = ConfigLoader::new();
        loader
            .apply_env_var("TEST__SANITIZER__ADDITIONAL_SENSITIVE_FIELDS", "phone, ssn,,", "TEST")
            .unwrap();
        assert_eq!(
            loader.config.sanitizer.additional_sensitive_fields,
            ["phone", "ssn"]
        );
    }

    #[test]
    fn test_apply_env_var_dispatch_and_metrics() {
        let mut loader = ConfigLoader::new();
        loader
            .apply_env_var("TEST__DISPATCH__REQUEST_ID_HEADER", "X-Correlation-Id", "TEST")
            .unwrap();
        loader.apply_env_var("TEST__METRICS__ENABLED", "true", "TEST").unwrap();
        loader.apply_env_var("TEST__METRICS__ADDR", "0.0.0.0:9090", "TEST").unwrap();

        assert_eq!(loader.config.dispatch.request_id_header, "x-correlation-id");
        assert!(loader.config.metrics.enabled);
        assert_eq!(loader.config.metrics.addr.as_deref(), Some("0.0.0.0:9090"));
    }

    #[test]
    fn test_apply_service_var() {
        let mut loader = ConfigLoader::new();
        loader.apply_service_var("ENVIRONMENT", "").unwrap();
        assert_eq!(loader.config.service.environment, Environment::Develop);

        loader.apply_service_var("ENVIRONMENT", "tests").unwrap();
        loader.apply_service_var("PORT", "3000").unwrap();
        assert_eq!(loader.config.service.environment, Environment::Tests);
        assert_eq!(loader.config.service.port, 3000);
    }

    #[test]
    fn test_apply_env_var_unknown_key_is_ignored() {
        let mut loader = ConfigLoader::new();
        assert!(loader.apply_env_var("TEST__NOPE__KEY", "x", "TEST").is_ok());
        assert_eq!(loader.load_unvalidated(), PhontConfig::default());
    }
}
