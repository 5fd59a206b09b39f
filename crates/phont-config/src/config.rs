//! Main configuration types.
//!
//! This module provides the top-level [`PhontConfig`] struct and its builder.

use serde::{Deserialize, Serialize};
use std::net::SocketAddr;

use crate::{
    ConfigError, DispatchConfig, Environment, LogFormat, LoggingConfig, MetricsConfig,
    ResponseConfig, SanitizerConfig, ServiceConfig,
};
use phont_telemetry::logging::create_env_filter;
use phont_telemetry::TelemetryConfig;

/// Complete Phont service configuration.
///
/// Use [`ConfigLoader`](crate::ConfigLoader) to load it from files and
/// environment variables.
///
/// # Example
///
/// ```
/// use phont_config::PhontConfig;
///
/// let config = PhontConfig::default();
/// assert_eq!(config.service.port, 2222);
/// assert_eq!(config.dispatch.request_id_header, "x-request-id");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(deny_unknown_fields)]
pub struct PhontConfig {
    /// Service identity.
    #[serde(default)]
    pub service: ServiceConfig,

    /// Controller dispatch settings.
    #[serde(default)]
    pub dispatch: DispatchConfig,

    /// Response envelope settings.
    #[serde(default)]
    pub response: ResponseConfig,

    /// Sensitive data sanitizer settings.
    #[serde(default)]
    pub sanitizer: SanitizerConfig,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Metrics settings.
    #[serde(default)]
    pub metrics: MetricsConfig,
}

impl PhontConfig {
    /// Creates a new configuration builder.
    #[must_use]
    pub fn builder() -> PhontConfigBuilder {
        PhontConfigBuilder::new()
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if:
    /// - `service.port` is zero
    /// - `dispatch.request_id_header` is not a valid header name
    /// - `response.timestamp_key` is empty or a default header is malformed
    /// - `sanitizer.redaction_text` is empty or `sanitizer.max_depth` is zero
    /// - `logging.level` is not a valid filter directive
    /// - `metrics.addr` is not a socket address
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.service.port == 0 {
            return Err(ConfigError::invalid_value(
                "service.port",
                "must be a positive integer",
            ));
        }

        self.dispatch.request_id_header_name()?;
        self.response.validate()?;

        if self.sanitizer.redaction_text.is_empty() {
            return Err(ConfigError::invalid_value(
                "sanitizer.redaction_text",
                "must not be empty",
            ));
        }
        if self.sanitizer.max_depth == 0 {
            return Err(ConfigError::invalid_value(
                "sanitizer.max_depth",
                "must be at least 1",
            ));
        }

        if self.logging.enabled {
            create_env_filter(&self.logging.level)
                .map_err(|e| ConfigError::invalid_value("logging.level", e.to_string()))?;
        }

        if let Some(addr) = &self.metrics.addr {
            if addr.parse::<SocketAddr>().is_err() {
                return Err(ConfigError::invalid_value(
                    "metrics.addr",
                    format!("invalid socket address: {addr}"),
                ));
            }
        }

        Ok(())
    }

    /// Development preset: pretty debug logs with source locations.
    ///
    /// # Example
    ///
    /// ```
    /// use phont_config::{LogFormat, PhontConfig};
    ///
    /// let config = PhontConfig::development();
    /// assert_eq!(config.logging.format, LogFormat::Pretty);
    /// ```
    #[must_use]
    pub fn development() -> Self {
        let mut config = Self::default();

        config.service.environment = Environment::Develop;
        config.logging.level = "debug".to_string();
        config.logging.format = LogFormat::Pretty;
        config.logging.include_location = true;

        config
    }

    /// Production preset: JSON info logs and metrics enabled.
    #[must_use]
    pub fn production() -> Self {
        let mut config = Self::default();

        config.service.environment = Environment::Production;
        config.logging.level = "info".to_string();
        config.logging.format = LogFormat::Json;
        config.metrics.enabled = true;

        config
    }

    /// Builds the telemetry configuration of this service.
    #[must_use]
    pub fn telemetry_config(&self) -> TelemetryConfig {
        TelemetryConfig {
            service_name: self.service.name.clone(),
            environment: self.service.environment.to_string(),
            metrics: (&self.metrics).into(),
            logging: (&self.logging).into(),
        }
    }
}

/// Builder for [`PhontConfig`].
#[derive(Debug, Default)]
pub struct PhontConfigBuilder {
    service: Option<ServiceConfig>,
    dispatch: Option<DispatchConfig>,
    response: Option<ResponseConfig>,
    sanitizer: Option<SanitizerConfig>,
    logging: Option<LoggingConfig>,
    metrics: Option<MetricsConfig>,
}

impl PhontConfigBuilder {
    /// Creates a new builder with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the service section.
    #[must_use]
    pub fn service(mut self, service: ServiceConfig) -> Self {
        self.service = Some(service);
        self
    }

    /// Sets the dispatch section.
    #[must_use]
    pub fn dispatch(mut self, dispatch: DispatchConfig) -> Self {
        self.dispatch = Some(dispatch);
        self
    }

    /// Sets the response section.
    #[must_use]
    pub fn response(mut self, response: ResponseConfig) -> Self {
        self.response = Some(response);
        self
    }

    /// Sets the sanitizer section.
    #[must_use]
    pub fn sanitizer(mut self, sanitizer: SanitizerConfig) -> Self {
        self.sanitizer = Some(sanitizer);
        self
    }

    /// Sets the logging section.
    #[must_use]
    pub fn logging(mut self, logging: LoggingConfig) -> Self {
        self.logging = Some(logging);
        self
    }

    /// Sets the metrics section.
    #[must_use]
    pub fn metrics(mut self, metrics: MetricsConfig) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Builds the configuration. Unset sections use their defaults.
    #[must_use]
    pub fn build(self) -> PhontConfig {
        PhontConfig {
            service: self.service.unwrap_or_default(),
            dispatch: self.dispatch.unwrap_or_default(),
            response: self.response.unwrap_or_default(),
            sanitizer: self.sanitizer.unwrap_or_default(),
            logging: self.logging.unwrap_or_default(),
            metrics: self.metrics.unwrap_or_default(),
        }
    }

    /// Builds and validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if validation fails.
    pub fn build_validated(self) -> Result<PhontConfig, ConfigError> {
        let config = self.build();
        config.validate()?;
        Ok(config)
    }
}
