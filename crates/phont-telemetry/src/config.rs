//! Telemetry configuration.

use crate::logging::LogConfig;
use crate::metrics::MetricsConfig;

/// Logging and metrics settings of one service.
///
/// # Example
///
/// ```
/// use phont_telemetry::TelemetryConfig;
///
/// let config = TelemetryConfig::for_environment("auth-api", "production")
///     .with_metrics_listener("0.0.0.0:9090");
///
/// assert!(config.logging.json_format);
/// assert!(config.metrics.enabled);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct TelemetryConfig {
    /// Service name, attached to the startup log line.
    pub service_name: String,

    /// Environment (develop, staging, production, tests).
    pub environment: String,

    /// Metrics configuration.
    pub metrics: MetricsConfig,

    /// Logging configuration.
    pub logging: LogConfig,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self::for_environment("phont-service", "develop")
    }
}

impl TelemetryConfig {
    /// Picks the logging preset matching `environment`.
    ///
    /// `production` and `staging` log JSON at `info`; anything else gets the
    /// pretty development output. Metrics stay disabled.
    #[must_use]
    pub fn for_environment(service_name: impl Into<String>, environment: impl Into<String>) -> Self {
        let environment = environment.into();
        let logging = match environment.as_str() {
            "production" | "staging" => LogConfig::production(),
            _ => LogConfig::development(),
        };

        Self {
            service_name: service_name.into(),
            environment,
            metrics: MetricsConfig::default(),
            logging,
        }
    }

    /// Replaces the logging settings.
    #[must_use]
    pub fn with_logging(self, logging: LogConfig) -> Self {
        Self { logging, ..self }
    }

    /// Replaces the metrics settings.
    #[must_use]
    pub fn with_metrics(self, metrics: MetricsConfig) -> Self {
        Self { metrics, ..self }
    }

    /// Enables metrics served by a standalone listener on `addr`.
    ///
    /// Keeps the configured histogram buckets.
    #[must_use]
    pub fn with_metrics_listener(mut self, addr: impl Into<String>) -> Self {
        self.metrics.enabled = true;
        self.metrics.addr = Some(addr.into());
        self
    }

    /// Turns both subsystems off.
    #[must_use]
    pub fn disabled(mut self) -> Self {
        self.logging.enabled = false;
        self.metrics.enabled = false;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = TelemetryConfig::default();
        assert_eq!(config.service_name, "phont-service");
        assert_eq!(config.environment, "develop");
        assert_eq!(config.logging, LogConfig::development());
        assert!(!config.metrics.enabled);
    }

    #[test]
    fn test_environment_picks_logging_preset() {
        for environment in ["production", "staging"] {
            let config = TelemetryConfig::for_environment("auth-api", environment);
            assert_eq!(config.logging, LogConfig::production());
        }
        let config = TelemetryConfig::for_environment("auth-api", "tests");
        assert_eq!(config.logging, LogConfig::development());
    }

    #[test]
    fn test_metrics_listener_keeps_buckets() {
        let buckets = vec![0.5, 1.0];
        let config = TelemetryConfig::default()
            .with_metrics(MetricsConfig {
                duration_buckets: buckets.clone(),
                ..MetricsConfig::default()
            })
            .with_metrics_listener("0.0.0.0:9999");

        assert!(config.metrics.enabled);
        assert_eq!(config.metrics.addr.as_deref(), Some("0.0.0.0:9999"));
        assert_eq!(config.metrics.duration_buckets, buckets);
    }

    #[test]
    fn test_disabled() {
        let config = TelemetryConfig::for_environment("auth-api", "production")
            .with_metrics_listener("0.0.0.0:9999")
            .disabled();

        assert!(!config.logging.enabled);
        assert!(!config.metrics.enabled);
    }
}
