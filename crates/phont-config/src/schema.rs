//! Configuration schema types.
//!
//! Every section is defaulted, so a file only needs the values it changes.
//! Sections that configure a runtime object convert into it directly.

use http::header::{HeaderName, HeaderValue};
use indexmap::IndexMap;
use phont_core::{ResponseBuilder, ResponseBuilderOptions, StatusMapper};
use phont_telemetry::{LogConfig, SensitiveDataSanitizer, DEFAULT_MAX_DEPTH, DEFAULT_REDACTION_TEXT};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::ConfigError;

/// Deployment environment.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Local development.
    #[default]
    Develop,
    /// Production.
    Production,
    /// Pre-production.
    Staging,
    /// Automated tests.
    Tests,
}

impl Environment {
    /// Returns the configuration name of this environment.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Develop => "develop",
            Self::Production => "production",
            Self::Staging => "staging",
            Self::Tests => "tests",
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "develop" => Ok(Self::Develop),
            "production" => Ok(Self::Production),
            "staging" => Ok(Self::Staging),
            "tests" => Ok(Self::Tests),
            other => Err(format!(
                "expected 'develop', 'production', 'staging' or 'tests', got '{other}'"
            )),
        }
    }
}

/// Service identity.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ServiceConfig {
    /// Service name, attached to telemetry.
    #[serde(default = "default_service_name")]
    pub name: String,

    /// Deployment environment.
    #[serde(default)]
    pub environment: Environment,

    /// Port the host transport listens on.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            name: default_service_name(),
            environment: Environment::default(),
            port: default_port(),
        }
    }
}

fn default_service_name() -> String {
    "phont-service".to_string()
}

const fn default_port() -> u16 {
    2222
}

/// Controller dispatch settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct DispatchConfig {
    /// Header carrying the inbound correlation id.
    #[serde(default = "default_request_id_header")]
    pub request_id_header: String,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            request_id_header: default_request_id_header(),
        }
    }
}

impl DispatchConfig {
    /// Parses the request id header name.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` for an empty or malformed name.
    pub fn request_id_header_name(&self) -> Result<HeaderName, ConfigError> {
        HeaderName::from_bytes(self.request_id_header.as_bytes()).map_err(|e| {
            ConfigError::invalid_value(
                "dispatch.request_id_header",
                format!("'{}' is not a valid header name: {e}", self.request_id_header),
            )
        })
    }
}

fn default_request_id_header() -> String {
    "x-request-id".to_string()
}

/// Response builder preset.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ResponsePreset {
    /// JSON content type, `X-Powered-By: PHONT`, timestamps on.
    #[default]
    Default,
    /// JSON content type only, no timestamps.
    Minimal,
}

/// Response envelope settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ResponseConfig {
    /// Preset the builder starts from.
    #[serde(default)]
    pub preset: ResponsePreset,

    /// Overrides the preset's timestamp setting.
    #[serde(default)]
    pub include_timestamp: Option<bool>,

    /// Name of the timestamp field.
    #[serde(default = "default_timestamp_key")]
    pub timestamp_key: String,

    /// Headers merged over the preset's default headers.
    #[serde(default)]
    pub default_headers: IndexMap<String, String>,
}

impl Default for ResponseConfig {
    fn default() -> Self {
        Self {
            preset: ResponsePreset::default(),
            include_timestamp: None,
            timestamp_key: default_timestamp_key(),
            default_headers: IndexMap::new(),
        }
    }
}

impl ResponseConfig {
    /// Builds a response builder from the preset and overrides.
    ///
    /// # Example
    ///
    /// ```
    /// use phont_config::{ResponseConfig, ResponsePreset};
    /// use phont_core::HttpStatusMapper;
    /// use std::sync::Arc;
    ///
    /// let config = ResponseConfig {
    ///     preset: ResponsePreset::Minimal,
    ///     include_timestamp: Some(true),
    ///     ..ResponseConfig::default()
    /// };
    /// let builder = config.build_response_builder(Arc::new(HttpStatusMapper::new()));
    /// assert!(builder.includes_timestamp());
    /// ```
    #[must_use]
    pub fn build_response_builder(&self, status_mapper: Arc<dyn StatusMapper>) -> ResponseBuilder {
        let preset = match self.preset {
            ResponsePreset::Default => ResponseBuilder::create_default(status_mapper.clone()),
            ResponsePreset::Minimal => ResponseBuilder::create_minimal(status_mapper.clone()),
        };

        let mut default_headers = preset.default_headers();
        for (name, value) in &self.default_headers {
            default_headers.insert(name.clone(), value.as_str().into());
        }

        ResponseBuilder::new(
            status_mapper,
            ResponseBuilderOptions {
                default_headers,
                include_timestamp: self
                    .include_timestamp
                    .unwrap_or_else(|| preset.includes_timestamp()),
                timestamp_key: self.timestamp_key.clone(),
            },
        )
    }

    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.timestamp_key.trim().is_empty() {
            return Err(ConfigError::invalid_value(
                "response.timestamp_key",
                "must not be empty",
            ));
        }

        for (name, value) in &self.default_headers {
            HeaderName::from_bytes(name.as_bytes()).map_err(|e| {
                ConfigError::invalid_value(
                    "response.default_headers",
                    format!("'{name}' is not a valid header name: {e}"),
                )
            })?;
            HeaderValue::from_str(value).map_err(|e| {
                ConfigError::invalid_value(
                    "response.default_headers",
                    format!("invalid value for '{name}': {e}"),
                )
            })?;
        }

        Ok(())
    }
}

fn default_timestamp_key() -> String {
    "timestamp".to_string()
}

/// Sensitive data sanitizer settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct SanitizerConfig {
    /// Placeholder written in place of sensitive values.
    #[serde(default = "default_redaction_text")]
    pub redaction_text: String,

    /// Field names redacted on top of the built-in set.
    #[serde(default)]
    pub additional_sensitive_fields: Vec<String>,

    /// Maximum nesting depth rendered before falling back to a summary.
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
}

impl Default for SanitizerConfig {
    fn default() -> Self {
        Self {
            redaction_text: default_redaction_text(),
            additional_sensitive_fields: Vec::new(),
            max_depth: default_max_depth(),
        }
    }
}

impl SanitizerConfig {
    /// Builds a sanitizer.
    #[must_use]
    pub fn build_sanitizer(&self) -> SensitiveDataSanitizer {
        SensitiveDataSanitizer::builder()
            .redaction_text(self.redaction_text.clone())
            .additional_sensitive_fields(self.additional_sensitive_fields.iter().cloned())
            .max_depth(self.max_depth)
            .build()
    }
}

fn default_redaction_text() -> String {
    DEFAULT_REDACTION_TEXT.to_string()
}

const fn default_max_depth() -> usize {
    DEFAULT_MAX_DEPTH
}

/// Log format.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// JSON formatted logs (production).
    #[default]
    Json,
    /// Human-readable pretty format (development).
    Pretty,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Enable logging.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Filter directive (trace, debug, info, warn, error, or per-target).
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log output format.
    #[serde(default)]
    pub format: LogFormat,

    /// Include source file and line in logs.
    #[serde(default)]
    pub include_location: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            level: default_log_level(),
            format: LogFormat::default(),
            include_location: false,
        }
    }
}

impl From<&LoggingConfig> for LogConfig {
    fn from(config: &LoggingConfig) -> Self {
        let base = match config.format {
            LogFormat::Json => LogConfig::production(),
            LogFormat::Pretty => LogConfig::development(),
        };
        Self {
            enabled: config.enabled,
            level: config.level.clone(),
            file_line_info: config.include_location,
            ..base
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

const fn default_true() -> bool {
    true
}

/// Metrics configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(deny_unknown_fields)]
pub struct MetricsConfig {
    /// Install the Prometheus recorder.
    #[serde(default)]
    pub enabled: bool,

    /// Address of a standalone `/metrics` listener. Without one the host
    /// renders metrics itself.
    #[serde(default)]
    pub addr: Option<String>,
}

impl From<&MetricsConfig> for phont_telemetry::MetricsConfig {
    fn from(config: &MetricsConfig) -> Self {
        Self {
            enabled: config.enabled,
            addr: config.addr.clone(),
            ..Self::default()
        }
    }
}
