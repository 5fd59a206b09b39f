//! Sanitized logging, performance tracking and metrics for Phont.
//!
//! - [`SensitiveDataSanitizer`] - Redacts sensitive keys before data is logged
//! - [`PerformanceTracker`] - Times dispatched calls and forwards sanitized
//!   request/response renderings to the logger
//! - [`TracingLogger`] - Logger provider emitting `tracing` events
//! - [`logging`] / [`metrics`] - Subscriber and Prometheus recorder setup
//!
//! # Architecture
//!
//! ```text
//!   ControllerDispatcher ──► PerformanceTracker ──► SensitiveDataSanitizer
//!            │                      │
//!            ▼                      ▼
//!     logger provider ◄─────────────┘            metrics facade
//!     (TracingLogger)                            (Prometheus)
//!            │
//!            ▼
//!   tracing-subscriber (JSON / pretty)
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use phont_telemetry::{init_telemetry, LogConfig, TelemetryConfig};
//!
//! let config = TelemetryConfig::for_environment("auth-api", "production")
//!     .with_logging(LogConfig::production())
//!     .with_metrics_listener("0.0.0.0:9090");
//!
//! init_telemetry(&config)?;
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod config;
pub mod error;
mod logger;
pub mod logging;
pub mod metrics;
mod sanitizer;
mod tracker;

pub use config::TelemetryConfig;
pub use error::TelemetryError;
pub use logger::TracingLogger;
pub use logging::{init_logging, LogConfig};
pub use crate::metrics::{init_metrics, render_metrics, MetricsConfig};
pub use sanitizer::{
    SensitiveDataSanitizer, SensitiveDataSanitizerBuilder, CIRCULAR_REFERENCE_MARKER,
    DEFAULT_MAX_DEPTH, DEFAULT_REDACTION_TEXT, DEFAULT_SENSITIVE_FIELDS,
    SANITIZATION_ERROR_MARKER, UNSERIALIZABLE_MARKER,
};
pub use tracker::{PerformanceMetric, PerformanceTracker, TrackRequest};

/// Result type for telemetry operations.
pub type TelemetryResult<T> = Result<T, TelemetryError>;

/// Initializes logging, then metrics.
///
/// # Errors
///
/// Returns `TelemetryError` if either subsystem fails to initialize.
pub fn init_telemetry(config: &TelemetryConfig) -> TelemetryResult<()> {
    init_logging(&config.logging)?;
    init_metrics(&config.metrics)?;

    tracing::info!(
        service = %config.service_name,
        environment = %config.environment,
        metrics_enabled = config.metrics.enabled,
        "telemetry initialized"
    );

    Ok(())
}
