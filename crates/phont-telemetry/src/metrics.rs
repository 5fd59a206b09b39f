//! Prometheus metrics for dispatched controllers and executed use cases.
//!
//! # Standard Metrics
//!
//! | Metric | Type | Labels | Description |
//! |--------|------|--------|-------------|
//! | `phont_controller_requests_total` | Counter | `controller`, `outcome` | Dispatched calls |
//! | `phont_controller_duration_seconds` | Histogram | `controller` | Dispatch latency |
//! | `phont_use_case_executions_total` | Counter | `use_case`, `outcome` | Use-case executions |
//! | `phont_use_case_duration_seconds` | Histogram | `use_case` | Use-case latency |
//!
//! `outcome` is `success` or `failure`. Without an installed recorder the
//! recording functions are no-ops.

use crate::error::TelemetryError;
use crate::TelemetryResult;
use metrics::{counter, describe_counter, describe_histogram, histogram};
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder, PrometheusHandle};
use std::net::SocketAddr;
use std::sync::OnceLock;
use std::time::Duration;

/// Controller call counter.
pub const CONTROLLER_REQUESTS_TOTAL: &str = "phont_controller_requests_total";

/// Controller latency histogram.
pub const CONTROLLER_DURATION_SECONDS: &str = "phont_controller_duration_seconds";

/// Use-case execution counter.
pub const USE_CASE_EXECUTIONS_TOTAL: &str = "phont_use_case_executions_total";

/// Use-case latency histogram.
pub const USE_CASE_DURATION_SECONDS: &str = "phont_use_case_duration_seconds";

static METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Metrics configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricsConfig {
    /// Whether metrics are enabled.
    pub enabled: bool,

    /// Address of a standalone `/metrics` listener (e.g., "0.0.0.0:9090").
    ///
    /// When `None`, the recorder is installed without a listener and the
    /// host serves [`render_metrics`] itself.
    pub addr: Option<String>,

    /// Histogram buckets for the duration metrics, in seconds.
    pub duration_buckets: Vec<f64>,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            addr: None,
            // 1ms, 5ms, 10ms, 25ms, 50ms, 100ms, 250ms, 500ms, 1s, 2.5s, 5s, 10s
            duration_buckets: vec![
                0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
            ],
        }
    }
}

/// Installs the Prometheus recorder.
///
/// # Errors
///
/// Returns `TelemetryError::InvalidAddress` for an unparsable listener
/// address and `TelemetryError::MetricsInit` if a recorder is already
/// installed or the buckets are invalid.
pub fn init_metrics(config: &MetricsConfig) -> TelemetryResult<()> {
    if !config.enabled {
        return Ok(());
    }

    let builder = PrometheusBuilder::new()
        .set_buckets_for_metric(
            Matcher::Suffix("duration_seconds".to_string()),
            &config.duration_buckets,
        )
        .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;

    match &config.addr {
        Some(addr) => {
            let addr: SocketAddr = addr
                .parse()
                .map_err(|e| TelemetryError::InvalidAddress(format!("{addr}: {e}")))?;
            builder
                .with_http_listener(addr)
                .install()
                .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;
        }
        None => {
            let handle = builder
                .install_recorder()
                .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;
            let _ = METRICS_HANDLE.set(handle);
        }
    }

    register_metric_descriptions();

    Ok(())
}

/// Renders metrics in Prometheus text format.
///
/// Returns `None` unless [`init_metrics`] installed a recorder without a
/// listener.
#[must_use]
pub fn render_metrics() -> Option<String> {
    METRICS_HANDLE.get().map(PrometheusHandle::render)
}

fn register_metric_descriptions() {
    describe_counter!(CONTROLLER_REQUESTS_TOTAL, "Total number of dispatched controller calls");
    describe_histogram!(
        CONTROLLER_DURATION_SECONDS,
        metrics::Unit::Seconds,
        "Controller dispatch duration in seconds"
    );
    describe_counter!(USE_CASE_EXECUTIONS_TOTAL, "Total number of use-case executions");
    describe_histogram!(
        USE_CASE_DURATION_SECONDS,
        metrics::Unit::Seconds,
        "Use-case execution duration in seconds"
    );
}

const fn outcome_label(is_success: bool) -> &'static str {
    if is_success {
        "success"
    } else {
        "failure"
    }
}

/// Records a dispatched controller call.
pub fn record_controller_request(controller: &str, is_success: bool, duration: Duration) {
    counter!(
        CONTROLLER_REQUESTS_TOTAL,
        "controller" => controller.to_string(),
        "outcome" => outcome_label(is_success)
    )
    .increment(1);

    histogram!(CONTROLLER_DURATION_SECONDS, "controller" => controller.to_string())
        .record(duration.as_secs_f64());
}

/// Records a use-case execution.
///
/// `is_success` is `false` only when the use case raised a fault.
pub fn record_use_case_execution(use_case: &str, is_success: bool, duration: Duration) {
    counter!(
        USE_CASE_EXECUTIONS_TOTAL,
        "use_case" => use_case.to_string(),
        "outcome" => outcome_label(is_success)
    )
    .increment(1);

    histogram!(USE_CASE_DURATION_SECONDS, "use_case" => use_case.to_string())
        .record(duration.as_secs_f64());
}
