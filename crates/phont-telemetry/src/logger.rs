//! Logger provider backed by `tracing`.
//!
//! [`TracingLogger`] implements every logger contract by emitting one
//! structured event per call. Field names follow [`crate::logging::fields`].
//! Values that arrive unsanitized (error values, use-case parameters) are
//! rendered through the logger's own [`SensitiveDataSanitizer`]; controller
//! timings are already sanitized by the performance tracker.

use crate::sanitizer::SensitiveDataSanitizer;
use phont_core::contracts::{
    ControllerTimingEntry, LogErrorEntry, LogInfoEntry, SendLogError, SendLogInfo,
    SendLogTimeController, SendLogTimeUseCase, UseCaseTimingEntry,
};
use std::sync::Arc;

/// Writes log entries as `tracing` events.
///
/// | Entry | Level |
/// |---|---|
/// | error | `ERROR` |
/// | info | `INFO` |
/// | timing, success | `INFO` |
/// | timing, failure | `WARN` |
#[derive(Debug, Clone, Default)]
pub struct TracingLogger {
    sanitizer: Arc<SensitiveDataSanitizer>,
}

impl TracingLogger {
    /// Creates a logger with a default sanitizer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a logger sharing an existing sanitizer.
    #[must_use]
    pub fn with_sanitizer(sanitizer: Arc<SensitiveDataSanitizer>) -> Self {
        Self { sanitizer }
    }
}

impl SendLogError for TracingLogger {
    fn send_log_error(&self, entry: LogErrorEntry) {
        let value = self.sanitizer.sanitize(&entry.value);
        tracing::error!(
            correlation_id = %entry.context.correlation_id,
            value = %value,
            "{}",
            entry.message
        );
    }
}

impl SendLogInfo for TracingLogger {
    fn send_log_info(&self, entry: LogInfoEntry) {
        tracing::info!(
            correlation_id = %entry.context.correlation_id,
            "{}",
            entry.message
        );
    }
}

impl SendLogTimeUseCase for TracingLogger {
    fn send_log_time_use_case(&self, entry: UseCaseTimingEntry) {
        let parameters = self.sanitizer.sanitize(&entry.parameters);
        if entry.is_success {
            tracing::info!(
                correlation_id = %entry.context.correlation_id,
                use_case = %entry.use_case_name,
                method = %entry.context.method_name,
                runtime_ms = entry.runtime_ms,
                is_success = entry.is_success,
                parameters = %parameters,
                "{}",
                entry.message
            );
        } else {
            tracing::warn!(
                correlation_id = %entry.context.correlation_id,
                use_case = %entry.use_case_name,
                method = %entry.context.method_name,
                runtime_ms = entry.runtime_ms,
                is_success = entry.is_success,
                parameters = %parameters,
                "{}",
                entry.message
            );
        }
    }
}

impl SendLogTimeController for TracingLogger {
    fn send_log_time_controller(&self, entry: ControllerTimingEntry) {
        if entry.is_success {
            tracing::info!(
                correlation_id = %entry.context.correlation_id,
                controller = %entry.controller_name,
                method = %entry.context.method_name,
                runtime_ms = entry.runtime_ms,
                is_success = entry.is_success,
                http_request = %entry.http_request,
                http_response = %entry.http_response,
                "{}",
                entry.message
            );
        } else {
            tracing::warn!(
                correlation_id = %entry.context.correlation_id,
                controller = %entry.controller_name,
                method = %entry.context.method_name,
                runtime_ms = entry.runtime_ms,
                is_success = entry.is_success,
                http_request = %entry.http_request,
                http_response = %entry.http_response,
                "{}",
                entry.message
            );
        }
    }
}
