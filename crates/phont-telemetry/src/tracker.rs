//! Per-call performance tracking for dispatched controllers.
//!
//! [`PerformanceTracker::track_request`] closes the timeline of one call:
//! it measures the runtime, renders request and response through the
//! [`SensitiveDataSanitizer`], hands a [`ControllerTimingEntry`] to the
//! logger and records the controller metrics. It is fire-and-forget
//! instrumentation and never fails the caller.

use crate::metrics::record_controller_request;
use crate::sanitizer::SensitiveDataSanitizer;
use phont_core::contracts::{ControllerLogger, ControllerTimingEntry};
use phont_core::LoggingContext;
use serde::Serialize;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// What to track for one finished call.
#[derive(Debug)]
pub struct TrackRequest<'a, Req: ?Sized, Res: ?Sized> {
    /// The inbound request.
    pub request: &'a Req,
    /// The envelope returned to the caller.
    pub response: &'a Res,
    /// Logging context of the call.
    pub context: &'a LoggingContext,
    /// Whether the call produced a success response.
    pub is_success: bool,
    /// When the call started.
    pub started_at: Instant,
}

/// Measurements of one finished call.
///
/// Forwarded to the logger and returned to the caller; the tracker keeps no
/// copy.
#[derive(Debug, Clone, PartialEq)]
pub struct PerformanceMetric {
    /// Sanitized request rendering.
    pub request: String,
    /// Sanitized response rendering.
    pub response: String,
    /// When the call started.
    pub started_at: Instant,
    /// When tracking ran.
    pub ended_at: Instant,
    /// `ended_at - started_at` in milliseconds.
    pub runtime_ms: f64,
    /// Whether the call produced a success response.
    pub success: bool,
    /// Controller name.
    pub controller_name: String,
}

impl PerformanceMetric {
    /// Returns the runtime as a [`Duration`].
    #[must_use]
    pub fn runtime(&self) -> Duration {
        self.ended_at.saturating_duration_since(self.started_at)
    }
}

/// Records timing and sanitized payloads of dispatched calls.
pub struct PerformanceTracker {
    logger: Arc<dyn ControllerLogger>,
    sanitizer: Arc<SensitiveDataSanitizer>,
}

impl PerformanceTracker {
    /// Creates a tracker.
    #[must_use]
    pub fn new(logger: Arc<dyn ControllerLogger>, sanitizer: Arc<SensitiveDataSanitizer>) -> Self {
        Self { logger, sanitizer }
    }

    /// Creates a tracker with a default sanitizer.
    #[must_use]
    pub fn create_default(logger: Arc<dyn ControllerLogger>) -> Self {
        Self::new(logger, Arc::new(SensitiveDataSanitizer::new()))
    }

    /// Returns the sanitizer.
    #[must_use]
    pub fn sanitizer(&self) -> &Arc<SensitiveDataSanitizer> {
        &self.sanitizer
    }

    /// Tracks one finished call.
    pub fn track_request<Req, Res>(&self, track: TrackRequest<'_, Req, Res>) -> PerformanceMetric
    where
        Req: Serialize + ?Sized,
        Res: Serialize + ?Sized,
    {
        let ended_at = Instant::now();
        let runtime = ended_at.saturating_duration_since(track.started_at);
        let runtime_ms = runtime.as_secs_f64() * 1000.0;
        let controller_name = track.context.operation_name.clone();

        let metric = PerformanceMetric {
            request: self.sanitizer.sanitize_serialize(track.request),
            response: self.sanitizer.sanitize_serialize(track.response),
            started_at: track.started_at,
            ended_at,
            runtime_ms,
            success: track.is_success,
            controller_name: controller_name.clone(),
        };

        let message = if track.is_success {
            format!("{controller_name} took +{runtime_ms:.3} ms to respond!")
        } else {
            format!("{controller_name} failed after +{runtime_ms:.3} ms")
        };

        let entry = ControllerTimingEntry {
            message,
            runtime_ms,
            controller_name,
            http_request: metric.request.clone(),
            http_response: metric.response.clone(),
            is_success: track.is_success,
            context: track.context.clone(),
        };

        if catch_unwind(AssertUnwindSafe(|| self.logger.send_log_time_controller(entry))).is_err() {
            tracing::warn!(
                controller = %metric.controller_name,
                correlation_id = %track.context.correlation_id,
                "controller timing logger panicked"
            );
        }

        record_controller_request(&metric.controller_name, track.is_success, runtime);

        metric
    }
}

impl std::fmt::Debug for PerformanceTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PerformanceTracker")
            .field("sanitizer", &self.sanitizer)
            .finish_non_exhaustive()
    }
}
