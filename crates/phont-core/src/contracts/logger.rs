//! Logger provider contracts.
//!
//! The core never writes logs itself; it hands fully-formed entries to a
//! logger provider. Every call is fire-and-forget: it returns `()` and must
//! not fail the caller. `phont-telemetry` ships a `tracing`-backed
//! implementation; tests use a recording one.

use crate::context::{CorrelationId, LoggingContext};
use crate::value::LogValue;

/// Context attached to error and info entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryContext {
    /// Id of the call the entry belongs to.
    pub correlation_id: CorrelationId,
}

impl From<&LoggingContext> for EntryContext {
    fn from(context: &LoggingContext) -> Self {
        Self {
            correlation_id: context.correlation_id.clone(),
        }
    }
}

/// An error worth reporting, with its raw (unsanitized) value.
#[derive(Debug, Clone, PartialEq)]
pub struct LogErrorEntry {
    /// What went wrong, including where.
    pub message: String,
    /// The error or declared failure itself.
    pub value: LogValue,
    /// Correlation context.
    pub context: EntryContext,
}

/// A plain informational message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogInfoEntry {
    /// The message.
    pub message: String,
    /// Correlation context.
    pub context: EntryContext,
}

/// Timing of one use-case execution.
#[derive(Debug, Clone, PartialEq)]
pub struct UseCaseTimingEntry {
    /// Summary line, e.g. `"SignInUseCase took +3.2 ms to execute!"`.
    pub message: String,
    /// Wall-clock runtime in milliseconds.
    pub runtime_ms: f64,
    /// Use-case name.
    pub use_case_name: String,
    /// Raw (unsanitized) parameters.
    pub parameters: LogValue,
    /// `false` only when the use case raised a fault.
    pub is_success: bool,
    /// Logging context of the execution.
    pub context: LoggingContext,
}

/// Timing of one dispatched controller call.
#[derive(Debug, Clone, PartialEq)]
pub struct ControllerTimingEntry {
    /// Summary line, e.g. `"GetUserController took +1.4 ms to respond!"`.
    pub message: String,
    /// Wall-clock runtime in milliseconds.
    pub runtime_ms: f64,
    /// Controller name.
    pub controller_name: String,
    /// Sanitized request rendering.
    pub http_request: String,
    /// Sanitized response rendering.
    pub http_response: String,
    /// Whether the call produced a success response.
    pub is_success: bool,
    /// Logging context of the call.
    pub context: LoggingContext,
}

/// Receives error entries.
pub trait SendLogError: Send + Sync {
    /// Records an error.
    fn send_log_error(&self, entry: LogErrorEntry);
}

/// Receives informational entries.
pub trait SendLogInfo: Send + Sync {
    /// Records a message.
    fn send_log_info(&self, entry: LogInfoEntry);
}

/// Receives use-case timings.
pub trait SendLogTimeUseCase: Send + Sync {
    /// Records a use-case timing.
    fn send_log_time_use_case(&self, entry: UseCaseTimingEntry);
}

/// Receives controller timings.
pub trait SendLogTimeController: Send + Sync {
    /// Records a controller timing.
    fn send_log_time_controller(&self, entry: ControllerTimingEntry);
}

/// What a use-case executor needs from a logger.
pub trait UseCaseLogger: SendLogError + SendLogTimeUseCase {}

impl<T: SendLogError + SendLogTimeUseCase + ?Sized> UseCaseLogger for T {}

/// What a controller dispatcher needs from a logger.
pub trait ControllerLogger: SendLogError + SendLogTimeController {}

impl<T: SendLogError + SendLogTimeController + ?Sized> ControllerLogger for T {}

/// A logger implementing every contract.
pub trait LoggerProvider:
    SendLogError + SendLogInfo + SendLogTimeUseCase + SendLogTimeController
{
}

impl<T> LoggerProvider for T where
    T: SendLogError + SendLogInfo + SendLogTimeUseCase + SendLogTimeController + ?Sized
{
}
