//! A logger provider that records every call.

use crate::timeline::Timeline;
use parking_lot::Mutex;
use phont_core::contracts::{
    ControllerTimingEntry, LogErrorEntry, LogInfoEntry, SendLogError, SendLogInfo,
    SendLogTimeController, SendLogTimeUseCase, UseCaseTimingEntry,
};

/// One recorded logger call.
#[derive(Debug, Clone, PartialEq)]
pub enum LogCall {
    /// `send_log_error`.
    Error(LogErrorEntry),
    /// `send_log_info`.
    Info(LogInfoEntry),
    /// `send_log_time_use_case`.
    UseCaseTiming(UseCaseTimingEntry),
    /// `send_log_time_controller`.
    ControllerTiming(ControllerTimingEntry),
}

impl LogCall {
    /// Returns the contract method name of this call.
    #[must_use]
    pub const fn method(&self) -> &'static str {
        match self {
            Self::Error(_) => "send_log_error",
            Self::Info(_) => "send_log_info",
            Self::UseCaseTiming(_) => "send_log_time_use_case",
            Self::ControllerTiming(_) => "send_log_time_controller",
        }
    }
}

/// Records every logger call in order.
///
/// # Example
///
/// ```
/// use phont_core::contracts::{EntryContext, LogInfoEntry, SendLogInfo};
/// use phont_test::RecordingLogger;
///
/// let logger = RecordingLogger::new();
/// logger.send_log_info(LogInfoEntry {
///     message: "hello".to_string(),
///     context: EntryContext { correlation_id: "abc".into() },
/// });
/// assert_eq!(logger.infos()[0].message, "hello");
/// ```
#[derive(Debug, Default)]
pub struct RecordingLogger {
    calls: Mutex<Vec<LogCall>>,
    timeline: Option<Timeline>,
}

impl RecordingLogger {
    /// Creates an empty logger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a logger that also appends each method name to `timeline`.
    #[must_use]
    pub fn with_timeline(timeline: Timeline) -> Self {
        Self {
            calls: Mutex::default(),
            timeline: Some(timeline),
        }
    }

    /// Returns every call in order.
    #[must_use]
    pub fn calls(&self) -> Vec<LogCall> {
        self.calls.lock().clone()
    }

    /// Returns the number of calls.
    #[must_use]
    pub fn len(&self) -> usize {
        self.calls.lock().len()
    }

    /// Returns `true` if nothing was logged.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.calls.lock().is_empty()
    }

    /// Forgets every recorded call.
    pub fn clear(&self) {
        self.calls.lock().clear();
    }

    /// Returns the error entries.
    #[must_use]
    pub fn errors(&self) -> Vec<LogErrorEntry> {
        self.filter(|call| match call {
            LogCall::Error(entry) => Some(entry.clone()),
            _ => None,
        })
    }

    /// Returns the info entries.
    #[must_use]
    pub fn infos(&self) -> Vec<LogInfoEntry> {
        self.filter(|call| match call {
            LogCall::Info(entry) => Some(entry.clone()),
            _ => None,
        })
    }

    /// Returns the use-case timing entries.
    #[must_use]
    pub fn use_case_timings(&self) -> Vec<UseCaseTimingEntry> {
        self.filter(|call| match call {
            LogCall::UseCaseTiming(entry) => Some(entry.clone()),
            _ => None,
        })
    }

    /// Returns the controller timing entries.
    #[must_use]
    pub fn controller_timings(&self) -> Vec<ControllerTimingEntry> {
        self.filter(|call| match call {
            LogCall::ControllerTiming(entry) => Some(entry.clone()),
            _ => None,
        })
    }

    fn filter<T>(&self, select: impl Fn(&LogCall) -> Option<T>) -> Vec<T> {
        self.calls.lock().iter().filter_map(select).collect()
    }

    fn push(&self, call: LogCall) {
        if let Some(timeline) = &self.timeline {
            timeline.record(call.method());
        }
        self.calls.lock().push(call);
    }
}

impl SendLogError for RecordingLogger {
    fn send_log_error(&self, entry: LogErrorEntry) {
        self.push(LogCall::Error(entry));
    }
}

impl SendLogInfo for RecordingLogger {
    fn send_log_info(&self, entry: LogInfoEntry) {
        self.push(LogCall::Info(entry));
    }
}

impl SendLogTimeUseCase for RecordingLogger {
    fn send_log_time_use_case(&self, entry: UseCaseTimingEntry) {
        self.push(LogCall::UseCaseTiming(entry));
    }
}

impl SendLogTimeController for RecordingLogger {
    fn send_log_time_controller(&self, entry: ControllerTimingEntry) {
        self.push(LogCall::ControllerTiming(entry));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use phont_core::contracts::EntryContext;
    use phont_core::LogValue;

    fn error(message: &str) -> LogErrorEntry {
        LogErrorEntry {
            message: message.to_string(),
            value: LogValue::Null,
            context: EntryContext {
                correlation_id: "abc".into(),
            },
        }
    }

    #[test]
    fn test_records_in_order() {
        let logger = RecordingLogger::new();
        logger.send_log_error(error("first"));
        logger.send_log_error(error("second"));

        assert_eq!(logger.len(), 2);
        let messages: Vec<String> = logger.errors().into_iter().map(|e| e.message).collect();
        assert_eq!(messages, ["first", "second"]);
        assert!(logger.controller_timings().is_empty());
    }

    #[test]
    fn test_timeline_and_clear() {
        let timeline = Timeline::new();
        let logger = RecordingLogger::with_timeline(timeline.clone());
        logger.send_log_error(error("x"));

        assert_eq!(timeline.events(), ["send_log_error"]);
        logger.clear();
        assert!(logger.is_empty());
    }
}
