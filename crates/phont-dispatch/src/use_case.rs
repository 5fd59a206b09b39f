//! Use cases and their timed execution.
//!
//! A [`UseCase`] is a business operation that reports expected failures as
//! an [`Outcome`] and genuine faults as `Err` (or a panic). The
//! [`UseCaseExecutor`] runs it and logs how it went:
//!
//! | Operation result | Logged | Returned |
//! |---|---|---|
//! | `Ok(success)` / `Ok(failure)` | one timing entry | the outcome, unchanged |
//! | `Err(error)` | error entry, then a failed timing entry | the same error |
//! | panic | error entry, then a failed timing entry | the panic is resumed |

use crate::naming::short_type_name;
use futures_util::FutureExt;
use phont_core::contracts::{EntryContext, LogErrorEntry, UseCaseLogger, UseCaseTimingEntry};
use phont_core::{CorrelationId, Fault, LogValue, LoggingContext, Outcome};
use phont_telemetry::metrics::record_use_case_execution;
use serde::Serialize;
use std::future::Future;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Instant;

/// Method name used in use-case logging contexts.
pub const USE_CASE_METHOD: &str = "execute";

/// A business operation.
///
/// # Example
///
/// ```rust,ignore
/// use phont_core::{success, DomainError, Outcome};
/// use phont_dispatch::UseCase;
///
/// struct PingUseCase;
///
/// impl UseCase for PingUseCase {
///     type Parameters = ();
///     type Failure = DomainError;
///     type Success = &'static str;
///
///     async fn perform_operation(&self, _: &()) -> anyhow::Result<Outcome<DomainError, &'static str>> {
///         Ok(success("pong"))
///     }
/// }
/// ```
pub trait UseCase: Send + Sync {
    /// Input of the operation. Logged (sanitized) with every timing entry.
    type Parameters: Serialize + Send + Sync;
    /// Declared failure.
    type Failure: Send;
    /// Success payload.
    type Success: Send;

    /// Name used in log messages and metrics. Defaults to the type name.
    fn name(&self) -> &'static str {
        short_type_name::<Self>()
    }

    /// Runs the operation.
    ///
    /// Return `Ok(failure(..))` for expected business failures and `Err` only
    /// for genuine faults.
    fn perform_operation(
        &self,
        parameters: &Self::Parameters,
    ) -> impl Future<Output = anyhow::Result<Outcome<Self::Failure, Self::Success>>> + Send;
}

/// Runs a [`UseCase`] and logs its timing and faults.
pub struct UseCaseExecutor<U> {
    use_case: U,
    logger: Arc<dyn UseCaseLogger>,
}

impl<U: UseCase> UseCaseExecutor<U> {
    /// Creates an executor.
    pub fn new(use_case: U, logger: Arc<dyn UseCaseLogger>) -> Self {
        Self { use_case, logger }
    }

    /// Returns the wrapped use case.
    pub const fn use_case(&self) -> &U {
        &self.use_case
    }

    /// Returns the use case's name.
    pub fn name(&self) -> &'static str {
        self.use_case.name()
    }

    /// Builds the logging context of one execution for `correlation_id`.
    pub fn logging_context(&self, correlation_id: CorrelationId) -> LoggingContext {
        LoggingContext::new(self.name(), USE_CASE_METHOD, correlation_id)
    }

    /// Runs the use case.
    ///
    /// # Errors
    ///
    /// Returns the operation's own error after logging it. A panic inside the
    /// operation is logged and then resumed.
    pub async fn execute(
        &self,
        parameters: &U::Parameters,
        context: &LoggingContext,
    ) -> anyhow::Result<Outcome<U::Failure, U::Success>> {
        let name = self.name();
        let started_at = Instant::now();

        let result = AssertUnwindSafe(self.use_case.perform_operation(parameters))
            .catch_unwind()
            .await;

        let runtime = started_at.elapsed();
        let runtime_ms = runtime.as_secs_f64() * 1000.0;

        let fault = match result {
            Ok(Ok(outcome)) => {
                self.send_timing(UseCaseTimingEntry {
                    message: format!("{name} took +{runtime_ms:.3} ms to execute!"),
                    runtime_ms,
                    use_case_name: name.to_string(),
                    parameters: LogValue::from_serialize(parameters),
                    is_success: outcome.is_success(),
                    context: context.clone(),
                });
                record_use_case_execution(name, true, runtime);
                return Ok(outcome);
            }
            Ok(Err(error)) => Fault::Error(error),
            Err(payload) => Fault::from_panic(payload),
        };

        self.send_error(LogErrorEntry {
            message: format!("Unexpected error in {name}: {}", fault.message()),
            value: fault.to_log_value(),
            context: EntryContext::from(context),
        });
        self.send_timing(UseCaseTimingEntry {
            message: format!("{name} failed after +{runtime_ms:.3} ms"),
            runtime_ms,
            use_case_name: name.to_string(),
            parameters: LogValue::from_serialize(parameters),
            is_success: false,
            context: context.clone(),
        });
        record_use_case_execution(name, false, runtime);

        Err(fault.rethrow())
    }

    // A panicking logger must not replace the outcome or the fault.
    fn send_error(&self, entry: LogErrorEntry) {
        let correlation_id = entry.context.correlation_id.clone();
        if catch_unwind(AssertUnwindSafe(|| self.logger.send_log_error(entry))).is_err() {
            tracing::warn!(
                use_case = self.name(),
                %correlation_id,
                "use case error logger panicked"
            );
        }
    }

    fn send_timing(&self, entry: UseCaseTimingEntry) {
        let correlation_id = entry.context.correlation_id.clone();
        if catch_unwind(AssertUnwindSafe(|| self.logger.send_log_time_use_case(entry))).is_err() {
            tracing::warn!(
                use_case = self.name(),
                %correlation_id,
                "use case timing logger panicked"
            );
        }
    }
}

impl<U> std::fmt::Debug for UseCaseExecutor<U> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UseCaseExecutor")
            .field("use_case", &short_type_name::<U>())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use phont_core::contracts::{SendLogError, SendLogTimeUseCase};
    use phont_core::{failure, success, DomainError, EmailNotFoundError};
    use phont_test::{LogCall, RecordingLogger};
    use serde_json::json;

    #[derive(Serialize)]
    struct LookupParameters {
        email: String,
        password: String,
    }

    fn parameters() -> LookupParameters {
        LookupParameters {
            email: "ada@example.com".to_string(),
            password: "hunter2".to_string(),
        }
    }

    enum Behavior {
        Found,
        Missing,
        Error,
        Panic,
    }

    struct LookupUseCase(Behavior);

    impl UseCase for LookupUseCase {
        type Parameters = LookupParameters;
        type Failure = DomainError;
        type Success = u32;

        async fn perform_operation(
            &self,
            parameters: &LookupParameters,
        ) -> anyhow::Result<Outcome<DomainError, u32>> {
            match self.0 {
                Behavior::Found => Ok(success(7)),
                Behavior::Missing => Ok(failure(
                    EmailNotFoundError::new(parameters.email.clone()).into(),
                )),
                Behavior::Error => Err(anyhow::anyhow!("connection reset")),
                Behavior::Panic => panic!("lookup exploded"),
            }
        }
    }

    fn executor(behavior: Behavior) -> (UseCaseExecutor<LookupUseCase>, Arc<RecordingLogger>) {
        let logger = Arc::new(RecordingLogger::new());
        (UseCaseExecutor::new(LookupUseCase(behavior), logger.clone()), logger)
    }

    fn context(executor: &UseCaseExecutor<LookupUseCase>) -> LoggingContext {
        executor.logging_context(CorrelationId::from("abc-123"))
    }

    #[test]
    fn test_default_name_and_context() {
        let (executor, _) = executor(Behavior::Found);
        assert_eq!(executor.name(), "LookupUseCase");

        let context = context(&executor);
        assert_eq!(context.operation_name, "LookupUseCase");
        assert_eq!(context.method_name, "execute");
        assert_eq!(context.correlation_id.as_str(), "abc-123");
    }

    #[tokio::test]
    async fn test_success_is_returned_and_timed() {
        let (executor, logger) = executor(Behavior::Found);
        let context = context(&executor);

        let outcome = executor.execute(&parameters(), &context).await.expect("no fault");

        assert_eq!(outcome.into_success(), Some(7));
        let calls = logger.calls();
        assert_eq!(calls.len(), 1);
        let LogCall::UseCaseTiming(entry) = &calls[0] else {
            panic!("expected a timing entry, got {calls:?}");
        };
        assert!(entry.is_success);
        assert_eq!(entry.use_case_name, "LookupUseCase");
        assert!(entry.message.starts_with("LookupUseCase took +"));
        assert!(entry.message.ends_with(" ms to execute!"));
        assert_eq!(entry.context, context);
        assert_eq!(
            entry.parameters,
            LogValue::from(json!({ "email": "ada@example.com", "password": "hunter2" }))
        );
    }

    #[tokio::test]
    async fn test_declared_failure_is_not_a_fault() {
        let (executor, logger) = executor(Behavior::Missing);
        let context = context(&executor);

        let outcome = executor.execute(&parameters(), &context).await.expect("no fault");

        let error = outcome.into_failure().expect("declared failure");
        assert_eq!(error.error_message(), "The email ada@example.com was not found.");
        assert!(logger.errors().is_empty());
        let timings = logger.use_case_timings();
        assert_eq!(timings.len(), 1);
        assert!(!timings[0].is_success);
        assert!(timings[0].message.ends_with(" ms to execute!"));
    }

    #[tokio::test]
    async fn test_error_is_logged_and_returned() {
        let (executor, logger) = executor(Behavior::Error);
        let context = context(&executor);

        let error = executor
            .execute(&parameters(), &context)
            .await
            .expect_err("fault must propagate");

        assert_eq!(error.to_string(), "connection reset");
        let calls = logger.calls();
        assert_eq!(calls.len(), 2);
        let LogCall::Error(entry) = &calls[0] else {
            panic!("expected an error entry first, got {calls:?}");
        };
        assert_eq!(entry.message, "Unexpected error in LookupUseCase: connection reset");
        assert_eq!(entry.context.correlation_id.as_str(), "abc-123");
        let LogCall::UseCaseTiming(timing) = &calls[1] else {
            panic!("expected a timing entry second, got {calls:?}");
        };
        assert!(!timing.is_success);
        assert!(timing.message.starts_with("LookupUseCase failed after +"));
    }

    #[tokio::test]
    async fn test_panic_is_logged_and_resumed() {
        let (executor, logger) = executor(Behavior::Panic);
        let context = context(&executor);

        let resumed = AssertUnwindSafe(executor.execute(&parameters(), &context))
            .catch_unwind()
            .await;

        let payload = resumed.expect_err("panic must be resumed");
        assert_eq!(payload.downcast_ref::<&str>(), Some(&"lookup exploded"));
        let errors = logger.errors();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].message, "Unexpected error in LookupUseCase: lookup exploded");
        assert_eq!(logger.use_case_timings().len(), 1);
    }

    #[tokio::test]
    async fn test_one_timing_entry_per_call() {
        let (executor, logger) = executor(Behavior::Found);
        let context = context(&executor);

        for _ in 0..3 {
            executor.execute(&parameters(), &context).await.expect("no fault");
        }

        assert_eq!(logger.use_case_timings().len(), 3);
    }

    struct PanickingLogger;

    impl SendLogError for PanickingLogger {
        fn send_log_error(&self, _entry: LogErrorEntry) {
            panic!("sink unavailable");
        }
    }

    impl SendLogTimeUseCase for PanickingLogger {
        fn send_log_time_use_case(&self, _entry: UseCaseTimingEntry) {
            panic!("sink unavailable");
        }
    }

    fn with_panicking_logger(behavior: Behavior) -> UseCaseExecutor<LookupUseCase> {
        UseCaseExecutor::new(LookupUseCase(behavior), Arc::new(PanickingLogger))
    }

    #[tokio::test]
    async fn test_panicking_logger_keeps_outcome() {
        let executor = with_panicking_logger(Behavior::Found);
        let context = context(&executor);

        let outcome = executor.execute(&parameters(), &context).await.expect("no fault");

        assert_eq!(outcome.into_success(), Some(7));
    }

    #[tokio::test]
    async fn test_panicking_logger_keeps_fault() {
        let executor = with_panicking_logger(Behavior::Error);
        let context = context(&executor);

        let error = executor
            .execute(&parameters(), &context)
            .await
            .expect_err("fault must propagate");

        assert_eq!(error.to_string(), "connection reset");
    }

    #[tokio::test]
    async fn test_panicking_logger_keeps_panic_payload() {
        let executor = with_panicking_logger(Behavior::Panic);
        let context = context(&executor);

        let resumed = AssertUnwindSafe(executor.execute(&parameters(), &context))
            .catch_unwind()
            .await;

        let payload = resumed.expect_err("panic must be resumed");
        assert_eq!(payload.downcast_ref::<&str>(), Some(&"lookup exploded"));
    }
}
