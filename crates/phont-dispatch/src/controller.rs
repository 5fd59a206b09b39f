//! Controllers and the dispatcher that turns their outcomes into responses.
//!
//! A [`RestController`] performs one operation per request and reports an
//! [`Outcome`]. The [`ControllerDispatcher`] wraps it and guarantees that
//! every call to [`handle`](ControllerDispatcher::handle) produces exactly
//! one response envelope:
//!
//! ```text
//! received ─► resolve correlation id ─► perform_operation
//!                                            │
//!        ┌───────────────────────────────────┼─────────────────────────┐
//!        ▼                                   ▼                         ▼
//!   Ok(success)                         Ok(failure)              Err / panic
//!   success envelope               error envelope + log     log + INTERNAL_ERROR
//!        │                                   │                         │
//!        └──────────────► track (timing, sanitized payloads) ◄─────────┘
//! ```

use crate::naming::short_type_name;
use futures_util::FutureExt;
use http::header::HeaderName;
use phont_core::contracts::{
    ControllerLogger, EntryContext, IdGenerator, LogErrorEntry, UuidIdGenerator,
};
use phont_core::{
    single_header_value, CorrelationId, Fault, HeaderSource, HttpResponse, HttpResponseError,
    HttpResponseSuccess, HttpStatusMapper, IdTarget, LogValue, LoggingContext, Outcome,
    ResponseBuilder, ResponseData, ValueObjectName,
};
use phont_telemetry::{PerformanceTracker, SensitiveDataSanitizer, TrackRequest};
use serde::Serialize;
use std::future::Future;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Instant;
use tracing::Instrument;

/// Header carrying the inbound correlation id unless configured otherwise.
pub const DEFAULT_REQUEST_ID_HEADER: &str = "x-request-id";

/// Method name used in controller logging contexts.
pub const CONTROLLER_METHOD: &str = "handle";

/// What a dispatcher returns: either envelope with its status code and headers.
pub type ControllerResponse<S> = HttpResponse<ResponseData<S>>;

/// What a controller operation reports: a declared failure or a success
/// envelope carrying its status.
pub type ControllerOutcome<F, S> = Outcome<F, HttpResponseSuccess<S>>;

/// A request handler reporting its result as an [`Outcome`].
///
/// # Example
///
/// ```rust,ignore
/// use phont_core::{success, HttpRequest, HttpResponseError, HttpResponseSuccess, LoggingContext, Outcome};
/// use phont_dispatch::RestController;
///
/// struct HealthController;
///
/// impl RestController for HealthController {
///     type Request = HttpRequest;
///     type Failure = HttpResponseError;
///     type Success = &'static str;
///
///     async fn perform_operation(
///         &self,
///         _request: &HttpRequest,
///         _context: &LoggingContext,
///     ) -> anyhow::Result<Outcome<HttpResponseError, HttpResponseSuccess<&'static str>>> {
///         Ok(success(HttpResponseSuccess::ok("up")))
///     }
/// }
/// ```
pub trait RestController: Send + Sync {
    /// Inbound request. Logged (sanitized) with every timing entry.
    type Request: HeaderSource + Serialize + Send + Sync;
    /// Declared failure. Logged as-is, then converted to the error envelope.
    type Failure: Into<HttpResponseError> + Serialize + Send;
    /// Success payload.
    type Success: Serialize + Send;

    /// Name used in log messages and metrics. Defaults to the type name.
    fn name(&self) -> &'static str {
        short_type_name::<Self>()
    }

    /// Handles one request.
    ///
    /// `context` carries the call's correlation id, to be handed to any use
    /// case the controller runs. Return `Ok(failure(..))` for expected
    /// failures and `Err` only for genuine faults.
    fn perform_operation(
        &self,
        request: &Self::Request,
        context: &LoggingContext,
    ) -> impl Future<Output = anyhow::Result<ControllerOutcome<Self::Failure, Self::Success>>> + Send;
}

/// Wraps a [`RestController`] and converts every call into a response.
pub struct ControllerDispatcher<C> {
    controller: C,
    logger: Arc<dyn ControllerLogger>,
    response_builder: Arc<ResponseBuilder>,
    tracker: PerformanceTracker,
    id_generator: Arc<dyn IdGenerator>,
    request_id_header: HeaderName,
}

impl<C: RestController> ControllerDispatcher<C> {
    /// Creates a dispatcher with the default response builder, sanitizer,
    /// id generator and request id header.
    pub fn new(controller: C, logger: Arc<dyn ControllerLogger>) -> Self {
        Self::builder(controller, logger).build()
    }

    /// Starts building a dispatcher.
    pub fn builder(controller: C, logger: Arc<dyn ControllerLogger>) -> ControllerDispatcherBuilder<C> {
        ControllerDispatcherBuilder::new(controller, logger)
    }

    /// Returns the wrapped controller.
    pub const fn controller(&self) -> &C {
        &self.controller
    }

    /// Returns the response builder.
    pub const fn response_builder(&self) -> &Arc<ResponseBuilder> {
        &self.response_builder
    }

    /// Returns the performance tracker.
    pub const fn tracker(&self) -> &PerformanceTracker {
        &self.tracker
    }

    /// Returns the header the correlation id is read from.
    pub const fn request_id_header(&self) -> &HeaderName {
        &self.request_id_header
    }

    /// Handles one request. Never fails and never panics on account of the
    /// controller.
    pub async fn handle(&self, request: C::Request) -> ControllerResponse<C::Success> {
        let started_at = Instant::now();
        let context = self.create_logging_context(&request);
        let span = tracing::info_span!(
            "dispatch",
            controller = %context.operation_name,
            correlation_id = %context.correlation_id,
        );

        self.dispatch(request, context, started_at).instrument(span).await
    }

    async fn dispatch(
        &self,
        request: C::Request,
        context: LoggingContext,
        started_at: Instant,
    ) -> ControllerResponse<C::Success> {
        let result = AssertUnwindSafe(self.controller.perform_operation(&request, &context))
            .catch_unwind()
            .await;

        match result {
            Ok(Ok(Outcome::Failure(failure))) => {
                let value = LogValue::from_serialize(&failure);
                let response = self.response_builder.build_error_response(failure.into(), None);
                self.log_error(value, &context);
                self.track(&request, &response.data, &context, false, started_at);
                response.map(ResponseData::Failure)
            }
            Ok(Ok(Outcome::Success(success))) => {
                let response =
                    self.response_builder
                        .build_success_response(success.success, success.status, None);
                self.track(&request, &response.data, &context, true, started_at);
                response.map(ResponseData::Success)
            }
            Ok(Err(error)) => {
                self.handle_unexpected_error(Fault::Error(error), &request, &context, started_at)
            }
            Err(payload) => {
                self.handle_unexpected_error(Fault::from_panic(payload), &request, &context, started_at)
            }
        }
    }

    fn handle_unexpected_error(
        &self,
        fault: Fault,
        request: &C::Request,
        context: &LoggingContext,
        started_at: Instant,
    ) -> ControllerResponse<C::Success> {
        self.log_error(fault.to_log_value(), context);
        let response = self
            .response_builder
            .build_internal_error_response(fault.message(), None);
        self.track(request, &response.data, context, false, started_at);
        response.map(ResponseData::Failure)
    }

    /// Builds the logging context of one call.
    pub fn create_logging_context(&self, request: &C::Request) -> LoggingContext {
        LoggingContext::new(
            self.controller.name(),
            CONTROLLER_METHOD,
            self.extract_request_id(request),
        )
    }

    /// Resolves the correlation id of a request.
    ///
    /// Uses the request id header when it is present exactly once; otherwise
    /// asks the id generator, and falls back to a random id when the request
    /// has no headers at all or generation fails.
    pub fn extract_request_id(&self, request: &C::Request) -> CorrelationId {
        let Some(headers) = request.headers() else {
            return CorrelationId::random();
        };
        if let Some(value) = single_header_value(headers, &self.request_id_header) {
            return CorrelationId::new(value);
        }

        let target = IdTarget::ValueObject(ValueObjectName::RequestId);
        match catch_unwind(AssertUnwindSafe(|| self.id_generator.generate(target))) {
            Ok(Outcome::Success(id)) => id,
            Ok(Outcome::Failure(error)) => {
                tracing::debug!(%error, "request id generation failed, using a random id");
                CorrelationId::random()
            }
            Err(_) => {
                tracing::debug!("request id generator panicked, using a random id");
                CorrelationId::random()
            }
        }
    }

    fn log_error(&self, value: LogValue, context: &LoggingContext) {
        let location = format!("{}.{}()", context.operation_name, context.method_name);
        let message = if context.correlation_id.is_empty() {
            format!("{location} error")
        } else {
            format!("{location} error [RequestID: {}]", context.correlation_id)
        };

        let entry = LogErrorEntry {
            message,
            value,
            context: EntryContext::from(context),
        };
        if catch_unwind(AssertUnwindSafe(|| self.logger.send_log_error(entry))).is_err() {
            tracing::warn!(
                controller = %context.operation_name,
                correlation_id = %context.correlation_id,
                "error logger panicked"
            );
        }
    }

    fn track<Res: Serialize>(
        &self,
        request: &C::Request,
        response: &Res,
        context: &LoggingContext,
        is_success: bool,
        started_at: Instant,
    ) {
        self.tracker.track_request(TrackRequest {
            request,
            response,
            context,
            is_success,
            started_at,
        });
    }
}

impl<C> std::fmt::Debug for ControllerDispatcher<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ControllerDispatcher")
            .field("controller", &short_type_name::<C>())
            .field("request_id_header", &self.request_id_header)
            .finish_non_exhaustive()
    }
}

/// Builder for [`ControllerDispatcher`].
#[must_use]
pub struct ControllerDispatcherBuilder<C> {
    controller: C,
    logger: Arc<dyn ControllerLogger>,
    response_builder: Option<Arc<ResponseBuilder>>,
    sanitizer: Option<Arc<SensitiveDataSanitizer>>,
    id_generator: Option<Arc<dyn IdGenerator>>,
    request_id_header: Option<HeaderName>,
}

impl<C: RestController> ControllerDispatcherBuilder<C> {
    /// Creates a builder.
    pub fn new(controller: C, logger: Arc<dyn ControllerLogger>) -> Self {
        Self {
            controller,
            logger,
            response_builder: None,
            sanitizer: None,
            id_generator: None,
            request_id_header: None,
        }
    }

    /// Sets the response builder. Defaults to the "default" preset with
    /// the standard HTTP status mapping.
    pub fn response_builder(mut self, response_builder: Arc<ResponseBuilder>) -> Self {
        self.response_builder = Some(response_builder);
        self
    }

    /// Sets the sanitizer used by the performance tracker.
    pub fn sanitizer(mut self, sanitizer: Arc<SensitiveDataSanitizer>) -> Self {
        self.sanitizer = Some(sanitizer);
        self
    }

    /// Sets the id generator. Defaults to UUID v7 ids.
    pub fn id_generator(mut self, id_generator: Arc<dyn IdGenerator>) -> Self {
        self.id_generator = Some(id_generator);
        self
    }

    /// Sets the header the correlation id is read from.
    pub fn request_id_header(mut self, header: HeaderName) -> Self {
        self.request_id_header = Some(header);
        self
    }

    /// Builds the dispatcher.
    pub fn build(self) -> ControllerDispatcher<C> {
        let response_builder = self.response_builder.unwrap_or_else(|| {
            Arc::new(ResponseBuilder::create_default(Arc::new(HttpStatusMapper::new())))
        });
        let sanitizer = self.sanitizer.unwrap_or_default();
        let tracker = PerformanceTracker::new(self.logger.clone(), sanitizer);

        ControllerDispatcher {
            controller: self.controller,
            logger: self.logger,
            response_builder,
            tracker,
            id_generator: self
                .id_generator
                .unwrap_or_else(|| Arc::new(UuidIdGenerator)),
            request_id_header: self
                .request_id_header
                .unwrap_or_else(|| HeaderName::from_static(DEFAULT_REQUEST_ID_HEADER)),
        }
    }
}
