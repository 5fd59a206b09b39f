//! # Phont
//!
//! **Controller dispatch and use-case execution with sanitized telemetry**
//!
//! Phont wraps application operations in a uniform execution pipeline:
//!
//! - **Result Type** – `Outcome<F, S>` keeps business failures out of the error channel
//! - **Controller Dispatcher** – Correlation ids, response envelopes and fault containment
//! - **Use-Case Executor** – Timing, structured logs and panic propagation
//! - **Sensitive Data Sanitizer** – Redacts secrets before anything is logged
//! - **Typed Configuration** – Layered TOML/JSON/env configuration
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use phont::prelude::*;
//!
//! struct HealthController;
//!
//! impl RestController for HealthController {
//!     type Request = HttpRequest;
//!     type Failure = HttpResponseError;
//!     type Success = &'static str;
//!
//!     async fn perform_operation(
//!         &self,
//!         _request: &HttpRequest,
//!         _context: &LoggingContext,
//!     ) -> anyhow::Result<ControllerOutcome<HttpResponseError, &'static str>> {
//!         Ok(success(HttpResponseSuccess::ok("up")))
//!     }
//! }
//!
//! let dispatcher = ControllerDispatcher::new(HealthController, Arc::new(TracingLogger::new()));
//! let response = dispatcher.handle(HttpRequest::new(())).await;
//! ```
//!
//! ## Architecture
//!
//! ```text
//! Request → extract correlation id → Controller → UseCaseExecutor → UseCase
//!                                        ↓
//! Response ← ResponseBuilder ← Outcome / Fault
//!     └──► PerformanceTracker → SensitiveDataSanitizer → logger provider
//! ```

#![doc(html_root_url = "https://docs.rs/phont/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Re-export core types
pub use phont_core as core;

// Re-export telemetry types
pub use phont_telemetry as telemetry;

// Re-export dispatch types
pub use phont_dispatch as dispatch;

// Re-export configuration types
pub use phont_config as config;

/// Prelude module for convenient imports.
///
/// # Example
///
/// ```rust
/// use phont::prelude::*;
///
/// let outcome: Outcome<StatusError, u32> = success(7);
/// assert!(outcome.is_success());
/// ```
pub mod prelude {
    pub use phont_core::{
        failure, success, CorrelationId, DomainError, Fault, HttpRequest, HttpResponse,
        HttpResponseError, HttpResponseSuccess, HttpStatusMapper, LogValue, LoggingContext,
        Outcome, ResponseBuilder, Status, StatusError, StatusMapper, StatusSuccess,
    };

    // Re-export collaborator contracts
    pub use phont_core::contracts::{
        ControllerLogger, IdGenerator, LoggerProvider, UseCaseLogger, UuidIdGenerator,
    };

    pub use phont_telemetry::{
        PerformanceTracker, SensitiveDataSanitizer, TelemetryConfig, TracingLogger,
    };

    pub use phont_dispatch::{
        ControllerDispatcher, ControllerOutcome, ControllerResponse, RestController, UseCase,
        UseCaseExecutor,
    };

    pub use phont_config::{ConfigLoader, PhontConfig};

    pub use std::sync::Arc;
}
