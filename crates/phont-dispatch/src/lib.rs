//! # Phont Dispatch
//!
//! Runs business operations and turns their outcomes into responses.
//!
//! - [`UseCase`] / [`UseCaseExecutor`] - Timed execution of a business
//!   operation; declared failures are returned, faults are logged and
//!   re-raised
//! - [`RestController`] / [`ControllerDispatcher`] - Correlation id
//!   resolution, response building, error logging and performance tracking
//!   around one request handler
//!
//! ## Example
//!
//! ```rust,ignore
//! use phont_dispatch::ControllerDispatcher;
//! use phont_telemetry::TracingLogger;
//! use std::sync::Arc;
//!
//! let dispatcher = ControllerDispatcher::new(SignInController::new(executor), Arc::new(TracingLogger::new()));
//! let response = dispatcher.handle(request).await;
//! let response = response.into_http()?;
//! ```

#![doc(html_root_url = "https://docs.rs/phont-dispatch/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod controller;
mod naming;
mod use_case;

pub use controller::{
    ControllerDispatcher, ControllerDispatcherBuilder, ControllerOutcome, ControllerResponse,
    RestController, CONTROLLER_METHOD, DEFAULT_REQUEST_ID_HEADER,
};
pub use naming::short_type_name;
pub use use_case::{UseCase, UseCaseExecutor, USE_CASE_METHOD};
