//! # Phont Test
//!
//! Test doubles for the Phont execution framework. Everything here runs in
//! memory and records what it was asked to do.
//!
//! - [`RecordingLogger`] - Records every logger call as a [`LogCall`]
//! - [`RecordingStatusMapper`] - Standard HTTP mapping that records lookups
//! - [`FixedIdGenerator`] / [`FailingIdGenerator`] - Deterministic id sources
//! - [`Timeline`] - Shared event order across doubles
//! - [`TestRequest`] - Fluent builder for [`HttpRequest`](phont_core::HttpRequest)s
//!
//! ## Example
//!
//! ```
//! use phont_test::{RecordingLogger, TestRequest};
//!
//! let logger = RecordingLogger::new();
//! let request = TestRequest::json(&serde_json::json!({ "id": 1 }))
//!     .request_id("abc-123")
//!     .build();
//!
//! assert!(logger.is_empty());
//! assert_eq!(request.body["id"], 1);
//! ```

#![doc(html_root_url = "https://docs.rs/phont-test/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod id;
mod logger;
mod mapper;
mod request;
mod timeline;

pub use id::{FailingIdGenerator, FixedIdGenerator};
pub use logger::{LogCall, RecordingLogger};
pub use mapper::RecordingStatusMapper;
pub use request::{TestHttpRequest, TestRequest, TestRequestBuilder};
pub use timeline::Timeline;
