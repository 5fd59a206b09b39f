//! # Phont Core
//!
//! Core types and contracts for the Phont execution framework.
//!
//! This crate provides the building blocks every other Phont crate uses:
//!
//! - [`Outcome`] - Two-variant success/failure result of a business operation
//! - [`StatusSuccess`] / [`StatusError`] - Domain status categories
//! - [`StatusMapper`] - Maps a domain status to an HTTP status code
//! - [`DomainError`] - Declared business failures
//! - [`CorrelationId`] / [`LoggingContext`] - Per-call correlation data
//! - [`LogValue`] - Structured data handed to the logging path
//! - [`Fault`] - Undeclared failures (errors and panics)
//! - [`ResponseBuilder`] - Builds wire-level response envelopes
//! - [`contracts`] - Logger, id generator, token and repository contracts

#![doc(html_root_url = "https://docs.rs/phont-core/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod contracts;
mod context;
mod error;
mod fault;
mod outcome;
mod request;
mod response;
mod status;
mod value;

pub use context::{CorrelationId, LoggingContext};
pub use error::{
    DomainError, EmailNotFoundError, GenerateIdError, IdTarget, InvalidEmailError, InvalidIdError,
    InvalidPasswordFormatError, InvalidPasswordLengthError, ModelName, ProviderError,
    ProviderName, RepositoryError, TokenProviderMethod, UserUnauthorizedError, ValueObjectName,
};
pub use fault::{Fault, UNEXPECTED_ERROR_MESSAGE};
pub use outcome::{failure, success, Outcome};
pub use request::{single_header_value, HeaderSource, HttpRequest};
pub use response::{
    ErrorMessage, HttpResponse, HttpResponseError, HttpResponseSuccess, ResponseBuilder,
    ResponseBuilderOptions, ResponseData, ResponseError, ResponseHeaderValue, ResponseHeaders,
    Stamped, Timestamp,
};
pub use status::{HttpStatusMapper, Status, StatusError, StatusMapper, StatusSuccess};
pub use value::{ErrorRecord, LogValue, SharedValue};
