//! Wire-level response envelopes and the [`ResponseBuilder`].
//!
//! Every response is an [`HttpResponse`]: a transport status code, a data
//! envelope and a header map. The status code is never chosen directly; it is
//! always derived from a domain [`Status`] through the builder's
//! [`StatusMapper`].
//!
//! Envelopes serialize as:
//!
//! ```json
//! { "success": { "id": 1 }, "status": "OK", "timestamp": "2024-05-01T12:00:00.000Z" }
//! { "error": { "message": "The email a@b.c was not found." }, "status": "NOT_FOUND" }
//! ```

use crate::status::{Status, StatusError, StatusMapper, StatusSuccess};
use chrono::{DateTime, SecondsFormat, Utc};
use http::header::{HeaderMap, HeaderName, HeaderValue};
use http::StatusCode;
use indexmap::IndexMap;
use parking_lot::RwLock;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::sync::Arc;
use thiserror::Error;

/// A header value: a single string or a list of strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResponseHeaderValue {
    /// A single value.
    One(String),
    /// Several values for the same header.
    Many(Vec<String>),
}

impl From<&str> for ResponseHeaderValue {
    fn from(value: &str) -> Self {
        Self::One(value.to_string())
    }
}

impl From<String> for ResponseHeaderValue {
    fn from(value: String) -> Self {
        Self::One(value)
    }
}

impl From<Vec<String>> for ResponseHeaderValue {
    fn from(values: Vec<String>) -> Self {
        Self::Many(values)
    }
}

impl From<Vec<&str>> for ResponseHeaderValue {
    fn from(values: Vec<&str>) -> Self {
        Self::Many(values.into_iter().map(ToString::to_string).collect())
    }
}

/// Response headers, keyed by name in insertion order.
pub type ResponseHeaders = IndexMap<String, ResponseHeaderValue>;

/// Errors raised when converting a response for a transport.
#[derive(Debug, Error)]
pub enum ResponseError {
    /// A header name is not a valid HTTP header name.
    #[error("invalid header name '{name}': {source}")]
    InvalidHeaderName {
        /// The offending name.
        name: String,
        /// Underlying parse error.
        #[source]
        source: http::header::InvalidHeaderName,
    },

    /// A header value is not a valid HTTP header value.
    #[error("invalid value for header '{name}': {source}")]
    InvalidHeaderValue {
        /// The header the value belongs to.
        name: String,
        /// Underlying parse error.
        #[source]
        source: http::header::InvalidHeaderValue,
    },

    /// The response body could not be serialized.
    #[error("failed to serialize response body: {0}")]
    Body(#[from] serde_json::Error),
}

/// The `error` member of an error envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorMessage {
    /// Human-readable message, safe to return to clients.
    pub message: String,
}

/// The error envelope: `{ "error": { "message": .. }, "status": .. }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpResponseError {
    /// The message wrapper.
    pub error: ErrorMessage,
    /// Failure category.
    pub status: StatusError,
}

impl HttpResponseError {
    /// Creates an error envelope.
    #[must_use]
    pub fn new(message: impl Into<String>, status: StatusError) -> Self {
        Self {
            error: ErrorMessage {
                message: message.into(),
            },
            status,
        }
    }

    /// Creates an `INTERNAL_ERROR` envelope.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(message, StatusError::InternalError)
    }

    /// Returns the message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.error.message
    }
}

/// The success envelope: `{ "success": .., "status": .. }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpResponseSuccess<T> {
    /// The payload.
    pub success: T,
    /// Success category.
    pub status: StatusSuccess,
}

impl<T> HttpResponseSuccess<T> {
    /// Creates a success envelope.
    pub const fn new(success: T, status: StatusSuccess) -> Self {
        Self { success, status }
    }

    /// Creates an `OK` envelope.
    pub const fn ok(success: T) -> Self {
        Self::new(success, StatusSuccess::Ok)
    }
}

/// A timestamp member injected next to an envelope's fields.
///
/// Serializes as a single `key: "<ISO-8601 UTC, millisecond precision>"`
/// entry so it can be flattened into the surrounding object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Timestamp {
    /// Field name.
    pub key: String,
    /// Instant the response was built.
    pub at: DateTime<Utc>,
}

impl Timestamp {
    /// Returns the ISO-8601 rendering, e.g. `2024-05-01T12:00:00.000Z`.
    #[must_use]
    pub fn to_iso_string(&self) -> String {
        self.at.to_rfc3339_opts(SecondsFormat::Millis, true)
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(&self.key, &self.to_iso_string())?;
        map.end()
    }
}

/// An envelope with an optional timestamp field merged into it.
///
/// Without a timestamp the body serializes unchanged, whatever its shape.
/// With a timestamp present, `T` must serialize as a map (every envelope in
/// this module does).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stamped<T> {
    /// The envelope.
    pub body: T,
    /// The timestamp, when enabled.
    pub timestamp: Option<Timestamp>,
}

impl<T: Serialize> Serialize for Stamped<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        #[derive(Serialize)]
        struct Merged<'a, B> {
            #[serde(flatten)]
            body: &'a B,
            #[serde(flatten)]
            timestamp: &'a Timestamp,
        }

        match &self.timestamp {
            None => self.body.serialize(serializer),
            Some(timestamp) => Merged {
                body: &self.body,
                timestamp,
            }
            .serialize(serializer),
        }
    }
}

impl<T> Stamped<T> {
    /// Returns the timestamp field, if any.
    #[must_use]
    pub const fn timestamp(&self) -> Option<&Timestamp> {
        self.timestamp.as_ref()
    }
}

/// Either envelope, as produced by a dispatcher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ResponseData<S> {
    /// A success envelope.
    Success(Stamped<HttpResponseSuccess<S>>),
    /// An error envelope.
    Failure(Stamped<HttpResponseError>),
}

impl<S> ResponseData<S> {
    /// Returns the success envelope, if any.
    #[must_use]
    pub const fn success(&self) -> Option<&HttpResponseSuccess<S>> {
        match self {
            Self::Success(stamped) => Some(&stamped.body),
            Self::Failure(_) => None,
        }
    }

    /// Returns the error envelope, if any.
    #[must_use]
    pub const fn error(&self) -> Option<&HttpResponseError> {
        match self {
            Self::Failure(stamped) => Some(&stamped.body),
            Self::Success(_) => None,
        }
    }

    /// Returns the envelope's domain status.
    #[must_use]
    pub fn status(&self) -> Status {
        match self {
            Self::Success(stamped) => stamped.body.status.into(),
            Self::Failure(stamped) => stamped.body.status.into(),
        }
    }
}

/// A built response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HttpResponse<T> {
    /// Transport status code, derived from the envelope's status.
    #[serde(serialize_with = "status_code_serde::serialize")]
    pub status_code: StatusCode,
    /// The envelope.
    pub data: T,
    /// Response headers.
    pub headers: ResponseHeaders,
}

impl<T> HttpResponse<T> {
    /// Transforms the envelope, keeping status code and headers.
    pub fn map<U>(self, op: impl FnOnce(T) -> U) -> HttpResponse<U> {
        HttpResponse {
            status_code: self.status_code,
            data: op(self.data),
            headers: self.headers,
        }
    }

    /// Converts the headers into an [`http::HeaderMap`].
    pub fn header_map(&self) -> Result<HeaderMap, ResponseError> {
        let mut map = HeaderMap::with_capacity(self.headers.len());
        for (name, value) in &self.headers {
            let header_name = HeaderName::from_bytes(name.as_bytes()).map_err(|source| {
                ResponseError::InvalidHeaderName {
                    name: name.clone(),
                    source,
                }
            })?;
            let values = match value {
                ResponseHeaderValue::One(value) => std::slice::from_ref(value),
                ResponseHeaderValue::Many(values) => values.as_slice(),
            };
            for value in values {
                let header_value = HeaderValue::from_str(value).map_err(|source| {
                    ResponseError::InvalidHeaderValue {
                        name: name.clone(),
                        source,
                    }
                })?;
                map.append(header_name.clone(), header_value);
            }
        }
        Ok(map)
    }
}

impl<T: Serialize> HttpResponse<T> {
    /// Converts into an [`http::Response`] with a JSON body.
    pub fn into_http(self) -> Result<http::Response<Vec<u8>>, ResponseError> {
        let headers = self.header_map()?;
        let body = serde_json::to_vec(&self.data)?;
        let mut response = http::Response::new(body);
        *response.status_mut() = self.status_code;
        *response.headers_mut() = headers;
        Ok(response)
    }
}

mod status_code_serde {
    use http::StatusCode;
    use serde::Serializer;

    #[allow(clippy::trivially_copy_pass_by_ref)]
    pub fn serialize<S: Serializer>(code: &StatusCode, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u16(code.as_u16())
    }
}

/// Construction options for a [`ResponseBuilder`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseBuilderOptions {
    /// Headers added to every response.
    pub default_headers: ResponseHeaders,
    /// Whether envelopes carry a timestamp field.
    pub include_timestamp: bool,
    /// Name of the timestamp field.
    pub timestamp_key: String,
}

impl Default for ResponseBuilderOptions {
    fn default() -> Self {
        Self {
            default_headers: ResponseHeaders::new(),
            include_timestamp: false,
            timestamp_key: "timestamp".to_string(),
        }
    }
}

/// Builds response envelopes.
///
/// The default headers are shared configuration: they can be changed at
/// runtime with [`set_default_header`](Self::set_default_header) and every
/// build reads a consistent snapshot of them.
///
/// # Example
///
/// ```
/// use http::StatusCode;
/// use phont_core::{HttpStatusMapper, ResponseBuilder, StatusSuccess};
/// use std::sync::Arc;
///
/// let builder = ResponseBuilder::create_minimal(Arc::new(HttpStatusMapper::new()));
/// let response = builder.build_success_response("hello", StatusSuccess::Created, None);
///
/// assert_eq!(response.status_code, StatusCode::CREATED);
/// assert_eq!(response.data.body.success, "hello");
/// assert!(response.data.timestamp.is_none());
/// ```
pub struct ResponseBuilder {
    status_mapper: Arc<dyn StatusMapper>,
    default_headers: RwLock<ResponseHeaders>,
    include_timestamp: bool,
    timestamp_key: String,
}

impl ResponseBuilder {
    /// Creates a builder.
    #[must_use]
    pub fn new(status_mapper: Arc<dyn StatusMapper>, options: ResponseBuilderOptions) -> Self {
        Self {
            status_mapper,
            default_headers: RwLock::new(options.default_headers),
            include_timestamp: options.include_timestamp,
            timestamp_key: options.timestamp_key,
        }
    }

    /// The "default" preset: JSON content type, `X-Powered-By: PHONT`, timestamps on.
    #[must_use]
    pub fn create_default(status_mapper: Arc<dyn StatusMapper>) -> Self {
        let mut default_headers = ResponseHeaders::new();
        default_headers.insert("Content-Type".to_string(), "application/json".into());
        default_headers.insert("X-Powered-By".to_string(), "PHONT".into());
        Self::new(
            status_mapper,
            ResponseBuilderOptions {
                default_headers,
                include_timestamp: true,
                ..ResponseBuilderOptions::default()
            },
        )
    }

    /// The "minimal" preset: JSON content type only, no timestamps.
    #[must_use]
    pub fn create_minimal(status_mapper: Arc<dyn StatusMapper>) -> Self {
        let mut default_headers = ResponseHeaders::new();
        default_headers.insert("Content-Type".to_string(), "application/json".into());
        Self::new(
            status_mapper,
            ResponseBuilderOptions {
                default_headers,
                include_timestamp: false,
                ..ResponseBuilderOptions::default()
            },
        )
    }

    /// Wraps `data` as `{success, status}`.
    pub fn build_success_response<T>(
        &self,
        data: T,
        status: StatusSuccess,
        headers: Option<ResponseHeaders>,
    ) -> HttpResponse<Stamped<HttpResponseSuccess<T>>> {
        self.build(HttpResponseSuccess::new(data, status), status.into(), headers)
    }

    /// Passes the error envelope through as the response data.
    pub fn build_error_response(
        &self,
        error: HttpResponseError,
        headers: Option<ResponseHeaders>,
    ) -> HttpResponse<Stamped<HttpResponseError>> {
        let status = error.status.into();
        self.build(error, status, headers)
    }

    /// Returns `data` without an envelope, with any status.
    ///
    /// With timestamps enabled, `T` must serialize as a map.
    pub fn build_custom_response<T>(
        &self,
        data: T,
        status: impl Into<Status>,
        headers: Option<ResponseHeaders>,
    ) -> HttpResponse<Stamped<T>> {
        self.build(data, status.into(), headers)
    }

    /// Builds an `INTERNAL_ERROR` envelope carrying `message`.
    pub fn build_internal_error_response(
        &self,
        message: impl Into<String>,
        headers: Option<ResponseHeaders>,
    ) -> HttpResponse<Stamped<HttpResponseError>> {
        self.build_error_response(HttpResponseError::internal(message), headers)
    }

    /// Sets a default header for every subsequent build.
    pub fn set_default_header(&self, key: impl Into<String>, value: impl Into<ResponseHeaderValue>) {
        self.default_headers.write().insert(key.into(), value.into());
    }

    /// Removes a default header from every subsequent build.
    pub fn remove_default_header(&self, key: &str) {
        self.default_headers.write().shift_remove(key);
    }

    /// Returns a snapshot of the default headers.
    #[must_use]
    pub fn default_headers(&self) -> ResponseHeaders {
        self.default_headers.read().clone()
    }

    /// Returns whether envelopes carry a timestamp.
    #[must_use]
    pub const fn includes_timestamp(&self) -> bool {
        self.include_timestamp
    }

    /// Returns the timestamp field name.
    #[must_use]
    pub fn timestamp_key(&self) -> &str {
        &self.timestamp_key
    }

    /// Returns the status mapper.
    #[must_use]
    pub fn status_mapper(&self) -> &Arc<dyn StatusMapper> {
        &self.status_mapper
    }

    fn build<T>(
        &self,
        body: T,
        status: Status,
        headers: Option<ResponseHeaders>,
    ) -> HttpResponse<Stamped<T>> {
        let headers = self.merge_headers(headers);
        let status_code = self.status_mapper.map_to_http_status_code(status);
        let timestamp = self.include_timestamp.then(|| Timestamp {
            key: self.timestamp_key.clone(),
            at: Utc::now(),
        });

        HttpResponse {
            status_code,
            data: Stamped { body, timestamp },
            headers,
        }
    }

    fn merge_headers(&self, additional: Option<ResponseHeaders>) -> ResponseHeaders {
        let mut merged = self.default_headers.read().clone();
        if let Some(additional) = additional {
            merged.extend(additional);
        }
        merged
    }
}

impl std::fmt::Debug for ResponseBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResponseBuilder")
            .field("default_headers", &*self.default_headers.read())
            .field("include_timestamp", &self.include_timestamp)
            .field("timestamp_key", &self.timestamp_key)
            .finish_non_exhaustive()
    }
}
