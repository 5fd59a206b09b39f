//! Test request building.

use http::header::{HeaderMap, HeaderName, HeaderValue};
use phont_core::HttpRequest;
use serde::Serialize;
use serde_json::Value;

/// Request type produced by [`TestRequest`].
pub type TestHttpRequest = HttpRequest<Value, Value>;

/// Entry point for building test requests.
pub struct TestRequest;

impl TestRequest {
    /// Starts a request with a JSON body.
    ///
    /// # Panics
    ///
    /// Panics if `body` cannot be serialized.
    pub fn json<T: Serialize>(body: &T) -> TestRequestBuilder {
        TestRequestBuilder::new().json(body)
    }

    /// Starts a request with an empty body.
    pub fn empty() -> TestRequestBuilder {
        TestRequestBuilder::new()
    }
}

/// Builder for constructing test requests.
#[must_use]
#[derive(Debug, Default)]
pub struct TestRequestBuilder {
    body: Value,
    params: Value,
    headers: HeaderMap,
}

impl TestRequestBuilder {
    /// Creates a builder with a `null` body and parameters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a header.
    ///
    /// # Panics
    ///
    /// Panics if the header name or value is invalid.
    pub fn header(mut self, name: impl AsRef<str>, value: impl AsRef<str>) -> Self {
        let name = HeaderName::try_from(name.as_ref()).expect("invalid header name");
        let value = HeaderValue::try_from(value.as_ref()).expect("invalid header value");
        self.headers.append(name, value);
        self
    }

    /// Sets the `x-request-id` header.
    pub fn request_id(self, id: impl AsRef<str>) -> Self {
        self.header("x-request-id", id)
    }

    /// Sets the body.
    ///
    /// # Panics
    ///
    /// Panics if `body` cannot be serialized.
    pub fn json<T: Serialize>(mut self, body: &T) -> Self {
        self.body = serde_json::to_value(body).expect("failed to serialize body");
        self
    }

    /// Sets the parameters.
    ///
    /// # Panics
    ///
    /// Panics if `params` cannot be serialized.
    pub fn params<T: Serialize>(mut self, params: &T) -> Self {
        self.params = serde_json::to_value(params).expect("failed to serialize params");
        self
    }

    /// Builds the request.
    pub fn build(self) -> TestHttpRequest {
        HttpRequest::new(self.body)
            .with_params(self.params)
            .with_headers(self.headers)
    }
}
