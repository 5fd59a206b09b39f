//! Inbound request shapes.
//!
//! Dispatchers accept any request type. The only thing they need from it is
//! optional access to its headers (to read the correlation id), expressed by
//! [`HeaderSource`]. [`HttpRequest`] is a ready-made request type with a body,
//! path/query parameters and headers.

use http::header::{HeaderMap, HeaderName, HeaderValue};
use serde::ser::{SerializeMap, SerializeStruct};
use serde::{Serialize, Serializer};

/// Optional access to a request's headers.
///
/// The default implementation reports no headers, so request types without
/// headers only need an empty `impl`.
pub trait HeaderSource {
    /// Returns the request headers, if the request carries any.
    fn headers(&self) -> Option<&HeaderMap> {
        None
    }
}

impl HeaderSource for () {}

impl HeaderSource for HeaderMap {
    fn headers(&self) -> Option<&HeaderMap> {
        Some(self)
    }
}

impl<T: HeaderSource + ?Sized> HeaderSource for &T {
    fn headers(&self) -> Option<&HeaderMap> {
        (**self).headers()
    }
}

impl<T: HeaderSource + ?Sized> HeaderSource for Box<T> {
    fn headers(&self) -> Option<&HeaderMap> {
        (**self).headers()
    }
}

/// Returns the value of `name` when the header is present exactly once and
/// is valid UTF-8.
///
/// # Example
///
/// ```
/// use http::header::{HeaderMap, HeaderName, HeaderValue};
/// use phont_core::single_header_value;
///
/// let name = HeaderName::from_static("x-request-id");
/// let mut headers = HeaderMap::new();
/// assert_eq!(single_header_value(&headers, &name), None);
///
/// headers.insert(name.clone(), HeaderValue::from_static("abc-123"));
/// assert_eq!(single_header_value(&headers, &name), Some("abc-123"));
///
/// headers.append(name.clone(), HeaderValue::from_static("def-456"));
/// assert_eq!(single_header_value(&headers, &name), None);
/// ```
#[must_use]
pub fn single_header_value<'a>(headers: &'a HeaderMap, name: &HeaderName) -> Option<&'a str> {
    let mut values = headers.get_all(name).iter();
    let value = values.next()?;
    if values.next().is_some() {
        return None;
    }
    value.to_str().ok()
}

/// A request with a body, parameters and headers.
///
/// Serializes as `{ "body": .., "params": .., "headers": { name: value } }`
/// so it can be logged; header values that are not UTF-8 are rendered
/// lossily and repeated headers become lists.
///
/// # Example
///
/// ```
/// use http::header::{HeaderName, HeaderValue};
/// use phont_core::{HeaderSource, HttpRequest};
///
/// let request = HttpRequest::new(serde_json::json!({ "email": "ada@example.com" }))
///     .with_header(
///         HeaderName::from_static("x-request-id"),
///         HeaderValue::from_static("abc-123"),
///     );
/// assert!(request.headers().is_some());
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HttpRequest<B = (), P = ()> {
    /// Request body.
    pub body: B,
    /// Path and query parameters.
    pub params: P,
    /// Request headers.
    pub headers: HeaderMap,
}

impl<B> HttpRequest<B, ()> {
    /// Creates a request with a body, no parameters and no headers.
    pub fn new(body: B) -> Self {
        Self {
            body,
            params: (),
            headers: HeaderMap::new(),
        }
    }
}

impl<B, P> HttpRequest<B, P> {
    /// Replaces the parameters.
    pub fn with_params<Q>(self, params: Q) -> HttpRequest<B, Q> {
        HttpRequest {
            body: self.body,
            params,
            headers: self.headers,
        }
    }

    /// Appends a header.
    #[must_use]
    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.append(name, value);
        self
    }

    /// Replaces all headers.
    #[must_use]
    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }
}

impl<B, P> HeaderSource for HttpRequest<B, P> {
    fn headers(&self) -> Option<&HeaderMap> {
        Some(&self.headers)
    }
}

impl<B: Serialize, P: Serialize> Serialize for HttpRequest<B, P> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("HttpRequest", 3)?;
        state.serialize_field("body", &self.body)?;
        state.serialize_field("params", &self.params)?;
        state.serialize_field("headers", &HeadersView(&self.headers))?;
        state.end()
    }
}

struct HeadersView<'a>(&'a HeaderMap);

impl Serialize for HeadersView<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.keys_len()))?;
        for name in self.0.keys() {
            let values: Vec<String> = self
                .0
                .get_all(name)
                .iter()
                .map(|value| String::from_utf8_lossy(value.as_bytes()).into_owned())
                .collect();
            match values.as_slice() {
                [single] => map.serialize_entry(name.as_str(), single)?,
                _ => map.serialize_entry(name.as_str(), &values)?,
            }
        }
        map.end()
    }
}
