//! Correlation identifiers and per-call logging contexts.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// An opaque identifier attached to one inbound request.
///
/// Inbound ids are taken verbatim from the request header, so the wrapped
/// value is an arbitrary string rather than a parsed UUID. Generated ids use
/// UUID v7, which is time-ordered and sorts well in log storage.
///
/// # Example
///
/// ```
/// use phont_core::CorrelationId;
///
/// let inbound = CorrelationId::from("abc-123");
/// assert_eq!(inbound.as_str(), "abc-123");
///
/// let generated = CorrelationId::generate();
/// assert_eq!(generated.as_str().len(), 36);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CorrelationId(String);

impl CorrelationId {
    /// Wraps an existing identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generates a fresh time-ordered id (UUID v7).
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::now_v7().to_string())
    }

    /// Generates a fresh random id (UUID v4).
    ///
    /// Used as the last resort when the configured id generator fails.
    #[must_use]
    pub fn random() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Returns the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `true` if the id is the empty string.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Consumes the id and returns the inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for CorrelationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CorrelationId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for CorrelationId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<Uuid> for CorrelationId {
    fn from(id: Uuid) -> Self {
        Self(id.to_string())
    }
}

impl AsRef<str> for CorrelationId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Read-only record passed to every log and metric call of one invocation.
///
/// Built once per call by the dispatcher or the caller of a use case, then
/// shared by reference. `operation_name` is the controller or use-case name,
/// `method_name` the entry point being timed (`"handle"` for dispatchers).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LoggingContext {
    /// Id correlating every log line of the call.
    pub correlation_id: CorrelationId,
    /// Controller or use-case name.
    pub operation_name: String,
    /// Method being executed.
    pub method_name: String,
}

impl LoggingContext {
    /// Creates a context.
    #[must_use]
    pub fn new(
        operation_name: impl Into<String>,
        method_name: impl Into<String>,
        correlation_id: CorrelationId,
    ) -> Self {
        Self {
            correlation_id,
            operation_name: operation_name.into(),
            method_name: method_name.into(),
        }
    }

    /// Derives a context for a nested operation sharing this correlation id.
    ///
    /// # Example
    ///
    /// ```
    /// use phont_core::{CorrelationId, LoggingContext};
    ///
    /// let controller = LoggingContext::new("SignInController", "handle", "abc".into());
    /// let use_case = controller.child("SignInUseCase", "execute");
    /// assert_eq!(use_case.correlation_id, controller.correlation_id);
    /// assert_eq!(use_case.operation_name, "SignInUseCase");
    /// ```
    #[must_use]
    pub fn child(&self, operation_name: impl Into<String>, method_name: impl Into<String>) -> Self {
        Self::new(operation_name, method_name, self.correlation_id.clone())
    }
}
