//! Structured data handed to the logging path.
//!
//! [`LogValue`] is a JSON-like tree with a few extra node kinds that plain
//! JSON cannot express:
//!
//! - [`LogValue::Timestamp`] and [`LogValue::Error`] keep dates and errors
//!   typed until they are rendered.
//! - [`LogValue::Shared`] is a reference-counted, mutable node. Shared nodes
//!   can form cycles, which the sanitizer detects by node identity.
//! - [`LogValue::Opaque`] stands for a value that cannot be rendered at all
//!   (for example a type whose `Serialize` impl failed).
//!
//! Most callers build values from anything `Serialize` via
//! [`LogValue::from_serialize`], or from a `serde_json::Value`.

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// A structured value to be sanitized and logged.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum LogValue {
    /// Absent value.
    #[default]
    Null,
    /// A boolean.
    Bool(bool),
    /// A finite number.
    Number(serde_json::Number),
    /// A string.
    String(String),
    /// A point in time, rendered as ISO-8601.
    Timestamp(DateTime<Utc>),
    /// An error, rendered as `{name, message, stack}`.
    Error(ErrorRecord),
    /// An ordered list.
    Array(Vec<LogValue>),
    /// An insertion-ordered map.
    Object(IndexMap<String, LogValue>),
    /// A shared node that may be referenced from several places.
    Shared(SharedValue),
    /// A value that cannot be rendered; carries a short description.
    Opaque(&'static str),
}

impl LogValue {
    /// Builds an object from key/value pairs.
    ///
    /// # Example
    ///
    /// ```
    /// use phont_core::LogValue;
    ///
    /// let value = LogValue::object([("email", "ada@example.com"), ("password", "hunter2")]);
    /// assert!(matches!(value, LogValue::Object(ref map) if map.len() == 2));
    /// ```
    pub fn object<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Self>,
    {
        Self::Object(
            entries
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        )
    }

    /// Converts any serializable value.
    ///
    /// A value whose `Serialize` impl fails becomes [`LogValue::Opaque`]
    /// carrying the type name, so the logging path can still summarize it.
    pub fn from_serialize<T: Serialize + ?Sized>(value: &T) -> Self {
        match serde_json::to_value(value) {
            Ok(json) => json.into(),
            Err(_) => Self::Opaque(std::any::type_name::<T>()),
        }
    }

    /// Wraps this value in a new shared node.
    pub fn into_shared(self) -> SharedValue {
        SharedValue::new(self)
    }

    /// Returns `true` for `Null`.
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

impl From<bool> for LogValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for LogValue {
    fn from(value: i64) -> Self {
        Self::Number(value.into())
    }
}

impl From<i32> for LogValue {
    fn from(value: i32) -> Self {
        Self::Number(value.into())
    }
}

impl From<u64> for LogValue {
    fn from(value: u64) -> Self {
        Self::Number(value.into())
    }
}

impl From<usize> for LogValue {
    fn from(value: usize) -> Self {
        Self::Number(value.into())
    }
}

impl From<f64> for LogValue {
    fn from(value: f64) -> Self {
        serde_json::Number::from_f64(value).map_or(Self::Null, Self::Number)
    }
}

impl From<&str> for LogValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for LogValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<DateTime<Utc>> for LogValue {
    fn from(value: DateTime<Utc>) -> Self {
        Self::Timestamp(value)
    }
}

impl From<ErrorRecord> for LogValue {
    fn from(value: ErrorRecord) -> Self {
        Self::Error(value)
    }
}

impl From<SharedValue> for LogValue {
    fn from(value: SharedValue) -> Self {
        Self::Shared(value)
    }
}

impl<T: Into<LogValue>> From<Vec<T>> for LogValue {
    fn from(values: Vec<T>) -> Self {
        Self::Array(values.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<LogValue>> From<Option<T>> for LogValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

impl From<serde_json::Value> for LogValue {
    fn from(value: serde_json::Value) -> Self {
        use serde_json::Value;
        match value {
            Value::Null => Self::Null,
            Value::Bool(value) => Self::Bool(value),
            Value::Number(value) => Self::Number(value),
            Value::String(value) => Self::String(value),
            Value::Array(values) => Self::Array(values.into_iter().map(Into::into).collect()),
            Value::Object(map) => Self::Object(
                map.into_iter()
                    .map(|(key, value)| (key, value.into()))
                    .collect(),
            ),
        }
    }
}

/// The rendered shape of an error value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorRecord {
    /// Error type name.
    pub name: String,
    /// Display message.
    pub message: String,
    /// Diagnostic detail (source chain), if available.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stack: Option<String>,
}

impl ErrorRecord {
    /// Creates a record without a stack.
    #[must_use]
    pub fn new(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            message: message.into(),
            stack: None,
        }
    }

    /// Captures an `anyhow` error, using its debug output (which lists the
    /// cause chain) as the stack.
    #[must_use]
    pub fn from_anyhow(error: &anyhow::Error) -> Self {
        Self {
            name: "Error".to_string(),
            message: error.to_string(),
            stack: Some(format!("{error:?}")),
        }
    }

    /// Captures any standard error and its source chain.
    #[must_use]
    pub fn from_error(error: &(dyn std::error::Error + 'static)) -> Self {
        let mut stack = error.to_string();
        let mut source = error.source();
        while let Some(cause) = source {
            stack.push_str("\n    caused by: ");
            stack.push_str(&cause.to_string());
            source = cause.source();
        }
        Self {
            name: "Error".to_string(),
            message: error.to_string(),
            stack: Some(stack),
        }
    }
}

/// A shared, mutable [`LogValue`] node.
///
/// Clones point at the same node. Identity (not content) is what the
/// sanitizer uses to detect cycles.
///
/// # Example
///
/// ```
/// use phont_core::{LogValue, SharedValue};
///
/// let node = SharedValue::new(LogValue::object([("name", "root")]));
/// node.insert("self", node.clone());
/// assert_eq!(node.id(), node.clone().id());
/// ```
#[derive(Clone, Default)]
pub struct SharedValue(Arc<RwLock<LogValue>>);

impl SharedValue {
    /// Creates a node holding `value`.
    #[must_use]
    pub fn new(value: LogValue) -> Self {
        Self(Arc::new(RwLock::new(value)))
    }

    /// Returns the node identity.
    #[must_use]
    pub fn id(&self) -> usize {
        Arc::as_ptr(&self.0).cast::<()>() as usize
    }

    /// Returns `true` if both handles point at the same node.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// Reads the node, blocking while a writer holds it.
    pub fn read(&self) -> RwLockReadGuard<'_, LogValue> {
        self.0.read()
    }

    /// Reads the node without blocking. Returns `None` while a writer holds it.
    pub fn try_read(&self) -> Option<RwLockReadGuard<'_, LogValue>> {
        self.0.try_read()
    }

    /// Locks the node for writing. Sanitizing a value that reaches this node
    /// while the guard is held falls back to the summary rendering.
    pub fn write(&self) -> RwLockWriteGuard<'_, LogValue> {
        self.0.write()
    }

    /// Replaces the node contents.
    pub fn set(&self, value: impl Into<LogValue>) {
        *self.0.write() = value.into();
    }

    /// Inserts a key into the node if it holds an object.
    ///
    /// Returns `false` (leaving the node unchanged) for any other node kind.
    pub fn insert(&self, key: impl Into<String>, value: impl Into<LogValue>) -> bool {
        match &mut *self.0.write() {
            LogValue::Object(map) => {
                map.insert(key.into(), value.into());
                true
            }
            _ => false,
        }
    }

    /// Appends to the node if it holds an array.
    ///
    /// Returns `false` (leaving the node unchanged) for any other node kind.
    pub fn push(&self, value: impl Into<LogValue>) -> bool {
        match &mut *self.0.write() {
            LogValue::Array(values) => {
                values.push(value.into());
                true
            }
            _ => false,
        }
    }
}

impl PartialEq for SharedValue {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

// Contents are not printed: a cyclic node would recurse forever.
impl fmt::Debug for SharedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SharedValue({:#x})", self.id())
    }
}
