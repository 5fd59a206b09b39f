//! Genuine faults: failures that were not declared as an [`Outcome`].
//!
//! A wrapped operation can fail in two undeclared ways: by returning `Err`
//! (an [`anyhow::Error`]) or by panicking. [`Fault`] unifies both so the
//! executor and dispatcher can log them, extract a safe message, and either
//! re-raise or translate them.
//!
//! [`Outcome`]: crate::Outcome

use crate::value::{ErrorRecord, LogValue};
use std::any::Any;
use std::fmt;

/// Message used when nothing readable can be extracted from a fault.
pub const UNEXPECTED_ERROR_MESSAGE: &str = "An unexpected error occurred";

/// A failure raised by a wrapped operation instead of a declared outcome.
pub enum Fault {
    /// The operation returned `Err`.
    Error(anyhow::Error),
    /// The operation panicked; holds the panic payload.
    Panic(Box<dyn Any + Send + 'static>),
}

impl Fault {
    /// Wraps a payload caught by `catch_unwind`.
    #[must_use]
    pub fn from_panic(payload: Box<dyn Any + Send + 'static>) -> Self {
        Self::Panic(payload)
    }

    /// Returns `true` for the panic variant.
    #[must_use]
    pub const fn is_panic(&self) -> bool {
        matches!(self, Self::Panic(_))
    }

    /// Extracts a human-readable message.
    ///
    /// - an error yields its display text;
    /// - a string panic payload yields the string itself;
    /// - a JSON payload with a string `message` field yields that field;
    /// - anything else yields [`UNEXPECTED_ERROR_MESSAGE`].
    ///
    /// # Example
    ///
    /// ```
    /// use phont_core::Fault;
    ///
    /// let fault = Fault::from(anyhow::anyhow!("boom"));
    /// assert_eq!(fault.message(), "boom");
    ///
    /// let fault = Fault::from_panic(Box::new(42_u8));
    /// assert_eq!(fault.message(), "An unexpected error occurred");
    /// ```
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::Error(error) => error.to_string(),
            Self::Panic(payload) => panic_message(payload.as_ref())
                .unwrap_or_else(|| UNEXPECTED_ERROR_MESSAGE.to_string()),
        }
    }

    /// Renders the fault as a loggable value.
    #[must_use]
    pub fn to_log_value(&self) -> LogValue {
        match self {
            Self::Error(error) => LogValue::Error(ErrorRecord::from_anyhow(error)),
            Self::Panic(payload) => {
                if let Some(value) = payload.downcast_ref::<serde_json::Value>() {
                    return value.clone().into();
                }
                match panic_message(payload.as_ref()) {
                    Some(message) => LogValue::Error(ErrorRecord::new("Panic", message)),
                    None => LogValue::Opaque("panic payload"),
                }
            }
        }
    }

    /// Hands the fault back to the caller's caller.
    ///
    /// Errors are returned as-is for `?` propagation; panics are resumed with
    /// their original payload.
    pub fn rethrow(self) -> anyhow::Error {
        match self {
            Self::Error(error) => error,
            Self::Panic(payload) => std::panic::resume_unwind(payload),
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> Option<String> {
    if let Some(message) = payload.downcast_ref::<&'static str>() {
        return Some((*message).to_string());
    }
    if let Some(message) = payload.downcast_ref::<String>() {
        return Some(message.clone());
    }
    if let Some(error) = payload.downcast_ref::<anyhow::Error>() {
        return Some(error.to_string());
    }
    if let Some(value) = payload.downcast_ref::<serde_json::Value>() {
        return value
            .get("message")
            .and_then(serde_json::Value::as_str)
            .map(ToString::to_string);
    }
    None
}

impl From<anyhow::Error> for Fault {
    fn from(error: anyhow::Error) -> Self {
        Self::Error(error)
    }
}

impl fmt::Debug for Fault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Error(error) => f.debug_tuple("Error").field(error).finish(),
            Self::Panic(_) => f.debug_tuple("Panic").field(&self.message()).finish(),
        }
    }
}

impl fmt::Display for Fault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_error_message() {
        let fault = Fault::from(anyhow::anyhow!("boom"));
        assert_eq!(fault.message(), "boom");
        assert!(!fault.is_panic());
    }

    #[test]
    fn test_str_panic_message() {
        let fault = Fault::from_panic(Box::new("boom"));
        assert_eq!(fault.message(), "boom");
        assert!(fault.is_panic());
    }

    #[test]
    fn test_string_panic_message() {
        let fault = Fault::from_panic(Box::new(String::from("formatted boom")));
        assert_eq!(fault.message(), "formatted boom");
    }

    #[test]
    fn test_nested_message_field() {
        let fault = Fault::from_panic(Box::new(json!({ "message": "nested", "code": 7 })));
        assert_eq!(fault.message(), "nested");
    }

    #[test]
    fn test_fallback_message() {
        assert_eq!(Fault::from_panic(Box::new(7_i32)).message(), UNEXPECTED_ERROR_MESSAGE);
        assert_eq!(
            Fault::from_panic(Box::new(json!({ "message": 3 }))).message(),
            UNEXPECTED_ERROR_MESSAGE
        );
    }

    #[test]
    fn test_caught_panic_message() {
        let payload = std::panic::catch_unwind(|| panic!("caught {}", 1)).expect_err("panics");
        assert_eq!(Fault::from_panic(payload).message(), "caught 1");
    }

    #[test]
    fn test_log_value_shapes() {
        let error = Fault::from(anyhow::anyhow!("boom")).to_log_value();
        assert!(matches!(error, LogValue::Error(ref record) if record.message == "boom"));

        let opaque = Fault::from_panic(Box::new(7_i32)).to_log_value();
        assert_eq!(opaque, LogValue::Opaque("panic payload"));
    }

    #[test]
    fn test_rethrow_returns_same_error() {
        let fault = Fault::from(anyhow::anyhow!("boom"));
        assert_eq!(fault.rethrow().to_string(), "boom");
    }

    #[test]
    fn test_rethrow_resumes_panic() {
        let result = std::panic::catch_unwind(|| {
            let _ = Fault::from_panic(Box::new("again")).rethrow();
        });
        let payload = result.expect_err("should resume the panic");
        assert_eq!(payload.downcast_ref::<&str>(), Some(&"again"));
    }
}
