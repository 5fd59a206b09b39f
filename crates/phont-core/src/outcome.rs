//! The two-variant outcome type returned by every fallible operation.
//!
//! [`Outcome`] is how business logic reports expected results. A declared
//! business failure (an email that was not found, a password that is too
//! short) is a value, not an error: it travels back to the caller as
//! [`Outcome::Failure`] and is branched on with a `match`.
//!
//! Genuine faults (a database that went away, a bug) do not use this type.
//! They travel on the `Err` arm of the surrounding `Result` and are handled
//! by the executor and dispatcher in `phont-dispatch`.
//!
//! # Example
//!
//! ```
//! use phont_core::{failure, success, Outcome};
//!
//! fn parse_port(raw: &str) -> Outcome<String, u16> {
//!     match raw.parse() {
//!         Ok(port) => success(port),
//!         Err(_) => failure(format!("invalid port: {raw}")),
//!     }
//! }
//!
//! match parse_port("8080") {
//!     Outcome::Success(port) => assert_eq!(port, 8080),
//!     Outcome::Failure(reason) => panic!("{reason}"),
//! }
//! ```

use serde::{Deserialize, Serialize};

/// Outcome of a fallible operation: either a failure `F` or a success `S`.
///
/// Exactly one variant is populated, and the tag never changes after
/// construction. Payloads are only reachable through pattern matching or
/// the `Option`-returning accessors, so reading the wrong variant can never
/// silently produce a default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
#[must_use = "an Outcome may be a failure that must be handled"]
pub enum Outcome<F, S> {
    /// The operation concluded with a declared business failure.
    Failure(F),
    /// The operation concluded successfully.
    Success(S),
}

/// Constructs a successful [`Outcome`].
pub const fn success<F, S>(value: S) -> Outcome<F, S> {
    Outcome::Success(value)
}

/// Constructs a failed [`Outcome`].
pub const fn failure<F, S>(value: F) -> Outcome<F, S> {
    Outcome::Failure(value)
}

impl<F, S> Outcome<F, S> {
    /// Returns `true` if this is the success variant.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// Returns `true` if this is the failure variant.
    #[must_use]
    pub const fn is_failure(&self) -> bool {
        matches!(self, Self::Failure(_))
    }

    /// Returns the success payload, if any.
    #[must_use]
    pub const fn success_value(&self) -> Option<&S> {
        match self {
            Self::Success(value) => Some(value),
            Self::Failure(_) => None,
        }
    }

    /// Returns the failure payload, if any.
    #[must_use]
    pub const fn failure_value(&self) -> Option<&F> {
        match self {
            Self::Failure(value) => Some(value),
            Self::Success(_) => None,
        }
    }

    /// Consumes the outcome and returns the success payload, if any.
    #[must_use]
    pub fn into_success(self) -> Option<S> {
        match self {
            Self::Success(value) => Some(value),
            Self::Failure(_) => None,
        }
    }

    /// Consumes the outcome and returns the failure payload, if any.
    #[must_use]
    pub fn into_failure(self) -> Option<F> {
        match self {
            Self::Failure(value) => Some(value),
            Self::Success(_) => None,
        }
    }

    /// Borrows both payloads.
    pub const fn as_ref(&self) -> Outcome<&F, &S> {
        match self {
            Self::Failure(value) => Outcome::Failure(value),
            Self::Success(value) => Outcome::Success(value),
        }
    }

    /// Transforms the success payload, leaving a failure untouched.
    pub fn map<T>(self, op: impl FnOnce(S) -> T) -> Outcome<F, T> {
        match self {
            Self::Success(value) => Outcome::Success(op(value)),
            Self::Failure(value) => Outcome::Failure(value),
        }
    }

    /// Transforms the failure payload, leaving a success untouched.
    pub fn map_failure<G>(self, op: impl FnOnce(F) -> G) -> Outcome<G, S> {
        match self {
            Self::Success(value) => Outcome::Success(value),
            Self::Failure(value) => Outcome::Failure(op(value)),
        }
    }

    /// Chains another fallible step onto a success.
    pub fn and_then<T>(self, op: impl FnOnce(S) -> Outcome<F, T>) -> Outcome<F, T> {
        match self {
            Self::Success(value) => op(value),
            Self::Failure(value) => Outcome::Failure(value),
        }
    }

    /// Converts into a standard [`Result`], mapping failure to `Err`.
    pub fn into_result(self) -> Result<S, F> {
        match self {
            Self::Success(value) => Ok(value),
            Self::Failure(value) => Err(value),
        }
    }
}

impl<F, S> From<Result<S, F>> for Outcome<F, S> {
    fn from(result: Result<S, F>) -> Self {
        match result {
            Ok(value) => Self::Success(value),
            Err(value) => Self::Failure(value),
        }
    }
}

impl<F, S> From<Outcome<F, S>> for Result<S, F> {
    fn from(outcome: Outcome<F, S>) -> Self {
        outcome.into_result()
    }
}
