//! Declared business failures.
//!
//! Every failure an operation can declare is a [`DomainError`]: one variant
//! per kind, each wrapping a small immutable payload struct. All kinds expose
//! the same four facts:
//!
//! | Accessor | Meaning |
//! |---|---|
//! | [`DomainError::status`] | failure category, drives the HTTP status code |
//! | [`DomainError::error_message`] | human-readable message |
//! | [`DomainError::name`] | discriminant tag, e.g. `"EmailNotFoundError"` |
//! | [`DomainError::error_value`] | opaque diagnostic payload (`Null` if none) |
//!
//! The message is fixed at construction time; none of the payloads can be
//! mutated afterwards.

use crate::response::HttpResponseError;
use crate::status::StatusError;
use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;
use std::fmt;
use thiserror::Error;

/// External providers a [`ProviderError`] can originate from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderName {
    /// Token issuance and verification.
    Token,
}

impl fmt::Display for ProviderName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Token => f.write_str("token"),
        }
    }
}

/// Token provider methods that can fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenProviderMethod {
    /// Issuing a JWT.
    GenerateJwt,
    /// Verifying a JWT.
    VerifyJwt,
}

impl fmt::Display for TokenProviderMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GenerateJwt => f.write_str("generate jwt"),
            Self::VerifyJwt => f.write_str("verify jwt"),
        }
    }
}

/// Models that own generated identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelName {
    /// The user model.
    User,
}

impl fmt::Display for ModelName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::User => f.write_str("user"),
        }
    }
}

/// Value objects that own generated identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueObjectName {
    /// A per-request correlation identifier.
    RequestId,
    /// An email address.
    Email,
    /// A password.
    Password,
}

impl fmt::Display for ValueObjectName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RequestId => f.write_str("request id"),
            Self::Email => f.write_str("email"),
            Self::Password => f.write_str("password"),
        }
    }
}

/// What an identifier is being generated for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdTarget {
    /// An identifier for a model.
    Model(ModelName),
    /// An identifier for a value object.
    ValueObject(ValueObjectName),
}

impl fmt::Display for IdTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Model(name) => write!(f, "model {name}"),
            Self::ValueObject(name) => write!(f, "value object {name}"),
        }
    }
}

/// A token provider (or the library behind it) failed.
#[derive(Debug, Clone, PartialEq, Error)]
#[error(
    "Error in {provider} provider in {method} method.{}",
    external_name.as_ref().map(|name| format!(" Error in external lib name: {name}.")).unwrap_or_default()
)]
pub struct ProviderError {
    provider: ProviderName,
    method: TokenProviderMethod,
    external_name: Option<String>,
    error: Value,
}

impl ProviderError {
    /// Creates a provider error wrapping the underlying failure.
    #[must_use]
    pub fn new(provider: ProviderName, method: TokenProviderMethod, error: impl fmt::Display) -> Self {
        Self {
            provider,
            method,
            external_name: None,
            error: Value::String(error.to_string()),
        }
    }

    /// Names the external library that raised the failure.
    #[must_use]
    pub fn with_external_name(mut self, name: impl Into<String>) -> Self {
        self.external_name = Some(name.into());
        self
    }

    /// Returns the provider that failed.
    #[must_use]
    pub const fn provider(&self) -> ProviderName {
        self.provider
    }

    /// Returns the provider method that failed.
    #[must_use]
    pub const fn method(&self) -> TokenProviderMethod {
        self.method
    }
}

/// Generating an identifier failed.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("Error generating id to {target}")]
pub struct GenerateIdError {
    target: IdTarget,
    error: Value,
}

impl GenerateIdError {
    /// Creates the error for `target`, wrapping the underlying failure.
    #[must_use]
    pub fn new(target: IdTarget, error: impl fmt::Display) -> Self {
        Self {
            target,
            error: Value::String(error.to_string()),
        }
    }

    /// Returns what the identifier was being generated for.
    #[must_use]
    pub const fn target(&self) -> IdTarget {
        self.target
    }
}

/// A string could not be parsed as an identifier.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("The id {id} is invalid")]
pub struct InvalidIdError {
    id: String,
}

impl InvalidIdError {
    /// Creates the error for `id`.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

/// An email address failed validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("The email {email} is invalid")]
pub struct InvalidEmailError {
    email: String,
}

impl InvalidEmailError {
    /// Creates the error for `email`.
    #[must_use]
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
        }
    }
}

/// No user is registered under an email address.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("The email {email} was not found.")]
pub struct EmailNotFoundError {
    email: String,
}

impl EmailNotFoundError {
    /// Creates the error for `email`.
    #[must_use]
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
        }
    }
}

/// A password does not satisfy the format rules.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("The password is invalid")]
pub struct InvalidPasswordFormatError;

/// A password length is below the minimum.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid password length: {length}")]
pub struct InvalidPasswordLengthError {
    length: usize,
}

impl InvalidPasswordLengthError {
    /// Creates the error for a password of `length` characters.
    #[must_use]
    pub const fn new(length: usize) -> Self {
        Self { length }
    }
}

/// The caller could not be authorized as a user.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("User unauthorized.")]
pub struct UserUnauthorizedError;

/// The persistence layer failed.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("Error in repository in {method} method.")]
pub struct RepositoryError {
    method: String,
    error: Value,
}

impl RepositoryError {
    /// Creates the error for a failed repository `method`.
    #[must_use]
    pub fn new(method: impl Into<String>, error: impl fmt::Display) -> Self {
        Self {
            method: method.into(),
            error: Value::String(error.to_string()),
        }
    }
}

/// A declared business failure.
///
/// # Example
///
/// ```
/// use phont_core::{DomainError, EmailNotFoundError, StatusError};
///
/// let error = DomainError::from(EmailNotFoundError::new("ada@example.com"));
/// assert_eq!(error.status(), StatusError::NotFound);
/// assert_eq!(error.name(), "EmailNotFoundError");
/// assert_eq!(error.error_message(), "The email ada@example.com was not found.");
/// ```
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DomainError {
    /// See [`ProviderError`].
    #[error(transparent)]
    Provider(#[from] ProviderError),
    /// See [`GenerateIdError`].
    #[error(transparent)]
    GenerateId(#[from] GenerateIdError),
    /// See [`InvalidIdError`].
    #[error(transparent)]
    InvalidId(#[from] InvalidIdError),
    /// See [`InvalidEmailError`].
    #[error(transparent)]
    InvalidEmail(#[from] InvalidEmailError),
    /// See [`EmailNotFoundError`].
    #[error(transparent)]
    EmailNotFound(#[from] EmailNotFoundError),
    /// See [`InvalidPasswordFormatError`].
    #[error(transparent)]
    InvalidPasswordFormat(#[from] InvalidPasswordFormatError),
    /// See [`InvalidPasswordLengthError`].
    #[error(transparent)]
    InvalidPasswordLength(#[from] InvalidPasswordLengthError),
    /// See [`UserUnauthorizedError`].
    #[error(transparent)]
    UserUnauthorized(#[from] UserUnauthorizedError),
    /// See [`RepositoryError`].
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl DomainError {
    /// Returns the failure category.
    #[must_use]
    pub const fn status(&self) -> StatusError {
        match self {
            Self::Provider(_) => StatusError::ProviderError,
            Self::GenerateId(_)
            | Self::InvalidId(_)
            | Self::InvalidEmail(_)
            | Self::InvalidPasswordFormat(_)
            | Self::InvalidPasswordLength(_) => StatusError::Invalid,
            Self::EmailNotFound(_) => StatusError::NotFound,
            Self::UserUnauthorized(_) => StatusError::Unauthorized,
            Self::Repository(_) => StatusError::RepositoryError,
        }
    }

    /// Returns the discriminant tag of this kind.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Provider(_) => "ProviderError",
            Self::GenerateId(_) => "GenerateIDError",
            Self::InvalidId(_) => "InvalidIDError",
            Self::InvalidEmail(_) => "InvalidEmailError",
            Self::EmailNotFound(_) => "EmailNotFoundError",
            Self::InvalidPasswordFormat(_) => "InvalidPasswordFormatError",
            Self::InvalidPasswordLength(_) => "InvalidPasswordLengthError",
            Self::UserUnauthorized(_) => "UserUnauthorizedError",
            Self::Repository(_) => "RepositoryError",
        }
    }

    /// Returns the human-readable message.
    #[must_use]
    pub fn error_message(&self) -> String {
        self.to_string()
    }

    /// Returns the diagnostic payload, `Value::Null` when the kind carries none.
    #[must_use]
    pub fn error_value(&self) -> &Value {
        match self {
            Self::Provider(error) => &error.error,
            Self::GenerateId(error) => &error.error,
            Self::Repository(error) => &error.error,
            _ => &Value::Null,
        }
    }
}

impl Serialize for DomainError {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("DomainError", 4)?;
        state.serialize_field("name", self.name())?;
        state.serialize_field("status", &self.status())?;
        state.serialize_field("error_message", &self.error_message())?;
        state.serialize_field("error_value", self.error_value())?;
        state.end()
    }
}

impl From<DomainError> for HttpResponseError {
    fn from(error: DomainError) -> Self {
        Self::new(error.error_message(), error.status())
    }
}

impl From<&DomainError> for HttpResponseError {
    fn from(error: &DomainError) -> Self {
        Self::new(error.error_message(), error.status())
    }
}
