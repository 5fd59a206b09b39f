//! Domain status categories and their transport status codes.
//!
//! Operations never pick an HTTP status code themselves. They report an
//! abstract category ([`StatusSuccess`] or [`StatusError`]) and the
//! [`StatusMapper`] derives the wire-level code from it.
//!
//! | Category | HTTP status |
//! |---|---|
//! | `OK` | 200 |
//! | `CREATED` | 201 |
//! | `ACCEPTED` | 202 |
//! | `NO_CONTENT` | 204 |
//! | `INVALID` | 400 |
//! | `UNAUTHORIZED` | 401 |
//! | `FORBIDDEN` | 403 |
//! | `NOT_FOUND` | 404 |
//! | `CONFLICT` | 409 |
//! | `TOO_MANY_REQUESTS` | 429 |
//! | `REPOSITORY_ERROR` | 500 |
//! | `INTERNAL_ERROR` | 500 |
//! | `PROVIDER_ERROR` | 502 |

use http::StatusCode;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Success categories an operation may declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StatusSuccess {
    /// The request succeeded.
    Ok,
    /// A resource was created.
    Created,
    /// The request was accepted for later processing.
    Accepted,
    /// The request succeeded with nothing to return.
    NoContent,
}

impl StatusSuccess {
    /// Every success category.
    pub const ALL: [Self; 4] = [Self::Ok, Self::Created, Self::Accepted, Self::NoContent];

    /// Returns the wire name of this category.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Ok => "OK",
            Self::Created => "CREATED",
            Self::Accepted => "ACCEPTED",
            Self::NoContent => "NO_CONTENT",
        }
    }
}

/// Failure categories an operation may declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StatusError {
    /// The input was invalid.
    Invalid,
    /// The caller is not authenticated.
    Unauthorized,
    /// The caller may not perform this operation.
    Forbidden,
    /// The requested resource does not exist.
    NotFound,
    /// The request conflicts with current state.
    Conflict,
    /// The caller exceeded a rate limit.
    TooManyRequests,
    /// An external provider (token issuer, mailer) failed.
    ProviderError,
    /// The persistence layer failed.
    RepositoryError,
    /// Anything unexpected.
    InternalError,
}

impl StatusError {
    /// Every failure category.
    pub const ALL: [Self; 9] = [
        Self::Invalid,
        Self::Unauthorized,
        Self::Forbidden,
        Self::NotFound,
        Self::Conflict,
        Self::TooManyRequests,
        Self::ProviderError,
        Self::RepositoryError,
        Self::InternalError,
    ];

    /// Returns the wire name of this category.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Invalid => "INVALID",
            Self::Unauthorized => "UNAUTHORIZED",
            Self::Forbidden => "FORBIDDEN",
            Self::NotFound => "NOT_FOUND",
            Self::Conflict => "CONFLICT",
            Self::TooManyRequests => "TOO_MANY_REQUESTS",
            Self::ProviderError => "PROVIDER_ERROR",
            Self::RepositoryError => "REPOSITORY_ERROR",
            Self::InternalError => "INTERNAL_ERROR",
        }
    }
}

/// Any domain status, success or failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Status {
    /// A success category.
    Success(StatusSuccess),
    /// A failure category.
    Error(StatusError),
}

impl Status {
    /// Returns the wire name of this status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Success(status) => status.as_str(),
            Self::Error(status) => status.as_str(),
        }
    }
}

impl From<StatusSuccess> for Status {
    fn from(status: StatusSuccess) -> Self {
        Self::Success(status)
    }
}

impl From<StatusError> for Status {
    fn from(status: StatusError) -> Self {
        Self::Error(status)
    }
}

impl fmt::Display for StatusSuccess {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for StatusError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Maps a domain [`Status`] to a transport status code.
///
/// Implementations must be deterministic and total: every status yields a
/// code, and the same status always yields the same code.
pub trait StatusMapper: Send + Sync + 'static {
    /// Returns the transport status code for `status`.
    fn map_to_http_status_code(&self, status: Status) -> StatusCode;
}

/// The standard HTTP mapping documented at the module level.
#[derive(Debug, Clone, Copy, Default)]
pub struct HttpStatusMapper;

impl HttpStatusMapper {
    /// Creates the mapper.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl StatusMapper for HttpStatusMapper {
    fn map_to_http_status_code(&self, status: Status) -> StatusCode {
        match status {
            Status::Success(StatusSuccess::Ok) => StatusCode::OK,
            Status::Success(StatusSuccess::Created) => StatusCode::CREATED,
            Status::Success(StatusSuccess::Accepted) => StatusCode::ACCEPTED,
            Status::Success(StatusSuccess::NoContent) => StatusCode::NO_CONTENT,
            Status::Error(StatusError::Invalid) => StatusCode::BAD_REQUEST,
            Status::Error(StatusError::Unauthorized) => StatusCode::UNAUTHORIZED,
            Status::Error(StatusError::Forbidden) => StatusCode::FORBIDDEN,
            Status::Error(StatusError::NotFound) => StatusCode::NOT_FOUND,
            Status::Error(StatusError::Conflict) => StatusCode::CONFLICT,
            Status::Error(StatusError::TooManyRequests) => StatusCode::TOO_MANY_REQUESTS,
            Status::Error(StatusError::ProviderError) => StatusCode::BAD_GATEWAY,
            Status::Error(StatusError::RepositoryError | StatusError::InternalError) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}
