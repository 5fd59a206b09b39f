//! Token provider contracts.

use crate::error::{DomainError, ModelName, ProviderError};
use crate::outcome::Outcome;
use serde::{Deserialize, Serialize};

/// Input of [`GenerateJwtTokenProvider::generate_jwt`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateJwtParameters {
    /// Id of the user the token is issued to.
    pub user_id: String,
}

/// A signed token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JwtToken {
    /// The encoded token.
    pub jwt_token: String,
}

/// Issues JWTs.
pub trait GenerateJwtTokenProvider: Send + Sync {
    /// Issues a token for a user.
    fn generate_jwt(&self, parameters: &GenerateJwtParameters) -> Outcome<ProviderError, JwtToken>;
}

/// Input of [`VerifyJwtTokenProvider::verify_jwt`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifyJwtParameters {
    /// The encoded token.
    pub jwt_token: String,
    /// Model the token subject must belong to.
    pub model: ModelName,
}

/// Subject of a verified token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifiedSubject {
    /// Id of the authenticated user.
    pub user_id: String,
}

/// Verifies JWTs.
///
/// Fails with a provider error, an invalid id error (malformed subject) or
/// an unauthorized error (expired or revoked token).
pub trait VerifyJwtTokenProvider: Send + Sync {
    /// Verifies a token and returns its subject.
    fn verify_jwt(&self, parameters: &VerifyJwtParameters) -> Outcome<DomainError, VerifiedSubject>;
}
