//! Users repository contracts.

use crate::error::DomainError;
use crate::outcome::Outcome;
use serde::{Deserialize, Serialize};
use std::future::Future;

/// Input of [`ValidateEmailUsersRepository::validate_email`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidateEmailParameters {
    /// Address to look up.
    pub email: String,
}

/// A user matched by email.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FoundUser {
    /// User id.
    pub id: String,
    /// Stored address.
    pub email: String,
}

/// Result of an email lookup; `found_user` is `None` when nobody owns it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidateEmailResult {
    /// The owner of the address, if any.
    pub found_user: Option<FoundUser>,
}

/// Looks users up by email.
///
/// Fails with a repository error, an invalid email error or an invalid id
/// error (a stored id that no longer parses).
pub trait ValidateEmailUsersRepository: Send + Sync {
    /// Looks up the owner of an email address.
    fn validate_email(
        &self,
        parameters: &ValidateEmailParameters,
    ) -> impl Future<Output = Outcome<DomainError, ValidateEmailResult>> + Send;
}
