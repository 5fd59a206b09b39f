//! Identifier generation contract.

use crate::context::CorrelationId;
use crate::error::{GenerateIdError, IdTarget};
use crate::outcome::{success, Outcome};

/// Produces fresh identifiers.
///
/// Generation may fail (for example when an external id service is down);
/// callers decide how to recover.
pub trait IdGenerator: Send + Sync {
    /// Generates an id for `target`.
    fn generate(&self, target: IdTarget) -> Outcome<GenerateIdError, CorrelationId>;
}

/// Issues time-ordered UUID v7 ids. Never fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidIdGenerator;

impl IdGenerator for UuidIdGenerator {
    fn generate(&self, _target: IdTarget) -> Outcome<GenerateIdError, CorrelationId> {
        success(CorrelationId::generate())
    }
}
