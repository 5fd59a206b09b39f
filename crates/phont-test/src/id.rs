//! Deterministic id generators.

use parking_lot::Mutex;
use phont_core::contracts::IdGenerator;
use phont_core::{failure, success, CorrelationId, GenerateIdError, IdTarget, Outcome};

/// Returns the same id every time and remembers each requested target.
#[derive(Debug)]
pub struct FixedIdGenerator {
    id: CorrelationId,
    targets: Mutex<Vec<IdTarget>>,
}

impl FixedIdGenerator {
    /// Creates a generator that always returns `id`.
    #[must_use]
    pub fn new(id: impl Into<CorrelationId>) -> Self {
        Self {
            id: id.into(),
            targets: Mutex::default(),
        }
    }

    /// Returns the targets of every call, in order.
    #[must_use]
    pub fn targets(&self) -> Vec<IdTarget> {
        self.targets.lock().clone()
    }

    /// Returns the number of calls.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.targets.lock().len()
    }
}

impl IdGenerator for FixedIdGenerator {
    fn generate(&self, target: IdTarget) -> Outcome<GenerateIdError, CorrelationId> {
        self.targets.lock().push(target);
        success(self.id.clone())
    }
}

/// Always fails with [`GenerateIdError`] ("id service unavailable").
#[derive(Debug, Default)]
pub struct FailingIdGenerator {
    calls: Mutex<usize>,
}

impl FailingIdGenerator {
    /// Creates the generator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of calls.
    #[must_use]
    pub fn call_count(&self) -> usize {
        *self.calls.lock()
    }
}

impl IdGenerator for FailingIdGenerator {
    fn generate(&self, target: IdTarget) -> Outcome<GenerateIdError, CorrelationId> {
        *self.calls.lock() += 1;
        failure(GenerateIdError::new(target, "id service unavailable"))
    }
}
