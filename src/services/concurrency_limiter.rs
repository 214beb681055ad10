//! Concurrency Limiter for Linkshelf.
//!
//! Admits at most K asynchronous units of work at once. Units that arrive while
//! all slots are busy wait in submission order; the semaphore behind the limiter
//! is fair, so admission is FIFO and nothing starves.

use std::future::Future;
use std::sync::Arc;

use tokio::sync::Semaphore;

use crate::types::errors::{EngineError, StoreError};

/// A cloneable gate; clones share the same slots.
#[derive(Debug, Clone)]
pub struct ConcurrencyLimiter {
    slots: Arc<Semaphore>,
    capacity: usize,
}

impl ConcurrencyLimiter {
    /// Creates a limiter with `capacity` slots. A capacity of 0 is raised to 1.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            slots: Arc::new(Semaphore::new(capacity)),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of units currently holding a slot.
    pub fn in_flight(&self) -> usize {
        self.capacity - self.slots.available_permits()
    }

    /// Runs `unit` once a slot is free and resolves with the unit's own outcome.
    ///
    /// The returned future is the unit's handle: a failing unit only fails its
    /// own handle, and its slot is released either way.
    pub async fn run<T, F>(&self, unit: F) -> Result<T, EngineError>
    where
        F: Future<Output = Result<T, EngineError>>,
    {
        let _permit = self
            .slots
            .acquire()
            .await
            .map_err(|e| {
                EngineError::Transient(StoreError::Database(format!(
                    "concurrency limiter closed: {}",
                    e
                )))
            })?;
        unit.await
    }
}

impl Default for ConcurrencyLimiter {
    fn default() -> Self {
        Self::new(10)
    }
}
