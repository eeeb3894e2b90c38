//! Bounded concurrency budget shared by attribution calls.

use std::num::NonZeroUsize;
use std::sync::Arc;

use tokio::sync::{AcquireError, OwnedSemaphorePermit, Semaphore};

/// Default number of pair evaluations allowed to run at once.
pub const DEFAULT_WORKER_CAPACITY: usize = 100;

/// A fixed number of permits that pair-evaluation tasks hold while running.
///
/// Cloning is cheap and every clone draws from the same permits, so one pool
/// can be injected into several engines to cap their combined concurrency.
///
/// # Examples
/// ```
/// use std::num::NonZeroUsize;
/// use waymark_rewards::WorkerPool;
///
/// let pool = WorkerPool::new(NonZeroUsize::new(4).expect("non-zero"));
/// let shared = pool.clone();
/// assert_eq!(shared.capacity(), 4);
/// assert_eq!(pool.available(), 4);
/// ```
#[derive(Debug, Clone)]
pub struct WorkerPool {
    permits: Arc<Semaphore>,
    capacity: NonZeroUsize,
}

impl WorkerPool {
    /// Create a pool allowing `capacity` concurrent pair tasks.
    #[must_use]
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self {
            permits: Arc::new(Semaphore::new(capacity.get())),
            capacity,
        }
    }

    /// Maximum number of concurrent pair tasks.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity.get()
    }

    /// Permits not currently held by a running task.
    #[must_use]
    pub fn available(&self) -> usize {
        self.permits.available_permits()
    }

    /// Wait for a free slot. The slot is released when the permit drops.
    pub(crate) async fn acquire(&self) -> Result<OwnedSemaphorePermit, AcquireError> {
        Arc::clone(&self.permits).acquire_owned().await
    }
}

impl Default for WorkerPool {
    fn default() -> Self {
        Self::new(NonZeroUsize::new(DEFAULT_WORKER_CAPACITY).unwrap_or(NonZeroUsize::MIN))
    }
}
