use harness_models::HarnessError;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::debug;

/// Global invocation limiter with RAII permits.
#[derive(Clone)]
pub struct Concurrency {
    sem: Arc<Semaphore>,
}

impl Concurrency {
    pub fn new(limit: usize) -> Self {
        Self {
            sem: Arc::new(Semaphore::new(limit)),
        }
    }

    /// Acquire a token, waiting until one is free.
    pub async fn acquire(&self) -> Result<TokenGuard, HarnessError> {
        let permit = self
            .sem
            .clone()
            .acquire_owned()
            .await
            .map_err(|e| HarnessError::InternalError {
                reason: format!("concurrency semaphore closed: {e}"),
            })?;
        debug!(remaining = self.sem.available_permits(), "acquired concurrency token");
        Ok(TokenGuard { _permit: permit })
    }

    /// Acquire a token without waiting; exhaustion surfaces as a throttle.
    pub fn try_acquire(&self) -> Result<TokenGuard, HarnessError> {
        self.sem
            .clone()
            .try_acquire_owned()
            .map(|permit| TokenGuard { _permit: permit })
            .map_err(|_| HarnessError::ConcurrencyLimitExceeded)
    }

    pub fn available_permits(&self) -> usize {
        self.sem.available_permits()
    }
}

/// Holds one concurrency token; released on drop.
pub struct TokenGuard {
    _permit: tokio::sync::OwnedSemaphorePermit,
}
