//! Per-backend concurrency limit
//!
//! Every agent of one backend shares a single [`ThrottledProvider`], so the
//! backend never sees more than `max_concurrent_requests` calls at once no
//! matter how many agents fan out.

use async_trait::async_trait;
use consensus_application::{Generation, LlmProvider, ProviderError};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::trace;

pub struct ThrottledProvider {
    inner: Arc<dyn LlmProvider>,
    semaphore: Arc<Semaphore>,
}

impl ThrottledProvider {
    /// `max_concurrent` is raised to 1 if zero.
    pub fn new(inner: Arc<dyn LlmProvider>, max_concurrent: usize) -> Self {
        Self {
            inner,
            semaphore: Arc::new(Semaphore::new(max_concurrent.max(1))),
        }
    }

    pub fn available_permits(&self) -> usize {
        self.semaphore.available_permits()
    }
}

#[async_trait]
impl LlmProvider for ThrottledProvider {
    fn name(&self) -> &str {
        self.inner.name()
    }

    async fn generate(&self, model: &str, prompt: &str) -> Result<Generation, ProviderError> {
        let _permit = self.semaphore.acquire().await.map_err(|_| {
            ProviderError::Other(format!("{} request limiter closed", self.inner.name()))
        })?;
        trace!(
            provider = self.inner.name(),
            available = self.semaphore.available_permits(),
            "Acquired request permit"
        );

        self.inner.generate(model, prompt).await
    }

    fn is_configured(&self) -> bool {
        self.inner.is_configured()
    }
}
