//! The gateway trait and the deadline decorator.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::api::CompletionRequest;
use crate::error::GatewayError;

/// Abstraction boundary to the remote text-generation backend.
///
/// Implementations must not retry, and must not hold or mutate any
/// conversation state. Any error is terminal for the turn that issued it.
#[async_trait]
pub trait CompletionGateway: Send + Sync {
    /// Generate a reply for `request`.
    async fn complete(&self, request: &CompletionRequest) -> Result<String, GatewayError>;

    /// Short name used in logs.
    fn name(&self) -> &str;
}

/// Imposes a deadline on an inner gateway.
///
/// Expiry drops the in-flight call and surfaces as [`GatewayError::Timeout`].
pub struct DeadlineGateway {
    inner: Arc<dyn CompletionGateway>,
    deadline: Duration,
}

impl DeadlineGateway {
    pub fn new(inner: Arc<dyn CompletionGateway>, deadline: Duration) -> Self {
        Self { inner, deadline }
    }
}

#[async_trait]
impl CompletionGateway for DeadlineGateway {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, GatewayError> {
        match tokio::time::timeout(self.deadline, self.inner.complete(request)).await {
            Ok(result) => result,
            Err(_) => {
                tracing::warn!(
                    gateway = self.inner.name(),
                    deadline_ms = self.deadline.as_millis() as u64,
                    "Completion call exceeded deadline"
                );
                Err(GatewayError::Timeout(self.deadline))
            }
        }
    }

    fn name(&self) -> &str {
        self.inner.name()
    }
}
