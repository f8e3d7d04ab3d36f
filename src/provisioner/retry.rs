use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::errors::ProvisionError;
use crate::provisioner::{IndexProvisioner, ProvisioningResult};
use crate::vector_store::VectorStoreDescriptor;

/// Explicit retry wrapper around [`IndexProvisioner::provision`]. The provisioner
/// itself never retries; redeploying is the default retry path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryPolicy {
    /// Total attempts including the first; `1` disables retrying.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    #[serde(default = "default_initial_backoff_ms")]
    pub initial_backoff_ms: u64,
    #[serde(default = "default_max_backoff_ms")]
    pub max_backoff_ms: u64,
}

fn default_max_attempts() -> u32 {
    1
}

fn default_initial_backoff_ms() -> u64 {
    500
}

fn default_max_backoff_ms() -> u64 {
    8_000
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            initial_backoff_ms: default_initial_backoff_ms(),
            max_backoff_ms: default_max_backoff_ms(),
        }
    }
}

impl RetryPolicy {
    /// Delay before retry number `retry` (0-based), doubling up to the cap.
    pub fn backoff(&self, retry: u32) -> Duration {
        let factor = 1u64.checked_shl(retry).unwrap_or(u64::MAX);
        let ms = self
            .initial_backoff_ms
            .saturating_mul(factor)
            .min(self.max_backoff_ms);
        Duration::from_millis(ms)
    }
}

pub async fn provision_with_retry(
    provisioner: &IndexProvisioner,
    descriptor: &VectorStoreDescriptor,
    policy: &RetryPolicy,
) -> Result<ProvisioningResult, ProvisionError> {
    let attempts = policy.max_attempts.max(1);
    let mut attempt = 1;
    loop {
        match provisioner.provision(descriptor).await {
            Ok(result) => return Ok(result),
            Err(e) if e.is_retryable() && attempt < attempts => {
                let delay = policy.backoff(attempt - 1);
                tracing::warn!(
                    index = %descriptor.index_name(),
                    attempt,
                    max_attempts = attempts,
                    delay_ms = delay.as_millis() as u64,
                    error = %e,
                    "provisioning attempt failed, retrying"
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provisioner::testing::{descriptor, provisioner, MemorySecretStore, StubReply, StubTransport};
    use crate::provisioner::ProvisionStatus;

    fn fast(max_attempts: u32) -> RetryPolicy {
        RetryPolicy {
            max_attempts,
            initial_backoff_ms: 1,
            max_backoff_ms: 2,
        }
    }

    #[test]
    fn backoff_doubles_and_caps() {
        let policy = RetryPolicy {
            max_attempts: 5,
            initial_backoff_ms: 100,
            max_backoff_ms: 350,
        };
        assert_eq!(policy.backoff(0), Duration::from_millis(100));
        assert_eq!(policy.backoff(1), Duration::from_millis(200));
        assert_eq!(policy.backoff(2), Duration::from_millis(350));
        assert_eq!(policy.backoff(80), Duration::from_millis(350));
    }

    #[tokio::test]
    async fn default_policy_makes_one_attempt() {
        let transport = StubTransport::replying(vec![
            StubReply::status(503, "busy"),
            StubReply::status(201, ""),
        ]);
        let p = provisioner(MemorySecretStore::with("secret-1", r#"{"apiKey":"abc"}"#), transport.clone());

        let err = provision_with_retry(&p, &descriptor(), &RetryPolicy::default())
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), Some(503));
        assert_eq!(transport.calls().len(), 1);
    }

    #[tokio::test]
    async fn retries_transient_failures() {
        let transport = StubTransport::replying(vec![
            StubReply::status(503, "busy"),
            StubReply::status(429, "slow down"),
            StubReply::status(201, ""),
        ]);
        let p = provisioner(MemorySecretStore::with("secret-1", r#"{"apiKey":"abc"}"#), transport.clone());

        let result = provision_with_retry(&p, &descriptor(), &fast(3)).await.unwrap();
        assert_eq!(result.status, ProvisionStatus::Created);
        assert_eq!(transport.calls().len(), 3);
    }

    #[tokio::test]
    async fn does_not_retry_rejections() {
        let transport = StubTransport::replying(vec![
            StubReply::status(400, "bad dimension"),
            StubReply::status(201, ""),
        ]);
        let p = provisioner(MemorySecretStore::with("secret-1", r#"{"apiKey":"abc"}"#), transport.clone());

        let err = provision_with_retry(&p, &descriptor(), &fast(3)).await.unwrap_err();
        assert_eq!(err.status_code(), Some(400));
        assert_eq!(transport.calls().len(), 1);
    }
}
