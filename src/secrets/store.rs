use async_trait::async_trait;

use crate::errors::SecretStoreError;

/// Reference-to-secret lookup. Implementations return the raw secret string;
/// shape checking happens in the provisioner.
#[async_trait]
pub trait SecretStore: Send + Sync {
    /// Short identifier used in logs.
    fn name(&self) -> &str;

    async fn resolve(&self, reference: &str) -> Result<String, SecretStoreError>;
}
