use async_trait::async_trait;

use crate::errors::SecretStoreError;
use crate::secrets::SecretStore;

/// Resolves references from environment variables named `<PREFIX><REF>`, where
/// the reference is uppercased and every non-alphanumeric character becomes `_`.
/// The variable holds the same JSON payload the secret manager would.
pub struct EnvSecretStore {
    prefix: String,
}

impl EnvSecretStore {
    pub const DEFAULT_PREFIX: &'static str = "KB_SECRET_";

    pub fn new(prefix: impl Into<String>) -> Self {
        Self { prefix: prefix.into() }
    }

    pub fn var_name(&self, reference: &str) -> String {
        let suffix: String = reference
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() {
                    c.to_ascii_uppercase()
                } else {
                    '_'
                }
            })
            .collect();
        format!("{}{}", self.prefix, suffix)
    }
}

impl Default for EnvSecretStore {
    fn default() -> Self {
        Self::new(Self::DEFAULT_PREFIX)
    }
}

#[async_trait]
impl SecretStore for EnvSecretStore {
    fn name(&self) -> &str {
        "env"
    }

    async fn resolve(&self, reference: &str) -> Result<String, SecretStoreError> {
        let var = self.var_name(reference);
        match std::env::var(&var) {
            Ok(value) => Ok(value),
            Err(std::env::VarError::NotPresent) => Err(SecretStoreError::NotFound(var)),
            Err(std::env::VarError::NotUnicode(_)) => Err(SecretStoreError::Malformed(format!(
                "variable {var} is not valid unicode"
            ))),
        }
    }
}
