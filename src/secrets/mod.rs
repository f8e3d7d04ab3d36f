pub mod env_store;
pub mod store;

#[cfg(feature = "aws")]
pub mod aws;

pub use env_store::EnvSecretStore;
pub use store::SecretStore;

#[cfg(feature = "aws")]
pub use aws::AwsSecretsManagerStore;

use serde::Deserialize;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::errors::ProvisionError;

/// Control-plane API key. Zeroized on drop and redacted from `Debug`, so it
/// only exists in memory for the duration of one provisioning call.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Replace every occurrence of the key in `text`, both verbatim and in the
    /// JSON-escaped form a control plane may echo back.
    pub fn redact(&self, text: &str) -> String {
        if self.0.is_empty() {
            return text.to_string();
        }
        let mut redacted = text.replace(self.0.as_str(), "***");
        if let Ok(quoted) = serde_json::to_string(&self.0) {
            let escaped = zeroize::Zeroizing::new(quoted);
            let inner = &escaped[1..escaped.len() - 1];
            if inner != self.0 {
                redacted = redacted.replace(inner, "***");
            }
        }
        redacted
    }
}

impl std::fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ApiKey(***)")
    }
}

#[derive(Deserialize)]
struct SecretPayload {
    #[serde(rename = "apiKey")]
    api_key: Option<String>,
}

/// Parse a resolved secret string, which must be a JSON object with a
/// non-empty `apiKey` string. Error messages never echo the payload.
pub fn parse_secret_payload(raw: &str) -> Result<ApiKey, ProvisionError> {
    let payload: SecretPayload = serde_json::from_str(raw).map_err(|e| {
        ProvisionError::CredentialMalformed(format!(
            "secret is not a JSON object with an apiKey field (line {}, column {})",
            e.line(),
            e.column()
        ))
    })?;
    match payload.api_key {
        Some(mut key) if !key.trim().is_empty() => {
            let api_key = ApiKey::new(key.trim());
            key.zeroize();
            Ok(api_key)
        }
        Some(_) => Err(ProvisionError::CredentialMalformed("apiKey is empty".into())),
        None => Err(ProvisionError::CredentialMalformed("apiKey field is missing".into())),
    }
}
