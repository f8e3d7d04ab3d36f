//! AWS Secrets Manager backend.
//!
//! The credential reference is the secret ARN (or name). The secret string is
//! expected to hold `{"apiKey": "..."}`.

use std::time::Duration;

use async_trait::async_trait;
use aws_config::timeout::TimeoutConfig;
use aws_sdk_secretsmanager::error::{DisplayErrorContext, SdkError};
use aws_sdk_secretsmanager::Client;

use crate::errors::SecretStoreError;
use crate::secrets::SecretStore;

pub struct AwsSecretsManagerStore {
    client: Client,
}

impl AwsSecretsManagerStore {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Build a client from the default AWS provider chain, with an operation
    /// timeout so a hung endpoint cannot stall provisioning.
    pub async fn from_env(timeout: Duration) -> Self {
        let sdk_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
        let conf = aws_sdk_secretsmanager::config::Builder::from(&sdk_config)
            .timeout_config(
                TimeoutConfig::builder()
                    .operation_timeout(timeout)
                    .build(),
            )
            .build();
        Self::new(Client::from_conf(conf))
    }
}

#[async_trait]
impl SecretStore for AwsSecretsManagerStore {
    fn name(&self) -> &str {
        "aws-secrets-manager"
    }

    async fn resolve(&self, reference: &str) -> Result<String, SecretStoreError> {
        let output = match self
            .client
            .get_secret_value()
            .secret_id(reference)
            .send()
            .await
        {
            Ok(output) => output,
            // Match on SdkError directly; into_service_error() panics on non-service errors.
            Err(SdkError::ServiceError(service_err))
                if service_err.err().is_resource_not_found_exception() =>
            {
                return Err(SecretStoreError::NotFound(reference.to_string()));
            }
            Err(e) => {
                return Err(SecretStoreError::Unreachable(
                    DisplayErrorContext(&e).to_string(),
                ))
            }
        };

        output
            .secret_string()
            .map(str::to_owned)
            .ok_or_else(|| {
                SecretStoreError::Malformed(format!("{reference} holds binary data, not a secret string"))
            })
    }
}
