use std::sync::Arc;
use std::time::Duration;

use crate::control_plane::types::{controller_base_url, create_index_url, DEFAULT_PROVIDER_DOMAIN};
use crate::control_plane::{
    classify, Classification, ConflictPolicy, ControlPlaneTransport, CreateIndexRequest, IndexSpec,
};
use crate::errors::{CredentialFailure, ProvisionError, SecretStoreError, TransportError};
use crate::provisioner::result::{ProvisionPhase, ProvisionStatus, ProvisioningResult};
use crate::secrets::{parse_secret_payload, ApiKey, SecretStore};
use crate::vector_store::VectorStoreDescriptor;

/// Immutable knobs for the provisioner.
#[derive(Debug, Clone)]
pub struct ProvisionerSettings {
    /// Domain appended to `controller.<environment>.`.
    pub provider_domain: String,
    /// Replaces the environment-derived base URL entirely (local control planes).
    pub base_url_override: Option<String>,
    pub request_timeout: Duration,
    pub secret_timeout: Duration,
    pub conflicts: ConflictPolicy,
    pub index_spec: IndexSpec,
}

impl Default for ProvisionerSettings {
    fn default() -> Self {
        Self {
            provider_domain: DEFAULT_PROVIDER_DOMAIN.to_string(),
            base_url_override: None,
            request_timeout: Duration::from_secs(10),
            secret_timeout: Duration::from_secs(5),
            conflicts: ConflictPolicy::default(),
            index_spec: IndexSpec::default(),
        }
    }
}

/// Creates the knowledge-base index on the control plane. Holds no state between
/// calls, so one instance may serve concurrent invocations.
pub struct IndexProvisioner {
    secrets: Arc<dyn SecretStore>,
    transport: Arc<dyn ControlPlaneTransport>,
    settings: ProvisionerSettings,
}

impl IndexProvisioner {
    pub fn new(
        secrets: Arc<dyn SecretStore>,
        transport: Arc<dyn ControlPlaneTransport>,
        settings: ProvisionerSettings,
    ) -> Self {
        Self {
            secrets,
            transport,
            settings,
        }
    }

    pub fn endpoint_for(&self, descriptor: &VectorStoreDescriptor) -> String {
        let base = match &self.settings.base_url_override {
            Some(url) => url.clone(),
            None => controller_base_url(descriptor.environment(), &self.settings.provider_domain),
        };
        create_index_url(&base)
    }

    /// One attempt, no retries. `AlreadyExists` is a success.
    pub async fn provision(
        &self,
        descriptor: &VectorStoreDescriptor,
    ) -> Result<ProvisioningResult, ProvisionError> {
        let index = descriptor.index_name();
        tracing::debug!(index = %index, phase = %ProvisionPhase::NotStarted, "provisioning index");

        let api_key = self.resolve_credential(descriptor).await?;
        tracing::debug!(
            index = %index,
            store = self.secrets.name(),
            phase = %ProvisionPhase::CredentialResolved,
            "credential resolved"
        );

        let url = self.endpoint_for(descriptor);
        let request = CreateIndexRequest::new(index, self.settings.index_spec);
        tracing::debug!(index = %index, url = %url, phase = %ProvisionPhase::RequestSent, "calling control plane");

        let sent = tokio::time::timeout(
            self.settings.request_timeout,
            self.transport.create_index(&url, &api_key, &request),
        )
        .await
        .unwrap_or(Err(TransportError::Timeout));

        let response = sent.map_err(|e| {
            tracing::debug!(index = %index, phase = %ProvisionPhase::Finished(ProvisionStatus::Failed), "transport failure");
            ProvisionError::ApiFailure {
                status_code: None,
                body: api_key.redact(&e.to_string()),
            }
        })?;

        match classify(response.status, &response.body, &self.settings.conflicts) {
            Classification::Created => {
                tracing::debug!(index = %index, phase = %ProvisionPhase::Finished(ProvisionStatus::Created), "index created");
                Ok(ProvisioningResult::created(index))
            }
            Classification::AlreadyExists => {
                tracing::debug!(
                    index = %index,
                    status = response.status,
                    phase = %ProvisionPhase::Finished(ProvisionStatus::AlreadyExists),
                    "index already exists"
                );
                Ok(ProvisioningResult::already_exists(index))
            }
            Classification::Failed { status, body } => {
                tracing::debug!(
                    index = %index,
                    status,
                    phase = %ProvisionPhase::Finished(ProvisionStatus::Failed),
                    "control plane rejected request"
                );
                Err(ProvisionError::ApiFailure {
                    status_code: Some(status),
                    body: api_key.redact(&body),
                })
            }
        }
    }

    async fn resolve_credential(
        &self,
        descriptor: &VectorStoreDescriptor,
    ) -> Result<ApiKey, ProvisionError> {
        let reference = descriptor.credential_ref();
        let unavailable = |reason| ProvisionError::CredentialUnavailable {
            reference: reference.to_string(),
            reason,
        };

        let raw = match tokio::time::timeout(
            self.settings.secret_timeout,
            self.secrets.resolve(reference),
        )
        .await
        {
            Err(_) => return Err(unavailable(CredentialFailure::Timeout)),
            Ok(Err(SecretStoreError::NotFound(what))) => {
                return Err(unavailable(CredentialFailure::NotFound(what)))
            }
            Ok(Err(SecretStoreError::Unreachable(why))) => {
                return Err(unavailable(CredentialFailure::Unreachable(why)))
            }
            Ok(Err(SecretStoreError::Malformed(why))) => {
                return Err(ProvisionError::CredentialMalformed(why))
            }
            Ok(Ok(raw)) => zeroize::Zeroizing::new(raw),
        };

        parse_secret_payload(&raw)
    }
}
