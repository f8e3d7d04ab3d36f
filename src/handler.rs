use serde::{Deserialize, Serialize};
use tracing::Instrument;

use crate::config::AppConfig;
use crate::provisioner::{
    provision_with_retry, IndexProvisioner, ProvisionStatus, ProvisioningResult,
};
use crate::vector_store::StackOutputs;

/// What the invocation reports back to whoever triggered provisioning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvocationResponse {
    pub status_code: u16,
    pub body: ResponseBody,
    /// Present once the descriptor validated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outputs: Option<StackOutputs>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseBody {
    pub message: String,
    pub index_name: String,
    pub status: ProvisionStatus,
    pub detail: String,
}

impl InvocationResponse {
    pub fn is_success(&self) -> bool {
        self.body.status.is_success()
    }

    fn from_result(result: ProvisioningResult, outputs: Option<StackOutputs>) -> Self {
        let (status_code, message) = match result.status {
            ProvisionStatus::Created => (200, "index creation initiated"),
            ProvisionStatus::AlreadyExists => (200, "index already exists"),
            ProvisionStatus::Failed => (500, "index provisioning failed"),
        };
        Self {
            status_code,
            body: ResponseBody {
                message: message.to_string(),
                index_name: result.index_name,
                status: result.status,
                detail: result.detail,
            },
            outputs,
        }
    }
}

/// Invocation boundary: validates the descriptor, provisions through the
/// configured retry policy and turns every error into a `Failed` result.
pub async fn handle(provisioner: &IndexProvisioner, config: &AppConfig) -> InvocationResponse {
    let invocation_id = uuid::Uuid::new_v4();
    let span = tracing::info_span!("provision", invocation = %invocation_id);

    async {
        let descriptor = match config.descriptor() {
            Ok(d) => d,
            Err(e) => {
                tracing::error!(error = %e, "invalid vector store descriptor");
                let result =
                    ProvisioningResult::from_error(config.vector_store.index_name.clone(), &e);
                return InvocationResponse::from_result(result, None);
            }
        };
        let outputs = StackOutputs::from(&descriptor);

        let result = match provision_with_retry(provisioner, &descriptor, &config.retry).await {
            Ok(result) => {
                tracing::info!(
                    index = %result.index_name,
                    environment = %descriptor.environment(),
                    status = ?result.status,
                    "vector index provisioned"
                );
                result
            }
            Err(e) => {
                tracing::error!(
                    index = %descriptor.index_name(),
                    status_code = ?e.status_code(),
                    error = %e,
                    "failed to provision vector index"
                );
                ProvisioningResult::from_error(descriptor.index_name(), &e)
            }
        };

        InvocationResponse::from_result(result, Some(outputs))
    }
    .instrument(span)
    .await
}
