use serde::{Deserialize, Serialize};

use crate::vector_store::VectorStoreDescriptor;

/// Non-secret values exported for downstream components (query runtime, other
/// functions) so they can build their own control-plane calls and re-resolve
/// the credential themselves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StackOutputs {
    pub index_name: String,
    pub environment: String,
    pub api_key_secret_ref: String,
}

impl From<&VectorStoreDescriptor> for StackOutputs {
    fn from(d: &VectorStoreDescriptor) -> Self {
        Self {
            index_name: d.index_name().to_string(),
            environment: d.environment().to_string(),
            api_key_secret_ref: d.credential_ref().to_string(),
        }
    }
}
