use serde::{Deserialize, Serialize};

use crate::errors::ProvisionError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProvisionStatus {
    Created,
    AlreadyExists,
    Failed,
}

impl ProvisionStatus {
    pub fn is_success(self) -> bool {
        !matches!(self, Self::Failed)
    }
}

/// Progress of one provisioning attempt. Transitions are linear and one-shot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProvisionPhase {
    NotStarted,
    CredentialResolved,
    RequestSent,
    Finished(ProvisionStatus),
}

impl std::fmt::Display for ProvisionPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotStarted => f.write_str("not_started"),
            Self::CredentialResolved => f.write_str("credential_resolved"),
            Self::RequestSent => f.write_str("request_sent"),
            Self::Finished(status) => write!(f, "finished:{status:?}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProvisioningResult {
    pub status: ProvisionStatus,
    pub index_name: String,
    pub detail: String,
}

impl ProvisioningResult {
    pub fn created(index_name: impl Into<String>) -> Self {
        Self {
            status: ProvisionStatus::Created,
            index_name: index_name.into(),
            detail: "index creation initiated".to_string(),
        }
    }

    pub fn already_exists(index_name: impl Into<String>) -> Self {
        Self {
            status: ProvisionStatus::AlreadyExists,
            index_name: index_name.into(),
            detail: "index already exists".to_string(),
        }
    }

    /// A failed result always carries a non-empty detail.
    pub fn failed(index_name: impl Into<String>, detail: impl Into<String>) -> Self {
        let detail = detail.into();
        let detail = if detail.trim().is_empty() {
            "provisioning failed".to_string()
        } else {
            detail
        };
        Self {
            status: ProvisionStatus::Failed,
            index_name: index_name.into(),
            detail,
        }
    }

    pub fn from_error(index_name: impl Into<String>, err: &ProvisionError) -> Self {
        Self::failed(index_name, err.to_string())
    }
}
