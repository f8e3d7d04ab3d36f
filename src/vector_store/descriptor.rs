use serde::{Deserialize, Serialize};

use crate::errors::ProvisionError;

/// Longest index name the control plane accepts.
pub const MAX_INDEX_NAME_LEN: usize = 45;

/// Identity of the index to provision: its name, the control-plane environment
/// and a handle to the stored API key. The key itself is never held here.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawDescriptor")]
pub struct VectorStoreDescriptor {
    index_name: String,
    environment: String,
    credential_ref: String,
}

#[derive(Deserialize)]
struct RawDescriptor {
    index_name: String,
    environment: String,
    credential_ref: String,
}

impl TryFrom<RawDescriptor> for VectorStoreDescriptor {
    type Error = ProvisionError;

    fn try_from(raw: RawDescriptor) -> Result<Self, Self::Error> {
        Self::new(raw.index_name, raw.environment, raw.credential_ref)
    }
}

impl VectorStoreDescriptor {
    pub fn new(
        index_name: impl Into<String>,
        environment: impl Into<String>,
        credential_ref: impl Into<String>,
    ) -> Result<Self, ProvisionError> {
        let index_name = index_name.into();
        let environment = environment.into();
        let credential_ref = credential_ref.into();

        validate_index_name(&index_name)?;
        validate_environment(&environment)?;
        if credential_ref.trim().is_empty() {
            return Err(ProvisionError::invalid("credential reference is empty"));
        }

        Ok(Self {
            index_name,
            environment,
            credential_ref,
        })
    }

    pub fn index_name(&self) -> &str {
        &self.index_name
    }

    pub fn environment(&self) -> &str {
        &self.environment
    }

    pub fn credential_ref(&self) -> &str {
        &self.credential_ref
    }
}

/// Lowercase alphanumerics and `-`, alphanumeric at both ends, bounded length.
fn validate_index_name(name: &str) -> Result<(), ProvisionError> {
    if name.is_empty() {
        return Err(ProvisionError::invalid("index name is empty"));
    }
    if name.len() > MAX_INDEX_NAME_LEN {
        return Err(ProvisionError::invalid(format!(
            "index name '{name}' exceeds {MAX_INDEX_NAME_LEN} characters"
        )));
    }
    if let Some(bad) = name
        .chars()
        .find(|c| !(c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '-'))
    {
        return Err(ProvisionError::invalid(format!(
            "index name '{name}' contains invalid character '{bad}'"
        )));
    }
    if name.starts_with('-') || name.ends_with('-') {
        return Err(ProvisionError::invalid(format!(
            "index name '{name}' must start and end with an alphanumeric character"
        )));
    }
    Ok(())
}

// The environment becomes a hostname label, so anything that would change the
// URL authority is rejected.
fn validate_environment(environment: &str) -> Result<(), ProvisionError> {
    if environment.trim().is_empty() {
        return Err(ProvisionError::invalid("environment is empty"));
    }
    if environment
        .chars()
        .any(|c| c.is_whitespace() || matches!(c, '/' | '@' | ':' | '?' | '#'))
    {
        return Err(ProvisionError::invalid(format!(
            "environment '{environment}' is not usable in a hostname"
        )));
    }
    Ok(())
}
