use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::control_plane::classify::{DEFAULT_CONFLICT_BODY_PATTERN, DEFAULT_CONFLICT_STATUSES};
use crate::control_plane::types::DEFAULT_PROVIDER_DOMAIN;
use crate::control_plane::{ConflictPolicy, IndexSpec};
use crate::errors::{AppResult, ProvisionError};
use crate::provisioner::{ProvisionerSettings, RetryPolicy};
use crate::secrets::EnvSecretStore;
use crate::vector_store::VectorStoreDescriptor;

/// Environment variables handed to the provisioning function by the stack.
pub const ENV_SECRET_REF: &str = "PINECONE_API_KEY_SECRET_ARN";
pub const ENV_ENVIRONMENT: &str = "PINECONE_ENVIRONMENT";
pub const ENV_INDEX_NAME: &str = "PINECONE_INDEX_NAME";
pub const ENV_CONTROL_PLANE_URL: &str = "KB_CONTROL_PLANE_URL";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub vector_store: VectorStoreConfig,
    #[serde(default)]
    pub control_plane: ControlPlaneConfig,
    #[serde(default)]
    pub secrets: SecretsConfig,
    #[serde(default)]
    pub retry: RetryPolicy,
}

/// Raw descriptor fields; validated by [`AppConfig::descriptor`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VectorStoreConfig {
    #[serde(default)]
    pub index_name: String,
    #[serde(default)]
    pub environment: String,
    /// Secret ARN or name; never the key itself.
    #[serde(default)]
    pub credential_ref: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ControlPlaneConfig {
    #[serde(default = "default_provider_domain")]
    pub provider_domain: String,
    /// Overrides `https://controller.<environment>.<provider_domain>`.
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_conflict_statuses")]
    pub conflict_statuses: Vec<u16>,
    /// Regex matched against 4xx bodies; empty disables body matching.
    #[serde(default = "default_conflict_body_pattern")]
    pub conflict_body_pattern: String,
}

fn default_provider_domain() -> String {
    DEFAULT_PROVIDER_DOMAIN.to_string()
}

fn default_request_timeout_secs() -> u64 {
    10
}

fn default_conflict_statuses() -> Vec<u16> {
    DEFAULT_CONFLICT_STATUSES.to_vec()
}

fn default_conflict_body_pattern() -> String {
    DEFAULT_CONFLICT_BODY_PATTERN.to_string()
}

impl Default for ControlPlaneConfig {
    fn default() -> Self {
        Self {
            provider_domain: default_provider_domain(),
            base_url: None,
            request_timeout_secs: default_request_timeout_secs(),
            conflict_statuses: default_conflict_statuses(),
            conflict_body_pattern: default_conflict_body_pattern(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SecretBackend {
    AwsSecretsManager,
    Env,
}

impl Default for SecretBackend {
    fn default() -> Self {
        if cfg!(feature = "aws") {
            Self::AwsSecretsManager
        } else {
            Self::Env
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecretsConfig {
    #[serde(default)]
    pub backend: SecretBackend,
    #[serde(default = "default_secret_timeout_secs")]
    pub timeout_secs: u64,
    /// Variable prefix for the `env` backend.
    #[serde(default = "default_env_prefix")]
    pub env_prefix: String,
}

fn default_secret_timeout_secs() -> u64 {
    5
}

fn default_env_prefix() -> String {
    EnvSecretStore::DEFAULT_PREFIX.to_string()
}

impl Default for SecretsConfig {
    fn default() -> Self {
        Self {
            backend: SecretBackend::default(),
            timeout_secs: default_secret_timeout_secs(),
            env_prefix: default_env_prefix(),
        }
    }
}

impl AppConfig {
    pub fn from_toml(content: &str) -> AppResult<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Environment wins over the file. `lookup` is `std::env::var` outside tests.
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup(ENV_SECRET_REF) {
            self.vector_store.credential_ref = v;
        }
        if let Some(v) = lookup(ENV_ENVIRONMENT) {
            self.vector_store.environment = v;
        }
        if let Some(v) = lookup(ENV_INDEX_NAME) {
            self.vector_store.index_name = v;
        }
        if let Some(v) = lookup(ENV_CONTROL_PLANE_URL) {
            self.control_plane.base_url = Some(v);
        }
    }

    pub fn descriptor(&self) -> Result<VectorStoreDescriptor, ProvisionError> {
        VectorStoreDescriptor::new(
            self.vector_store.index_name.clone(),
            self.vector_store.environment.clone(),
            self.vector_store.credential_ref.clone(),
        )
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.control_plane.request_timeout_secs.max(1))
    }

    pub fn secret_timeout(&self) -> Duration {
        Duration::from_secs(self.secrets.timeout_secs.max(1))
    }

    pub fn provisioner_settings(&self) -> AppResult<ProvisionerSettings> {
        let conflicts = ConflictPolicy::new(
            self.control_plane.conflict_statuses.clone(),
            Some(self.control_plane.conflict_body_pattern.as_str()),
        )?;
        Ok(ProvisionerSettings {
            provider_domain: self.control_plane.provider_domain.clone(),
            base_url_override: self.control_plane.base_url.clone().filter(|u| !u.is_empty()),
            request_timeout: self.request_timeout(),
            secret_timeout: self.secret_timeout(),
            conflicts,
            index_spec: IndexSpec::default(),
        })
    }
}

fn resolve_config_path() -> Option<PathBuf> {
    if let Ok(exe) = std::env::current_exe() {
        if let Some(parent) = exe.parent() {
            let candidate = parent.join("config.toml");
            if candidate.exists() {
                tracing::debug!(path = %candidate.display(), "config found next to executable");
                return Some(candidate);
            }
        }
    }

    let candidate = std::env::current_dir().ok()?.join("config.toml");
    if candidate.exists() {
        tracing::debug!(path = %candidate.display(), "config found in working directory");
        return Some(candidate);
    }
    None
}

pub fn load_config_from(path: &Path) -> AppResult<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    let config = AppConfig::from_toml(&content)?;
    tracing::info!(path = %path.display(), "config loaded");
    Ok(config)
}

/// Load `config.toml` (next to the executable, then the working directory) and
/// apply environment overrides. A missing file means defaults plus environment.
pub fn load_config() -> AppResult<AppConfig> {
    let mut config = match resolve_config_path() {
        Some(path) => load_config_from(&path)?,
        None => {
            tracing::debug!("no config.toml found, using defaults and environment");
            AppConfig::default()
        }
    };
    config.apply_env_overrides(|key| std::env::var(key).ok());
    Ok(config)
}
