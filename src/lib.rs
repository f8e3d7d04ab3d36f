pub mod config;
pub mod control_plane;
pub mod errors;
pub mod handler;
pub mod provisioner;
pub mod secrets;
pub mod vector_store;

use std::sync::Arc;

use crate::config::{AppConfig, SecretBackend};
use crate::control_plane::ReqwestTransport;
use crate::errors::{AppError, AppResult};
use crate::handler::InvocationResponse;
use crate::provisioner::IndexProvisioner;
use crate::secrets::{EnvSecretStore, SecretStore};

/// Wire the configured secret backend and HTTP transport into a provisioner.
pub async fn build_provisioner(config: &AppConfig) -> AppResult<IndexProvisioner> {
    let secrets: Arc<dyn SecretStore> = match config.secrets.backend {
        SecretBackend::Env => Arc::new(EnvSecretStore::new(config.secrets.env_prefix.clone())),
        #[cfg(feature = "aws")]
        SecretBackend::AwsSecretsManager => Arc::new(
            secrets::AwsSecretsManagerStore::from_env(config.secret_timeout()).await,
        ),
        #[cfg(not(feature = "aws"))]
        SecretBackend::AwsSecretsManager => {
            return Err(AppError::Config(
                "aws_secrets_manager backend requires the `aws` feature".into(),
            ))
        }
    };
    let transport = ReqwestTransport::new(config.request_timeout())
        .map_err(|e| AppError::Config(format!("HTTP client: {e}")))?;

    tracing::debug!(store = secrets.name(), "provisioner wired");
    Ok(IndexProvisioner::new(
        secrets,
        Arc::new(transport),
        config.provisioner_settings()?,
    ))
}

/// One-shot entry point used by the binary.
pub async fn run() -> AppResult<InvocationResponse> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    // Load .env file if present (ignore error if not found)
    let _ = dotenvy::dotenv();

    let config = config::load_config()?;
    let provisioner = build_provisioner(&config).await?;
    Ok(handler::handle(&provisioner, &config).await)
}
