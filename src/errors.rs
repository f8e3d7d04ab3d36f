use thiserror::Error;

/// Failures of a single create-index provisioning attempt.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProvisionError {
    #[error("Invalid descriptor: {0}")]
    InvalidDescriptor(String),

    #[error("Credential '{reference}' unavailable: {reason}")]
    CredentialUnavailable {
        reference: String,
        reason: CredentialFailure,
    },

    #[error("Credential malformed: {0}")]
    CredentialMalformed(String),

    #[error("Control plane API failure ({}): {body}", status_label(.status_code))]
    ApiFailure {
        status_code: Option<u16>,
        body: String,
    },
}

/// Why a credential reference could not be resolved.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CredentialFailure {
    #[error("secret not found: {0}")]
    NotFound(String),

    #[error("secret store unreachable: {0}")]
    Unreachable(String),

    #[error("secret store timed out")]
    Timeout,
}

fn status_label(status_code: &Option<u16>) -> String {
    match status_code {
        Some(code) => format!("HTTP {code}"),
        None => "transport".to_string(),
    }
}

impl ProvisionError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidDescriptor(msg.into())
    }

    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::ApiFailure { status_code, .. } => *status_code,
            _ => None,
        }
    }

    /// Whether an outer retry wrapper may try again. Descriptor and secret-shape
    /// problems need a configuration fix first.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::InvalidDescriptor(_) | Self::CredentialMalformed(_) => false,
            Self::CredentialUnavailable { reason, .. } => {
                !matches!(reason, CredentialFailure::NotFound(_))
            }
            Self::ApiFailure { status_code, .. } => match status_code {
                None => true,
                Some(429) => true,
                Some(code) => (500..600).contains(code),
            },
        }
    }
}

/// Secret-store level errors; `NotFound` and `Unreachable` stay distinguishable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SecretStoreError {
    #[error("secret '{0}' not found")]
    NotFound(String),

    #[error("secret store unreachable: {0}")]
    Unreachable(String),

    /// The secret exists but its value is not a string payload.
    #[error("secret has an unusable value: {0}")]
    Malformed(String),
}

/// Transport-level failures: no HTTP status was received.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("request timed out")]
    Timeout,

    #[error("connection failed: {0}")]
    Connect(String),

    #[error("transport error: {0}")]
    Other(String),
}

impl From<reqwest::Error> for TransportError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::Timeout
        } else if e.is_connect() {
            Self::Connect(e.to_string())
        } else {
            Self::Other(e.to_string())
        }
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML deserialize error: {0}")]
    TomlDe(#[from] toml::de::Error),

    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),
}

pub type AppResult<T> = Result<T, AppError>;
