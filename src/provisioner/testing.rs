//! Stub collaborators shared by the provisioner, retry and handler tests.

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::control_plane::{ControlPlaneTransport, CreateIndexRequest, TransportResponse};
use crate::errors::{SecretStoreError, TransportError};
use crate::provisioner::{IndexProvisioner, ProvisionerSettings};
use crate::secrets::{ApiKey, SecretStore};
use crate::vector_store::VectorStoreDescriptor;

pub(crate) fn descriptor() -> VectorStoreDescriptor {
    VectorStoreDescriptor::new("bedrock-kb-index", "us-west1-gcp", "secret-1").unwrap()
}

pub(crate) fn provisioner(
    secrets: MemorySecretStore,
    transport: Arc<StubTransport>,
) -> IndexProvisioner {
    IndexProvisioner::new(Arc::new(secrets), transport, ProvisionerSettings::default())
}

pub(crate) struct MemorySecretStore {
    secrets: HashMap<String, String>,
    failure: Option<SecretStoreError>,
}

impl MemorySecretStore {
    pub(crate) fn empty() -> Self {
        Self {
            secrets: HashMap::new(),
            failure: None,
        }
    }

    pub(crate) fn with(reference: &str, payload: &str) -> Self {
        let mut store = Self::empty();
        store.secrets.insert(reference.to_string(), payload.to_string());
        store
    }

    pub(crate) fn failing(err: SecretStoreError) -> Self {
        Self {
            secrets: HashMap::new(),
            failure: Some(err),
        }
    }

    pub(crate) fn unreachable() -> Self {
        Self::failing(SecretStoreError::Unreachable("dns failure".into()))
    }
}

#[async_trait]
impl SecretStore for MemorySecretStore {
    fn name(&self) -> &str {
        "memory"
    }

    async fn resolve(&self, reference: &str) -> Result<String, SecretStoreError> {
        if let Some(err) = &self.failure {
            return Err(err.clone());
        }
        self.secrets
            .get(reference)
            .cloned()
            .ok_or_else(|| SecretStoreError::NotFound(reference.to_string()))
    }
}

pub(crate) enum StubReply {
    Status { status: u16, body: String },
    Fail(TransportError),
    Hang,
}

impl StubReply {
    pub(crate) fn status(status: u16, body: &str) -> Self {
        Self::Status {
            status,
            body: body.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct RecordedCall {
    pub url: String,
    pub api_key: String,
    pub request: CreateIndexRequest,
}

enum Mode {
    Scripted(Mutex<VecDeque<StubReply>>),
    /// Acts like a control plane enforcing unique index names.
    UniqueNames(Mutex<HashSet<String>>),
}

pub(crate) struct StubTransport {
    mode: Mode,
    calls: Mutex<Vec<RecordedCall>>,
}

impl StubTransport {
    pub(crate) fn replying(replies: Vec<StubReply>) -> Arc<Self> {
        Arc::new(Self {
            mode: Mode::Scripted(Mutex::new(replies.into())),
            calls: Mutex::new(Vec::new()),
        })
    }

    pub(crate) fn unique_names() -> Arc<Self> {
        Arc::new(Self {
            mode: Mode::UniqueNames(Mutex::new(HashSet::new())),
            calls: Mutex::new(Vec::new()),
        })
    }

    pub(crate) fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ControlPlaneTransport for StubTransport {
    async fn create_index(
        &self,
        url: &str,
        api_key: &ApiKey,
        request: &CreateIndexRequest,
    ) -> Result<TransportResponse, TransportError> {
        self.calls.lock().unwrap().push(RecordedCall {
            url: url.to_string(),
            api_key: api_key.expose().to_string(),
            request: request.clone(),
        });

        let reply = match &self.mode {
            Mode::Scripted(replies) => replies.lock().unwrap().pop_front(),
            Mode::UniqueNames(names) => {
                let inserted = names.lock().unwrap().insert(request.name.clone());
                Some(if inserted {
                    StubReply::status(201, "")
                } else {
                    StubReply::status(409, r#"{"message":"already exists"}"#)
                })
            }
        };

        match reply {
            Some(StubReply::Status { status, body }) => Ok(TransportResponse { status, body }),
            Some(StubReply::Fail(e)) => Err(e),
            Some(StubReply::Hang) => std::future::pending().await,
            None => Err(TransportError::Other("no scripted reply".into())),
        }
    }
}
