use serde::{Deserialize, Serialize};

/// Output width of the embedding model (text-embedding-ada-002) that writes to
/// the index. A mismatch with the embedding pipeline is not caught here.
pub const EMBEDDING_DIMENSION: u32 = 1536;

pub const DEFAULT_PROVIDER_DOMAIN: &str = "pinecone.io";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    Cosine,
}

/// Fixed create-index parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexSpec {
    pub dimension: u32,
    pub metric: Metric,
}

impl Default for IndexSpec {
    fn default() -> Self {
        Self {
            dimension: EMBEDDING_DIMENSION,
            metric: Metric::Cosine,
        }
    }
}

/// Body of `POST /databases`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateIndexRequest {
    pub name: String,
    pub dimension: u32,
    pub metric: Metric,
}

impl CreateIndexRequest {
    pub fn new(name: impl Into<String>, spec: IndexSpec) -> Self {
        Self {
            name: name.into(),
            dimension: spec.dimension,
            metric: spec.metric,
        }
    }
}

/// Raw HTTP outcome handed back by a transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: String,
}

/// `https://controller.<environment>.<domain>`
pub fn controller_base_url(environment: &str, provider_domain: &str) -> String {
    format!("https://controller.{environment}.{provider_domain}")
}

pub fn create_index_url(base_url: &str) -> String {
    format!("{}/databases", base_url.trim_end_matches('/'))
}
