use async_trait::async_trait;

use crate::control_plane::types::{CreateIndexRequest, TransportResponse};
use crate::errors::TransportError;
use crate::secrets::ApiKey;

/// Sends the create-index request. Any HTTP status is a successful transport
/// outcome; only failures to get a response at all are errors.
#[async_trait]
pub trait ControlPlaneTransport: Send + Sync {
    async fn create_index(
        &self,
        url: &str,
        api_key: &ApiKey,
        request: &CreateIndexRequest,
    ) -> Result<TransportResponse, TransportError>;
}
