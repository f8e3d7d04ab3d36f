use std::time::Duration;

use async_trait::async_trait;

use crate::control_plane::transport::ControlPlaneTransport;
use crate::control_plane::types::{CreateIndexRequest, TransportResponse};
use crate::errors::TransportError;
use crate::secrets::ApiKey;

/// `reqwest`-backed transport. The client carries a request timeout.
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new(timeout: Duration) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout)
            .build()
            .map_err(|e| TransportError::Other(e.to_string()))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl ControlPlaneTransport for ReqwestTransport {
    async fn create_index(
        &self,
        url: &str,
        api_key: &ApiKey,
        request: &CreateIndexRequest,
    ) -> Result<TransportResponse, TransportError> {
        tracing::debug!(
            url = %url,
            index = %request.name,
            dimension = request.dimension,
            "sending create-index request"
        );

        let response = self
            .client
            .post(url)
            .header("Api-Key", api_key.expose())
            .json(request)
            .send()
            .await?;

        let status = response.status().as_u16();
        // A body cut off mid-stream is a transport failure, not an HTTP outcome.
        let body = response.text().await?;
        tracing::debug!(status, body_len = body.len(), "create-index response received");

        Ok(TransportResponse { status, body })
    }
}
