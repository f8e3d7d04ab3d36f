pub mod classify;
pub mod http;
pub mod transport;
pub mod types;

pub use classify::{classify, Classification, ConflictPolicy};
pub use http::ReqwestTransport;
pub use transport::ControlPlaneTransport;
pub use types::{CreateIndexRequest, IndexSpec, Metric, TransportResponse};
