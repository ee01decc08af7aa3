use crate::{
    ApiError, HealthStatus, IngestRequest, IngestResponse, QueryRequest, QueryResponse,
};
use async_trait::async_trait;

/// The two endpoints of the retrieval service, plus its liveness probe.
#[async_trait]
pub trait RetrievalApi {
    async fn ingest(&self, request: &IngestRequest) -> Result<IngestResponse, ApiError>;

    async fn query(&self, request: &QueryRequest) -> Result<QueryResponse, ApiError>;

    async fn health(&self) -> Result<HealthStatus, ApiError>;
}
