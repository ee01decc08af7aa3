use crate::traits::RetrievalApi;
use crate::{
    ApiError, ClientConfig, HealthStatus, IngestRequest, IngestResponse, QueryRequest,
    QueryResponse,
};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};

pub const DOCUMENTS_PATH: &str = "/documents";
pub const QUERY_PATH: &str = "/query";
pub const HEALTH_PATH: &str = "/health";

/// Shared client for the retrieval service. Cloning is cheap.
#[derive(Clone)]
pub struct HttpRetrievalClient {
    client: Arc<Client>,
    config: ClientConfig,
}

impl HttpRetrievalClient {
    pub fn new(config: ClientConfig) -> Result<Self, ApiError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let mut builder = Client::builder().default_headers(headers);
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: Arc::new(builder.build()?),
            config,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.config.endpoint(path);
        debug!(%url, "POST");
        let response = self.client.post(&url).json(body).send().await?;
        decode_response(path, response).await
    }

    async fn get_json<T>(&self, path: &str) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
    {
        let url = self.config.endpoint(path);
        debug!(%url, "GET");
        let response = self.client.get(&url).send().await?;
        decode_response(path, response).await
    }
}

#[async_trait]
impl RetrievalApi for HttpRetrievalClient {
    async fn ingest(&self, request: &IngestRequest) -> Result<IngestResponse, ApiError> {
        if request.is_empty() {
            return Err(ApiError::InvalidRequest(
                "ingest request must contain at least one document".to_string(),
            ));
        }

        let response: IngestResponse = self.post_json(DOCUMENTS_PATH, request).await?;
        debug!(
            documents = request.documents.len(),
            parents_created = response.parents_created,
            children_created = response.children_created,
            "ingest accepted"
        );
        Ok(response)
    }

    async fn query(&self, request: &QueryRequest) -> Result<QueryResponse, ApiError> {
        let response: QueryResponse = self.post_json(QUERY_PATH, request).await?;
        debug!(
            children = response.children.len(),
            parents = response.parents.len(),
            answered = response.answer.is_some(),
            "query answered"
        );
        Ok(response)
    }

    async fn health(&self) -> Result<HealthStatus, ApiError> {
        self.get_json(HEALTH_PATH).await
    }
}

async fn decode_response<T>(path: &str, response: Response) -> Result<T, ApiError>
where
    T: DeserializeOwned,
{
    let status = response.status();
    let body = response.bytes().await?;

    if !status.is_success() {
        let detail = extract_detail(&body);
        warn!(endpoint = path, %status, detail = detail.as_deref().unwrap_or(""), "request failed");
        return Err(ApiError::Status {
            endpoint: path.to_string(),
            status,
            detail,
        });
    }

    Ok(serde_json::from_slice(&body)?)
}

/// Pulls `detail` out of an error body. Strings are taken verbatim, other JSON
/// values (validation error lists) are rendered compactly.
pub fn extract_detail(body: &[u8]) -> Option<String> {
    let parsed: Value = serde_json::from_slice(body).ok()?;
    let detail = match parsed.get("detail")? {
        Value::Null => return None,
        Value::String(text) => text.clone(),
        other => other.to_string(),
    };

    if detail.trim().is_empty() {
        None
    } else {
        Some(detail)
    }
}

#[cfg(test)]
mod tests {
    use super::extract_detail;

    #[test]
    fn string_detail_is_taken_verbatim() {
        let body = br#"{"detail": "Embedding model unavailable"}"#;
        assert_eq!(extract_detail(body).as_deref(), Some("Embedding model unavailable"));
    }

    #[test]
    fn structured_detail_is_rendered_as_json() {
        let body = br#"{"detail": [{"loc": ["body", "query"], "msg": "field required"}]}"#;
        assert_eq!(
            extract_detail(body).as_deref(),
            Some(r#"[{"loc":["body","query"],"msg":"field required"}]"#)
        );
    }

    #[test]
    fn missing_or_unusable_detail_yields_none() {
        assert_eq!(extract_detail(b"Internal Server Error"), None);
        assert_eq!(extract_detail(br#"{"error": "boom"}"#), None);
        assert_eq!(extract_detail(br#"{"detail": null}"#), None);
        assert_eq!(extract_detail(br#"{"detail": "  "}"#), None);
    }
}
