use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use parent_retrieval_core::{
    ApiError, ClientConfig, DocumentInput, HttpRetrievalClient, IngestForm, IngestRequest,
    QueryForm, QueryRequest, RetrievalApi, INGEST_FAILED,
};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};

#[derive(Clone, Default)]
struct Recorded {
    bodies: Arc<Mutex<Vec<Value>>>,
    content_types: Arc<Mutex<Vec<String>>>,
}

impl Recorded {
    fn record(&self, headers: &HeaderMap, body: Value) {
        let content_type = headers
            .get("content-type")
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default()
            .to_string();
        self.content_types.lock().unwrap().push(content_type);
        self.bodies.lock().unwrap().push(body);
    }
}

async fn ingest_ok(
    State(recorded): State<Recorded>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    recorded.record(&headers, body);
    (
        StatusCode::CREATED,
        Json(json!({"parents_created": 2, "children_created": 9})),
    )
}

async fn query_ok(
    State(recorded): State<Recorded>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Json<Value> {
    let query = body["query"].clone();
    recorded.record(&headers, body);
    Json(json!({
        "query": query,
        "children": [
            {
                "id": "c-2",
                "parent_id": "p-1",
                "doc_id": "doc-1",
                "title": "Invoice Terms",
                "score": 0.912,
                "snippet": "Late fees of 2% apply.",
                "metadata": {"child_index": 2}
            },
            {
                "id": "c-1",
                "parent_id": "p-1",
                "doc_id": "doc-1",
                "score": 0.5,
                "snippet": "Payment is due in 30 days."
            }
        ],
        "parents": [
            {
                "parent_id": "p-1",
                "doc_id": "doc-1",
                "title": null,
                "score": 0.912,
                "text": "Payment is due in 30 days. Late fees of 2% apply."
            }
        ],
        "answer": "Payment is due in 30 days."
    }))
}

async fn health_ok() -> Json<Value> {
    Json(json!({"status": "ok"}))
}

async fn ingest_rejected() -> (StatusCode, Json<Value>) {
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(json!({"detail": "documents must contain text"})),
    )
}

async fn query_broken() -> (StatusCode, &'static str) {
    (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error")
}

async fn spawn_backend(router: Router) -> HttpRetrievalClient {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral port");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });

    let config = ClientConfig::resolve("/api", &format!("http://{addr}")).expect("config");
    HttpRetrievalClient::new(config).expect("client")
}

fn healthy_router(recorded: Recorded) -> Router {
    Router::new()
        .route("/api/documents", post(ingest_ok))
        .route("/api/query", post(query_ok))
        .route("/api/health", get(health_ok))
        .with_state(recorded)
}

#[tokio::test]
async fn ingest_posts_json_documents_under_base_path() {
    let recorded = Recorded::default();
    let client = spawn_backend(healthy_router(recorded.clone())).await;

    let request = IngestRequest {
        documents: vec![
            DocumentInput::new("Terms", "Payment is due in 30 days."),
            DocumentInput::new("Fees", "Late fees apply.").with_doc_id("fees-v2"),
        ],
    };
    let response = client.ingest(&request).await.expect("ingest succeeds");

    assert_eq!(response.parents_created, 2);
    assert_eq!(response.children_created, 9);
    let bodies = recorded.bodies.lock().unwrap().clone();
    assert_eq!(
        bodies,
        vec![json!({"documents": [
            {"title": "Terms", "text": "Payment is due in 30 days."},
            {"title": "Fees", "text": "Late fees apply.", "doc_id": "fees-v2"}
        ]})]
    );
    assert!(recorded.content_types.lock().unwrap()[0].starts_with("application/json"));
}

#[tokio::test]
async fn empty_ingest_is_rejected_before_sending() {
    let recorded = Recorded::default();
    let client = spawn_backend(healthy_router(recorded.clone())).await;

    let error = client
        .ingest(&IngestRequest { documents: Vec::new() })
        .await
        .expect_err("empty request");

    assert!(matches!(error, ApiError::InvalidRequest(_)));
    assert!(recorded.bodies.lock().unwrap().is_empty());
}

#[tokio::test]
async fn query_response_keeps_backend_order() {
    let recorded = Recorded::default();
    let client = spawn_backend(healthy_router(recorded.clone())).await;

    let mut request = QueryRequest::new("late fees");
    request.top_children = Some(50);
    let response = client.query(&request).await.expect("query succeeds");

    let ids: Vec<_> = response.children.iter().map(|hit| hit.id.as_str()).collect();
    assert_eq!(ids, vec!["c-2", "c-1"]);
    assert_eq!(response.children[0].metadata.get("child_index"), Some(&json!(2)));
    assert!(response.parents[0].title.is_none());
    assert_eq!(response.answer.as_deref(), Some("Payment is due in 30 days."));
    assert_eq!(
        recorded.bodies.lock().unwrap()[0],
        json!({"query": "late fees", "top_children": 50})
    );
}

#[tokio::test]
async fn health_reports_ok() {
    let client = spawn_backend(healthy_router(Recorded::default())).await;
    let health = client.health().await.expect("health");
    assert!(health.is_ok());
}

#[tokio::test]
async fn forms_surface_server_detail_and_generic_failures() {
    let router = Router::new()
        .route("/api/documents", post(ingest_rejected))
        .route("/api/query", post(query_broken));
    let client = spawn_backend(router).await;

    let mut ingest = IngestForm::new();
    ingest.title = "Terms".to_string();
    ingest.text = "Body".to_string();
    let status = ingest.submit(&client).await.cloned().expect("sent");
    assert_eq!(status.to_string(), "documents must contain text");
    assert!(!status.is_success());

    let mut query = QueryForm::new();
    query.query = "late fees".to_string();
    assert!(query.submit(&client).await);
    assert_eq!(query.error(), Some("Query failed"));
    assert!(query.result().is_none());
}

#[tokio::test]
async fn unreachable_backend_uses_generic_message() {
    let config = ClientConfig::resolve("http://127.0.0.1:9/api", "http://localhost").expect("config");
    let client = HttpRetrievalClient::new(config).expect("client");

    let mut ingest = IngestForm::new();
    ingest.title = "Terms".to_string();
    ingest.text = "Body".to_string();
    let status = ingest.submit(&client).await.cloned().expect("sent");
    assert_eq!(status.to_string(), INGEST_FAILED);
    assert_eq!(ingest.text, "Body");
}
