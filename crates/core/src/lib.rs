pub mod client;
pub mod config;
pub mod documents;
pub mod error;
pub mod forms;
pub mod models;
pub mod render;
pub mod traits;

pub use client::{extract_detail, HttpRetrievalClient, DOCUMENTS_PATH, HEALTH_PATH, QUERY_PATH};
pub use config::{ClientConfig, BASE_URL_ENV, DEFAULT_BASE_URL, DEFAULT_ORIGIN, ORIGIN_ENV};
pub use documents::{
    discover_text_files, generate_document_id, load_document, load_folder_documents,
    DocumentBatch, SkippedDocument,
};
pub use error::{ApiError, DocumentError};
pub use forms::{parse_count, IngestForm, IngestStatus, QueryForm, INGEST_FAILED, QUERY_FAILED};
pub use models::{
    ChildHit, DocumentInput, HealthStatus, IngestRequest, IngestResponse, ParentContext,
    QueryRequest, QueryResponse, DEFAULT_MAX_PARENTS, DEFAULT_TOP_CHILDREN,
};
pub use render::{
    render_answer, render_child_header, render_children, render_parent_header, render_parents,
    render_query_response, NO_CHILD_HITS, NO_PARENT_SECTIONS,
};
pub use traits::RetrievalApi;
