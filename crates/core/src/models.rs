use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use serde_with::skip_serializing_none;

pub const DEFAULT_TOP_CHILDREN: u32 = 30;
pub const DEFAULT_MAX_PARENTS: u32 = 4;

/// One document handed to the backend for splitting into parents and children.
#[skip_serializing_none]
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DocumentInput {
    pub title: String,
    pub text: String,
    /// Caller-side correlation id; the backend generates one when absent.
    #[serde(default)]
    pub doc_id: Option<String>,
}

impl DocumentInput {
    pub fn new(title: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            text: text.into(),
            doc_id: None,
        }
    }

    pub fn with_doc_id(mut self, doc_id: impl Into<String>) -> Self {
        self.doc_id = Some(doc_id.into());
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IngestRequest {
    pub documents: Vec<DocumentInput>,
}

impl IngestRequest {
    pub fn single(document: DocumentInput) -> Self {
        Self {
            documents: vec![document],
        }
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct IngestResponse {
    pub parents_created: u64,
    pub children_created: u64,
}

/// Fine-grained retrieval unit linked to a parent section by `parent_id`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChildHit {
    pub id: String,
    pub parent_id: String,
    pub doc_id: String,
    #[serde(default)]
    pub title: Option<String>,
    pub score: f64,
    pub snippet: String,
    #[serde(default)]
    pub metadata: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ParentContext {
    pub parent_id: String,
    pub doc_id: String,
    #[serde(default)]
    pub title: Option<String>,
    pub score: f64,
    pub text: String,
}

#[skip_serializing_none]
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct QueryRequest {
    pub query: String,
    #[serde(default)]
    pub top_children: Option<u32>,
    #[serde(default)]
    pub max_parents: Option<u32>,
    #[serde(default)]
    pub generate_answer: Option<bool>,
}

impl QueryRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            top_children: None,
            max_parents: None,
            generate_answer: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QueryResponse {
    pub query: String,
    #[serde(default)]
    pub children: Vec<ChildHit>,
    #[serde(default)]
    pub parents: Vec<ParentContext>,
    #[serde(default)]
    pub answer: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HealthStatus {
    pub status: String,
}

impl HealthStatus {
    pub fn is_ok(&self) -> bool {
        self.status.eq_ignore_ascii_case("ok")
    }
}
