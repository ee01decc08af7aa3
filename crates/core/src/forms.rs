//! Form state for the two user actions: ingesting a document and running a
//! query. Each form allows one outstanding request at a time: `begin` hands
//! out the request and marks the form busy, `finish` records the outcome.

use crate::traits::RetrievalApi;
use crate::{
    ApiError, DocumentInput, IngestRequest, IngestResponse, QueryRequest, QueryResponse,
    DEFAULT_MAX_PARENTS, DEFAULT_TOP_CHILDREN,
};
use std::fmt;

pub const INGEST_FAILED: &str = "Ingest failed";
pub const QUERY_FAILED: &str = "Query failed";

/// Parses a count input; zero and anything that is not a `u32` (negative,
/// fractional, or above `u32::MAX`) fall back to `default`.
pub fn parse_count(raw: &str, default: u32) -> u32 {
    match raw.trim().parse::<u32>() {
        Ok(0) | Err(_) => default,
        Ok(value) => value,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IngestStatus {
    Created { parents: u64, children: u64 },
    Failed(String),
}

impl IngestStatus {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Created { .. })
    }
}

impl From<IngestResponse> for IngestStatus {
    fn from(response: IngestResponse) -> Self {
        Self::Created {
            parents: response.parents_created,
            children: response.children_created,
        }
    }
}

impl fmt::Display for IngestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Created { parents, children } => write!(
                f,
                "Created {parents} parent(s) and {children} child chunk(s)."
            ),
            Self::Failed(message) => f.write_str(message),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct IngestForm {
    pub title: String,
    pub text: String,
    loading: bool,
    status: Option<IngestStatus>,
}

impl IngestForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn status(&self) -> Option<&IngestStatus> {
        self.status.as_ref()
    }

    pub fn can_submit(&self) -> bool {
        !self.loading && !self.title.trim().is_empty() && !self.text.trim().is_empty()
    }

    pub fn submit_label(&self) -> &'static str {
        if self.loading {
            "Ingesting…"
        } else {
            "Ingest as parent+children"
        }
    }

    pub fn begin(&mut self) -> Option<IngestRequest> {
        if !self.can_submit() {
            return None;
        }

        self.loading = true;
        self.status = None;
        Some(IngestRequest::single(DocumentInput::new(
            self.title.trim(),
            self.text.trim(),
        )))
    }

    pub fn finish(&mut self, outcome: Result<IngestResponse, ApiError>) -> &IngestStatus {
        self.loading = false;
        let status = match outcome {
            Ok(response) => {
                self.text.clear();
                IngestStatus::from(response)
            }
            Err(error) => IngestStatus::Failed(error.user_message(INGEST_FAILED)),
        };
        self.status.insert(status)
    }

    /// Returns `None` when the form was not submittable and nothing was sent.
    pub async fn submit<A>(&mut self, api: &A) -> Option<&IngestStatus>
    where
        A: RetrievalApi + ?Sized,
    {
        let request = self.begin()?;
        let outcome = api.ingest(&request).await;
        Some(self.finish(outcome))
    }
}

#[derive(Debug, Clone)]
pub struct QueryForm {
    pub query: String,
    pub top_children: u32,
    pub max_parents: u32,
    pub generate_answer: bool,
    loading: bool,
    result: Option<QueryResponse>,
    error: Option<String>,
}

impl Default for QueryForm {
    fn default() -> Self {
        Self {
            query: String::new(),
            top_children: DEFAULT_TOP_CHILDREN,
            max_parents: DEFAULT_MAX_PARENTS,
            generate_answer: true,
            loading: false,
            result: None,
            error: None,
        }
    }
}

impl QueryForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_top_children(&mut self, raw: &str) {
        self.top_children = parse_count(raw, DEFAULT_TOP_CHILDREN);
    }

    pub fn set_max_parents(&mut self, raw: &str) {
        self.max_parents = parse_count(raw, DEFAULT_MAX_PARENTS);
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn result(&self) -> Option<&QueryResponse> {
        self.result.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn can_submit(&self) -> bool {
        !self.loading && !self.query.trim().is_empty()
    }

    pub fn submit_label(&self) -> &'static str {
        if self.loading {
            "Running…"
        } else {
            "Run parent-aware query"
        }
    }

    pub fn begin(&mut self) -> Option<QueryRequest> {
        if !self.can_submit() {
            return None;
        }

        self.loading = true;
        self.error = None;
        self.result = None;
        Some(QueryRequest {
            query: self.query.trim().to_string(),
            top_children: Some(self.top_children),
            max_parents: Some(self.max_parents),
            generate_answer: Some(self.generate_answer),
        })
    }

    pub fn finish(&mut self, outcome: Result<QueryResponse, ApiError>) {
        self.loading = false;
        match outcome {
            Ok(response) => self.result = Some(response),
            Err(error) => self.error = Some(error.user_message(QUERY_FAILED)),
        }
    }

    /// Returns `false` when the form was not submittable and nothing was sent.
    pub async fn submit<A>(&mut self, api: &A) -> bool
    where
        A: RetrievalApi + ?Sized,
    {
        let Some(request) = self.begin() else {
            return false;
        };
        let outcome = api.query(&request).await;
        self.finish(outcome);
        true
    }
}
