use serde::{Deserialize, Serialize};

use crate::data_models::SearchResult;

#[derive(Debug, Serialize, Deserialize)]
pub struct SearchRequest {
    pub query: String,
}

/// Body of `POST /search`. Failure bodies usually carry only `error`, so every
/// field defaults; a missing `success` reads as a failure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub results: Vec<SearchResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
}

impl SearchResponse {
    pub fn ok(results: Vec<SearchResult>) -> SearchResponse {
        SearchResponse {
            success: true,
            count: Some(results.len()),
            results,
            ..Default::default()
        }
    }

    pub fn with_summary(mut self, summary: impl Into<String>) -> SearchResponse {
        self.summary = Some(summary.into());
        self
    }

    pub fn failed(error: Option<String>) -> SearchResponse {
        SearchResponse {
            success: false,
            error,
            ..Default::default()
        }
    }

    /// Summary text, treating an empty string as absent.
    pub fn summary(&self) -> Option<&str> {
        self.summary.as_deref().filter(|s| !s.trim().is_empty())
    }
}

/// Body of `GET /health`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    #[serde(default)]
    pub vector_store_available: bool,
    /// Whether summaries can be generated. Older services omit it.
    #[serde(default, rename = "yandex_gpt_available")]
    pub summarizer_available: Option<bool>,
}

impl HealthResponse {
    pub fn is_healthy(&self) -> bool {
        self.status == "healthy" && self.vector_store_available
    }
}
