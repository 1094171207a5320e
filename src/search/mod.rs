//! Azure AI Search hybrid queries.
//!
//! Provides the wire types for the `docs/search` REST endpoint, a backend
//! trait so retrieval can run against a fake in tests, and the retrieval
//! function exposed to the assistant as a tool.

mod client;
mod retrieval;

pub use client::AzureSearchClient;
pub use retrieval::{hybrid_request, join_contents, search_retrieval, strip_line_breaks};

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Trait for search backends.
#[async_trait]
pub trait SearchBackend: Send + Sync {
    /// Run one search request against the index.
    async fn search(&self, request: &SearchRequest) -> Result<SearchResponse>;
}

/// How the service parses and ranks the `search` text.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum QueryType {
    #[default]
    Simple,
    Full,
    Semantic,
}

/// Caption extraction mode for semantic queries.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum QueryCaptionType {
    None,
    Extractive,
}

/// Answer extraction mode for semantic queries.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum QueryAnswerType {
    None,
    Extractive,
}

/// A vector query. The service vectorizes `text` with the index's vectorizer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum VectorQuery {
    Text {
        text: String,
        k: u32,
        fields: String,
        exhaustive: bool,
    },
}

/// Body of a `POST /indexes/{index}/docs/search` request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
    /// Full-text query.
    pub search: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub vector_queries: Vec<VectorQuery>,
    /// Comma-separated list of fields to return.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub select: Option<String>,
    pub query_type: QueryType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub semantic_configuration: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub captions: Option<QueryCaptionType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answers: Option<QueryAnswerType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top: Option<u32>,
}

/// A caption extracted from a matching document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchCaption {
    pub text: String,
    #[serde(default)]
    pub highlights: Option<String>,
}

/// An extractive answer computed over the top results.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchAnswer {
    pub key: String,
    pub text: String,
    #[serde(default)]
    pub highlights: Option<String>,
    #[serde(default)]
    pub score: Option<f64>,
}

/// A document returned by the search service.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct SearchDocument {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(rename = "@search.score", default)]
    pub score: f64,
    #[serde(rename = "@search.rerankerScore", default)]
    pub reranker_score: Option<f64>,
    #[serde(rename = "@search.captions", default)]
    pub captions: Option<Vec<SearchCaption>>,
}

impl SearchDocument {
    /// First caption text, if the service produced one.
    pub fn caption(&self) -> Option<&str> {
        self.captions
            .as_ref()
            .and_then(|c| c.first())
            .map(|c| c.text.as_str())
    }
}

/// Response of a search request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct SearchResponse {
    #[serde(rename = "value", default)]
    pub documents: Vec<SearchDocument>,
    #[serde(rename = "@search.answers", default)]
    pub answers: Option<Vec<SearchAnswer>>,
}

impl SearchResponse {
    /// Extractive answers, empty when none were requested or found.
    pub fn answers(&self) -> &[SearchAnswer] {
        self.answers.as_deref().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_semantic_response() {
        let body = r#"{
            "@search.answers": [
                {"key": "doc-1", "text": "Venue is determined by the plan.", "highlights": null, "score": 0.91}
            ],
            "value": [
                {
                    "@search.score": 0.032,
                    "@search.rerankerScore": 2.71,
                    "@search.captions": [{"text": "The venue of any action...", "highlights": "<em>venue</em>"}],
                    "id": "doc-1",
                    "content": "Line one\nLine two"
                }
            ]
        }"#;

        let response: SearchResponse = serde_json::from_str(body).unwrap();
        assert_eq!(response.documents.len(), 1);
        assert_eq!(response.answers().len(), 1);
        assert_eq!(response.answers()[0].key, "doc-1");

        let doc = &response.documents[0];
        assert_eq!(doc.id.as_deref(), Some("doc-1"));
        assert_eq!(doc.reranker_score, Some(2.71));
        assert_eq!(doc.caption(), Some("The venue of any action..."));
    }

    #[test]
    fn test_parse_null_answers() {
        let body = r#"{"@search.answers": null, "value": []}"#;
        let response: SearchResponse = serde_json::from_str(body).unwrap();
        assert!(response.documents.is_empty());
        assert!(response.answers().is_empty());
    }
}
