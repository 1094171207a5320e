//! The retrieval function handed to the assistant as a tool.

use super::{
    QueryAnswerType, QueryCaptionType, QueryType, SearchBackend, SearchDocument, SearchRequest,
    VectorQuery,
};
use crate::config::SearchSettings;
use crate::error::{FinnError, Result};
use tracing::{info, instrument};

/// Build the hybrid keyword + vector + semantic request for a query.
pub fn hybrid_request(query: &str, settings: &SearchSettings) -> SearchRequest {
    SearchRequest {
        search: query.to_string(),
        vector_queries: vec![VectorQuery::Text {
            text: query.to_string(),
            k: settings.k_nearest_neighbors,
            fields: settings.vector_field.clone(),
            exhaustive: settings.exhaustive,
        }],
        select: Some(settings.select.join(",")),
        query_type: QueryType::Semantic,
        semantic_configuration: Some(settings.semantic_configuration.clone()),
        captions: Some(QueryCaptionType::Extractive),
        answers: Some(QueryAnswerType::Extractive),
        top: Some(settings.top),
    }
}

/// Remove every carriage return and line feed.
pub fn strip_line_breaks(text: &str) -> String {
    text.chars().filter(|c| *c != '\n' && *c != '\r').collect()
}

/// Flatten each document's content onto one line and join them with newlines.
///
/// A document without `content` is an error, since the request always selects it.
pub fn join_contents(documents: &[SearchDocument]) -> Result<String> {
    let lines = documents
        .iter()
        .map(|d| match d.content.as_deref() {
            Some(content) => Ok(strip_line_breaks(content)),
            None => Err(FinnError::Search(format!(
                "document {} has no content",
                d.id.as_deref().unwrap_or("<unknown>")
            ))),
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(lines.join("\n"))
}

/// Search the index for `query` and return the matching content as plain text.
///
/// Search failures are returned unchanged; nothing is retried.
#[instrument(skip(backend, settings))]
pub async fn search_retrieval(
    backend: &dyn SearchBackend,
    settings: &SearchSettings,
    query: &str,
) -> Result<String> {
    if query.trim().is_empty() {
        return Err(FinnError::InvalidInput("Search query is empty".to_string()));
    }

    let request = hybrid_request(query, settings);
    let response = backend.search(&request).await?;

    info!("Retrieved {} documents", response.documents.len());
    join_contents(&response.documents)
}
