//! Search command implementation.

use crate::cli::{preflight, Output};
use crate::config::Settings;
use crate::search::{hybrid_request, AzureSearchClient, SearchBackend};
use anyhow::Result;

/// Run a hybrid search and show the full response.
pub async fn run_search(query: &str, top: Option<u32>, settings: Settings) -> Result<()> {
    let credentials = preflight::credentials(&settings)?;

    let mut search_settings = settings.search.clone();
    if let Some(top) = top {
        search_settings.top = top;
    }

    let client = AzureSearchClient::new(
        credentials.search_endpoint(),
        &search_settings.index_name,
        &search_settings.api_version,
        credentials.search_key(),
    );

    let spinner = Output::spinner("Searching...");
    let results = client.search(&hybrid_request(query, &search_settings)).await;
    spinner.finish_and_clear();

    let response = match results {
        Ok(response) => response,
        Err(e) => {
            Output::error(&format!("Search failed: {}", e));
            return Err(e.into());
        }
    };

    if !response.answers().is_empty() {
        Output::header("Answers");
        for answer in response.answers() {
            let score = answer
                .score
                .map(|s| format!(" (score: {:.2})", s))
                .unwrap_or_default();
            println!("  [{}]{} {}", answer.key, score, answer.text);
        }
    }

    if response.documents.is_empty() {
        Output::warning("No results found matching your query.");
        return Ok(());
    }

    Output::success(&format!("Found {} results", response.documents.len()));
    for doc in &response.documents {
        Output::search_result(
            doc.id.as_deref().unwrap_or("<no id>"),
            doc.score,
            doc.reranker_score,
            doc.caption(),
            doc.content.as_deref().unwrap_or_default(),
        );
    }

    Ok(())
}
