//! Retrieve command implementation.

use crate::cli::{preflight, Output};
use crate::config::Settings;
use crate::search::{search_retrieval, AzureSearchClient};
use anyhow::Result;

/// Run the retrieval tool for a query and print exactly what the assistant would see.
pub async fn run_retrieve(query: &str, settings: Settings) -> Result<()> {
    let credentials = preflight::credentials(&settings)?;

    let client = AzureSearchClient::new(
        credentials.search_endpoint(),
        &settings.search.index_name,
        &settings.search.api_version,
        credentials.search_key(),
    );

    let spinner = Output::spinner("Searching...");
    let result = search_retrieval(&client, &settings.search, query).await;
    spinner.finish_and_clear();

    match result {
        Ok(content) if content.is_empty() => {
            Output::warning("No documents returned.");
        }
        Ok(content) => {
            println!("{}", content);
        }
        Err(e) => {
            Output::error(&format!("Retrieval failed: {}", e));
            return Err(e.into());
        }
    }

    Ok(())
}
