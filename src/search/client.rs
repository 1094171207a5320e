//! REST client for the Azure AI Search `docs/search` endpoint.

use super::{SearchBackend, SearchRequest, SearchResponse};
use crate::error::{FinnError, Result};
use async_trait::async_trait;
use tracing::{debug, instrument};
use url::Url;

/// Search client bound to one index on one service.
pub struct AzureSearchClient {
    http: reqwest::Client,
    endpoint: String,
    index_name: String,
    api_version: String,
    api_key: String,
}

impl AzureSearchClient {
    /// Create a client for an index. `endpoint` is the service root URL.
    pub fn new(endpoint: &str, index_name: &str, api_version: &str, api_key: &str) -> Self {
        Self::with_http_client(reqwest::Client::new(), endpoint, index_name, api_version, api_key)
    }

    /// Create a client reusing an existing HTTP connection pool.
    pub fn with_http_client(
        http: reqwest::Client,
        endpoint: &str,
        index_name: &str,
        api_version: &str,
        api_key: &str,
    ) -> Self {
        Self {
            http,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            index_name: index_name.to_string(),
            api_version: api_version.to_string(),
            api_key: api_key.to_string(),
        }
    }

    /// Name of the index this client queries.
    pub fn index_name(&self) -> &str {
        &self.index_name
    }

    /// Full URL of the search endpoint, including the API version.
    pub fn search_url(&self) -> Result<Url> {
        let mut url = Url::parse(&format!(
            "{}/indexes/{}/docs/search",
            self.endpoint, self.index_name
        ))?;
        url.query_pairs_mut()
            .append_pair("api-version", &self.api_version);
        Ok(url)
    }
}

#[async_trait]
impl SearchBackend for AzureSearchClient {
    #[instrument(skip(self, request), fields(index = %self.index_name))]
    async fn search(&self, request: &SearchRequest) -> Result<SearchResponse> {
        let url = self.search_url()?;
        debug!("POST {}", url);

        let response = self
            .http
            .post(url)
            .header("api-key", &self.api_key)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FinnError::Search(format!("{}: {}", status, body)));
        }

        let parsed: SearchResponse = response.json().await?;
        debug!("Search returned {} documents", parsed.documents.len());
        Ok(parsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SearchSettings;
    use crate::search::hybrid_request;
    use mockito::{Matcher, Server};

    #[test]
    fn test_search_url() {
        let client = AzureSearchClient::new(
            "https://aisearch02.search.windows.net/",
            "aisearch-index-recursive",
            "2024-06-01-preview",
            "key",
        );
        assert_eq!(
            client.search_url().unwrap().as_str(),
            "https://aisearch02.search.windows.net/indexes/aisearch-index-recursive/docs/search?api-version=2024-06-01-preview"
        );
    }

    #[tokio::test]
    async fn test_search_posts_hybrid_request() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/indexes/idx/docs/search")
            .match_query(Matcher::UrlEncoded(
                "api-version".into(),
                "2024-06-01-preview".into(),
            ))
            .match_header("api-key", "admin-key")
            .match_body(Matcher::PartialJson(serde_json::json!({
                "search": "venue",
                "queryType": "semantic",
                "top": 1
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"value": [{"@search.score": 1.0, "id": "1", "content": "Body"}]}"#)
            .create_async()
            .await;

        let client = AzureSearchClient::new(&server.url(), "idx", "2024-06-01-preview", "admin-key");
        let request = hybrid_request("venue", &SearchSettings::default());
        let response = client.search(&request).await.unwrap();

        mock.assert_async().await;
        assert_eq!(response.documents.len(), 1);
        assert_eq!(response.documents[0].content.as_deref(), Some("Body"));
    }

    #[tokio::test]
    async fn test_search_error_status_propagates() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/indexes/idx/docs/search")
            .match_query(Matcher::Any)
            .with_status(403)
            .with_body("Forbidden")
            .create_async()
            .await;

        let client = AzureSearchClient::new(&server.url(), "idx", "2024-06-01-preview", "bad-key");
        let request = hybrid_request("venue", &SearchSettings::default());
        let err = client.search(&request).await.unwrap_err();

        match err {
            FinnError::Search(msg) => {
                assert!(msg.contains("403"));
                assert!(msg.contains("Forbidden"));
            }
            other => panic!("Expected Search error, got {:?}", other),
        }
    }
}
