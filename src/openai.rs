//! Azure OpenAI client configuration.

use crate::error::Result;
use crate::secrets::Credentials;
use async_openai::{config::AzureConfig, Client};
use std::time::Duration;

/// Create an Azure OpenAI client for the credentials' deployment.
///
/// Every request made through the client is bounded by `timeout`.
pub fn create_client(
    credentials: &Credentials,
    api_version: &str,
    timeout: Duration,
) -> Result<Client<AzureConfig>> {
    let http_client = reqwest::Client::builder().timeout(timeout).build()?;

    let config = AzureConfig::new()
        .with_api_base(credentials.llm_endpoint())
        .with_api_key(credentials.llm_api_key())
        .with_deployment_id(credentials.deployment())
        .with_api_version(api_version);

    Ok(Client::with_config(config).with_http_client(http_client))
}
