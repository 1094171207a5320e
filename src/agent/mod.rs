//! Agent system for answering questions with tool calling.
//!
//! An [`AssistantAgent`] backed by a chat model decides when to call tools;
//! a [`UserProxyAgent`] with no model executes them and relays the results.
//! A tool is wired to both sides with [`register_function`].

mod assistant;
mod proxy;
mod runner;
mod tools;

pub use assistant::AssistantAgent;
pub use proxy::{is_termination_msg, UserProxyAgent};
pub use runner::{ChatResult, TerminationReason, ToolCallRecord};
pub use tools::{SearchRetrievalTool, Tool, ToolRegistry};

use crate::config::Settings;
use crate::error::Result;
use crate::llm;
use crate::search::AzureSearchClient;
use crate::secrets::Credentials;
use std::sync::Arc;

/// Let `caller` request `tool` and `executor` run it.
pub fn register_function(
    tool: Arc<dyn Tool>,
    caller: &mut AssistantAgent,
    executor: &mut UserProxyAgent,
) {
    caller.register_for_llm(tool.schema());
    executor.register_for_execution(tool);
}

/// Build the search assistant and its user proxy with `search_retrieval` registered.
pub fn build_search_agents(
    settings: &Settings,
    credentials: &Credentials,
) -> Result<(AssistantAgent, UserProxyAgent)> {
    let model = llm::from_settings(settings, credentials)?;

    let mut assistant = AssistantAgent::new(
        &settings.agent.assistant_name,
        &settings.agent.system_message,
        model,
    );
    let mut proxy = UserProxyAgent::from_settings(&settings.agent);

    let search_client = Arc::new(AzureSearchClient::new(
        credentials.search_endpoint(),
        &settings.search.index_name,
        &settings.search.api_version,
        credentials.search_key(),
    ));
    register_function(
        Arc::new(SearchRetrievalTool::new(search_client, settings.search.clone())),
        &mut assistant,
        &mut proxy,
    );

    Ok((assistant, proxy))
}
