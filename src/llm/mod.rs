//! Chat model abstraction.
//!
//! The assistant talks to a [`ChatModel`]. The production implementation is
//! an Azure OpenAI deployment; completions can be cached on disk, keyed by
//! the full request, so repeated runs with the same seed are reproducible.

mod azure;
mod cache;

pub use azure::AzureChatModel;
pub use cache::{CachedChatModel, CompletionCache, MemoryCompletionCache, SqliteCompletionCache};

use crate::config::Settings;
use crate::error::Result;
use crate::secrets::Credentials;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

/// Author of a chat message.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
    Tool,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::System => write!(f, "system"),
            Role::User => write!(f, "user"),
            Role::Assistant => write!(f, "assistant"),
            Role::Tool => write!(f, "tool"),
        }
    }
}

/// A tool invocation requested by the model.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ToolCallRequest {
    /// Provider-assigned call ID, echoed back in the tool result.
    pub id: String,
    /// Name of the tool to call.
    pub name: String,
    /// Raw JSON arguments.
    pub arguments: String,
}

/// A single message in a chat transcript.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatMessage {
    pub role: Role,
    /// Name of the agent that sent the message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tool_calls: Vec<ToolCallRequest>,
    /// Set on tool results.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
}

impl ChatMessage {
    fn new(role: Role, content: Option<String>) -> Self {
        Self {
            role,
            name: None,
            content,
            tool_calls: Vec::new(),
            tool_call_id: None,
        }
    }

    pub fn system(content: &str) -> Self {
        Self::new(Role::System, Some(content.to_string()))
    }

    pub fn user(content: &str) -> Self {
        Self::new(Role::User, Some(content.to_string()))
    }

    pub fn assistant(content: &str) -> Self {
        Self::new(Role::Assistant, Some(content.to_string()))
    }

    /// An assistant message that only requests tool calls.
    pub fn assistant_tool_calls(tool_calls: Vec<ToolCallRequest>) -> Self {
        Self {
            tool_calls,
            ..Self::new(Role::Assistant, None)
        }
    }

    /// The result of one tool call.
    pub fn tool(tool_call_id: &str, content: &str) -> Self {
        Self {
            tool_call_id: Some(tool_call_id.to_string()),
            ..Self::new(Role::Tool, Some(content.to_string()))
        }
    }

    /// Attach the sender's name.
    pub fn with_name(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }

    /// True if the message has neither text nor tool calls.
    pub fn is_empty(&self) -> bool {
        self.content.as_deref().map_or(true, str::is_empty) && self.tool_calls.is_empty()
    }
}

/// Description of a callable tool, as sent to the model.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ToolSchema {
    pub name: String,
    pub description: String,
    /// JSON schema of the arguments object.
    pub parameters: serde_json::Value,
}

/// Trait for chat completion backends.
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Produce the next assistant message for a transcript.
    async fn complete(&self, messages: &[ChatMessage], tools: &[ToolSchema]) -> Result<ChatMessage>;

    /// Model or deployment name.
    fn model(&self) -> &str;
}

/// Build the configured chat model, wrapped in the response cache if enabled.
pub fn from_settings(settings: &Settings, credentials: &Credentials) -> Result<Arc<dyn ChatModel>> {
    let model = AzureChatModel::new(credentials, &settings.llm)?;

    if !settings.llm.cache_enabled {
        return Ok(Arc::new(model));
    }

    let path = settings.cache_path(settings.llm.cache_seed);
    info!("Using completion cache at {:?}", path);
    let cache = Arc::new(SqliteCompletionCache::new(&path)?);
    Ok(Arc::new(CachedChatModel::new(model, cache)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_serialization_skips_empty_fields() {
        let json = serde_json::to_value(ChatMessage::user("hi")).unwrap();
        assert_eq!(json, serde_json::json!({"role": "user", "content": "hi"}));

        let json = serde_json::to_value(ChatMessage::tool("call_1", "result")).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"role": "tool", "content": "result", "tool_call_id": "call_1"})
        );
    }

    #[test]
    fn test_is_empty() {
        assert!(ChatMessage::assistant("").is_empty());
        assert!(!ChatMessage::assistant("done").is_empty());

        let call = ToolCallRequest {
            id: "call_1".to_string(),
            name: "search_retrieval".to_string(),
            arguments: "{}".to_string(),
        };
        assert!(!ChatMessage::assistant_tool_calls(vec![call]).is_empty());
    }
}
