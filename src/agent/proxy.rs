//! User proxy agent: runs tools on behalf of the assistant.

use super::tools::{Tool, ToolRegistry};
use super::ToolCallRecord;
use crate::config::AgentSettings;
use crate::llm::{ChatMessage, ToolCallRequest};
use std::sync::Arc;
use tracing::{info, warn};

/// True if the message has content containing the termination token.
pub fn is_termination_msg(message: &ChatMessage, token: &str) -> bool {
    message
        .content
        .as_deref()
        .is_some_and(|content| content.contains(token))
}

/// An agent with no model and no human input that executes tool calls.
pub struct UserProxyAgent {
    name: String,
    registry: ToolRegistry,
    termination_token: String,
    max_consecutive_auto_reply: usize,
    default_auto_reply: String,
}

impl UserProxyAgent {
    /// Create a proxy with the standard `TERMINATE` token and no tools.
    pub fn new(name: &str) -> Self {
        Self::from_settings(&AgentSettings {
            user_proxy_name: name.to_string(),
            ..AgentSettings::default()
        })
    }

    /// Create a proxy from agent settings.
    pub fn from_settings(settings: &AgentSettings) -> Self {
        Self {
            name: settings.user_proxy_name.clone(),
            registry: ToolRegistry::new(),
            termination_token: settings.termination_token.clone(),
            max_consecutive_auto_reply: settings.max_consecutive_auto_reply,
            default_auto_reply: settings.default_auto_reply.clone(),
        }
    }

    /// Set the maximum number of automatic replies in one chat.
    pub fn with_max_consecutive_auto_reply(mut self, max: usize) -> Self {
        self.max_consecutive_auto_reply = max;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn max_consecutive_auto_reply(&self) -> usize {
        self.max_consecutive_auto_reply
    }

    /// Make a tool executable by this proxy.
    pub fn register_for_execution(&mut self, tool: Arc<dyn Tool>) {
        self.registry.register(tool);
    }

    /// Whether a received message ends the chat.
    pub fn is_termination_msg(&self, message: &ChatMessage) -> bool {
        is_termination_msg(message, &self.termination_token)
    }

    /// Build the proxy's automatic reply to a message from the assistant.
    ///
    /// Tool calls produce one tool message each; anything else gets the
    /// default auto-reply.
    pub(super) async fn auto_reply(
        &self,
        message: &ChatMessage,
        records: &mut Vec<ToolCallRecord>,
    ) -> Vec<ChatMessage> {
        if message.tool_calls.is_empty() {
            return vec![ChatMessage::user(&self.default_auto_reply).with_name(&self.name)];
        }

        let mut replies = Vec::with_capacity(message.tool_calls.len());
        for call in &message.tool_calls {
            let record = self.execute_tool_call(call).await;
            replies.push(ChatMessage::tool(&call.id, &record.result));
            records.push(record);
        }
        replies
    }

    /// Execute a single tool call and return a record of it.
    ///
    /// Failures are reported back to the model as text rather than aborting.
    async fn execute_tool_call(&self, call: &ToolCallRequest) -> ToolCallRecord {
        info!("{} executing tool: {} with args: {}", self.name, call.name, call.arguments);

        let result = match self.registry.execute(&call.name, &call.arguments).await {
            Ok(output) => output,
            Err(e) => {
                warn!("Tool {} failed: {}", call.name, e);
                format!("Error: {}", e)
            }
        };

        ToolCallRecord {
            name: call.name.clone(),
            arguments: call.arguments.clone(),
            result,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_termination_requires_token_substring() {
        assert!(is_termination_msg(&ChatMessage::assistant("TERMINATE"), "TERMINATE"));
        assert!(is_termination_msg(
            &ChatMessage::assistant("The venue is King County.\n\nTERMINATE"),
            "TERMINATE"
        ));
        assert!(is_termination_msg(&ChatMessage::assistant("xTERMINATEDx"), "TERMINATE"));
    }

    #[test]
    fn test_termination_is_case_sensitive() {
        assert!(!is_termination_msg(&ChatMessage::assistant("terminate"), "TERMINATE"));
        assert!(!is_termination_msg(&ChatMessage::assistant("Terminate now"), "TERMINATE"));
    }

    #[test]
    fn test_missing_content_never_terminates() {
        let message = ChatMessage::assistant_tool_calls(vec![ToolCallRequest {
            id: "call_1".to_string(),
            name: "TERMINATE".to_string(),
            arguments: "{}".to_string(),
        }]);
        assert!(!is_termination_msg(&message, "TERMINATE"));
    }

    #[tokio::test]
    async fn test_auto_reply_without_tool_calls() {
        let proxy = UserProxyAgent::new("User");
        let mut records = Vec::new();
        let replies = proxy
            .auto_reply(&ChatMessage::assistant("thinking"), &mut records)
            .await;

        assert_eq!(replies.len(), 1);
        assert_eq!(replies[0].content.as_deref(), Some(""));
        assert_eq!(replies[0].name.as_deref(), Some("User"));
        assert!(records.is_empty());
    }

    #[tokio::test]
    async fn test_unknown_tool_is_reported_as_text() {
        let proxy = UserProxyAgent::new("User");
        let mut records = Vec::new();
        let message = ChatMessage::assistant_tool_calls(vec![ToolCallRequest {
            id: "call_9".to_string(),
            name: "missing".to_string(),
            arguments: "{}".to_string(),
        }]);

        let replies = proxy.auto_reply(&message, &mut records).await;
        assert_eq!(replies.len(), 1);
        assert_eq!(replies[0].tool_call_id.as_deref(), Some("call_9"));
        assert!(replies[0].content.as_deref().unwrap().starts_with("Error:"));
        assert_eq!(records.len(), 1);
    }
}
