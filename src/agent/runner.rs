//! Two-agent chat loop.

use super::assistant::AssistantAgent;
use super::proxy::UserProxyAgent;
use crate::error::Result;
use crate::llm::ChatMessage;
use tracing::{debug, info};

/// Why a chat stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminationReason {
    /// A received message contained the termination token.
    TerminationMessage,
    /// The proxy used up its automatic replies.
    MaxAutoReplies,
    /// The assistant returned neither text nor tool calls. Finn stops here
    /// rather than answering an empty message with another auto-reply.
    EmptyReply,
}

impl std::fmt::Display for TerminationReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TerminationReason::TerminationMessage => write!(f, "termination message"),
            TerminationReason::MaxAutoReplies => write!(f, "max auto replies reached"),
            TerminationReason::EmptyReply => write!(f, "empty reply"),
        }
    }
}

impl UserProxyAgent {
    /// Send `message` to the assistant and relay replies until the chat ends.
    ///
    /// Each assistant reply is checked for the termination token first. Tool
    /// calls are executed and their results sent back; any other reply gets
    /// the default auto-reply.
    pub async fn initiate_chat(
        &self,
        recipient: &AssistantAgent,
        message: &str,
    ) -> Result<ChatResult> {
        info!("{} -> {}: {}", self.name(), recipient.name(), message);

        let mut history = vec![ChatMessage::user(message).with_name(self.name())];
        let mut tool_calls = Vec::new();
        let mut auto_replies = 0;

        let termination = loop {
            let reply = recipient.generate_reply(&history).await?;
            debug!(
                "{} replied ({} tool calls): {}",
                recipient.name(),
                reply.tool_calls.len(),
                reply.content.as_deref().unwrap_or_default()
            );
            history.push(reply.clone());

            if self.is_termination_msg(&reply) {
                break TerminationReason::TerminationMessage;
            }
            if reply.is_empty() {
                break TerminationReason::EmptyReply;
            }
            if auto_replies >= self.max_consecutive_auto_reply() {
                break TerminationReason::MaxAutoReplies;
            }

            auto_replies += 1;
            let replies = self.auto_reply(&reply, &mut tool_calls).await;
            history.extend(replies);
        };

        info!("Chat ended after {} auto replies: {}", auto_replies, termination);

        Ok(ChatResult {
            summary: last_assistant_content(&history),
            history,
            tool_calls,
            termination,
        })
    }
}

/// Content of the last assistant message with text.
fn last_assistant_content(history: &[ChatMessage]) -> String {
    history
        .iter()
        .rev()
        .filter(|m| m.role == crate::llm::Role::Assistant)
        .find_map(|m| m.content.clone().filter(|c| !c.is_empty()))
        .unwrap_or_default()
}

/// Outcome of a chat.
#[derive(Debug)]
pub struct ChatResult {
    /// Final assistant text.
    pub summary: String,
    /// Full transcript, excluding the system message.
    pub history: Vec<ChatMessage>,
    /// Record of all tool calls made during the chat.
    pub tool_calls: Vec<ToolCallRecord>,
    /// Why the chat stopped.
    pub termination: TerminationReason,
}

/// Record of a tool call made by the agent.
#[derive(Debug, Clone)]
pub struct ToolCallRecord {
    /// Name of the tool called.
    pub name: String,
    /// JSON arguments passed to the tool.
    pub arguments: String,
    /// Result returned by the tool.
    pub result: String,
}

impl std::fmt::Display for ToolCallRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({})", self.name, self.arguments)
    }
}
