//! LLM-backed assistant agent.

use crate::error::Result;
use crate::llm::{ChatMessage, ChatModel, ToolSchema};
use std::sync::Arc;
use tracing::debug;

/// An agent that answers with a chat model and may request tool calls.
pub struct AssistantAgent {
    name: String,
    system_message: String,
    model: Arc<dyn ChatModel>,
    tools: Vec<ToolSchema>,
}

impl AssistantAgent {
    /// Create an assistant with a name, system message and model.
    pub fn new(name: &str, system_message: &str, model: Arc<dyn ChatModel>) -> Self {
        Self {
            name: name.to_string(),
            system_message: system_message.to_string(),
            model,
            tools: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Advertise a tool to the model. A schema with the same name is replaced.
    pub fn register_for_llm(&mut self, schema: ToolSchema) {
        self.tools.retain(|t| t.name != schema.name);
        self.tools.push(schema);
    }

    /// Produce the next reply for a conversation.
    ///
    /// `history` is the transcript without the system message.
    pub async fn generate_reply(&self, history: &[ChatMessage]) -> Result<ChatMessage> {
        let mut messages = Vec::with_capacity(history.len() + 1);
        messages.push(ChatMessage::system(&self.system_message));
        messages.extend_from_slice(history);

        debug!("{} generating reply over {} messages", self.name, messages.len());

        let reply = self.model.complete(&messages, &self.tools).await?;
        Ok(reply.with_name(&self.name))
    }
}
