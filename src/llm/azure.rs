//! Azure OpenAI chat completions.

use super::{ChatMessage, ChatModel, Role, ToolCallRequest, ToolSchema};
use crate::config::LlmSettings;
use crate::error::{FinnError, Result};
use crate::openai::create_client;
use crate::secrets::Credentials;
use async_openai::config::AzureConfig;
use async_openai::types::{
    ChatCompletionMessageToolCall, ChatCompletionRequestAssistantMessageArgs,
    ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
    ChatCompletionRequestToolMessageArgs, ChatCompletionRequestUserMessageArgs, ChatCompletionTool,
    ChatCompletionToolType, CreateChatCompletionRequestArgs, FunctionCall, FunctionObject,
};
use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, instrument};

/// Chat model backed by an Azure OpenAI deployment.
pub struct AzureChatModel {
    client: async_openai::Client<AzureConfig>,
    deployment: String,
    temperature: f32,
}

impl AzureChatModel {
    /// Create a model for the credentials' deployment.
    pub fn new(credentials: &Credentials, settings: &LlmSettings) -> Result<Self> {
        let client = create_client(
            credentials,
            &settings.api_version,
            Duration::from_secs(settings.timeout_secs),
        )?;

        Ok(Self {
            client,
            deployment: credentials.deployment().to_string(),
            temperature: settings.temperature,
        })
    }
}

#[async_trait]
impl ChatModel for AzureChatModel {
    #[instrument(skip(self, messages, tools), fields(messages = messages.len()))]
    async fn complete(&self, messages: &[ChatMessage], tools: &[ToolSchema]) -> Result<ChatMessage> {
        let request_messages = messages
            .iter()
            .map(to_request_message)
            .collect::<Result<Vec<_>>>()?;

        let mut args = CreateChatCompletionRequestArgs::default();
        args.model(&self.deployment)
            .messages(request_messages)
            .temperature(self.temperature);
        if !tools.is_empty() {
            args.tools(tools.iter().map(to_tool_definition).collect::<Vec<_>>());
        }
        let request = args.build().map_err(|e| FinnError::Agent(e.to_string()))?;

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e| FinnError::OpenAI(format!("Chat completion error: {}", e)))?;

        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| FinnError::Agent("No response from model".to_string()))?;

        let tool_calls: Vec<ToolCallRequest> = choice
            .message
            .tool_calls
            .unwrap_or_default()
            .into_iter()
            .map(|call| ToolCallRequest {
                id: call.id,
                name: call.function.name,
                arguments: call.function.arguments,
            })
            .collect();

        debug!(
            "Model replied with {} tool call(s), finish reason {:?}",
            tool_calls.len(),
            choice.finish_reason
        );

        Ok(ChatMessage {
            tool_calls,
            content: choice.message.content,
            ..ChatMessage::assistant("")
        })
    }

    fn model(&self) -> &str {
        &self.deployment
    }
}

/// Convert a transcript message into the OpenAI request format.
fn to_request_message(message: &ChatMessage) -> Result<ChatCompletionRequestMessage> {
    let content = message.content.clone().unwrap_or_default();

    let converted: ChatCompletionRequestMessage = match message.role {
        Role::System => ChatCompletionRequestSystemMessageArgs::default()
            .content(content)
            .build()
            .map_err(|e| FinnError::Agent(e.to_string()))?
            .into(),
        Role::User => {
            let mut args = ChatCompletionRequestUserMessageArgs::default();
            args.content(content);
            if let Some(name) = &message.name {
                args.name(name);
            }
            args.build()
                .map_err(|e| FinnError::Agent(e.to_string()))?
                .into()
        }
        Role::Assistant => {
            let mut args = ChatCompletionRequestAssistantMessageArgs::default();
            if let Some(text) = &message.content {
                args.content(text.clone());
            }
            if let Some(name) = &message.name {
                args.name(name);
            }
            if !message.tool_calls.is_empty() {
                args.tool_calls(
                    message
                        .tool_calls
                        .iter()
                        .map(|call| ChatCompletionMessageToolCall {
                            id: call.id.clone(),
                            r#type: ChatCompletionToolType::Function,
                            function: FunctionCall {
                                name: call.name.clone(),
                                arguments: call.arguments.clone(),
                            },
                        })
                        .collect::<Vec<_>>(),
                );
            }
            args.build()
                .map_err(|e| FinnError::Agent(e.to_string()))?
                .into()
        }
        Role::Tool => {
            let tool_call_id = message.tool_call_id.as_deref().ok_or_else(|| {
                FinnError::Agent("Tool message without tool_call_id".to_string())
            })?;
            ChatCompletionRequestToolMessageArgs::default()
                .tool_call_id(tool_call_id)
                .content(content)
                .build()
                .map_err(|e| FinnError::Agent(e.to_string()))?
                .into()
        }
    };

    Ok(converted)
}

/// Convert a tool schema into an OpenAI function definition.
fn to_tool_definition(schema: &ToolSchema) -> ChatCompletionTool {
    ChatCompletionTool {
        r#type: ChatCompletionToolType::Function,
        function: FunctionObject {
            name: schema.name.clone(),
            description: Some(schema.description.clone()),
            parameters: Some(schema.parameters.clone()),
            strict: None,
        },
    }
}
