//! Tool registration and execution for the agent system.

use crate::config::SearchSettings;
use crate::error::{FinnError, Result};
use crate::llm::ToolSchema;
use crate::search::{search_retrieval, SearchBackend};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;

/// A function the assistant can ask the user proxy to run.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Name the model uses to call the tool.
    fn name(&self) -> &str;

    /// What the tool does, shown to the model.
    fn description(&self) -> &str;

    /// JSON schema of the arguments object.
    fn parameters(&self) -> Value;

    /// Run the tool with parsed JSON arguments.
    async fn call(&self, arguments: Value) -> Result<String>;

    /// Schema sent to the model.
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: self.name().to_string(),
            description: self.description().to_string(),
            parameters: self.parameters(),
        }
    }
}

/// Tools available for execution, keyed by name.
#[derive(Default, Clone)]
pub struct ToolRegistry {
    tools: BTreeMap<String, Arc<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a tool, replacing any tool with the same name.
    pub fn register(&mut self, tool: Arc<dyn Tool>) {
        self.tools.insert(tool.name().to_string(), tool);
    }

    /// Parse raw JSON arguments and run the named tool.
    pub async fn execute(&self, name: &str, arguments: &str) -> Result<String> {
        let tool = self
            .tools
            .get(name)
            .ok_or_else(|| FinnError::Agent(format!("Unknown tool: {}", name)))?;

        let args: Value = if arguments.trim().is_empty() {
            Value::Object(Default::default())
        } else {
            serde_json::from_str(arguments)
                .map_err(|e| FinnError::Agent(format!("Invalid tool arguments: {}", e)))?
        };

        tool.call(args).await
    }
}

/// Hybrid search over the configured index, returned as flat text.
pub struct SearchRetrievalTool {
    backend: Arc<dyn SearchBackend>,
    settings: SearchSettings,
}

impl SearchRetrievalTool {
    pub const NAME: &'static str = "search_retrieval";

    pub fn new(backend: Arc<dyn SearchBackend>, settings: SearchSettings) -> Self {
        Self { backend, settings }
    }
}

#[async_trait]
impl Tool for SearchRetrievalTool {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn description(&self) -> &str {
        "A tool or function for search retrieval from Azure AI Search"
    }

    fn parameters(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "user_input": {
                    "type": "string",
                    "description": "user_input"
                }
            },
            "required": ["user_input"]
        })
    }

    async fn call(&self, arguments: Value) -> Result<String> {
        let query = arguments["user_input"]
            .as_str()
            .ok_or_else(|| FinnError::Agent("Missing 'user_input' argument".to_string()))?;

        search_retrieval(self.backend.as_ref(), &self.settings, query).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::{SearchDocument, SearchRequest, SearchResponse};

    struct StaticBackend(&'static str);

    #[async_trait]
    impl SearchBackend for StaticBackend {
        async fn search(&self, _request: &SearchRequest) -> Result<SearchResponse> {
            Ok(SearchResponse {
                documents: vec![SearchDocument {
                    content: Some(self.0.to_string()),
                    ..Default::default()
                }],
                answers: None,
            })
        }
    }

    fn registry() -> ToolRegistry {
        let mut registry = ToolRegistry::new();
        registry.register(Arc::new(SearchRetrievalTool::new(
            Arc::new(StaticBackend("Venue:\nKing County")),
            SearchSettings::default(),
        )));
        registry
    }

    #[test]
    fn test_search_retrieval_schema() {
        let tool = SearchRetrievalTool::new(
            Arc::new(StaticBackend("unused")),
            SearchSettings::default(),
        );
        let schema = tool.schema();
        assert_eq!(schema.name, "search_retrieval");
        assert_eq!(
            schema.description,
            "A tool or function for search retrieval from Azure AI Search"
        );
        assert_eq!(schema.parameters["required"][0], "user_input");
    }

    #[tokio::test]
    async fn test_execute_search_retrieval() {
        let output = registry()
            .execute("search_retrieval", r#"{"user_input": "venue"}"#)
            .await
            .unwrap();
        assert_eq!(output, "Venue:King County");
    }

    #[tokio::test]
    async fn test_execute_unknown_tool() {
        let err = registry().execute("get_answers", "{}").await.unwrap_err();
        assert!(err.to_string().contains("Unknown tool"));
    }

    #[tokio::test]
    async fn test_execute_bad_arguments() {
        let registry = registry();
        assert!(registry.execute("search_retrieval", "{not json").await.is_err());
        assert!(registry.execute("search_retrieval", r#"{"query": "x"}"#).await.is_err());
    }
}
