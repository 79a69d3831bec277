//! The research team: specialist agent factories and the coordinator.
//!
//! Each specialist is a prompt-configured `Agent` bound to at most one
//! capability tool. The coordinator's tools are the specialists
//! themselves, adapted through `SpecialistTool`.

mod coordinator;
mod extractor;
mod search;
mod summarizer;

pub use coordinator::create_coordinator;
pub use extractor::create_extractor_agent;
pub use search::create_search_agent;
pub use summarizer::create_summarizer_agent;

use async_trait::async_trait;
use gemini_client::{Agent, ErasedTool, FunctionDeclaration, ToolError};

/// A specialist agent exposed as a tool for the coordinator.
///
/// Implements `ErasedTool` directly because the tool name and description
/// are runtime values taken from the specialist, not compile-time
/// constants. The single argument is the request text handed to the
/// specialist; the specialist's final text comes back as the result.
pub struct SpecialistTool {
    agent: Agent,
    name: String,
    description: String,
}

impl SpecialistTool {
    /// Wrap a specialist agent as a coordinator tool.
    pub fn new(
        agent: Agent,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            agent,
            name: name.into(),
            description: description.into(),
        }
    }
}

#[async_trait]
impl ErasedTool for SpecialistTool {
    fn name(&self) -> &str {
        &self.name
    }

    fn declaration(&self) -> FunctionDeclaration {
        FunctionDeclaration {
            name: self.name.clone(),
            description: self.description.clone(),
            parameters: Some(serde_json::json!({
                "type": "object",
                "properties": {
                    "request": {
                        "type": "string",
                        "description": "The task or input text to hand to this specialist"
                    }
                },
                "required": ["request"]
            })),
        }
    }

    async fn call_erased(
        &self,
        arguments: &serde_json::Value,
    ) -> Result<serde_json::Value, ToolError> {
        let request = arguments
            .get("request")
            .and_then(|v| v.as_str())
            .ok_or_else(|| ToolError::ArgumentParse("missing 'request' argument".to_string()))?;

        tracing::info!(specialist = %self.name, "Delegating to specialist");

        let response = self
            .agent
            .chat(request)
            .await
            .map_err(|e| ToolError::Execution(e.to_string()))?;

        tracing::info!(
            specialist = %self.name,
            iterations = response.iterations,
            tool_calls = response.tool_calls_made.len(),
            "Specialist finished"
        );

        Ok(serde_json::json!({ "result": response.content }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gemini_client::GeminiClient;

    #[test]
    fn test_specialist_tool_declaration() {
        let client = GeminiClient::new("test-key");
        let agent = client.agent("gemini-1.5-flash-latest").build();
        let tool = SpecialistTool::new(agent, "search_agent", "Finds things on the web");

        assert_eq!(tool.name(), "search_agent");

        let decl = tool.declaration();
        assert_eq!(decl.name, "search_agent");
        let params = decl.parameters.unwrap();
        assert_eq!(params["required"], serde_json::json!(["request"]));
        assert_eq!(params["properties"]["request"]["type"], "string");
    }

    #[tokio::test]
    async fn test_specialist_tool_rejects_missing_request() {
        let client = GeminiClient::new("test-key");
        let agent = client.agent("gemini-1.5-flash-latest").build();
        let tool = SpecialistTool::new(agent, "summarizer_agent", "Summarizes text");

        let err = tool
            .call_erased(&serde_json::json!({"text": "wrong field"}))
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::ArgumentParse(_)));
    }
}
