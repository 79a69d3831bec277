//! Agent with automatic function-calling loop.
//!
//! Provides a high-level API for building AI agents that can use tools.
//!
//! # Example
//!
//! ```rust,ignore
//! use gemini_client::{GeminiClient, Tool};
//!
//! let response = client
//!     .agent("gemini-1.5-flash-latest")
//!     .system("You are a research assistant")
//!     .tool(WebSearch)
//!     .max_iterations(5)
//!     .build()
//!     .chat("What is the population of Tokyo?")
//!     .await?;
//! ```

use crate::tool::{ErasedTool, Tool};
use crate::types::{
    Content, FunctionCall, GenerateContentRequest, GenerationConfig, Part, ToolDeclarations,
};
use crate::{GeminiClient, GeminiError, Result};
use tracing::{debug, info, warn};

/// Builder for creating an Agent.
pub struct AgentBuilder {
    client: GeminiClient,
    model: String,
    system_instruction: Option<String>,
    tools: Vec<Box<dyn ErasedTool>>,
    max_iterations: usize,
    temperature: Option<f32>,
}

impl AgentBuilder {
    /// Create a new agent builder.
    pub(crate) fn new(client: GeminiClient, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
            system_instruction: None,
            tools: Vec::new(),
            max_iterations: 10,
            temperature: None,
        }
    }

    /// Set the system instruction.
    pub fn system(mut self, instruction: impl Into<String>) -> Self {
        self.system_instruction = Some(instruction.into());
        self
    }

    /// Add a tool to the agent.
    pub fn tool<T: Tool + 'static>(mut self, tool: T) -> Self {
        self.tools.push(Box::new(tool));
        self
    }

    /// Add an already-erased tool.
    ///
    /// Needed when the tool's name is a runtime value, e.g. when another
    /// agent is wrapped as a tool.
    pub fn tool_dyn(mut self, tool: Box<dyn ErasedTool>) -> Self {
        self.tools.push(tool);
        self
    }

    /// Set the maximum number of function-calling iterations.
    ///
    /// Default is 10. The agent will stop after this many iterations
    /// even if the model keeps requesting function calls.
    pub fn max_iterations(mut self, max: usize) -> Self {
        self.max_iterations = max;
        self
    }

    /// Set the temperature for generation.
    pub fn temperature(mut self, temp: f32) -> Self {
        self.temperature = Some(temp);
        self
    }

    /// Build the agent.
    pub fn build(self) -> Agent {
        Agent {
            client: self.client,
            model: self.model,
            system_instruction: self.system_instruction,
            tools: self.tools,
            max_iterations: self.max_iterations,
            temperature: self.temperature,
        }
    }
}

/// An AI agent that can use tools to accomplish tasks.
///
/// The agent owns its client handle, so it can itself be stored inside a
/// tool and driven by another agent.
pub struct Agent {
    client: GeminiClient,
    model: String,
    system_instruction: Option<String>,
    tools: Vec<Box<dyn ErasedTool>>,
    max_iterations: usize,
    temperature: Option<f32>,
}

/// Response from an agent chat.
#[derive(Debug)]
pub struct AgentResponse {
    /// The final text response from the agent.
    pub content: String,

    /// The function calls that were made during the conversation.
    pub tool_calls_made: Vec<String>,

    /// Number of iterations (API calls) made.
    pub iterations: usize,
}

impl Agent {
    /// The model this agent generates with.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Number of registered tools.
    pub fn tool_count(&self) -> usize {
        self.tools.len()
    }

    /// Send a message to the agent and get a response.
    ///
    /// This method handles the function-calling loop automatically:
    /// 1. Send the user message to the model
    /// 2. If the model requests function calls, execute them
    /// 3. Send function responses back to the model
    /// 4. Repeat until the model responds with text or max iterations reached
    pub async fn chat(&self, user_message: impl Into<String>) -> Result<AgentResponse> {
        let contents = vec![Content::user_text(user_message)];
        self.run_tool_loop(contents).await
    }

    /// Same as `chat()` but accepts pre-built conversation history.
    pub async fn chat_with_history(&self, contents: Vec<Content>) -> Result<AgentResponse> {
        self.run_tool_loop(contents).await
    }

    /// Core function-calling loop shared by `chat()` and `chat_with_history()`.
    async fn run_tool_loop(&self, mut contents: Vec<Content>) -> Result<AgentResponse> {
        let mut tool_calls_made = Vec::new();
        let mut iterations = 0;

        let tool_declarations = if self.tools.is_empty() {
            Vec::new()
        } else {
            vec![ToolDeclarations {
                function_declarations: self.tools.iter().map(|t| t.declaration()).collect(),
            }]
        };

        loop {
            iterations += 1;

            if iterations > self.max_iterations {
                warn!(
                    max_iterations = self.max_iterations,
                    "Agent reached max iterations"
                );
                return Err(GeminiError::Api(format!(
                    "Agent reached max iterations ({})",
                    self.max_iterations
                )));
            }

            info!(
                iteration = iterations,
                model = %self.model,
                content_count = contents.len(),
                tool_count = self.tools.len(),
                "Agent iteration starting"
            );

            let request = GenerateContentRequest {
                contents: contents.clone(),
                system_instruction: self.system_instruction.as_deref().map(Content::system),
                tools: tool_declarations.clone(),
                generation_config: self.temperature.map(|t| GenerationConfig {
                    temperature: Some(t),
                    max_output_tokens: None,
                }),
            };

            let response = self.client.generate_content(&self.model, &request).await?;

            let message = response
                .content()
                .cloned()
                .ok_or_else(|| GeminiError::Parse("No candidate content in response".into()))?;

            let function_calls: Vec<FunctionCall> =
                message.function_calls().into_iter().cloned().collect();

            if function_calls.is_empty() {
                // No function calls - we have a final response
                let content = message.text();

                info!(
                    iterations = iterations,
                    tool_calls_total = tool_calls_made.len(),
                    response_len = content.len(),
                    "Agent finished - final response received"
                );

                debug!(response_content = %content, "Agent final response content");

                return Ok(AgentResponse {
                    content,
                    tool_calls_made,
                    iterations,
                });
            }

            info!(
                iteration = iterations,
                function_call_count = function_calls.len(),
                "Agent received function call request"
            );

            // Add the model turn with its function calls to history
            contents.push(message);

            // Execute each call and collect the responses into one user turn
            let mut response_parts = Vec::with_capacity(function_calls.len());
            for call in &function_calls {
                info!(
                    tool = %call.name,
                    arguments = %call.args,
                    "Executing function call"
                );
                tool_calls_made.push(call.name.clone());

                let result = self.execute_tool(call).await;

                debug!(tool = %call.name, "Function execution complete");

                response_parts.push(Part::function_response(&call.name, result));
            }

            contents.push(Content::user(response_parts));
        }
    }

    /// Execute a single function call.
    ///
    /// Failures are reported back to the model as an error payload rather
    /// than aborting the loop.
    async fn execute_tool(&self, call: &FunctionCall) -> serde_json::Value {
        let tool = self.tools.iter().find(|t| t.name() == call.name);

        let Some(tool) = tool else {
            warn!(tool = %call.name, "Unknown tool requested");
            return serde_json::json!({
                "error": format!("Unknown tool '{}'", call.name)
            });
        };

        match tool.call_erased(&call.args).await {
            Ok(result) => result,
            Err(e) => {
                warn!(tool = %call.name, error = %e, "Tool execution failed");
                serde_json::json!({
                    "error": format!("Tool execution failed: {}", e)
                })
            }
        }
    }
}
