//! Tool calling traits for Gemini function calling.
//!
//! Provides a type-safe API for defining tools the model can call.
//!
//! # Example
//!
//! ```rust,ignore
//! use async_trait::async_trait;
//! use schemars::JsonSchema;
//! use serde::Deserialize;
//! use gemini_client::Tool;
//!
//! #[derive(Deserialize, JsonSchema)]
//! struct SearchArgs {
//!     query: String,
//! }
//!
//! struct WebSearch;
//!
//! #[async_trait]
//! impl Tool for WebSearch {
//!     const NAME: &'static str = "web_search";
//!     type Args = SearchArgs;
//!     type Output = Vec<String>;
//!     type Error = anyhow::Error;
//!
//!     fn description(&self) -> &str {
//!         "Search the web for information"
//!     }
//!
//!     async fn call(&self, args: Self::Args) -> Result<Self::Output, Self::Error> {
//!         Ok(vec![format!("Results for: {}", args.query)])
//!     }
//! }
//! ```

use async_trait::async_trait;
use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::schema::ToolSchema;
use crate::types::FunctionDeclaration;

/// A tool that can be called by the Gemini model.
///
/// Tools have typed arguments and outputs, with automatic schema generation.
#[async_trait]
pub trait Tool: Send + Sync {
    /// The unique name of this tool.
    const NAME: &'static str;

    /// The argument type for this tool (must derive `Deserialize` and `JsonSchema`).
    type Args: DeserializeOwned + JsonSchema + Send;

    /// The output type for this tool (must derive `Serialize`).
    type Output: Serialize + Send;

    /// The error type for this tool.
    type Error: std::error::Error + Send + Sync + 'static;

    /// A description of what this tool does.
    fn description(&self) -> &str;

    /// Execute the tool with the given arguments.
    async fn call(&self, args: Self::Args) -> Result<Self::Output, Self::Error>;

    /// Generate the function declaration for this tool.
    fn declaration(&self) -> FunctionDeclaration {
        FunctionDeclaration {
            name: Self::NAME.to_string(),
            description: self.description().to_string(),
            parameters: Some(Self::Args::gemini_schema()),
        }
    }
}

/// Type-erased tool for storing heterogeneous tools in collections.
///
/// Gemini delivers arguments as a JSON object and expects the function
/// response as a JSON object, so the erased surface works in
/// `serde_json::Value` on both sides.
#[async_trait]
pub trait ErasedTool: Send + Sync {
    /// Get the tool's name.
    fn name(&self) -> &str;

    /// Get the function declaration.
    fn declaration(&self) -> FunctionDeclaration;

    /// Execute the tool with JSON arguments, returning a JSON response.
    async fn call_erased(&self, arguments: &serde_json::Value)
        -> Result<serde_json::Value, ToolError>;
}

/// Error type for erased tool calls.
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    /// Failed to parse tool arguments.
    #[error("Failed to parse arguments: {0}")]
    ArgumentParse(String),

    /// Tool execution failed.
    #[error("Tool execution failed: {0}")]
    Execution(String),

    /// Failed to serialize tool output.
    #[error("Failed to serialize output: {0}")]
    OutputSerialize(String),
}

/// Blanket implementation of `ErasedTool` for all `Tool` implementors.
#[async_trait]
impl<T: Tool> ErasedTool for T {
    fn name(&self) -> &str {
        T::NAME
    }

    fn declaration(&self) -> FunctionDeclaration {
        Tool::declaration(self)
    }

    async fn call_erased(
        &self,
        arguments: &serde_json::Value,
    ) -> Result<serde_json::Value, ToolError> {
        let args: T::Args = serde_json::from_value(arguments.clone())
            .map_err(|e| ToolError::ArgumentParse(e.to_string()))?;

        let output = self
            .call(args)
            .await
            .map_err(|e| ToolError::Execution(e.to_string()))?;

        serde_json::to_value(&output).map_err(|e| ToolError::OutputSerialize(e.to_string()))
    }
}
