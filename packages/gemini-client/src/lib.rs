//! Pure Gemini REST API client
//!
//! A clean, minimal client for the Gemini `generateContent` API with no
//! domain-specific logic. Supports chat generation and typed function
//! calling.
//!
//! # Example
//!
//! ```rust,ignore
//! use gemini_client::GeminiClient;
//!
//! let client = GeminiClient::from_env()?;
//!
//! // Single-turn generation
//! let text = client
//!     .generate("gemini-1.5-flash-latest", "Say hello")
//!     .await?;
//! ```
//!
//! # Agent with Tools
//!
//! ```rust,ignore
//! let response = client
//!     .agent("gemini-1.5-flash-latest")
//!     .system("You are a research assistant")
//!     .tool(WebSearch)
//!     .build()
//!     .chat("Find info about Rust")
//!     .await?;
//! ```

pub mod agent;
pub mod error;
pub mod schema;
pub mod tool;
pub mod types;

pub use agent::{Agent, AgentBuilder, AgentResponse};
pub use error::{GeminiError, Result};
pub use schema::ToolSchema;
pub use tool::{ErasedTool, Tool, ToolError};
pub use types::{
    Candidate, Content, FunctionCall, FunctionDeclaration, FunctionResponse,
    GenerateContentRequest, GenerateContentResponse, GenerationConfig, Part, ToolDeclarations,
    UsageMetadata,
};

use reqwest::Client;
use tracing::{debug, warn};

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Pure Gemini API client.
#[derive(Clone)]
pub struct GeminiClient {
    http_client: Client,
    api_key: String,
    base_url: String,
}

impl GeminiClient {
    /// Create a new Gemini client with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            http_client: Client::new(),
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Create from environment variable `GOOGLE_API_KEY`.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("GOOGLE_API_KEY")
            .map_err(|_| GeminiError::Config("GOOGLE_API_KEY not set".into()))?;
        Ok(Self::new(api_key))
    }

    /// Set a custom base URL (for proxies or compatible endpoints).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Create an agent builder with the specified model.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let response = client
    ///     .agent("gemini-1.5-flash-latest")
    ///     .system("You are a helpful assistant")
    ///     .tool(MyTool)
    ///     .build()
    ///     .chat("Hello!")
    ///     .await?;
    /// ```
    pub fn agent(&self, model: impl Into<String>) -> AgentBuilder {
        AgentBuilder::new(self.clone(), model)
    }

    /// Raw `generateContent` call.
    ///
    /// The API key travels in the `x-goog-api-key` header rather than the
    /// query string so it never appears in request logs.
    pub async fn generate_content(
        &self,
        model: &str,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse> {
        let start = std::time::Instant::now();
        let url = format!("{}/models/{}:generateContent", self.base_url, model);

        let response = self
            .http_client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .header("Content-Type", "application/json")
            .json(request)
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "Gemini request failed");
                GeminiError::Network(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            warn!(status = %status, error = %error_text, "Gemini API error");
            return Err(GeminiError::Api(format!(
                "Gemini API error {}: {}",
                status, error_text
            )));
        }

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| GeminiError::Parse(e.to_string()))?;

        debug!(
            model = %model,
            duration_ms = start.elapsed().as_millis(),
            candidates = parsed.candidates.len(),
            "Gemini generateContent complete"
        );

        Ok(parsed)
    }

    /// Single-turn text generation.
    ///
    /// Sends one user message and returns the concatenated text of the
    /// first candidate.
    pub async fn generate(&self, model: &str, prompt: impl Into<String>) -> Result<String> {
        let request = GenerateContentRequest {
            contents: vec![Content::user_text(prompt)],
            system_instruction: None,
            tools: Vec::new(),
            generation_config: None,
        };

        let response = self.generate_content(model, &request).await?;
        response
            .content()
            .map(|c| c.text())
            .ok_or_else(|| GeminiError::Api("No candidate returned".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_builder() {
        let client = GeminiClient::new("test-key").with_base_url("https://custom.api.com");

        assert_eq!(client.api_key, "test-key");
        assert_eq!(client.base_url(), "https://custom.api.com");
    }

    #[test]
    fn test_default_base_url() {
        let client = GeminiClient::new("test-key");
        assert!(client.base_url().contains("generativelanguage"));
    }
}
