//! Capability tools bound to the specialist agents.
//!
//! These implement the `gemini_client::Tool` trait and are attached to a
//! specialist through the Agent builder.

use std::sync::Arc;

use async_trait::async_trait;
use gemini_client::Tool;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::extract::{extract_page, PageExtraction};
use crate::scrape::Scraper;
use crate::search::{WebSearcher, DEFAULT_SEARCH_LIMIT};

/// Error type for capability tools.
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("Web search failed: {0}")]
    WebSearch(String),
}

// =============================================================================
// Web Search Tool
// =============================================================================

/// Arguments for web search.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct WebSearchArgs {
    /// The search query.
    pub query: String,
}

/// A single search result.
#[derive(Debug, Serialize)]
pub struct SearchHitOutput {
    pub url: String,
    pub title: Option<String>,
    pub snippet: Option<String>,
    pub score: Option<f32>,
}

/// Output from a web search.
#[derive(Debug, Serialize)]
pub struct WebSearchOutput {
    /// Direct answer synthesized by the search provider, if available.
    pub answer: Option<String>,
    pub results: Vec<SearchHitOutput>,
}

/// Tool for searching the web.
pub struct WebSearchTool {
    searcher: Arc<dyn WebSearcher>,
}

impl WebSearchTool {
    pub fn new(searcher: Arc<dyn WebSearcher>) -> Self {
        Self { searcher }
    }
}

#[async_trait]
impl Tool for WebSearchTool {
    const NAME: &'static str = "web_search";
    type Args = WebSearchArgs;
    type Output = WebSearchOutput;
    type Error = ToolError;

    fn description(&self) -> &str {
        "Search the web for pages relevant to a research topic. Returns ranked results with title, URL, and a content snippet, plus a direct answer when the search provider can synthesize one."
    }

    async fn call(&self, args: Self::Args) -> Result<Self::Output, Self::Error> {
        let outcome = self
            .searcher
            .search_with_limit(&args.query, DEFAULT_SEARCH_LIMIT)
            .await
            .map_err(|e| ToolError::WebSearch(e.to_string()))?;

        Ok(WebSearchOutput {
            answer: outcome.answer,
            results: outcome
                .hits
                .into_iter()
                .map(|hit| SearchHitOutput {
                    url: hit.url.to_string(),
                    title: hit.title,
                    snippet: hit.snippet,
                    score: hit.score,
                })
                .collect(),
        })
    }
}

// =============================================================================
// Extract Page Tool
// =============================================================================

/// Arguments for page extraction.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct ExtractPageArgs {
    /// The URL of the web page to extract content from.
    pub url: String,

    /// Whether to include the page's H1-H6 headings in the response.
    #[serde(default)]
    pub include_headers: bool,
}

/// Tool for extracting the main textual content of a URL.
///
/// Never fails: every failure mode is folded into the returned record with
/// `status = "error"` so the model always sees the same shape.
pub struct ExtractPageTool {
    scraper: Arc<dyn Scraper>,
}

impl ExtractPageTool {
    pub fn new(scraper: Arc<dyn Scraper>) -> Self {
        Self { scraper }
    }
}

#[async_trait]
impl Tool for ExtractPageTool {
    const NAME: &'static str = "extract_page";
    type Args = ExtractPageArgs;
    type Output = PageExtraction;
    type Error = std::convert::Infallible;

    fn description(&self) -> &str {
        "Fetch a web page and extract its primary textual content as markdown, truncated to a safe length, with title, content length, word count, and a truncation flag. On failure the record carries status \"error\" and an error message."
    }

    async fn call(&self, args: Self::Args) -> Result<Self::Output, Self::Error> {
        Ok(extract_page(self.scraper.as_ref(), &args.url, args.include_headers).await)
    }
}
