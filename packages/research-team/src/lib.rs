//! Research assistant team.
//!
//! A thin orchestration layer that delegates user research requests to
//! three specialist LLM-backed helpers through a coordinating agent:
//!
//! - **search** — web discovery via the Tavily search API
//! - **content extraction** — URL → markdown via a scrape API, normalized
//!   into one uniform result record with a fixed wall-clock budget
//! - **summarization** — instruction-only text summarization
//!
//! The hosted model runtime, the search provider, and the scrape provider
//! are consumed as opaque external services; this crate is the prompt
//! composition, the service clients, and the extraction timeout shim.
//!
//! # Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use gemini_client::GeminiClient;
//! use research_team::{create_coordinator, Config, FirecrawlScraper, TavilySearcher};
//!
//! let config = Config::from_env()?;
//! let client = GeminiClient::new(config.google_api_key.expose());
//! let searcher = Arc::new(TavilySearcher::new(config.tavily_api_key.expose()));
//! let scraper = Arc::new(FirecrawlScraper::new(config.firecrawl_api_key.expose())?);
//!
//! let coordinator = create_coordinator(&client, &config, searcher, scraper);
//! let response = coordinator.chat("Research the history of the transistor").await?;
//! ```
//!
//! # Modules
//!
//! - [`agents`] - specialist factories and the coordinator
//! - [`tools`] - capability tools (`web_search`, `extract_page`)
//! - [`extract`] - the extraction record and timeout shim
//! - [`search`] / [`scrape`] - external service clients and mocks
//! - [`config`] - environment configuration

pub mod agents;
pub mod config;
pub mod credentials;
pub mod error;
pub mod extract;
pub mod scrape;
pub mod search;
pub mod tools;

// Re-export core types at crate root
pub use agents::{
    create_coordinator, create_extractor_agent, create_search_agent, create_summarizer_agent,
    SpecialistTool,
};
pub use config::{Config, DEFAULT_COORDINATOR_MODEL, DEFAULT_SPECIALIST_MODEL};
pub use credentials::SecretString;
pub use error::{ScrapeError, SearchError};
pub use extract::{
    extract_page, extract_page_blocking, extract_page_blocking_with_timeout, ExtractionStatus,
    PageExtraction, EXTRACTION_TIMEOUT, MAX_CONTENT_CHARS,
};
pub use scrape::{FirecrawlScraper, MockScraper, ScrapedPage, Scraper};
pub use search::{MockSearcher, SearchHit, SearchOutcome, TavilySearcher, WebSearcher};
pub use tools::{ExtractPageTool, WebSearchTool};
