//! Web search service for the search specialist.
//!
//! Abstracts over keyword/web-search providers. The production
//! implementation is Tavily; tests use `MockSearcher`.

use async_trait::async_trait;
use url::Url;

use crate::credentials::SecretString;
use crate::error::{SearchError, SearchResult};

const TAVILY_API_URL: &str = "https://api.tavily.com/search";

/// Number of results the search specialist asks for.
pub const DEFAULT_SEARCH_LIMIT: usize = 5;

/// A ranked hit from web search.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchHit {
    /// The discovered URL.
    pub url: Url,

    /// Title of the page (if available from search results).
    pub title: Option<String>,

    /// Snippet/description from search results.
    pub snippet: Option<String>,

    /// Relevance score (0.0-1.0, if provided by the search API).
    pub score: Option<f32>,
}

impl SearchHit {
    /// Create a new hit from a URL.
    pub fn new(url: Url) -> Self {
        Self {
            url,
            title: None,
            snippet: None,
            score: None,
        }
    }

    /// Create from a URL string.
    pub fn from_url(url: &str) -> Option<Self> {
        Url::parse(url).ok().map(Self::new)
    }

    /// Add a title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Add a snippet.
    pub fn with_snippet(mut self, snippet: impl Into<String>) -> Self {
        self.snippet = Some(snippet.into());
        self
    }

    /// Add a relevance score.
    pub fn with_score(mut self, score: f32) -> Self {
        self.score = Some(score);
        self
    }
}

/// Full outcome of one search call.
///
/// Tavily can return a synthesized direct answer alongside the ranked
/// hits; the search specialist leads with it when present.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchOutcome {
    /// Direct answer synthesized by the provider, if requested and available.
    pub answer: Option<String>,

    /// Ranked result pages.
    pub hits: Vec<SearchHit>,
}

/// Web search trait for open-world discovery.
///
/// # Implementations
///
/// - `TavilySearcher` - Tavily API
/// - `MockSearcher` - for testing
#[async_trait]
pub trait WebSearcher: Send + Sync {
    /// Search the web for pages relevant to the query.
    async fn search(&self, query: &str) -> SearchResult<SearchOutcome>;

    /// Search with a specific result limit.
    async fn search_with_limit(&self, query: &str, limit: usize) -> SearchResult<SearchOutcome> {
        let mut outcome = self.search(query).await?;
        outcome.hits.truncate(limit);
        Ok(outcome)
    }
}

/// Tavily-backed web searcher.
pub struct TavilySearcher {
    api_key: SecretString,
    client: reqwest::Client,
    /// Default number of results to return.
    pub default_limit: usize,
}

#[derive(serde::Serialize)]
struct TavilyRequest {
    query: String,
    search_depth: String,
    max_results: usize,
    include_answer: bool,
    include_raw_content: bool,
    include_images: bool,
}

#[derive(serde::Deserialize)]
struct TavilyResponse {
    #[serde(default)]
    answer: Option<String>,
    #[serde(default)]
    results: Vec<TavilyHit>,
}

#[derive(serde::Deserialize)]
struct TavilyHit {
    url: String,
    title: Option<String>,
    content: Option<String>,
    score: Option<f32>,
}

impl TavilySearcher {
    /// Create a new Tavily searcher.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: SecretString::new(api_key),
            client: reqwest::Client::new(),
            default_limit: DEFAULT_SEARCH_LIMIT,
        }
    }

    /// Set the default result limit.
    pub fn with_default_limit(mut self, limit: usize) -> Self {
        self.default_limit = limit;
        self
    }

    fn map_response(response: TavilyResponse) -> SearchOutcome {
        let hits = response
            .results
            .into_iter()
            .filter_map(|r| {
                let url = Url::parse(&r.url).ok()?;
                let mut hit = SearchHit::new(url);
                if let Some(title) = r.title {
                    hit = hit.with_title(title);
                }
                if let Some(content) = r.content {
                    hit = hit.with_snippet(content);
                }
                if let Some(score) = r.score {
                    hit = hit.with_score(score);
                }
                Some(hit)
            })
            .collect();

        SearchOutcome {
            answer: response.answer.filter(|a| !a.trim().is_empty()),
            hits,
        }
    }
}

#[async_trait]
impl WebSearcher for TavilySearcher {
    async fn search(&self, query: &str) -> SearchResult<SearchOutcome> {
        self.search_with_limit(query, self.default_limit).await
    }

    async fn search_with_limit(&self, query: &str, limit: usize) -> SearchResult<SearchOutcome> {
        let request = TavilyRequest {
            query: query.to_string(),
            search_depth: "advanced".to_string(),
            max_results: limit,
            include_answer: true,
            // Raw page content comes from the dedicated extractor, not search
            include_raw_content: false,
            include_images: false,
        };

        let response = self
            .client
            .post(TAVILY_API_URL)
            .header("Content-Type", "application/json")
            .header("Authorization", format!("Bearer {}", self.api_key.expose()))
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SearchError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let tavily_response: TavilyResponse = response
            .json()
            .await
            .map_err(|e| SearchError::Parse(e.to_string()))?;

        Ok(Self::map_response(tavily_response))
    }
}

/// Mock web searcher for testing.
#[derive(Default)]
pub struct MockSearcher {
    outcomes: std::sync::RwLock<std::collections::HashMap<String, SearchOutcome>>,
    queries: std::sync::RwLock<Vec<String>>,
}

impl MockSearcher {
    /// Create a new mock searcher.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an outcome for a query.
    pub fn with_outcome(self, query: &str, outcome: SearchOutcome) -> Self {
        self.outcomes
            .write()
            .unwrap()
            .insert(query.to_string(), outcome);
        self
    }

    /// Add URL strings as hits for a query.
    pub fn with_urls(self, query: &str, urls: &[&str]) -> Self {
        let hits: Vec<_> = urls.iter().filter_map(|u| SearchHit::from_url(u)).collect();
        self.with_outcome(
            query,
            SearchOutcome {
                answer: None,
                hits,
            },
        )
    }

    /// The queries that were searched, in order.
    pub fn queries(&self) -> Vec<String> {
        self.queries.read().unwrap().clone()
    }
}

#[async_trait]
impl WebSearcher for MockSearcher {
    async fn search(&self, query: &str) -> SearchResult<SearchOutcome> {
        self.queries.write().unwrap().push(query.to_string());
        Ok(self
            .outcomes
            .read()
            .unwrap()
            .get(query)
            .cloned()
            .unwrap_or_default())
    }
}
