//! Page-scrape service for the content extractor.
//!
//! Abstracts over scrape providers that turn a URL into markdown plus
//! metadata. The production implementation is the Firecrawl scrape
//! endpoint; tests use `MockScraper`.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::Duration;

use crate::credentials::SecretString;
use crate::error::{ScrapeError, ScrapeResult};

const FIRECRAWL_API_URL: &str = "https://api.firecrawl.dev/v1";

/// Markdown content for one scraped page.
#[derive(Debug, Clone, PartialEq)]
pub struct ScrapedPage {
    /// URL the content was scraped from.
    pub url: String,

    /// Page content as markdown.
    pub markdown: String,

    /// Page title from scrape metadata, if the provider found one.
    pub title: Option<String>,
}

impl ScrapedPage {
    /// Create a new scraped page.
    pub fn new(url: impl Into<String>, markdown: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            markdown: markdown.into(),
            title: None,
        }
    }

    /// Set the page title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }
}

/// Scrape trait: URL in, markdown page out.
#[async_trait]
pub trait Scraper: Send + Sync {
    /// Scrape a single URL into markdown.
    async fn scrape(&self, url: &str) -> ScrapeResult<ScrapedPage>;

    /// Get the scraper name (for logging/debugging).
    fn name(&self) -> &str {
        "unknown"
    }
}

/// Firecrawl-backed scraper.
///
/// Uses the Firecrawl scrape API which provides JavaScript rendering and
/// markdown conversion.
pub struct FirecrawlScraper {
    client: reqwest::Client,
    api_key: SecretString,
    base_url: String,
}

#[derive(Serialize)]
struct ScrapeRequest {
    url: String,
    formats: Vec<String>,
}

#[derive(Deserialize)]
struct ScrapeResponse {
    success: bool,
    data: Option<ScrapeData>,
}

#[derive(Deserialize)]
struct ScrapeData {
    markdown: Option<String>,
    metadata: Option<PageMetadata>,
}

#[derive(Deserialize)]
struct PageMetadata {
    title: Option<String>,
}

impl FirecrawlScraper {
    /// Create a new Firecrawl scraper with the given API key.
    pub fn new(api_key: impl Into<String>) -> ScrapeResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(120))
            .build()?;

        Ok(Self {
            client,
            api_key: SecretString::new(api_key),
            base_url: FIRECRAWL_API_URL.to_string(),
        })
    }

    /// Set a custom base URL (for proxies or compatible endpoints).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    fn page_from_data(url: &str, data: ScrapeData) -> ScrapeResult<ScrapedPage> {
        let markdown = data
            .markdown
            .filter(|m| !m.trim().is_empty())
            .ok_or_else(|| ScrapeError::MissingContent {
                url: url.to_string(),
            })?;

        let mut page = ScrapedPage::new(url, markdown);
        if let Some(title) = data.metadata.and_then(|m| m.title) {
            if !title.trim().is_empty() {
                page = page.with_title(title);
            }
        }

        Ok(page)
    }
}

#[async_trait]
impl Scraper for FirecrawlScraper {
    async fn scrape(&self, url: &str) -> ScrapeResult<ScrapedPage> {
        tracing::debug!(url = %url, "Starting Firecrawl scrape");

        let request = ScrapeRequest {
            url: url.to_string(),
            formats: vec!["markdown".to_string()],
        };

        let response = self
            .client
            .post(format!("{}/scrape", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key.expose()))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ScrapeError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let scrape_response: ScrapeResponse = response.json().await?;

        if !scrape_response.success {
            return Err(ScrapeError::Failed {
                url: url.to_string(),
            });
        }

        let data = scrape_response
            .data
            .ok_or_else(|| ScrapeError::MissingContent {
                url: url.to_string(),
            })?;

        let page = Self::page_from_data(url, data)?;

        tracing::debug!(
            url = %url,
            title = ?page.title,
            content_len = page.markdown.len(),
            "Firecrawl scrape complete"
        );

        Ok(page)
    }

    fn name(&self) -> &str {
        "firecrawl"
    }
}

/// Mock scraper for testing.
///
/// Allows configuring canned pages, injected failures, and an artificial
/// response delay.
#[derive(Default)]
pub struct MockScraper {
    /// Canned pages indexed by URL
    pages: Arc<RwLock<HashMap<String, ScrapedPage>>>,
    /// URLs that should fail, with the failure message
    failures: Arc<RwLock<HashMap<String, String>>>,
    /// Artificial delay before responding
    delay: Option<Duration>,
    /// Track requested URLs for verification
    calls: Arc<RwLock<Vec<String>>>,
}

impl MockScraper {
    /// Create a new empty mock scraper.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a page that will be returned for its URL.
    pub fn with_page(self, page: ScrapedPage) -> Self {
        self.pages.write().unwrap().insert(page.url.clone(), page);
        self
    }

    /// Add a simple page with just URL and markdown.
    pub fn with_content(self, url: &str, markdown: &str) -> Self {
        self.with_page(ScrapedPage::new(url, markdown))
    }

    /// Make a URL fail with the given message.
    pub fn with_failure(self, url: &str, message: &str) -> Self {
        self.failures
            .write()
            .unwrap()
            .insert(url.to_string(), message.to_string());
        self
    }

    /// Delay every response by the given duration.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Get the URLs that were requested.
    pub fn calls(&self) -> Vec<String> {
        self.calls.read().unwrap().clone()
    }

    /// Get the number of scrape calls made.
    pub fn call_count(&self) -> usize {
        self.calls.read().unwrap().len()
    }
}

impl Clone for MockScraper {
    fn clone(&self) -> Self {
        Self {
            pages: Arc::clone(&self.pages),
            failures: Arc::clone(&self.failures),
            delay: self.delay,
            calls: Arc::clone(&self.calls),
        }
    }
}

#[async_trait]
impl Scraper for MockScraper {
    async fn scrape(&self, url: &str) -> ScrapeResult<ScrapedPage> {
        self.calls.write().unwrap().push(url.to_string());

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        if let Some(message) = self.failures.read().unwrap().get(url) {
            return Err(ScrapeError::Api {
                status: 502,
                body: message.clone(),
            });
        }

        self.pages
            .read()
            .unwrap()
            .get(url)
            .cloned()
            .ok_or_else(|| ScrapeError::MissingContent {
                url: url.to_string(),
            })
    }

    fn name(&self) -> &str {
        "mock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_scrape_and_tracking() {
        let mock = MockScraper::new()
            .with_content("https://example.com/a", "# Page A")
            .with_content("https://example.com/b", "# Page B");

        let page = mock.scrape("https://example.com/a").await.unwrap();
        assert_eq!(page.markdown, "# Page A");

        mock.scrape("https://example.com/b").await.unwrap();
        assert_eq!(mock.call_count(), 2);
        assert_eq!(
            mock.calls(),
            vec![
                "https://example.com/a".to_string(),
                "https://example.com/b".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn test_mock_missing_page() {
        let mock = MockScraper::new();
        let err = mock.scrape("https://example.com/missing").await.unwrap_err();
        assert!(matches!(err, ScrapeError::MissingContent { .. }));
    }

    #[tokio::test]
    async fn test_mock_injected_failure() {
        let mock = MockScraper::new().with_failure("https://example.com/down", "bad gateway");
        let err = mock.scrape("https://example.com/down").await.unwrap_err();
        assert!(matches!(err, ScrapeError::Api { status: 502, .. }));
    }

    #[test]
    fn test_page_from_data_with_title() {
        let data = ScrapeData {
            markdown: Some("# Test\n\nContent".to_string()),
            metadata: Some(PageMetadata {
                title: Some("Test Page".to_string()),
            }),
        };

        let page = FirecrawlScraper::page_from_data("https://example.com/test", data).unwrap();
        assert_eq!(page.url, "https://example.com/test");
        assert_eq!(page.title, Some("Test Page".to_string()));
        assert!(page.markdown.contains("# Test"));
    }

    #[test]
    fn test_page_from_data_empty_markdown() {
        let data = ScrapeData {
            markdown: Some("   ".to_string()),
            metadata: None,
        };

        let err = FirecrawlScraper::page_from_data("https://example.com/empty", data).unwrap_err();
        assert!(matches!(err, ScrapeError::MissingContent { .. }));
    }

    #[test]
    fn test_page_from_data_blank_title_ignored() {
        let data = ScrapeData {
            markdown: Some("body".to_string()),
            metadata: Some(PageMetadata {
                title: Some("  ".to_string()),
            }),
        };

        let page = FirecrawlScraper::page_from_data("https://example.com", data).unwrap();
        assert!(page.title.is_none());
    }
}
