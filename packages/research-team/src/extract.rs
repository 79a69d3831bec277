//! Content extraction: the uniform result record and the timeout shim.
//!
//! `extract_page` turns one scrape call into a `PageExtraction` record the
//! model can consume. It never returns `Err`: every failure mode (remote
//! error, empty response, timeout, worker failure) normalizes into the
//! same record shape with `status = "error"` and a human-readable message.
//!
//! `extract_page_blocking` bridges the async scrape call into a
//! synchronous call site: the work runs on a dedicated worker thread with
//! its own current-thread runtime while the caller blocks on a channel
//! with a fixed deadline. On deadline the worker is abandoned, not
//! cancelled. No retries are attempted at this layer.

use serde::{Deserialize, Serialize};
use std::sync::{mpsc, Arc};
use std::time::Duration;

use crate::scrape::Scraper;

/// Extracted markdown handed to the model is capped at this many characters.
pub const MAX_CONTENT_CHARS: usize = 10_000;

/// Wall-clock budget for one blocking extraction.
pub const EXTRACTION_TIMEOUT: Duration = Duration::from_secs(60);

/// Outcome marker on the extraction record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtractionStatus {
    Success,
    Error,
}

/// The extraction result record.
///
/// Constructed, returned, discarded; deliberately timestamp-free so a
/// fixed scrape response always produces an identical record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageExtraction {
    pub status: ExtractionStatus,
    pub title: String,
    pub url: String,

    /// Markdown truncated to at most `MAX_CONTENT_CHARS` characters.
    pub markdown_content: String,

    /// Character count of the untruncated text.
    pub content_length: usize,

    /// H1-H6 heading texts, populated only when requested.
    pub headers: Vec<String>,

    /// Whitespace-separated token count of the untruncated text.
    pub word_count: usize,

    pub has_truncated_content: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl PageExtraction {
    /// The uniform error record.
    pub fn error(url: &str, message: impl Into<String>) -> Self {
        Self {
            status: ExtractionStatus::Error,
            title: url.to_string(),
            url: url.to_string(),
            markdown_content: "Extraction failed.".to_string(),
            content_length: 0,
            headers: Vec::new(),
            word_count: 0,
            has_truncated_content: false,
            error_message: Some(message.into()),
        }
    }

    /// Whether this record carries usable content.
    pub fn is_success(&self) -> bool {
        self.status == ExtractionStatus::Success
    }
}

/// Extract the primary textual content from a URL.
///
/// All failures come back as the uniform error record; the returned
/// record is always safe to serialize for the model.
pub async fn extract_page(scraper: &dyn Scraper, url: &str, include_headers: bool) -> PageExtraction {
    tracing::info!(url = %url, scraper = scraper.name(), "Extracting page content");

    let page = match scraper.scrape(url).await {
        Ok(page) => page,
        Err(e) => {
            tracing::warn!(url = %url, error = %e, "Extraction failed");
            return PageExtraction::error(url, e.to_string());
        }
    };

    // Empty responses count as failures even when the provider reported success
    if page.markdown.trim().is_empty() {
        tracing::warn!(url = %url, "Scrape returned no content");
        return PageExtraction::error(url, format!("no content returned for: {}", url));
    }

    let content_length = page.markdown.chars().count();
    let markdown_content = truncate_chars(&page.markdown, MAX_CONTENT_CHARS);
    let word_count = page.markdown.split_whitespace().count();
    let title = resolve_title(page.title.as_deref(), &page.markdown, url);
    let headers = if include_headers {
        collect_headers(&page.markdown)
    } else {
        Vec::new()
    };

    tracing::info!(url = %url, title = %title, content_length, "Extraction complete");

    PageExtraction {
        status: ExtractionStatus::Success,
        title,
        url: url.to_string(),
        markdown_content,
        content_length,
        headers,
        word_count,
        has_truncated_content: content_length > MAX_CONTENT_CHARS,
        error_message: None,
    }
}

/// Blocking extraction with the default 60-second budget.
///
/// For synchronous call sites only; do not call from inside an async
/// runtime (the deadline wait would block an executor thread).
pub fn extract_page_blocking(
    scraper: Arc<dyn Scraper>,
    url: &str,
    include_headers: bool,
) -> PageExtraction {
    extract_page_blocking_with_timeout(scraper, url, include_headers, EXTRACTION_TIMEOUT)
}

/// Blocking extraction with an explicit wall-clock budget.
///
/// Spawns a single dedicated worker thread running its own current-thread
/// runtime and waits on a channel. If the budget elapses the worker is
/// abandoned — it keeps running until its scrape call resolves, but its
/// result is discarded.
pub fn extract_page_blocking_with_timeout(
    scraper: Arc<dyn Scraper>,
    url: &str,
    include_headers: bool,
    timeout: Duration,
) -> PageExtraction {
    let (tx, rx) = mpsc::channel();
    let worker_url = url.to_string();

    let spawned = std::thread::Builder::new()
        .name("page-extraction".to_string())
        .spawn(move || {
            let record = match tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
            {
                Ok(runtime) => {
                    runtime.block_on(extract_page(scraper.as_ref(), &worker_url, include_headers))
                }
                Err(e) => PageExtraction::error(
                    &worker_url,
                    format!("extraction worker failed to start: {}", e),
                ),
            };
            // Receiver may be gone if the caller already timed out
            let _ = tx.send(record);
        });

    if let Err(e) = spawned {
        tracing::error!(url = %url, error = %e, "Failed to spawn extraction worker");
        return PageExtraction::error(url, format!("failed to spawn extraction worker: {}", e));
    }

    match rx.recv_timeout(timeout) {
        Ok(record) => record,
        Err(mpsc::RecvTimeoutError::Timeout) => {
            tracing::warn!(url = %url, timeout = ?timeout, "Extraction timed out, abandoning worker");
            PageExtraction::error(url, format!("extraction timed out after {:?}", timeout))
        }
        Err(mpsc::RecvTimeoutError::Disconnected) => {
            tracing::error!(url = %url, "Extraction worker terminated unexpectedly");
            PageExtraction::error(url, "extraction worker terminated unexpectedly")
        }
    }
}

/// Truncate to at most `max` characters, never splitting a UTF-8 sequence.
fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((byte_idx, _)) => text[..byte_idx].to_string(),
        None => text.to_string(),
    }
}

/// Pick a display title: scrape metadata, first H1, last URL path segment,
/// then the URL itself.
fn resolve_title(scrape_title: Option<&str>, markdown: &str, url: &str) -> String {
    if let Some(title) = scrape_title {
        let title = title.trim();
        if !title.is_empty() {
            return title.to_string();
        }
    }

    for line in markdown.lines() {
        if let Some(heading) = line.strip_prefix("# ") {
            let heading = heading.trim();
            if !heading.is_empty() {
                return heading.to_string();
            }
        }
    }

    url.trim_end_matches('/')
        .rsplit('/')
        .find(|segment| !segment.is_empty())
        .filter(|segment| !segment.contains(':'))
        .map(|segment| segment.to_string())
        .unwrap_or_else(|| url.to_string())
}

/// Collect H1-H6 heading texts from markdown.
fn collect_headers(markdown: &str) -> Vec<String> {
    markdown
        .lines()
        .filter_map(|line| {
            let hashes = line.chars().take_while(|&c| c == '#').count();
            if !(1..=6).contains(&hashes) {
                return None;
            }
            let rest = &line[hashes..];
            let text = rest.strip_prefix(' ')?.trim();
            if text.is_empty() {
                None
            } else {
                Some(text.to_string())
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scrape::{MockScraper, ScrapedPage};
    use proptest::prelude::*;
    use std::time::Instant;

    const URL: &str = "https://example.com/articles/deep-dive";

    #[tokio::test]
    async fn test_successful_extraction_record() {
        let mock = MockScraper::new().with_page(
            ScrapedPage::new(URL, "# Deep Dive\n\nBody text here.").with_title("Deep Dive"),
        );

        let record = extract_page(&mock, URL, false).await;
        assert!(record.is_success());
        assert_eq!(record.title, "Deep Dive");
        assert_eq!(record.url, URL);
        assert_eq!(record.content_length, "# Deep Dive\n\nBody text here.".chars().count());
        assert_eq!(record.word_count, 6);
        assert!(!record.has_truncated_content);
        assert!(record.error_message.is_none());
        assert!(record.headers.is_empty());
    }

    #[tokio::test]
    async fn test_content_at_cap_is_not_truncated() {
        let content = "a".repeat(MAX_CONTENT_CHARS);
        let mock = MockScraper::new().with_content(URL, &content);

        let record = extract_page(&mock, URL, false).await;
        assert_eq!(record.content_length, MAX_CONTENT_CHARS);
        assert_eq!(record.markdown_content.chars().count(), MAX_CONTENT_CHARS);
        assert!(!record.has_truncated_content);
    }

    #[tokio::test]
    async fn test_content_over_cap_is_truncated() {
        let content = "b".repeat(MAX_CONTENT_CHARS + 1);
        let mock = MockScraper::new().with_content(URL, &content);

        let record = extract_page(&mock, URL, false).await;
        assert_eq!(record.content_length, MAX_CONTENT_CHARS + 1);
        assert_eq!(record.markdown_content.chars().count(), MAX_CONTENT_CHARS);
        assert!(record.has_truncated_content);
    }

    #[tokio::test]
    async fn test_truncation_respects_multibyte_chars() {
        let content = "é".repeat(MAX_CONTENT_CHARS + 50);
        let mock = MockScraper::new().with_content(URL, &content);

        let record = extract_page(&mock, URL, false).await;
        assert_eq!(record.content_length, MAX_CONTENT_CHARS + 50);
        assert_eq!(record.markdown_content.chars().count(), MAX_CONTENT_CHARS);
        assert!(record.markdown_content.chars().all(|c| c == 'é'));
    }

    #[tokio::test]
    async fn test_title_falls_back_to_first_heading() {
        let mock = MockScraper::new().with_content(URL, "intro\n\n# Actual Title\n\nmore");

        let record = extract_page(&mock, URL, false).await;
        assert_eq!(record.title, "Actual Title");
    }

    #[tokio::test]
    async fn test_title_falls_back_to_url_segment() {
        let mock = MockScraper::new().with_content(URL, "no headings here");

        let record = extract_page(&mock, URL, false).await;
        assert_eq!(record.title, "deep-dive");
    }

    #[test]
    fn test_title_falls_back_to_url_when_no_path() {
        assert_eq!(
            resolve_title(None, "plain text", "https://example.com/"),
            "example.com"
        );
    }

    #[tokio::test]
    async fn test_headers_collected_only_when_requested() {
        let markdown = "# One\n\ntext\n\n## Two\n\n###### Six\n\n####### seven hashes\n\n#nospace";
        let mock = MockScraper::new().with_content(URL, markdown);

        let without = extract_page(&mock, URL, false).await;
        assert!(without.headers.is_empty());

        let with = extract_page(&mock, URL, true).await;
        assert_eq!(with.headers, vec!["One", "Two", "Six"]);
    }

    #[tokio::test]
    async fn test_remote_failure_yields_uniform_error_record() {
        let mock = MockScraper::new().with_failure(URL, "bad gateway");

        let record = extract_page(&mock, URL, false).await;
        assert_eq!(record.status, ExtractionStatus::Error);
        assert_eq!(record.title, URL);
        assert_eq!(record.markdown_content, "Extraction failed.");
        assert_eq!(record.content_length, 0);
        assert_eq!(record.word_count, 0);
        assert!(!record.has_truncated_content);
        assert!(!record.error_message.as_deref().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_missing_page_yields_error_record() {
        let mock = MockScraper::new();

        let record = extract_page(&mock, URL, false).await;
        assert_eq!(record.status, ExtractionStatus::Error);
        assert!(record
            .error_message
            .as_deref()
            .unwrap()
            .contains("no content"));
    }

    #[tokio::test]
    async fn test_extraction_is_deterministic() {
        let mock = MockScraper::new()
            .with_page(ScrapedPage::new(URL, "# Stable\n\ncontent").with_title("Stable"));

        let first = extract_page(&mock, URL, true).await;
        let second = extract_page(&mock, URL, true).await;
        assert_eq!(first, second);
    }

    #[test]
    fn test_blocking_success() {
        let mock = MockScraper::new().with_content(URL, "# Hello\n\nworld");

        let record = extract_page_blocking(Arc::new(mock), URL, false);
        assert!(record.is_success());
        assert_eq!(record.word_count, 3);
    }

    #[test]
    fn test_blocking_timeout_returns_promptly_and_abandons_worker() {
        let mock = MockScraper::new()
            .with_content(URL, "# Slow")
            .with_delay(Duration::from_millis(400));

        let start = Instant::now();
        let record = extract_page_blocking_with_timeout(
            Arc::new(mock),
            URL,
            false,
            Duration::from_millis(100),
        );
        let elapsed = start.elapsed();

        assert_eq!(record.status, ExtractionStatus::Error);
        assert!(record
            .error_message
            .as_deref()
            .unwrap()
            .contains("timed out"));
        // Returned at the budget, not after the worker's 400ms sleep
        assert!(elapsed >= Duration::from_millis(100));
        assert!(elapsed < Duration::from_millis(350));
    }

    #[test]
    fn test_blocking_propagates_remote_error() {
        let mock = MockScraper::new().with_failure(URL, "connection reset");

        let record = extract_page_blocking(Arc::new(mock), URL, false);
        assert_eq!(record.status, ExtractionStatus::Error);
        assert!(record.error_message.as_deref().unwrap().contains("502"));
    }

    #[test]
    fn test_status_serializes_lowercase() {
        let record = PageExtraction::error("https://example.com", "boom");
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["status"], "error");
        assert_eq!(json["error_message"], "boom");
    }

    #[test]
    fn test_success_serialization_omits_error_message() {
        let record = PageExtraction {
            status: ExtractionStatus::Success,
            title: "T".into(),
            url: URL.into(),
            markdown_content: "body".into(),
            content_length: 4,
            headers: Vec::new(),
            word_count: 1,
            has_truncated_content: false,
            error_message: None,
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["status"], "success");
        assert!(json.get("error_message").is_none());
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn prop_truncation_invariants(chunk in "[a-zé #\n]{0,400}", repeats in 0usize..40) {
            let content = chunk.repeat(repeats);
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .unwrap();

            let mock = MockScraper::new().with_content(URL, &content);
            let record = runtime.block_on(extract_page(&mock, URL, false));

            if content.trim().is_empty() {
                // Blank scrapes are reported as missing content
                prop_assert_eq!(record.status, ExtractionStatus::Error);
            } else {
                let chars = content.chars().count();
                prop_assert_eq!(record.content_length, chars);
                prop_assert!(record.markdown_content.chars().count() <= MAX_CONTENT_CHARS);
                prop_assert_eq!(record.has_truncated_content, chars > MAX_CONTENT_CHARS);
                prop_assert!(content.starts_with(&record.markdown_content));
                prop_assert_eq!(record.word_count, content.split_whitespace().count());
            }
        }
    }
}
