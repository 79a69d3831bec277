//! Integration tests for the research pipeline over mock services.
//!
//! These tests verify the search → extract flow end to end:
//! 1. Search discovers URLs
//! 2. Extraction turns a discovered URL into the uniform record
//! 3. The record honors the truncation and error contracts

use std::sync::Arc;
use std::time::Duration;

use gemini_client::{ErasedTool, GeminiClient};
use research_team::{
    create_coordinator, extract_page, extract_page_blocking_with_timeout, Config, ExtractPageTool,
    ExtractionStatus, MockScraper, MockSearcher, ScrapedPage, WebSearchTool, WebSearcher,
    MAX_CONTENT_CHARS,
};

const TOPIC: &str = "community volunteer opportunities";
const PAGE_URL: &str = "https://example.org/volunteer";

fn test_config() -> Config {
    Config::from_lookup(|key| match key {
        "GOOGLE_API_KEY" => Some("g-key".to_string()),
        "TAVILY_API_KEY" => Some("t-key".to_string()),
        "FIRECRAWL_API_KEY" => Some("f-key".to_string()),
        _ => None,
    })
    .unwrap()
}

#[tokio::test]
async fn test_search_then_extract_pipeline() {
    let searcher = MockSearcher::new().with_urls(TOPIC, &[PAGE_URL, "https://example.org/about"]);
    let scraper = MockScraper::new().with_page(
        ScrapedPage::new(
            PAGE_URL,
            "# Volunteer With Us\n\nWe need tutors and drivers every weekend.",
        )
        .with_title("Volunteer With Us"),
    );

    // Search discovers the page
    let outcome = searcher.search(TOPIC).await.unwrap();
    assert_eq!(outcome.hits.len(), 2);
    let first_url = outcome.hits[0].url.as_str();

    // Extraction turns it into the uniform record
    let record = extract_page(&scraper, first_url, true).await;
    assert_eq!(record.status, ExtractionStatus::Success);
    assert_eq!(record.title, "Volunteer With Us");
    assert_eq!(record.headers, vec!["Volunteer With Us"]);
    assert!(!record.has_truncated_content);
    assert_eq!(scraper.calls(), vec![PAGE_URL.to_string()]);
}

#[tokio::test]
async fn test_extraction_record_contract_over_tool_boundary() {
    let long_body = "lorem ipsum dolor sit amet ".repeat(600);
    let scraper = MockScraper::new().with_content(PAGE_URL, &long_body);
    let tool: Box<dyn ErasedTool> = Box::new(ExtractPageTool::new(Arc::new(scraper)));

    let value = tool
        .call_erased(&serde_json::json!({"url": PAGE_URL}))
        .await
        .unwrap();

    // The serialized record the model sees upholds the truncation contract
    let content_length = value["content_length"].as_u64().unwrap() as usize;
    let markdown_chars = value["markdown_content"].as_str().unwrap().chars().count();
    assert_eq!(content_length, long_body.chars().count());
    assert_eq!(markdown_chars, MAX_CONTENT_CHARS);
    assert_eq!(value["has_truncated_content"], true);
    assert!(value.get("error_message").is_none());
}

#[tokio::test]
async fn test_failed_extraction_reports_error_through_tool() {
    let scraper = MockScraper::new().with_failure(PAGE_URL, "blocked by robots");
    let tool: Box<dyn ErasedTool> = Box::new(ExtractPageTool::new(Arc::new(scraper)));

    let value = tool
        .call_erased(&serde_json::json!({"url": PAGE_URL}))
        .await
        .unwrap();

    assert_eq!(value["status"], "error");
    assert!(!value["error_message"].as_str().unwrap().is_empty());
    assert_eq!(value["markdown_content"], "Extraction failed.");
}

#[tokio::test]
async fn test_search_tool_output_shape() {
    let searcher = MockSearcher::new().with_urls(TOPIC, &[PAGE_URL]);
    let tool: Box<dyn ErasedTool> = Box::new(WebSearchTool::new(Arc::new(searcher)));

    let value = tool
        .call_erased(&serde_json::json!({"query": TOPIC}))
        .await
        .unwrap();

    let results = value["results"].as_array().unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0]["url"], PAGE_URL);
}

#[test]
fn test_blocking_extraction_respects_budget() {
    let scraper = MockScraper::new()
        .with_content(PAGE_URL, "# Slow page")
        .with_delay(Duration::from_millis(500));

    let record = extract_page_blocking_with_timeout(
        Arc::new(scraper),
        PAGE_URL,
        false,
        Duration::from_millis(50),
    );

    assert_eq!(record.status, ExtractionStatus::Error);
    assert!(record.error_message.unwrap().contains("timed out"));
}

#[test]
fn test_team_wires_specialists_to_coordinator() {
    let client = GeminiClient::new("test-key");
    let coordinator = create_coordinator(
        &client,
        &test_config(),
        Arc::new(MockSearcher::new()),
        Arc::new(MockScraper::new()),
    );

    assert_eq!(coordinator.tool_count(), 3);
}
