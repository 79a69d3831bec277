//! The content extraction specialist.

use std::sync::Arc;

use gemini_client::{Agent, GeminiClient};

use crate::scrape::Scraper;
use crate::tools::ExtractPageTool;

const EXTRACTOR_AGENT_INSTRUCTION: &str = "\
You are a web content extraction specialist. Your task is to retrieve the \
main textual content of a given URL.

1. Receive a specific URL as input.
2. Fetch and process the page with the 'extract_page' tool.
3. The tool returns a record with the extracted markdown, page title, \
URL, status, and other metadata.
4. Present the key information from the record clearly: state the title \
and URL, provide the extracted markdown, mention whether the content was \
truncated, and report the approximate word count.
5. If the record's status is 'error', report its error message instead.
6. Only report the results of the extraction; add no analysis or \
summarization of your own.
7. When asked to extract from several URLs, run the tool once per URL and \
present the results grouped by URL.";

/// Create the agent specialized in extracting content from URLs.
///
/// Binds the specialist model to the `extract_page` tool over the given
/// scrape service.
pub fn create_extractor_agent(
    client: &GeminiClient,
    model: &str,
    scraper: Arc<dyn Scraper>,
) -> Agent {
    client
        .agent(model)
        .system(EXTRACTOR_AGENT_INSTRUCTION)
        .tool(ExtractPageTool::new(scraper))
        .build()
}
