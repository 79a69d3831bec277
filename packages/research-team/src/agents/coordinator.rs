//! The research coordinator.
//!
//! Top-level agent that routes user requests to the specialists. Its
//! three tools are the specialist agents themselves, wrapped as
//! `SpecialistTool`s.

use std::sync::Arc;

use gemini_client::{Agent, GeminiClient};

use crate::agents::{
    create_extractor_agent, create_search_agent, create_summarizer_agent, SpecialistTool,
};
use crate::config::Config;
use crate::scrape::Scraper;
use crate::search::WebSearcher;

const COORDINATOR_INSTRUCTION: &str = "\
You are the expert coordinator of a research assistant team. Understand \
each user research request and delegate work to the appropriate \
specialist, available as tools:

- 'search_agent': when the user wants to find information, research a \
topic, or discover relevant web pages. Pass the research topic.
- 'content_extractor': when the user provides a specific URL and asks \
for its content, or when you need the full text of a URL found by the \
search agent. Pass the URL.
- 'summarizer_agent': when the user asks for a summary of provided or \
extracted text. Pass the text to summarize.

Workflow:
1. Analyze the request: finding information, analyzing a specific page, \
summarizing text, or a multi-step research task?
2. Delegate accordingly using the tools above.
3. For complex requests that need search, extraction, and summarization: \
first call 'search_agent' to find relevant URLs; present the results and \
ask the user which URLs to analyze further, or pick the most promising \
one or two yourself when the user asked for a full workflow; call \
'content_extractor' for each selected URL; then call 'summarizer_agent' \
with the extracted text to produce the final summary.
4. Synthesize the specialists' outputs into a single coherent response, \
attributing information to its source URL where appropriate, and explain \
the steps you took for multi-step work.
5. Ask clarifying questions when the request is ambiguous.
6. If a specialist reports an error, tell the user about the issue.

You are the final interface to the user: make sure the response directly \
addresses the original request, and never just forward raw tool output.";

/// Build the full research team and return the coordinator agent.
///
/// Instantiates the three specialists on the specialist model, wraps each
/// as a tool, and binds them to the coordinator model.
pub fn create_coordinator(
    client: &GeminiClient,
    config: &Config,
    searcher: Arc<dyn WebSearcher>,
    scraper: Arc<dyn Scraper>,
) -> Agent {
    let search_agent = create_search_agent(client, &config.specialist_model, searcher);
    let extractor_agent = create_extractor_agent(client, &config.specialist_model, scraper);
    let summarizer_agent = create_summarizer_agent(client, &config.specialist_model);

    tracing::info!(
        coordinator_model = %config.coordinator_model,
        specialist_model = %config.specialist_model,
        "Research team assembled"
    );

    client
        .agent(&config.coordinator_model)
        .system(COORDINATOR_INSTRUCTION)
        .tool_dyn(Box::new(SpecialistTool::new(
            search_agent,
            "search_agent",
            "A specialized agent that searches the web for information relevant to a research topic.",
        )))
        .tool_dyn(Box::new(SpecialistTool::new(
            extractor_agent,
            "content_extractor",
            "A specialized agent that extracts the main textual content from a web page URL.",
        )))
        .tool_dyn(Box::new(SpecialistTool::new(
            summarizer_agent,
            "summarizer_agent",
            "A specialized agent that creates concise summaries of provided text content.",
        )))
        .build()
}
