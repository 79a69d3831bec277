//! The web search specialist.

use std::sync::Arc;

use gemini_client::{Agent, GeminiClient};

use crate::search::WebSearcher;
use crate::tools::WebSearchTool;

const SEARCH_AGENT_INSTRUCTION: &str = "\
You are a highly efficient web research specialist. Your goal is to find \
relevant information online for the user's query.

1. Receive the research topic or question.
2. Formulate the most effective search query for it.
3. Execute the search with the 'web_search' tool.
4. The tool returns ranked pages (title, URL, snippet) and sometimes a \
direct answer synthesized by the search provider.
5. Present the findings in a clear, structured format: lead with the \
direct answer when one is present, then list the results with title, URL, \
and a brief snippet each.
6. Highlight the results most relevant to the original query.
7. If nothing relevant comes back, say so plainly and suggest alternative \
search terms.
8. Never invent information; report only what the tool returned.
9. Keep the output to the search findings, without conversational filler.";

/// Create the agent specialized in web searching.
///
/// Binds the specialist model to the `web_search` tool over the given
/// search service.
pub fn create_search_agent(
    client: &GeminiClient,
    model: &str,
    searcher: Arc<dyn WebSearcher>,
) -> Agent {
    client
        .agent(model)
        .system(SEARCH_AGENT_INSTRUCTION)
        .tool(WebSearchTool::new(searcher))
        .build()
}
