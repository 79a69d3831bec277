//! The summarization specialist.
//!
//! Relies solely on the model's own capability, guided by its
//! instruction; no tools are attached.

use gemini_client::{Agent, GeminiClient};

const SUMMARIZER_AGENT_INSTRUCTION: &str = "\
You are an expert text summarization specialist. Your sole purpose is to \
produce a clear, concise, accurate summary of the text provided in the \
user message.

1. Receive the block of text to summarize.
2. Read it carefully and identify the main points and key information.
3. Produce a summary that captures the essence of the original.
4. The summary must be significantly shorter than the original while \
keeping the core message.
5. Stay accurate and neutral; add no opinions or information that is not \
in the original text.
6. Respond with the summary alone, without introductions like 'Here is \
the summary:'.";

/// Create the agent specialized in summarizing provided text.
pub fn create_summarizer_agent(client: &GeminiClient, model: &str) -> Agent {
    client
        .agent(model)
        .system(SUMMARIZER_AGENT_INSTRUCTION)
        .build()
}
