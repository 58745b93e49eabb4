use rig::prelude::*;
use rig::{agent::Agent, providers::openrouter};

use crate::error::ToolError;

const LLM_MODEL: &str = "google/gemini-2.5-flash";
const LLM_TEMPERATURE: f64 = 0.2;

/// Create an LLM agent using OpenRouter with the given preamble.
pub fn get_llm_agent(preamble: &str) -> Result<Agent<openrouter::CompletionModel>, ToolError> {
    let api_key = std::env::var("OPENROUTER_API_KEY")
        .map_err(|_| ToolError::MissingConfig("OPENROUTER_API_KEY"))?;
    let client = openrouter::Client::new(&api_key);
    Ok(client
        .agent(LLM_MODEL)
        .preamble(preamble)
        .temperature(LLM_TEMPERATURE)
        .build())
}
