use rig::completion::Prompt;
use tracing::info;

use crate::error::ToolError;
use crate::models::CategorizedReport;
use crate::tools::llm::get_llm_agent;

const NARRATIVE_PREAMBLE: &str =
    "You are an AI medical communicator. You turn structured medical reports \
     into short narratives a patient can understand.";

/// Produce a patient-facing narrative for a categorized report, in the
/// requested language. The output is free text and is not validated.
pub async fn generate_human_readable_analysis(
    report: &CategorizedReport,
    language: &str,
) -> Result<String, ToolError> {
    let report_json = serde_json::to_string_pretty(report).expect("report serializes to JSON");
    let prompt = format!(
        r#"Structured medical report (JSON):
{report_json}

Instructions:
1. Based on the report above, write a concise narrative summary explaining the findings only.
2. Do NOT give health advice or correlate with any other data.
3. Write your ENTIRE output in {language}.

Your explanation for the patient:"#
    );

    let agent = get_llm_agent(NARRATIVE_PREAMBLE)?;
    let narrative = agent
        .prompt(&prompt)
        .await
        .map_err(|e| ToolError::Completion(e.to_string()))?;

    info!(language, characters = narrative.len(), "narrative generated");
    Ok(narrative)
}
