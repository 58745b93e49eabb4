use rig::completion::Prompt;
use serde_json::Value;
use tracing::info;

use crate::error::ToolError;
use crate::models::CategorizedReport;
use crate::tools::llm::get_llm_agent;

const OVERALL_PREAMBLE: &str =
    "You are an AI holistic health advisor. You correlate lab results with a \
     patient's general health data to produce comprehensive insights.";

/// Correlate a categorized lab report with general patient health data. The
/// correlation itself happens entirely inside the model; this adapter only
/// threads both payloads into one prompt.
pub async fn generate_overall_health_analysis(
    report: &CategorizedReport,
    patient_health_data: &Value,
    language: &str,
) -> Result<String, ToolError> {
    let report_json = serde_json::to_string_pretty(report).expect("report serializes to JSON");
    let health_json = serde_json::to_string_pretty(patient_health_data)
        .expect("patient health data serializes to JSON");

    let prompt = format!(
        r#"Lab medical report (JSON):
{report_json}

Patient general health data (JSON):
{health_json}

Instructions:
1. Analyze both sources of data.
2. Look for correlations that may exist. Example: if the lab report shows kidney stone risk and the patient data shows excess weight, mention the connection.
3. Write a narrative summary combining all of this information into useful insight.
4. Always advise consulting a doctor for a final diagnosis.
5. Write your ENTIRE output in {language}.

Your overall analysis:"#
    );

    let agent = get_llm_agent(OVERALL_PREAMBLE)?;
    let analysis = agent
        .prompt(&prompt)
        .await
        .map_err(|e| ToolError::Completion(e.to_string()))?;

    info!(language, characters = analysis.len(), "overall analysis generated");
    Ok(analysis)
}
