use std::collections::BTreeSet;

use rig::completion::Prompt;
use tracing::info;

use crate::error::ToolError;
use crate::models::{CategorizedReport, Condition, RawDetection};
use crate::tools::llm::get_llm_agent;

const REPORT_PREAMBLE: &str =
    "You are an AI clinical pathologist. You analyze raw urinalysis lab data \
     and produce structured medical reports in strict JSON format.";

fn build_report_prompt(raw: &RawDetection) -> String {
    let raw_json =
        serde_json::to_string_pretty(raw).expect("raw detection data serializes to JSON");
    format!(
        r#"Analyze the raw urinalysis data below and produce a categorized medical report.

Clinical context (conditions to flag):
- Hematuria (blood in urine): suspect if 'red_blood_cells' > 10.
- Bacteriuria (urinary tract infection): suspect if 'bacteria' is 'moderate' or 'high'.
- Urolithiasis (kidney stone risk): suspect if 'uric_acid_crystals' > 20.
- Proteinuria (protein in urine): suspect if 'protein' is 'trace' or higher.

Raw lab data from the CV model:
{raw_json}

Instructions:
1. Analyze the lab data against the clinical context above.
2. Respond with a single valid JSON object and nothing else.
3. The JSON must have a "status" key, either "Normal" or "Needs Attention".
4. For each suspected condition, add a key named after the condition with a short
   explanation. Use exactly these keys: "hematuria_finding", "bacteriuria_finding",
   "urolithiasis_finding", "proteinuria_finding".
   Example: {{"status": "Needs Attention", "hematuria_finding": "Red blood cell count is elevated, indicating possible hematuria."}}
5. If nothing is suspected, respond with exactly:
   {{"status": "Normal", "summary": "No significant anomalies detected."}}

Your JSON output:"#
    )
}

/// Turn a raw detection payload into a categorized report via the LLM.
///
/// The model reply must be valid JSON and must agree with the locally
/// evaluated thresholds; anything else is a typed failure, never data.
pub async fn generate_medical_report(raw: &RawDetection) -> Result<CategorizedReport, ToolError> {
    let agent = get_llm_agent(REPORT_PREAMBLE)?;
    let prompt = build_report_prompt(raw);

    let reply = agent
        .prompt(&prompt)
        .await
        .map_err(|e| ToolError::Completion(e.to_string()))?;

    let report = parse_report_reply(&reply, raw)?;
    info!(status = ?report.status, findings = report.findings.len(), "categorized report generated");
    Ok(report)
}

/// Parse and validate a model reply against the raw data it was derived from.
pub fn parse_report_reply(reply: &str, raw: &RawDetection) -> Result<CategorizedReport, ToolError> {
    let cleaned = strip_code_fences(reply);

    let report: CategorizedReport =
        serde_json::from_str(cleaned).map_err(|e| ToolError::MalformedReply {
            message: e.to_string(),
            raw: reply.to_string(),
        })?;

    report.validate().map_err(ToolError::InvalidReport)?;

    let expected: BTreeSet<&str> = Condition::evaluate(raw)
        .into_iter()
        .map(Condition::finding_key)
        .collect();
    let actual: BTreeSet<&str> = report.findings.keys().map(String::as_str).collect();

    if expected != actual {
        return Err(ToolError::InvalidReport(format!(
            "report findings {actual:?} do not match the threshold evaluation {expected:?}"
        )));
    }

    Ok(report)
}

/// Models routinely wrap JSON replies in markdown fences; tolerate that.
fn strip_code_fences(reply: &str) -> &str {
    let trimmed = reply.trim();
    let Some(body) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let body = body.strip_prefix("json").unwrap_or(body);
    body.strip_suffix("```").unwrap_or(body).trim()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BacteriaLevel, ReportStatus};

    fn hematuria_sample() -> RawDetection {
        RawDetection {
            red_blood_cells: Some(25.0),
            ..Default::default()
        }
    }

    fn clean_sample() -> RawDetection {
        RawDetection {
            red_blood_cells: Some(2.0),
            bacteria: Some(BacteriaLevel::Low),
            ..Default::default()
        }
    }

    #[test]
    fn valid_reply_parses_into_a_report() {
        let reply = r#"{"status": "Needs Attention", "hematuria_finding": "Red blood cell count is elevated."}"#;
        let report = parse_report_reply(reply, &hematuria_sample()).unwrap();
        assert_eq!(report.status, ReportStatus::NeedsAttention);
        assert_eq!(
            report.findings["hematuria_finding"],
            "Red blood cell count is elevated."
        );
    }

    #[test]
    fn fenced_reply_is_tolerated() {
        let reply = "```json\n{\"status\": \"Normal\", \"summary\": \"No significant anomalies detected.\"}\n```";
        let report = parse_report_reply(reply, &clean_sample()).unwrap();
        assert_eq!(report.status, ReportStatus::Normal);
        assert!(report.findings.is_empty());
    }

    #[test]
    fn non_json_reply_keeps_the_raw_text() {
        let reply = "I am sorry, I cannot produce a report for this sample.";
        let err = parse_report_reply(reply, &hematuria_sample()).unwrap_err();
        match err {
            ToolError::MalformedReply { raw, .. } => assert_eq!(raw, reply),
            other => panic!("expected MalformedReply, got {other:?}"),
        }
    }

    #[test]
    fn status_contradicting_findings_is_rejected() {
        let reply = r#"{"status": "Needs Attention", "summary": "All good."}"#;
        let err = parse_report_reply(reply, &hematuria_sample()).unwrap_err();
        assert!(matches!(err, ToolError::InvalidReport(_)));
    }

    #[test]
    fn findings_disagreeing_with_thresholds_are_rejected() {
        // Model flags bacteriuria for a sample where only red cells are high.
        let reply = r#"{"status": "Needs Attention", "bacteriuria_finding": "Bacteria level is high."}"#;
        let err = parse_report_reply(reply, &hematuria_sample()).unwrap_err();
        assert!(matches!(err, ToolError::InvalidReport(_)));

        // Model invents a finding for a clean sample.
        let reply = r#"{"status": "Needs Attention", "hematuria_finding": "Elevated."}"#;
        let err = parse_report_reply(reply, &clean_sample()).unwrap_err();
        assert!(matches!(err, ToolError::InvalidReport(_)));
    }

    #[test]
    fn prompt_embeds_the_raw_data() {
        let prompt = build_report_prompt(&hematuria_sample());
        assert!(prompt.contains("\"red_blood_cells\": 25.0"));
        assert!(prompt.contains("'red_blood_cells' > 10"));
    }
}
