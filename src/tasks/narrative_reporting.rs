use async_trait::async_trait;
use tracing::info;

use crate::error::{FlowError, Result};
use crate::flow::{Context, Task, TaskResult};
use crate::models::CategorizedReport;
use crate::tasks::context_keys;
use crate::tools::generate_human_readable_analysis;
use crate::workers::{Capability, MEDICAL_ADVISOR};

/// Second step of the analyze-sample run: turn the categorized report
/// produced upstream into a patient-facing narrative.
pub struct NarrativeReportingTask;

impl NarrativeReportingTask {
    pub const ID: &'static str = "narrative_reporting";
}

#[async_trait]
impl Task for NarrativeReportingTask {
    fn id(&self) -> &str {
        Self::ID
    }

    async fn run(&self, context: Context) -> Result<TaskResult> {
        let report: CategorizedReport = context
            .get(context_keys::CATEGORIZED_REPORT)
            .await
            .ok_or_else(|| FlowError::ContextError("categorized_report not found".to_string()))?;

        let language: String = context
            .get(context_keys::LANGUAGE)
            .await
            .unwrap_or_else(|| "English".to_string());

        info!(%language, "generating patient narrative");

        MEDICAL_ADVISOR.authorize(Capability::GenerateNarrative)?;
        let narrative = generate_human_readable_analysis(&report, &language).await?;
        context
            .set(context_keys::NARRATIVE_REPORT, &narrative)
            .await;

        Ok(TaskResult::new_with_status(
            Some(narrative),
            "Patient narrative generated",
        ))
    }
}
