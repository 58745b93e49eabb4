use async_trait::async_trait;
use serde_json::Value;
use tracing::info;

use crate::error::{FlowError, Result};
use crate::flow::{Context, Task, TaskResult};
use crate::models::CategorizedReport;
use crate::tasks::context_keys;
use crate::tools::generate_overall_health_analysis;
use crate::workers::{Capability, MEDICAL_ADVISOR};

/// Single step of the overall-analysis run: correlate the lab report with
/// the patient's general health data.
pub struct OverallReviewTask;

impl OverallReviewTask {
    pub const ID: &'static str = "overall_review";
}

#[async_trait]
impl Task for OverallReviewTask {
    fn id(&self) -> &str {
        Self::ID
    }

    async fn run(&self, context: Context) -> Result<TaskResult> {
        let report: CategorizedReport = context
            .get(context_keys::CATEGORIZED_REPORT)
            .await
            .ok_or_else(|| FlowError::ContextError("categorized_report not found".to_string()))?;

        let patient_health_data: Value = context
            .get(context_keys::PATIENT_HEALTH_DATA)
            .await
            .ok_or_else(|| FlowError::ContextError("patient_health_data not found".to_string()))?;

        let language: String = context
            .get(context_keys::LANGUAGE)
            .await
            .unwrap_or_else(|| "English".to_string());

        info!(%language, "generating overall health analysis");

        MEDICAL_ADVISOR.authorize(Capability::OverallAnalysis)?;
        let analysis =
            generate_overall_health_analysis(&report, &patient_health_data, &language).await?;
        context.set(context_keys::OVERALL_ANALYSIS, &analysis).await;

        Ok(TaskResult::new_with_status(
            Some(analysis),
            "Overall health analysis generated",
        ))
    }
}
