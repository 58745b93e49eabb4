use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::config::ToolConfig;
use crate::error::{FlowError, Result};
use crate::flow::{Context, Task, TaskResult};
use crate::tasks::context_keys;
use crate::tools::{analyze_image, generate_medical_report};
use crate::workers::{Capability, LAB_ANALYST};

/// First step of the analyze-sample run: submit the image to the CV model,
/// then turn the raw detection data into a categorized report.
pub struct LabAnalysisTask {
    config: Arc<ToolConfig>,
}

impl LabAnalysisTask {
    pub const ID: &'static str = "lab_analysis";

    pub fn new(config: Arc<ToolConfig>) -> Self {
        Self { config }
    }
}

#[async_trait]
impl Task for LabAnalysisTask {
    fn id(&self) -> &str {
        Self::ID
    }

    async fn run(&self, context: Context) -> Result<TaskResult> {
        let image_path: String = context
            .get(context_keys::IMAGE_PATH)
            .await
            .ok_or_else(|| FlowError::ContextError("image_path not found".to_string()))?;

        info!(%image_path, "starting lab analysis");

        LAB_ANALYST.authorize(Capability::AnalyzeImage)?;
        let raw_detection = analyze_image(&self.config, &image_path).await?;
        context
            .set(context_keys::RAW_DETECTION, &raw_detection)
            .await;

        LAB_ANALYST.authorize(Capability::GenerateReport)?;
        let report = generate_medical_report(&raw_detection).await?;
        context.set(context_keys::CATEGORIZED_REPORT, &report).await;

        let status = format!(
            "Lab analysis complete: status {:?}, {} finding(s)",
            report.status,
            report.findings.len()
        );
        Ok(TaskResult::new_with_status(None, status))
    }
}
