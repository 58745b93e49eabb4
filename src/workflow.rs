use std::sync::Arc;

use crate::config::ToolConfig;
use crate::flow::{Pipeline, PipelineBuilder};
use crate::tasks::{
    AppointmentBookingTask, AppointmentSearchTask, LabAnalysisTask, NarrativeReportingTask,
    OverallReviewTask,
};

/// The four run kinds the service exposes, each a prebuilt linear pipeline.
/// Pipelines are stateless; one set is shared across all requests.
#[derive(Clone)]
pub struct Pipelines {
    pub analysis: Arc<Pipeline>,
    pub overall: Arc<Pipeline>,
    pub appointment_search: Arc<Pipeline>,
    pub appointment_booking: Arc<Pipeline>,
}

pub fn build_pipelines(config: Arc<ToolConfig>) -> Pipelines {
    let analysis = PipelineBuilder::new("analyze_sample")
        .add_task(Arc::new(LabAnalysisTask::new(config.clone())))
        .add_task(Arc::new(NarrativeReportingTask))
        .build();

    let overall = PipelineBuilder::new("overall_analysis")
        .add_task(Arc::new(OverallReviewTask))
        .build();

    let appointment_search = PipelineBuilder::new("appointment_search")
        .add_task(Arc::new(AppointmentSearchTask))
        .build();

    let appointment_booking = PipelineBuilder::new("appointment_booking")
        .add_task(Arc::new(AppointmentBookingTask::new(config)))
        .build();

    Pipelines {
        analysis: Arc::new(analysis),
        overall: Arc::new(overall),
        appointment_search: Arc::new(appointment_search),
        appointment_booking: Arc::new(appointment_booking),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn analysis_run_orders_report_before_narrative() {
        let pipelines = build_pipelines(Arc::new(ToolConfig::default()));
        assert_eq!(
            pipelines.analysis.task_ids(),
            vec![LabAnalysisTask::ID, NarrativeReportingTask::ID]
        );
    }

    #[test]
    fn remaining_runs_are_single_task() {
        let pipelines = build_pipelines(Arc::new(ToolConfig::default()));
        assert_eq!(pipelines.overall.task_ids(), vec![OverallReviewTask::ID]);
        assert_eq!(
            pipelines.appointment_search.task_ids(),
            vec![AppointmentSearchTask::ID]
        );
        assert_eq!(
            pipelines.appointment_booking.task_ids(),
            vec![AppointmentBookingTask::ID]
        );
    }
}
