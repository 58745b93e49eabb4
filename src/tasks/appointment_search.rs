use async_trait::async_trait;
use tracing::info;

use crate::error::{FlowError, Result};
use crate::flow::{Context, Task, TaskResult};
use crate::models::{CategorizedReport, DoctorSlot, SlotAvailability};
use crate::tasks::context_keys;
use crate::tools::get_available_appointments;
use crate::workers::{Capability, ADMIN_ASSISTANT};

/// Single step of the appointment-search run: filter the caller-supplied
/// schedule down to bookable slots, if the report calls for a consultation.
pub struct AppointmentSearchTask;

impl AppointmentSearchTask {
    pub const ID: &'static str = "appointment_search";
}

#[async_trait]
impl Task for AppointmentSearchTask {
    fn id(&self) -> &str {
        Self::ID
    }

    async fn run(&self, context: Context) -> Result<TaskResult> {
        let report: CategorizedReport = context
            .get(context_keys::CATEGORIZED_REPORT)
            .await
            .ok_or_else(|| FlowError::ContextError("categorized_report not found".to_string()))?;

        let schedules: Vec<DoctorSlot> = context
            .get(context_keys::ALL_DOCTOR_SCHEDULES)
            .await
            .ok_or_else(|| FlowError::ContextError("all_doctor_schedules not found".to_string()))?;

        ADMIN_ASSISTANT.authorize(Capability::FindAppointments)?;
        let availability = get_available_appointments(&report, &schedules);
        context
            .set(context_keys::AVAILABLE_SLOTS, &availability)
            .await;

        let (response, status) = match &availability {
            SlotAvailability::Available(slots) => {
                info!(count = slots.len(), "available slots found");
                (
                    Some(serde_json::to_string(slots).expect("slots serialize to JSON")),
                    format!("{} available slot(s) found", slots.len()),
                )
            }
            SlotAvailability::Message(message) => {
                info!(%message, "no slots to offer");
                (Some(message.clone()), message.clone())
            }
        };

        Ok(TaskResult::new_with_status(response, status))
    }
}
