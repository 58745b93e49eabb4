use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::config::ToolConfig;
use crate::error::{FlowError, Result};
use crate::flow::{Context, Task, TaskResult};
use crate::models::DoctorSlot;
use crate::tasks::context_keys;
use crate::tools::book_appointment;
use crate::workers::{Capability, ADMIN_ASSISTANT};

/// Single step of the appointment-booking run: confirm the chosen slot
/// against the booking backend.
pub struct AppointmentBookingTask {
    config: Arc<ToolConfig>,
}

impl AppointmentBookingTask {
    pub const ID: &'static str = "appointment_booking";

    pub fn new(config: Arc<ToolConfig>) -> Self {
        Self { config }
    }
}

#[async_trait]
impl Task for AppointmentBookingTask {
    fn id(&self) -> &str {
        Self::ID
    }

    async fn run(&self, context: Context) -> Result<TaskResult> {
        let chosen_slot: DoctorSlot = context
            .get(context_keys::CHOSEN_SLOT)
            .await
            .ok_or_else(|| FlowError::ContextError("chosen_slot not found".to_string()))?;

        let patient_id: String = context
            .get(context_keys::PATIENT_ID)
            .await
            .ok_or_else(|| FlowError::ContextError("patient_id not found".to_string()))?;

        info!(%patient_id, doctor_id = %chosen_slot.doctor_id, "booking appointment");

        ADMIN_ASSISTANT.authorize(Capability::BookAppointment)?;
        let confirmation = book_appointment(&self.config, &chosen_slot, &patient_id).await?;
        context
            .set(context_keys::BOOKING_CONFIRMATION, &confirmation)
            .await;

        Ok(TaskResult::new_with_status(
            Some(confirmation),
            "Appointment booking submitted",
        ))
    }
}
