use std::time::Duration;

use serde::Serialize;
use serde_json::Value;
use tracing::info;

use crate::config::ToolConfig;
use crate::error::ToolError;
use crate::models::DoctorSlot;

const BOOKING_SERVICE: &str = "booking backend";
const BOOKING_TIMEOUT: Duration = Duration::from_secs(30);

pub const DEFAULT_CONFIRMATION: &str = "The appointment has been confirmed by the system.";

#[derive(Debug, Serialize)]
pub(crate) struct BookingPayload<'a> {
    patient_id: &'a str,
    doctor_id: &'a str,
    appointment_datetime: String,
}

pub(crate) fn build_booking_payload<'a>(
    chosen_slot: &'a DoctorSlot,
    patient_id: &'a str,
) -> BookingPayload<'a> {
    BookingPayload {
        patient_id,
        doctor_id: &chosen_slot.doctor_id,
        appointment_datetime: format!("{}T{}", chosen_slot.date, chosen_slot.time),
    }
}

/// Submit a booking for the chosen slot and return the backend's
/// confirmation message.
pub async fn book_appointment(
    config: &ToolConfig,
    chosen_slot: &DoctorSlot,
    patient_id: &str,
) -> Result<String, ToolError> {
    let url = config.booking_url()?;
    let payload = build_booking_payload(chosen_slot, patient_id);

    info!(
        patient_id,
        doctor_id = %chosen_slot.doctor_id,
        datetime = %payload.appointment_datetime,
        "submitting appointment booking"
    );

    let response = reqwest::Client::new()
        .post(url)
        .json(&payload)
        .timeout(BOOKING_TIMEOUT)
        .send()
        .await
        .map_err(|source| ToolError::Transport {
            service: BOOKING_SERVICE,
            source,
        })?;

    let status = response.status();
    let body = response.text().await.unwrap_or_default();

    if !status.is_success() {
        return Err(ToolError::UpstreamStatus {
            service: BOOKING_SERVICE,
            status: status.as_u16(),
            body,
        });
    }

    let message = serde_json::from_str::<Value>(&body)
        .ok()
        .and_then(|v| v.get("message").and_then(Value::as_str).map(str::to_string))
        .unwrap_or_else(|| DEFAULT_CONFIRMATION.to_string());

    Ok(message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_slot() -> DoctorSlot {
        serde_json::from_value(json!({
            "doctor_id": "dr-7",
            "date": "2026-09-01",
            "time": "10:30",
            "is_available": true
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn missing_url_fails_before_any_network_call() {
        let config = ToolConfig::default();
        let result = book_appointment(&config, &sample_slot(), "PAT-001").await;
        assert!(matches!(
            result,
            Err(ToolError::MissingConfig("APPOINTMENT_BACKEND_API_URL"))
        ));
    }

    #[test]
    fn payload_combines_date_and_time() {
        let slot = sample_slot();
        let payload = build_booking_payload(&slot, "PAT-001");
        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(value["patient_id"], "PAT-001");
        assert_eq!(value["doctor_id"], "dr-7");
        assert_eq!(value["appointment_datetime"], "2026-09-01T10:30");
    }
}
