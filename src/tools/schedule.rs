use crate::models::{CategorizedReport, DoctorSlot, SlotAvailability};

pub const NO_CONSULTATION_NEEDED: &str =
    "The analysis results do not indicate a need for immediate consultation.";
pub const NO_SLOTS_AVAILABLE: &str = "Sorry, no doctor schedules are currently available.";

/// Filter the full doctor schedule down to bookable slots.
///
/// A consultation is only offered when the report needs attention; otherwise
/// the fixed not-needed message is returned regardless of the schedule.
pub fn get_available_appointments(
    report: &CategorizedReport,
    all_doctor_schedules: &[DoctorSlot],
) -> SlotAvailability {
    if !report.needs_attention() {
        return SlotAvailability::Message(NO_CONSULTATION_NEEDED.to_string());
    }

    let available: Vec<DoctorSlot> = all_doctor_schedules
        .iter()
        .filter(|slot| slot.is_available)
        .cloned()
        .collect();

    if available.is_empty() {
        SlotAvailability::Message(NO_SLOTS_AVAILABLE.to_string())
    } else {
        SlotAvailability::Available(available)
    }
}
