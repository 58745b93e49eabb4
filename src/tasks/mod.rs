pub mod appointment_booking;
pub mod appointment_search;
pub mod lab_analysis;
pub mod narrative_reporting;
pub mod overall_review;

pub use appointment_booking::AppointmentBookingTask;
pub use appointment_search::AppointmentSearchTask;
pub use lab_analysis::LabAnalysisTask;
pub use narrative_reporting::NarrativeReportingTask;
pub use overall_review::OverallReviewTask;

/// Names of the context slots tasks read from and write to. Each task
/// declares its inputs and outputs through these keys; the handlers seed
/// the request fields and read the terminal outputs back.
pub mod context_keys {
    pub const IMAGE_PATH: &str = "image_path";
    pub const LANGUAGE: &str = "language";
    pub const RAW_DETECTION: &str = "raw_detection";
    pub const CATEGORIZED_REPORT: &str = "categorized_report";
    pub const NARRATIVE_REPORT: &str = "narrative_report";
    pub const PATIENT_HEALTH_DATA: &str = "patient_health_data";
    pub const OVERALL_ANALYSIS: &str = "overall_analysis";
    pub const ALL_DOCTOR_SCHEDULES: &str = "all_doctor_schedules";
    pub const AVAILABLE_SLOTS: &str = "available_slots";
    pub const CHOSEN_SLOT: &str = "chosen_slot";
    pub const PATIENT_ID: &str = "patient_id";
    pub const BOOKING_CONFIRMATION: &str = "booking_confirmation";
}
