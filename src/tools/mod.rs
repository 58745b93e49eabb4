pub mod booking;
pub mod llm;
pub mod narrative;
pub mod overall;
pub mod report;
pub mod schedule;
pub mod vision;

pub use booking::book_appointment;
pub use narrative::generate_human_readable_analysis;
pub use overall::generate_overall_health_analysis;
pub use report::generate_medical_report;
pub use schedule::get_available_appointments;
pub use vision::analyze_image;
