use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Semi-quantitative bacteria grading as reported by the CV model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BacteriaLevel {
    None,
    Low,
    Moderate,
    High,
}

/// Semi-quantitative urine protein grading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProteinLevel {
    Negative,
    Trace,
    Moderate,
    High,
}

/// Raw measurements returned by the vision-model endpoint. Quantities the
/// thresholds care about are typed; anything else the model reports is kept
/// in `extra` untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawDetection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub red_blood_cells: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bacteria: Option<BacteriaLevel>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uric_acid_crystals: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protein: Option<ProteinLevel>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

pub const RED_BLOOD_CELL_THRESHOLD: f64 = 10.0;
pub const URIC_ACID_CRYSTAL_THRESHOLD: f64 = 20.0;

/// Clinical conditions the report can flag, with their fixed thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Condition {
    Hematuria,
    Bacteriuria,
    Urolithiasis,
    Proteinuria,
}

impl Condition {
    pub const ALL: [Condition; 4] = [
        Condition::Hematuria,
        Condition::Bacteriuria,
        Condition::Urolithiasis,
        Condition::Proteinuria,
    ];

    /// Key this condition uses in the categorized report's finding map.
    pub fn finding_key(self) -> &'static str {
        match self {
            Condition::Hematuria => "hematuria_finding",
            Condition::Bacteriuria => "bacteriuria_finding",
            Condition::Urolithiasis => "urolithiasis_finding",
            Condition::Proteinuria => "proteinuria_finding",
        }
    }

    pub fn triggered_by(self, raw: &RawDetection) -> bool {
        match self {
            Condition::Hematuria => raw
                .red_blood_cells
                .is_some_and(|count| count > RED_BLOOD_CELL_THRESHOLD),
            Condition::Bacteriuria => raw
                .bacteria
                .is_some_and(|level| level >= BacteriaLevel::Moderate),
            Condition::Urolithiasis => raw
                .uric_acid_crystals
                .is_some_and(|count| count > URIC_ACID_CRYSTAL_THRESHOLD),
            Condition::Proteinuria => raw
                .protein
                .is_some_and(|level| level >= ProteinLevel::Trace),
        }
    }

    /// Evaluate the four fixed thresholds against a raw detection payload.
    pub fn evaluate(raw: &RawDetection) -> Vec<Condition> {
        Self::ALL
            .into_iter()
            .filter(|condition| condition.triggered_by(raw))
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReportStatus {
    #[serde(rename = "Normal")]
    Normal,
    #[serde(rename = "Needs Attention")]
    NeedsAttention,
}

/// Structured diagnostic report derived from a raw detection payload.
///
/// `findings` holds one explanation per flagged condition, keyed by
/// `Condition::finding_key`. Invariant: the status is `NeedsAttention` iff
/// at least one finding is present.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategorizedReport {
    pub status: ReportStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(flatten)]
    pub findings: BTreeMap<String, String>,
}

impl CategorizedReport {
    pub fn needs_attention(&self) -> bool {
        self.status == ReportStatus::NeedsAttention
    }

    /// Check the status/findings invariant.
    pub fn validate(&self) -> Result<(), String> {
        match (self.status, self.findings.is_empty()) {
            (ReportStatus::NeedsAttention, true) => Err(
                "status is 'Needs Attention' but the report carries no findings".to_string(),
            ),
            (ReportStatus::Normal, false) => Err(format!(
                "status is 'Normal' but the report carries findings: {:?}",
                self.findings.keys().collect::<Vec<_>>()
            )),
            _ => Ok(()),
        }
    }
}

/// One doctor-schedule slot, supplied wholesale by the caller. Fields beyond
/// the ones the filter and the booking payload need are preserved in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DoctorSlot {
    pub doctor_id: String,
    pub date: String,
    pub time: String,
    pub is_available: bool,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

/// Outcome of the appointment-slot filter: either the available subset of
/// the schedule or one of the fixed outcome messages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SlotAvailability {
    Available(Vec<DoctorSlot>),
    Message(String),
}

// Request and response bodies for the four endpoints.

fn default_language() -> String {
    "English".to_string()
}

#[derive(Debug, Serialize, Deserialize)]
pub struct OverallAnalysisRequest {
    pub categorized_report: CategorizedReport,
    pub patient_health_data: Value,
    #[serde(default = "default_language")]
    pub language: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AppointmentSearchRequest {
    pub categorized_report: CategorizedReport,
    pub all_doctor_schedules: Vec<DoctorSlot>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AppointmentBookingRequest {
    pub chosen_slot: DoctorSlot,
    pub patient_id: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AnalyzeSampleResponse {
    pub narrative_report: String,
    pub structured_report: CategorizedReport,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw(
        red_blood_cells: Option<f64>,
        bacteria: Option<BacteriaLevel>,
        uric_acid_crystals: Option<f64>,
        protein: Option<ProteinLevel>,
    ) -> RawDetection {
        RawDetection {
            red_blood_cells,
            bacteria,
            uric_acid_crystals,
            protein,
            extra: serde_json::Map::new(),
        }
    }

    #[test]
    fn high_red_cell_count_triggers_hematuria() {
        let conditions = Condition::evaluate(&raw(Some(15.0), None, None, None));
        assert_eq!(conditions, vec![Condition::Hematuria]);
    }

    #[test]
    fn threshold_boundaries_are_exclusive_for_counts() {
        // Exactly at the threshold is still normal for both count rules.
        assert!(Condition::evaluate(&raw(Some(10.0), None, Some(20.0), None)).is_empty());
        assert_eq!(
            Condition::evaluate(&raw(Some(10.1), None, Some(20.1), None)),
            vec![Condition::Hematuria, Condition::Urolithiasis]
        );
    }

    #[test]
    fn bacteria_moderate_or_higher_triggers_bacteriuria() {
        assert!(Condition::evaluate(&raw(None, Some(BacteriaLevel::Low), None, None)).is_empty());
        assert_eq!(
            Condition::evaluate(&raw(None, Some(BacteriaLevel::Moderate), None, None)),
            vec![Condition::Bacteriuria]
        );
        assert_eq!(
            Condition::evaluate(&raw(None, Some(BacteriaLevel::High), None, None)),
            vec![Condition::Bacteriuria]
        );
    }

    #[test]
    fn protein_trace_or_higher_triggers_proteinuria() {
        assert!(
            Condition::evaluate(&raw(None, None, None, Some(ProteinLevel::Negative))).is_empty()
        );
        assert_eq!(
            Condition::evaluate(&raw(None, None, None, Some(ProteinLevel::Trace))),
            vec![Condition::Proteinuria]
        );
    }

    #[test]
    fn clean_sample_triggers_nothing() {
        let conditions = Condition::evaluate(&raw(
            Some(3.0),
            Some(BacteriaLevel::None),
            Some(5.0),
            Some(ProteinLevel::Negative),
        ));
        assert!(conditions.is_empty());
    }

    #[test]
    fn report_invariant_holds_in_both_directions() {
        let normal = CategorizedReport {
            status: ReportStatus::Normal,
            summary: Some("No significant anomalies detected.".to_string()),
            findings: BTreeMap::new(),
        };
        assert!(normal.validate().is_ok());

        let mut findings = BTreeMap::new();
        findings.insert(
            "hematuria_finding".to_string(),
            "Red blood cell count is elevated.".to_string(),
        );
        let flagged = CategorizedReport {
            status: ReportStatus::NeedsAttention,
            summary: None,
            findings,
        };
        assert!(flagged.validate().is_ok());

        let attention_without_findings = CategorizedReport {
            status: ReportStatus::NeedsAttention,
            summary: None,
            findings: BTreeMap::new(),
        };
        assert!(attention_without_findings.validate().is_err());

        let mut findings = BTreeMap::new();
        findings.insert("hematuria_finding".to_string(), "Elevated.".to_string());
        let normal_with_findings = CategorizedReport {
            status: ReportStatus::Normal,
            summary: None,
            findings,
        };
        assert!(normal_with_findings.validate().is_err());
    }

    #[test]
    fn report_serializes_with_flattened_findings() {
        let mut findings = BTreeMap::new();
        findings.insert(
            "bacteriuria_finding".to_string(),
            "Bacteria level is high.".to_string(),
        );
        let report = CategorizedReport {
            status: ReportStatus::NeedsAttention,
            summary: None,
            findings,
        };

        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["status"], "Needs Attention");
        assert_eq!(value["bacteriuria_finding"], "Bacteria level is high.");

        let parsed: CategorizedReport = serde_json::from_value(value).unwrap();
        assert!(parsed.needs_attention());
        assert_eq!(parsed.findings.len(), 1);
    }

    #[test]
    fn doctor_slot_preserves_extra_fields() {
        let slot: DoctorSlot = serde_json::from_value(json!({
            "doctor_id": "dr-7",
            "date": "2026-09-01",
            "time": "10:30",
            "is_available": true,
            "doctor_name": "dr. Ratna",
            "specialty": "urology"
        }))
        .unwrap();

        assert!(slot.is_available);
        assert_eq!(slot.extra["doctor_name"], "dr. Ratna");

        let back = serde_json::to_value(&slot).unwrap();
        assert_eq!(back["specialty"], "urology");
    }

    #[test]
    fn raw_detection_accepts_unknown_quantities() {
        let raw: RawDetection = serde_json::from_value(json!({
            "red_blood_cells": 12.0,
            "bacteria": "high",
            "white_blood_cells": 4.0
        }))
        .unwrap();

        assert_eq!(raw.red_blood_cells, Some(12.0));
        assert_eq!(raw.bacteria, Some(BacteriaLevel::High));
        assert_eq!(raw.extra["white_blood_cells"], 4.0);
    }
}
