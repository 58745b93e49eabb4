use crate::error::FlowError;

/// A tool a worker may invoke.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    AnalyzeImage,
    GenerateReport,
    GenerateNarrative,
    OverallAnalysis,
    FindAppointments,
    BookAppointment,
}

impl Capability {
    pub fn name(self) -> &'static str {
        match self {
            Capability::AnalyzeImage => "analyze_image",
            Capability::GenerateReport => "generate_medical_report",
            Capability::GenerateNarrative => "generate_human_readable_analysis",
            Capability::OverallAnalysis => "generate_overall_health_analysis",
            Capability::FindAppointments => "get_available_appointments",
            Capability::BookAppointment => "book_appointment",
        }
    }
}

/// A role-bound worker: a name, a mandate and the closed set of tools it may
/// use. Workers carry no state; tasks check their capability set before
/// invoking a tool.
#[derive(Debug)]
pub struct Worker {
    pub name: &'static str,
    pub description: &'static str,
    pub capabilities: &'static [Capability],
}

impl Worker {
    pub fn allows(&self, capability: Capability) -> bool {
        self.capabilities.contains(&capability)
    }

    pub fn authorize(&self, capability: Capability) -> Result<(), FlowError> {
        if self.allows(capability) {
            Ok(())
        } else {
            Err(FlowError::CapabilityDenied {
                worker: self.name,
                capability: capability.name(),
            })
        }
    }
}

/// Analyzes microscopy-derived lab data and turns it into a structured,
/// categorized report.
pub static LAB_ANALYST: Worker = Worker {
    name: "lab-analyst",
    description: "Medical laboratory analyst: interprets raw detection data \
                  against clinical thresholds and produces structured reports.",
    capabilities: &[Capability::AnalyzeImage, Capability::GenerateReport],
};

/// Translates technical findings into patient-facing language and correlates
/// lab results with general health data.
pub static MEDICAL_ADVISOR: Worker = Worker {
    name: "medical-advisor",
    description: "Health communicator: writes patient-facing narratives and \
                  correlates lab reports with general health data.",
    capabilities: &[Capability::GenerateNarrative, Capability::OverallAnalysis],
};

/// Handles the consultation scheduling flow end to end.
pub static ADMIN_ASSISTANT: Worker = Worker {
    name: "admin-assistant",
    description: "Administrative assistant: finds available doctor slots and \
                  confirms appointments against the booking backend.",
    capabilities: &[Capability::FindAppointments, Capability::BookAppointment],
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn workers_authorize_their_own_tools() {
        assert!(LAB_ANALYST.authorize(Capability::AnalyzeImage).is_ok());
        assert!(LAB_ANALYST.authorize(Capability::GenerateReport).is_ok());
        assert!(MEDICAL_ADVISOR.authorize(Capability::GenerateNarrative).is_ok());
        assert!(ADMIN_ASSISTANT.authorize(Capability::BookAppointment).is_ok());
    }

    #[test]
    fn out_of_role_tools_are_denied() {
        let denied = LAB_ANALYST.authorize(Capability::BookAppointment);
        match denied {
            Err(FlowError::CapabilityDenied { worker, capability }) => {
                assert_eq!(worker, "lab-analyst");
                assert_eq!(capability, "book_appointment");
            }
            other => panic!("expected capability denial, got {:?}", other.map(|_| ())),
        }
        assert!(MEDICAL_ADVISOR.authorize(Capability::AnalyzeImage).is_err());
        assert!(ADMIN_ASSISTANT.authorize(Capability::GenerateNarrative).is_err());
    }
}
