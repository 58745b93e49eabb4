use crate::error::ToolError;

/// Endpoint URLs for the external backends, loaded from the environment once
/// at startup. A missing URL is not a startup error: the original contract is
/// that the affected adapter reports the gap when it is actually invoked.
#[derive(Debug, Clone, Default)]
pub struct ToolConfig {
    pub cv_model_url: Option<String>,
    pub booking_url: Option<String>,
}

impl ToolConfig {
    pub fn from_env() -> Self {
        Self {
            cv_model_url: std::env::var("CV_MODEL_API_URL").ok(),
            booking_url: std::env::var("APPOINTMENT_BACKEND_API_URL").ok(),
        }
    }

    pub fn cv_model_url(&self) -> Result<&str, ToolError> {
        self.cv_model_url
            .as_deref()
            .ok_or(ToolError::MissingConfig("CV_MODEL_API_URL"))
    }

    pub fn booking_url(&self) -> Result<&str, ToolError> {
        self.booking_url
            .as_deref()
            .ok_or(ToolError::MissingConfig("APPOINTMENT_BACKEND_API_URL"))
    }
}
