use thiserror::Error;

/// Failures produced at the tool-adapter boundary.
///
/// Every external call site (vision endpoint, booking backend, LLM
/// completion) maps its failure modes onto one of these variants instead of
/// smuggling error text inside success-shaped payloads.
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("{0} is not configured")]
    MissingConfig(&'static str),

    #[error("image file not found at path: {0}")]
    FileNotFound(String),

    #[error("request to {service} failed: {source}")]
    Transport {
        service: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("{service} returned status {status}: {body}")]
    UpstreamStatus {
        service: &'static str,
        status: u16,
        body: String,
    },

    #[error("LLM completion failed: {0}")]
    Completion(String),

    /// The model reply could not be parsed as JSON. Carries the raw text so
    /// it can be surfaced to the caller for inspection.
    #[error("model reply was not valid JSON: {message}")]
    MalformedReply { message: String, raw: String },

    /// The model produced parseable JSON that contradicts the clinical
    /// thresholds or the status/findings invariant.
    #[error("categorized report failed validation: {0}")]
    InvalidReport(String),
}

/// Failures in the pipeline layer itself.
#[derive(Debug, Error)]
pub enum FlowError {
    #[error("task not found: {0}")]
    TaskNotFound(String),

    #[error("context value missing: {0}")]
    ContextError(String),

    #[error("worker '{worker}' is not allowed to use {capability}")]
    CapabilityDenied {
        worker: &'static str,
        capability: &'static str,
    },

    #[error(transparent)]
    Tool(#[from] ToolError),
}

pub type Result<T> = std::result::Result<T, FlowError>;
