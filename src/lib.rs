pub mod config;
pub mod error;
pub mod flow;
pub mod models;
pub mod service;
pub mod tasks;
pub mod tools;
pub mod workers;
pub mod workflow;

pub use config::ToolConfig;
pub use error::{FlowError, Result, ToolError};
pub use service::{AppState, create_app};
pub use workflow::{Pipelines, build_pipelines};
