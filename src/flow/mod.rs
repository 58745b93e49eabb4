//! Minimal sequential pipeline layer: an ordered list of tasks sharing a
//! request-scoped [`Context`]. Each run is linear; the first task failure
//! aborts the run and is propagated to the caller.

pub mod context;
pub mod pipeline;
pub mod task;

pub use context::Context;
pub use pipeline::{Pipeline, PipelineBuilder};
pub use task::{Task, TaskResult};
