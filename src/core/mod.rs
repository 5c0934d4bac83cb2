//! 核心编排层：错误类型、状态投影、管道状态机、主控循环

pub mod error;
pub mod orchestrator;
pub mod pipeline;
pub mod state;

pub use error::PipelineError;
pub use orchestrator::{create_app, Command};
pub use pipeline::Pipeline;
pub use state::{Phase, UiState};
