//! 管道错误类型
//!
//! 抽取与拉取的生产实现各自内部兜底（启发式分析 / 本地样本），正常情况下
//! 不会让 Err 越过组件边界；这里的错误只在编排层自身出问题时出现，
//! 最终以单条 is_error 消息呈现给用户。

use thiserror::Error;

/// 编排运行中可能出现的错误
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Entity extraction failed: {0}")]
    Extraction(String),

    #[error("Recommendation fetch failed: {0}")]
    Fetch(String),

    #[error("Internal pipeline fault: {0}")]
    Internal(String),
}
