//! 推荐拉取层：品味图谱服务的封装与本地样本回退
//!
//! 生产实现 QlooClient 对每种实体类型独立拉取，失败时退到本地样本表，
//! 管道视角下单类型拉取从不失败；trait 仍然可失败，供测试注入故障路径。

pub mod qloo;
pub mod samples;

use async_trait::async_trait;

use crate::core::PipelineError;
use crate::model::{EntityType, Recommendation};

pub use qloo::QlooClient;
pub use samples::SampleSource;

/// 单一实体类型的推荐拉取 trait
#[async_trait]
pub trait RecommendationSource: Send + Sync {
    async fn fetch(
        &self,
        kind: EntityType,
        limit: usize,
    ) -> Result<Vec<Recommendation>, PipelineError>;
}
