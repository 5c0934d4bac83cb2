//! 实体抽取层：语言分析服务的封装与本地回退
//!
//! 生产实现 GeminiExtractor 失败时确定性地退到 HeuristicAnalyzer，
//! 因此在管道视角下抽取从不失败；trait 仍然可失败，供测试注入故障路径。

pub mod gemini;
pub mod heuristic;

use std::collections::HashMap;

use async_trait::async_trait;

use crate::core::PipelineError;
use crate::model::{EntityType, ExtractedEntity, Recommendation};

pub use gemini::GeminiExtractor;
pub use heuristic::HeuristicAnalyzer;

/// 缺省分析语（上游漏掉 analysis 字段时兜底，保证非空）
pub const FALLBACK_ANALYSIS: &str = "Here are some recommendations based on your interests.";

/// 一次抽取的结果
#[derive(Clone, Debug, Default)]
pub struct Extraction {
    pub entities: Vec<ExtractedEntity>,
    /// 非空的自然语言分析
    pub analysis: String,
    /// 按类型内联的样本推荐：命中的类型可跳过 RecommendationSource 拉取
    pub inline: HashMap<EntityType, Vec<Recommendation>>,
}

/// 实体抽取 trait：输入为调用方已 trim 的非空文本
#[async_trait]
pub trait EntityExtractor: Send + Sync {
    async fn extract(&self, text: &str) -> Result<Extraction, PipelineError>;
}
