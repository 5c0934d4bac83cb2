//! TasteSphere - Rust 会话式品味推荐系统
//!
//! 模块划分：
//! - **config**: 应用配置加载（TOML + 环境变量）
//! - **core**: 编排管道、状态投影、错误、主控循环
//! - **extract**: 实体抽取（语言分析服务 + 本地关键词兜底）
//! - **model**: 消息、实体、推荐等领域类型
//! - **recs**: 推荐拉取（品味图谱服务 + 本地样本兜底）
//! - **store**: 对话转录与类型分区的推荐索引
//! - **ui**: Ratatui TUI 界面

pub mod config;
pub mod core;
pub mod extract;
pub mod model;
pub mod recs;
pub mod store;
pub mod ui;
