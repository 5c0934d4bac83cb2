//! 状态定义：管道阶段与 UiState 投影
//!
//! UI 只持有轻量的 UiState 快照（阶段、转录、实体、可见推荐、过滤器）；
//! 完整状态由 Pipeline 维护并按需投影。

use serde::Serialize;

use crate::model::{Entity, EntityType, Message, Recommendation};
use crate::store::Filter;

/// 管道阶段：Idle 既是初始态也是静止态，Submitting 同时只允许一个
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub enum Phase {
    #[default]
    Idle,
    Submitting,
}

/// UI 看到的「投影」状态，轻量且易于渲染
#[derive(Clone, Debug, Default, Serialize)]
pub struct UiState {
    pub phase: Phase,
    /// 完整转录（含分析与错误消息）
    pub messages: Vec<Message>,
    /// 本轮实体集（侧边栏分组展示）
    pub entities: Vec<Entity>,
    /// 索引现有的类型键，按首次插入顺序（过滤栏展示用）
    pub kinds: Vec<EntityType>,
    /// 当前过滤器下可见的推荐列表
    pub visible: Vec<Recommendation>,
    pub filter: Filter,
    /// Submitting 期间锁定输入框
    pub input_locked: bool,
}

impl UiState {
    pub fn is_busy(&self) -> bool {
        self.phase == Phase::Submitting
    }
}
