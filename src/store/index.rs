//! 推荐索引与过滤器
//!
//! 索引按键的首次插入顺序排列（All 视图的拼接顺序即此顺序）。一次成功运行
//! 只覆盖本轮处理到的类型，未触及的键保留；实体集则整体替换。空列表是合法值，
//! 与「键不存在」是两种不同状态。

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::model::{Entity, EntityType, Recommendation};

/// 当前生效的过滤器：全部或单一实体类型
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Filter {
    #[default]
    All,
    Kind(EntityType),
}

impl Filter {
    pub fn label(&self) -> &'static str {
        match self {
            Filter::All => "All Types",
            Filter::Kind(ty) => ty.label(),
        }
    }
}

/// 类型分区的推荐索引 + 本轮实体集
#[derive(Clone, Debug, Default)]
pub struct RecommendationIndex {
    /// 键的首次插入顺序
    order: Vec<EntityType>,
    lists: HashMap<EntityType, Vec<Recommendation>>,
    entities: Vec<Entity>,
}

impl RecommendationIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// 覆盖某类型的推荐列表（不与历史合并）；新键追加到顺序末尾
    pub fn insert(&mut self, kind: EntityType, recs: Vec<Recommendation>) {
        if !self.lists.contains_key(&kind) {
            self.order.push(kind);
        }
        self.lists.insert(kind, recs);
    }

    /// 整体替换实体集（每轮成功运行一次）
    pub fn set_entities(&mut self, entities: Vec<Entity>) {
        self.entities = entities;
    }

    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    /// 按首次插入顺序返回 (类型, 列表) 对
    pub fn lists(&self) -> impl Iterator<Item = (EntityType, &[Recommendation])> {
        self.order
            .iter()
            .filter_map(|ty| self.lists.get(ty).map(|recs| (*ty, recs.as_slice())))
    }

    pub fn get(&self, kind: EntityType) -> Option<&[Recommendation]> {
        self.lists.get(&kind).map(Vec::as_slice)
    }

    /// 读取契约：All = 按键插入顺序拼接全部列表；单类型 = 该键列表或空。
    /// 纯函数，可在渲染期间反复调用。
    pub fn select_visible(&self, filter: Filter) -> Vec<Recommendation> {
        match filter {
            Filter::All => self
                .order
                .iter()
                .filter_map(|ty| self.lists.get(ty))
                .flatten()
                .cloned()
                .collect(),
            Filter::Kind(ty) => self.lists.get(&ty).cloned().unwrap_or_default(),
        }
    }

    /// 实体按类型分组（类型首见顺序），侧边栏展示用
    pub fn entity_groups(&self) -> Vec<(EntityType, Vec<&Entity>)> {
        let mut groups: Vec<(EntityType, Vec<&Entity>)> = Vec::new();
        for entity in &self.entities {
            match groups.iter_mut().find(|(ty, _)| *ty == entity.kind) {
                Some((_, members)) => members.push(entity),
                None => groups.push((entity.kind, vec![entity])),
            }
        }
        groups
    }

    pub fn is_empty(&self) -> bool {
        self.lists.is_empty()
    }

    pub fn clear(&mut self) {
        self.order.clear();
        self.lists.clear();
        self.entities.clear();
    }
}
