//! 实体类型与实体
//!
//! EntityType 是封闭枚举（线上格式 snake_case，如 tv_show）；上游返回未知类型时
//! 由管道丢弃并告警，索引键空间始终限定在这九类之内。

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// 实体类型（与推荐索引的键一一对应）
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    Movie,
    Book,
    Artist,
    TvShow,
    Podcast,
    Place,
    Brand,
    Person,
    Destination,
}

impl EntityType {
    pub const ALL: [EntityType; 9] = [
        EntityType::Movie,
        EntityType::Book,
        EntityType::Artist,
        EntityType::TvShow,
        EntityType::Podcast,
        EntityType::Place,
        EntityType::Brand,
        EntityType::Person,
        EntityType::Destination,
    ];

    /// 线上格式（Qloo 的 urn:entity:{} 与 Gemini 的 type 字段均用此形式）
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityType::Movie => "movie",
            EntityType::Book => "book",
            EntityType::Artist => "artist",
            EntityType::TvShow => "tv_show",
            EntityType::Podcast => "podcast",
            EntityType::Place => "place",
            EntityType::Brand => "brand",
            EntityType::Person => "person",
            EntityType::Destination => "destination",
        }
    }

    /// 展示标签
    pub fn label(&self) -> &'static str {
        match self {
            EntityType::Movie => "Movies",
            EntityType::Book => "Books",
            EntityType::Artist => "Artists",
            EntityType::TvShow => "TV Shows",
            EntityType::Podcast => "Podcasts",
            EntityType::Place => "Places",
            EntityType::Brand => "Brands",
            EntityType::Person => "People",
            EntityType::Destination => "Destinations",
        }
    }

    /// 展示图标
    pub fn icon(&self) -> &'static str {
        match self {
            EntityType::Movie => "🎬",
            EntityType::Book => "📚",
            EntityType::Artist => "🎤",
            EntityType::TvShow => "📺",
            EntityType::Podcast => "🎧",
            EntityType::Place => "📍",
            EntityType::Brand => "🏷",
            EntityType::Person => "👤",
            EntityType::Destination => "✈",
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "movie" => Ok(EntityType::Movie),
            "book" => Ok(EntityType::Book),
            "artist" => Ok(EntityType::Artist),
            "tv_show" => Ok(EntityType::TvShow),
            "podcast" => Ok(EntityType::Podcast),
            "place" => Ok(EntityType::Place),
            "brand" => Ok(EntityType::Brand),
            "person" => Ok(EntityType::Person),
            "destination" => Ok(EntityType::Destination),
            other => Err(format!("unknown entity type: {other}")),
        }
    }
}

/// 抽取服务返回的最小实体（type + name）
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedEntity {
    #[serde(rename = "type")]
    pub kind: EntityType,
    pub name: String,
}

/// 管道处理后的实体：附带本轮为其产出的推荐条数（派生值）
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    pub kind: EntityType,
    pub name: String,
    pub count: usize,
}
