//! 推荐记录
//!
//! 可选字段（author/genre/location/rating/year/image_url）显式建模，
//! 不做动态字段探测。kind 必须与其在索引中所属的键一致。

use serde::{Deserialize, Serialize};

use crate::model::EntityType;

/// 单条推荐
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    /// 上游提供时保留，本地样本数据亦有稳定 id
    pub id: Option<String>,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: EntityType,
    #[serde(default)]
    pub description: String,
    pub rating: Option<f64>,
    pub year: Option<i32>,
    pub author: Option<String>,
    pub genre: Option<String>,
    pub location: Option<String>,
    pub image_url: Option<String>,
}

impl Recommendation {
    /// 最小构造：仅 name 与 kind，可选字段用链式 setter 填充（样本表与测试用）
    pub fn new(name: impl Into<String>, kind: EntityType) -> Self {
        Self {
            id: None,
            name: name.into(),
            kind,
            description: String::new(),
            rating: None,
            year: None,
            author: None,
            genre: None,
            location: None,
            image_url: None,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_rating(mut self, rating: f64) -> Self {
        self.rating = Some(rating);
        self
    }

    pub fn with_year(mut self, year: i32) -> Self {
        self.year = Some(year);
        self
    }

    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    pub fn with_genre(mut self, genre: impl Into<String>) -> Self {
        self.genre = Some(genre.into());
        self
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn with_image_url(mut self, image_url: impl Into<String>) -> Self {
        self.image_url = Some(image_url.into());
        self
    }
}
