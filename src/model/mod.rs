//! 数据模型：消息、实体、推荐记录

pub mod entity;
pub mod message;
pub mod recommendation;

pub use entity::{Entity, EntityType, ExtractedEntity};
pub use message::{Message, Role};
pub use recommendation::Recommendation;
