//! 状态存储：对话转录、推荐索引与过滤器

pub mod conversation;
pub mod index;

pub use conversation::ConversationStore;
pub use index::{Filter, RecommendationIndex};
