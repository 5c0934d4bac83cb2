//! 聊天消息：转录条目
//!
//! id 由 ConversationStore 追加时分配（单调递增）；timestamp 在创建时以 RFC 3339 格式化，
//! 直接用于展示。is_analysis 标记「实体分析」类助手消息，is_error 标记失败通知。

use serde::{Deserialize, Serialize};

/// 消息角色
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    User,
    Assistant,
}

/// 单条转录消息
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Message {
    /// 由 ConversationStore 分配，store 内唯一且单调递增；入库前为 0
    pub id: u64,
    pub role: Role,
    pub content: String,
    /// 创建时刻，RFC 3339 字符串（展示用）
    pub timestamp: String,
    #[serde(default)]
    pub is_analysis: bool,
    #[serde(default)]
    pub is_error: bool,
}

impl Message {
    fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            id: 0,
            role,
            content: content.into(),
            timestamp: chrono::Utc::now().to_rfc3339(),
            is_analysis: false,
            is_error: false,
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }

    /// 助手的实体分析消息（每次成功运行恰好一条）
    pub fn analysis(content: impl Into<String>) -> Self {
        let mut msg = Self::new(Role::Assistant, content);
        msg.is_analysis = true;
        msg
    }

    /// 助手的失败通知消息
    pub fn error(content: impl Into<String>) -> Self {
        let mut msg = Self::new(Role::Assistant, content);
        msg.is_error = true;
        msg
    }
}
