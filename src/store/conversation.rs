//! 对话转录存储
//!
//! 正常运行下只追加；唯一的结构性变更是重试触发的「移除末条助手消息」，
//! 且永远只移除最后一个元素。id 在入库时分配，store 内单调递增。

use crate::model::{Message, Role};

/// 有序转录存储
#[derive(Clone, Debug, Default)]
pub struct ConversationStore {
    messages: Vec<Message>,
    next_id: u64,
}

impl ConversationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 追加消息并分配 id，返回分配到的 id
    pub fn push(&mut self, mut msg: Message) -> u64 {
        self.next_id += 1;
        msg.id = self.next_id;
        let id = msg.id;
        self.messages.push(msg);
        id
    }

    /// 移除并返回末条消息；store 为空时为 no-op
    pub fn remove_last(&mut self) -> Option<Message> {
        self.messages.pop()
    }

    /// 末条消息是否为助手消息（重试前的裁剪判定）
    pub fn last_is_assistant(&self) -> bool {
        matches!(self.messages.last(), Some(m) if m.role == Role::Assistant)
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    /// 最近一条实体分析消息（侧边栏展示用）
    pub fn latest_analysis(&self) -> Option<&Message> {
        self.messages.iter().rev().find(|m| m.is_analysis)
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}
