//! 编排管道：单次提交的状态机
//!
//! Idle/Submitting 两态。一次运行分两段：begin_*（同步前奏，设置
//! Submitting 守卫并完成转录前置写入）与 finish（异步解析，抽取、并发
//! 拉取、join 汇合后一次性落盘共享状态，最后无条件回到 Idle）。
//! 运行中的第二次提交被静默忽略，不排队。

use std::sync::Arc;

use futures_util::future::join_all;
use tracing::Instrument;
use uuid::Uuid;

use crate::core::{Phase, PipelineError, UiState};
use crate::extract::EntityExtractor;
use crate::model::{Entity, Message};
use crate::recs::RecommendationSource;
use crate::store::{ConversationStore, Filter, RecommendationIndex};

/// 单类型拉取的固定条数上限
pub const DEFAULT_FETCH_LIMIT: usize = 5;

/// 管道内部故障时呈现给用户的唯一文案
pub const ERROR_MESSAGE: &str =
    "Sorry, I encountered an error while processing your request. Please try again.";

/// 编排管道：独占持有转录、索引与过滤器的写权
pub struct Pipeline {
    extractor: Arc<dyn EntityExtractor>,
    source: Arc<dyn RecommendationSource>,
    conversation: ConversationStore,
    index: RecommendationIndex,
    filter: Filter,
    phase: Phase,
    /// 最近一次被接受的用户提交原文（重试的显式依据，不反扫历史）
    last_submission: Option<String>,
    /// begin_* 与 finish 之间待解析的文本
    pending: Option<String>,
    fetch_limit: usize,
}

impl Pipeline {
    pub fn new(
        extractor: Arc<dyn EntityExtractor>,
        source: Arc<dyn RecommendationSource>,
    ) -> Self {
        Self {
            extractor,
            source,
            conversation: ConversationStore::new(),
            index: RecommendationIndex::new(),
            filter: Filter::All,
            phase: Phase::Idle,
            last_submission: None,
            pending: None,
            fetch_limit: DEFAULT_FETCH_LIMIT,
        }
    }

    pub fn with_fetch_limit(mut self, limit: usize) -> Self {
        self.fetch_limit = limit.max(1);
        self
    }

    /// 提交一段用户输入并运行到完成
    pub async fn submit(&mut self, text: &str) {
        if self.begin_submit(text) {
            self.finish().await;
        }
    }

    /// 针对最近一次提交重试，丢弃恰好一条末尾助手消息
    pub async fn retry(&mut self) {
        if self.begin_retry() {
            self.finish().await;
        }
    }

    /// 提交的同步前奏：守卫与空输入校验、立即追加用户消息。
    /// 返回 true 表示已进入 Submitting，调用方必须随后 await finish。
    pub fn begin_submit(&mut self, text: &str) -> bool {
        if self.phase == Phase::Submitting {
            tracing::debug!("submission ignored, another run is in flight");
            return false;
        }
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return false;
        }

        self.phase = Phase::Submitting;
        self.conversation.push(Message::user(trimmed));
        self.last_submission = Some(trimmed.to_string());
        self.pending = Some(trimmed.to_string());
        true
    }

    /// 重试的同步前奏：复用存储的上次提交，不追加新用户消息；
    /// 末条消息为助手消息时移除它（仅此一条）
    pub fn begin_retry(&mut self) -> bool {
        if self.phase == Phase::Submitting {
            tracing::debug!("retry ignored, another run is in flight");
            return false;
        }
        let Some(text) = self.last_submission.clone() else {
            tracing::debug!("retry ignored, nothing was submitted yet");
            return false;
        };

        self.phase = Phase::Submitting;
        if self.conversation.last_is_assistant() {
            self.conversation.remove_last();
        }
        self.pending = Some(text);
        true
    }

    /// 异步解析段：抽取、并发拉取并 join、一次性写入共享状态。
    /// 无论成败都回到 Idle；begin_* 未成功时为 no-op。
    pub async fn finish(&mut self) {
        let Some(text) = self.pending.take() else {
            return;
        };

        let run_id = Uuid::new_v4();
        let span = tracing::info_span!("pipeline_run", %run_id);
        let result = self.resolve(&text).instrument(span).await;

        if let Err(e) = result {
            tracing::error!(%run_id, error = %e, "pipeline run failed");
            self.conversation.push(Message::error(ERROR_MESSAGE));
        }
        self.phase = Phase::Idle;
    }

    /// 步骤 4-8：失败时索引与过滤器保持运行前的值
    async fn resolve(&mut self, text: &str) -> Result<(), PipelineError> {
        let extraction = self.extractor.extract(text).await?;
        tracing::info!(entities = extraction.entities.len(), "extraction complete");

        // 每个实体独立解析：有内联样本直接用，否则并发拉取；
        // join 汇合后才允许触碰共享状态
        let source = Arc::clone(&self.source);
        let limit = self.fetch_limit;
        let resolutions = join_all(extraction.entities.iter().map(|entity| {
            let inline = extraction.inline.get(&entity.kind).cloned();
            let source = Arc::clone(&source);
            async move {
                match inline {
                    Some(recs) => Ok(recs),
                    None => source.fetch(entity.kind, limit).await,
                }
            }
        }))
        .await;

        let mut resolved = Vec::with_capacity(extraction.entities.len());
        for (entity, recs) in extraction.entities.iter().zip(resolutions) {
            resolved.push((entity.clone(), recs?));
        }

        self.conversation.push(Message::analysis(extraction.analysis));

        // 同类型后者覆盖前者；实体集整体替换
        let mut entities = Vec::with_capacity(resolved.len());
        for (entity, recs) in resolved {
            let count = recs.len();
            self.index.insert(entity.kind, recs);
            entities.push(Entity {
                kind: entity.kind,
                name: entity.name,
                count,
            });
        }
        let processed = entities.len();
        self.index.set_entities(entities);

        if processed > 0 {
            self.conversation.push(Message::assistant(format!(
                "I found {} categories of recommendations for you!",
                processed
            )));
            // 仅在过滤器仍为 All 时跟随首个实体类型，不覆盖用户已选
            if self.filter == Filter::All {
                if let Some(first) = self.index.entities().first() {
                    self.filter = Filter::Kind(first.kind);
                }
            }
        }
        Ok(())
    }

    /// 协同重置：转录、索引、过滤器一起清空，不允许单独清某一项
    pub fn clear_all(&mut self) {
        self.conversation.clear();
        self.index.clear();
        self.filter = Filter::All;
        self.last_submission = None;
    }

    pub fn set_filter(&mut self, filter: Filter) {
        self.filter = filter;
    }

    pub fn filter(&self) -> Filter {
        self.filter
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn conversation(&self) -> &ConversationStore {
        &self.conversation
    }

    pub fn index(&self) -> &RecommendationIndex {
        &self.index
    }

    /// 当前状态的 UI 投影
    pub fn snapshot(&self) -> UiState {
        UiState {
            phase: self.phase,
            messages: self.conversation.messages().to_vec(),
            entities: self.index.entities().to_vec(),
            kinds: self.index.lists().map(|(ty, _)| ty).collect(),
            visible: self.index.select_visible(self.filter),
            filter: self.filter,
            input_locked: self.phase == Phase::Submitting,
        }
    }
}
