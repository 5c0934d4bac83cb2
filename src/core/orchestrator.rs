//! 应用编排器：主控循环
//!
//! 负责：加载配置、创建抽取器与推荐源、建立 cmd/state 双通道，并在后台
//! 任务中消费用户命令（Submit/Retry/Clear/SetFilter/Quit）驱动管道、
//! 推送状态快照。命令在单任务内串行消费，天然满足单飞行提交约束。

use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::{mpsc, watch};

use crate::config::{load_config, AppConfig};
use crate::core::{Pipeline, UiState};
use crate::extract::GeminiExtractor;
use crate::recs::QlooClient;
use crate::store::Filter;

/// 从 UI 发往编排器的用户命令
#[derive(Debug, Clone)]
pub enum Command {
    /// 提交用户输入，触发管道运行
    Submit(String),
    /// 针对最近一次提交重试
    Retry,
    /// 清空转录、推荐索引与过滤器
    Clear,
    /// 切换推荐过滤器
    SetFilter(Filter),
    /// 退出应用
    Quit,
}

/// 从配置创建生产管道（真实上游 + 各自的本地兜底）
pub(crate) fn create_pipeline_from_config(cfg: &AppConfig) -> Pipeline {
    let extractor = GeminiExtractor::new(
        &cfg.gemini.base_url,
        &cfg.gemini.model,
        cfg.gemini.timeout_secs,
    );
    let source = QlooClient::new(&cfg.qloo.base_url, cfg.qloo.timeout_secs);
    Pipeline::new(Arc::new(extractor), Arc::new(source)).with_fetch_limit(cfg.app.fetch_limit)
}

/// 创建应用运行时：返回命令发送端与状态接收端；
/// 后台任务消费命令并在每次状态变更后推送快照。
pub async fn create_app(
    config_path: Option<PathBuf>,
) -> anyhow::Result<(mpsc::UnboundedSender<Command>, watch::Receiver<UiState>)> {
    let cfg = load_config(config_path).unwrap_or_else(|e| {
        tracing::warn!("Config load failed ({}), using defaults", e);
        AppConfig::default()
    });

    let mut pipeline = create_pipeline_from_config(&cfg);

    // 双通道：UI -> Core 命令；Core -> UI 状态快照
    let (cmd_tx, mut cmd_rx) = mpsc::unbounded_channel::<Command>();
    let (state_tx, state_rx) = watch::channel(pipeline.snapshot());

    tokio::spawn(async move {
        loop {
            tokio::select! {
                Some(cmd) = cmd_rx.recv() => {
                    match cmd {
                        Command::Submit(text) => {
                            if pipeline.begin_submit(&text) {
                                // 先推 Submitting 快照（含刚追加的用户消息），再解析
                                let _ = state_tx.send(pipeline.snapshot());
                                pipeline.finish().await;
                            }
                            let _ = state_tx.send(pipeline.snapshot());
                        }
                        Command::Retry => {
                            if pipeline.begin_retry() {
                                let _ = state_tx.send(pipeline.snapshot());
                                pipeline.finish().await;
                            }
                            let _ = state_tx.send(pipeline.snapshot());
                        }
                        Command::Clear => {
                            pipeline.clear_all();
                            let _ = state_tx.send(pipeline.snapshot());
                        }
                        Command::SetFilter(filter) => {
                            pipeline.set_filter(filter);
                            let _ = state_tx.send(pipeline.snapshot());
                        }
                        Command::Quit => break,
                    }
                }
                else => break,  // cmd_tx 已关闭，退出循环
            }
        }
    });

    Ok((cmd_tx, state_rx))
}
