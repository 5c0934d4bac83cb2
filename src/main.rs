//! TasteSphere - Rust 会话式品味推荐系统
//!
//! 入口：初始化日志、解析主题偏好、创建编排器与 TUI，并运行主循环。

use std::path::Path;

use anyhow::Context;
use tastesphere::config::load_config;
use tastesphere::core::create_app;
use tastesphere::ui::theme::{self, Theme};
use tastesphere::ui::run_app;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 日志：默认 info，可通过 RUST_LOG 覆盖
    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive("info".parse().unwrap()))
        .with(fmt::layer())
        .init();

    // 主题：持久化偏好优先，其次 config 的 [ui].theme
    let cfg = load_config(None).unwrap_or_default();
    let initial_theme = theme::load_preference(Path::new(theme::THEME_FILE))
        .map(Theme::new)
        .unwrap_or_else(|| Theme::from_name(&cfg.ui.theme));

    // 创建编排器：返回命令发送端与状态接收端
    let (cmd_tx, state_rx) = create_app(None).await.context("Failed to create app")?;

    // 启动 TUI 主循环（消费 state，向 cmd_tx 发送用户指令）
    run_app(state_rx, cmd_tx, initial_theme)
        .await
        .context("App run failed")?;

    Ok(())
}
