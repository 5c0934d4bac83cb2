//! TUI 应用主循环
//!
//! 进入全屏/原始模式，轮询 state_rx 与键盘事件，将用户输入与快捷键转为
//! Command 发送给编排器，每帧用 draw 渲染 UiState 与输入缓冲。
//! 主题偏好在切换时写回 config/theme.toml。

use std::io::{self, Stdout};
use std::path::Path;

use crossterm::event::KeyCode;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::sync::watch;

use crate::core::{Command, UiState};
use crate::store::Filter;
use crate::ui::event::{AppEvent, EventHandler};
use crate::ui::render::draw;
use crate::ui::theme::{self, Theme};

/// 过滤器循环顺序：All 在前，其后是索引现有类型（首次插入顺序）
fn filter_options(state: &UiState) -> Vec<Filter> {
    let mut options = vec![Filter::All];
    options.extend(state.kinds.iter().map(|k| Filter::Kind(*k)));
    options
}

/// 当前过滤器在循环中的相邻项；next 为 false 时取前一项
fn adjacent_filter(state: &UiState, next: bool) -> Filter {
    let options = filter_options(state);
    let pos = options.iter().position(|f| *f == state.filter).unwrap_or(0);
    let idx = if next {
        (pos + 1) % options.len()
    } else {
        (pos + options.len() - 1) % options.len()
    };
    options[idx]
}

/// 运行 TUI：启用原始模式与全屏，循环 poll 事件 + 渲染，退出时恢复终端
pub async fn run_app(
    state_rx: watch::Receiver<UiState>,
    cmd_tx: tokio::sync::mpsc::UnboundedSender<Command>,
    initial_theme: Theme,
) -> anyhow::Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let event_handler = EventHandler::new(cmd_tx);
    let mut current_theme = initial_theme;
    let mut input_buffer = String::new();
    let mut conversation_scroll = 0usize;
    let mut last_message_count = 0usize;

    loop {
        let state = state_rx.borrow().clone();

        // 新消息到达时滚到底部
        if state.messages.len() != last_message_count {
            last_message_count = state.messages.len();
            conversation_scroll = usize::MAX;
        }

        if let Ok(Some(ev)) = event_handler.poll() {
            match ev {
                AppEvent::Command(cmd) => {
                    if matches!(cmd, Command::Quit) {
                        break;
                    }
                }
                AppEvent::ToggleTheme => {
                    current_theme.toggle();
                    if let Err(e) =
                        theme::save_preference(Path::new(theme::THEME_FILE), current_theme.mode)
                    {
                        tracing::warn!(error = %e, "theme preference not persisted");
                    }
                }
                AppEvent::Key(key) if !state.input_locked => match key.code {
                    KeyCode::Enter => {
                        let input = input_buffer.trim().to_string();
                        input_buffer.clear();
                        if !input.is_empty() {
                            if matches!(
                                input.to_lowercase().as_str(),
                                "/exit" | "exit" | "/quit" | "quit"
                            ) {
                                break;
                            }
                            event_handler.send_submit(input);
                        }
                    }
                    KeyCode::Backspace => {
                        input_buffer.pop();
                    }
                    KeyCode::Char(c) => {
                        input_buffer.push(c);
                    }
                    KeyCode::Left => {
                        event_handler.send_filter(adjacent_filter(&state, false));
                    }
                    KeyCode::Right => {
                        event_handler.send_filter(adjacent_filter(&state, true));
                    }
                    KeyCode::Up => {
                        conversation_scroll = conversation_scroll.saturating_sub(1);
                    }
                    KeyCode::Down => {
                        conversation_scroll = conversation_scroll.saturating_add(1);
                    }
                    KeyCode::PageUp => {
                        conversation_scroll = conversation_scroll.saturating_sub(10);
                    }
                    KeyCode::PageDown => {
                        conversation_scroll = conversation_scroll.saturating_add(10);
                    }
                    KeyCode::Home => {
                        conversation_scroll = 0;
                    }
                    KeyCode::End => {
                        conversation_scroll = usize::MAX;
                    }
                    _ => {}
                },
                _ => {}
            }
        }

        let mut scroll_info = (0usize, 0usize);
        terminal.draw(|f| {
            draw(
                f,
                &state,
                &input_buffer,
                conversation_scroll,
                &mut scroll_info,
                &current_theme,
            );
        })?;
        let (total_lines, viewport_height) = scroll_info;
        let max_scroll = total_lines.saturating_sub(viewport_height);
        conversation_scroll = conversation_scroll.min(max_scroll);

        tokio::task::yield_now().await;
    }

    restore_terminal(&mut terminal)?;
    Ok(())
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> anyhow::Result<()> {
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::EntityType;

    fn state_with_kinds(kinds: Vec<EntityType>, filter: Filter) -> UiState {
        UiState {
            kinds,
            filter,
            ..UiState::default()
        }
    }

    #[test]
    fn test_filter_cycle_wraps_both_ways() {
        let state = state_with_kinds(
            vec![EntityType::Movie, EntityType::Book],
            Filter::All,
        );
        assert_eq!(adjacent_filter(&state, true), Filter::Kind(EntityType::Movie));
        assert_eq!(adjacent_filter(&state, false), Filter::Kind(EntityType::Book));

        let at_end = state_with_kinds(
            vec![EntityType::Movie, EntityType::Book],
            Filter::Kind(EntityType::Book),
        );
        assert_eq!(adjacent_filter(&at_end, true), Filter::All);
    }

    #[test]
    fn test_filter_cycle_with_empty_index_stays_all() {
        let state = state_with_kinds(vec![], Filter::All);
        assert_eq!(adjacent_filter(&state, true), Filter::All);
        assert_eq!(adjacent_filter(&state, false), Filter::All);
    }
}
