//! 界面渲染
//!
//! 根据 UiState 与 input_buffer 绘制：左侧对话区（按角色着色、分析/错误
//! 消息区分样式、按宽度换行），右侧过滤栏 + 当前过滤器下的推荐列表 +
//! 实体分组侧边栏，底部为输入框与快捷键提示。

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState, Wrap},
    Frame,
};

use crate::core::{Phase, UiState};
use crate::model::{Entity, EntityType, Recommendation, Role};
use crate::store::Filter;
use crate::ui::theme::Theme;

/// 单条消息在 UI 中显示的最大字符数，超过折叠避免刷屏
const MAX_DISPLAY_CHARS: usize = 600;

/// 对过长内容做折叠：保留前 N 字 + 省略提示
fn truncate_for_display(content: &str) -> String {
    let chars: Vec<char> = content.chars().collect();
    if chars.len() <= MAX_DISPLAY_CHARS {
        return content.to_string();
    }
    let head: String = chars.iter().take(MAX_DISPLAY_CHARS).collect();
    format!("{}\n... [内容已省略，共 {} 字]", head, chars.len())
}

/// 将内容按宽度换行，按字符数计宽，避免在 UTF-8 中间截断
fn wrap_text(s: &str, width: usize) -> Vec<String> {
    if width == 0 {
        return vec![s.to_string()];
    }
    let mut lines = Vec::new();
    for para in s.split('\n') {
        let mut line = String::new();
        for ch in para.chars() {
            if line.chars().count() >= width {
                lines.push(std::mem::take(&mut line));
            }
            line.push(ch);
        }
        if !line.is_empty() {
            lines.push(line);
        }
    }
    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

/// 绘制一帧：左对话区（标题 + 历史 + 滚动条），右过滤/推荐/实体区，
/// 下方输入区；将 (总行数, 可视高度) 写入 out 供外部 clamp 滚动
pub fn draw(
    f: &mut Frame,
    state: &UiState,
    input_buffer: &str,
    conversation_scroll: usize,
    out: &mut (usize, usize),
    theme: &Theme,
) {
    let input_height = 4u16;
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(5), Constraint::Length(input_height)])
        .split(f.area());

    let main = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(58), Constraint::Percentage(42)])
        .split(chunks[0]);

    let side = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Percentage(60),
            Constraint::Min(4),
        ])
        .split(main[1]);

    draw_conversation(f, state, main[0], conversation_scroll, out, theme);
    draw_filter_bar(f, state, side[0], theme);
    draw_recommendations(f, state, side[1], theme);
    draw_entities(f, state, side[2], theme);
    draw_input(f, state, input_buffer, chunks[1], theme);
}

fn draw_conversation(
    f: &mut Frame,
    state: &UiState,
    area: Rect,
    conversation_scroll: usize,
    out: &mut (usize, usize),
    theme: &Theme,
) {
    let content_width = area.width.saturating_sub(3) as usize; // 边框 + 滚动条

    let phase_str = match state.phase {
        Phase::Idle => "空闲",
        Phase::Submitting => "处理中…",
    };
    let title = format!(" TasteSphere │ {} ", phase_str);
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border()));

    // 每条消息先截断过长内容再按宽度换行，消息之间加空行分隔
    let mut text_lines: Vec<Line> = Vec::new();
    for (idx, m) in state.messages.iter().enumerate() {
        if idx > 0 {
            text_lines.push(Line::from(Span::raw("")));
        }
        let (prefix, color) = match m.role {
            Role::User => ("You ", theme.user()),
            Role::Assistant if m.is_error => ("AI  ", theme.error()),
            Role::Assistant => ("AI  ", theme.assistant()),
        };
        let body_style = if m.is_analysis {
            Style::default().add_modifier(Modifier::ITALIC)
        } else if m.is_error {
            Style::default().fg(theme.error())
        } else {
            Style::default()
        };
        let display_text = truncate_for_display(&m.content);
        let wrapped = wrap_text(&display_text, content_width.max(20));
        for (i, line) in wrapped.into_iter().enumerate() {
            let pref = if i == 0 { prefix } else { "    " };
            text_lines.push(Line::from(vec![
                Span::styled(pref, Style::default().fg(color).add_modifier(Modifier::BOLD)),
                Span::styled(line, body_style),
            ]));
        }
    }

    let content_height = area.height.saturating_sub(2) as usize;
    let total_lines = text_lines.len();
    let max_scroll = total_lines.saturating_sub(content_height);
    let scroll_offset = conversation_scroll.min(max_scroll);

    let inner = block.inner(area);
    let paragraph = Paragraph::new(Text::from(text_lines))
        .block(block)
        .wrap(Wrap { trim: false })
        .scroll((scroll_offset as u16, 0));
    f.render_widget(paragraph, area);

    if total_lines > content_height {
        let mut scrollbar_state = ScrollbarState::new(total_lines)
            .position(scroll_offset)
            .viewport_content_length(content_height);
        let scrollbar = Scrollbar::new(ScrollbarOrientation::VerticalRight)
            .thumb_symbol("█")
            .track_symbol(Some("░"));
        f.render_stateful_widget(scrollbar, inner, &mut scrollbar_state);
    }

    out.0 = total_lines;
    out.1 = content_height;
}

/// 过滤栏：All + 索引现有类型，当前项高亮
fn draw_filter_bar(f: &mut Frame, state: &UiState, area: Rect, theme: &Theme) {
    let mut spans: Vec<Span> = Vec::new();
    let mut push_option = |spans: &mut Vec<Span>, label: String, active: bool| {
        if !spans.is_empty() {
            spans.push(Span::raw(" "));
        }
        let style = if active {
            Style::default()
                .fg(theme.highlight())
                .add_modifier(Modifier::BOLD | Modifier::REVERSED)
        } else {
            Style::default().fg(theme.dim())
        };
        spans.push(Span::styled(format!(" {} ", label), style));
    };

    push_option(&mut spans, Filter::All.label().to_string(), state.filter == Filter::All);
    for kind in &state.kinds {
        push_option(
            &mut spans,
            format!("{} {}", kind.icon(), kind.label()),
            state.filter == Filter::Kind(*kind),
        );
    }

    let block = Block::default()
        .title(" 过滤 ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border()));
    f.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
}

/// 单条推荐的展示行：名称行 + 可选元数据行 + 换行后的描述
fn recommendation_lines(rec: &Recommendation, width: usize, theme: &Theme) -> Vec<Line<'static>> {
    let mut lines = Vec::new();

    let mut headline = format!("{} {}", rec.kind.icon(), rec.name);
    if let Some(year) = rec.year {
        headline.push_str(&format!(" ({})", year));
    }
    if let Some(rating) = rec.rating {
        headline.push_str(&format!(" ★{:.1}", rating));
    }
    lines.push(Line::from(Span::styled(
        headline,
        Style::default().add_modifier(Modifier::BOLD),
    )));

    let meta: Vec<String> = [
        rec.author.as_ref().map(|a| format!("by {}", a)),
        rec.genre.clone(),
        rec.location.clone(),
    ]
    .into_iter()
    .flatten()
    .collect();
    if !meta.is_empty() {
        lines.push(Line::from(Span::styled(
            format!("  {}", meta.join(" · ")),
            Style::default().fg(theme.dim()),
        )));
    }

    if !rec.description.is_empty() {
        for line in wrap_text(&rec.description, width.saturating_sub(2).max(20)) {
            lines.push(Line::from(Span::styled(
                format!("  {}", line),
                Style::default().fg(theme.dim()),
            )));
        }
    }
    lines
}

fn draw_recommendations(f: &mut Frame, state: &UiState, area: Rect, theme: &Theme) {
    let width = area.width.saturating_sub(2) as usize;
    let title = format!(" 推荐 │ {} ({}) ", state.filter.label(), state.visible.len());

    let mut lines: Vec<Line> = Vec::new();
    if state.visible.is_empty() {
        lines.push(Line::from(Span::styled(
            "暂无推荐，先聊聊你的兴趣",
            Style::default().fg(theme.dim()),
        )));
    }
    for (idx, rec) in state.visible.iter().enumerate() {
        if idx > 0 {
            lines.push(Line::from(Span::raw("")));
        }
        lines.extend(recommendation_lines(rec, width, theme));
    }

    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border()));
    f.render_widget(
        Paragraph::new(Text::from(lines)).block(block).wrap(Wrap { trim: false }),
        area,
    );
}

/// 实体侧边栏：最近一次分析语 + 实体按类型分组与条数
fn draw_entities(f: &mut Frame, state: &UiState, area: Rect, theme: &Theme) {
    let width = area.width.saturating_sub(2) as usize;
    let mut lines: Vec<Line> = Vec::new();

    if let Some(analysis) = state.messages.iter().rev().find(|m| m.is_analysis) {
        for line in wrap_text(&analysis.content, width.max(20)) {
            lines.push(Line::from(Span::styled(
                line,
                Style::default().fg(theme.dim()).add_modifier(Modifier::ITALIC),
            )));
        }
        lines.push(Line::from(Span::raw("")));
    }

    let mut groups: Vec<(EntityType, Vec<&Entity>)> = Vec::new();
    for entity in &state.entities {
        match groups.iter_mut().find(|(ty, _)| *ty == entity.kind) {
            Some((_, members)) => members.push(entity),
            None => groups.push((entity.kind, vec![entity])),
        }
    }
    for (kind, members) in groups {
        lines.push(Line::from(Span::styled(
            format!("{} {}", kind.icon(), kind.label()),
            Style::default().add_modifier(Modifier::BOLD),
        )));
        for entity in members {
            lines.push(Line::from(Span::raw(format!(
                "  {} ({})",
                entity.name, entity.count
            ))));
        }
    }

    let block = Block::default()
        .title(" 兴趣实体 ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border()));
    f.render_widget(
        Paragraph::new(Text::from(lines)).block(block).wrap(Wrap { trim: false }),
        area,
    );
}

fn draw_input(f: &mut Frame, state: &UiState, input_buffer: &str, area: Rect, theme: &Theme) {
    let input_prompt = if state.input_locked {
        " 等待回复… "
    } else {
        " 输入 "
    };

    let hint = " Enter 发送 │ ←→ 切换过滤 │ Ctrl+R 重试 │ Ctrl+T 主题 │ Ctrl+L 清空 │ Ctrl+Q 退出 ";
    let input_block = Block::default()
        .title(input_prompt)
        .title_bottom(Line::from(Span::styled(hint, Style::default().fg(theme.dim()))))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border()));

    let input = Paragraph::new(input_buffer)
        .block(input_block)
        .wrap(Wrap { trim: false })
        .style(if state.input_locked {
            Style::default().fg(theme.dim())
        } else {
            Style::default()
        });

    f.render_widget(input, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_text_respects_width_and_utf8() {
        let wrapped = wrap_text("品味推荐系统测试文本", 4);
        assert!(wrapped.iter().all(|l| l.chars().count() <= 4));
        assert_eq!(wrapped.join(""), "品味推荐系统测试文本");
    }

    #[test]
    fn test_truncate_keeps_short_content() {
        assert_eq!(truncate_for_display("short"), "short");
        let long = "x".repeat(700);
        assert!(truncate_for_display(&long).contains("已省略"));
    }
}
