//! Output pane rendering

use crate::dashboard::editor::OutputView;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    widgets::{Block, Borders, List, ListItem, Padding},
    Frame,
};

/// Render the output of the latest completed run
pub fn render_output_pane(frame: &mut Frame, area: Rect, output: &mut OutputView, is_running: bool) {
    let title = match output.report() {
        Some(report) => format!(
            " Output ({} steps, {} ms) ",
            report.steps,
            report.elapsed.as_millis()
        ),
        None => " Output ".to_string(),
    };
    let border_style = if is_running {
        Style::default()
            .fg(DEFAULT_THEME.secondary)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(DEFAULT_THEME.border_normal)
    };
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(border_style)
        .padding(Padding::new(1, 0, 0, 0));

    let text_style = if output.result().is_none() {
        Style::default().fg(DEFAULT_THEME.comment)
    } else if output.is_failure() {
        Style::default()
            .fg(DEFAULT_THEME.error)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(DEFAULT_THEME.fg)
    };

    let lines = output.display_lines();
    let total_items = lines.len();
    let visible_height = area.height.saturating_sub(2).max(1) as usize;

    // Clamp scroll offset only if content exceeds visible area
    let scroll = if total_items > visible_height {
        output.scroll.min(total_items - visible_height)
    } else {
        0
    };

    let visible_items: Vec<ListItem> = lines
        .into_iter()
        .skip(scroll)
        .take(visible_height)
        .map(|line| ListItem::new(line.to_string()).style(text_style))
        .collect();

    output.scroll = scroll;
    frame.render_widget(List::new(visible_items).block(block), area);
}
