//! Product header and tab bar

use crate::dashboard::Tab;
use crate::fixtures::{PRODUCT_NAME, TAGLINE};
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Tabs},
    Frame,
};

/// Render the two-row header: product line, then the F1-F4 tab bar
pub fn render_header(frame: &mut Frame, area: Rect, active: Tab) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(2)])
        .split(area);

    let title = Line::from(vec![
        Span::styled(
            " ◆ ",
            Style::default()
                .bg(DEFAULT_THEME.primary)
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!(" {} ", PRODUCT_NAME),
            Style::default()
                .fg(DEFAULT_THEME.primary)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(TAGLINE, Style::default().fg(DEFAULT_THEME.comment)),
    ]);
    frame.render_widget(Paragraph::new(title), rows[0]);

    let titles: Vec<Line> = Tab::ALL
        .iter()
        .map(|tab| {
            Line::from(vec![
                Span::styled(
                    format!("F{} ", tab.index() + 1),
                    Style::default().fg(DEFAULT_THEME.comment),
                ),
                Span::raw(tab.title()),
            ])
        })
        .collect();

    let tabs = Tabs::new(titles)
        .select(active.index())
        .block(
            Block::default()
                .borders(Borders::BOTTOM)
                .border_style(Style::default().fg(DEFAULT_THEME.border_normal)),
        )
        .style(Style::default().fg(DEFAULT_THEME.fg))
        .highlight_style(
            Style::default()
                .fg(DEFAULT_THEME.border_focused)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
        )
        .divider(Span::styled("│", Style::default().fg(DEFAULT_THEME.comment)));
    frame.render_widget(tabs, rows[1]);
}
