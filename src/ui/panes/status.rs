//! Status bar rendering with keybindings and state indicators

use crate::dashboard::Tab;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

/// Key hints for the right side of the bar, per tab
fn key_hints(tab: Tab) -> &'static [(&'static str, &'static str)] {
    match tab {
        Tab::Editor => &[
            ("^R", "run"),
            ("Esc", "cancel"),
            ("^L", "reset"),
            ("^↑/↓", "scroll output"),
            ("^Q", "quit"),
        ],
        Tab::Analysis => &[("a", "analyze"), ("F1-F4", "tabs"), ("q", "quit")],
        Tab::Tutorials => &[
            ("↑/↓", "select"),
            ("p", "practice"),
            ("F1-F4", "tabs"),
            ("q", "quit"),
        ],
        Tab::Exercises => &[
            ("1-3/d", "level"),
            ("n", "new"),
            ("h", "hint"),
            ("s", "solution"),
            ("↵", "submit"),
            ("e", "edit"),
            ("q", "quit"),
        ],
    }
}

/// Render the status bar at the bottom
pub fn render_status_bar(
    frame: &mut Frame,
    area: Rect,
    message: &str,
    tab: Tab,
    is_running: bool,
    is_analyzing: bool,
    is_error: bool,
) {
    let layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(area);

    let bar_bg = DEFAULT_THEME.current_line_bg;

    // Left side: tab name and status message
    let left_spans = vec![
        Span::styled(
            format!(" {} ", tab.title()),
            Style::default()
                .bg(if is_error {
                    DEFAULT_THEME.error
                } else {
                    DEFAULT_THEME.primary
                })
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(" | ", Style::default().bg(bar_bg).fg(DEFAULT_THEME.comment)),
        Span::styled(
            format!(" {} ", message),
            Style::default().bg(bar_bg).fg(if is_error {
                DEFAULT_THEME.error
            } else {
                DEFAULT_THEME.fg
            }),
        ),
    ];

    let left_paragraph = Paragraph::new(Line::from(left_spans))
        .style(Style::default().bg(bar_bg))
        .alignment(Alignment::Left);
    frame.render_widget(left_paragraph, layout[0]);

    // Right side: keybinds with visual grouping
    let key_style = Style::default().bg(DEFAULT_THEME.comment).fg(Color::Black);
    let desc_style = Style::default().bg(bar_bg).fg(DEFAULT_THEME.fg);
    let sep_style = Style::default().bg(bar_bg).fg(DEFAULT_THEME.comment);

    let mut right_spans = Vec::new();
    for (i, (key, desc)) in key_hints(tab).iter().enumerate() {
        if i > 0 {
            right_spans.push(Span::styled("│", sep_style));
            right_spans.push(Span::styled(" ", desc_style));
        }
        right_spans.push(Span::styled(format!(" {} ", key), key_style));
        right_spans.push(Span::styled(format!(" {} ", desc), desc_style));
    }

    let indicator = if is_running {
        Some((" ▶ RUNNING ", DEFAULT_THEME.secondary))
    } else if is_analyzing {
        Some((" ✦ ANALYZING ", DEFAULT_THEME.primary))
    } else {
        None
    };
    if let Some((label, color)) = indicator {
        right_spans.push(Span::styled("│", sep_style));
        right_spans.push(Span::styled(
            label,
            Style::default()
                .bg(color)
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
        ));
    }

    let right_paragraph = Paragraph::new(Line::from(right_spans))
        .style(Style::default().bg(bar_bg))
        .alignment(Alignment::Right);
    frame.render_widget(right_paragraph, layout[1]);
}
