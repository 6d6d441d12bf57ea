//! Tutorials tab rendering: catalog list on the left, detail on the right

use super::editor::highlight_source_code;
use super::utils::{badge, progress_bar, section_block};
use crate::dashboard::tutorials::TutorialBrowser;
use crate::ui::theme::{difficulty_color, DEFAULT_THEME};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem, Paragraph, Wrap},
    Frame,
};

pub fn render_tutorials_pane(frame: &mut Frame, area: Rect, browser: &TutorialBrowser) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(35), Constraint::Percentage(65)])
        .split(area);

    render_catalog(frame, columns[0], browser);
    render_detail(frame, columns[1], browser);
}

fn render_catalog(frame: &mut Frame, area: Rect, browser: &TutorialBrowser) {
    let selected = browser.selected_index();
    let items: Vec<ListItem> = browser
        .tutorials()
        .iter()
        .enumerate()
        .map(|(idx, tutorial)| {
            let marker = if idx == selected { "▶ " } else { "  " };
            let title_style = if idx == selected {
                Style::default()
                    .fg(DEFAULT_THEME.border_focused)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(DEFAULT_THEME.fg)
            };
            ListItem::new(vec![
                Line::from(vec![
                    Span::styled(marker, title_style),
                    Span::styled(tutorial.title, title_style),
                    Span::raw(" "),
                    badge(tutorial.difficulty.label(), difficulty_color(tutorial.difficulty)),
                ]),
                Line::styled(
                    format!("  {}", tutorial.description),
                    Style::default().fg(DEFAULT_THEME.comment),
                ),
                Line::from(vec![
                    Span::styled(
                        format!("  ⏱ {}  ", tutorial.duration),
                        Style::default().fg(DEFAULT_THEME.comment),
                    ),
                    Span::styled(
                        progress_bar(tutorial.progress, 12),
                        Style::default().fg(DEFAULT_THEME.primary),
                    ),
                    Span::raw(format!(" {}%", tutorial.progress)),
                ]),
                Line::raw(""),
            ])
        })
        .collect();

    frame.render_widget(
        List::new(items).block(section_block("Interactive Tutorials")),
        area,
    );
}

fn render_detail(frame: &mut Frame, area: Rect, browser: &TutorialBrowser) {
    let tutorial = browser.selected();
    let snippet = browser.practice_snippet();

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(6),
            Constraint::Length(tutorial.steps.len() as u16 + 2),
            Constraint::Min(snippet.lines().count() as u16 + 2),
        ])
        .split(area);

    let header = vec![
        Line::styled(tutorial.description, Style::default().fg(DEFAULT_THEME.comment)),
        Line::from(vec![
            badge(tutorial.difficulty.label(), difficulty_color(tutorial.difficulty)),
            Span::raw(format!("  ⏱ {}  Progress: {}%", tutorial.duration, tutorial.progress)),
        ]),
        Line::styled(
            progress_bar(tutorial.progress, 30),
            Style::default().fg(DEFAULT_THEME.primary),
        ),
    ];
    frame.render_widget(
        Paragraph::new(header)
            .block(section_block(tutorial.title))
            .wrap(Wrap { trim: true }),
        rows[0],
    );

    let steps: Vec<Line> = tutorial
        .steps
        .iter()
        .enumerate()
        .map(|(idx, step)| {
            if step.completed {
                Line::from(vec![
                    Span::styled(" ✓ ", Style::default().fg(DEFAULT_THEME.success)),
                    Span::styled(step.title, Style::default().fg(DEFAULT_THEME.fg)),
                ])
            } else {
                Line::from(vec![
                    Span::styled(
                        format!(" {} ", idx + 1),
                        Style::default().fg(DEFAULT_THEME.comment),
                    ),
                    Span::styled(step.title, Style::default().fg(DEFAULT_THEME.comment)),
                    Span::styled(" ›", Style::default().fg(DEFAULT_THEME.comment)),
                ])
            }
        })
        .collect();
    frame.render_widget(
        Paragraph::new(steps).block(section_block("Learning Path")),
        rows[1],
    );

    let mut practice: Vec<Line> = snippet.lines().map(highlight_source_code).collect();
    practice.push(Line::raw(""));
    practice.push(Line::styled(
        "Press p to open this snippet in the editor",
        Style::default().fg(DEFAULT_THEME.comment),
    ));
    frame.render_widget(
        Paragraph::new(practice).block(section_block("Try It Yourself")),
        rows[2],
    );
}
