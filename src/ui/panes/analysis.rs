//! AI Analysis tab rendering

use super::utils::{badge, section_block};
use crate::dashboard::analysis::AnalysisSession;
use crate::fixtures::analysis::QUICK_ACTIONS;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
    Frame,
};

pub fn render_analysis_pane(frame: &mut Frame, area: Rect, session: &AnalysisSession) {
    let record = session.record();
    let has_errors = !record.errors.is_empty();

    let mut constraints = vec![
        Constraint::Length(7),
        Constraint::Length(record.suggestions.len() as u16 + 2),
    ];
    if has_errors {
        constraints.push(Constraint::Length(record.errors.len() as u16 + 2));
    }
    constraints.push(Constraint::Length(3));
    constraints.push(Constraint::Min(0));

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    // Summary card with the analyze button
    let button_style = if session.is_analyzing() {
        Style::default()
            .fg(DEFAULT_THEME.comment)
            .add_modifier(Modifier::ITALIC)
    } else {
        Style::default()
            .fg(DEFAULT_THEME.primary)
            .add_modifier(Modifier::BOLD)
    };
    let summary = vec![
        Line::from(vec![
            Span::styled("[a] ", Style::default().fg(DEFAULT_THEME.comment)),
            Span::styled(session.button_label(), button_style),
        ]),
        Line::from(vec![
            Span::styled("Code Quality Score: ", Style::default().fg(DEFAULT_THEME.comment)),
            badge(&format!("{}/100", record.score), DEFAULT_THEME.accent),
            Span::raw("   "),
            Span::styled("Complexity: ", Style::default().fg(DEFAULT_THEME.comment)),
            Span::styled(
                record.complexity.label(),
                Style::default().fg(DEFAULT_THEME.fg).add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::raw(""),
        Line::styled(record.summary, Style::default().fg(DEFAULT_THEME.fg)),
    ];
    frame.render_widget(
        Paragraph::new(summary)
            .block(section_block("AI Code Analysis"))
            .wrap(Wrap { trim: true }),
        rows[0],
    );

    let suggestions: Vec<Line> = record
        .suggestions
        .iter()
        .map(|s| {
            Line::from(vec![
                Span::styled("✓ ", Style::default().fg(DEFAULT_THEME.accent)),
                Span::raw(*s),
            ])
        })
        .collect();
    frame.render_widget(
        Paragraph::new(suggestions)
            .block(section_block("Improvement Suggestions"))
            .wrap(Wrap { trim: true }),
        rows[1],
    );

    let mut next = 2;
    if has_errors {
        let errors: Vec<Line> = record
            .errors
            .iter()
            .map(|e| {
                Line::from(vec![
                    Span::styled("⚠ ", Style::default().fg(DEFAULT_THEME.error)),
                    Span::raw(*e),
                ])
            })
            .collect();
        frame.render_widget(
            Paragraph::new(errors).block(section_block("Issues Found")),
            rows[next],
        );
        next += 1;
    }

    let mut actions = Vec::new();
    for action in QUICK_ACTIONS {
        actions.push(Span::styled(
            format!("[ {} ]", action),
            Style::default().fg(DEFAULT_THEME.fg),
        ));
        actions.push(Span::raw(" "));
    }
    frame.render_widget(
        Paragraph::new(Line::from(actions)).block(section_block("Quick Actions")),
        rows[next],
    );
}
