//! Exercises tab rendering

use super::editor::highlight_source_code;
use super::utils::{badge, section_block};
use crate::dashboard::exercises::{ExerciseSession, EXERCISES_COMPLETED};
use crate::ui::theme::{difficulty_color, DEFAULT_THEME};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
    Frame,
};

pub fn render_exercises_pane(frame: &mut Frame, area: Rect, session: &ExerciseSession) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(10),
            Constraint::Length(4),
        ])
        .split(area);

    render_controls(frame, rows[0], session);
    render_exercise(frame, rows[1], session);
    render_stats(frame, rows[2], session);
}

fn render_controls(frame: &mut Frame, area: Rect, session: &ExerciseSession) {
    let line = Line::from(vec![
        Span::styled("Difficulty: ", Style::default().fg(DEFAULT_THEME.comment)),
        badge(session.difficulty().label(), difficulty_color(session.difficulty())),
        Span::styled(
            "   [1] Beginner  [2] Intermediate  [3] Advanced   [n] New Exercise   ",
            Style::default().fg(DEFAULT_THEME.comment),
        ),
        Span::styled(
            format!("🏆 Score: {}", session.score()),
            Style::default()
                .fg(DEFAULT_THEME.accent)
                .add_modifier(Modifier::BOLD),
        ),
    ]);
    frame.render_widget(
        Paragraph::new(line).block(section_block("Coding Exercises")),
        area,
    );
}

fn render_exercise(frame: &mut Frame, area: Rect, session: &ExerciseSession) {
    let exercise = session.exercise();

    let mut lines = vec![
        Line::styled(exercise.description, Style::default().fg(DEFAULT_THEME.comment)),
        Line::raw(""),
        Line::styled("Task:", Style::default().add_modifier(Modifier::BOLD)),
        Line::styled(exercise.task, Style::default().fg(DEFAULT_THEME.fg)),
        Line::raw(""),
    ];

    let hint_style = if session.has_more_hints() {
        Style::default().fg(DEFAULT_THEME.primary)
    } else {
        Style::default().fg(DEFAULT_THEME.comment)
    };
    let solution_label = if session.is_solution_visible() {
        "[s] Hide Solution"
    } else {
        "[s] Show Solution"
    };
    lines.push(Line::from(vec![
        Span::styled(
            "[↵] Submit Solution",
            Style::default()
                .fg(DEFAULT_THEME.border_focused)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("   "),
        Span::styled(format!("[h] {}", session.hint_label()), hint_style),
        Span::raw("   "),
        Span::styled(solution_label, Style::default().fg(DEFAULT_THEME.fg)),
    ]));
    lines.push(Line::raw(""));
    lines.push(Line::from(vec![
        Span::styled(
            format!("★ Hint {}: ", session.hint_index() + 1),
            Style::default()
                .fg(DEFAULT_THEME.accent)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(session.current_hint()),
    ]));

    if session.is_solution_visible() {
        lines.push(Line::raw(""));
        lines.push(Line::styled(
            "Solution ([e] open in editor):",
            Style::default().add_modifier(Modifier::BOLD),
        ));
        lines.extend(exercise.solution.lines().map(highlight_source_code));
    }

    let title = format!("{} · {}", exercise.title, session.difficulty().label());
    frame.render_widget(
        Paragraph::new(lines)
            .block(section_block(&title))
            .wrap(Wrap { trim: false }),
        area,
    );
}

fn render_stats(frame: &mut Frame, area: Rect, session: &ExerciseSession) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
        ])
        .split(area);

    let stats = [
        (session.score().to_string(), "Total Score"),
        (EXERCISES_COMPLETED.to_string(), "Exercises Completed"),
        (session.difficulty().label().to_lowercase(), "Current Level"),
    ];

    for ((value, label), column) in stats.into_iter().zip(columns.iter()) {
        let text = vec![
            Line::styled(
                value,
                Style::default()
                    .fg(DEFAULT_THEME.fg)
                    .add_modifier(Modifier::BOLD),
            ),
            Line::styled(label, Style::default().fg(DEFAULT_THEME.comment)),
        ];
        frame.render_widget(
            Paragraph::new(text)
                .alignment(Alignment::Center)
                .block(section_block("")),
            *column,
        );
    }
}
