//! Small rendering helpers shared by the content panes

use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    style::{Color, Modifier, Style},
    text::Span,
    widgets::{Block, Borders, Padding},
};

/// Bordered block with a padded title
pub fn section_block(title: &str) -> Block<'static> {
    Block::default()
        .title(format!(" {} ", title))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(DEFAULT_THEME.border_normal))
        .padding(Padding::horizontal(1))
}

/// Inverted label, e.g. a difficulty tier or a score
pub fn badge(text: &str, color: Color) -> Span<'static> {
    Span::styled(
        format!(" {} ", text),
        Style::default()
            .bg(color)
            .fg(Color::Black)
            .add_modifier(Modifier::BOLD),
    )
}

/// Text progress bar `width` cells wide
pub fn progress_bar(percent: u8, width: usize) -> String {
    let filled = (percent.min(100) as usize * width + 50) / 100;
    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_bar_rounds() {
        assert_eq!(progress_bar(0, 4), "░░░░");
        assert_eq!(progress_bar(75, 4), "███░");
        assert_eq!(progress_bar(100, 4), "████");
        assert_eq!(progress_bar(25, 10).chars().filter(|c| *c == '█').count(), 3);
    }
}
