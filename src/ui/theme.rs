use ratatui::style::Color;

use crate::fixtures::Difficulty;

pub struct Theme {
    pub fg: Color,
    pub primary: Color,   // Blue
    pub secondary: Color, // Orange
    pub accent: Color,    // Green
    pub comment: Color,   // Grey
    pub success: Color,   // Green
    pub error: Color,     // Red
    pub keyword: Color,
    pub string: Color,
    pub number: Color,
    pub border_focused: Color,
    pub border_normal: Color,
    pub current_line_bg: Color,
    pub function: Color,
    pub constant: Color,
}

pub const DEFAULT_THEME: Theme = Theme {
    fg: Color::Rgb(205, 214, 244),
    primary: Color::Rgb(137, 180, 250),
    secondary: Color::Rgb(250, 179, 135),
    accent: Color::Rgb(166, 227, 161),
    comment: Color::Rgb(108, 112, 134),
    success: Color::Rgb(166, 227, 161),
    error: Color::Rgb(243, 139, 168),
    keyword: Color::Rgb(203, 166, 247),        // Mauve for keywords
    string: Color::Rgb(166, 227, 161),         // Green for strings
    number: Color::Rgb(250, 179, 135),         // Orange for numbers
    border_focused: Color::Rgb(249, 226, 175), // Yellow border for focus
    border_normal: Color::Rgb(108, 112, 134),
    current_line_bg: Color::Rgb(50, 50, 70),
    function: Color::Rgb(249, 226, 175),
    constant: Color::Rgb(148, 226, 213), // Teal for true/false/null
};

/// Badge color for a difficulty tier
pub fn difficulty_color(difficulty: Difficulty) -> Color {
    match difficulty {
        Difficulty::Beginner => DEFAULT_THEME.accent,
        Difficulty::Intermediate => DEFAULT_THEME.primary,
        Difficulty::Advanced => DEFAULT_THEME.error,
    }
}
