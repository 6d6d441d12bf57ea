//! Editor pane rendering with syntax highlighting
//!
//! This module renders the editable source buffer with line numbers, a
//! highlighted cursor line and the terminal cursor placed at the edit point.
//! After a failed run the line the fault was raised on is marked in the error
//! color.
//!
//! # Rendering
//!
//! The pane uses a simple character-by-character tokenizer to apply syntax
//! highlighting styles without requiring a full lexer, so half-typed code
//! still renders.

use crate::dashboard::buffer::SourceBuffer;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::{Position, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Width of the line-number gutter, including its trailing space
const GUTTER_WIDTH: u16 = 5;

/// Simple syntax highlighting for LearnScript code
pub fn highlight_source_code(line: &str) -> Line<'static> {
    let mut spans = Vec::new();
    let mut current_word = String::new();

    let chars: Vec<char> = line.chars().collect();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];

        // Comments run to end of line
        if c == '/' && chars.get(i + 1) == Some(&'/') {
            flush_word(&mut spans, &mut current_word, false);
            spans.push(Span::styled(
                chars[i..].iter().collect::<String>(),
                Style::default().fg(DEFAULT_THEME.comment),
            ));
            break;
        }

        if c == '"' || c == '\'' || c == '`' {
            flush_word(&mut spans, &mut current_word, false);
            let mut end = i + 1;
            while end < chars.len() && chars[end] != c {
                if chars[end] == '\\' {
                    end += 2;
                } else {
                    end += 1;
                }
            }
            let end = (end + 1).min(chars.len());
            spans.push(Span::styled(
                chars[i..end].iter().collect::<String>(),
                Style::default().fg(DEFAULT_THEME.string),
            ));
            i = end;
            continue;
        }

        if !c.is_alphanumeric() && c != '_' && c != '$' {
            let is_call = c == '(';
            flush_word(&mut spans, &mut current_word, is_call);

            let style = match c {
                '{' | '}' | '(' | ')' | '[' | ']' => Style::default().fg(DEFAULT_THEME.primary),
                _ => Style::default().fg(DEFAULT_THEME.fg),
            };
            spans.push(Span::styled(c.to_string(), style));
            i += 1;
            continue;
        }

        current_word.push(c);
        i += 1;
    }

    flush_word(&mut spans, &mut current_word, false);
    Line::from(spans)
}

fn flush_word(spans: &mut Vec<Span<'static>>, word: &mut String, is_call: bool) {
    if !word.is_empty() {
        let style = get_keyword_style(word, is_call);
        spans.push(Span::styled(std::mem::take(word), style));
    }
}

fn get_keyword_style(word: &str, is_function: bool) -> Style {
    match word {
        "let" | "const" | "var" | "function" | "return" | "if" | "else" | "while" | "for"
        | "do" | "switch" | "case" | "default" | "break" | "continue" | "try" | "catch"
        | "finally" | "throw" | "new" | "typeof" | "of" | "in" => Style::default()
            .fg(DEFAULT_THEME.keyword)
            .add_modifier(Modifier::BOLD),
        "true" | "false" | "null" | "undefined" | "NaN" | "Infinity" | "this" => {
            Style::default().fg(DEFAULT_THEME.constant)
        }
        _ if word.starts_with(|c: char| c.is_ascii_digit()) => {
            Style::default().fg(DEFAULT_THEME.number)
        }
        _ => {
            if is_function {
                Style::default().fg(DEFAULT_THEME.function)
            } else {
                Style::default().fg(DEFAULT_THEME.fg)
            }
        }
    }
}

/// Render the editor pane
pub fn render_editor_pane(
    frame: &mut Frame,
    area: Rect,
    buffer: &SourceBuffer,
    fault_line: Option<usize>,
    is_running: bool,
    scroll_offset: &mut usize,
) {
    let border_style = Style::default()
        .fg(DEFAULT_THEME.border_focused)
        .add_modifier(Modifier::BOLD);

    let title = if is_running {
        " main.js (running) "
    } else {
        " main.js "
    };
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(border_style);

    let cursor = buffer.cursor();
    let total_lines = buffer.line_count();
    let visible_height = area.height.saturating_sub(2).max(1) as usize;

    // Keep the cursor row on screen
    if cursor.row < *scroll_offset {
        *scroll_offset = cursor.row;
    } else if cursor.row >= *scroll_offset + visible_height {
        *scroll_offset = cursor.row + 1 - visible_height;
    }
    *scroll_offset = (*scroll_offset).min(total_lines.saturating_sub(1));

    let visible_lines: Vec<Line> = buffer
        .lines()
        .iter()
        .enumerate()
        .skip(*scroll_offset)
        .take(visible_height)
        .map(|(idx, line)| {
            let line_num = idx + 1;
            let is_fault = fault_line == Some(line_num);
            let is_current = idx == cursor.row;

            let num_style = if is_fault {
                Style::default()
                    .fg(DEFAULT_THEME.error)
                    .add_modifier(Modifier::BOLD)
            } else if is_current {
                Style::default()
                    .fg(DEFAULT_THEME.secondary)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(DEFAULT_THEME.comment)
            };

            let mut content_line = highlight_source_code(line);
            if is_fault {
                for span in &mut content_line.spans {
                    span.style = Style::default()
                        .bg(DEFAULT_THEME.error)
                        .fg(Color::Black)
                        .add_modifier(Modifier::BOLD);
                }
            } else if is_current {
                for span in &mut content_line.spans {
                    span.style = span.style.bg(DEFAULT_THEME.current_line_bg);
                }
            }

            let mut final_spans = vec![Span::styled(format!("{:4} ", line_num), num_style)];
            final_spans.extend(content_line.spans);
            Line::from(final_spans)
        })
        .collect();

    let paragraph = Paragraph::new(visible_lines).block(block);
    frame.render_widget(paragraph, area);

    // Place the terminal cursor at the edit point, clamped inside the borders
    let inner_right = area.x + area.width.saturating_sub(2);
    let x = (area.x + 1 + GUTTER_WIDTH + cursor.col as u16).min(inner_right);
    let y = area.y + 1 + (cursor.row - *scroll_offset) as u16;
    frame.set_cursor_position(Position::new(x, y));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn span_text(line: &Line) -> Vec<String> {
        line.spans.iter().map(|s| s.content.to_string()).collect()
    }

    #[test]
    fn test_highlight_keeps_text() {
        let source = "let s = 'héllo'; // done";
        let line = highlight_source_code(source);
        assert_eq!(span_text(&line).concat(), source);
    }

    #[test]
    fn test_keyword_and_call_styles() {
        let line = highlight_source_code("return greet(name);");
        assert_eq!(line.spans[0].content, "return");
        assert_eq!(line.spans[0].style.fg, Some(DEFAULT_THEME.keyword));
        let greet = line.spans.iter().find(|s| s.content == "greet").unwrap();
        assert_eq!(greet.style.fg, Some(DEFAULT_THEME.function));
    }

    #[test]
    fn test_unterminated_string_runs_to_end() {
        let line = highlight_source_code("x = \"abc");
        assert_eq!(line.spans.last().unwrap().content, "\"abc");
    }
}
