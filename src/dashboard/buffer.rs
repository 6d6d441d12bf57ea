//! Editable multi-line source text
//!
//! The buffer stores one `String` per line and a cursor addressed in chars,
//! never bytes, so multi-byte input cannot split a code point.

/// Spaces inserted by the Tab key
pub const TAB_WIDTH: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Cursor {
    /// 0-based line index
    pub row: usize,
    /// 0-based char index within the line
    pub col: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceBuffer {
    lines: Vec<String>,
    cursor: Cursor,
    /// Column remembered across vertical moves through shorter lines
    preferred_col: usize,
}

impl SourceBuffer {
    pub fn new(text: &str) -> Self {
        let mut buffer = SourceBuffer {
            lines: Vec::new(),
            cursor: Cursor::default(),
            preferred_col: 0,
        };
        buffer.set_text(text);
        buffer
    }

    /// Replace the whole text and move the cursor to the start
    pub fn set_text(&mut self, text: &str) {
        self.lines = text.split('\n').map(|l| l.trim_end_matches('\r').to_string()).collect();
        self.cursor = Cursor::default();
        self.preferred_col = 0;
    }

    pub fn text(&self) -> String {
        self.lines.join("\n")
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    fn line_len(&self, row: usize) -> usize {
        self.lines.get(row).map_or(0, |l| l.chars().count())
    }

    fn byte_offset(line: &str, col: usize) -> usize {
        line.char_indices().nth(col).map_or(line.len(), |(i, _)| i)
    }

    fn current_line_mut(&mut self) -> &mut String {
        if self.lines.is_empty() {
            self.lines.push(String::new());
        }
        let row = self.cursor.row.min(self.lines.len() - 1);
        &mut self.lines[row]
    }

    pub fn insert_char(&mut self, c: char) {
        if c == '\n' {
            self.newline();
            return;
        }
        let col = self.cursor.col;
        let line = self.current_line_mut();
        let at = Self::byte_offset(line, col);
        line.insert(at, c);
        self.cursor.col += 1;
        self.preferred_col = self.cursor.col;
    }

    pub fn insert_str(&mut self, text: &str) {
        for c in text.chars() {
            self.insert_char(c);
        }
    }

    pub fn insert_tab(&mut self) {
        self.insert_str(&" ".repeat(TAB_WIDTH));
    }

    /// Split the current line at the cursor
    pub fn newline(&mut self) {
        let col = self.cursor.col;
        let line = self.current_line_mut();
        let at = Self::byte_offset(line, col);
        let rest = line.split_off(at);
        self.lines.insert(self.cursor.row + 1, rest);
        self.cursor = Cursor {
            row: self.cursor.row + 1,
            col: 0,
        };
        self.preferred_col = 0;
    }

    /// Delete the char before the cursor, joining lines at column 0
    pub fn backspace(&mut self) {
        if self.cursor.col > 0 {
            let col = self.cursor.col - 1;
            let line = self.current_line_mut();
            let at = Self::byte_offset(line, col);
            line.remove(at);
            self.cursor.col = col;
        } else if self.cursor.row > 0 {
            let removed = self.lines.remove(self.cursor.row);
            self.cursor.row -= 1;
            self.cursor.col = self.line_len(self.cursor.row);
            self.lines[self.cursor.row].push_str(&removed);
        }
        self.preferred_col = self.cursor.col;
    }

    /// Delete the char under the cursor, joining lines at end of line
    pub fn delete(&mut self) {
        let len = self.line_len(self.cursor.row);
        if self.cursor.col < len {
            let col = self.cursor.col;
            let line = self.current_line_mut();
            let at = Self::byte_offset(line, col);
            line.remove(at);
        } else if self.cursor.row + 1 < self.lines.len() {
            let next = self.lines.remove(self.cursor.row + 1);
            self.lines[self.cursor.row].push_str(&next);
        }
    }

    pub fn move_left(&mut self) {
        if self.cursor.col > 0 {
            self.cursor.col -= 1;
        } else if self.cursor.row > 0 {
            self.cursor.row -= 1;
            self.cursor.col = self.line_len(self.cursor.row);
        }
        self.preferred_col = self.cursor.col;
    }

    pub fn move_right(&mut self) {
        if self.cursor.col < self.line_len(self.cursor.row) {
            self.cursor.col += 1;
        } else if self.cursor.row + 1 < self.lines.len() {
            self.cursor.row += 1;
            self.cursor.col = 0;
        }
        self.preferred_col = self.cursor.col;
    }

    pub fn move_up(&mut self) {
        self.move_rows_up(1);
    }

    pub fn move_down(&mut self) {
        self.move_rows_down(1);
    }

    pub fn page_up(&mut self, rows: usize) {
        self.move_rows_up(rows.max(1));
    }

    pub fn page_down(&mut self, rows: usize) {
        self.move_rows_down(rows.max(1));
    }

    fn move_rows_up(&mut self, rows: usize) {
        self.cursor.row = self.cursor.row.saturating_sub(rows);
        self.cursor.col = self.preferred_col.min(self.line_len(self.cursor.row));
    }

    fn move_rows_down(&mut self, rows: usize) {
        let last = self.lines.len().saturating_sub(1);
        self.cursor.row = (self.cursor.row + rows).min(last);
        self.cursor.col = self.preferred_col.min(self.line_len(self.cursor.row));
    }

    pub fn home(&mut self) {
        self.cursor.col = 0;
        self.preferred_col = 0;
    }

    pub fn end(&mut self) {
        self.cursor.col = self.line_len(self.cursor.row);
        self.preferred_col = self.cursor.col;
    }
}

impl Default for SourceBuffer {
    fn default() -> Self {
        SourceBuffer::new("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_round_trips_lines() {
        let buffer = SourceBuffer::new("a\n\nb");
        assert_eq!(buffer.line_count(), 3);
        assert_eq!(buffer.text(), "a\n\nb");
    }

    #[test]
    fn test_insert_newline_and_backspace_join() {
        let mut buffer = SourceBuffer::new("hello");
        buffer.end();
        buffer.move_left();
        buffer.move_left();
        buffer.newline();
        assert_eq!(buffer.text(), "hel\nlo");
        assert_eq!(buffer.cursor(), Cursor { row: 1, col: 0 });
        buffer.backspace();
        assert_eq!(buffer.text(), "hello");
        assert_eq!(buffer.cursor(), Cursor { row: 0, col: 3 });
    }

    #[test]
    fn test_multibyte_editing() {
        let mut buffer = SourceBuffer::new("héllo");
        buffer.move_right();
        buffer.move_right();
        buffer.backspace();
        assert_eq!(buffer.text(), "hllo");
        buffer.insert_char('ü');
        assert_eq!(buffer.text(), "hüllo");
    }

    #[test]
    fn test_tab_inserts_spaces() {
        let mut buffer = SourceBuffer::new("x");
        buffer.insert_tab();
        assert_eq!(buffer.text(), "  x");
        assert_eq!(buffer.cursor().col, TAB_WIDTH);
    }

    #[test]
    fn test_vertical_moves_remember_column() {
        let mut buffer = SourceBuffer::new("long line\nab\nanother long");
        buffer.end();
        buffer.move_down();
        assert_eq!(buffer.cursor(), Cursor { row: 1, col: 2 });
        buffer.move_down();
        assert_eq!(buffer.cursor(), Cursor { row: 2, col: 9 });
        buffer.page_up(10);
        assert_eq!(buffer.cursor(), Cursor { row: 0, col: 9 });
    }

    #[test]
    fn test_delete_joins_next_line() {
        let mut buffer = SourceBuffer::new("ab\ncd");
        buffer.end();
        buffer.delete();
        assert_eq!(buffer.text(), "abcd");
        buffer.end();
        buffer.delete();
        assert_eq!(buffer.text(), "abcd");
    }
}
