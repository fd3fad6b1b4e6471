//! Line-oriented text buffer for the editor pane.

use notepad_core::word_count;
use notepad_types::CursorIndex;

/// Editable text stored as lines with a char-indexed cursor.
///
/// Invariant: `lines` is never empty and `col <= chars(lines[row])`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextBuffer {
    lines: Vec<String>,
    row: usize,
    col: usize,
}

impl Default for TextBuffer {
    fn default() -> Self {
        Self {
            lines: vec![String::new()],
            row: 0,
            col: 0,
        }
    }
}

fn char_len(line: &str) -> usize {
    line.chars().count()
}

fn byte_index(line: &str, col: usize) -> usize {
    line.char_indices().nth(col).map_or(line.len(), |(i, _)| i)
}

impl TextBuffer {
    #[must_use]
    pub fn from_text(text: &str) -> Self {
        let mut buffer = Self::default();
        buffer.set_text(text);
        buffer
    }

    /// Full text with `\n` separators. No trailing newline is added.
    #[must_use]
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }

    /// Replace the contents and move the cursor to the start.
    pub fn set_text(&mut self, text: &str) {
        let normalized = text.replace("\r\n", "\n");
        self.lines = normalized.split('\n').map(str::to_owned).collect();
        self.row = 0;
        self.col = 0;
    }

    #[must_use]
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.len() == 1 && self.lines[0].is_empty()
    }

    /// Zero-based `(row, col)` of the cursor.
    #[must_use]
    pub fn cursor(&self) -> (usize, usize) {
        (self.row, self.col)
    }

    #[must_use]
    pub fn cursor_index(&self) -> CursorIndex {
        CursorIndex::new(self.row + 1, self.col)
    }

    /// Move the cursor to `index`; positions outside the text land at the end.
    pub fn set_cursor_index(&mut self, index: CursorIndex) {
        let row = index.line() - 1;
        match self.lines.get(row) {
            Some(line) if index.column() <= char_len(line) => {
                self.row = row;
                self.col = index.column();
            }
            _ => self.move_to_end(),
        }
    }

    #[must_use]
    pub fn word_count(&self) -> usize {
        self.lines.iter().map(|line| word_count(line)).sum()
    }

    /// Chars including line separators.
    #[must_use]
    pub fn char_count(&self) -> usize {
        self.lines.iter().map(|l| char_len(l)).sum::<usize>() + self.lines.len() - 1
    }

    fn current_line(&self) -> &str {
        &self.lines[self.row]
    }

    fn current_len(&self) -> usize {
        char_len(self.current_line())
    }

    pub fn insert_char(&mut self, ch: char) {
        if ch == '\n' {
            self.insert_newline();
            return;
        }
        let idx = byte_index(&self.lines[self.row], self.col);
        self.lines[self.row].insert(idx, ch);
        self.col += 1;
    }

    pub fn insert_str(&mut self, text: &str) {
        for ch in text.replace("\r\n", "\n").chars() {
            if ch != '\r' {
                self.insert_char(ch);
            }
        }
    }

    pub fn insert_newline(&mut self) {
        let idx = byte_index(&self.lines[self.row], self.col);
        let tail = self.lines[self.row].split_off(idx);
        self.row += 1;
        self.col = 0;
        self.lines.insert(self.row, tail);
    }

    /// Delete the char before the cursor, joining lines at column 0.
    /// Returns whether anything changed.
    pub fn backspace(&mut self) -> bool {
        if self.col > 0 {
            let line = &mut self.lines[self.row];
            let start = byte_index(line, self.col - 1);
            let end = byte_index(line, self.col);
            line.replace_range(start..end, "");
            self.col -= 1;
            true
        } else if self.row > 0 {
            let line = self.lines.remove(self.row);
            self.row -= 1;
            self.col = self.current_len();
            self.lines[self.row].push_str(&line);
            true
        } else {
            false
        }
    }

    /// Delete the char under the cursor, joining the next line at line end.
    pub fn delete(&mut self) -> bool {
        if self.col < self.current_len() {
            let line = &mut self.lines[self.row];
            let start = byte_index(line, self.col);
            let end = byte_index(line, self.col + 1);
            line.replace_range(start..end, "");
            true
        } else if self.row + 1 < self.lines.len() {
            let next = self.lines.remove(self.row + 1);
            self.lines[self.row].push_str(&next);
            true
        } else {
            false
        }
    }

    pub fn move_left(&mut self) {
        if self.col > 0 {
            self.col -= 1;
        } else if self.row > 0 {
            self.row -= 1;
            self.col = self.current_len();
        }
    }

    pub fn move_right(&mut self) {
        if self.col < self.current_len() {
            self.col += 1;
        } else if self.row + 1 < self.lines.len() {
            self.row += 1;
            self.col = 0;
        }
    }

    pub fn move_up(&mut self) {
        if self.row > 0 {
            self.row -= 1;
            self.col = self.col.min(self.current_len());
        }
    }

    pub fn move_down(&mut self) {
        if self.row + 1 < self.lines.len() {
            self.row += 1;
            self.col = self.col.min(self.current_len());
        }
    }

    pub fn move_home(&mut self) {
        self.col = 0;
    }

    pub fn move_end(&mut self) {
        self.col = self.current_len();
    }

    pub fn move_to_end(&mut self) {
        self.row = self.lines.len() - 1;
        self.col = self.current_len();
    }
}
