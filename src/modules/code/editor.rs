//! Minimal multi-line text buffer

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::domain::CodeFile;

#[derive(Debug, Clone)]
pub struct Editor {
    name: String,
    lines: Vec<String>,
    row: usize,
    /// Column in chars
    col: usize,
}

impl Editor {
    pub fn new(file: CodeFile) -> Self {
        let mut editor = Self {
            name: file.name,
            lines: Vec::new(),
            row: 0,
            col: 0,
        };
        editor.replace(&file.content);
        editor
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn cursor(&self) -> (usize, usize) {
        (self.row, self.col)
    }

    pub fn content(&self) -> String {
        self.lines.join("\n")
    }

    pub fn to_file(&self) -> CodeFile {
        CodeFile::new(self.name.clone(), self.content())
    }

    /// Swap the whole text, cursor to the end.
    pub fn replace(&mut self, content: &str) {
        self.lines = content.split('\n').map(str::to_string).collect();
        self.row = self.lines.len() - 1;
        self.col = self.lines[self.row].chars().count();
    }

    pub fn append(&mut self, text: &str) {
        let mut content = self.content();
        content.push_str(text);
        self.replace(&content);
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        if key
            .modifiers
            .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
        {
            return false;
        }
        match key.code {
            KeyCode::Char(ch) => self.insert(ch),
            KeyCode::Enter => {
                let at = self.byte_col();
                let tail = self.lines[self.row].split_off(at);
                self.row += 1;
                self.lines.insert(self.row, tail);
                self.col = 0;
            }
            KeyCode::Backspace => {
                if self.col > 0 {
                    self.col -= 1;
                    let at = self.byte_col();
                    self.lines[self.row].remove(at);
                } else if self.row > 0 {
                    let line = self.lines.remove(self.row);
                    self.row -= 1;
                    self.col = self.lines[self.row].chars().count();
                    self.lines[self.row].push_str(&line);
                }
            }
            KeyCode::Left => {
                if self.col > 0 {
                    self.col -= 1;
                } else if self.row > 0 {
                    self.row -= 1;
                    self.col = self.line_len();
                }
            }
            KeyCode::Right => {
                if self.col < self.line_len() {
                    self.col += 1;
                } else if self.row + 1 < self.lines.len() {
                    self.row += 1;
                    self.col = 0;
                }
            }
            KeyCode::Up => {
                self.row = self.row.saturating_sub(1);
                self.col = self.col.min(self.line_len());
            }
            KeyCode::Down => {
                self.row = (self.row + 1).min(self.lines.len() - 1);
                self.col = self.col.min(self.line_len());
            }
            KeyCode::Home => self.col = 0,
            KeyCode::End => self.col = self.line_len(),
            _ => return false,
        }
        true
    }

    fn insert(&mut self, ch: char) {
        let at = self.byte_col();
        self.lines[self.row].insert(at, ch);
        self.col += 1;
    }

    fn line_len(&self) -> usize {
        self.lines[self.row].chars().count()
    }

    fn byte_col(&self) -> usize {
        let line = &self.lines[self.row];
        line.char_indices()
            .nth(self.col)
            .map(|(idx, _)| idx)
            .unwrap_or(line.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_new_places_cursor_at_end() {
        let editor = Editor::new(CodeFile::new("main.py", "a\nbc"));
        assert_eq!(editor.cursor(), (1, 2));
        assert_eq!(editor.lines().len(), 2);
    }

    #[test]
    fn test_enter_splits_and_backspace_joins() {
        let mut editor = Editor::new(CodeFile::new("x.py", "abcd"));
        editor.handle_key(key(KeyCode::Left));
        editor.handle_key(key(KeyCode::Left));
        editor.handle_key(key(KeyCode::Enter));
        assert_eq!(editor.lines(), ["ab", "cd"]);
        editor.handle_key(key(KeyCode::Backspace));
        assert_eq!(editor.content(), "abcd");
        assert_eq!(editor.cursor(), (0, 2));
    }

    #[test]
    fn test_append_keeps_existing_text() {
        let mut editor = Editor::new(CodeFile::new("x.py", "# Enterprise script"));
        editor.append("\nprint('hi')");
        assert_eq!(editor.content(), "# Enterprise script\nprint('hi')");
        assert_eq!(editor.cursor(), (1, 11));
    }
}
