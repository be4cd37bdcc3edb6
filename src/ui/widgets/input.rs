//! Single-line text input shared by the views

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph};
use ratatui::Frame;

#[derive(Debug, Clone, Default)]
pub struct TextInput {
    value: String,
    /// Cursor position in chars
    cursor: usize,
}

impl TextInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    pub fn set(&mut self, value: impl Into<String>) {
        self.value = value.into();
        self.cursor = self.value.chars().count();
    }

    pub fn clear(&mut self) {
        self.value.clear();
        self.cursor = 0;
    }

    /// Take the current value, leaving the input empty.
    pub fn take(&mut self) -> String {
        self.cursor = 0;
        std::mem::take(&mut self.value)
    }

    /// Insert at the cursor. Also how callers add a `'\n'`, which the
    /// editing keys never produce.
    pub fn insert(&mut self, ch: char) {
        let at = self.byte_index();
        self.value.insert(at, ch);
        self.cursor += 1;
    }

    /// Apply an editing key. Returns `false` for keys it does not handle.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        if key
            .modifiers
            .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
        {
            return false;
        }
        match key.code {
            KeyCode::Char(ch) => self.insert(ch),
            KeyCode::Backspace => {
                if self.cursor > 0 {
                    self.cursor -= 1;
                    let at = self.byte_index();
                    self.value.remove(at);
                }
            }
            KeyCode::Delete => {
                if self.cursor < self.value.chars().count() {
                    let at = self.byte_index();
                    self.value.remove(at);
                }
            }
            KeyCode::Left => self.cursor = self.cursor.saturating_sub(1),
            KeyCode::Right => self.cursor = (self.cursor + 1).min(self.value.chars().count()),
            KeyCode::Home => self.cursor = 0,
            KeyCode::End => self.cursor = self.value.chars().count(),
            _ => return false,
        }
        true
    }

    fn byte_index(&self) -> usize {
        self.value
            .char_indices()
            .nth(self.cursor)
            .map(|(idx, _)| idx)
            .unwrap_or(self.value.len())
    }

    /// Draw `prompt` followed by the value and place the terminal cursor.
    pub fn render(&self, frame: &mut Frame, area: Rect, prompt: &str, block: Block, focused: bool) {
        let inner = block.inner(area);
        let line = Line::from(vec![
            Span::styled(prompt.to_string(), Style::default()),
            Span::raw(self.value.replace('\n', "↵")),
        ]);
        frame.render_widget(Paragraph::new(line).block(block), area);

        if focused && inner.width > 0 && inner.height > 0 {
            let offset = (prompt.chars().count() + self.cursor) as u16;
            let x = inner.x + offset.min(inner.width.saturating_sub(1));
            frame.set_cursor(x, inner.y);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_typing_and_editing() {
        let mut input = TextInput::new();
        for ch in "helo".chars() {
            input.handle_key(key(KeyCode::Char(ch)));
        }
        input.handle_key(key(KeyCode::Left));
        input.handle_key(key(KeyCode::Char('l')));
        assert_eq!(input.value(), "hello");

        input.handle_key(key(KeyCode::End));
        input.handle_key(key(KeyCode::Backspace));
        assert_eq!(input.value(), "hell");
        assert_eq!(input.take(), "hell");
        assert!(input.is_empty());
    }

    #[test]
    fn test_multibyte_chars() {
        let mut input = TextInput::new();
        input.set("ab◆");
        input.handle_key(key(KeyCode::Backspace));
        assert_eq!(input.value(), "ab");
    }

    #[test]
    fn test_ignores_control_chords() {
        let mut input = TextInput::new();
        assert!(!input.handle_key(KeyEvent::new(KeyCode::Char('k'), KeyModifiers::CONTROL)));
        assert!(input.is_empty());
    }

    #[test]
    fn test_insert_newline_at_cursor() {
        let mut input = TextInput::new();
        input.set("ab");
        input.handle_key(key(KeyCode::Left));
        input.insert('\n');
        assert_eq!(input.value(), "a\nb");
        assert!(!input.handle_key(KeyEvent::new(KeyCode::Enter, KeyModifiers::ALT)));
    }
}
