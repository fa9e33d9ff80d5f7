use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputResult {
    /// Query text or cursor changed (or nothing happened).
    Editing,
    /// Enter: keep the query, leave the box.
    Done,
    /// Esc: leave the box.
    Leave,
}

/// Single-line query editor for the history search box.
#[derive(Debug, Default)]
pub struct SearchInput {
    query: String,
    /// Char index, 0 = before the first char.
    cursor: usize,
}

impl SearchInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn clear(&mut self) {
        self.query.clear();
        self.cursor = 0;
    }

    /// Split around the cursor for rendering: (before, char under cursor, after).
    pub fn split_at_cursor(&self) -> (&str, Option<char>, &str) {
        let at = self.byte_at(self.cursor);
        match self.query[at..].chars().next() {
            Some(ch) => {
                let next = at + ch.len_utf8();
                (&self.query[..at], Some(ch), &self.query[next..])
            }
            None => (&self.query, None, ""),
        }
    }

    pub fn handle(&mut self, key: KeyEvent) -> InputResult {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let len = self.query.chars().count();
        match key.code {
            KeyCode::Esc => return InputResult::Leave,
            KeyCode::Enter => return InputResult::Done,
            KeyCode::Left => self.cursor = self.cursor.saturating_sub(1),
            KeyCode::Right => self.cursor = (self.cursor + 1).min(len),
            KeyCode::Home => self.cursor = 0,
            KeyCode::End => self.cursor = len,
            KeyCode::Char('a') if ctrl => self.cursor = 0,
            KeyCode::Char('e') if ctrl => self.cursor = len,
            KeyCode::Char('u') if ctrl => self.clear(),
            KeyCode::Char('w') if ctrl => self.delete_word_back(),
            KeyCode::Backspace if self.cursor > 0 => {
                self.cursor -= 1;
                self.remove_at(self.cursor);
            }
            KeyCode::Delete if self.cursor < len => self.remove_at(self.cursor),
            KeyCode::Char(ch) if !ctrl => {
                let at = self.byte_at(self.cursor);
                self.query.insert(at, ch);
                self.cursor += 1;
            }
            _ => {}
        }
        InputResult::Editing
    }

    fn byte_at(&self, char_idx: usize) -> usize {
        self.query
            .char_indices()
            .nth(char_idx)
            .map_or(self.query.len(), |(b, _)| b)
    }

    fn remove_at(&mut self, char_idx: usize) {
        let at = self.byte_at(char_idx);
        if at < self.query.len() {
            self.query.remove(at);
        }
    }

    /// Unix word rubout: trailing whitespace, then the word before it.
    fn delete_word_back(&mut self) {
        let chars: Vec<char> = self.query.chars().collect();
        let mut start = self.cursor;
        while start > 0 && chars[start - 1].is_whitespace() {
            start -= 1;
        }
        while start > 0 && !chars[start - 1].is_whitespace() {
            start -= 1;
        }
        let (from, to) = (self.byte_at(start), self.byte_at(self.cursor));
        self.query.replace_range(from..to, "");
        self.cursor = start;
    }
}
