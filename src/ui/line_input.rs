use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputResult {
    Continue,
    Submit,
    Cancel,
}

/// Single-line text editor with readline-ish bindings and Tab completion
/// over a fixed candidate list (category names, theme names).
pub struct LineInput {
    text: String,
    /// Cursor position as a char index (0 = before first char).
    cursor: usize,
    candidates: Vec<String>,
    completion_matches: Vec<String>,
    completion_index: Option<usize>,
    /// Text snapshot when Tab was first pressed.
    completion_seed: String,
}

impl LineInput {
    pub fn new(text: &str) -> Self {
        Self::with_candidates(text, Vec::new())
    }

    pub fn with_candidates(text: &str, candidates: Vec<String>) -> Self {
        let cursor = text.chars().count();
        Self {
            text: text.to_string(),
            cursor,
            candidates,
            completion_matches: Vec::new(),
            completion_index: None,
            completion_seed: String::new(),
        }
    }

    pub fn value(&self) -> &str {
        &self.text
    }

    /// Returns (before_cursor, cursor_char, after_cursor) for styled
    /// rendering. When the cursor sits at the end, cursor_char is None.
    pub fn render_parts(&self) -> (&str, Option<char>, &str) {
        let byte_offset = self.char_to_byte(self.cursor);
        if self.cursor >= self.text.chars().count() {
            (&self.text, None, "")
        } else {
            let ch = self.text[byte_offset..].chars().next().unwrap();
            let next_byte = byte_offset + ch.len_utf8();
            (&self.text[..byte_offset], Some(ch), &self.text[next_byte..])
        }
    }

    pub fn handle(&mut self, key: KeyEvent) -> InputResult {
        match key.code {
            KeyCode::Esc => return InputResult::Cancel,
            KeyCode::Enter => return InputResult::Submit,

            KeyCode::Left => {
                self.reset_completion();
                if self.cursor > 0 {
                    self.cursor -= 1;
                }
            }
            KeyCode::Right => {
                self.reset_completion();
                let len = self.text.chars().count();
                if self.cursor < len {
                    self.cursor += 1;
                }
            }
            KeyCode::Home => {
                self.reset_completion();
                self.cursor = 0;
            }
            KeyCode::End => {
                self.reset_completion();
                self.cursor = self.text.chars().count();
            }
            KeyCode::Backspace => {
                self.reset_completion();
                if self.cursor > 0 {
                    let byte_offset = self.char_to_byte(self.cursor - 1);
                    let ch = self.text[byte_offset..].chars().next().unwrap();
                    self.text.replace_range(byte_offset..byte_offset + ch.len_utf8(), "");
                    self.cursor -= 1;
                }
            }
            KeyCode::Delete => {
                self.reset_completion();
                let len = self.text.chars().count();
                if self.cursor < len {
                    let byte_offset = self.char_to_byte(self.cursor);
                    let ch = self.text[byte_offset..].chars().next().unwrap();
                    self.text.replace_range(byte_offset..byte_offset + ch.len_utf8(), "");
                }
            }
            KeyCode::Tab => {
                self.tab_complete(true);
            }
            KeyCode::BackTab => {
                self.tab_complete(false);
            }
            KeyCode::Char('a') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.reset_completion();
                self.cursor = 0;
            }
            KeyCode::Char('e') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.reset_completion();
                self.cursor = self.text.chars().count();
            }
            KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.reset_completion();
                self.text.clear();
                self.cursor = 0;
            }
            KeyCode::Char('w') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.reset_completion();
                self.delete_word_back();
            }
            KeyCode::Char(ch) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.reset_completion();
                let byte_offset = self.char_to_byte(self.cursor);
                self.text.insert(byte_offset, ch);
                self.cursor += 1;
            }
            _ => {}
        }
        InputResult::Continue
    }

    /// Cycle through candidates whose prefix matches the text as it was
    /// when Tab was first pressed. BackTab cycles the other way.
    fn tab_complete(&mut self, forward: bool) {
        if self.candidates.is_empty() {
            return;
        }
        if self.completion_index.is_none() {
            self.completion_seed = self.text.clone();
            let seed = self.completion_seed.to_lowercase();
            self.completion_matches = self
                .candidates
                .iter()
                .filter(|c| c.to_lowercase().starts_with(&seed))
                .cloned()
                .collect();
        }
        if self.completion_matches.is_empty() {
            return;
        }

        let next = match self.completion_index {
            None => {
                if forward {
                    0
                } else {
                    self.completion_matches.len() - 1
                }
            }
            Some(current) => {
                if forward {
                    (current + 1) % self.completion_matches.len()
                } else if current == 0 {
                    self.completion_matches.len() - 1
                } else {
                    current - 1
                }
            }
        };
        self.completion_index = Some(next);
        self.text = self.completion_matches[next].clone();
        self.cursor = self.text.chars().count();
    }

    fn reset_completion(&mut self) {
        self.completion_index = None;
        self.completion_matches.clear();
        self.completion_seed.clear();
    }

    /// Convert char index to byte offset.
    fn char_to_byte(&self, char_idx: usize) -> usize {
        self.text
            .char_indices()
            .nth(char_idx)
            .map(|(b, _)| b)
            .unwrap_or(self.text.len())
    }

    /// Delete word before cursor (skip whitespace, then non-whitespace).
    fn delete_word_back(&mut self) {
        let chars: Vec<char> = self.text.chars().collect();
        let mut new_cursor = self.cursor;
        while new_cursor > 0 && chars[new_cursor - 1].is_whitespace() {
            new_cursor -= 1;
        }
        while new_cursor > 0 && !chars[new_cursor - 1].is_whitespace() {
            new_cursor -= 1;
        }
        let start = self.char_to_byte(new_cursor);
        let end = self.char_to_byte(self.cursor);
        self.text.replace_range(start..end, "");
        self.cursor = new_cursor;
    }
}
