use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// What the parent should do after a key reached the dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogOutcome {
    Pending,
    Save(String),
    Cancel,
    Delete,
}

/// Title prompt. Only holds the draft; the parent decides what a save means.
pub struct NoteDialog {
    heading: String,
    allow_delete: bool,
    draft: FieldValue,
}

impl NoteDialog {
    pub fn new(heading: impl Into<String>, initial: &str, allow_delete: bool) -> Self {
        NoteDialog {
            heading: heading.into(),
            allow_delete,
            draft: FieldValue::new(initial),
        }
    }

    pub fn heading(&self) -> &str {
        &self.heading
    }

    pub fn allows_delete(&self) -> bool {
        self.allow_delete
    }

    pub fn draft(&self) -> &FieldValue {
        &self.draft
    }

    /// Hands out the draft and leaves the field empty.
    pub fn save(&mut self) -> String {
        self.draft.take()
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> DialogOutcome {
        let control = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Esc => DialogOutcome::Cancel,
            KeyCode::Enter => DialogOutcome::Save(self.save()),
            KeyCode::Char('d') if control && self.allow_delete => DialogOutcome::Delete,
            code => {
                self.draft.apply(code, key.modifiers);
                DialogOutcome::Pending
            }
        }
    }
}

/// Single-line text field with a byte cursor kept on char boundaries.
#[derive(Clone, Debug, Default)]
pub struct FieldValue {
    pub value: String,
    cursor: usize,
}

impl FieldValue {
    pub fn new(value: &str) -> Self {
        FieldValue {
            value: value.to_string(),
            cursor: value.len(),
        }
    }

    /// Applies an editing key; returns whether the text changed.
    pub fn apply(&mut self, code: KeyCode, modifiers: KeyModifiers) -> bool {
        match code {
            KeyCode::Left => self.move_left(),
            KeyCode::Right => self.move_right(),
            KeyCode::Home => self.cursor = 0,
            KeyCode::End => self.cursor = self.value.len(),
            KeyCode::Backspace => return self.backspace(),
            KeyCode::Delete => return self.delete(),
            KeyCode::Char(c) => {
                if !modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) {
                    self.insert_char(c);
                    return true;
                }
            }
            _ => {}
        }
        false
    }

    pub fn with_caret(&self) -> String {
        let mut text = self.value.clone();
        text.insert_str(self.cursor, "▌");
        text
    }

    fn take(&mut self) -> String {
        self.cursor = 0;
        std::mem::take(&mut self.value)
    }

    fn move_left(&mut self) {
        if self.cursor == 0 {
            return;
        }
        self.cursor = prev_boundary(self.cursor, &self.value);
    }

    fn move_right(&mut self) {
        if self.cursor >= self.value.len() {
            return;
        }
        self.cursor = next_boundary(self.cursor, &self.value);
    }

    fn backspace(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        let prev = prev_boundary(self.cursor, &self.value);
        self.value.drain(prev..self.cursor);
        self.cursor = prev;
        true
    }

    fn delete(&mut self) -> bool {
        if self.cursor >= self.value.len() {
            return false;
        }
        let next = next_boundary(self.cursor, &self.value);
        self.value.drain(self.cursor..next);
        true
    }

    fn insert_char(&mut self, ch: char) {
        self.value.insert(self.cursor, ch);
        self.cursor += ch.len_utf8();
    }
}

fn prev_boundary(cursor: usize, text: &str) -> usize {
    text[..cursor]
        .char_indices()
        .next_back()
        .map(|(idx, _)| idx)
        .unwrap_or(0)
}

fn next_boundary(cursor: usize, text: &str) -> usize {
    text[cursor..]
        .chars()
        .next()
        .map(|ch| cursor + ch.len_utf8())
        .unwrap_or(text.len())
}
