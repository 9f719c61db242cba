use ropey::Rope;

pub struct TextBuffer {
    content: Rope,
}

impl TextBuffer {
    pub fn new() -> Self {
        Self {
            content: Rope::new(),
        }
    }

    pub fn insert_char(&mut self, ch: char) {
        let end = self.content.len_chars();
        self.content.insert_char(end, ch);
    }

    pub fn insert_newline(&mut self) {
        self.insert_char('\n');
    }

    pub fn delete_last(&mut self) {
        let end = self.content.len_chars();
        if end > 0 {
            self.content.remove(end - 1..end);
        }
    }

    pub fn append_run(&mut self, run: &str) {
        let end = self.content.len_chars();
        self.content.insert(end, run);
    }

    pub fn current_value(&self) -> String {
        self.content.to_string()
    }

    // Rope clones share storage, so handing out a snapshot is cheap.
    pub fn snapshot(&self) -> Rope {
        self.content.clone()
    }
}
