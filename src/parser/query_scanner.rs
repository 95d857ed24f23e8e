use crate::parser::QueryComparers;

/// Character cursor over a raw query string.
#[derive(Debug, Default)]
pub struct QueryScanner {
    pub position: usize,
    pub length: usize,
    pub text_v: Vec<char>,
    pub text: String,

    pub comparers: QueryComparers,
}

impl QueryScanner {
    pub fn new(query: &str) -> Self {
        let text_v: Vec<char> = query.chars().collect();
        Self {
            position: 0,
            length: text_v.len(),
            text_v,
            text: query.to_string(),
            comparers: QueryComparers::new(),
        }
    }

    pub fn eof(&self) -> bool {
        self.position >= self.length
    }

    pub fn current(&self) -> char {
        self.char_at(self.position)
    }

    pub fn char_at(&self, position: usize) -> char {
        if position < self.length {
            return self.text_v[position];
        }

        '\0'
    }

    pub fn next(&mut self) {
        self.position += 1;
    }

    pub fn next_non_whitespace(&mut self) {
        while !self.eof() && self.current().is_whitespace() {
            self.next();
        }
    }

    pub fn jump_to(&mut self, position: usize) {
        self.position = position.min(self.length);
    }

    pub fn text_from_range(&self, start: usize, end: usize) -> String {
        let end = end.min(self.length);
        if start >= end {
            return String::new();
        }
        self.text_v[start..end].iter().collect()
    }

    pub fn text_from_pivot(&self, pivot: usize) -> String {
        self.text_from_range(pivot, self.position)
    }

    /// Identifier characters; a keyword touching one of these is part of a longer name.
    pub fn is_word_char(ch: char) -> bool {
        ch.is_alphanumeric() || ch == '_'
    }
}
