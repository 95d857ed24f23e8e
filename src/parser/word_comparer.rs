use crate::parser::QueryScanner;

/// Case-insensitive matcher for a single clause keyword.
///
/// A space inside the keyword (`GROUP BY`) accepts any run of whitespace in the
/// query. Matches that touch an identifier character on either side are rejected,
/// so `from_date` never matches `FROM`.
#[derive(Debug, Default)]
pub struct WordComparer {
    pub word: Vec<char>,
    pub text: String,
}

impl WordComparer {
    pub fn new(word: &str) -> Self {
        let word: Vec<char> = word.to_uppercase().chars().collect();
        Self {
            text: word.iter().collect::<String>().to_lowercase(),
            word,
        }
    }

    /// Matches the keyword starting exactly at `position` and returns the end of the match.
    pub fn compare(&self, scanner: &QueryScanner, position: usize) -> Option<usize> {
        if position > 0 && QueryScanner::is_word_char(scanner.char_at(position - 1)) {
            return None;
        }

        let mut cursor = position;
        for &expected in self.word.iter() {
            if cursor >= scanner.length {
                return None;
            }

            if expected == ' ' {
                if !scanner.char_at(cursor).is_whitespace() {
                    return None;
                }
                while cursor < scanner.length && scanner.char_at(cursor).is_whitespace() {
                    cursor += 1;
                }
                continue;
            }

            if !scanner.char_at(cursor).to_uppercase().eq(expected.to_uppercase()) {
                return None;
            }
            cursor += 1;
        }

        if cursor < scanner.length && QueryScanner::is_word_char(scanner.char_at(cursor)) {
            return None;
        }

        Some(cursor)
    }

    /// Same as [`compare`](Self::compare) at the scanner's current position.
    pub fn compare_current(&self, scanner: &QueryScanner) -> Option<usize> {
        self.compare(scanner, scanner.position)
    }

    /// First standalone occurrence at or after `from`, as `(start, end)`.
    pub fn find(&self, scanner: &QueryScanner, from: usize) -> Option<(usize, usize)> {
        (from..scanner.length)
            .find_map(|start| self.compare(scanner, start).map(|end| (start, end)))
    }
}
