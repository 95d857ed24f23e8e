/// Parser configuration.
///
/// - `strip_value_quotes` unwraps condition values written as `'bat'` or `"bat"`.
///   Off by default: values are handed to the execution engine exactly as written.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParserConfig {
    /// Remove one pair of matching surrounding quotes from condition values
    pub strip_value_quotes: bool,
}

impl ParserConfig {
    /// Create default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Convenience: a config that unwraps quoted condition values.
    pub fn unquoted_values() -> Self {
        Self { strip_value_quotes: true }
    }

    /// Applies the value rules of this config to an already trimmed value.
    pub fn normalize_value(&self, value: &str) -> String {
        match Self::unquote(value) {
            Some(inner) if self.strip_value_quotes => inner.to_string(),
            _ => value.to_string(),
        }
    }

    /// Inner text of a value wrapped in one pair of matching `'` or `"` quotes.
    pub fn unquote(value: &str) -> Option<&str> {
        let mut chars = value.chars();
        match (chars.next(), chars.next_back()) {
            (Some(first), Some(last)) if first == last && Self::is_quote(first) => Some(chars.as_str()),
            _ => None,
        }
    }

    pub fn is_quote(ch: char) -> bool {
        ch == '\'' || ch == '"'
    }
}

#[cfg(test)]
mod tests {
    use crate::parser::ParserConfig;

    #[test]
    pub fn test_default_keeps_quotes() {
        let config = ParserConfig::new();
        assert_eq!(config.normalize_value("'bat'"), "'bat'");
    }

    #[test]
    pub fn test_unquoted_values() {
        let config = ParserConfig::unquoted_values();
        assert_eq!(config.normalize_value("'bat'"), "bat");
        assert_eq!(config.normalize_value("\"Royal Challengers\""), "Royal Challengers");
        assert_eq!(config.normalize_value("'mixed\""), "'mixed\"");
        assert_eq!(config.normalize_value("'"), "'");
        assert_eq!(config.normalize_value("2008"), "2008");
    }

    #[test]
    pub fn test_unquote() {
        assert_eq!(ParserConfig::unquote("'a = b'"), Some("a = b"));
        assert_eq!(ParserConfig::unquote("''"), Some(""));
        assert_eq!(ParserConfig::unquote("O'Brien"), None);
    }
}
