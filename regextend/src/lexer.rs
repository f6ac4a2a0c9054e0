//! Lexer for locating capturing groups in regex patterns
//!
//! This is not a full regex tokenizer. It only distinguishes the constructs
//! that matter for rewriting a pattern: real capturing-group parentheses,
//! numeric backreferences, and character classes (whose contents are never
//! group delimiters). Everything else passes through as literals or escapes.
//!
//! The lexer is a small state machine with three states: default,
//! in-character-class, and in-escape.

use std::fmt;

/// A token in a regex pattern
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// Any character with no meaning for group detection
    Literal(char),
    /// An escaped character other than a backreference (e.g. `\(`, `\d`, `\0`)
    Escape(char),
    /// A numeric backreference of one or two digits (`\1` .. `\99`)
    Backref(u32),
    /// A complete character class including its brackets
    CharClass(String),
    /// Left parenthesis of a capturing group `(`
    GroupOpen,
    /// Left parenthesis followed by `?`, i.e. `(?` (non-capturing groups,
    /// lookarounds, inline flags, named groups)
    SpecialGroupOpen,
    /// End of input
    Eof,
}

impl Token {
    /// Write the pattern text this token was read from
    pub fn write_source(&self, out: &mut String) {
        match self {
            Token::Literal(c) => out.push(*c),
            Token::Escape(c) => {
                out.push('\\');
                out.push(*c);
            }
            Token::Backref(n) => {
                out.push('\\');
                out.push_str(&n.to_string());
            }
            Token::CharClass(class) => out.push_str(class),
            Token::GroupOpen => out.push('('),
            Token::SpecialGroupOpen => out.push_str("(?"),
            Token::Eof => {}
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Literal(c) => write!(f, "literal `{}`", c),
            Token::Escape(c) => write!(f, "escape `\\{}`", c),
            Token::Backref(n) => write!(f, "backref `\\{}`", n),
            Token::CharClass(class) => write!(f, "class `{}`", class),
            Token::GroupOpen => write!(f, "`(`"),
            Token::SpecialGroupOpen => write!(f, "`(?`"),
            Token::Eof => write!(f, "EOF"),
        }
    }
}

/// Lexer over a regex pattern
pub struct Lexer {
    chars: Vec<char>,
    position: usize,
}

impl Lexer {
    /// Create a new lexer for the given pattern
    pub fn new(input: &str) -> Self {
        Lexer {
            chars: input.chars().collect(),
            position: 0,
        }
    }

    fn current(&self) -> Option<char> {
        self.chars.get(self.position).copied()
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.position + 1).copied()
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.current();
        if c.is_some() {
            self.position += 1;
        }
        c
    }

    /// Read an escape sequence (assumes the backslash was already consumed)
    fn read_escape(&mut self) -> Token {
        match self.advance() {
            Some(c @ '1'..='9') => {
                let mut num = c.to_digit(10).unwrap_or(0);
                if let Some(d) = self.current().and_then(|c| c.to_digit(10)) {
                    self.advance();
                    num = num * 10 + d;
                }
                Token::Backref(num)
            }
            Some(c) => Token::Escape(c),
            // Trailing backslash, left for the host engine to reject
            None => Token::Literal('\\'),
        }
    }

    /// Read a character class (assumes `[` is the current character)
    ///
    /// Follows the host dialect: a `]` right after `[` or `[^` is a member,
    /// escapes are skipped in pairs, `[:name:]` is consumed whole, and a
    /// nested `[` opens an inner class.
    fn read_char_class(&mut self) -> Token {
        let start = self.position;
        let mut depth = 0usize;

        while let Some(c) = self.advance() {
            match c {
                '[' => {
                    if depth > 0 && self.current() == Some(':') && self.skip_posix_class() {
                        continue;
                    }
                    depth += 1;
                    if self.current() == Some('^') {
                        self.advance();
                    }
                    if self.current() == Some(']') {
                        self.advance();
                    }
                }
                '\\' => {
                    self.advance();
                }
                ']' => {
                    depth -= 1;
                    if depth == 0 {
                        break;
                    }
                }
                _ => {}
            }
        }

        Token::CharClass(self.chars[start..self.position].iter().collect())
    }

    /// Skip a `[:name:]` class whose `[` was just consumed
    fn skip_posix_class(&mut self) -> bool {
        let rest = &self.chars[self.position..];
        match rest.windows(2).position(|w| w == [':', ']']) {
            Some(end) if end > 0 => {
                self.position += end + 2;
                true
            }
            _ => false,
        }
    }

    /// Get the next token from the input
    pub fn next_token(&mut self) -> Token {
        match self.current() {
            None => Token::Eof,
            Some('\\') => {
                self.advance(); // consume backslash
                self.read_escape()
            }
            Some('[') => self.read_char_class(),
            Some('(') => {
                self.advance();
                if self.current() == Some('?') {
                    self.advance();
                    Token::SpecialGroupOpen
                } else {
                    Token::GroupOpen
                }
            }
            Some(c) => {
                self.advance();
                Token::Literal(c)
            }
        }
    }

    /// Whether the next token starts with an ASCII digit
    pub fn next_is_digit(&self) -> bool {
        self.current().is_some_and(|c| c.is_ascii_digit())
    }

    /// Tokenize the entire input and return a vector of tokens
    pub fn tokenize(&mut self) -> Vec<Token> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token();
            if token == Token::Eof {
                tokens.push(token);
                break;
            }
            tokens.push(token);
        }
        tokens
    }
}

impl Iterator for Lexer {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        match self.next_token() {
            Token::Eof => None,
            token => Some(token),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lex(input: &str) -> Vec<Token> {
        Lexer::new(input).tokenize()
    }

    #[test]
    fn test_literals_and_group() {
        assert_eq!(
            lex("a(b)"),
            vec![
                Token::Literal('a'),
                Token::GroupOpen,
                Token::Literal('b'),
                Token::Literal(')'),
                Token::Eof,
            ]
        );
    }

    #[test]
    fn test_special_groups() {
        for pattern in ["(?:a)", "(?=a)", "(?!a)", "(?<=a)", "(?<n>a)", "(?i)"] {
            let tokens = lex(pattern);
            assert_eq!(tokens[0], Token::SpecialGroupOpen, "pattern {}", pattern);
            assert!(!tokens.contains(&Token::GroupOpen), "pattern {}", pattern);
        }
    }

    #[test]
    fn test_escaped_paren_is_not_a_group() {
        assert_eq!(
            lex(r"\(a"),
            vec![Token::Escape('('), Token::Literal('a'), Token::Eof]
        );
    }

    #[test]
    fn test_escaped_backslash_then_group() {
        assert_eq!(
            lex(r"\\(a)"),
            vec![
                Token::Escape('\\'),
                Token::GroupOpen,
                Token::Literal('a'),
                Token::Literal(')'),
                Token::Eof,
            ]
        );
    }

    #[test]
    fn test_backrefs() {
        assert_eq!(lex(r"\1"), vec![Token::Backref(1), Token::Eof]);
        assert_eq!(lex(r"\12"), vec![Token::Backref(12), Token::Eof]);
        assert_eq!(
            lex(r"\123"),
            vec![Token::Backref(12), Token::Literal('3'), Token::Eof]
        );
    }

    #[test]
    fn test_escaped_zero_is_not_a_backref() {
        assert_eq!(lex(r"\0"), vec![Token::Escape('0'), Token::Eof]);
    }

    #[test]
    fn test_char_class_hides_parens() {
        assert_eq!(
            lex("[c(d]e"),
            vec![
                Token::CharClass("[c(d]".to_string()),
                Token::Literal('e'),
                Token::Eof,
            ]
        );
    }

    #[test]
    fn test_escaped_bracket_is_not_a_class() {
        let tokens = lex(r"\[c(d]");
        assert_eq!(tokens[0], Token::Escape('['));
        assert_eq!(tokens[2], Token::GroupOpen);
    }

    #[test]
    fn test_leading_bracket_is_a_member() {
        assert_eq!(
            lex("[]a(]("),
            vec![
                Token::CharClass("[]a(]".to_string()),
                Token::GroupOpen,
                Token::Eof,
            ]
        );
        assert_eq!(lex("[^](]")[0], Token::CharClass("[^](]".to_string()));
    }

    #[test]
    fn test_escaped_bracket_inside_class() {
        assert_eq!(
            lex(r"[\](](")[0],
            Token::CharClass(r"[\](]".to_string())
        );
    }

    #[test]
    fn test_nested_and_posix_classes() {
        assert_eq!(lex("[a[(]]")[0], Token::CharClass("[a[(]]".to_string()));
        assert_eq!(
            lex("[[:alpha:](]")[0],
            Token::CharClass("[[:alpha:](]".to_string())
        );
    }

    #[test]
    fn test_unterminated_class_runs_to_end() {
        assert_eq!(
            lex("[a(b"),
            vec![Token::CharClass("[a(b".to_string()), Token::Eof]
        );
    }

    #[test]
    fn test_trailing_backslash() {
        assert_eq!(
            lex("a\\"),
            vec![Token::Literal('a'), Token::Literal('\\'), Token::Eof]
        );
    }

    #[test]
    fn test_write_source_round_trips() {
        let pattern = r"a(?:b)[c(]\(\1(d)\\";
        let mut out = String::new();
        for token in Lexer::new(pattern) {
            token.write_source(&mut out);
        }
        assert_eq!(out, pattern);
    }
}
