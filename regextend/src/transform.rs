//! Pattern rewriting for group offset tracking
//!
//! Before every capturing group an auxiliary lookahead is inserted that
//! captures the entire rest of the input. After a match, the offset of the
//! group it shadows is the input length minus the length of that capture.
//!
//! Every original group `n` ends up at host capture `2n`, with its
//! auxiliary capture at `2n - 1`. Numeric backreferences are renumbered to
//! match.

use crate::lexer::{Lexer, Token};

/// Lookahead inserted before each capturing group
pub const AUXILIARY_CAPTURE: &str = r"(?=([\s\S]*))";

/// A pattern rewritten with auxiliary captures
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transformed {
    /// The rewritten pattern
    pub pattern: String,
    /// Number of capturing groups in the original pattern
    pub group_count: usize,
}

impl Transformed {
    /// Number of captures the compiled pattern must report, including the
    /// full match
    pub fn expected_captures(&self) -> usize {
        1 + 2 * self.group_count
    }
}

/// Host capture index of original group `n`
fn shadowed_group_index(n: u32) -> u32 {
    n * 2
}

#[derive(Default)]
struct Accumulator {
    output: String,
    group_count: usize,
}

impl Accumulator {
    fn push(mut self, token: &Token, next_is_digit: bool) -> Self {
        match token {
            Token::GroupOpen => {
                self.group_count += 1;
                self.output.push_str(AUXILIARY_CAPTURE);
                self.output.push('(');
            }
            Token::Backref(n) => {
                let index = shadowed_group_index(*n);
                if next_is_digit {
                    self.output.push_str(&format!(r"(?:\{})", index));
                } else {
                    self.output.push_str(&format!(r"\{}", index));
                }
            }
            other => other.write_source(&mut self.output),
        }
        self
    }
}

/// Rewrite a pattern so every capturing group records its offset
///
/// # Example
/// ```
/// use regextend::transform;
///
/// let result = transform(r"a(bc)d?\1z");
/// assert_eq!(result.pattern, r"a(?=([\s\S]*))(bc)d?\2z");
/// assert_eq!(result.group_count, 1);
/// ```
pub fn transform(pattern: &str) -> Transformed {
    let mut lexer = Lexer::new(pattern);
    let mut acc = Accumulator::default();

    loop {
        let token = lexer.next_token();
        if token == Token::Eof {
            break;
        }
        acc = acc.push(&token, lexer.next_is_digit());
    }

    log::debug!(
        "transformed `{}` into `{}` ({} groups)",
        pattern,
        acc.output,
        acc.group_count
    );

    Transformed {
        pattern: acc.output,
        group_count: acc.group_count,
    }
}

/// Transform with verbose output for debugging
pub fn transform_debug(pattern: &str) -> TransformReport {
    let tokens = Lexer::new(pattern)
        .map(|token| token.to_string())
        .collect();
    let transformed = transform(pattern);

    TransformReport {
        input: pattern.to_string(),
        tokens,
        output: transformed.pattern,
        group_count: transformed.group_count,
    }
}

/// Result of a transformation with debug information
#[derive(Debug, Clone)]
pub struct TransformReport {
    /// The original pattern
    pub input: String,
    /// The tokens the lexer produced
    pub tokens: Vec<String>,
    /// The rewritten pattern
    pub output: String,
    /// Number of capturing groups found
    pub group_count: usize,
}

impl TransformReport {
    /// Print a formatted report of the transformation
    pub fn report(&self) {
        println!("Transformation Report");
        println!("=====================");
        println!("Input:  {}", self.input);
        println!("Tokens: {}", self.tokens.join(", "));
        println!("Groups: {}", self.group_count);
        println!("Output: {}", self.output);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn aux(rest: &str) -> String {
        format!("{}({}", AUXILIARY_CAPTURE, rest)
    }

    #[test]
    fn test_no_groups() {
        let result = transform("ab?c");
        assert_eq!(result.pattern, "ab?c");
        assert_eq!(result.group_count, 0);
    }

    #[test]
    fn test_empty() {
        assert_eq!(transform("").pattern, "");
    }

    #[test]
    fn test_each_group_is_shadowed() {
        let result = transform("ab?(cd)e(f)g");
        assert_eq!(
            result.pattern,
            format!("ab?{}e{}", aux("cd)"), aux("f)g"))
        );
        assert_eq!(result.group_count, 2);
        assert_eq!(result.expected_captures(), 5);
    }

    #[test]
    fn test_nested_groups() {
        let result = transform("((a)b)");
        assert_eq!(result.pattern, aux(&aux("a)b)")));
        assert_eq!(result.group_count, 2);
    }

    #[test]
    fn test_special_groups_untouched() {
        for pattern in ["(?:ab)", "a(?=b)", "a(?!b)", "(?<=a)b", "(?i)ab"] {
            let result = transform(pattern);
            assert_eq!(result.pattern, pattern);
            assert_eq!(result.group_count, 0);
        }
    }

    #[test]
    fn test_char_class_untouched() {
        let result = transform("ab[c(d]e(f)g");
        assert_eq!(result.pattern, format!("ab[c(d]e{}", aux("f)g")));
        assert_eq!(result.group_count, 1);
    }

    #[test]
    fn test_escaped_bracket_exposes_group() {
        let result = transform(r"ab\[c(d]e)(f)g");
        assert_eq!(result.group_count, 2);
        assert!(result.pattern.starts_with(r"ab\[c(?=("));
    }

    #[test]
    fn test_escaped_paren_untouched() {
        let result = transform(r"a\(b\)");
        assert_eq!(result.pattern, r"a\(b\)");
        assert_eq!(result.group_count, 0);
    }

    #[test]
    fn test_escaped_backslash_before_group() {
        let result = transform(r"\\(a)");
        assert_eq!(result.pattern, format!(r"\\{}", aux("a)")));
    }

    #[test]
    fn test_backref_renumbered() {
        assert_eq!(transform(r"a(bc)d?\1z").pattern, format!("a{}d?\\2z", aux("bc)")));
    }

    #[test]
    fn test_backref_to_earlier_group() {
        let result = transform(r"(a)(b)\1\2");
        assert_eq!(result.pattern, format!(r"{}{}\2\4", aux("a)"), aux("b)")));
    }

    #[test]
    fn test_backref_followed_by_digit() {
        let result = transform(r"(a)\1\123");
        assert_eq!(result.pattern, format!(r"{}\2(?:\24)3", aux("a)")));
    }

    #[test]
    fn test_escaped_zero_untouched() {
        assert_eq!(transform(r"(a)\0").pattern, format!(r"{}\0", aux("a)")));
    }

    #[test]
    fn test_deterministic() {
        let pattern = r"(x)[(]\((y)\2";
        assert_eq!(transform(pattern), transform(pattern));
    }

    #[test]
    fn test_transform_debug() {
        let report = transform_debug("a(b)");
        assert_eq!(report.input, "a(b)");
        assert_eq!(report.output, format!("a{}", aux("b)")));
        assert_eq!(report.group_count, 1);
        assert_eq!(report.tokens.len(), 4);
    }
}
