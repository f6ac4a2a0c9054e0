//! Replacement string handling
//!
//! Replacement templates use the `$` syntax of the host dialect:
//! - `$1` .. `$99` for numbered groups
//! - `$&` for the entire match
//! - `` $` `` and `$'` for the input before and after the match
//! - `$$` for a literal dollar sign
//!
//! Any other `$` is kept as literal text.

use crate::engine::ExtendedMatch;

/// A part of a replacement string
#[derive(Debug, Clone, PartialEq)]
pub enum ReplacementPart {
    /// Literal text
    Literal(String),
    /// Single digit group reference (`$1`)
    Group(u32),
    /// Two digit group reference (`$12`), which falls back to a single digit
    /// followed by a literal digit when the group does not exist
    TwoDigitGroup(u32),
    /// Entire match (`$&`)
    EntireMatch,
    /// Input before the match (`` $` ``)
    Prefix,
    /// Input after the match (`$'`)
    Suffix,
}

/// A parsed replacement string
#[derive(Debug, Clone, PartialEq)]
pub struct Replacement {
    parts: Vec<ReplacementPart>,
}

impl Replacement {
    /// Parse a replacement string
    pub fn parse(input: &str) -> Self {
        let mut parts = Vec::new();
        let mut chars = input.chars().peekable();
        let mut current_literal = String::new();

        while let Some(c) = chars.next() {
            if c != '$' {
                current_literal.push(c);
                continue;
            }

            let part = match chars.peek().copied() {
                Some('$') => {
                    chars.next();
                    current_literal.push('$');
                    continue;
                }
                Some('&') => ReplacementPart::EntireMatch,
                Some('`') => ReplacementPart::Prefix,
                Some('\'') => ReplacementPart::Suffix,
                Some(d) if d.is_ascii_digit() => {
                    chars.next();
                    let first = d.to_digit(10).unwrap_or(0);
                    match chars.peek().and_then(|c| c.to_digit(10)) {
                        Some(second) => {
                            chars.next();
                            push_part(
                                &mut parts,
                                &mut current_literal,
                                ReplacementPart::TwoDigitGroup(first * 10 + second),
                            );
                        }
                        None => push_part(
                            &mut parts,
                            &mut current_literal,
                            ReplacementPart::Group(first),
                        ),
                    }
                    continue;
                }
                // Lone dollar sign
                _ => {
                    current_literal.push('$');
                    continue;
                }
            };
            chars.next();
            push_part(&mut parts, &mut current_literal, part);
        }

        // Don't forget the last literal
        if !current_literal.is_empty() {
            parts.push(ReplacementPart::Literal(current_literal));
        }

        Replacement { parts }
    }

    /// Apply the replacement to a match
    pub fn apply(&self, m: &ExtendedMatch<'_>) -> String {
        let mut result = String::new();
        self.apply_to(m, &mut result);
        result
    }

    /// Append the replacement for a match to `dst`
    pub fn apply_to(&self, m: &ExtendedMatch<'_>, dst: &mut String) {
        let group_count = m.len().saturating_sub(1) as u32;
        let group = |n: u32| m.get(n as usize).unwrap_or("");

        for part in &self.parts {
            match part {
                ReplacementPart::Literal(text) => dst.push_str(text),
                ReplacementPart::Group(n) => {
                    if (1..=group_count).contains(n) {
                        dst.push_str(group(*n));
                    } else {
                        dst.push_str(&format!("${}", n));
                    }
                }
                ReplacementPart::TwoDigitGroup(nn) => {
                    let (first, second) = (nn / 10, nn % 10);
                    if (1..=group_count).contains(nn) {
                        dst.push_str(group(*nn));
                    } else if (1..=group_count).contains(&first) {
                        dst.push_str(group(first));
                        dst.push_str(&second.to_string());
                    } else {
                        dst.push_str(&format!("${:02}", nn));
                    }
                }
                ReplacementPart::EntireMatch => dst.push_str(m.as_str()),
                ReplacementPart::Prefix => dst.push_str(&m.input()[..m.index()]),
                ReplacementPart::Suffix => dst.push_str(&m.input()[m.end()..]),
            }
        }
    }

    /// Get the parts of the replacement
    pub fn parts(&self) -> &[ReplacementPart] {
        &self.parts
    }
}

fn push_part(parts: &mut Vec<ReplacementPart>, literal: &mut String, part: ReplacementPart) {
    if !literal.is_empty() {
        parts.push(ReplacementPart::Literal(std::mem::take(literal)));
    }
    parts.push(part);
}

/// Something that can produce the text substituted for a match
///
/// Implemented for replacement templates (`&str`, `String`, [`Replacement`])
/// and for closures taking the match.
pub trait Replacer {
    /// Append the replacement for `m` to `dst`
    fn replace_append(&mut self, m: &ExtendedMatch<'_>, dst: &mut String);
}

impl Replacer for &str {
    fn replace_append(&mut self, m: &ExtendedMatch<'_>, dst: &mut String) {
        Replacement::parse(*self).apply_to(m, dst);
    }
}

impl Replacer for &String {
    fn replace_append(&mut self, m: &ExtendedMatch<'_>, dst: &mut String) {
        self.as_str().replace_append(m, dst);
    }
}

impl Replacer for String {
    fn replace_append(&mut self, m: &ExtendedMatch<'_>, dst: &mut String) {
        self.as_str().replace_append(m, dst);
    }
}

impl Replacer for Replacement {
    fn replace_append(&mut self, m: &ExtendedMatch<'_>, dst: &mut String) {
        self.apply_to(m, dst);
    }
}

impl Replacer for &Replacement {
    fn replace_append(&mut self, m: &ExtendedMatch<'_>, dst: &mut String) {
        self.apply_to(m, dst);
    }
}

impl<F, T> Replacer for F
where
    F: FnMut(&ExtendedMatch<'_>) -> T,
    T: AsRef<str>,
{
    fn replace_append(&mut self, m: &ExtendedMatch<'_>, dst: &mut String) {
        dst.push_str((*self)(m).as_ref());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// "start abc end" matching "abc" at 6, with group 1 = "b" at 7
    fn sample() -> ExtendedMatch<'static> {
        ExtendedMatch::new(
            "start abc end",
            6,
            vec![Some("abc"), Some("b")],
            vec![Some(6), Some(7)],
        )
    }

    #[test]
    fn test_parse_literal() {
        let repl = Replacement::parse("hello");
        assert_eq!(repl.parts(), &[ReplacementPart::Literal("hello".to_string())]);
    }

    #[test]
    fn test_parse_group() {
        let repl = Replacement::parse("z$1z");
        assert_eq!(
            repl.parts(),
            &[
                ReplacementPart::Literal("z".to_string()),
                ReplacementPart::Group(1),
                ReplacementPart::Literal("z".to_string()),
            ]
        );
    }

    #[test]
    fn test_parse_two_digits() {
        let repl = Replacement::parse("$12");
        assert_eq!(repl.parts(), &[ReplacementPart::TwoDigitGroup(12)]);
    }

    #[test]
    fn test_parse_specials() {
        let repl = Replacement::parse("$&$`$'");
        assert_eq!(
            repl.parts(),
            &[
                ReplacementPart::EntireMatch,
                ReplacementPart::Prefix,
                ReplacementPart::Suffix,
            ]
        );
    }

    #[test]
    fn test_parse_dollar_escapes() {
        let repl = Replacement::parse("$$1 costs $");
        assert_eq!(
            repl.parts(),
            &[ReplacementPart::Literal("$1 costs $".to_string())]
        );
    }

    #[test]
    fn test_apply_group() {
        assert_eq!(Replacement::parse("z$1z").apply(&sample()), "zbz");
    }

    #[test]
    fn test_apply_entire_match() {
        assert_eq!(Replacement::parse("[$&]").apply(&sample()), "[abc]");
    }

    #[test]
    fn test_apply_prefix_suffix() {
        assert_eq!(Replacement::parse("<$`|$'>").apply(&sample()), "<start | end>");
    }

    #[test]
    fn test_apply_missing_group_is_literal() {
        assert_eq!(Replacement::parse("$2").apply(&sample()), "$2");
        assert_eq!(Replacement::parse("$0").apply(&sample()), "$0");
    }

    #[test]
    fn test_apply_two_digit_fallback() {
        // Only one group, so `$10` is group 1 followed by `0`
        assert_eq!(Replacement::parse("$10").apply(&sample()), "b0");
        assert_eq!(Replacement::parse("$01").apply(&sample()), "b");
        assert_eq!(Replacement::parse("$20").apply(&sample()), "$20");
    }

    #[test]
    fn test_apply_unmatched_group_is_empty() {
        let m = ExtendedMatch::new("xy", 0, vec![Some("x"), None], vec![Some(0), None]);
        assert_eq!(Replacement::parse("[$1]").apply(&m), "[]");
    }

    #[test]
    fn test_closure_replacer() {
        let mut upper = |m: &ExtendedMatch<'_>| m.as_str().to_uppercase();
        let mut out = String::new();
        upper.replace_append(&sample(), &mut out);
        assert_eq!(out, "ABC");
    }

    #[test]
    fn test_str_replacer() {
        let mut out = String::from(">");
        "$1!".replace_append(&sample(), &mut out);
        assert_eq!(out, ">b!");
    }
}
