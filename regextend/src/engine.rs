//! Matching with group offsets
//!
//! [`ExtendedRegex`] compiles a rewritten pattern with the host engine and
//! turns each raw match into an [`ExtendedMatch`] carrying the offset of
//! every capturing group.

use std::fmt;

use fancy_regex::Regex;

use crate::error::{RegexError, Result};
use crate::flags::Flags;
use crate::replace::Replacer;
use crate::transform::{Transformed, transform};

/// A match result with group offsets
///
/// Group 0 is the full match, followed by the groups of the original
/// pattern in declaration order. Auxiliary captures never appear here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtendedMatch<'t> {
    input: &'t str,
    index: usize,
    groups: Vec<Option<&'t str>>,
    offsets: Vec<Option<usize>>,
}

impl<'t> ExtendedMatch<'t> {
    pub(crate) fn new(
        input: &'t str,
        index: usize,
        groups: Vec<Option<&'t str>>,
        offsets: Vec<Option<usize>>,
    ) -> Self {
        ExtendedMatch {
            input,
            index,
            groups,
            offsets,
        }
    }

    /// Build a match from positions reported by a regex without auxiliary
    /// captures, where group offsets are the native start positions.
    fn from_positions(input: &'t str, positions: &[Option<(usize, usize)>]) -> Self {
        let groups = positions
            .iter()
            .map(|pos| pos.map(|(start, end)| &input[start..end]))
            .collect();
        let offsets: Vec<Option<usize>> = positions
            .iter()
            .map(|pos| pos.map(|(start, _)| start))
            .collect();
        ExtendedMatch {
            input,
            index: offsets.first().copied().flatten().unwrap_or(0),
            groups,
            offsets,
        }
    }

    /// The string the match was found in
    pub fn input(&self) -> &'t str {
        self.input
    }

    /// Start offset of the full match
    pub fn index(&self) -> usize {
        self.index
    }

    /// End offset of the full match (exclusive)
    pub fn end(&self) -> usize {
        self.index + self.as_str().len()
    }

    /// The matched text
    pub fn as_str(&self) -> &'t str {
        self.get(0).unwrap_or("")
    }

    /// Get the text of a group (0 is the full match)
    pub fn get(&self, n: usize) -> Option<&'t str> {
        self.groups.get(n).copied().flatten()
    }

    /// Number of entries, the full match included
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Always false for a real match, which has at least the full match
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Iterate over the full match and every group
    pub fn iter(&self) -> impl Iterator<Item = Option<&'t str>> + '_ {
        self.groups.iter().copied()
    }

    /// Offsets of the full match and every group
    ///
    /// `None` marks a group that did not participate in the match.
    pub fn offsets(&self) -> &[Option<usize>] {
        &self.offsets
    }

    /// Offset of a group (0 is the full match)
    pub fn offset(&self, n: usize) -> Option<usize> {
        self.offsets.get(n).copied().flatten()
    }
}

/// A regex that records the offset of each capturing group
pub struct ExtendedRegex {
    pattern: String,
    flags: Flags,
    transformed: Transformed,
    native: Regex,
    last_index: usize,
}

impl ExtendedRegex {
    /// Compile a pattern with the given flags
    ///
    /// # Example
    /// ```
    /// use regextend::ExtendedRegex;
    ///
    /// let mut regex = ExtendedRegex::new("ab?(cd)e(f)g", "").unwrap();
    /// let m = regex.exec("start acdefg").unwrap().unwrap();
    /// assert_eq!(m.offsets(), &[Some(6), Some(7), Some(10)]);
    /// ```
    pub fn new(pattern: &str, flags: &str) -> Result<Self> {
        let parsed = Flags::parse(flags).map_err(|kind| RegexError::Flags {
            flags: flags.to_string(),
            kind,
        })?;
        let transformed = transform(pattern);
        let native = compile(&transformed.pattern, &parsed)?;

        let found = native.captures_len();
        if found != transformed.expected_captures() {
            return Err(RegexError::GroupLayout {
                expected: transformed.expected_captures(),
                found,
            });
        }
        log::debug!("compiled /{}/{} with {} groups", pattern, parsed, transformed.group_count);

        Ok(ExtendedRegex {
            pattern: pattern.to_string(),
            flags: parsed,
            transformed,
            native,
            last_index: 0,
        })
    }

    /// The original, untransformed pattern
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// The flags the regex was created with
    pub fn flags(&self) -> Flags {
        self.flags
    }

    /// The rewritten pattern used for matching
    pub fn transformed(&self) -> &Transformed {
        &self.transformed
    }

    /// Number of capturing groups in the original pattern
    pub fn group_count(&self) -> usize {
        self.transformed.group_count
    }

    /// Position the next global search starts from
    pub fn last_index(&self) -> usize {
        self.last_index
    }

    /// Move the search cursor
    pub fn set_last_index(&mut self, last_index: usize) {
        self.last_index = last_index;
    }

    /// Search for a match, returning the host capture positions
    ///
    /// Without the global flag the search starts at 0 and the cursor is left
    /// alone. With it the search starts at the cursor, which then moves to
    /// the end of the match, or back to 0 when nothing matched.
    fn search(&mut self, input: &str) -> Result<Option<Vec<Option<(usize, usize)>>>> {
        let global = self.flags.global;
        let start = if global { self.last_index } else { 0 };

        if start > input.len() {
            self.last_index = 0;
            return Ok(None);
        }
        let start = ceil_char_boundary(input, start);

        let Some(caps) = self
            .native
            .captures_from_pos(input, start)
            .map_err(RegexError::runtime)?
        else {
            if global {
                log::trace!("no match from {}, resetting cursor", start);
                self.last_index = 0;
            }
            return Ok(None);
        };

        let positions: Vec<Option<(usize, usize)>> = (0..caps.len())
            .map(|i| caps.get(i).map(|m| (m.start(), m.end())))
            .collect();

        if global && let Some(Some((_, end))) = positions.first() {
            log::trace!("cursor moved from {} to {}", self.last_index, end);
            self.last_index = *end;
        }

        Ok(Some(positions))
    }

    /// Execute a search, returning the match with group offsets
    ///
    /// # Errors
    /// Returns [`RegexError::Runtime`] if the host engine gives up matching.
    pub fn exec<'t>(&mut self, input: &'t str) -> Result<Option<ExtendedMatch<'t>>> {
        let Some(positions) = self.search(input)? else {
            return Ok(None);
        };
        let Some(Some((index, end))) = positions.first().copied() else {
            return Ok(None);
        };

        let mut groups = vec![Some(&input[index..end])];
        let mut offsets = vec![Some(index)];

        // Host captures after the full match come in (auxiliary, group) pairs
        for pair in positions[1..].chunks_exact(2) {
            let (aux, group) = (pair[0], pair[1]);
            let offset = match (aux, group) {
                (Some((aux_start, aux_end)), Some(_)) => {
                    let remaining = aux_end - aux_start;
                    Some(input.len() - remaining)
                }
                _ => None,
            };
            groups.push(group.map(|(start, end)| &input[start..end]));
            offsets.push(offset);
        }

        Ok(Some(ExtendedMatch::new(input, index, groups, offsets)))
    }

    /// Check whether the input contains a match
    ///
    /// Moves the search cursor exactly as [`exec`](Self::exec) does.
    pub fn test(&mut self, input: &str) -> Result<bool> {
        Ok(self.search(input)?.is_some())
    }

    /// Replace matches of the original pattern
    ///
    /// The untransformed pattern is compiled again so replacements see the
    /// original group numbering. With the global flag every match is
    /// replaced, otherwise only the first. The search cursor is ignored.
    ///
    /// # Example
    /// ```
    /// use regextend::ExtendedRegex;
    ///
    /// let regex = ExtendedRegex::new("a(.)c", "g").unwrap();
    /// let result = regex.replace("start abc then ayc end", "z$1z").unwrap();
    /// assert_eq!(result, "start zbz then zyz end");
    /// ```
    pub fn replace<R: Replacer>(&self, input: &str, mut replacer: R) -> Result<String> {
        let original = compile(&self.pattern, &self.flags)?;

        let mut result = String::with_capacity(input.len());
        let mut last_end = 0;
        let mut pos = 0;

        while pos <= input.len() {
            let Some(caps) = original
                .captures_from_pos(input, pos)
                .map_err(RegexError::runtime)?
            else {
                break;
            };
            let positions: Vec<Option<(usize, usize)>> = (0..caps.len())
                .map(|i| caps.get(i).map(|m| (m.start(), m.end())))
                .collect();
            let Some(Some((start, end))) = positions.first().copied() else {
                break;
            };

            let m = ExtendedMatch::from_positions(input, &positions);
            result.push_str(&input[last_end..start]);
            replacer.replace_append(&m, &mut result);
            last_end = end;

            if !self.flags.global {
                break;
            }
            pos = if start == end {
                // Step over the empty match
                match input[end..].chars().next() {
                    Some(c) => end + c.len_utf8(),
                    None => break,
                }
            } else {
                end
            };
        }

        result.push_str(&input[last_end..]);
        Ok(result)
    }
}

impl fmt::Debug for ExtendedRegex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtendedRegex")
            .field("pattern", &self.pattern)
            .field("flags", &self.flags.to_string())
            .field("transformed", &self.transformed.pattern)
            .field("last_index", &self.last_index)
            .finish()
    }
}

impl fmt::Display for ExtendedRegex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}/{}", self.pattern, self.flags)
    }
}

/// Compile a pattern with the host engine, applying inline flags
fn compile(pattern: &str, flags: &Flags) -> Result<Regex> {
    let source = format!("{}{}", flags.inline_prefix(), pattern);
    Regex::new(&source).map_err(|e| RegexError::compile(pattern, e))
}

/// Smallest character boundary at or after `pos`
fn ceil_char_boundary(input: &str, mut pos: usize) -> usize {
    while !input.is_char_boundary(pos) {
        pos += 1;
    }
    pos
}
