//! Mode flags for extended regexes
//!
//! Flags are given as a string of letters, e.g. `"gi"`. They are stored as
//! given and reused verbatim whenever the pattern is compiled again.

use std::fmt;

use crate::error::FlagError;

/// Mode flags for matching
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Flags {
    /// Global search (`g`): matching resumes from the search cursor
    pub global: bool,
    /// Case insensitive matching (`i`)
    pub ignore_case: bool,
    /// Multiline mode, `^` and `$` match line boundaries (`m`)
    pub multiline: bool,
    /// Unicode mode (`u`). The host engine is always Unicode-aware.
    pub unicode: bool,
    /// Dot matches newline (`s`). Accepted but not supported.
    pub dot_all: bool,
    /// Sticky matching (`y`). Accepted but not supported.
    pub sticky: bool,
}

impl Flags {
    /// Parse flags from a string like `"gim"`
    pub fn parse(flags: &str) -> Result<Self, FlagError> {
        let mut mode = Flags::default();
        for c in flags.chars() {
            let slot = match c {
                'g' => &mut mode.global,
                'i' => &mut mode.ignore_case,
                'm' => &mut mode.multiline,
                'u' => &mut mode.unicode,
                's' => &mut mode.dot_all,
                'y' => &mut mode.sticky,
                _ => return Err(FlagError::Unknown(c)),
            };
            if *slot {
                return Err(FlagError::Duplicate(c));
            }
            *slot = true;
        }

        if mode.dot_all {
            log::warn!("the 's' (dot-all) flag is not supported and will be ignored");
        }
        if mode.sticky {
            log::warn!("the 'y' (sticky) flag is not supported and will be ignored");
        }

        Ok(mode)
    }

    /// Inline flag groups that apply these flags in the host dialect
    pub fn inline_prefix(&self) -> String {
        let mut prefix = String::new();
        if self.ignore_case {
            prefix.push_str("(?i)");
        }
        if self.multiline {
            prefix.push_str("(?m)");
        }
        prefix
    }
}

impl fmt::Display for Flags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let letters = [
            (self.global, 'g'),
            (self.ignore_case, 'i'),
            (self.multiline, 'm'),
            (self.dot_all, 's'),
            (self.unicode, 'u'),
            (self.sticky, 'y'),
        ];
        for (set, letter) in letters {
            if set {
                write!(f, "{}", letter)?;
            }
        }
        Ok(())
    }
}
