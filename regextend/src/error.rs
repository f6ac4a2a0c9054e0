//! Error types for extended regexes
//!
//! Errors are categorized by their source: flag parsing, compilation by the
//! host engine, the capture layout check, or matching at runtime.

use thiserror::Error;

/// The main error type for extended regexes
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RegexError {
    /// The flag string could not be parsed
    #[error("invalid flags '{flags}': {kind}")]
    Flags {
        /// The flag string as given
        flags: String,
        /// The specific kind of flag error
        kind: FlagError,
    },

    /// The host engine rejected a pattern
    #[error("compilation error in `{pattern}`: {message}")]
    Compile {
        /// The pattern handed to the host engine
        pattern: String,
        /// The host engine's description of the failure
        message: String,
    },

    /// The compiled pattern does not pair every group with an auxiliary capture
    #[error("capture layout mismatch: expected {expected} captures, host engine reported {found}")]
    GroupLayout {
        /// Captures implied by the rewritten pattern (including the full match)
        expected: usize,
        /// Captures reported by the compiled regex
        found: usize,
    },

    /// Errors that occur during pattern matching
    #[error("runtime error: {0}")]
    Runtime(String),
}

/// Specific kinds of flag errors
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlagError {
    /// A flag letter the host dialect does not know
    #[error("unknown flag '{0}'")]
    Unknown(char),

    /// A flag letter given more than once
    #[error("duplicate flag '{0}'")]
    Duplicate(char),
}

impl RegexError {
    pub(crate) fn compile(pattern: &str, err: fancy_regex::Error) -> Self {
        RegexError::Compile {
            pattern: pattern.to_string(),
            message: err.to_string(),
        }
    }

    pub(crate) fn runtime(err: fancy_regex::Error) -> Self {
        RegexError::Runtime(err.to_string())
    }
}

/// Result type alias for regex operations
pub type Result<T> = std::result::Result<T, RegexError>;
