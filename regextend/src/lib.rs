//! Regextend
//!
//! Regular expressions that report where each capturing group begins.
//!
//! Patterns are rewritten so that every capturing group is preceded by a
//! lookahead capturing the rest of the input. The host engine
//! ([`fancy_regex`]) then does all matching, and the length of each
//! auxiliary capture gives the offset of the group it shadows.
//!
//! ```
//! use regextend::ExtendedRegex;
//!
//! let mut regex = ExtendedRegex::new("not (this)|hello (wo)rld", "").unwrap();
//! let m = regex.exec("well hello world!").unwrap().unwrap();
//!
//! assert_eq!(m.as_str(), "hello world");
//! assert_eq!(m.offsets(), &[Some(5), None, Some(11)]);
//! ```
//!
//! Offsets are byte offsets into the input.

pub mod engine;
pub mod error;
pub mod flags;
pub mod lexer;
pub mod replace;
pub mod transform;

pub use engine::{ExtendedMatch, ExtendedRegex};
pub use error::{FlagError, RegexError, Result};
pub use flags::Flags;
pub use lexer::{Lexer, Token};
pub use replace::{Replacement, ReplacementPart, Replacer};
pub use transform::{AUXILIARY_CAPTURE, TransformReport, Transformed, transform, transform_debug};
