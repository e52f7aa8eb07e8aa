//! Error types for the regex engine
//!
//! Errors are categorized by their source: parsing or compilation. A failed
//! match is never an error; the engine reports it as `None`.

use thiserror::Error;

/// The main error type for the regex engine
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RegexError {
    /// Errors that occur while parsing the pattern
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// An optimization level other than `O0`/`O1` was requested
    #[error("unknown optimization level '{0}'")]
    UnknownOptLevel(String),
}

/// Errors raised while parsing a pattern string
///
/// All of these are reported synchronously at compile time; a pattern that
/// parses never fails later in the pipeline.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    /// A `)` with no matching `(`
    #[error("Unmatched parentheses")]
    UnmatchedParentheses,

    /// Input remained after a complete parse
    #[error("Unknown error in consuming entire input")]
    TrailingInput,

    /// A specific character (or one of a set) was required
    #[error("Expected one of {expected}, received {found}")]
    Expected {
        /// The characters that would have been accepted
        expected: String,
        /// What was actually next (empty at end of input)
        found: String,
    },

    /// A metacharacter appeared where an atom was expected (e.g. a leading `*`)
    #[error("Unexpected metacharacter '{0}'")]
    UnexpectedMetachar(char),

    /// An escape with no meaning in the current context (e.g. `\z`)
    #[error("invalid escape sequence '\\{0}'")]
    InvalidEscape(char),

    /// A set range with reversed bounds (e.g. `[z-a]`), which no character
    /// could ever satisfy
    #[error("invalid character range '{0}-{1}'")]
    InvalidRange(char, char),

    /// A back-reference to a group that is unopened, still open, or does not exist
    #[error("invalid backreference '\\{0}'")]
    InvalidBackreference(u32),
}

/// Result type alias for regex operations
pub type Result<T> = std::result::Result<T, RegexError>;
