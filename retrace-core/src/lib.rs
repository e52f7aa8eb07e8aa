//! Retrace core library
//!
//! A backtracking regular-expression engine. Patterns compile through a
//! recursive-descent parser into an AST, then by Thompson construction into
//! an NFA with epsilon transitions and capture-group boundaries; matching is
//! a depth-first search over that automaton with per-branch capture state
//! and back-reference support.
//!
//! ```
//! use retrace_core::Regex;
//!
//! let regex = Regex::new(r"(a|b)+\1").unwrap();
//! let found = regex.match_("abbx").unwrap();
//! assert_eq!(found.as_str(), "abb");
//! ```

pub mod ast;
pub mod dump;
pub mod engine;
pub mod error;
pub mod matcher;
pub mod nfa;
pub mod optimize;
pub mod parser;

pub use ast::{Expr, SetItem};
pub use dump::{ast_dot, nfa_dot};
pub use engine::{FindIter, Match, Regex};
pub use error::{ParseError, RegexError, Result};
pub use matcher::{Capture, Captures, GroupId, Matcher};
pub use nfa::{Nfa, State, StateId, Transition};
pub use optimize::{OptLevel, Optimizer};
pub use parser::parse;

/// Compile a pattern at the default optimization level
pub fn compile(pattern: &str) -> Result<Regex> {
    Regex::new(pattern)
}

/// Compile a pattern through a specific optimization level
pub fn compile_with(pattern: &str, opt: OptLevel) -> Result<Regex> {
    Regex::with_opt(pattern, opt)
}

/// Compile `pattern` and match it against the start of `input`
pub fn match_(pattern: &str, input: &str) -> Result<Option<Match>> {
    Ok(Regex::new(pattern)?.match_(input))
}

/// Compile `pattern` and scan `input` for its first match
pub fn search(pattern: &str, input: &str) -> Result<Option<Match>> {
    Ok(Regex::new(pattern)?.search(input))
}

/// Compile `pattern` and collect every non-overlapping match
///
/// The lazy iterator borrows the compiled automaton, so the one-shot form
/// collects eagerly.
pub fn finditer(pattern: &str, input: &str) -> Result<Vec<Match>> {
    Ok(Regex::new(pattern)?.finditer(input).collect())
}

/// Compile `pattern` and collect every matched substring
pub fn findall(pattern: &str, input: &str) -> Result<Vec<String>> {
    Ok(Regex::new(pattern)?.findall(input))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_end_to_end() {
        let regex = compile("a(b|c)+").unwrap();
        let found = regex.search("xxabcc").unwrap();
        assert_eq!(found.as_str(), "abcc");
        assert_eq!(found.group(1), Some("c"));
    }

    #[test]
    fn test_module_level_helpers() {
        assert_eq!(
            search("aa", "xaay").unwrap().unwrap().span(0),
            Some((1, 3))
        );
        assert!(match_("aa", "xaay").unwrap().is_none());
        assert_eq!(findall("a", "banana").unwrap().len(), 3);
        assert_eq!(finditer("a", "banana").unwrap().len(), 3);
    }

    #[test]
    fn test_compile_error_is_synchronous() {
        assert!(matches!(
            compile("(a"),
            Err(RegexError::Parse(ParseError::Expected { .. }))
        ));
    }

    #[test]
    fn test_compile_with_levels() {
        let o1 = compile_with("ab*", OptLevel::O1).unwrap();
        assert_eq!(o1.match_("abbb").unwrap().as_str(), "abbb");
    }
}
