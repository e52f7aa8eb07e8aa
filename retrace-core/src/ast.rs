//! Abstract syntax tree for regex patterns
//!
//! The parser produces one [`Expr`] per pattern; the NFA builder consumes it.
//! Trees are immutable after construction. `Sequence` and `Alternation` are
//! binary and right-associative, matching how the recursive-descent parser
//! recurses on its right operand.

use std::fmt;

use crate::matcher::GroupId;

/// An expression in the AST
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Matches the empty string
    Epsilon,

    /// A literal character
    Literal(char),

    /// A character range `lo-hi` from a set
    Range(char, char),

    /// Any character except a newline (`.`)
    Dot,

    /// Two expressions in sequence
    Sequence(Box<Expr>, Box<Expr>),

    /// Either of two expressions (`a|b`)
    Alternation(Box<Expr>, Box<Expr>),

    /// Zero or more repetitions (`*`)
    Star(Box<Expr>),

    /// One or more repetitions (`+`)
    Plus(Box<Expr>),

    /// A capturing group with its number. The parser assigns numbers in the
    /// order opening parentheses appear; number 0 is the wrapper around the
    /// whole pattern.
    Group(Box<Expr>, GroupId),

    /// A back-reference to an already-closed group (`\1`)
    Backreference(GroupId),

    /// A negated set `[^...]`: any single character not in the items
    NegatedSet(Vec<SetItem>),

    /// Start of string anchor (`^`)
    StartAnchor,

    /// End of string anchor (`$`)
    EndAnchor,
}

/// One member of a bracket set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetItem {
    /// A single character
    Char(char),
    /// An inclusive character range
    Range(char, char),
}

impl Expr {
    /// Create a sequence node
    pub fn sequence(left: Expr, right: Expr) -> Self {
        Expr::Sequence(Box::new(left), Box::new(right))
    }

    /// Create an alternation node
    pub fn alternation(left: Expr, right: Expr) -> Self {
        Expr::Alternation(Box::new(left), Box::new(right))
    }

    /// Create a star node
    pub fn star(inner: Expr) -> Self {
        Expr::Star(Box::new(inner))
    }

    /// Create a plus node
    pub fn plus(inner: Expr) -> Self {
        Expr::Plus(Box::new(inner))
    }

    /// Create a capturing group node
    pub fn group(inner: Expr, index: GroupId) -> Self {
        Expr::Group(Box::new(inner), index)
    }

    /// Short node label for Graphviz output
    pub(crate) fn label(&self) -> String {
        match self {
            Expr::Epsilon => "\u{3b5}".to_string(),
            Expr::Literal(c) => c.to_string(),
            Expr::Range(lo, hi) => format!("{lo}-{hi}"),
            Expr::Dot => ".".to_string(),
            Expr::Sequence(..) => "->".to_string(),
            Expr::Alternation(..) => "|".to_string(),
            Expr::Star(_) => "*".to_string(),
            Expr::Plus(_) => "+".to_string(),
            Expr::Group(_, index) => format!("({index})"),
            Expr::Backreference(group) => format!("\\{group}"),
            Expr::NegatedSet(_) => "[^]".to_string(),
            Expr::StartAnchor => "^".to_string(),
            Expr::EndAnchor => "$".to_string(),
        }
    }

    /// Child nodes, left to right
    pub(crate) fn children(&self) -> Vec<&Expr> {
        match self {
            Expr::Sequence(left, right) | Expr::Alternation(left, right) => {
                vec![left, right]
            }
            Expr::Star(inner) | Expr::Plus(inner) | Expr::Group(inner, _) => vec![inner],
            _ => Vec::new(),
        }
    }
}

impl fmt::Display for Expr {
    /// Reconstruct a pattern-like string, mainly for diagnostics
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Epsilon => Ok(()),
            Expr::Literal(c) => write!(f, "{c}"),
            Expr::Range(lo, hi) => write!(f, "[{lo}-{hi}]"),
            Expr::Dot => write!(f, "."),
            Expr::Sequence(left, right) => write!(f, "{left}{right}"),
            Expr::Alternation(left, right) => write!(f, "{left}|{right}"),
            Expr::Star(inner) => write!(f, "{inner}*"),
            Expr::Plus(inner) => write!(f, "{inner}+"),
            // group 0 is the implicit wrapper; printing its parentheses
            // would misquote the source
            Expr::Group(inner, 0) => write!(f, "{inner}"),
            Expr::Group(inner, _) => write!(f, "({inner})"),
            Expr::Backreference(group) => write!(f, "\\{group}"),
            Expr::NegatedSet(items) => {
                write!(f, "[^")?;
                for item in items {
                    match item {
                        SetItem::Char(c) => write!(f, "{c}")?,
                        SetItem::Range(lo, hi) => write!(f, "{lo}-{hi}")?,
                    }
                }
                write!(f, "]")
            }
            Expr::StartAnchor => write!(f, "^"),
            Expr::EndAnchor => write!(f, "$"),
        }
    }
}
