//! Parser for regex patterns
//!
//! A recursive descent parser over a character cursor. Two characters of
//! lookahead are enough for every rule, including the bracket-set corner
//! cases.
//!
//! Grammar:
//!   expr       := term ( '|' expr )?
//!   term       := atom ( term )?          -- stops on ')', '|' or EOF
//!   atom       := group | dot | set | anchor | escape | literal ; quantifier?
//!   group      := '(' expr ')'
//!   set        := '[' '^'? set_items ']'
//!   set_items  := set_atom ( '-' set_atom )? set_items?
//!   quantifier := '*' | '+'
//!   anchor     := '^' | '$'
//!   escape     := '\' escape_body
//!
//! Alternation and concatenation are right-associative (the parser recurses
//! into `expr` / `term` on the right). Empty alternatives and empty groups
//! are legal and denote epsilon. Group numbers are assigned in the order
//! opening parentheses appear, starting from 1; [`parse`] wraps the whole
//! pattern in group 0.

use std::collections::HashSet;

use crate::ast::{Expr, SetItem};
use crate::error::ParseError;
use crate::matcher::GroupId;

/// Metacharacters outside bracket sets
const METACHARS: &[char] = &[
    '\\', '^', '$', '[', '.', '|', '(', ')', '?', '*', '+', '{',
];

/// Metacharacters inside bracket sets
const SET_METACHARS: &[char] = &['\\', '^', '-', '[', ']'];

/// One parsed set member: a single character, or an expansion of a class
/// escape into several items
enum SetAtom {
    One(char),
    Many(Vec<SetItem>),
}

struct Parser {
    chars: Vec<char>,
    pos: usize,
    next_group: GroupId,
    closed_groups: HashSet<GroupId>,
}

/// Parse a pattern string into an AST
///
/// The returned tree is wrapped in group 0, so a successful execution always
/// records the whole-match span.
pub fn parse(pattern: &str) -> Result<Expr, ParseError> {
    let mut parser = Parser::new(pattern);
    let ast = parser.parse_expr()?;

    if parser.peek() == Some(')') {
        return Err(ParseError::UnmatchedParentheses);
    }
    if !parser.at_end() {
        return Err(ParseError::TrailingInput);
    }

    Ok(Expr::group(ast, 0))
}

impl Parser {
    fn new(pattern: &str) -> Self {
        Parser {
            chars: pattern.chars().collect(),
            pos: 0,
            next_group: 1,
            closed_groups: HashSet::new(),
        }
    }

    fn peek(&self) -> Option<char> {
        self.peek_at(0)
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.peek();
        if c.is_some() {
            self.pos += 1;
        }
        c
    }

    fn at_end(&self) -> bool {
        self.pos >= self.chars.len()
    }

    /// Build an `Expected` error against the current position
    fn expected(&self, expected: &str) -> ParseError {
        ParseError::Expected {
            expected: expected.to_string(),
            found: self.peek().map(String::from).unwrap_or_default(),
        }
    }

    fn expect(&mut self, want: char) -> Result<(), ParseError> {
        if self.peek() == Some(want) {
            self.advance();
            Ok(())
        } else {
            Err(self.expected(&want.to_string()))
        }
    }

    /// expr := term ( '|' expr )?
    fn parse_expr(&mut self) -> Result<Expr, ParseError> {
        let lhs = self.parse_term()?;

        if self.peek() == Some('|') {
            self.advance();
            return Ok(Expr::alternation(lhs, self.parse_expr()?));
        }

        Ok(lhs)
    }

    /// term := atom ( term )?
    fn parse_term(&mut self) -> Result<Expr, ParseError> {
        let lhs = self.parse_atom()?;

        match self.peek() {
            None | Some(')') | Some('|') => Ok(lhs),
            _ => Ok(Expr::sequence(lhs, self.parse_term()?)),
        }
    }

    /// atom := group | dot | set | anchor | escape | literal ; quantifier?
    ///
    /// Where an atom is expected but `|`, `)` or the end of input sits,
    /// epsilon is produced without consuming anything. The quantifier
    /// applies to every atom form, anchors and epsilon included (a
    /// quantified anchor is as inert as a bare one).
    fn parse_atom(&mut self) -> Result<Expr, ParseError> {
        let atom = match self.peek() {
            None | Some('|') | Some(')') => Expr::Epsilon,
            Some('(') => self.parse_group()?,
            Some('.') => {
                self.advance();
                Expr::Dot
            }
            Some('[') => self.parse_set()?,
            Some('^') => {
                self.advance();
                Expr::StartAnchor
            }
            Some('$') => {
                self.advance();
                Expr::EndAnchor
            }
            Some('\\') => self.parse_escape()?,
            Some(c) if METACHARS.contains(&c) => {
                return Err(ParseError::UnexpectedMetachar(c));
            }
            Some(c) => {
                self.advance();
                Expr::Literal(c)
            }
        };

        Ok(self.parse_quantifier(atom))
    }

    /// quantifier := '*' | '+'
    fn parse_quantifier(&mut self, atom: Expr) -> Expr {
        match self.peek() {
            Some('*') => {
                self.advance();
                Expr::star(atom)
            }
            Some('+') => {
                self.advance();
                Expr::plus(atom)
            }
            _ => atom,
        }
    }

    /// group := '(' expr ')'
    ///
    /// The group number is taken on entry, so outer groups number before the
    /// groups they contain. The group only counts as closed (and so becomes
    /// referenceable) once its `)` has been consumed.
    fn parse_group(&mut self) -> Result<Expr, ParseError> {
        self.expect('(')?;
        let index = self.next_group;
        self.next_group += 1;

        let inner = self.parse_expr()?;
        self.expect(')')?;
        self.closed_groups.insert(index);

        Ok(Expr::group(inner, index))
    }

    /// set := '[' '^'? set_items ']'
    ///
    /// A `]` directly after the opening bracket (or after `^`) is a literal
    /// member. `-` acts as a range operator only between two single
    /// characters and never against the set's closing bracket: a trailing
    /// `-` (`[a-]`) stays literal, and so does a `-` whose bound would be
    /// the closing `-]` (`[a--]` holds the literals `a` and `-`). `[]-]`
    /// holds the literals `]` and `-`. Reversed bounds are rejected rather
    /// than compiled into a range nothing can satisfy.
    fn parse_set(&mut self) -> Result<Expr, ParseError> {
        self.expect('[')?;

        let negated = if self.peek() == Some('^') {
            self.advance();
            true
        } else {
            false
        };

        let mut items: Vec<SetItem> = Vec::new();
        loop {
            match self.peek() {
                Some(']') if !items.is_empty() => break,
                None => return Err(self.expected("]")),
                _ => {}
            }

            let atom = self.parse_set_atom()?;
            let range_lo = match &atom {
                SetAtom::One(c) if self.dash_is_range_operator() => Some(*c),
                _ => None,
            };

            match range_lo {
                Some(lo) => {
                    self.advance(); // the '-'
                    match self.parse_set_atom()? {
                        SetAtom::One(hi) if lo > hi => {
                            return Err(ParseError::InvalidRange(lo, hi));
                        }
                        SetAtom::One(hi) => items.push(SetItem::Range(lo, hi)),
                        SetAtom::Many(_) => return Err(self.expected("character")),
                    }
                }
                None => match atom {
                    SetAtom::One(c) => items.push(SetItem::Char(c)),
                    SetAtom::Many(expansion) => items.extend(expansion),
                },
            }
        }

        self.expect(']')?;

        if negated {
            Ok(Expr::NegatedSet(items))
        } else {
            Ok(set_items_to_alternation(&items))
        }
    }

    /// True when the `-` at the cursor acts as a range operator. It must
    /// not sit at the end of the set (`[a-]`), and its bound must not
    /// itself be the set's closing `-]` (`[a--]`): in both shapes the `-`
    /// is a literal member.
    fn dash_is_range_operator(&self) -> bool {
        self.peek() == Some('-')
            && self.peek_at(1).is_some_and(|next| next != ']')
            && !(self.peek_at(1) == Some('-') && self.peek_at(2) == Some(']'))
    }

    /// One set member. `]` and `-` reach this only where the set grammar
    /// treats them literally; `[` and a non-leading `^` stay metacharacters
    /// and must be escaped.
    fn parse_set_atom(&mut self) -> Result<SetAtom, ParseError> {
        match self.peek() {
            None => Err(self.expected("]")),
            Some('\\') => self.parse_set_escape(),
            Some(c @ ('[' | '^')) => Err(ParseError::UnexpectedMetachar(c)),
            Some(c) => {
                self.advance();
                Ok(SetAtom::One(c))
            }
        }
    }

    /// escape_body inside a set: set metacharacters and control escapes give
    /// one literal character, class escapes expand to their members, any
    /// other non-alphanumeric character is itself
    fn parse_set_escape(&mut self) -> Result<SetAtom, ParseError> {
        self.expect('\\')?;
        let c = match self.advance() {
            Some(c) => c,
            None => return Err(self.expected("escape")),
        };

        if SET_METACHARS.contains(&c) {
            return Ok(SetAtom::One(c));
        }
        if let Some(ctrl) = control_escape(c) {
            return Ok(SetAtom::One(ctrl));
        }
        if let Some(expansion) = class_escape(c) {
            return Ok(SetAtom::Many(expansion));
        }
        if !c.is_alphanumeric() {
            return Ok(SetAtom::One(c));
        }
        Err(ParseError::InvalidEscape(c))
    }

    /// escape_body outside a set
    fn parse_escape(&mut self) -> Result<Expr, ParseError> {
        self.expect('\\')?;
        let c = match self.peek() {
            Some(c) => c,
            None => return Err(self.expected("escape")),
        };

        if c.is_ascii_digit() {
            return self.parse_backreference();
        }
        self.advance();

        if METACHARS.contains(&c) {
            return Ok(Expr::Literal(c));
        }
        if let Some(ctrl) = control_escape(c) {
            return Ok(Expr::Literal(ctrl));
        }
        if let Some(expansion) = class_escape(c) {
            return Ok(set_items_to_alternation(&expansion));
        }
        if !c.is_alphanumeric() {
            return Ok(Expr::Literal(c));
        }
        Err(ParseError::InvalidEscape(c))
    }

    /// Up to three digits naming a group whose `)` has already been parsed.
    /// References to unopened, still-open or nonexistent groups are errors.
    fn parse_backreference(&mut self) -> Result<Expr, ParseError> {
        let mut value: GroupId = 0;
        let mut digits = 0;
        while digits < 3 {
            match self.peek() {
                Some(c) if c.is_ascii_digit() => {
                    self.advance();
                    value = value * 10 + c.to_digit(10).unwrap();
                    digits += 1;
                }
                _ => break,
            }
        }

        if value == 0 || !self.closed_groups.contains(&value) {
            return Err(ParseError::InvalidBackreference(value));
        }
        Ok(Expr::Backreference(value))
    }
}

/// A positive set desugars to the alternation of its members, folded
/// right-associatively like the parser's own `|`
fn set_items_to_alternation(items: &[SetItem]) -> Expr {
    items
        .iter()
        .map(|item| match item {
            SetItem::Char(c) => Expr::Literal(*c),
            SetItem::Range(lo, hi) => Expr::Range(*lo, *hi),
        })
        .rev()
        .reduce(|acc, item| Expr::alternation(item, acc))
        .unwrap_or(Expr::Epsilon)
}

fn control_escape(c: char) -> Option<char> {
    match c {
        'a' => Some('\u{07}'),
        'e' => Some('\u{1e}'),
        'f' => Some('\u{0c}'),
        'n' => Some('\n'),
        'r' => Some('\r'),
        't' => Some('\t'),
        _ => None,
    }
}

fn class_escape(c: char) -> Option<Vec<SetItem>> {
    match c {
        'd' => Some(vec![SetItem::Range('0', '9')]),
        'w' => Some(vec![
            SetItem::Range('a', 'z'),
            SetItem::Range('A', 'Z'),
            SetItem::Range('0', '9'),
            SetItem::Char('_'),
        ]),
        'v' => Some(vertical_whitespace()),
        'h' => Some(horizontal_whitespace()),
        's' => {
            let mut items = vertical_whitespace();
            items.extend(horizontal_whitespace());
            Some(items)
        }
        _ => None,
    }
}

fn vertical_whitespace() -> Vec<SetItem> {
    ['\n', '\u{0b}', '\u{0c}', '\r', '\u{85}']
        .into_iter()
        .map(SetItem::Char)
        .collect()
}

fn horizontal_whitespace() -> Vec<SetItem> {
    ['\t', ' ', '\u{a0}'].into_iter().map(SetItem::Char).collect()
}
