//! Backtracking execution engine
//!
//! Depth-first search over the NFA with an explicit frame stack. Each frame
//! carries its own capture map and an epsilon-cycle set; the cycle set
//! prevents divergence through epsilon loops and is reset by any transition
//! that consumes input. Positions and spans are character indices.

use std::collections::{HashMap, HashSet};

use crate::ast::Expr;
use crate::error::Result;
use crate::matcher::{Capture, Captures, GroupId};
use crate::nfa::{Nfa, StateId};
use crate::optimize::{OptLevel, Optimizer};
use crate::parser;

/// A compiled regular expression
///
/// Immutable once compiled; `match_`/`search`/`finditer` keep all mutable
/// state on their own stack, so one `Regex` can serve any number of
/// concurrent executions.
#[derive(Debug, Clone)]
pub struct Regex {
    pub(crate) ast: Expr,
    pub(crate) nfa: Nfa,
}

impl Regex {
    /// Compile a pattern at the default optimization level
    pub fn new(pattern: &str) -> Result<Self> {
        Self::with_opt(pattern, OptLevel::O0)
    }

    /// Compile a pattern through a specific optimization level
    pub fn with_opt(pattern: &str, opt: OptLevel) -> Result<Self> {
        let ast = parser::parse(pattern)?;
        let nfa = Optimizer::new(opt).optimize(Nfa::from_expr(&ast));
        Ok(Regex { ast, nfa })
    }

    /// Match anchored at the start of `input`
    ///
    /// The trailing underscore only dodges the keyword.
    pub fn match_(&self, input: &str) -> Option<Match> {
        let chars: Vec<char> = input.chars().collect();
        find_from(&self.nfa, &chars, 0)
    }

    /// Scan for the first match anywhere in `input`
    pub fn search(&self, input: &str) -> Option<Match> {
        self.search_from(input, 0)
    }

    /// Scan for the first match at or after character position `from`
    pub fn search_from(&self, input: &str, from: usize) -> Option<Match> {
        let chars: Vec<char> = input.chars().collect();
        search_chars(&self.nfa, &chars, from)
    }

    /// Does the pattern match anywhere in `input`?
    pub fn is_match(&self, input: &str) -> bool {
        self.search(input).is_some()
    }

    /// Lazily iterate every non-overlapping match
    ///
    /// Matches are emitted in position order and never overlap; an empty
    /// match advances the cursor by one so iteration always terminates.
    pub fn finditer(&self, input: &str) -> FindIter<'_> {
        FindIter {
            nfa: &self.nfa,
            chars: input.chars().collect(),
            pos: 0,
        }
    }

    /// Collect the matched substrings of every non-overlapping match
    pub fn findall(&self, input: &str) -> Vec<String> {
        self.finditer(input)
            .map(|found| found.as_str().to_string())
            .collect()
    }
}

/// One capture group resolved against the input
#[derive(Debug, Clone, PartialEq, Eq)]
struct CapturedGroup {
    start: usize,
    end: usize,
    text: String,
}

/// A successful match with its capture groups
///
/// Group 0 is the whole match and is always present. Other groups are
/// present only if they closed along the matching path.
#[derive(Debug, Clone, PartialEq)]
pub struct Match {
    groups: HashMap<GroupId, CapturedGroup>,
}

impl Match {
    fn from_frame(frame: Frame, input: &[char]) -> Self {
        let mut groups = HashMap::new();
        for (index, capture) in &frame.captures {
            if let Some((start, end)) = capture.span() {
                groups.insert(
                    *index,
                    CapturedGroup {
                        start,
                        end,
                        text: input[start..end].iter().collect(),
                    },
                );
            }
        }
        // group 0 is normally recorded by the wrapper group's boundary
        // transitions; fall back to the frame's own span
        groups.entry(0).or_insert_with(|| CapturedGroup {
            start: frame.start,
            end: frame.cursor,
            text: input[frame.start..frame.cursor].iter().collect(),
        });
        Match { groups }
    }

    /// The text captured by group `index`, or `None` if the group did not
    /// participate in the match
    pub fn group(&self, index: GroupId) -> Option<&str> {
        self.groups.get(&index).map(|group| group.text.as_str())
    }

    /// The `(start, end)` character span of group `index`
    pub fn span(&self, index: GroupId) -> Option<(usize, usize)> {
        self.groups.get(&index).map(|group| (group.start, group.end))
    }

    /// The start position of group `index`
    pub fn start(&self, index: GroupId) -> Option<usize> {
        self.groups.get(&index).map(|group| group.start)
    }

    /// The end position of group `index`
    pub fn end(&self, index: GroupId) -> Option<usize> {
        self.groups.get(&index).map(|group| group.end)
    }

    /// Indices of every group that participated, in ascending order
    pub fn group_ids(&self) -> Vec<GroupId> {
        let mut ids: Vec<GroupId> = self.groups.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// The whole matched text (group 0)
    pub fn as_str(&self) -> &str {
        self.group(0).unwrap_or("")
    }

    /// True for a zero-width match
    pub fn is_empty(&self) -> bool {
        self.as_str().is_empty()
    }
}

/// One branch of the depth-first traversal
///
/// `cycle` holds the states whose epsilon transitions this branch has
/// already taken since it last consumed input.
#[derive(Debug, Clone)]
struct Frame {
    start: usize,
    cursor: usize,
    state: StateId,
    cycle: HashSet<StateId>,
    captures: Captures,
}

/// Try to match with the whole pattern rooted at position `at`
fn find_from(nfa: &Nfa, input: &[char], at: usize) -> Option<Match> {
    let mut stack = vec![Frame {
        start: at,
        cursor: at,
        state: nfa.start(),
        cycle: HashSet::new(),
        captures: Captures::new(),
    }];

    while let Some(frame) = stack.pop() {
        if nfa.is_accepting(frame.state) {
            return Some(Match::from_frame(frame, input));
        }

        // frames are pushed in reverse insertion order, so the transition
        // inserted first is popped (and explored) first
        for transition in nfa.state(frame.state).transitions() {
            if !transition.matcher.matches(input, frame.cursor, &frame.captures) {
                continue;
            }

            let epsilon = transition.matcher.is_epsilon(&frame.captures);
            if epsilon && frame.cycle.contains(&frame.state) {
                continue;
            }
            let cycle = if epsilon {
                let mut cycle = frame.cycle.clone();
                cycle.insert(frame.state);
                cycle
            } else {
                HashSet::new()
            };

            let cursor = frame.cursor + transition.matcher.consumed(&frame.captures);

            let mut captures = frame.captures.clone();
            if let Some(group) = transition.start_group {
                captures.insert(group, Capture::open(cursor));
            }
            if let Some(group) = transition.end_group {
                if let Some(capture) = captures.get_mut(&group) {
                    capture.end = Some(cursor);
                }
            }

            stack.push(Frame {
                start: frame.start,
                cursor,
                state: transition.target,
                cycle,
                captures,
            });
        }
    }

    None
}

/// First match rooted at any position in `from..=len`
fn search_chars(nfa: &Nfa, input: &[char], from: usize) -> Option<Match> {
    (from..=input.len()).find_map(|at| find_from(nfa, input, at))
}

/// Lazy iterator over non-overlapping matches, returned by
/// [`Regex::finditer`]
pub struct FindIter<'r> {
    nfa: &'r Nfa,
    chars: Vec<char>,
    pos: usize,
}

impl Iterator for FindIter<'_> {
    type Item = Match;

    fn next(&mut self) -> Option<Match> {
        if self.pos > self.chars.len() {
            return None;
        }
        match search_chars(self.nfa, &self.chars, self.pos) {
            Some(found) => {
                let (start, end) = found.span(0).unwrap_or((self.pos, self.pos));
                // an empty match still has to make progress
                self.pos = if end == start { end + 1 } else { end };
                Some(found)
            }
            None => {
                self.pos = self.chars.len() + 1;
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literal_match() {
        let regex = Regex::new("abc").unwrap();
        assert_eq!(regex.match_("abcdef").unwrap().as_str(), "abc");
        assert!(regex.match_("zabc").is_none());
        assert!(regex.is_match("zabc"));
    }

    #[test]
    fn test_search_scans_forward() {
        let regex = Regex::new("abc").unwrap();
        let found = regex.search("xxabcyy").unwrap();
        assert_eq!(found.span(0), Some((2, 5)));
        assert_eq!(found.as_str(), "abc");
    }

    #[test]
    fn test_search_from() {
        let regex = Regex::new("a").unwrap();
        let found = regex.search_from("banana", 2).unwrap();
        assert_eq!(found.start(0), Some(3));
    }

    #[test]
    fn test_star_is_greedy() {
        let regex = Regex::new("a*").unwrap();
        assert_eq!(regex.match_("aaaa").unwrap().as_str(), "aaaa");
        assert_eq!(regex.match_("bbbb").unwrap().as_str(), "");
    }

    #[test]
    fn test_plus_requires_one() {
        let regex = Regex::new("a+").unwrap();
        assert!(regex.match_("").is_none());
        assert_eq!(regex.match_("aaab").unwrap().as_str(), "aaa");
    }

    #[test]
    fn test_alternation_prefers_right() {
        let regex = Regex::new("a|ab").unwrap();
        assert_eq!(regex.match_("ab").unwrap().as_str(), "ab");
        let regex = Regex::new("ab|a").unwrap();
        assert_eq!(regex.match_("ab").unwrap().as_str(), "a");
    }

    #[test]
    fn test_empty_alternative_matches_anything() {
        let regex = Regex::new("a|").unwrap();
        assert_eq!(regex.match_("biujwk").unwrap().as_str(), "");
        assert_eq!(regex.match_("").unwrap().as_str(), "");
    }

    #[test]
    fn test_epsilon_loop_terminates() {
        // a star over a nullable body must not diverge
        let regex = Regex::new("(|a)*").unwrap();
        assert_eq!(regex.match_("aa").unwrap().as_str(), "aa");
        assert_eq!(regex.match_("b").unwrap().as_str(), "");
    }

    #[test]
    fn test_group_capture() {
        let regex = Regex::new("a(b+)c").unwrap();
        let found = regex.match_("abbbcx").unwrap();
        assert_eq!(found.as_str(), "abbbc");
        assert_eq!(found.group(1), Some("bbb"));
        assert_eq!(found.span(1), Some((1, 4)));
    }

    #[test]
    fn test_group_in_loop_keeps_last_iteration() {
        let regex = Regex::new("(b|c)+").unwrap();
        let found = regex.match_("bcb").unwrap();
        assert_eq!(found.as_str(), "bcb");
        assert_eq!(found.group(1), Some("b"));
    }

    #[test]
    fn test_unused_group_is_absent() {
        let regex = Regex::new("(a)|b").unwrap();
        let found = regex.search("b").unwrap();
        assert_eq!(found.group(1), None);
        assert_eq!(found.span(1), None);
    }

    #[test]
    fn test_invalid_group_lookup() {
        let regex = Regex::new("ab").unwrap();
        let found = regex.match_("ab").unwrap();
        assert_eq!(found.group(7), None);
        assert_eq!(found.start(7), None);
    }

    #[test]
    fn test_backreference_match() {
        let regex = Regex::new(r"(a|b)\1").unwrap();
        assert_eq!(regex.match_("aa").unwrap().as_str(), "aa");
        assert_eq!(regex.match_("bb").unwrap().as_str(), "bb");
        assert!(regex.match_("ab").is_none());
    }

    #[test]
    fn test_backreference_to_unrecorded_group_is_empty() {
        // the right alternative never records group 1, so \1 matches empty
        let regex = Regex::new(r"((a)x|y\2)z").unwrap();
        let found = regex.match_("yz").unwrap();
        assert_eq!(found.as_str(), "yz");
        assert_eq!(found.group(2), None);
    }

    #[test]
    fn test_dot_rejects_newline() {
        let regex = Regex::new("a.b").unwrap();
        assert!(regex.match_("axb").is_some());
        assert!(regex.match_("a\nb").is_none());
    }

    #[test]
    fn test_negated_set() {
        let regex = Regex::new("[^ab]").unwrap();
        assert!(regex.match_("c").is_some());
        assert!(regex.match_("a").is_none());
        assert!(regex.match_("").is_none());
    }

    #[test]
    fn test_finditer_progress_on_empty_matches() {
        let regex = Regex::new("a*").unwrap();
        let texts: Vec<String> = regex.findall("bcdaaaa");
        assert_eq!(texts, vec!["", "", "", "aaaa", ""]);
    }

    #[test]
    fn test_finditer_non_overlapping() {
        let regex = Regex::new("aa").unwrap();
        let spans: Vec<(usize, usize)> = regex
            .finditer("aaaa")
            .map(|found| found.span(0).unwrap())
            .collect();
        assert_eq!(spans, vec![(0, 2), (2, 4)]);
    }

    #[test]
    fn test_findall_collects_group_zero() {
        let regex = Regex::new("a+").unwrap();
        assert_eq!(regex.findall("a bba aaa"), vec!["a", "a", "aaa"]);
    }

    #[test]
    fn test_anchors_are_inert() {
        let regex = Regex::new("^ab$").unwrap();
        assert_eq!(regex.match_("abc").unwrap().as_str(), "ab");
        // quantified anchors parse and stay just as inert
        let regex = Regex::new("^*ab$+").unwrap();
        assert_eq!(regex.match_("abc").unwrap().as_str(), "ab");
    }

    #[test]
    fn test_regex_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Regex>();
    }
}
