//! NFA construction
//!
//! Thompson's construction over the AST: every node builds a subautomaton
//! with one entry and one exit state, wired together with epsilon
//! transitions. States live in an arena and refer to each other by index,
//! so frames can be copied cheaply and the graph has no ownership cycles.

use std::collections::HashSet;

use crate::ast::{Expr, SetItem};
use crate::matcher::{GroupId, Matcher};

/// An NFA state id; also the state's position in the arena
pub type StateId = usize;

/// A labeled edge between two states
///
/// At most one of `start_group` / `end_group` is set. A transition carrying
/// either is a group-boundary transition; its matcher is always epsilon.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub matcher: Matcher,
    pub target: StateId,
    pub start_group: Option<GroupId>,
    pub end_group: Option<GroupId>,
}

impl Transition {
    /// True when this edge opens or closes a capture group
    pub fn is_group_boundary(&self) -> bool {
        self.start_group.is_some() || self.end_group.is_some()
    }
}

/// An NFA state: an ordered list of outgoing transitions
#[derive(Debug, Clone, Default)]
pub struct State {
    transitions: Vec<Transition>,
}

impl State {
    fn new() -> Self {
        State {
            transitions: Vec::new(),
        }
    }

    /// Outgoing transitions in reverse insertion order
    ///
    /// The executor pushes frames in this order onto its LIFO stack, so the
    /// transition inserted first is the one explored first.
    pub fn transitions(&self) -> impl DoubleEndedIterator<Item = &Transition> {
        self.transitions.iter().rev()
    }

    pub fn transition_count(&self) -> usize {
        self.transitions.len()
    }
}

/// A nondeterministic finite automaton with epsilon transitions
///
/// Frozen once built: the engine only ever reads it, so a compiled automaton
/// can be shared freely between threads.
#[derive(Debug, Clone)]
pub struct Nfa {
    states: Vec<State>,
    start: StateId,
    accepts: HashSet<StateId>,
}

impl Nfa {
    pub fn new() -> Self {
        Nfa {
            states: Vec::new(),
            start: 0,
            accepts: HashSet::new(),
        }
    }

    /// Allocate a new state and return its id
    pub fn add_state(&mut self) -> StateId {
        self.states.push(State::new());
        self.states.len() - 1
    }

    /// Add a transition between two existing states
    pub fn add_transition(&mut self, from: StateId, to: StateId, matcher: Matcher) {
        self.push_transition(
            from,
            Transition {
                matcher,
                target: to,
                start_group: None,
                end_group: None,
            },
        );
    }

    /// Add an epsilon transition that opens capture group `group`
    pub fn add_open_group(&mut self, from: StateId, to: StateId, group: GroupId) {
        self.push_transition(
            from,
            Transition {
                matcher: Matcher::Epsilon,
                target: to,
                start_group: Some(group),
                end_group: None,
            },
        );
    }

    /// Add an epsilon transition that closes capture group `group`
    pub fn add_close_group(&mut self, from: StateId, to: StateId, group: GroupId) {
        self.push_transition(
            from,
            Transition {
                matcher: Matcher::Epsilon,
                target: to,
                start_group: None,
                end_group: Some(group),
            },
        );
    }

    fn push_transition(&mut self, from: StateId, transition: Transition) {
        // both endpoints must already exist; anything else is a builder bug
        assert!(
            from < self.states.len() && transition.target < self.states.len(),
            "transition endpoints must be existing states"
        );
        self.states[from].transitions.push(transition);
    }

    pub fn set_start(&mut self, id: StateId) {
        self.start = id;
    }

    pub fn start(&self) -> StateId {
        self.start
    }

    pub fn add_accept(&mut self, id: StateId) {
        self.accepts.insert(id);
    }

    pub fn is_accepting(&self, id: StateId) -> bool {
        self.accepts.contains(&id)
    }

    pub fn state(&self, id: StateId) -> &State {
        &self.states[id]
    }

    pub fn state_count(&self) -> usize {
        self.states.len()
    }

    /// Display name for a state, `q0`, `q1`, … in creation order
    pub fn state_name(id: StateId) -> String {
        format!("q{id}")
    }

    /// Build an NFA from an AST by Thompson construction
    pub fn from_expr(expr: &Expr) -> Self {
        let mut nfa = Nfa::new();
        let (entry, exit) = nfa.build(expr);
        nfa.set_start(entry);
        nfa.add_accept(exit);
        nfa
    }

    /// Build one AST node and return its (entry, exit) pair
    fn build(&mut self, expr: &Expr) -> (StateId, StateId) {
        match expr {
            Expr::Epsilon => self.build_epsilon(),
            Expr::Literal(c) => self.build_symbol(Matcher::Char(*c)),
            Expr::Range(lo, hi) => self.build_symbol(Matcher::Range(*lo, *hi)),
            Expr::Dot => self.build_symbol(Matcher::Inverse(Box::new(Matcher::Char('\n')))),
            Expr::NegatedSet(items) => self.build_symbol(negated_set_matcher(items)),
            Expr::Backreference(group) => self.build_symbol(Matcher::Backref(*group)),
            Expr::Sequence(left, right) => self.build_sequence(left, right),
            Expr::Alternation(left, right) => self.build_alternation(left, right),
            Expr::Star(inner) => self.build_star(inner),
            Expr::Plus(inner) => self.build_plus(inner),
            Expr::Group(inner, index) => self.build_group(inner, *index),
            // anchors parse but are not enforced at runtime
            Expr::StartAnchor | Expr::EndAnchor => self.build_epsilon(),
        }
    }

    fn build_epsilon(&mut self) -> (StateId, StateId) {
        let state = self.add_state();
        (state, state)
    }

    fn build_symbol(&mut self, matcher: Matcher) -> (StateId, StateId) {
        let entry = self.add_state();
        let exit = self.add_state();
        self.add_transition(entry, exit, matcher);
        (entry, exit)
    }

    fn build_sequence(&mut self, left: &Expr, right: &Expr) -> (StateId, StateId) {
        let (left_entry, left_exit) = self.build(left);
        let (right_entry, right_exit) = self.build(right);
        self.add_transition(left_exit, right_entry, Matcher::Epsilon);
        (left_entry, right_exit)
    }

    fn build_alternation(&mut self, left: &Expr, right: &Expr) -> (StateId, StateId) {
        let entry = self.add_state();
        let exit = self.add_state();
        let (left_entry, left_exit) = self.build(left);
        let (right_entry, right_exit) = self.build(right);

        // earlier-inserted transitions are explored first; alternation
        // prefers its right branch, so the right entry edge goes in first
        self.add_transition(entry, right_entry, Matcher::Epsilon);
        self.add_transition(entry, left_entry, Matcher::Epsilon);
        self.add_transition(left_exit, exit, Matcher::Epsilon);
        self.add_transition(right_exit, exit, Matcher::Epsilon);

        (entry, exit)
    }

    fn build_star(&mut self, inner: &Expr) -> (StateId, StateId) {
        let entry = self.add_state();
        let exit = self.add_state();
        let (inner_entry, inner_exit) = self.build(inner);

        // loop edges before exit edges: repetition is greedy
        self.add_transition(entry, inner_entry, Matcher::Epsilon);
        self.add_transition(entry, exit, Matcher::Epsilon);
        self.add_transition(inner_exit, inner_entry, Matcher::Epsilon);
        self.add_transition(inner_exit, exit, Matcher::Epsilon);

        (entry, exit)
    }

    fn build_plus(&mut self, inner: &Expr) -> (StateId, StateId) {
        let entry = self.add_state();
        let exit = self.add_state();
        let (inner_entry, inner_exit) = self.build(inner);

        self.add_transition(entry, inner_entry, Matcher::Epsilon);
        self.add_transition(inner_exit, inner_entry, Matcher::Epsilon);
        self.add_transition(inner_exit, exit, Matcher::Epsilon);

        (entry, exit)
    }

    fn build_group(&mut self, inner: &Expr, index: GroupId) -> (StateId, StateId) {
        let entry = self.add_state();
        let (inner_entry, inner_exit) = self.build(inner);
        let exit = self.add_state();

        self.add_open_group(entry, inner_entry, index);
        self.add_close_group(inner_exit, exit, index);

        (entry, exit)
    }
}

impl Default for Nfa {
    fn default() -> Self {
        Self::new()
    }
}

fn negated_set_matcher(items: &[SetItem]) -> Matcher {
    let members = items
        .iter()
        .map(|item| match item {
            SetItem::Char(c) => Matcher::Char(*c),
            SetItem::Range(lo, hi) => Matcher::Range(*lo, *hi),
        })
        .collect();
    Matcher::Inverse(Box::new(Matcher::Class(members)))
}
