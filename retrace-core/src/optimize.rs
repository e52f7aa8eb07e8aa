//! NFA optimization pipeline
//!
//! Every compiled pattern is funneled through an [`Optimizer`] before the
//! engine sees it. The pipeline is a list of rewriting passes selected by
//! [`OptLevel`]; no pass exists yet, so both levels leave the automaton
//! untouched.

use std::str::FromStr;

use crate::error::RegexError;
use crate::nfa::Nfa;

/// Optimization level requested at compile time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OptLevel {
    /// No optimization
    #[default]
    O0,
    /// Reserved for future rewrites; currently identical to `O0`
    O1,
}

impl FromStr for OptLevel {
    type Err = RegexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "O0" => Ok(OptLevel::O0),
            "O1" => Ok(OptLevel::O1),
            other => Err(RegexError::UnknownOptLevel(other.to_string())),
        }
    }
}

/// A single rewriting pass over a built NFA
trait Pass {
    fn run(&self, nfa: Nfa) -> Nfa;
}

/// Applies the pass pipeline for one optimization level
pub struct Optimizer {
    level: OptLevel,
}

impl Optimizer {
    pub fn new(level: OptLevel) -> Self {
        Optimizer { level }
    }

    /// Run every pass of the selected level over the automaton
    pub fn optimize(&self, nfa: Nfa) -> Nfa {
        self.passes().iter().fold(nfa, |nfa, pass| pass.run(nfa))
    }

    fn passes(&self) -> Vec<Box<dyn Pass>> {
        match self.level {
            OptLevel::O0 => Vec::new(),
            OptLevel::O1 => Vec::new(),
        }
    }
}
