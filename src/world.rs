//! World state: the ordered list of facts a plan operates on

use std::fmt;

use crate::ast::SyntaxNode;
use crate::error::Error;
use crate::eval::Valuation;
use crate::pretty::pretty_print;
use crate::Result;

/// Ordered collection of fact strings such as `(P |a| |d|)`.
///
/// Facts are compared as exact text. Duplicates are not rejected.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WorldState {
    facts: Vec<String>,
}

impl WorldState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn facts(&self) -> &[String] {
        &self.facts
    }

    pub fn len(&self) -> usize {
        self.facts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.facts.is_empty()
    }

    pub fn contains(&self, fact: &str) -> bool {
        self.facts.iter().any(|f| f == fact)
    }

    /// Append a fact
    pub fn add(&mut self, fact: impl Into<String>) {
        self.facts.push(fact.into());
    }

    /// Remove the first exact occurrence of `fact`
    pub fn remove(&mut self, fact: &str) -> Result<()> {
        let index = self
            .facts
            .iter()
            .position(|f| f == fact)
            .ok_or_else(|| Error::MissingFact(fact.to_string()))?;
        self.facts.remove(index);
        Ok(())
    }

    /// Goals not present in this state
    pub fn unmet<'a>(&self, goals: &'a [String]) -> Vec<&'a str> {
        goals
            .iter()
            .filter(|goal| !self.contains(goal))
            .map(String::as_str)
            .collect()
    }

    pub fn satisfies(&self, goals: &[String]) -> bool {
        goals.iter().all(|goal| self.contains(goal))
    }
}

impl<S: Into<String>> FromIterator<S> for WorldState {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            facts: iter.into_iter().map(Into::into).collect(),
        }
    }
}

impl fmt::Display for WorldState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.facts.join(","))
    }
}

/// A predicate holds iff its printed fact is in the state
impl Valuation for WorldState {
    fn atom(&self, node: &SyntaxNode) -> Result<bool> {
        Ok(self.contains(&pretty_print(node)))
    }
}
