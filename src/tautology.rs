//! Tautology checking by truth-table enumeration
//!
//! For `n` distinct atoms every one of the `2^n` assignments is tried, in
//! counter order: assignment `i` sets atom `j` true iff bit `j` of `i` is set.
//! The search stops at the first falsifying assignment. The cost is
//! exponential in the number of atoms and is not bounded; only the counter
//! width (63 atoms) is a hard limit.
//!
//! With no atoms the single empty assignment is evaluated. Only first-order
//! trees parse without atoms, so that evaluation fails with `Unsupported`.

use indexmap::IndexSet;
use tracing::debug;

use crate::ast::{NodeKind, SyntaxNode};
use crate::error::Error;
use crate::eval::{evaluate, Assignment};
use crate::Result;

const MAX_ATOMS: usize = 63;

/// Outcome of a truth-table enumeration
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TautologyReport {
    /// Distinct atoms in first-occurrence order
    pub atoms: Vec<String>,
    /// Number of assignments evaluated before stopping
    pub assignments_checked: u64,
    /// The first falsifying assignment, if any
    pub counterexample: Option<Assignment>,
}

impl TautologyReport {
    pub fn is_tautology(&self) -> bool {
        self.counterexample.is_none()
    }
}

/// Distinct atom names in pre-order, first occurrence first
pub fn atoms(tree: &SyntaxNode) -> Vec<String> {
    tree.walk()
        .filter(|node| node.kind == NodeKind::Atom)
        .map(|node| node.value.clone())
        .collect::<IndexSet<_>>()
        .into_iter()
        .collect()
}

/// The assignment number `index` stands for
fn assignment_for(atoms: &[String], index: u64) -> Assignment {
    atoms
        .iter()
        .enumerate()
        .map(|(j, atom)| (atom.clone(), (index >> j) & 1 == 1))
        .collect()
}

/// Enumerate assignments until one falsifies `tree` or all are exhausted
pub fn check(tree: &SyntaxNode) -> Result<TautologyReport> {
    let atoms = atoms(tree);
    if atoms.len() > MAX_ATOMS {
        return Err(Error::TooManyAtoms(atoms.len()));
    }

    let total = 1u64 << atoms.len();
    let mut checked = 0u64;
    for index in 0..total {
        let assignment = assignment_for(&atoms, index);
        checked += 1;
        if !evaluate(tree, &assignment)? {
            debug!(atoms = atoms.len(), checked, "found falsifying assignment");
            return Ok(TautologyReport {
                atoms,
                assignments_checked: checked,
                counterexample: Some(assignment),
            });
        }
    }

    debug!(atoms = atoms.len(), checked, "tautology holds");
    Ok(TautologyReport {
        atoms,
        assignments_checked: checked,
        counterexample: None,
    })
}

pub fn is_tautology(tree: &SyntaxNode) -> Result<bool> {
    check(tree).map(|report| report.is_tautology())
}
