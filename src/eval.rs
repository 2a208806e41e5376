//! Evaluation of propositional trees
//!
//! [`evaluate`] computes the truth value of a tree bottom-up. Atom values come
//! from a [`Valuation`]: a plain atom-to-bool [`Assignment`], or a
//! [`WorldState`](crate::world::WorldState), where a predicate is true iff its
//! fact is present.

use std::collections::HashMap;
use std::hash::BuildHasher;

use indexmap::IndexMap;

use crate::ast::{NodeKind, SyntaxNode};
use crate::error::Error;
use crate::lexer::TermClasses;
use crate::segment::{segment, strip_outer_parens};
use crate::truth::Truth;
use crate::Result;

/// Atom name to truth value, in insertion order
pub type Assignment = IndexMap<String, bool>;

/// Source of truth values for atom nodes
pub trait Valuation {
    /// Truth value of an atom node (which may carry term children in
    /// first-order trees)
    fn atom(&self, node: &SyntaxNode) -> Result<bool>;
}

impl Valuation for Assignment {
    fn atom(&self, node: &SyntaxNode) -> Result<bool> {
        self.get(&node.value)
            .copied()
            .ok_or_else(|| Error::UnassignedAtom(node.value.clone()))
    }
}

impl<S: BuildHasher> Valuation for HashMap<String, bool, S> {
    fn atom(&self, node: &SyntaxNode) -> Result<bool> {
        self.get(&node.value)
            .copied()
            .ok_or_else(|| Error::UnassignedAtom(node.value.clone()))
    }
}

/// Evaluate `node` under `valuation`.
///
/// A start node evaluates its single child; a start node with any other number
/// of children is an error. Quantifiers and bare terms cannot be evaluated.
pub fn evaluate<V: Valuation + ?Sized>(node: &SyntaxNode, valuation: &V) -> Result<bool> {
    match node.kind {
        NodeKind::Start => match node.children.as_slice() {
            [only] => evaluate(only, valuation),
            children => Err(Error::ExpressionCount(children.len())),
        },
        NodeKind::Atom => valuation.atom(node),
        NodeKind::Binary(op) => match node.children.as_slice() {
            [lhs, rhs] => {
                let lhs = evaluate(lhs, valuation)?;
                let rhs = evaluate(rhs, valuation)?;
                Ok(op.apply(lhs, rhs))
            }
            _ => Err(Error::Unsupported(format!("{} with {} operands", node.kind, node.children.len()))),
        },
        NodeKind::Not => match node.children.as_slice() {
            [operand] => Ok(!evaluate(operand, valuation)?),
            _ => Err(Error::Unsupported(format!("{} with {} operands", node.kind, node.children.len()))),
        },
        NodeKind::Quantifier(_) | NodeKind::Term(_) => Err(Error::Unsupported(node.kind.to_string())),
    }
}

/// Parse a truth assignment written `((P t) (Q nil) ...)`.
///
/// Each pair is an atom name and `t` or `nil`. A later pair for the same atom
/// overrides an earlier one.
pub fn parse_assignment(text: &str) -> Result<Assignment> {
    let mut assignment = Assignment::new();
    for pair in segment(strip_outer_parens(text)) {
        let fields: Vec<&str> = strip_outer_parens(pair).split_whitespace().collect();
        let [atom, value] = fields.as_slice() else {
            return Err(Error::MalformedAssignment(format!(
                "expected '(atom t|nil)', found '{}'",
                pair
            )));
        };
        let value: Truth = value.parse().map_err(Error::MalformedAssignment)?;
        assignment.insert(atom.to_string(), value.as_bool());
    }
    Ok(assignment)
}

/// Truth value of a propositional expression under an assignment given as
/// text.
pub fn truth_value(assignment: &str, expression: &str, classes: &TermClasses) -> Result<Truth> {
    let assignment = parse_assignment(assignment)?;
    let tree = crate::parse_with(expression, crate::Grammar::Propositional, classes)?;
    evaluate(&tree, &assignment).map(Truth::from)
}
