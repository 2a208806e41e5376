//! STRIPS operators
//!
//! An operator definition has the fixed shape
//!
//! ```text
//! (Label (Param (|x|) (|y|) ...) (Precon P) (AddList A) (DelList D))
//! ```
//!
//! where `P`, `A` and `D` are single well-formed first-order expressions.
//! Applying an operator binds the invocation's actual terms to the formal
//! parameters by position, substitutes them into the effect templates at the
//! tree level, then adds the add-list facts and deletes the delete-list facts.

use indexmap::IndexMap;
use tracing::{debug, info};

use crate::ast::{BinaryOp, Grammar, NodeKind, SyntaxNode, Term};
use crate::error::Error;
use crate::eval::evaluate;
use crate::lexer::{tokenize, TermClasses, Token};
use crate::pretty::pretty_print;
use crate::segment::{segment, split_head};
use crate::world::WorldState;
use crate::Result;

const SHAPE: &str = "(Label (Param ...) (Precon ...) (AddList ...) (DelList ...))";

/// A named action with parameters, a precondition, and effect lists
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StripsOperator {
    pub name: String,
    pub parameters: Vec<Term>,
    pub precondition: SyntaxNode,
    pub add_list: SyntaxNode,
    pub delete_list: SyntaxNode,
    classes: TermClasses,
}

fn malformed(message: impl Into<String>) -> Error {
    Error::MalformedOperator(message.into())
}

/// An uppercase letter followed by letters
fn is_label(label: &str) -> bool {
    let mut chars = label.chars();
    chars.next().is_some_and(|c| c.is_ascii_uppercase()) && chars.all(|c| c.is_ascii_alphabetic())
}

/// Terms written either bare (`|x|`) or wrapped (`(|x|)`)
fn parameter_list(text: &str, classes: &TermClasses) -> Result<Vec<Term>> {
    let tokens: Vec<Token> = tokenize(text, classes)?.into_iter().map(|(tok, _)| tok).collect();
    let mut terms = Vec::new();
    let mut rest = tokens.as_slice();
    loop {
        match rest {
            [] => return Ok(terms),
            [tok, tail @ ..] if tok.term().is_some() => {
                terms.extend(tok.term());
                rest = tail;
            }
            [Token::LParen, tok, Token::RParen, tail @ ..] if tok.term().is_some() => {
                terms.extend(tok.term());
                rest = tail;
            }
            [tok, ..] => return Err(malformed(format!("expected a term parameter, found '{}'", tok))),
        }
    }
}

/// Body text of a `(Head ...)` section, checking the head
fn section<'a>(group: &'a str, expected: &str) -> Result<&'a str> {
    match split_head(group) {
        Some((head, body)) if head == expected => Ok(body),
        Some((head, _)) => Err(malformed(format!("expected ({} ...), found ({} ...)", expected, head))),
        None => Err(malformed(format!("expected ({} ...), found {}", expected, group))),
    }
}

/// The single first-order expression inside a section
fn section_expression(group: &str, expected: &str, classes: &TermClasses) -> Result<SyntaxNode> {
    let body = section(group, expected)?;
    let [expression] = segment(body)[..] else {
        return Err(malformed(format!("{} must hold exactly one expression", expected)));
    };
    let mut root = crate::parse_with(expression, Grammar::FirstOrder, classes)
        .map_err(|e| malformed(format!("{}: {}", expected, e)))?;
    match root.children.len() {
        1 => Ok(root.children.remove(0)),
        n => Err(malformed(format!("{} must hold exactly one expression, found {}", expected, n))),
    }
}

/// Split an effect template into facts: conjunctions contribute each conjunct
fn conjuncts(node: &SyntaxNode) -> Vec<&SyntaxNode> {
    match node.kind {
        NodeKind::Binary(BinaryOp::And) => node.children.iter().flat_map(conjuncts).collect(),
        _ => vec![node],
    }
}

/// Split an invocation `(Label (|a|) (|b|))` into its label and actual terms
pub fn parse_invocation(text: &str, classes: &TermClasses) -> Result<(String, Vec<Term>)> {
    let (label, rest) =
        split_head(text).ok_or_else(|| malformed(format!("expected '(Label (|a|) ...)', found {}", text.trim())))?;
    Ok((label.to_string(), parameter_list(rest, classes)?))
}

impl StripsOperator {
    /// Parse an operator definition
    pub fn parse(text: &str, classes: &TermClasses) -> Result<Self> {
        let (name, rest) = split_head(text).ok_or_else(|| malformed(format!("expected {}", SHAPE)))?;
        if !is_label(name) {
            return Err(malformed(format!(
                "label '{}' must be an uppercase letter followed by letters",
                name
            )));
        }

        let sections = segment(rest);
        let [params, precon, add, del] = sections[..] else {
            return Err(malformed(format!(
                "{} has {} sections, expected {}",
                name,
                sections.len(),
                SHAPE
            )));
        };

        let parameters = parameter_list(section(params, "Param")?, classes)?;
        for (i, param) in parameters.iter().enumerate() {
            if parameters[..i].contains(param) {
                return Err(Error::DuplicateParameter {
                    operator: name.to_string(),
                    parameter: param.to_string(),
                });
            }
        }

        Ok(Self {
            name: name.to_string(),
            parameters,
            precondition: section_expression(precon, "Precon", classes)?,
            add_list: section_expression(add, "AddList", classes)?,
            delete_list: section_expression(del, "DelList", classes)?,
            classes: classes.clone(),
        })
    }

    /// Pair each formal parameter with the invocation's actual term
    pub fn bind(&self, invocation: &str) -> Result<Vec<(Term, Term)>> {
        let (label, actuals) = parse_invocation(invocation, &self.classes)?;
        if label != self.name {
            return Err(Error::OperatorMismatch {
                expected: self.name.clone(),
                found: label,
            });
        }
        if actuals.len() != self.parameters.len() {
            return Err(Error::ArityMismatch {
                operator: self.name.clone(),
                expected: self.parameters.len(),
                found: actuals.len(),
            });
        }
        Ok(self.parameters.iter().copied().zip(actuals).collect())
    }

    /// Facts of an effect template under `bindings`
    pub fn instantiate(template: &SyntaxNode, bindings: &[(Term, Term)]) -> Vec<String> {
        let mut tree = template.clone();
        tree.substitute(bindings);
        conjuncts(&tree).into_iter().map(pretty_print).collect()
    }

    pub fn add_facts(&self, bindings: &[(Term, Term)]) -> Vec<String> {
        Self::instantiate(&self.add_list, bindings)
    }

    pub fn delete_facts(&self, bindings: &[(Term, Term)]) -> Vec<String> {
        Self::instantiate(&self.delete_list, bindings)
    }

    /// Apply one step: returns the next world state.
    ///
    /// Adds are appended first, then each delete removes the first exact match;
    /// a delete fact that is absent is an error. Preconditions are not checked
    /// here.
    pub fn apply(&self, invocation: &str, world: &WorldState) -> Result<WorldState> {
        let bindings = self.bind(invocation)?;
        let mut next = world.clone();
        for fact in self.add_facts(&bindings) {
            debug!(operator = %self.name, %fact, "add");
            next.add(fact);
        }
        for fact in self.delete_facts(&bindings) {
            debug!(operator = %self.name, %fact, "delete");
            next.remove(&fact)?;
        }
        Ok(next)
    }

    /// Whether the instantiated precondition holds in `world`
    pub fn preconditions_hold(&self, invocation: &str, world: &WorldState) -> Result<bool> {
        let bindings = self.bind(invocation)?;
        let mut precondition = self.precondition.clone();
        precondition.substitute(&bindings);
        evaluate(&precondition, world)
    }
}

/// Operators by name, in definition order
#[derive(Clone, Debug, Default)]
pub struct OperatorRegistry {
    classes: TermClasses,
    operators: IndexMap<String, StripsOperator>,
}

impl OperatorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_terms(classes: TermClasses) -> Self {
        Self {
            classes,
            operators: IndexMap::new(),
        }
    }

    /// Define an operator from its text, replacing any operator of the same
    /// name. Nothing is registered if the definition is malformed.
    pub fn define(&mut self, text: &str) -> Result<String> {
        let operator = StripsOperator::parse(text, &self.classes)?;
        let name = operator.name.clone();
        if self.operators.insert(name.clone(), operator).is_some() {
            info!(operator = %name, "operator redefined");
        } else {
            debug!(operator = %name, "operator defined");
        }
        Ok(name)
    }

    pub fn get(&self, name: &str) -> Option<&StripsOperator> {
        self.operators.get(name)
    }

    pub fn len(&self) -> usize {
        self.operators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operators.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &StripsOperator> {
        self.operators.values()
    }

    pub fn clear(&mut self) {
        self.operators.clear();
    }

    /// The operator an invocation names
    pub fn resolve(&self, invocation: &str) -> Result<&StripsOperator> {
        let (label, _) = split_head(invocation)
            .ok_or_else(|| malformed(format!("expected '(Label (|a|) ...)', found {}", invocation.trim())))?;
        self.get(label)
            .ok_or_else(|| Error::UnknownOperator(label.to_string()))
    }

    pub fn apply(&self, invocation: &str, world: &WorldState) -> Result<WorldState> {
        self.resolve(invocation)?.apply(invocation, world)
    }
}
