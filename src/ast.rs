//! Syntax trees for propositional and first-order expressions
//!
//! Trees are plain owned values: every node owns its children and there are no
//! back-references. The parser builds them bottom-up, so no parent pointer is
//! ever needed.

use std::fmt;

/// A span in the source text, in characters, for error reporting
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }
}

/// Which grammar the parser enforces
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum Grammar {
    /// Connectives and atoms only
    #[default]
    Propositional,
    /// Adds quantifiers, constants, functions and variables
    FirstOrder,
}

impl Grammar {
    pub fn is_first_order(self) -> bool {
        matches!(self, Grammar::FirstOrder)
    }
}

impl fmt::Display for Grammar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Grammar::Propositional => write!(f, "propositional"),
            Grammar::FirstOrder => write!(f, "first-order"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    And,
    Or,
    Equiv,
    Implies,
}

impl BinaryOp {
    /// Truth table of the connective
    pub fn apply(self, lhs: bool, rhs: bool) -> bool {
        match self {
            BinaryOp::And => lhs && rhs,
            BinaryOp::Or => lhs || rhs,
            BinaryOp::Implies => !lhs || rhs,
            BinaryOp::Equiv => lhs == rhs,
        }
    }

    pub fn keyword(self) -> &'static str {
        match self {
            BinaryOp::And => "AND",
            BinaryOp::Or => "OR",
            BinaryOp::Equiv => "EQUIV",
            BinaryOp::Implies => "IMPLIES",
        }
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Quantifier {
    All,
    Exists,
}

impl Quantifier {
    pub fn keyword(self) -> &'static str {
        match self {
            Quantifier::All => "ALL",
            Quantifier::Exists => "EXISTS",
        }
    }
}

impl fmt::Display for Quantifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// The three piped-letter term categories of first-order expressions
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TermKind {
    Constant,
    Function,
    Variable,
}

impl fmt::Display for TermKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TermKind::Constant => write!(f, "constant"),
            TermKind::Function => write!(f, "function"),
            TermKind::Variable => write!(f, "variable"),
        }
    }
}

/// A first-order term symbol: `|x|`, `|a|`, `|f|`
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Term {
    pub kind: TermKind,
    pub symbol: char,
}

impl Term {
    pub fn new(kind: TermKind, symbol: char) -> Self {
        Self { kind, symbol }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "|{}|", self.symbol)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// Synthetic root; its children are the top-level items of the input
    Start,
    Binary(BinaryOp),
    Not,
    Quantifier(Quantifier),
    Atom,
    Term(TermKind),
}

impl NodeKind {
    /// Kinds that only the first-order grammar admits
    pub fn is_first_order_only(self) -> bool {
        matches!(self, NodeKind::Term(_) | NodeKind::Quantifier(_))
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeKind::Start => write!(f, "start"),
            NodeKind::Binary(op) => write!(f, "binary operator {}", op),
            NodeKind::Not => write!(f, "unary operator NOT"),
            NodeKind::Quantifier(q) => write!(f, "quantifier {}", q),
            NodeKind::Atom => write!(f, "atom"),
            NodeKind::Term(kind) => write!(f, "{} term", kind),
        }
    }
}

/// A node of a parsed expression
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SyntaxNode {
    pub kind: NodeKind,
    /// Source text of the node's token (`AND`, `P3`, `|x|`, `start`)
    pub value: String,
    /// True if the node was written as the head of a parenthesized group
    pub grouped: bool,
    pub span: Span,
    pub children: Vec<SyntaxNode>,
}

impl SyntaxNode {
    pub fn start(children: Vec<SyntaxNode>, span: Span) -> Self {
        Self {
            kind: NodeKind::Start,
            value: "start".to_string(),
            grouped: false,
            span,
            children,
        }
    }

    pub fn is_start(&self) -> bool {
        self.kind == NodeKind::Start
    }

    /// The term symbol of a term node
    pub fn term(&self) -> Option<Term> {
        match self.kind {
            NodeKind::Term(kind) => self.value.chars().nth(1).map(|symbol| Term::new(kind, symbol)),
            _ => None,
        }
    }

    /// The single expression below a start node, or the node itself
    pub fn expression(&self) -> Option<&SyntaxNode> {
        match (self.kind, self.children.as_slice()) {
            (NodeKind::Start, [only]) => Some(only),
            (NodeKind::Start, _) => None,
            _ => Some(self),
        }
    }

    /// Pre-order walk over this node and all descendants
    pub fn walk(&self) -> impl Iterator<Item = &SyntaxNode> {
        let mut stack = vec![self];
        std::iter::from_fn(move || {
            let node = stack.pop()?;
            stack.extend(node.children.iter().rev());
            Some(node)
        })
    }

    /// Term leaves in pre-order, with duplicates
    pub fn terms(&self) -> impl Iterator<Item = Term> + '_ {
        self.walk().filter_map(SyntaxNode::term)
    }

    /// Rewrite every term equal to a key of `mapping` in place.
    ///
    /// `mapping` pairs are tried in order; the first match wins.
    pub fn substitute(&mut self, mapping: &[(Term, Term)]) {
        if let Some(term) = self.term() {
            if let Some((_, replacement)) = mapping.iter().find(|(from, _)| *from == term) {
                self.kind = NodeKind::Term(replacement.kind);
                self.value = replacement.to_string();
            }
        }
        for child in &mut self.children {
            child.substitute(mapping);
        }
    }
}

impl fmt::Display for SyntaxNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&crate::pretty::pretty_print(self))
    }
}
