//! Lexer for the logic language
//!
//! Tokenizes one expression into a stream for the parser. Token categories are
//! tried in a fixed priority order at each position and the first match wins,
//! so keywords match as prefixes: `ANDY` lexes as `AND` followed by atom `Y`.
//! Input containing a character sequence that fits no category is rejected as
//! a whole.

use chumsky::prelude::*;
use serde::Deserialize;
use std::ops::Range;

use crate::ast::{BinaryOp, Quantifier, Term, TermKind};

/// Token types for the logic language
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Token {
    LParen,
    RParen,
    Binary(BinaryOp),
    Quantifier(Quantifier),
    Constant(char),
    Function(char),
    Variable(char),
    Not,
    /// `P`, `Q12`, or a quoted name such as `"it rains"` (quotes kept)
    Atom(String),
}

impl Token {
    pub fn term(&self) -> Option<Term> {
        match *self {
            Token::Constant(c) => Some(Term::new(TermKind::Constant, c)),
            Token::Function(c) => Some(Term::new(TermKind::Function, c)),
            Token::Variable(c) => Some(Term::new(TermKind::Variable, c)),
            _ => None,
        }
    }

    fn from_term(term: Term) -> Self {
        match term.kind {
            TermKind::Constant => Token::Constant(term.symbol),
            TermKind::Function => Token::Function(term.symbol),
            TermKind::Variable => Token::Variable(term.symbol),
        }
    }
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Token::LParen => write!(f, "("),
            Token::RParen => write!(f, ")"),
            Token::Binary(op) => write!(f, "{}", op),
            Token::Quantifier(q) => write!(f, "{}", q),
            Token::Constant(c) | Token::Function(c) | Token::Variable(c) => write!(f, "|{}|", c),
            Token::Not => write!(f, "NOT"),
            Token::Atom(s) => write!(f, "{}", s),
        }
    }
}

/// Type alias for spans (character offsets)
pub type Span = Range<usize>;

/// Letter sets partitioning piped terms into constants, functions and variables.
///
/// The partition is a policy, not part of the language: the defaults admit
/// `a`-`e` and `j` as constants, `f`-`h` as functions and `u`-`z` as
/// variables.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TermClasses {
    pub constants: String,
    pub functions: String,
    pub variables: String,
}

impl Default for TermClasses {
    fn default() -> Self {
        Self {
            constants: "abcdej".to_string(),
            functions: "fgh".to_string(),
            variables: "uvwxyz".to_string(),
        }
    }
}

impl TermClasses {
    /// Classify a term letter; `None` if no class admits it
    pub fn classify(&self, symbol: char) -> Option<TermKind> {
        if self.constants.contains(symbol) {
            Some(TermKind::Constant)
        } else if self.functions.contains(symbol) {
            Some(TermKind::Function)
        } else if self.variables.contains(symbol) {
            Some(TermKind::Variable)
        } else {
            None
        }
    }

    /// Check that every class holds lowercase ASCII letters and no letter is
    /// in two classes.
    pub fn validate(&self) -> Result<(), String> {
        let classes = [
            ("constants", &self.constants),
            ("functions", &self.functions),
            ("variables", &self.variables),
        ];
        for (name, letters) in classes {
            if let Some(bad) = letters.chars().find(|c| !c.is_ascii_lowercase()) {
                return Err(format!("{} contains '{}', expected lowercase letters", name, bad));
            }
        }
        for (i, (name_a, a)) in classes.iter().enumerate() {
            for (name_b, b) in &classes[i + 1..] {
                if let Some(shared) = a.chars().find(|c| b.contains(*c)) {
                    return Err(format!("'{}' is in both {} and {}", shared, name_a, name_b));
                }
            }
        }
        Ok(())
    }
}

/// Create a lexer using the given term classes
pub fn lexer(classes: &TermClasses) -> impl Parser<char, Vec<(Token, Span)>, Error = Simple<char>> {
    let classes = classes.clone();

    let left_paren = just('(').to(Token::LParen);
    let right_paren = just(')').to(Token::RParen);

    let binary = choice((
        just("AND").to(BinaryOp::And),
        just("OR").to(BinaryOp::Or),
        just("EQUIV").to(BinaryOp::Equiv),
        just("IMPLIES").to(BinaryOp::Implies),
    ))
    .map(Token::Binary);

    let quantifier = choice((
        just("ALL").to(Quantifier::All),
        just("EXISTS").to(Quantifier::Exists),
    ))
    .map(Token::Quantifier);

    // A piped letter outside every class matches no category at all
    let term = just('|')
        .ignore_then(filter(|c: &char| c.is_ascii_lowercase()))
        .then_ignore(just('|'))
        .try_map(move |symbol, span| {
            classes
                .classify(symbol)
                .map(|kind| Token::from_term(Term::new(kind, symbol)))
                .ok_or_else(|| Simple::custom(span, format!("'|{}|' is not a known term", symbol)))
        });

    let unary = just("NOT").to(Token::Not);

    let plain_atom = filter(|c: &char| c.is_ascii_uppercase())
        .chain(filter(|c: &char| c.is_ascii_digit()).repeated())
        .collect::<String>();
    let quoted_atom = just('"')
        .chain(
            filter(|c: &char| c.is_alphanumeric() || *c == '_' || *c == ' ')
                .repeated()
                .at_least(1),
        )
        .chain(just('"'))
        .collect::<String>();
    let atom = plain_atom.or(quoted_atom).map(Token::Atom);

    let token = choice((left_paren, right_paren, binary, quantifier, term, unary, atom));

    token
        .map_with_span(|tok, span| (tok, span))
        .padded()
        .repeated()
        .padded()
        .then_ignore(end())
}

/// Tokenize `input`, reporting the left-most failure.
pub fn tokenize(input: &str, classes: &TermClasses) -> crate::Result<Vec<(Token, Span)>> {
    lexer(classes).parse(input).map_err(crate::error::from_lexer_errors)
}
