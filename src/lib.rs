//! Proplog: S-expression propositional and first-order logic
//!
//! Parses expressions such as `(IMPLIES (P) (OR (P) (Q)))` or
//! `(ALL |x| (P |x|))`, checks well-formedness, evaluates propositions under a
//! truth assignment, checks tautologies by exhaustive enumeration, and executes
//! fixed STRIPS plans against a world state.

pub mod ast;
pub mod batch;
pub mod config;
pub mod error;
pub mod eval;
pub mod lexer;
pub mod parser;
pub mod plan;
pub mod pretty;
pub mod repl;
pub mod segment;
pub mod strips;
pub mod tautology;
pub mod truth;
pub mod world;

pub use ast::{Grammar, NodeKind, SyntaxNode};
pub use error::Error;
pub use eval::{evaluate, Assignment};
pub use lexer::{lexer, TermClasses, Token};
pub use parser::parser;
pub use pretty::pretty_print;
pub use segment::segment;
pub use strips::{OperatorRegistry, StripsOperator};
pub use tautology::is_tautology;
pub use truth::Truth;
pub use world::WorldState;

pub type Result<T> = std::result::Result<T, Error>;

/// Parse one input in the given grammar using the default term classes
pub fn parse(input: &str, grammar: Grammar) -> Result<SyntaxNode> {
    parse_with(input, grammar, &TermClasses::default())
}

/// Parse one input in the given grammar
pub fn parse_with(input: &str, grammar: Grammar, classes: &TermClasses) -> Result<SyntaxNode> {
    let tokens = lexer::tokenize(input, classes)?;
    parser::parse_tokens(tokens, grammar, input.chars().count())
}

/// Well-formedness check: true iff `input` lexes and parses in `grammar`
pub fn check(input: &str, grammar: Grammar) -> bool {
    parse(input, grammar).is_ok()
}

pub fn check_with(input: &str, grammar: Grammar, classes: &TermClasses) -> bool {
    parse_with(input, grammar, classes).is_ok()
}
