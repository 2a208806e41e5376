//! Parser for the logic language
//!
//! Parses token streams into owned [`SyntaxNode`] trees. The grammar is the
//! same for both modes:
//!
//! ```text
//! input := item+
//! item  := group | leaf
//! group := '(' head item* ')'
//! ```
//!
//! Every operator and atom must head a parenthesized group; first-order
//! tokens (terms and quantifiers) are only admitted by [`Grammar::FirstOrder`],
//! where they may also stand alone as leaves.

use chumsky::prelude::*;
use chumsky::Stream;

use crate::ast::{Grammar, NodeKind, Span as NodeSpan, SyntaxNode};
use crate::lexer::{Span, Token};

/// Create a parser for one input in the given grammar mode
pub fn parser(grammar: Grammar) -> impl Parser<Token, SyntaxNode, Error = Simple<Token>> + Clone {
    item(grammar)
        .repeated()
        .at_least(1)
        .then_ignore(end())
        .map_with_span(|children, span: Span| SyntaxNode::start(children, to_span(span)))
}

/// Deepest group nesting the parser accepts. The parser and every tree walker
/// recurse once per level.
pub const MAX_DEPTH: usize = 1024;

/// Reject input nested deeper than [`MAX_DEPTH`] before any recursion happens
fn check_depth(tokens: &[(Token, Span)]) -> crate::Result<()> {
    let mut depth = 0usize;
    for (tok, span) in tokens {
        match tok {
            Token::LParen => {
                depth += 1;
                if depth > MAX_DEPTH {
                    return Err(crate::Error::Parse {
                        span: to_span(span.clone()),
                        message: format!("nesting too deep (limit is {})", MAX_DEPTH),
                    });
                }
            }
            Token::RParen => depth = depth.saturating_sub(1),
            _ => {}
        }
    }
    Ok(())
}

/// Parse an already tokenized input. `len` is the input length in characters.
pub fn parse_tokens(tokens: Vec<(Token, Span)>, grammar: Grammar, len: usize) -> crate::Result<SyntaxNode> {
    check_depth(&tokens)?;
    parser(grammar)
        .parse(Stream::from_iter(len..len + 1, tokens.into_iter()))
        .map_err(crate::error::from_parser_errors)
}

fn to_span(span: Span) -> NodeSpan {
    NodeSpan::new(span.start, span.end)
}

fn item(grammar: Grammar) -> impl Parser<Token, SyntaxNode, Error = Simple<Token>> + Clone {
    recursive(move |item| {
        let head = any().try_map(move |tok: Token, span: Span| head_node(grammar, tok, span));

        let leaf = filter(|tok: &Token| !matches!(tok, Token::LParen | Token::RParen))
            .try_map(move |tok: Token, span: Span| leaf_node(grammar, tok, span));

        let group = just(Token::LParen)
            .ignore_then(head)
            .then(item.repeated())
            .then_ignore(just(Token::RParen))
            .try_map(move |(head, children), span: Span| close_group(grammar, head, children, span));

        group.or(leaf)
    })
}

fn node(kind: NodeKind, tok: &Token, grouped: bool, span: Span) -> SyntaxNode {
    SyntaxNode {
        kind,
        value: tok.to_string(),
        grouped,
        span: to_span(span),
        children: Vec::new(),
    }
}

fn node_kind(tok: &Token) -> Option<NodeKind> {
    match tok {
        Token::LParen | Token::RParen => None,
        Token::Binary(op) => Some(NodeKind::Binary(*op)),
        Token::Not => Some(NodeKind::Not),
        Token::Quantifier(q) => Some(NodeKind::Quantifier(*q)),
        Token::Atom(_) => Some(NodeKind::Atom),
        Token::Constant(_) | Token::Function(_) | Token::Variable(_) => {
            tok.term().map(|term| NodeKind::Term(term.kind))
        }
    }
}

/// The token right after `(`
fn head_node(grammar: Grammar, tok: Token, span: Span) -> Result<SyntaxNode, Simple<Token>> {
    let kind = match (&tok, node_kind(&tok)) {
        (Token::RParen, _) => return Err(Simple::custom(span, "Empty group '()'")),
        (_, None) => {
            return Err(Simple::custom(
                span,
                format!("Expected an operator, atom or term after '(', found '{}'", tok),
            ))
        }
        (_, Some(kind)) => kind,
    };
    if kind.is_first_order_only() && !grammar.is_first_order() {
        return Err(Simple::custom(
            span,
            format!("'{}' is not allowed in a {} expression", tok, grammar),
        ));
    }
    Ok(node(kind, &tok, true, span))
}

/// A token outside head position
fn leaf_node(grammar: Grammar, tok: Token, span: Span) -> Result<SyntaxNode, Simple<Token>> {
    match node_kind(&tok) {
        Some(kind) if kind.is_first_order_only() => {
            if grammar.is_first_order() {
                Ok(node(kind, &tok, false, span))
            } else {
                Err(Simple::custom(
                    span,
                    format!("'{}' is not allowed in a {} expression", tok, grammar),
                ))
            }
        }
        _ => Err(Simple::custom(
            span,
            format!("'{}' must be written at the head of a parenthesized group", tok),
        )),
    }
}

/// Attach children to a group head, checking connective arity
fn close_group(
    grammar: Grammar,
    mut head: SyntaxNode,
    children: Vec<SyntaxNode>,
    span: Span,
) -> Result<SyntaxNode, Simple<Token>> {
    let arity = match head.kind {
        NodeKind::Binary(_) => Some(2),
        NodeKind::Not => Some(1),
        NodeKind::Atom if !grammar.is_first_order() => Some(0),
        _ => None,
    };
    if let Some(expected) = arity {
        if children.len() != expected {
            return Err(Simple::custom(
                span,
                format!(
                    "'{}' takes {} operand(s), found {}",
                    head.value,
                    expected,
                    children.len()
                ),
            ));
        }
    }
    head.span = to_span(span);
    head.children = children;
    Ok(head)
}
