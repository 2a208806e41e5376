//! Unit tests for segmentation, lexer and parser

use pretty_assertions::assert_eq;
use proplog::ast::{BinaryOp, NodeKind, Quantifier, TermKind};
use proplog::lexer::{tokenize, Token};
use proplog::parser::MAX_DEPTH;
use proplog::{check, parse, segment, Error, Grammar, TermClasses};

fn tokens(input: &str) -> Vec<Token> {
    tokenize(input, &TermClasses::default())
        .expect("lex failed")
        .into_iter()
        .map(|(t, _)| t)
        .collect()
}

// ============================================================================
// Segmentation
// ============================================================================

#[test]
fn test_segment_top_level_groups() {
    assert_eq!(
        segment("(AND (P) (Q)) (NOT (R))"),
        vec!["(AND (P) (Q))", "(NOT (R))"]
    );
}

#[test]
fn test_segment_adjacent_groups() {
    assert_eq!(segment("((P t)(Q nil))"), vec!["((P t)(Q nil))"]);
    assert_eq!(segment("(P t)(Q nil)"), vec!["(P t)", "(Q nil)"]);
}

#[test]
fn test_segment_empty_and_unbalanced() {
    assert!(segment("").is_empty());
    assert!(segment("no groups here").is_empty());
    assert!(segment("(unclosed (P)").is_empty());
}

// ============================================================================
// Lexer
// ============================================================================

#[test]
fn test_lex_propositional() {
    assert_eq!(
        tokens("(IMPLIES (P) (NOT (Q2)))"),
        vec![
            Token::LParen,
            Token::Binary(BinaryOp::Implies),
            Token::LParen,
            Token::Atom("P".to_string()),
            Token::RParen,
            Token::LParen,
            Token::Not,
            Token::LParen,
            Token::Atom("Q2".to_string()),
            Token::RParen,
            Token::RParen,
            Token::RParen,
        ]
    );
}

#[test]
fn test_lex_terms_by_class() {
    assert_eq!(
        tokens("(ALL |x| (P |a| |f|))"),
        vec![
            Token::LParen,
            Token::Quantifier(Quantifier::All),
            Token::Variable('x'),
            Token::LParen,
            Token::Atom("P".to_string()),
            Token::Constant('a'),
            Token::Function('f'),
            Token::RParen,
            Token::RParen,
        ]
    );
}

#[test]
fn test_lex_keywords_match_as_prefixes() {
    assert_eq!(
        tokens("ANDY"),
        vec![Token::Binary(BinaryOp::And), Token::Atom("Y".to_string())]
    );
    assert_eq!(tokens("EXISTSQ")[0], Token::Quantifier(Quantifier::Exists));
    assert_eq!(tokens("EQUIV")[0], Token::Binary(BinaryOp::Equiv));
}

#[test]
fn test_lex_quoted_atom_keeps_quotes() {
    assert_eq!(tokens("(\"it rains\")")[1], Token::Atom("\"it rains\"".to_string()));
}

#[test]
fn test_lex_spans_are_character_offsets() {
    let spans: Vec<_> = tokenize("(OR (P) (Q))", &TermClasses::default())
        .unwrap()
        .into_iter()
        .map(|(_, s)| s.start)
        .collect();
    assert_eq!(spans, vec![0, 1, 4, 5, 6, 8, 9, 10, 11]);
}

#[test]
fn test_lex_whitespace_only_is_empty() {
    assert!(tokens("  \n\t ").is_empty());
}

#[test]
fn test_lex_unknown_term_letter() {
    let err = tokenize("(|q|)", &TermClasses::default()).unwrap_err();
    assert!(matches!(err, Error::Lex { .. }));
    assert_eq!(err.span().map(|s| s.start), Some(1));
}

#[test]
fn test_lex_custom_term_classes() {
    let classes = TermClasses {
        constants: "q".to_string(),
        functions: String::new(),
        variables: "x".to_string(),
    };
    let toks: Vec<_> = tokenize("|q|", &classes).unwrap().into_iter().map(|(t, _)| t).collect();
    assert_eq!(toks, vec![Token::Constant('q')]);
    assert!(tokenize("|a|", &classes).is_err());
}

#[test]
fn test_lex_rejects_lowercase_words() {
    assert!(tokenize("(p)", &TermClasses::default()).is_err());
    assert!(tokenize("(P) ; comment", &TermClasses::default()).is_err());
}

// ============================================================================
// Parser
// ============================================================================

#[test]
fn test_parse_binary_tree() {
    let root = parse("(AND (P) (Q))", Grammar::Propositional).expect("parse failed");
    assert!(root.is_start());
    assert_eq!(root.children.len(), 1);

    let and = &root.children[0];
    assert_eq!(and.kind, NodeKind::Binary(BinaryOp::And));
    assert!(and.grouped);
    let names: Vec<_> = and.children.iter().map(|c| c.value.as_str()).collect();
    assert_eq!(names, vec!["P", "Q"]);
    assert!(and.children.iter().all(|c| c.kind == NodeKind::Atom));
}

#[test]
fn test_parse_several_top_level_items() {
    let root = parse("(P) (NOT (Q))", Grammar::Propositional).unwrap();
    assert_eq!(root.children.len(), 2);
    assert!(root.expression().is_none());
}

#[test]
fn test_parse_nested_spans() {
    let root = parse("(NOT (P))", Grammar::Propositional).unwrap();
    let not = root.expression().unwrap();
    assert_eq!((not.span.start, not.span.end), (0, 9));
    assert_eq!((not.children[0].span.start, not.children[0].span.end), (5, 8));
}

#[test]
fn test_well_formed_propositional() {
    for input in [
        "(P)",
        "(NOT (P))",
        "(OR (P) (NOT (P)))",
        "(IMPLIES (AND (P) (Q)) (EQUIV (R1) (\"it rains\")))",
    ] {
        assert!(check(input, Grammar::Propositional), "{input}");
    }
}

#[test]
fn test_malformed_propositional() {
    for input in [
        "",
        "   ",
        "()",
        "P",
        "((P))",
        "(AND (P))",
        "(AND (P) (Q) (R))",
        "(NOT (P) (Q))",
        "(NOT)",
        "(P (Q))",
        "(AND (P) (Q)",
        "(AND (P) (Q)))",
        "(P |a|)",
        "(ALL |x| (P))",
        "(ANDY (P) (Q))",
    ] {
        assert!(!check(input, Grammar::Propositional), "{input:?}");
    }
}

fn nested_not(depth: usize) -> String {
    format!("{}(P){}", "(NOT ".repeat(depth), ")".repeat(depth))
}

#[test]
fn test_deep_nesting_is_malformed_not_fatal() {
    let input = nested_not(20_000);
    assert!(!check(&input, Grammar::Propositional));
    assert!(!check(&input, Grammar::FirstOrder));

    let err = parse(&input, Grammar::Propositional).unwrap_err();
    assert!(matches!(err, Error::Parse { ref message, .. } if message.contains("nesting too deep")));
    // The span points at the first '(' past the limit
    assert_eq!(err.span().map(|s| s.start), Some(MAX_DEPTH * 5));
}

#[test]
fn test_nesting_at_limit_is_accepted() {
    // The atom group itself is one level
    let root = parse(&nested_not(MAX_DEPTH - 1), Grammar::Propositional).expect("parse failed");
    assert_eq!(root.walk().count(), MAX_DEPTH + 1);
    assert!(!check(&nested_not(MAX_DEPTH), Grammar::Propositional));
}

#[test]
fn test_well_formed_first_order() {
    for input in [
        "(P |a| |d|)",
        "(ALL |x| (P |x|))",
        "(EXISTS |y| (AND (P |y|) (Q |a| |y|)))",
        "(P (|f| |a|))",
        "(OR (P) (Q))",
    ] {
        assert!(check(input, Grammar::FirstOrder), "{input}");
    }
}

#[test]
fn test_malformed_first_order() {
    for input in ["()", "", "(AND (P |a|))", "(|q| |a|)", "(P |a|", "P"] {
        assert!(!check(input, Grammar::FirstOrder), "{input:?}");
    }
}

#[test]
fn test_parse_first_order_terms() {
    let root = parse("(P |a| |x|)", Grammar::FirstOrder).unwrap();
    let atom = root.expression().unwrap();
    assert_eq!(atom.kind, NodeKind::Atom);
    let kinds: Vec<_> = atom.children.iter().map(|c| c.kind).collect();
    assert_eq!(
        kinds,
        vec![NodeKind::Term(TermKind::Constant), NodeKind::Term(TermKind::Variable)]
    );
    assert!(atom.children.iter().all(|c| !c.grouped));
}

#[test]
fn test_parse_error_is_malformed() {
    let err = parse("(AND (P))", Grammar::Propositional).unwrap_err();
    assert!(matches!(err, Error::Parse { .. }));
    assert!(err.is_malformed());

    let err = parse("()", Grammar::FirstOrder).unwrap_err();
    assert!(err.is_malformed());
}

#[test]
fn test_render_lexical_error() {
    let source = "(|q|)";
    let err = parse(source, Grammar::FirstOrder).unwrap_err();
    let report = proplog::error::render(source, &err);
    assert!(report.contains("Lexical error"), "{report}");
}

#[test]
fn test_render_other_errors_as_message() {
    let err = Error::UnassignedAtom("P".to_string());
    assert_eq!(proplog::error::render("(P)", &err), err.to_string());
}
