//! Errors and diagnostics
//!
//! Malformed input (lexical or structural) is an ordinary, reportable outcome.
//! Contract violations by the caller, such as evaluating an atom with no
//! assignment or deleting a fact that is not in the world state, are reported
//! through the same enum instead of aborting.

use ariadne::{Color, Label, Report, ReportKind, Source};
use chumsky::error::SimpleReason;
use chumsky::prelude::Simple;
use thiserror::Error;

use crate::ast::Span;
use crate::lexer::Token;

#[derive(Debug, Error)]
pub enum Error {
    #[error("lexical error at {}: {message}", .span.start)]
    Lex { span: Span, message: String },

    #[error("parse error at {}: {message}", .span.start)]
    Parse { span: Span, message: String },

    #[error("atom {0} has no truth value in the assignment")]
    UnassignedAtom(String),

    #[error("cannot evaluate a {0} node")]
    Unsupported(String),

    #[error("expected exactly one expression, found {0}")]
    ExpressionCount(usize),

    #[error("{0} distinct atoms cannot be enumerated (limit is 63)")]
    TooManyAtoms(usize),

    #[error("malformed truth assignment: {0}")]
    MalformedAssignment(String),

    #[error("malformed operator definition: {0}")]
    MalformedOperator(String),

    #[error("operator {operator} declares parameter {parameter} more than once")]
    DuplicateParameter { operator: String, parameter: String },

    #[error("no operator named {0}")]
    UnknownOperator(String),

    #[error("invocation of {found} applied to operator {expected}")]
    OperatorMismatch { expected: String, found: String },

    #[error("operator {operator} takes {expected} parameters, invocation supplies {found}")]
    ArityMismatch {
        operator: String,
        expected: usize,
        found: usize,
    },

    #[error("fact {0} is not in the world state")]
    MissingFact(String),

    #[error("planning problem has {0} malformed item(s)")]
    IllFormedProblem(usize),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error(transparent)]
    Toml(#[from] toml::de::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    /// True for the malformed-input class (lexical and parse errors)
    pub fn is_malformed(&self) -> bool {
        matches!(self, Error::Lex { .. } | Error::Parse { .. })
    }

    pub fn span(&self) -> Option<Span> {
        match self {
            Error::Lex { span, .. } | Error::Parse { span, .. } => Some(*span),
            _ => None,
        }
    }
}

/// Keep the left-most lexer error
pub(crate) fn from_lexer_errors(errors: Vec<Simple<char>>) -> Error {
    match errors.into_iter().min_by_key(|e| e.span().start) {
        Some(error) => {
            let span = error.span();
            Error::Lex {
                span: Span::new(span.start, span.end),
                message: format_lexer_error(&error),
            }
        }
        None => Error::Lex {
            span: Span::default(),
            message: "unrecognized input".to_string(),
        },
    }
}

/// Keep the left-most parser error
pub(crate) fn from_parser_errors(errors: Vec<Simple<Token>>) -> Error {
    match errors.into_iter().min_by_key(|e| e.span().start) {
        Some(error) => {
            let span = error.span();
            Error::Parse {
                span: Span::new(span.start, span.end),
                message: format_parser_error(&error),
            }
        }
        None => Error::Parse {
            span: Span::default(),
            message: "malformed expression".to_string(),
        },
    }
}

/// Render an error against its source text.
///
/// Lexical and parse errors become labelled `ariadne` reports; everything else
/// renders as its message.
pub fn render(source: &str, error: &Error) -> String {
    let (title, span, message) = match error {
        Error::Lex { span, message } => ("Lexical error", span, message),
        Error::Parse { span, message } => ("Parse error", span, message),
        _ => return error.to_string(),
    };

    let len = source.chars().count();
    let start = span.start.min(len);
    let end = span.end.clamp(start, len);

    let mut output = Vec::new();
    let written = Report::build(ReportKind::Error, (), start)
        .with_message(title)
        .with_label(
            Label::new(start..end)
                .with_message(message)
                .with_color(Color::Red),
        )
        .finish()
        .write(Source::from(source), &mut output);

    match written {
        Ok(()) => String::from_utf8(output).unwrap_or_else(|_| error.to_string()),
        Err(_) => error.to_string(),
    }
}

/// Format a single lexer error into a readable message
fn format_lexer_error(error: &Simple<char>) -> String {
    if let SimpleReason::Custom(msg) = error.reason() {
        return msg.clone();
    }

    let found = error
        .found()
        .map(|c| format!("'{}'", c))
        .unwrap_or_else(|| "end of input".to_string());

    if error.expected().next().is_some() {
        format!(
            "Unexpected {}, expected {}",
            found,
            format_char_set(error.expected())
        )
    } else {
        format!("Unexpected character {}", found)
    }
}

/// Format a single parser error into a readable message
fn format_parser_error(error: &Simple<Token>) -> String {
    if let SimpleReason::Custom(msg) = error.reason() {
        return msg.clone();
    }

    let found = error
        .found()
        .map(|t| format!("'{}'", t))
        .unwrap_or_else(|| "end of input".to_string());

    let expected = format_token_set(error.expected());

    if let SimpleReason::Unclosed { .. } = error.reason() {
        format!("Unclosed '(', found {}", found)
    } else if !expected.is_empty() {
        format!("Unexpected {}, expected one of: {}", found, expected.join(", "))
    } else if let Some(label) = error.label() {
        label.to_string()
    } else {
        format!("Unexpected token {}", found)
    }
}

/// Format a set of expected tokens
fn format_token_set<'a>(expected: impl Iterator<Item = &'a Option<Token>>) -> Vec<String> {
    let mut tokens: Vec<String> = expected
        .filter_map(|opt| opt.as_ref())
        .map(|t| format!("'{}'", t))
        .collect();
    tokens.sort();
    tokens
}

/// Format a set of expected characters
fn format_char_set<'a>(expected: impl Iterator<Item = &'a Option<char>>) -> String {
    let mut chars: Vec<String> = expected
        .filter_map(|opt| opt.as_ref())
        .map(|c| format!("'{}'", c))
        .collect();
    chars.sort();

    if chars.is_empty() {
        "valid character".to_string()
    } else if chars.len() == 1 {
        chars[0].clone()
    } else {
        chars.join(" or ")
    }
}
