//! Batch runner for tagged test blocks
//!
//! Input holds top-level blocks whose head word selects the test:
//!
//! ```text
//! (part_a (AND (P) (Q)) (OR (P)))              ; propositional well-formedness
//! (part_b ((AND (P) (Q))) ((P t) (Q nil)))     ; evaluation under an assignment
//! (part_b_tautology ((OR (P) (NOT (P)))))      ; tautology check
//! (part_c (P |x|) (ALL |x| (P |x|)))           ; first-order well-formedness
//! ```
//!
//! Every expression yields one `(tag expression result)` line. A blank line
//! precedes each section other than `part_a`. One failing item never stops the
//! rest of the batch.

use std::fmt;

use tracing::warn;

use crate::ast::Grammar;
use crate::error::Error;
use crate::eval::{evaluate, parse_assignment};
use crate::lexer::TermClasses;
use crate::segment::{segment, split_head, strip_outer_parens};
use crate::tautology::is_tautology;
use crate::truth::Truth;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TestKind {
    /// `part_a`
    WellFormed,
    /// `part_b`
    Evaluate,
    /// `part_b_tautology` (any `part_b_` tag)
    Tautology,
    /// `part_c`
    WellFormedFirstOrder,
}

impl TestKind {
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "part_a" => Some(TestKind::WellFormed),
            "part_b" => Some(TestKind::Evaluate),
            "part_c" => Some(TestKind::WellFormedFirstOrder),
            t if t.starts_with("part_b_") => Some(TestKind::Tautology),
            _ => None,
        }
    }

    pub fn tag(self) -> &'static str {
        match self {
            TestKind::WellFormed => "part_a",
            TestKind::Evaluate => "part_b",
            TestKind::Tautology => "part_b_tautology",
            TestKind::WellFormedFirstOrder => "part_c",
        }
    }
}

/// Result of one item
#[derive(Debug)]
pub struct BatchLine {
    pub kind: TestKind,
    pub expression: String,
    pub outcome: Result<Truth, Error>,
}

impl fmt::Display for BatchLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.outcome {
            Ok(truth) => write!(f, "({} {} {})", self.kind.tag(), self.expression, truth),
            Err(_) => write!(f, "({} {} error)", self.kind.tag(), self.expression),
        }
    }
}

/// Lines of one block
#[derive(Debug)]
pub struct BatchSection {
    pub kind: TestKind,
    pub lines: Vec<BatchLine>,
}

#[derive(Debug, Default)]
pub struct BatchReport {
    pub sections: Vec<BatchSection>,
}

impl BatchReport {
    pub fn lines(&self) -> impl Iterator<Item = &BatchLine> {
        self.sections.iter().flat_map(|s| s.lines.iter())
    }
}

/// Every section except `part_a` starts with a blank line, even when it comes first
impl fmt::Display for BatchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for section in &self.sections {
            if section.kind != TestKind::WellFormed {
                writeln!(f)?;
            }
            for line in &section.lines {
                writeln!(f, "{}", line)?;
            }
        }
        Ok(())
    }
}

fn well_formed(expression: &str, grammar: Grammar, classes: &TermClasses) -> Truth {
    crate::check_with(expression, grammar, classes).into()
}

fn tautology(expression: &str, classes: &TermClasses) -> Result<Truth, Error> {
    let tree = crate::parse_with(expression, Grammar::Propositional, classes)?;
    is_tautology(&tree).map(Truth::from)
}

/// Run every recognized block in `source`
pub fn run(source: &str, classes: &TermClasses) -> BatchReport {
    let mut report = BatchReport::default();

    for block in segment(source) {
        let Some((tag, _)) = split_head(block) else {
            continue;
        };
        let Some(kind) = TestKind::from_tag(tag) else {
            warn!(tag, "skipping unknown test block");
            continue;
        };
        let lines = run_block(kind, strip_outer_parens(block), classes);
        report.sections.push(BatchSection { kind, lines });
    }

    report
}

fn run_block(kind: TestKind, body: &str, classes: &TermClasses) -> Vec<BatchLine> {
    let line = |expression: &str, outcome: Result<Truth, Error>| {
        if let Err(e) = &outcome {
            warn!(tag = kind.tag(), expression, error = %e, "item failed");
        }
        BatchLine {
            kind,
            expression: expression.to_string(),
            outcome,
        }
    };

    match kind {
        TestKind::WellFormed | TestKind::WellFormedFirstOrder => {
            let grammar = if kind == TestKind::WellFormed {
                Grammar::Propositional
            } else {
                Grammar::FirstOrder
            };
            segment(body)
                .into_iter()
                .map(|e| line(e, Ok(well_formed(e, grammar, classes))))
                .collect()
        }
        TestKind::Evaluate => {
            let parts = segment(body);
            let (Some(expressions), Some(values)) = (parts.first(), parts.get(1)) else {
                warn!(tag = kind.tag(), "expected an expression list and an assignment");
                return Vec::new();
            };
            let assignment = parse_assignment(values).map_err(|e| match e {
                Error::MalformedAssignment(message) => message,
                other => other.to_string(),
            });
            segment(strip_outer_parens(expressions))
                .into_iter()
                .map(|e| {
                    let outcome = match &assignment {
                        Ok(assignment) => crate::parse_with(e, Grammar::Propositional, classes)
                            .and_then(|tree| evaluate(&tree, assignment))
                            .map(Truth::from),
                        Err(message) => Err(Error::MalformedAssignment(message.clone())),
                    };
                    line(e, outcome)
                })
                .collect()
        }
        TestKind::Tautology => {
            let parts = segment(body);
            let Some(expressions) = parts.first() else {
                warn!(tag = kind.tag(), "expected an expression list");
                return Vec::new();
            };
            segment(strip_outer_parens(expressions))
                .into_iter()
                .map(|e| line(e, tautology(e, classes)))
                .collect()
        }
    }
}
