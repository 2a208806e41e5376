//! Fixed-plan execution
//!
//! A planning problem is read from text with four top-level blocks:
//!
//! ```text
//! (init (P |a| |d|) ...)
//! (goal (P |a| |e|) ...)
//! (actions (Move (Param ...) (Precon ...) (AddList ...) (DelList ...)) ...)
//! (plan (Move (|a|) (|d|) (|e|)) ...)
//! ```
//!
//! Loading never fails: malformed facts and operators are collected so that
//! all of them can be reported. Execution walks the given plan step by step.
//! There is no search; the plan is taken as written.

use std::fmt;

use tracing::{info, warn};

use crate::ast::Grammar;
use crate::error::Error;
use crate::lexer::TermClasses;
use crate::pretty::pretty_print;
use crate::segment::{segment, split_head};
use crate::strips::OperatorRegistry;
use crate::world::WorldState;
use crate::Result;

/// The block a malformed item came from
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Section {
    Init,
    Goal,
    Actions,
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Section::Init => write!(f, "Initialization"),
            Section::Goal => write!(f, "Goal"),
            Section::Actions => write!(f, "Action"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Malformed {
    pub section: Section,
    pub text: String,
    pub reason: String,
}

#[derive(Clone, Debug, Default)]
pub struct PlanningProblem {
    pub initial: WorldState,
    pub goals: Vec<String>,
    pub operators: OperatorRegistry,
    pub plan: Vec<String>,
    pub malformed: Vec<Malformed>,
}

/// One executed step
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlanStep {
    pub action: String,
    /// `None` if the precondition could not be evaluated (e.g. quantifiers)
    pub preconditions_held: Option<bool>,
    pub state: WorldState,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlanTrace {
    pub initial: WorldState,
    pub steps: Vec<PlanStep>,
    pub goals: Vec<String>,
}

impl PlanTrace {
    pub fn final_state(&self) -> &WorldState {
        self.steps.last().map(|step| &step.state).unwrap_or(&self.initial)
    }

    pub fn goal_reached(&self) -> bool {
        self.final_state().satisfies(&self.goals)
    }

    pub fn unmet_goals(&self) -> Vec<&str> {
        self.final_state().unmet(&self.goals)
    }
}

/// Parse a fact as a first-order expression and return its normalized text
fn normalize_fact(text: &str, classes: &TermClasses) -> Result<String> {
    let root = crate::parse_with(text, Grammar::FirstOrder, classes)?;
    Ok(pretty_print(&root))
}

impl PlanningProblem {
    pub fn from_source(source: &str, classes: &TermClasses) -> Self {
        let mut problem = Self {
            operators: OperatorRegistry::with_terms(classes.clone()),
            ..Self::default()
        };

        for block in segment(source) {
            let Some((tag, body)) = split_head(block) else {
                continue;
            };
            match tag {
                "init" => {
                    let facts = problem.facts(Section::Init, body, classes);
                    problem.initial = facts.into_iter().collect();
                }
                "goal" => problem.goals = problem.facts(Section::Goal, body, classes),
                "actions" => {
                    for action in segment(body) {
                        if let Err(e) = problem.operators.define(action) {
                            problem.reject(Section::Actions, action, &e);
                        }
                    }
                }
                "plan" => problem.plan = segment(body).into_iter().map(str::to_string).collect(),
                other => warn!(tag = other, "skipping unknown block"),
            }
        }

        problem
    }

    fn facts(&mut self, section: Section, body: &str, classes: &TermClasses) -> Vec<String> {
        let mut facts = Vec::new();
        for text in segment(body) {
            match normalize_fact(text, classes) {
                Ok(fact) => facts.push(fact),
                Err(e) => self.reject(section, text, &e),
            }
        }
        facts
    }

    fn reject(&mut self, section: Section, text: &str, error: &Error) {
        warn!(%section, text, %error, "malformed item");
        self.malformed.push(Malformed {
            section,
            text: text.to_string(),
            reason: error.to_string(),
        });
    }

    pub fn is_well_formed(&self) -> bool {
        self.malformed.is_empty()
    }

    /// Walk the plan from the initial state.
    ///
    /// Refuses to run a problem with malformed items. Each step's precondition
    /// is evaluated for the trace only; a failed precondition does not stop the
    /// plan, but a missing delete fact does.
    pub fn execute(&self) -> Result<PlanTrace> {
        if !self.is_well_formed() {
            return Err(Error::IllFormedProblem(self.malformed.len()));
        }

        let mut state = self.initial.clone();
        let mut steps = Vec::with_capacity(self.plan.len());
        for action in &self.plan {
            let operator = self.operators.resolve(action)?;
            let preconditions_held = operator.preconditions_hold(action, &state).ok();
            if preconditions_held == Some(false) {
                warn!(%action, "preconditions do not hold");
            }
            state = operator.apply(action, &state)?;
            info!(%action, %state, "step applied");
            steps.push(PlanStep {
                action: action.clone(),
                preconditions_held,
                state: state.clone(),
            });
        }

        Ok(PlanTrace {
            initial: self.initial.clone(),
            steps,
            goals: self.goals.clone(),
        })
    }
}
