//! Unit tests for planning problems and fixed-plan execution

use pretty_assertions::assert_eq;
use proplog::plan::{PlanningProblem, Section};
use proplog::{Error, TermClasses, WorldState};

const BLOCKS: &str = r#"
(init (P |a| |d|) (P |b| |e|))
(goal (P |a| |e|) (P |b| |d|))
(actions
  (Move (Param (|x|)(|y|)(|z|))
        (Precon (AND (P |x| |y|) (NOT (P |x| |z|))))
        (AddList (P |x| |z|))
        (DelList (P |x| |y|))))
(plan (Move (|a|)(|d|)(|e|)) (Move (|b|)(|e|)(|d|)))
"#;

fn load(source: &str) -> PlanningProblem {
    PlanningProblem::from_source(source, &TermClasses::default())
}

#[test]
fn test_load_problem() {
    let problem = load(BLOCKS);
    assert!(problem.is_well_formed());
    assert_eq!(problem.initial.facts(), &["(P |a| |d|)", "(P |b| |e|)"]);
    assert_eq!(problem.goals, vec!["(P |a| |e|)", "(P |b| |d|)"]);
    assert_eq!(problem.operators.len(), 1);
    assert_eq!(problem.plan.len(), 2);
}

#[test]
fn test_facts_are_normalized() {
    let problem = load("(init (P  |a|   |d|))");
    assert_eq!(problem.initial.facts(), &["(P |a| |d|)"]);
}

#[test]
fn test_execute_reaches_goal() {
    let trace = load(BLOCKS).execute().expect("execution failed");
    assert_eq!(trace.steps.len(), 2);
    assert_eq!(
        trace.steps[0].state,
        ["(P |b| |e|)", "(P |a| |e|)"].into_iter().collect::<WorldState>()
    );
    assert_eq!(trace.steps[0].preconditions_held, Some(true));
    assert!(trace.goal_reached());
    assert!(trace.unmet_goals().is_empty());
}

#[test]
fn test_goal_not_reached() {
    let source = BLOCKS.replace(
        "(plan (Move (|a|)(|d|)(|e|)) (Move (|b|)(|e|)(|d|)))",
        "(plan (Move (|a|)(|d|)(|e|)))",
    );
    let trace = load(&source).execute().unwrap();
    assert!(!trace.goal_reached());
    assert_eq!(trace.unmet_goals(), vec!["(P |b| |d|)"]);
}

#[test]
fn test_empty_plan_keeps_initial_state() {
    let trace = load("(init (P |a|)) (goal (P |a|)) (plan)").execute().unwrap();
    assert!(trace.steps.is_empty());
    assert_eq!(trace.final_state(), &trace.initial);
    assert!(trace.goal_reached());
}

#[test]
fn test_failed_precondition_is_reported_not_fatal() {
    let source = BLOCKS.replace("(init (P |a| |d|) (P |b| |e|))", "(init (P |a| |d|) (P |a| |e|) (P |b| |e|))");
    let trace = load(&source).execute().unwrap();
    assert_eq!(trace.steps[0].preconditions_held, Some(false));
}

#[test]
fn test_missing_delete_fact_stops_plan() {
    let source = BLOCKS.replace("(init (P |a| |d|) (P |b| |e|))", "(init (P |b| |e|))");
    assert!(matches!(load(&source).execute(), Err(Error::MissingFact(_))));
}

#[test]
fn test_malformed_items_are_collected() {
    let problem = load(
        r#"
(init (P |a|) (AND (P |a|)))
(goal (|q|))
(actions (Bad (Param (|x|))) (Move (Param (|x|)) (Precon (P |x|)) (AddList (Q |x|)) (DelList (P |x|))))
(plan)
"#,
    );
    assert!(!problem.is_well_formed());
    let sections: Vec<Section> = problem.malformed.iter().map(|m| m.section).collect();
    assert_eq!(sections, vec![Section::Init, Section::Goal, Section::Actions]);
    assert_eq!(problem.initial.facts(), &["(P |a|)"]);
    assert!(problem.operators.get("Move").is_some());

    assert!(matches!(problem.execute(), Err(Error::IllFormedProblem(3))));
}

#[test]
fn test_unknown_operator_in_plan() {
    let problem = load("(init (P |a|)) (plan (Fly (|a|)))");
    assert!(matches!(problem.execute(), Err(Error::UnknownOperator(_))));
}
