//! Unit tests for REPL input handling and meta-commands

use pretty_assertions::assert_eq;
use proplog::repl::{InputResult, MetaCommand, ReplState, Reply};
use proplog::{Error, Grammar};

fn text(state: &mut ReplState, line: &str) -> String {
    let InputResult::MetaCommand(cmd) = state.process_line(line) else {
        panic!("not a command: {line}");
    };
    match state.execute(cmd).expect("command failed") {
        Reply::Text(text) => text,
        other => panic!("unexpected reply {other:?}"),
    }
}

#[test]
fn test_meta_command_parsing() {
    assert_eq!(MetaCommand::parse(":help"), MetaCommand::Help);
    assert_eq!(MetaCommand::parse(":q"), MetaCommand::Quit);
    assert_eq!(MetaCommand::parse(":mode fol"), MetaCommand::Mode(Some(Grammar::FirstOrder)));
    assert_eq!(MetaCommand::parse(":mode"), MetaCommand::Mode(None));
    assert_eq!(
        MetaCommand::parse(":eval  (AND (P) (Q)) "),
        MetaCommand::Eval("(AND (P) (Q))".to_string())
    );
    assert!(matches!(MetaCommand::parse(":eval"), MetaCommand::Unknown(_)));
    assert!(matches!(MetaCommand::parse(":mode modal"), MetaCommand::Unknown(_)));
    assert!(matches!(MetaCommand::parse(":frobnicate"), MetaCommand::Unknown(_)));
}

#[test]
fn test_multi_line_input() {
    let mut state = ReplState::new();
    assert_eq!(state.process_line("(AND (P)"), InputResult::Incomplete);
    assert_eq!(state.process_line(""), InputResult::Incomplete);
    assert_eq!(
        state.process_line("     (Q))"),
        InputResult::Expression("(AND (P)\n     (Q))".to_string())
    );
    assert!(state.input_buffer.is_empty());
    assert_eq!(state.paren_depth, 0);
    assert_eq!(state.process_line("   "), InputResult::Empty);
}

#[test]
fn test_colon_inside_continuation_is_input() {
    let mut state = ReplState::new();
    state.process_line("(NOT");
    assert_eq!(state.process_line(":help"), InputResult::Incomplete);
}

#[test]
fn test_force_submit() {
    let mut state = ReplState::new();
    assert_eq!(state.force_submit(), None);
    state.process_line("(OR (P)");
    assert_eq!(state.force_submit(), Some("(OR (P)".to_string()));
    assert_eq!(state.paren_depth, 0);
}

#[test]
fn test_check_expression_in_current_mode() {
    let mut state = ReplState::new();
    assert_eq!(state.check_expression("(OR (P)  (Q))"), "t  (OR (P) (Q))");
    assert!(state.check_expression("(P |a|)").starts_with("nil"));

    text(&mut state, ":mode fol");
    assert_eq!(state.grammar, Grammar::FirstOrder);
    assert_eq!(state.check_expression("(P |a|)"), "t  (P |a|)");
}

#[test]
fn test_assign_and_eval() {
    let mut state = ReplState::new();
    assert_eq!(text(&mut state, ":assign ((P t) (Q nil))"), "Assignment: ((P t) (Q nil))");
    assert_eq!(text(&mut state, ":eval (IMPLIES (P) (Q))"), "nil");
    assert_eq!(text(&mut state, ":eval (OR (P) (Q))"), "t");
}

#[test]
fn test_eval_errors() {
    let mut state = ReplState::new();
    let InputResult::MetaCommand(cmd) = state.process_line(":eval (P)") else {
        panic!("expected command");
    };
    assert!(matches!(state.execute(cmd), Err(Error::UnassignedAtom(_))));

    assert!(matches!(
        state.execute(MetaCommand::Eval("(AND (P))".to_string())),
        Err(Error::Parse { .. })
    ));
}

#[test]
fn test_taut() {
    let mut state = ReplState::new();
    assert_eq!(text(&mut state, ":taut (OR (P) (NOT (P)))"), "t (2 assignments)");
    assert_eq!(text(&mut state, ":taut (AND (P) (Q))"), "nil (falsified by (P nil) (Q nil))");
}

#[test]
fn test_define_world_apply() {
    let mut state = ReplState::new();
    assert_eq!(
        text(
            &mut state,
            ":define (Move (Param (|x|)(|y|)(|z|)) (Precon (AND (P |y|)(NOT (P |z|)))) (AddList (P |z|)) (DelList (P |y|)))"
        ),
        "Defined operator Move"
    );
    assert_eq!(text(&mut state, ":ops"), "Move (|x| |y| |z|)");
    assert_eq!(text(&mut state, ":world (P  |b|)"), "World: (P |b|)");
    assert_eq!(text(&mut state, ":apply (Move (|a|)(|b|)(|c|))"), "World: (P |c|)");
    assert_eq!(text(&mut state, ":world"), "World: (P |c|)");
}

#[test]
fn test_failed_apply_keeps_world() {
    let mut state = ReplState::new();
    text(
        &mut state,
        ":define (Move (Param (|x|)) (Precon (P |x|)) (AddList (Q |x|)) (DelList (P |x|)))",
    );
    text(&mut state, ":world (R |a|)");
    assert!(matches!(
        state.execute(MetaCommand::Apply("(Move (|a|))".to_string())),
        Err(Error::MissingFact(_))
    ));
    assert_eq!(state.world.facts(), &["(R |a|)"]);
}

#[test]
fn test_reset() {
    let mut state = ReplState::new();
    text(&mut state, ":assign ((P t))");
    text(&mut state, ":world (P |a|)");
    assert_eq!(text(&mut state, ":reset"), "State reset");
    assert!(state.assignment.is_empty());
    assert!(state.world.is_empty());
    assert_eq!(text(&mut state, ":ops"), "No operators defined");
}

#[test]
fn test_help_and_quit_replies() {
    let mut state = ReplState::new();
    assert_eq!(state.execute(MetaCommand::Help).unwrap(), Reply::Help);
    assert_eq!(state.execute(MetaCommand::Quit).unwrap(), Reply::Quit);
    let unknown = text(&mut state, ":frobnicate");
    assert!(unknown.starts_with("Unknown command: :frobnicate"));
}
