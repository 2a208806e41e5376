//! REPL (Read-Eval-Print Loop) state
//!
//! Everything here is line-oriented and free of terminal I/O, so the binary
//! only has to feed lines in and print replies.

use crate::ast::Grammar;
use crate::error::render;
use crate::eval::{evaluate, parse_assignment, Assignment};
use crate::lexer::TermClasses;
use crate::pretty::pretty_print;
use crate::segment::segment;
use crate::strips::OperatorRegistry;
use crate::tautology;
use crate::truth::Truth;
use crate::world::WorldState;
use crate::Result;

pub struct ReplState {
    /// Grammar for plain input and `:eval`/`:taut`
    pub grammar: Grammar,
    pub classes: TermClasses,
    pub operators: OperatorRegistry,
    pub world: WorldState,
    pub assignment: Assignment,

    /// Multi-line input buffer
    pub input_buffer: String,

    /// Parenthesis depth for multi-line detection
    pub paren_depth: i32,
}

impl Default for ReplState {
    fn default() -> Self {
        Self::new()
    }
}

/// Result of feeding one line
#[derive(Debug, PartialEq, Eq)]
pub enum InputResult {
    MetaCommand(MetaCommand),
    Expression(String),
    Incomplete,
    Empty,
}

#[derive(Debug, PartialEq, Eq)]
pub enum MetaCommand {
    Help,
    Quit,
    /// `:mode` shows the grammar, `:mode prop|fol` sets it
    Mode(Option<Grammar>),
    /// `:assign ((P t) (Q nil))`
    Assign(String),
    Eval(String),
    Taut(String),
    Define(String),
    Ops,
    /// `:world (P |a|) (Q |b|)` replaces the world state
    World(String),
    Apply(String),
    Reset,
    Unknown(String),
}

impl MetaCommand {
    pub fn parse(input: &str) -> Self {
        let input = input.trim_start_matches(':').trim();
        let (cmd, arg) = match input.split_once(char::is_whitespace) {
            Some((cmd, arg)) => (cmd, arg.trim()),
            None => (input, ""),
        };

        let requires = |name: &str, build: fn(String) -> MetaCommand| {
            if arg.is_empty() {
                MetaCommand::Unknown(format!(":{} requires an argument", name))
            } else {
                build(arg.to_string())
            }
        };

        match cmd {
            "help" | "h" | "?" => MetaCommand::Help,
            "quit" | "q" | "exit" => MetaCommand::Quit,
            "mode" | "m" => match arg {
                "" => MetaCommand::Mode(None),
                "prop" | "propositional" => MetaCommand::Mode(Some(Grammar::Propositional)),
                "fol" | "first-order" => MetaCommand::Mode(Some(Grammar::FirstOrder)),
                other => MetaCommand::Unknown(format!("Unknown mode '{}' (expected prop or fol)", other)),
            },
            "assign" => requires("assign", MetaCommand::Assign),
            "eval" | "e" => requires("eval", MetaCommand::Eval),
            "taut" | "tautology" => requires("taut", MetaCommand::Taut),
            "define" | "def" => requires("define", MetaCommand::Define),
            "ops" | "operators" => MetaCommand::Ops,
            "world" | "w" => MetaCommand::World(arg.to_string()),
            "apply" | "a" => requires("apply", MetaCommand::Apply),
            "reset" => MetaCommand::Reset,
            other => MetaCommand::Unknown(format!("Unknown command: :{}", other)),
        }
    }
}

/// What the binary should do after a command
#[derive(Debug, PartialEq, Eq)]
pub enum Reply {
    Text(String),
    Help,
    Quit,
}

impl ReplState {
    pub fn new() -> Self {
        Self::with_terms(TermClasses::default())
    }

    pub fn with_terms(classes: TermClasses) -> Self {
        Self {
            grammar: Grammar::Propositional,
            operators: OperatorRegistry::with_terms(classes.clone()),
            classes,
            world: WorldState::new(),
            assignment: Assignment::new(),
            input_buffer: String::new(),
            paren_depth: 0,
        }
    }

    /// Clear operators, world, assignment and any pending input
    pub fn reset(&mut self) {
        self.operators.clear();
        self.world = WorldState::new();
        self.assignment.clear();
        self.input_buffer.clear();
        self.paren_depth = 0;
    }

    /// Process a line of input, accumulating until parentheses balance
    pub fn process_line(&mut self, line: &str) -> InputResult {
        let trimmed = line.trim();

        if trimmed.is_empty() {
            if self.input_buffer.is_empty() {
                return InputResult::Empty;
            }
            return InputResult::Incomplete;
        }

        // Meta-command (only at start, not in continuation)
        if trimmed.starts_with(':') && self.input_buffer.is_empty() {
            return InputResult::MetaCommand(MetaCommand::parse(trimmed));
        }

        if !self.input_buffer.is_empty() {
            self.input_buffer.push('\n');
        }
        self.input_buffer.push_str(line);

        for ch in line.chars() {
            match ch {
                '(' => self.paren_depth += 1,
                ')' => self.paren_depth -= 1,
                _ => {}
            }
        }

        if self.paren_depth <= 0 {
            self.paren_depth = 0;
            InputResult::Expression(std::mem::take(&mut self.input_buffer))
        } else {
            InputResult::Incomplete
        }
    }

    /// Force submit current buffer (for Ctrl-D)
    pub fn force_submit(&mut self) -> Option<String> {
        if self.input_buffer.is_empty() {
            None
        } else {
            self.paren_depth = 0;
            Some(std::mem::take(&mut self.input_buffer))
        }
    }

    /// Well-formedness of plain input in the current grammar
    pub fn check_expression(&self, source: &str) -> String {
        match crate::parse_with(source, self.grammar, &self.classes) {
            Ok(tree) => format!("{}  {}", Truth::T, pretty_print(&tree)),
            Err(e) => format!("{}\n{}", Truth::Nil, render(source, &e)),
        }
    }

    pub fn execute(&mut self, cmd: MetaCommand) -> Result<Reply> {
        let text = match cmd {
            MetaCommand::Help => return Ok(Reply::Help),
            MetaCommand::Quit => return Ok(Reply::Quit),
            MetaCommand::Mode(Some(grammar)) => {
                self.grammar = grammar;
                format!("Mode: {}", grammar)
            }
            MetaCommand::Mode(None) => format!("Mode: {}", self.grammar),
            MetaCommand::Assign(text) => {
                self.assignment = parse_assignment(&text)?;
                let pairs: Vec<String> = self
                    .assignment
                    .iter()
                    .map(|(atom, value)| format!("({} {})", atom, Truth::from(*value)))
                    .collect();
                format!("Assignment: ({})", pairs.join(" "))
            }
            MetaCommand::Eval(source) => {
                let tree = crate::parse_with(&source, self.grammar, &self.classes)?;
                Truth::from(evaluate(&tree, &self.assignment)?).to_string()
            }
            MetaCommand::Taut(source) => {
                let tree = crate::parse_with(&source, self.grammar, &self.classes)?;
                let report = tautology::check(&tree)?;
                match &report.counterexample {
                    None => format!("{} ({} assignments)", Truth::T, report.assignments_checked),
                    Some(counterexample) => {
                        let pairs: Vec<String> = counterexample
                            .iter()
                            .map(|(atom, value)| format!("({} {})", atom, Truth::from(*value)))
                            .collect();
                        format!("{} (falsified by {})", Truth::Nil, pairs.join(" "))
                    }
                }
            }
            MetaCommand::Define(text) => {
                let name = self.operators.define(&text)?;
                format!("Defined operator {}", name)
            }
            MetaCommand::Ops => {
                if self.operators.is_empty() {
                    "No operators defined".to_string()
                } else {
                    self.operators
                        .iter()
                        .map(|op| {
                            let params: Vec<String> = op.parameters.iter().map(|p| p.to_string()).collect();
                            format!("{} ({})", op.name, params.join(" "))
                        })
                        .collect::<Vec<_>>()
                        .join("\n")
                }
            }
            MetaCommand::World(text) => {
                if !text.is_empty() {
                    let mut world = WorldState::new();
                    for fact in segment(&text) {
                        let tree = crate::parse_with(fact, Grammar::FirstOrder, &self.classes)?;
                        world.add(pretty_print(&tree));
                    }
                    self.world = world;
                }
                format!("World: {}", self.world)
            }
            MetaCommand::Apply(invocation) => {
                self.world = self.operators.apply(&invocation, &self.world)?;
                format!("World: {}", self.world)
            }
            MetaCommand::Reset => {
                self.reset();
                "State reset".to_string()
            }
            MetaCommand::Unknown(message) => format!("{}\nType :help for available commands", message),
        };
        Ok(Reply::Text(text))
    }
}
