//! Proplog - S-expression logic checker, evaluator and plan runner
//!
//! Usage:
//!   proplog check <input> [--output <file>]
//!   proplog plan <input>
//!   proplog repl

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use rustyline::Editor;
use tracing::{debug, error};

use proplog::config::Config;
use proplog::error::render;
use proplog::plan::PlanningProblem;
use proplog::repl::{InputResult, MetaCommand, ReplState, Reply};
use proplog::{batch, Truth};

const VERSION: &str = env!("CARGO_PKG_VERSION");
const PROMPT: &str = "proplog> ";
const CONTINUATION: &str = "......   ";

#[derive(Parser)]
#[command(name = "proplog")]
#[command(about = "S-expression propositional and first-order logic toolkit")]
#[command(version)]
struct Args {
    /// TOML configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run tagged test blocks and print one result line per expression
    Check {
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Write results here instead of stdout
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },
    /// Validate a planning problem and walk its plan
    Plan {
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },
    /// Interactive session
    Repl,
}

fn init_logging(level: &str) {
    let fallback_level = match level.trim().to_ascii_lowercase().as_str() {
        "trace" => "trace",
        "debug" => "debug",
        "warn" => "warn",
        "error" => "error",
        _ => "info",
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new(fallback_level))
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn main() -> ExitCode {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => match Config::load(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Error: {}: {}", path.display(), e);
                return ExitCode::FAILURE;
            }
        },
        None => Config::default(),
    };
    init_logging(&config.log.level);

    match args.command {
        Command::Check { input, output } => run_check(&config, &input, output.as_deref()),
        Command::Plan { input } => run_plan(&config, &input),
        Command::Repl => run_repl(config),
    }
}

fn read_input(path: &Path) -> Option<String> {
    match fs::read_to_string(path) {
        Ok(text) => Some(text),
        Err(e) => {
            error!(path = %path.display(), error = %e, "cannot read input");
            eprintln!("Error: {}: {}", path.display(), e);
            None
        }
    }
}

fn run_check(config: &Config, input: &Path, output: Option<&Path>) -> ExitCode {
    let Some(source) = read_input(input) else {
        return ExitCode::FAILURE;
    };

    let report = batch::run(&source, &config.terms);
    debug!(lines = report.lines().count(), "batch finished");

    match output {
        Some(path) => {
            if let Err(e) = fs::write(path, report.to_string()) {
                eprintln!("Error: {}: {}", path.display(), e);
                return ExitCode::FAILURE;
            }
        }
        None => print!("{}", report),
    }
    ExitCode::SUCCESS
}

fn run_plan(config: &Config, input: &Path) -> ExitCode {
    let Some(source) = read_input(input) else {
        return ExitCode::FAILURE;
    };

    let problem = PlanningProblem::from_source(&source, &config.terms);
    if !problem.is_well_formed() {
        for item in &problem.malformed {
            println!("Malformed {}: {} ({})", item.section, item.text, item.reason);
        }
        return ExitCode::FAILURE;
    }

    let trace = match problem.execute() {
        Ok(trace) => trace,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    println!("Initial: {}", trace.initial);
    for step in &trace.steps {
        let precondition = match step.preconditions_held {
            Some(held) => Truth::from(held).to_string(),
            None => "unknown".to_string(),
        };
        println!("{}  precondition: {}", step.action, precondition);
        println!("  {}", step.state);
    }

    if trace.goal_reached() {
        println!("Goal reached");
        ExitCode::SUCCESS
    } else {
        println!("Goal not reached; unmet: {}", trace.unmet_goals().join(","));
        ExitCode::FAILURE
    }
}

fn run_repl(config: Config) -> ExitCode {
    println!("proplog v{}", VERSION);
    println!("Type :help for help, :quit to exit\n");

    let mut state = ReplState::with_terms(config.terms);

    let mut rl: Editor<(), DefaultHistory> = match Editor::new() {
        Ok(rl) => rl,
        Err(e) => {
            eprintln!("Error: cannot start line editor: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let history_path = history_path();
    if let Some(ref path) = history_path {
        let _ = rl.load_history(path);
    }

    loop {
        let prompt = if state.input_buffer.is_empty() {
            PROMPT
        } else {
            CONTINUATION
        };

        match rl.readline(prompt) {
            Ok(line) => {
                if !line.trim().is_empty() {
                    let _ = rl.add_history_entry(line.as_str());
                }
                match state.process_line(&line) {
                    InputResult::MetaCommand(cmd) => {
                        if !handle_command(&mut state, cmd) {
                            break;
                        }
                    }
                    InputResult::Expression(source) => {
                        println!("{}", state.check_expression(&source));
                    }
                    InputResult::Incomplete | InputResult::Empty => {}
                }
            }
            Err(ReadlineError::Interrupted) => {
                // Ctrl-C clears the pending buffer
                if !state.input_buffer.is_empty() {
                    state.input_buffer.clear();
                    state.paren_depth = 0;
                    println!("^C");
                } else {
                    println!("Use :quit or Ctrl-D to exit");
                }
            }
            Err(ReadlineError::Eof) => {
                if let Some(source) = state.force_submit() {
                    println!("{}", state.check_expression(&source));
                } else {
                    println!("\nGoodbye!");
                    break;
                }
            }
            Err(err) => {
                eprintln!("Error: {:?}", err);
                break;
            }
        }
    }

    if let Some(ref path) = history_path {
        if let Some(parent) = path.parent() {
            let _ = fs::create_dir_all(parent);
        }
        let _ = rl.save_history(path);
    }
    ExitCode::SUCCESS
}

/// Returns false on `:quit`
fn handle_command(state: &mut ReplState, cmd: MetaCommand) -> bool {
    let source = match &cmd {
        MetaCommand::Eval(s) | MetaCommand::Taut(s) => Some(s.clone()),
        _ => None,
    };

    match state.execute(cmd) {
        Ok(Reply::Quit) => return false,
        Ok(Reply::Help) => print_help(),
        Ok(Reply::Text(text)) => println!("{}", text),
        Err(e) => match source {
            Some(source) => println!("{}", render(&source, &e)),
            None => println!("Error: {}", e),
        },
    }
    true
}

fn print_help() {
    println!("Proplog REPL Commands:");
    println!();
    println!("  :help              Show this help");
    println!("  :quit              Exit the REPL");
    println!("  :mode [prop|fol]   Show or set the grammar for input");
    println!("  :reset             Clear operators, world and assignment");
    println!();
    println!("Evaluation:");
    println!("  :assign <pairs>    Set the truth assignment, e.g. ((P t) (Q nil))");
    println!("  :eval <expr>       Evaluate under the current assignment");
    println!("  :taut <expr>       Check whether the expression is a tautology");
    println!();
    println!("STRIPS:");
    println!("  :define <op>       Define an operator (Name (Param ..) (Precon ..) (AddList ..) (DelList ..))");
    println!("  :ops               List defined operators");
    println!("  :world [facts]     Show or replace the world state");
    println!("  :apply <call>      Apply an operator, e.g. (Move (|a|) (|d|) (|e|))");
    println!();
    println!("Any other input is checked for well-formedness in the current mode.");
}

fn history_path() -> Option<PathBuf> {
    #[cfg(unix)]
    let base = std::env::var("HOME").ok().map(|h| PathBuf::from(h).join(".config"));
    #[cfg(windows)]
    let base = std::env::var("APPDATA").ok().map(PathBuf::from);
    #[cfg(not(any(unix, windows)))]
    let base: Option<PathBuf> = None;

    base.map(|dir| dir.join("proplog").join("history"))
}
