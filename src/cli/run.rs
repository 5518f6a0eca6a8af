//! Execute lox commands against a source string

use super::CliError;
use crate::{
    Evaluator, Lexer, Resolver,
    output::{to_json, to_json_pretty},
    parser::parse_str,
    printer,
    resolver::Access,
};

/// What to do with the source
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Command {
    /// List the scanned tokens
    Tokens,
    /// Print the syntax tree
    Ast {
        /// JSON instead of the parenthesized form
        json: bool,
        /// Indent JSON output
        pretty: bool,
    },
    /// List variable references; strict when `globals` is non-empty
    Resolve { globals: Vec<String> },
    /// Evaluate the expression
    #[default]
    Eval,
}

/// Options for a run
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Lox source holding one expression
    pub source: Option<String>,
    pub command: Command,
}

/// Result of a run, one line per entry
#[derive(Debug, Clone, PartialEq)]
pub struct RunResult {
    pub lines: Vec<String>,
}

impl RunResult {
    fn single(line: String) -> Self {
        RunResult { lines: vec![line] }
    }
}

/// Execute a lox command
pub fn execute(options: &RunOptions) -> Result<RunResult, CliError> {
    let source = options.source.as_deref().ok_or(CliError::NoInput)?;

    match &options.command {
        Command::Tokens => {
            let tokens = Lexer::new(source).tokenize()?;
            let lines = tokens
                .iter()
                .map(|t| format!("{:>4} {:<14} {}", t.line, format!("{:?}", t.kind), t.lexeme))
                .collect();
            Ok(RunResult { lines })
        }
        Command::Ast { json, pretty } => {
            let expr = parse_str(source)?;
            let rendered = match (json, pretty) {
                (false, _) => printer::print(&expr),
                (true, false) => to_json(&expr),
                (true, true) => to_json_pretty(&expr),
            };
            Ok(RunResult::single(rendered))
        }
        Command::Resolve { globals } => {
            let expr = parse_str(source)?;
            let mut resolver = if globals.is_empty() {
                Resolver::new()
            } else {
                Resolver::with_globals(globals.iter().cloned())
            };
            resolver.resolve(&expr)?;

            let lines = resolver
                .references()
                .iter()
                .map(|r| {
                    let access = match r.access {
                        Access::Read => "read",
                        Access::Write => "write",
                    };
                    let conditional = if r.conditional { " (conditional)" } else { "" };
                    format!("{:>4} {} {}{}", r.line, access, r.name, conditional)
                })
                .collect();
            Ok(RunResult { lines })
        }
        Command::Eval => {
            let expr = parse_str(source)?;
            let mut evaluator = Evaluator::new();
            let result = evaluator.evaluate(&expr)?;
            Ok(RunResult::single(result.to_string()))
        }
    }
}
