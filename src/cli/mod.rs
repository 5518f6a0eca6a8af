//! CLI support for lox-lang
//!
//! Provides programmatic access to the `lox` commands so they can be embedded in
//! other tools and tested without spawning a process.

mod run;

pub use run::{Command, RunOptions, RunResult, execute};

use thiserror::Error;

use crate::{LexError, ParseError, ResolveError, RuntimeError};

/// Errors that can occur during CLI operations
#[derive(Debug, Error)]
pub enum CliError {
    #[error("{0}")]
    Lex(#[from] LexError),

    #[error("{0}")]
    Parse(#[from] ParseError),

    #[error("{0}")]
    Resolve(#[from] ResolveError),

    #[error("{0}")]
    Runtime(#[from] RuntimeError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// No source on the command line and nothing piped to stdin
    #[error("No source provided. Pass an expression or pipe it to stdin.")]
    NoInput,
}
