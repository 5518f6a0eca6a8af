use clap::{Parser as ClapParser, Subcommand};
use lox_lang::cli::{self, CliError, Command, RunOptions};
use std::io::{self, Read};

#[derive(ClapParser)]
#[command(name = "lox")]
#[command(about = "Lox - inspect and evaluate Lox expressions")]
#[command(version)]
struct Cli {
    /// Log parser and evaluator activity (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the tokens of the source
    Tokens {
        /// Lox source (reads from stdin if not provided)
        source: Option<String>,
    },

    /// Print the syntax tree of an expression
    Ast {
        /// Lox expression (reads from stdin if not provided)
        source: Option<String>,

        /// Emit JSON instead of the parenthesized form
        #[arg(short, long)]
        json: bool,

        /// Pretty-print JSON output
        #[arg(short, long, requires = "json")]
        pretty: bool,
    },

    /// List the variables an expression reads and writes
    Resolve {
        /// Lox expression (reads from stdin if not provided)
        source: Option<String>,

        /// Declared global; when given, any other name is an error
        #[arg(short, long = "global", value_name = "NAME")]
        globals: Vec<String>,
    },

    /// Evaluate an expression and print the result
    Eval {
        /// Lox expression (reads from stdin if not provided)
        source: Option<String>,
    },
}

fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Warn
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();

    let (source, command) = match cli.command {
        Commands::Tokens { source } => (source, Command::Tokens),
        Commands::Ast {
            source,
            json,
            pretty,
        } => (source, Command::Ast { json, pretty }),
        Commands::Resolve { source, globals } => (source, Command::Resolve { globals }),
        Commands::Eval { source } => (source, Command::Eval),
    };

    if let Err(e) = run(source, command) {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

fn run(source: Option<String>, command: Command) -> Result<(), CliError> {
    let source = match source {
        Some(s) => Some(s),
        None if !atty::is(atty::Stream::Stdin) => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            Some(buffer)
        }
        None => None,
    };

    let options = RunOptions { source, command };
    for line in cli::execute(&options)?.lines {
        println!("{}", line);
    }
    Ok(())
}
