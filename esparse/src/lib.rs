//! Command line front end: reads a file, parses it and reports the outcome.

use clap::Parser as ClapParser;
use console::style;
use esparse_parser::ast::Program;
use esparse_parser::config::DEFAULT_MAX_DEPTH;
use esparse_parser::dump::dump;
use esparse_parser::{ParseError, Parser, ParserConfig};
use esparse_source::SourceFile;
use std::io::{self, Write};
use std::path::PathBuf;
use thiserror::Error;

pub mod diagnostics;
pub mod logging;

#[derive(Debug, ClapParser)]
#[command(name = "esparse", version, about = "Parse an ECMAScript 5 source file")]
pub struct Cli {
    /// Source file path
    pub file: PathBuf,
    /// Print the syntax tree
    #[arg(long)]
    pub dump: bool,
    /// Maximum nesting depth before giving up
    #[arg(long, default_value_t = DEFAULT_MAX_DEPTH)]
    pub max_depth: usize,
    /// Print nothing on success
    #[arg(short, long)]
    pub quiet: bool,
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Debug, Error)]
pub enum CliError {
    #[error("cannot read `{}`: {err}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        err: io::Error,
    },
    #[error("{}: {err}", .file.name())]
    Parse {
        file: SourceFile,
        #[source]
        err: ParseError,
    },
}

impl CliError {
    /// Process exit status: 1 for source that does not parse, 2 for I/O failures.
    pub fn exit_code(&self) -> u8 {
        match self {
            CliError::Parse { .. } => 1,
            CliError::Io { .. } => 2,
        }
    }
}

/// A successfully parsed file.
#[derive(Debug)]
pub struct Parsed {
    pub file: SourceFile,
    pub program: Program,
}

/// Reads and parses the file named on the command line.
pub fn run(cli: &Cli) -> Result<Parsed, CliError> {
    let file = SourceFile::read(&cli.file).map_err(|err| CliError::Io {
        path: cli.file.clone(),
        err,
    })?;
    tracing::info!(file = file.name(), bytes = file.content().len(), "parsing");

    let config = ParserConfig::default().with_max_depth(cli.max_depth);
    let result = {
        let source = file.as_source();
        Parser::with_config(&source, config).parse_program()
    };
    match result {
        Ok(program) => Ok(Parsed { file, program }),
        Err(err) => Err(CliError::Parse { file, err }),
    }
}

/// Writes the tree (with `--dump`) and a one-line summary (unless `--quiet`).
pub fn print_parsed(cli: &Cli, parsed: &Parsed, out: &mut impl Write) -> io::Result<()> {
    if cli.dump {
        writeln!(out, "{}", dump(&parsed.program))?;
    }
    if !cli.quiet {
        writeln!(
            out,
            "{} {} ({} top-level elements)",
            style("ok").green().bold(),
            parsed.file.name(),
            parsed.program.body.len()
        )?;
    }
    Ok(())
}
