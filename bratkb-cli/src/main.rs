//! bratkb - brat standoff to knowledge-base conversion
//!
//! # Usage
//!
//! ```bash
//! # Inspect the parsed standoff records of one document
//! bratkb parse data/PMID-10.txt
//!
//! # Convert a corpus directory to JSON Lines
//! bratkb convert data/ --entity-type Protein -o corpus.jsonl
//!
//! # Check offsets and references
//! bratkb validate data/ --config corpus.toml
//!
//! # Export a document graph
//! bratkb graph data/PMID-10.txt -t Protein --format cypher
//! ```
//!
//! Log output goes to stderr; `RUST_LOG` overrides `-v`/`-q`.

mod cli;

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::prelude::*;

use cli::commands::{convert, graph, parse, validate};
use cli::output::color;
use cli::parser::{Cli, Commands};

fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| cli.log_filter().into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let result: Result<(), String> = match cli.command {
        Commands::Parse(args) => parse::run(args),
        Commands::Convert(args) => convert::run(args),
        Commands::Validate(args) => validate::run(args),
        Commands::Graph(args) => graph::run(args),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", color("31", "error:"), e);
            ExitCode::FAILURE
        }
    }
}
