//! Parse command: standoff records of one document

use clap::Parser;
use std::path::PathBuf;

use super::super::output::write_output;
use super::super::parser::CorpusArgs;
use super::setup;

/// Parse one document and print its standoff records as JSON
#[derive(Parser, Debug)]
pub struct ParseArgs {
    /// Document text file (<id>.txt)
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    #[command(flatten)]
    pub corpus: CorpusArgs,

    /// Write to file instead of stdout
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,
}

pub fn run(args: ParseArgs) -> Result<(), String> {
    let (parser, _) = setup(&args.corpus)?;
    let doc = bratkb::io::read_document(&args.file, &parser)
        .map_err(|e| format!("{}: {}", args.file.display(), e))?;
    let mut json = serde_json::to_string_pretty(&doc)
        .map_err(|e| format!("Failed to serialize {}: {}", doc.document_id, e))?;
    json.push('\n');
    write_output(&json, args.output.as_deref())
}
