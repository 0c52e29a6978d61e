//! Graph command: export one document as a graph

use clap::Parser;
use std::path::PathBuf;

use bratkb::GraphDocument;

use super::super::output::write_output;
use super::super::parser::{CorpusArgs, GraphFormat};
use super::setup;

/// Export one document as a graph
#[derive(Parser, Debug)]
pub struct GraphArgs {
    /// Document text file (<id>.txt)
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    #[command(flatten)]
    pub corpus: CorpusArgs,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = GraphFormat::default())]
    pub format: GraphFormat,

    /// Write to file instead of stdout
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,
}

pub fn run(args: GraphArgs) -> Result<(), String> {
    let (parser, projector) = setup(&args.corpus)?;
    let doc = bratkb::io::read_document(&args.file, &parser)
        .map_err(|e| format!("{}: {}", args.file.display(), e))?;
    let graph = GraphDocument::from_kb(&projector.project(&doc));

    let mut out = graph.export(args.format.into());
    if !out.ends_with('\n') {
        out.push('\n');
    }
    write_output(&out, args.output.as_deref())
}
