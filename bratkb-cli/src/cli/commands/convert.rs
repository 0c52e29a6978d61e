//! Convert command: brat documents to KB documents as JSON Lines

use clap::Parser;
use std::path::PathBuf;

use super::super::output::{fail, warn, write_output};
use super::super::parser::CorpusArgs;
use super::setup;

/// Convert documents to KB documents (one JSON object per line)
#[derive(Parser, Debug)]
pub struct ConvertArgs {
    /// Text files or directories of them
    #[arg(required = true, value_name = "PATH")]
    pub paths: Vec<PathBuf>,

    #[command(flatten)]
    pub corpus: CorpusArgs,

    /// Write to file instead of stdout
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,
}

pub fn run(args: ConvertArgs) -> Result<(), String> {
    let (parser, projector) = setup(&args.corpus)?;
    let paths = bratkb::io::expand_paths(&args.paths).map_err(|e| e.to_string())?;
    if paths.is_empty() {
        return Err("No documents found".to_string());
    }

    let mut jsonl = String::new();
    let mut failed = 0;
    let mut issues = 0;
    let mut dangling = 0;
    for converted in bratkb::io::convert_paths(&paths, &parser, &projector) {
        match converted.result {
            Ok(projection) => {
                for issue in &projection.issues {
                    warn(&converted.path, issue);
                }
                issues += projection.issues.len();
                dangling += projection.issues.iter().filter(|i| i.is_dangling()).count();
                let line = serde_json::to_string(&projection.document).map_err(|e| {
                    format!("Failed to serialize {}: {}", projection.document.document_id, e)
                })?;
                jsonl.push_str(&line);
                jsonl.push('\n');
            }
            Err(e) => {
                fail(&converted.path, e);
                failed += 1;
            }
        }
    }
    write_output(&jsonl, args.output.as_deref())?;

    log::info!(
        "converted {} of {} documents ({} projection issues, {} unresolved references)",
        paths.len() - failed,
        paths.len(),
        issues,
        dangling
    );
    if failed > 0 {
        return Err(format!("{} of {} documents failed", failed, paths.len()));
    }
    Ok(())
}
