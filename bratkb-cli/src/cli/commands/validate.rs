//! Validate command: advisory offset and reference checks

use clap::Parser;
use std::path::PathBuf;

use super::super::output::{color, fail, warn};
use super::super::parser::CorpusArgs;
use super::setup;

/// Convert documents and report offset and reference problems
#[derive(Parser, Debug)]
pub struct ValidateArgs {
    /// Text files or directories of them
    #[arg(required = true, value_name = "PATH")]
    pub paths: Vec<PathBuf>,

    #[command(flatten)]
    pub corpus: CorpusArgs,
}

pub fn run(args: ValidateArgs) -> Result<(), String> {
    let (parser, projector) = setup(&args.corpus)?;
    let paths = bratkb::io::expand_paths(&args.paths).map_err(|e| e.to_string())?;

    let mut failed = 0;
    let mut problems = 0;
    for converted in bratkb::io::convert_paths(&paths, &parser, &projector) {
        match converted.result {
            Ok(projection) => {
                let report = bratkb::validate(&projection.document);
                for issue in &report.issues {
                    warn(&converted.path, issue);
                }
                problems += report.issues.len();
            }
            Err(e) => {
                fail(&converted.path, e);
                failed += 1;
            }
        }
    }

    eprintln!("Validated {} document(s)", paths.len());
    if failed > 0 {
        eprintln!("{} {} failed to parse", color("31", "x"), failed);
    }
    if problems > 0 {
        eprintln!("{} {} issues", color("33", "!"), problems);
    }
    if failed == 0 && problems == 0 {
        eprintln!("{} All valid", color("32", "ok:"));
        return Ok(());
    }
    Err(format!("{} failed, {} issues", failed, problems))
}
