//! Command implementations

pub mod convert;
pub mod graph;
pub mod parse;
pub mod validate;

pub use convert::ConvertArgs;
pub use graph::GraphArgs;
pub use parse::ParseArgs;
pub use validate::ValidateArgs;

use bratkb::{KbProjector, StandoffParser};

use super::parser::CorpusArgs;

/// Build the parser and projector for a command.
fn setup(corpus: &CorpusArgs) -> Result<(StandoffParser, KbProjector), String> {
    let config = corpus.load()?;
    let parser = StandoffParser::new(config.parse_options()).map_err(|e| e.to_string())?;
    Ok((parser, KbProjector::new(config.projector_config())))
}
