//! CLI argument parsing and structure definitions

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use bratkb::{CorpusConfig, EntityTypes, GraphExportFormat};

use super::commands::{ConvertArgs, GraphArgs, ParseArgs, ValidateArgs};

/// Convert brat standoff corpora into knowledge-base documents
#[derive(Parser)]
#[command(name = "bratkb")]
#[command(
    author,
    version,
    about = "Convert brat standoff corpora into knowledge-base documents",
    long_about = r#"
bratkb - brat standoff annotations to a canonical KB schema

Reads <id>.txt documents together with their <id>.a1 / <id>.a2 / <id>.ann
annotation files, splits text-bound annotations into entities and event
triggers, and writes one KB document (passages, entities, events,
relations, coreferences) per input document.

EXAMPLES:
  bratkb parse data/PMID-10.txt
  bratkb convert data/ --entity-type Protein -o corpus.jsonl
  bratkb convert data/ --config corpus.toml
  bratkb validate data/ --entity-type Protein
  bratkb graph data/PMID-10.txt --entity-type Protein --format cypher
"#
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// More log output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,
}

impl Cli {
    /// Default log filter for the chosen verbosity.
    pub fn log_filter(&self) -> &'static str {
        if self.quiet {
            return "error";
        }
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Parse one document and print its standoff records as JSON
    #[command(visible_alias = "p")]
    Parse(ParseArgs),

    /// Convert documents to KB documents (JSON Lines)
    #[command(visible_alias = "c")]
    Convert(ConvertArgs),

    /// Convert documents and report offset and reference problems
    #[command(visible_alias = "v")]
    Validate(ValidateArgs),

    /// Export one document as a graph
    #[command(visible_alias = "g")]
    Graph(GraphArgs),
}

/// Corpus options shared by every command.
#[derive(Args, Debug, Clone, Default)]
pub struct CorpusArgs {
    /// Corpus config file (TOML)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Entity type name (repeatable); replaces the config's list
    #[arg(short = 't', long = "entity-type", value_name = "TYPE")]
    pub entity_types: Vec<String>,

    /// Annotation file suffix (repeatable, in order); replaces the config's list
    #[arg(short, long = "suffix", value_name = "SUFFIX")]
    pub suffixes: Vec<String>,

    /// Parse `#` annotator notes
    #[arg(long)]
    pub notes: bool,

    /// Passage type for projected documents
    #[arg(long, value_name = "TYPE")]
    pub passage_type: Option<String>,
}

impl CorpusArgs {
    /// Load the config file (if any) and apply command-line overrides.
    pub fn load(&self) -> Result<CorpusConfig, String> {
        let mut config = match &self.config {
            Some(path) => CorpusConfig::from_path(path).map_err(|e| e.to_string())?,
            None => CorpusConfig::default(),
        };
        if !self.entity_types.is_empty() {
            config.entity_types = EntityTypes::new(self.entity_types.iter().cloned());
        }
        if !self.suffixes.is_empty() {
            config.annotation_suffixes = self.suffixes.clone();
        }
        if self.notes {
            config.parse_notes = true;
        }
        if let Some(passage_type) = &self.passage_type {
            config.passage_type = passage_type.clone();
        }
        if config.entity_types.is_empty() {
            log::warn!("no entity types configured; every text-bound annotation is a trigger");
        }
        Ok(config)
    }
}

/// Graph output format
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum GraphFormat {
    /// NetworkX node-link JSON
    #[default]
    #[value(alias = "json")]
    Networkx,
    /// Neo4j Cypher statements
    #[value(alias = "neo4j")]
    Cypher,
}

impl From<GraphFormat> for GraphExportFormat {
    fn from(format: GraphFormat) -> Self {
        match format {
            GraphFormat::Networkx => Self::NetworkXJson,
            GraphFormat::Cypher => Self::Cypher,
        }
    }
}
