//! # bratkb
//!
//! brat standoff annotations to a canonical knowledge-base schema.
//!
//! - **Parsing**: `.txt` + `.a1`/`.a2`/`.ann` files into a [`BratDocument`]
//! - **Projection**: [`BratDocument`] into a [`KbDocument`] with
//!   document-prefixed ids, an entity/trigger split and coreference clusters
//! - **Validation**: advisory offset and reference checks
//! - **Export**: JSON (serde), NetworkX and Cypher graphs
//!
//! ## Quick Start
//!
//! ```rust
//! use bratkb::{EntityTypes, KbProjector, StandoffParser};
//!
//! let parser = StandoffParser::default();
//! let doc = parser.parse_str(
//!     "PMID-10",
//!     "IL-2 expression",
//!     "T1\tProtein 0 4\tIL-2\nT2\tGene_expression 5 15\texpression\nE1\tGene_expression:T2 Theme:T1",
//! )?;
//!
//! let projector = KbProjector::with_entity_types(EntityTypes::new(["Protein"]));
//! let kb = projector.project(&doc);
//!
//! assert_eq!(kb.entities.len(), 1);
//! assert_eq!(kb.events[0].id, "PMID-10_E1");
//! assert_eq!(kb.passages[0].id, "PMID-10__text");
//! # Ok::<(), bratkb::Error>(())
//! ```
//!
//! ## Corpora on disk
//!
//! ```rust,ignore
//! use bratkb::{io, CorpusConfig, KbProjector, StandoffParser};
//!
//! let config = CorpusConfig::from_path("corpus.toml")?;
//! let parser = StandoffParser::new(config.parse_options())?;
//! let projector = KbProjector::new(config.projector_config());
//!
//! let paths = io::discover_documents("data/train")?;
//! for converted in io::convert_paths(&paths, &parser, &projector) {
//!     match converted.result {
//!         Ok(projection) => println!("{}", serde_json::to_string(&projection.document)?),
//!         Err(e) => eprintln!("{}: {e}", converted.path.display()),
//!     }
//! }
//! ```
//!
//! ## Feature Flags
//!
//! - `parallel`: convert documents on the rayon thread pool

#![warn(missing_docs)]

pub mod config;
pub mod graph;
pub mod io;
pub mod offset;
pub mod parse;
pub mod project;
pub mod validation;

pub use bratkb_core::{
    Argument, Attribute, BratDocument, Coreference, DbReference, Equivalence, Error, Event,
    KbArgument, KbDocument, KbEntity, KbEvent, KbRelation, Normalization, Note, Offset, Passage,
    Relation, RelationArgument, Result, TextBound, Trigger,
};

pub use config::{CorpusConfig, EntityTypes, ParseOptions, ProjectorConfig};
pub use graph::{GraphDocument, GraphExportFormat};
pub use parse::{Annotation, AnnotationFile, AnnotationKind, StandoffParser};
pub use project::{project, KbProjector, Projection, ProjectionIssue};
pub use validation::{validate, ValidationIssue, ValidationReport};
