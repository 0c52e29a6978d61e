//! # bratkb-core
//!
//! Core types for bratkb: the data model shared by the parser, the projector
//! and every tool built on them.
//!
//! This crate provides:
//! - **Standoff records**: `BratDocument`, `TextBound`, `Event`, `Relation`,
//!   `Equivalence`, `Attribute`, `Normalization`, `Note`
//! - **KB records**: `KbDocument`, `Passage`, `KbEntity`, `KbEvent`,
//!   `KbRelation`, `Coreference`
//! - **Errors**: `Error`, `Result`

pub mod brat;
pub mod error;
pub mod kb;

pub use brat::{
    Argument, Attribute, BratDocument, Equivalence, Event, Normalization, Note, Offset, Relation,
    RelationArgument, TextBound,
};
pub use error::{Error, Result};
pub use kb::{
    Coreference, DbReference, KbArgument, KbDocument, KbEntity, KbEvent, KbRelation, Passage,
    Trigger,
};
