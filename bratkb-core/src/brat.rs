//! Per-document record produced by the standoff parser.
//!
//! A [`BratDocument`] is a bag of typed annotation records exactly as they
//! appear in the `.a1`/`.a2`/`.ann` files of one document, in first-seen
//! order. Ids are local: unique within the document, not across a corpus.
//!
//! ```text
//! T1  Disorder 10 14;26 29    pain leg         -> TextBound
//! E1  Binding:T2 Theme:T1                      -> Event
//! R1  Causes Arg1:T1 Arg2:T3                   -> Relation
//! *   Equiv T1 T4                              -> Equivalence
//! A1  Negation E1                              -> Attribute
//! N1  Reference T1 UMLS:C0030193  Pain         -> Normalization
//! #1  AnnotatorNotes T1   checked              -> Note
//! ```

use serde::{Deserialize, Serialize};

/// Half-open `[start, end)` range of *character* offsets into the document text.
///
/// Serialized as a two-element array, matching the brat/KB JSON convention.
pub type Offset = (usize, usize);

/// A parsed brat document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BratDocument {
    /// Document id, derived from the text file stem.
    pub document_id: String,
    /// Full raw document text; reference frame for every offset.
    pub text: String,
    /// `T` lines.
    pub text_bound_annotations: Vec<TextBound>,
    /// `E` lines.
    pub events: Vec<Event>,
    /// `R` lines.
    pub relations: Vec<Relation>,
    /// `*` lines.
    pub equivalences: Vec<Equivalence>,
    /// `A` and `M` lines.
    pub attributes: Vec<Attribute>,
    /// `N` lines.
    pub normalizations: Vec<Normalization>,
    /// `#` lines; only populated when note parsing was requested.
    #[serde(default)]
    pub notes: Vec<Note>,
}

impl BratDocument {
    /// Create an empty document with the given id and text.
    #[must_use]
    pub fn new(document_id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            document_id: document_id.into(),
            text: text.into(),
            ..Self::default()
        }
    }

    /// Look up a text-bound annotation by local id.
    #[must_use]
    pub fn text_bound(&self, id: &str) -> Option<&TextBound> {
        self.text_bound_annotations.iter().find(|t| t.id == id)
    }

    /// Look up an event by local id.
    #[must_use]
    pub fn event(&self, id: &str) -> Option<&Event> {
        self.events.iter().find(|e| e.id == id)
    }

    /// Total number of annotation records of all kinds.
    #[must_use]
    pub fn annotation_count(&self) -> usize {
        self.text_bound_annotations.len()
            + self.events.len()
            + self.relations.len()
            + self.equivalences.len()
            + self.attributes.len()
            + self.normalizations.len()
            + self.notes.len()
    }

    /// True if the document carries no annotations at all.
    #[must_use]
    pub fn is_unannotated(&self) -> bool {
        self.annotation_count() == 0
    }
}

/// A text-bound annotation (`T` line).
///
/// The type may name an entity class or an event-trigger class; which one is
/// decided at projection time from the corpus entity type set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextBound {
    /// Local id, `T<n>`.
    pub id: String,
    /// Annotation type.
    #[serde(rename = "type")]
    pub annotation_type: String,
    /// One or more character ranges; more than one means a discontiguous mention.
    pub offsets: Vec<Offset>,
    /// One text chunk per offset range.
    pub text: Vec<String>,
}

impl TextBound {
    /// True if the mention covers more than one range.
    #[must_use]
    pub fn is_discontiguous(&self) -> bool {
        self.offsets.len() > 1
    }
}

/// An event (`E` line).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// Local id, `E<n>`.
    pub id: String,
    /// Event type.
    #[serde(rename = "type")]
    pub event_type: String,
    /// Id of the text-bound annotation acting as trigger.
    pub trigger: String,
    /// Role-labelled arguments; a `ref_id` may name a text-bound or another event.
    pub arguments: Vec<Argument>,
}

/// A role-labelled event argument.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Argument {
    /// Argument role, e.g. `Theme`, `Cause`, `Theme2`.
    pub role: String,
    /// Referenced annotation id.
    pub ref_id: String,
}

/// A binary relation (`R` line).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relation {
    /// Local id, `R<n>`.
    pub id: String,
    /// Relation type.
    #[serde(rename = "type")]
    pub relation_type: String,
    /// First argument.
    pub head: RelationArgument,
    /// Second argument.
    pub tail: RelationArgument,
}

/// One endpoint of a relation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationArgument {
    /// Referenced annotation id.
    pub ref_id: String,
    /// Endpoint role, usually `Arg1`/`Arg2`.
    pub role: String,
}

/// An equivalence group (`*` line): its members denote the same thing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Equivalence {
    /// Group id, unique within the document.
    pub id: String,
    /// Member annotation ids, in file order.
    pub ref_ids: Vec<String>,
}

/// An attribute or modifier (`A`/`M` line).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    /// Local id.
    pub id: String,
    /// Attribute name.
    #[serde(rename = "type")]
    pub attribute_type: String,
    /// Annotation the attribute applies to.
    pub ref_id: String,
    /// Attribute value; empty for binary attributes.
    pub value: String,
}

/// A normalization (`N` line): grounds an annotation in an external resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Normalization {
    /// Local id.
    pub id: String,
    /// Normalization type, usually `Reference`.
    #[serde(rename = "type")]
    pub normalization_type: String,
    /// Annotation being grounded.
    pub ref_id: String,
    /// Resource name, e.g. `MESH` or `UMLS`.
    pub resource_name: String,
    /// Concept id within the resource.
    pub cuid: String,
    /// Human-readable gloss; may be empty.
    pub text: String,
}

/// An annotator note (`#` line).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    /// Local id.
    pub id: String,
    /// Note type, usually `AnnotatorNotes`.
    #[serde(rename = "type")]
    pub note_type: String,
    /// Annotation the note is attached to.
    pub ref_id: String,
    /// Note body; may be empty.
    pub text: String,
}
