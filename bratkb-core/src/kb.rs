//! Canonical knowledge-base document.
//!
//! A [`KbDocument`] is the corpus-agnostic graph every source corpus is
//! projected into: one whole-document passage, entities, events, relations
//! and coreference clusters. Every identifier is document-prefixed
//! (`<document_id>_<local id>`), so documents can be merged into a single
//! corpus-wide collection without collisions.

use crate::brat::Offset;
use serde::{Deserialize, Serialize};

/// A projected document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KbDocument {
    /// Source document id (unprefixed).
    pub document_id: String,
    /// Passages; projection always emits exactly one spanning the whole text.
    pub passages: Vec<Passage>,
    /// Text-bound annotations whose type is an entity type.
    pub entities: Vec<KbEntity>,
    /// Events with a denormalized trigger.
    pub events: Vec<KbEvent>,
    /// Binary relations.
    pub relations: Vec<KbRelation>,
    /// Entity-only equivalence clusters.
    pub coreferences: Vec<Coreference>,
}

impl KbDocument {
    /// The full document text, taken from the passage that starts at offset 0.
    #[must_use]
    pub fn full_text(&self) -> Option<&str> {
        self.passages
            .iter()
            .find(|p| p.offsets.first().map(|o| o.0) == Some(0))
            .and_then(|p| p.text.first())
            .map(String::as_str)
    }

    /// Look up an entity by (prefixed) id.
    #[must_use]
    pub fn entity(&self, id: &str) -> Option<&KbEntity> {
        self.entities.iter().find(|e| e.id == id)
    }

    /// Look up an event by (prefixed) id.
    #[must_use]
    pub fn event(&self, id: &str) -> Option<&KbEvent> {
        self.events.iter().find(|e| e.id == id)
    }

    /// Ids of every record in the document: passages, entities, events,
    /// relations and coreference clusters.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.passages
            .iter()
            .map(|p| p.id.as_str())
            .chain(self.entities.iter().map(|e| e.id.as_str()))
            .chain(self.events.iter().map(|e| e.id.as_str()))
            .chain(self.relations.iter().map(|r| r.id.as_str()))
            .chain(self.coreferences.iter().map(|c| c.id.as_str()))
    }

    /// Every id *referenced* by a record: event arguments, relation
    /// endpoints and coreference members.
    pub fn references(&self) -> impl Iterator<Item = &str> {
        self.events
            .iter()
            .flat_map(|e| e.arguments.iter().map(|a| a.ref_id.as_str()))
            .chain(
                self.relations
                    .iter()
                    .flat_map(|r| [r.arg1_id.as_str(), r.arg2_id.as_str()]),
            )
            .chain(
                self.coreferences
                    .iter()
                    .flat_map(|c| c.entity_ids.iter().map(String::as_str)),
            )
    }
}

/// A contiguous slice of the document text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Passage {
    /// Prefixed id.
    pub id: String,
    /// Passage type, e.g. `abstract`.
    #[serde(rename = "type")]
    pub passage_type: String,
    /// Text chunks, one per offset range.
    pub text: Vec<String>,
    /// Character ranges.
    pub offsets: Vec<Offset>,
}

/// A grounding of an entity or relation in an external resource.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DbReference {
    /// Resource name, e.g. `MESH`.
    pub db_name: String,
    /// Identifier within the resource.
    pub db_id: String,
}

impl DbReference {
    /// Create a reference.
    #[must_use]
    pub fn new(db_name: impl Into<String>, db_id: impl Into<String>) -> Self {
        Self {
            db_name: db_name.into(),
            db_id: db_id.into(),
        }
    }
}

/// An entity mention.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KbEntity {
    /// Prefixed id.
    pub id: String,
    /// Entity type.
    #[serde(rename = "type")]
    pub entity_type: String,
    /// Text chunks, one per offset range.
    pub text: Vec<String>,
    /// Character ranges.
    pub offsets: Vec<Offset>,
    /// Groundings gathered from normalizations of this annotation.
    pub normalized: Vec<DbReference>,
}

/// Copy of a trigger's text and offsets, carried by value on the event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trigger {
    /// Text chunks, one per offset range.
    pub text: Vec<String>,
    /// Character ranges.
    pub offsets: Vec<Offset>,
}

impl Trigger {
    /// True when the trigger could not be resolved during projection.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty() && self.text.is_empty()
    }
}

/// An event with prefixed ids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KbEvent {
    /// Prefixed id.
    pub id: String,
    /// Event type.
    #[serde(rename = "type")]
    pub event_type: String,
    /// Trigger span.
    pub trigger: Trigger,
    /// Arguments with prefixed `ref_id`s.
    pub arguments: Vec<KbArgument>,
}

/// A role-labelled event argument with a prefixed reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KbArgument {
    /// Argument role.
    pub role: String,
    /// Prefixed referenced id (entity or event).
    pub ref_id: String,
}

/// A binary relation; `arg1` is the brat head, `arg2` the tail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KbRelation {
    /// Prefixed id.
    pub id: String,
    /// Relation type.
    #[serde(rename = "type")]
    pub relation_type: String,
    /// Prefixed head reference.
    pub arg1_id: String,
    /// Prefixed tail reference.
    pub arg2_id: String,
    /// Always empty for brat-derived relations.
    pub normalized: Vec<DbReference>,
}

/// A coreference cluster of entities.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coreference {
    /// Prefixed id.
    pub id: String,
    /// Prefixed member entity ids.
    pub entity_ids: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> KbDocument {
        KbDocument {
            document_id: "d".into(),
            passages: vec![Passage {
                id: "d__text".into(),
                passage_type: "abstract".into(),
                text: vec!["EGFR binds".into()],
                offsets: vec![(0, 10)],
            }],
            entities: vec![KbEntity {
                id: "d_T1".into(),
                entity_type: "Gene".into(),
                text: vec!["EGFR".into()],
                offsets: vec![(0, 4)],
                normalized: vec![DbReference::new("NCBIGene", "1956")],
            }],
            events: vec![KbEvent {
                id: "d_E1".into(),
                event_type: "Binding".into(),
                trigger: Trigger {
                    text: vec!["binds".into()],
                    offsets: vec![(5, 10)],
                },
                arguments: vec![KbArgument {
                    role: "Theme".into(),
                    ref_id: "d_T1".into(),
                }],
            }],
            relations: vec![],
            coreferences: vec![],
        }
    }

    #[test]
    fn full_text_comes_from_whole_document_passage() {
        assert_eq!(sample().full_text(), Some("EGFR binds"));
        assert_eq!(KbDocument::default().full_text(), None);
    }

    #[test]
    fn ids_and_references() {
        let doc = sample();
        let ids: Vec<_> = doc.ids().collect();
        assert_eq!(ids, vec!["d__text", "d_T1", "d_E1"]);
        let refs: Vec<_> = doc.references().collect();
        assert_eq!(refs, vec!["d_T1"]);
    }

    #[test]
    fn kb_json_uses_schema_field_names() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["entities"][0]["type"], "Gene");
        assert_eq!(json["entities"][0]["normalized"][0]["db_name"], "NCBIGene");
        assert_eq!(json["events"][0]["trigger"]["offsets"][0][1], 10);
        assert_eq!(json["passages"][0]["type"], "abstract");
    }
}
