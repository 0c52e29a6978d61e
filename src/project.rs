//! Projection of a [`BratDocument`] into the canonical KB schema.
//!
//! The projector partitions text-bound annotations into entities and event
//! triggers using the corpus's entity type set, copies trigger spans into
//! their events, keeps only entity-only equivalence groups as coreference
//! clusters, and prefixes every id with `"<document_id>_"` so documents can
//! be merged without collisions.
//!
//! Projection never fails on unresolved references. The lenient entry
//! points ([`KbProjector::project`], [`KbProjector::project_with_diagnostics`])
//! produce a best-effort document and report problems as
//! [`ProjectionIssue`]s; [`KbProjector::try_project`] turns the first
//! unresolved reference into [`Error::DanglingReference`].
//!
//! # Example
//!
//! ```rust
//! use bratkb::config::EntityTypes;
//! use bratkb::parse::StandoffParser;
//! use bratkb::project::project;
//!
//! let doc = StandoffParser::default()
//!     .parse_str(
//!         "PMID-1",
//!         "EGFR binds",
//!         "T1\tProtein 0 4\tEGFR\nT2\tBinding 5 10\tbinds\nE1\tBinding:T2 Theme:T1",
//!     )
//!     .unwrap();
//! let kb = project(&doc, &EntityTypes::new(["Protein"]));
//!
//! assert_eq!(kb.entities[0].id, "PMID-1_T1");
//! assert_eq!(kb.events[0].trigger.text, vec!["binds"]);
//! assert_eq!(kb.events[0].arguments[0].ref_id, "PMID-1_T1");
//! ```

use crate::config::{EntityTypes, ProjectorConfig};
use crate::offset::char_len;
use crate::{
    BratDocument, Coreference, DbReference, Error, KbArgument, KbDocument, KbEntity, KbEvent,
    KbRelation, Passage, Result, TextBound, Trigger,
};
use std::collections::{HashMap, HashSet};
use std::fmt;

/// A problem noticed while projecting. Ids are local (unprefixed).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProjectionIssue {
    /// An event's trigger is not a known trigger annotation.
    ///
    /// Also raised when the trigger id names an entity: entities are never
    /// used as triggers.
    UnresolvedTrigger {
        /// Event id.
        event_id: String,
        /// The trigger id that did not resolve.
        trigger: String,
    },
    /// An event argument or relation endpoint names neither an entity nor an event.
    DanglingReference {
        /// Id of the event or relation holding the reference.
        referrer: String,
        /// The unresolved id.
        ref_id: String,
    },
    /// An equivalence group with a non-entity member was not emitted.
    DroppedEquivalence {
        /// Equivalence id.
        id: String,
        /// Its members.
        ref_ids: Vec<String>,
    },
}

impl ProjectionIssue {
    /// True for issues about references that do not resolve.
    #[must_use]
    pub fn is_dangling(&self) -> bool {
        matches!(
            self,
            Self::UnresolvedTrigger { .. } | Self::DanglingReference { .. }
        )
    }

    fn into_error(self, document_id: &str) -> Option<Error> {
        match self {
            Self::UnresolvedTrigger { event_id, trigger } => {
                Some(Error::dangling(document_id, event_id, trigger))
            }
            Self::DanglingReference { referrer, ref_id } => {
                Some(Error::dangling(document_id, referrer, ref_id))
            }
            Self::DroppedEquivalence { .. } => None,
        }
    }
}

impl fmt::Display for ProjectionIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnresolvedTrigger { event_id, trigger } => {
                write!(f, "event {event_id}: trigger {trigger} is not a trigger annotation")
            }
            Self::DanglingReference { referrer, ref_id } => {
                write!(f, "{referrer}: reference {ref_id} does not resolve")
            }
            Self::DroppedEquivalence { id, ref_ids } => {
                write!(
                    f,
                    "equivalence {id} dropped: members [{}] are not all entities",
                    ref_ids.join(", ")
                )
            }
        }
    }
}

/// A projected document plus whatever went wrong on the way.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Projection {
    /// Best-effort KB document.
    pub document: KbDocument,
    /// Problems, in the order they were found.
    pub issues: Vec<ProjectionIssue>,
}

impl Projection {
    /// True if nothing was reported.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }
}

/// Projects parsed standoff documents into [`KbDocument`]s.
///
/// Stateless apart from its read-only config, so one projector can be shared
/// across threads.
#[derive(Debug, Clone)]
pub struct KbProjector {
    config: ProjectorConfig,
}

impl KbProjector {
    /// Create a projector.
    #[must_use]
    pub fn new(config: ProjectorConfig) -> Self {
        Self { config }
    }

    /// Create a projector with the default passage type.
    #[must_use]
    pub fn with_entity_types(entity_types: EntityTypes) -> Self {
        Self::new(ProjectorConfig::new(entity_types))
    }

    /// Projector config.
    #[must_use]
    pub fn config(&self) -> &ProjectorConfig {
        &self.config
    }

    /// Project a document, tolerating unresolved references.
    #[must_use]
    pub fn project(&self, doc: &BratDocument) -> KbDocument {
        self.project_with_diagnostics(doc).document
    }

    /// Project a document and report every problem found.
    #[must_use]
    pub fn project_with_diagnostics(&self, doc: &BratDocument) -> Projection {
        let prefix = format!("{}_", doc.document_id);
        let scoped = |id: &str| format!("{prefix}{id}");
        let mut issues = Vec::new();

        let mut normalizations_by_ref: HashMap<&str, Vec<DbReference>> = HashMap::new();
        for n in &doc.normalizations {
            normalizations_by_ref
                .entry(n.ref_id.as_str())
                .or_default()
                .push(DbReference::new(&n.resource_name, &n.cuid));
        }

        let (entity_spans, trigger_spans): (Vec<&TextBound>, Vec<&TextBound>) = doc
            .text_bound_annotations
            .iter()
            .partition(|t| self.config.entity_types.contains(&t.annotation_type));

        let entity_ids: HashSet<&str> = entity_spans.iter().map(|t| t.id.as_str()).collect();
        let mut triggers: HashMap<&str, &TextBound> = HashMap::new();
        for &t in &trigger_spans {
            triggers.entry(t.id.as_str()).or_insert(t);
        }
        // Arguments and relation endpoints name an entity or an event, never a trigger.
        let known: HashSet<&str> = entity_ids
            .iter()
            .copied()
            .chain(doc.events.iter().map(|e| e.id.as_str()))
            .collect();

        let entities = entity_spans
            .iter()
            .map(|t| KbEntity {
                id: scoped(&t.id),
                entity_type: t.annotation_type.clone(),
                text: t.text.clone(),
                offsets: t.offsets.clone(),
                normalized: normalizations_by_ref
                    .get(t.id.as_str())
                    .cloned()
                    .unwrap_or_default(),
            })
            .collect();

        let mut events = Vec::with_capacity(doc.events.len());
        for event in &doc.events {
            let trigger = match triggers.get(event.trigger.as_str()) {
                Some(t) => Trigger {
                    text: t.text.clone(),
                    offsets: t.offsets.clone(),
                },
                None => {
                    issues.push(ProjectionIssue::UnresolvedTrigger {
                        event_id: event.id.clone(),
                        trigger: event.trigger.clone(),
                    });
                    Trigger::default()
                }
            };
            for arg in &event.arguments {
                if !known.contains(arg.ref_id.as_str()) {
                    issues.push(ProjectionIssue::DanglingReference {
                        referrer: event.id.clone(),
                        ref_id: arg.ref_id.clone(),
                    });
                }
            }
            events.push(KbEvent {
                id: scoped(&event.id),
                event_type: event.event_type.clone(),
                trigger,
                arguments: event
                    .arguments
                    .iter()
                    .map(|a| KbArgument {
                        role: a.role.clone(),
                        ref_id: scoped(&a.ref_id),
                    })
                    .collect(),
            });
        }

        let mut relations = Vec::with_capacity(doc.relations.len());
        for relation in &doc.relations {
            for endpoint in [&relation.head.ref_id, &relation.tail.ref_id] {
                if !known.contains(endpoint.as_str()) {
                    issues.push(ProjectionIssue::DanglingReference {
                        referrer: relation.id.clone(),
                        ref_id: endpoint.clone(),
                    });
                }
            }
            relations.push(KbRelation {
                id: scoped(&relation.id),
                relation_type: relation.relation_type.clone(),
                arg1_id: scoped(&relation.head.ref_id),
                arg2_id: scoped(&relation.tail.ref_id),
                normalized: Vec::new(),
            });
        }

        let mut coreferences = Vec::new();
        for eq in &doc.equivalences {
            if eq.ref_ids.iter().all(|r| entity_ids.contains(r.as_str())) {
                coreferences.push(Coreference {
                    id: scoped(&eq.id),
                    entity_ids: eq.ref_ids.iter().map(|r| scoped(r)).collect(),
                });
            } else {
                // Groups mixing entities with triggers or events carry no
                // entity-coreference meaning in this schema.
                issues.push(ProjectionIssue::DroppedEquivalence {
                    id: eq.id.clone(),
                    ref_ids: eq.ref_ids.clone(),
                });
            }
        }

        let passage = Passage {
            id: format!("{prefix}_text"),
            passage_type: self.config.passage_type.clone(),
            text: vec![doc.text.clone()],
            offsets: vec![(0, char_len(&doc.text))],
        };

        for issue in &issues {
            log::debug!("{}: {}", doc.document_id, issue);
        }

        let document = KbDocument {
            document_id: doc.document_id.clone(),
            passages: vec![passage],
            entities,
            events,
            relations,
            coreferences,
        };
        log::debug!(
            "{}: projected {} entities, {} events, {} relations, {} coreferences ({} issues)",
            document.document_id,
            document.entities.len(),
            document.events.len(),
            document.relations.len(),
            document.coreferences.len(),
            issues.len()
        );

        Projection { document, issues }
    }

    /// Project a document, failing on the first unresolved reference.
    ///
    /// Dropped equivalence groups are not errors.
    ///
    /// # Errors
    ///
    /// `Error::DanglingReference` naming the event or relation and the id
    /// that did not resolve.
    pub fn try_project(&self, doc: &BratDocument) -> Result<KbDocument> {
        let Projection { document, issues } = self.project_with_diagnostics(doc);
        match issues
            .into_iter()
            .find_map(|issue| issue.into_error(&doc.document_id))
        {
            Some(err) => Err(err),
            None => Ok(document),
        }
    }
}

/// Project `doc` with the given entity types and the default passage type.
#[must_use]
pub fn project(doc: &BratDocument, entity_types: &EntityTypes) -> KbDocument {
    KbProjector::with_entity_types(entity_types.clone()).project(doc)
}
