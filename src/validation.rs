//! Advisory checks over a projected [`KbDocument`].
//!
//! Nothing here is run by the projector. Some source corpora contain offset
//! errors or references to annotations that were never released; callers
//! decide whether a report is fatal.
//!
//! Checks:
//! - every passage, entity and trigger span slices to its recorded text
//!   (character offsets, not bytes)
//! - offsets are ordered and inside the document text
//! - each offset range has exactly one text chunk
//! - every event has a trigger
//! - ids are unique
//! - event arguments and relation endpoints resolve to an entity or event,
//!   coreference members to an entity

use crate::offset::SpanConverter;
use crate::{Error, KbDocument, Offset, Result};
use std::collections::HashSet;
use std::fmt;

/// A problem found in a projected document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationIssue {
    /// No passage starts at offset 0, so spans cannot be checked.
    MissingText,
    /// Span end precedes its start.
    InvalidSpan {
        /// Record holding the span.
        record_id: String,
        /// Start offset.
        start: usize,
        /// End offset.
        end: usize,
    },
    /// Span extends beyond the text.
    SpanOutOfBounds {
        /// Record holding the span.
        record_id: String,
        /// End offset.
        end: usize,
        /// Text length in characters.
        text_len: usize,
    },
    /// Recorded text differs from the text at the span.
    TextMismatch {
        /// Record holding the span.
        record_id: String,
        /// Start offset.
        start: usize,
        /// End offset.
        end: usize,
        /// Text stored on the record.
        expected: String,
        /// Text found at the span.
        actual: String,
    },
    /// Number of offset ranges and text chunks differ.
    ChunkCountMismatch {
        /// Record id.
        record_id: String,
        /// Number of offset ranges.
        offsets: usize,
        /// Number of text chunks.
        chunks: usize,
    },
    /// An event has no trigger span.
    MissingTrigger {
        /// Event id.
        event_id: String,
    },
    /// The same id is used by more than one record.
    DuplicateId {
        /// The repeated id.
        id: String,
    },
    /// A reference does not resolve within the document.
    DanglingReference {
        /// Record holding the reference.
        referrer: String,
        /// The unresolved id.
        ref_id: String,
    },
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingText => write!(f, "no passage covers the document text"),
            Self::InvalidSpan {
                record_id,
                start,
                end,
            } => write!(f, "{record_id}: invalid span [{start}, {end})"),
            Self::SpanOutOfBounds {
                record_id,
                end,
                text_len,
            } => write!(
                f,
                "{record_id}: span end {end} exceeds text length {text_len}"
            ),
            Self::TextMismatch {
                record_id,
                start,
                end,
                expected,
                actual,
            } => write!(
                f,
                "{record_id}: text mismatch at [{start}, {end}): expected '{expected}', got '{actual}'"
            ),
            Self::ChunkCountMismatch {
                record_id,
                offsets,
                chunks,
            } => write!(
                f,
                "{record_id}: {offsets} offset ranges but {chunks} text chunks"
            ),
            Self::MissingTrigger { event_id } => write!(f, "{event_id}: event has no trigger"),
            Self::DuplicateId { id } => write!(f, "duplicate id {id}"),
            Self::DanglingReference { referrer, ref_id } => {
                write!(f, "{referrer}: reference {ref_id} does not resolve")
            }
        }
    }
}

/// Result of validating one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationReport {
    /// Document that was checked.
    pub document_id: String,
    /// Issues in the order they were found.
    pub issues: Vec<ValidationIssue>,
}

impl ValidationReport {
    /// Create an empty report.
    #[must_use]
    pub fn new(document_id: impl Into<String>) -> Self {
        Self {
            document_id: document_id.into(),
            issues: Vec::new(),
        }
    }

    /// True if no issue was found.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.issues.is_empty()
    }

    /// Dangling reference issues only.
    pub fn dangling_references(&self) -> impl Iterator<Item = &ValidationIssue> {
        self.issues
            .iter()
            .filter(|i| matches!(i, ValidationIssue::DanglingReference { .. }))
    }

    /// Fail on the first dangling reference.
    ///
    /// Offset and duplicate-id issues stay advisory and do not fail.
    ///
    /// # Errors
    ///
    /// `Error::DanglingReference` for the first unresolved reference.
    pub fn into_result(self) -> Result<()> {
        let document_id = self.document_id;
        match self.issues.into_iter().find_map(|issue| match issue {
            ValidationIssue::DanglingReference { referrer, ref_id } => Some((referrer, ref_id)),
            _ => None,
        }) {
            Some((referrer, ref_id)) => Err(Error::dangling(document_id, referrer, ref_id)),
            None => Ok(()),
        }
    }

    fn push(&mut self, issue: ValidationIssue) {
        self.issues.push(issue);
    }
}

/// Validate a projected document.
#[must_use]
pub fn validate(doc: &KbDocument) -> ValidationReport {
    let mut report = ValidationReport::new(&doc.document_id);

    match doc.full_text() {
        Some(text) => {
            let conv = SpanConverter::new(text);
            for p in &doc.passages {
                check_spans(&mut report, &conv, &p.id, &p.offsets, &p.text);
            }
            for e in &doc.entities {
                check_spans(&mut report, &conv, &e.id, &e.offsets, &e.text);
            }
            for e in doc.events.iter().filter(|e| !e.trigger.is_empty()) {
                check_spans(&mut report, &conv, &e.id, &e.trigger.offsets, &e.trigger.text);
            }
        }
        None => report.push(ValidationIssue::MissingText),
    }

    for event in doc.events.iter().filter(|e| e.trigger.is_empty()) {
        report.push(ValidationIssue::MissingTrigger {
            event_id: event.id.clone(),
        });
    }

    let mut seen = HashSet::new();
    for id in doc.ids() {
        if !seen.insert(id) {
            report.push(ValidationIssue::DuplicateId { id: id.to_string() });
        }
    }

    let entity_ids: HashSet<&str> = doc.entities.iter().map(|e| e.id.as_str()).collect();
    let argument_ids: HashSet<&str> = entity_ids
        .iter()
        .copied()
        .chain(doc.events.iter().map(|e| e.id.as_str()))
        .collect();

    let dangling = |referrer: &str, ref_id: &str| ValidationIssue::DanglingReference {
        referrer: referrer.to_string(),
        ref_id: ref_id.to_string(),
    };
    for event in &doc.events {
        for arg in event
            .arguments
            .iter()
            .filter(|a| !argument_ids.contains(a.ref_id.as_str()))
        {
            report.push(dangling(&event.id, &arg.ref_id));
        }
    }
    for relation in &doc.relations {
        for endpoint in [&relation.arg1_id, &relation.arg2_id] {
            if !argument_ids.contains(endpoint.as_str()) {
                report.push(dangling(&relation.id, endpoint));
            }
        }
    }
    for coref in &doc.coreferences {
        for member in coref
            .entity_ids
            .iter()
            .filter(|m| !entity_ids.contains(m.as_str()))
        {
            report.push(dangling(&coref.id, member));
        }
    }

    log::debug!(
        "{}: validated ({} issues)",
        report.document_id,
        report.issues.len()
    );
    report
}

fn check_spans(
    report: &mut ValidationReport,
    conv: &SpanConverter<'_>,
    record_id: &str,
    offsets: &[Offset],
    chunks: &[String],
) {
    if offsets.len() != chunks.len() {
        report.push(ValidationIssue::ChunkCountMismatch {
            record_id: record_id.to_string(),
            offsets: offsets.len(),
            chunks: chunks.len(),
        });
        return;
    }

    let text_len = conv.char_len();
    for (&(start, end), expected) in offsets.iter().zip(chunks) {
        if end < start {
            report.push(ValidationIssue::InvalidSpan {
                record_id: record_id.to_string(),
                start,
                end,
            });
        } else if end > text_len {
            report.push(ValidationIssue::SpanOutOfBounds {
                record_id: record_id.to_string(),
                end,
                text_len,
            });
        } else {
            let actual = conv.slice(start, end).unwrap_or_default();
            if actual != expected.as_str() {
                report.push(ValidationIssue::TextMismatch {
                    record_id: record_id.to_string(),
                    start,
                    end,
                    expected: expected.clone(),
                    actual: actual.to_string(),
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EntityTypes;
    use crate::parse::StandoffParser;
    use crate::project::project;

    fn kb(text: &str, annotations: &str) -> KbDocument {
        let doc = StandoffParser::default()
            .parse_str("d", text, annotations)
            .unwrap();
        project(&doc, &EntityTypes::new(["Gene", "Disorder"]))
    }

    #[test]
    fn test_clean_document() {
        let doc = kb(
            "EGFR mutation L858R",
            "T1\tGene 0 4\tEGFR\nT2\tMutation 5 13\tmutation\nE1\tMutation:T2 Theme:T1",
        );
        let report = validate(&doc);
        assert!(report.is_valid(), "{:?}", report.issues);
        assert!(report.into_result().is_ok());
    }

    #[test]
    fn test_discontiguous_entity_round_trip() {
        let doc = kb(
            "Complains pain in my left leg today",
            "T1\tDisorder 10 14;26 29\tpain leg",
        );
        assert!(validate(&doc).is_valid());
    }

    #[test]
    fn test_offsets_are_characters() {
        let doc = kb("Crohn’s disease flared", "T1\tDisorder 0 15\tCrohn’s disease");
        assert!(validate(&doc).is_valid());
    }

    #[test]
    fn test_text_mismatch_and_out_of_bounds() {
        let doc = kb(
            "EGFR mutation L858R",
            "T1\tGene 0 4\tHER2\nT2\tGene 14 25\tL858R",
        );
        let report = validate(&doc);
        assert_eq!(report.issues.len(), 2);
        assert!(matches!(
            &report.issues[0],
            ValidationIssue::TextMismatch { actual, .. } if actual == "EGFR"
        ));
        assert!(matches!(
            report.issues[1],
            ValidationIssue::SpanOutOfBounds { end: 25, text_len: 19, .. }
        ));
        // Advisory only.
        assert!(report.into_result().is_ok());
    }

    #[test]
    fn test_huge_discontiguous_offset_is_out_of_bounds() {
        let doc = kb("abc", &format!("T1\tGene 0 {};0 2\tabc", usize::MAX));
        let report = validate(&doc);
        assert!(matches!(
            report.issues.as_slice(),
            [ValidationIssue::SpanOutOfBounds { text_len: 3, .. }, ValidationIssue::TextMismatch { .. }]
        ));
    }

    #[test]
    fn test_dangling_references() {
        let mut doc = kb("EGFR binds", "T1\tGene 0 4\tEGFR\nR1\tLinks Arg1:T1 Arg2:T9");
        doc.coreferences.push(crate::Coreference {
            id: "d_*1".into(),
            entity_ids: vec!["d_T1".into(), "d_T5".into()],
        });
        let report = validate(&doc);
        assert_eq!(report.dangling_references().count(), 2);
        match report.into_result() {
            Err(Error::DanglingReference {
                document_id,
                referrer,
                ref_id,
            }) => {
                assert_eq!(document_id, "d");
                assert_eq!(referrer, "d_R1");
                assert_eq!(ref_id, "d_T9");
            }
            other => panic!("expected dangling reference, got {other:?}"),
        }
    }

    #[test]
    fn test_duplicate_ids_and_chunk_counts() {
        let mut doc = kb("EGFR binds", "T1\tGene 0 4\tEGFR");
        let mut dup = doc.entities[0].clone();
        dup.text.push("extra".into());
        doc.entities.push(dup);
        let report = validate(&doc);
        assert!(report
            .issues
            .contains(&ValidationIssue::DuplicateId { id: "d_T1".into() }));
        assert!(report.issues.iter().any(|i| matches!(
            i,
            ValidationIssue::ChunkCountMismatch { offsets: 1, chunks: 2, .. }
        )));
    }

    #[test]
    fn test_unresolved_trigger_reported() {
        let doc = kb("EGFR binds", "T1\tGene 0 4\tEGFR\nE1\tBinding:T7 Theme:T1");
        let report = validate(&doc);
        assert_eq!(
            report.issues,
            vec![ValidationIssue::MissingTrigger {
                event_id: "d_E1".into()
            }]
        );
    }

    #[test]
    fn test_missing_passage() {
        let mut doc = kb("EGFR", "T1\tGene 0 4\tEGFR");
        doc.passages.clear();
        let report = validate(&doc);
        assert_eq!(report.issues, vec![ValidationIssue::MissingText]);
    }
}
