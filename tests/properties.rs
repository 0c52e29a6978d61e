//! Property-based tests for parse and projection invariants.
//!
//! Documents are generated with spans cut from their own text, so every
//! entity and trigger is offset-consistent by construction.

use bratkb::offset::{char_len, char_slice};
use bratkb::parse::split_discontiguous;
use bratkb::{
    validate, Argument, BratDocument, EntityTypes, Equivalence, Event, KbProjector, Normalization,
    StandoffParser, TextBound, ValidationIssue,
};
use proptest::prelude::*;
use std::collections::HashSet;

const TYPES: [&str; 4] = ["Protein", "Entity", "Binding", "Regulation"];

fn entity_types() -> EntityTypes {
    EntityTypes::new(["Protein", "Entity"])
}

fn document() -> impl Strategy<Value = BratDocument> {
    (
        prop::collection::vec("[a-zé]{1,8}", 1..20),
        prop::collection::vec((0usize..200, 0usize..200, 0usize..TYPES.len()), 0..12),
        prop::collection::vec((0usize..12, 0usize..12), 0..6),
        prop::collection::vec(prop::collection::vec(0usize..12, 1..4), 0..4),
    )
        .prop_map(|(words, spans, events, groups)| {
            let text = words.join(" ");
            let n = char_len(&text);
            let mut doc = BratDocument::new("doc", text.clone());

            for (i, (a, b, t)) in spans.into_iter().enumerate() {
                let start = a % n;
                let end = start + 1 + b % (n - start);
                doc.text_bound_annotations.push(TextBound {
                    id: format!("T{}", i + 1),
                    annotation_type: TYPES[t].to_string(),
                    offsets: vec![(start, end)],
                    text: vec![char_slice(&text, start, end).unwrap_or_default().to_string()],
                });
            }

            let count = doc.text_bound_annotations.len();
            if count > 0 {
                let tid = |i: usize| format!("T{}", i % count + 1);
                for (j, (trigger, arg)) in events.into_iter().enumerate() {
                    doc.events.push(Event {
                        id: format!("E{}", j + 1),
                        event_type: "Binding".into(),
                        trigger: tid(trigger),
                        arguments: vec![Argument {
                            role: "Theme".into(),
                            ref_id: tid(arg),
                        }],
                    });
                }
                for (k, members) in groups.into_iter().enumerate() {
                    doc.equivalences.push(Equivalence {
                        id: format!("*{}", k + 1),
                        ref_ids: members.into_iter().map(tid).collect(),
                    });
                }
                doc.normalizations.push(Normalization {
                    id: "N1".into(),
                    normalization_type: "Reference".into(),
                    ref_id: "T1".into(),
                    resource_name: "UniProt".into(),
                    cuid: "P04637".into(),
                    text: String::new(),
                });
            }
            doc
        })
}

proptest! {
    #[test]
    fn projection_is_idempotent(doc in document()) {
        let projector = KbProjector::with_entity_types(entity_types());
        prop_assert_eq!(projector.project(&doc), projector.project(&doc));
    }

    #[test]
    fn ids_of_distinct_documents_are_disjoint(doc in document()) {
        let projector = KbProjector::with_entity_types(entity_types());
        let mut other = doc.clone();
        other.document_id = "doc2".into();

        let a = projector.project(&doc);
        let b = projector.project(&other);
        let ids: HashSet<&str> = a.ids().collect();
        for id in b.ids() {
            prop_assert!(!ids.contains(id), "{} in both documents", id);
        }
    }

    #[test]
    fn entity_trigger_partition_is_total_and_exclusive(doc in document()) {
        let types = entity_types();
        let kb = KbProjector::with_entity_types(types.clone()).project(&doc);
        let entity_ids: HashSet<&str> = kb.entities.iter().map(|e| e.id.as_str()).collect();

        for t in &doc.text_bound_annotations {
            let scoped = format!("doc_{}", t.id);
            prop_assert_eq!(
                entity_ids.contains(scoped.as_str()),
                types.contains(&t.annotation_type)
            );
        }
        let triggers = doc
            .text_bound_annotations
            .iter()
            .filter(|t| !types.contains(&t.annotation_type))
            .count();
        prop_assert_eq!(kb.entities.len() + triggers, doc.text_bound_annotations.len());
    }

    #[test]
    fn coreferences_only_contain_entities(doc in document()) {
        let kb = KbProjector::with_entity_types(entity_types()).project(&doc);
        let entity_ids: HashSet<&str> = kb.entities.iter().map(|e| e.id.as_str()).collect();
        prop_assert!(kb.coreferences.len() <= doc.equivalences.len());
        for coref in &kb.coreferences {
            for member in &coref.entity_ids {
                prop_assert!(entity_ids.contains(member.as_str()), "{} is not an entity", member);
            }
        }
    }

    #[test]
    fn projected_spans_match_text(doc in document()) {
        let kb = KbProjector::with_entity_types(entity_types()).project(&doc);
        let report = validate(&kb);
        for issue in &report.issues {
            let offset_problem = matches!(
                issue,
                ValidationIssue::TextMismatch { .. }
                    | ValidationIssue::SpanOutOfBounds { .. }
                    | ValidationIssue::InvalidSpan { .. }
                    | ValidationIssue::ChunkCountMismatch { .. }
            );
            prop_assert!(!offset_problem, "{}", issue);
        }
    }

    #[test]
    fn input_is_never_mutated(doc in document()) {
        let before = doc.clone();
        let _ = KbProjector::with_entity_types(entity_types()).project_with_diagnostics(&doc);
        prop_assert_eq!(doc, before);
    }

    #[test]
    fn discontiguous_split_recovers_fragments(
        words in prop::collection::vec("[a-zA-Zü]{1,6}", 3..10),
        pick in (0usize..10, 0usize..10),
    ) {
        // Document text has single spaces between words; the annotation text
        // joins two non-adjacent words with one space, as brat writes it.
        let first = pick.0 % (words.len() - 2);
        let second = first + 2 + pick.1 % (words.len() - first - 2);
        let start_of = |i: usize| words[..i].iter().map(|w| char_len(w) + 1).sum::<usize>();
        let offsets = [
            (start_of(first), start_of(first) + char_len(&words[first])),
            (start_of(second), start_of(second) + char_len(&words[second])),
        ];
        let joined = format!("{} {}", words[first], words[second]);
        prop_assert_eq!(
            split_discontiguous(&joined, &offsets),
            vec![words[first].clone(), words[second].clone()]
        );
    }

    #[test]
    fn parsing_is_deterministic(
        words in prop::collection::vec("[a-z]{1,6}", 1..8),
    ) {
        let text = words.join(" ");
        let annotations: String = words
            .iter()
            .scan(0usize, |pos, w| {
                let start = *pos;
                *pos += w.len() + 1;
                Some((start, w))
            })
            .enumerate()
            .map(|(i, (start, w))| format!("T{}\tProtein {} {}\t{}\n", i + 1, start, start + w.len(), w))
            .collect();

        let parser = StandoffParser::default();
        let a = parser.parse_str("d", text.as_str(), &annotations).unwrap();
        let b = parser.parse_str("d", text.as_str(), &annotations).unwrap();
        prop_assert_eq!(a.text_bound_annotations.len(), words.len());
        prop_assert_eq!(a, b);
    }
}
