//! Standoff (brat) annotation parser.
//!
//! Turns a document's text plus the lines of its annotation files into a
//! [`BratDocument`]. Each non-blank line is decoded into exactly one of the
//! eight record kinds, selected by its first character:
//!
//! | Prefix | Kind | Fields (tab-separated) |
//! |--------|------|------------------------|
//! | `T` | text-bound | `id`, `Type start end[;start end]*`, `text` |
//! | `E` | event | `id`, `Type:Trigger [Role:Ref]*` |
//! | `R` | relation | `id`, `Type Role:Ref Role:Ref` |
//! | `*` | equivalence | `id`, `Type Ref Ref*` |
//! | `A` | attribute | `id`, `Name Ref [Value]` |
//! | `M` | modifier | `id`, `Name Ref [Value]` |
//! | `N` | normalization | `id`, `Type Ref Resource:Cuid`, `[text]` |
//! | `#` | note | `id`, `Type Ref`, `[text]` |
//!
//! Any other prefix fails the whole parse; a document is never silently
//! truncated.
//!
//! # Example
//!
//! ```rust
//! use bratkb::parse::StandoffParser;
//!
//! let parser = StandoffParser::default();
//! let doc = parser
//!     .parse_str("PMID-1", "EGFR mutation L858R", "T1\tGene 0 4\tEGFR\n")
//!     .unwrap();
//! assert_eq!(doc.text_bound_annotations[0].text, vec!["EGFR"]);
//! ```

use crate::config::ParseOptions;
use crate::{
    Argument, Attribute, BratDocument, Equivalence, Error, Event, Normalization, Note, Offset,
    Relation, RelationArgument, Result, TextBound,
};
use std::collections::HashSet;

/// Name used for annotation text passed without a file.
const INLINE_SOURCE: &str = "<inline>";

/// The contents of one annotation file of a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotationFile {
    /// Suffix the file was found under, e.g. `.ann`.
    pub suffix: String,
    /// Display name used in error messages.
    pub name: String,
    /// Raw file contents.
    pub content: String,
}

impl AnnotationFile {
    /// Create an annotation file named after its suffix.
    #[must_use]
    pub fn new(suffix: impl Into<String>, content: impl Into<String>) -> Self {
        let suffix = suffix.into();
        Self {
            name: suffix.clone(),
            suffix,
            content: content.into(),
        }
    }

    /// Set the display name (usually the file path).
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}

/// The eight standoff record kinds, keyed by line prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnnotationKind {
    /// `T`
    TextBound,
    /// `E`
    Event,
    /// `R`
    Relation,
    /// `*`
    Equivalence,
    /// `A`
    Attribute,
    /// `M`
    Modifier,
    /// `N`
    Normalization,
    /// `#`
    Note,
}

impl AnnotationKind {
    /// Kind for a line's first character.
    #[must_use]
    pub fn from_prefix(prefix: char) -> Option<Self> {
        match prefix {
            'T' => Some(Self::TextBound),
            'E' => Some(Self::Event),
            'R' => Some(Self::Relation),
            '*' => Some(Self::Equivalence),
            'A' => Some(Self::Attribute),
            'M' => Some(Self::Modifier),
            'N' => Some(Self::Normalization),
            '#' => Some(Self::Note),
            _ => None,
        }
    }

    /// Minimum number of tab-separated fields a line of this kind needs.
    #[must_use]
    pub const fn min_fields(self) -> usize {
        match self {
            Self::TextBound => 3,
            _ => 2,
        }
    }
}

/// One decoded annotation line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Annotation {
    /// Text-bound span.
    TextBound(TextBound),
    /// Event.
    Event(Event),
    /// Binary relation.
    Relation(Relation),
    /// Equivalence group.
    Equivalence(Equivalence),
    /// Attribute (`A`).
    Attribute(Attribute),
    /// Modifier (`M`), the legacy spelling of an attribute.
    Modifier(Attribute),
    /// Normalization.
    Normalization(Normalization),
    /// Annotator note.
    Note(Note),
}

impl Annotation {
    /// Kind of this annotation.
    #[must_use]
    pub fn kind(&self) -> AnnotationKind {
        match self {
            Self::TextBound(_) => AnnotationKind::TextBound,
            Self::Event(_) => AnnotationKind::Event,
            Self::Relation(_) => AnnotationKind::Relation,
            Self::Equivalence(_) => AnnotationKind::Equivalence,
            Self::Attribute(_) => AnnotationKind::Attribute,
            Self::Modifier(_) => AnnotationKind::Modifier,
            Self::Normalization(_) => AnnotationKind::Normalization,
            Self::Note(_) => AnnotationKind::Note,
        }
    }

    /// Decode a single annotation line.
    ///
    /// `file` and `line_no` only label the error.
    ///
    /// # Errors
    ///
    /// `Error::MalformedAnnotation` if the prefix is unknown or the line does
    /// not match the grammar of its kind.
    pub fn parse_line(line: &str, file: &str, line_no: usize) -> Result<Self> {
        let bad = |reason: String| Error::malformed(file, line_no, line, reason);

        let prefix = line
            .chars()
            .next()
            .ok_or_else(|| bad("empty annotation line".to_string()))?;
        let kind = AnnotationKind::from_prefix(prefix)
            .ok_or_else(|| bad(format!("unrecognized annotation prefix {prefix:?}")))?;

        let fields: Vec<&str> = line.splitn(3, '\t').collect();
        if fields.len() < kind.min_fields() {
            return Err(bad(format!(
                "expected at least {} tab-separated fields, found {}",
                kind.min_fields(),
                fields.len()
            )));
        }
        let id = fields[0].to_string();
        let body = fields[1];
        let rest = fields.get(2).copied().unwrap_or("");

        let annotation = match kind {
            AnnotationKind::TextBound => {
                Self::TextBound(decode_text_bound(id, body, rest).map_err(bad)?)
            }
            AnnotationKind::Event => Self::Event(decode_event(id, body).map_err(bad)?),
            AnnotationKind::Relation => Self::Relation(decode_relation(id, body).map_err(bad)?),
            AnnotationKind::Equivalence => {
                Self::Equivalence(decode_equivalence(id, body).map_err(bad)?)
            }
            AnnotationKind::Attribute => Self::Attribute(decode_attribute(id, body).map_err(bad)?),
            AnnotationKind::Modifier => Self::Modifier(decode_attribute(id, body).map_err(bad)?),
            AnnotationKind::Normalization => {
                Self::Normalization(decode_normalization(id, body, rest).map_err(bad)?)
            }
            AnnotationKind::Note => Self::Note(decode_note(id, body, rest).map_err(bad)?),
        };
        Ok(annotation)
    }
}

type Decoded<T> = std::result::Result<T, String>;

fn split_role(token: &str, what: &str) -> Decoded<(String, String)> {
    match token.split_once(':') {
        Some((role, ref_id)) if !role.is_empty() && !ref_id.is_empty() => {
            Ok((role.to_string(), ref_id.to_string()))
        }
        _ => Err(format!("{what} {token:?} is not of the form 'Role:Id'")),
    }
}

fn parse_offset(span: &str) -> Decoded<Offset> {
    let mut parts = span.split_whitespace();
    let (Some(start), Some(end), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(format!("offset {span:?} is not a 'start end' pair"));
    };
    let start: usize = start
        .parse()
        .map_err(|_| format!("non-integer offset {start:?}"))?;
    let end: usize = end
        .parse()
        .map_err(|_| format!("non-integer offset {end:?}"))?;
    if end < start {
        return Err(format!("offset end {end} precedes start {start}"));
    }
    Ok((start, end))
}

fn decode_text_bound(id: String, body: &str, text: &str) -> Decoded<TextBound> {
    let (annotation_type, spans) = body
        .split_once(' ')
        .ok_or_else(|| format!("text-bound {body:?} has no offsets"))?;
    if annotation_type.is_empty() {
        return Err("text-bound has an empty type".to_string());
    }
    let offsets = spans
        .split(';')
        .map(parse_offset)
        .collect::<Decoded<Vec<_>>>()?;

    let text = if offsets.len() > 1 {
        split_discontiguous(text, &offsets)
    } else {
        vec![text.to_string()]
    };

    Ok(TextBound {
        id,
        annotation_type: annotation_type.to_string(),
        offsets,
        text,
    })
}

/// Split the text of a discontiguous mention into one chunk per range.
///
/// brat joins the fragments of a discontiguous span with a space. Walking
/// left to right, each chunk takes `end - start` characters, then any run of
/// spaces is skipped. Assumes ranges are listed in increasing order and only
/// ASCII spaces separate the fragments.
#[must_use]
pub fn split_discontiguous(text: &str, offsets: &[Offset]) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    let mut chunks = Vec::with_capacity(offsets.len());
    let mut i = 0;

    for &(start, end) in offsets {
        let len = end.saturating_sub(start);
        let from = i.min(chars.len());
        let to = i.saturating_add(len).min(chars.len());
        chunks.push(chars[from..to].iter().collect());
        i = i.saturating_add(len);
        while i < chars.len() && chars[i] == ' ' {
            i += 1;
        }
    }

    chunks
}

fn decode_event(id: String, body: &str) -> Decoded<Event> {
    let mut tokens = body.split_whitespace();
    let head = tokens
        .next()
        .ok_or_else(|| "event has no type".to_string())?;
    let (event_type, trigger) = split_role(head, "event type/trigger")?;
    let arguments = tokens
        .map(|token| {
            split_role(token, "event argument").map(|(role, ref_id)| Argument { role, ref_id })
        })
        .collect::<Decoded<Vec<_>>>()?;

    Ok(Event {
        id,
        event_type,
        trigger,
        arguments,
    })
}

fn decode_relation(id: String, body: &str) -> Decoded<Relation> {
    let tokens: Vec<&str> = body.split_whitespace().collect();
    let [relation_type, head, tail, ..] = tokens.as_slice() else {
        return Err(format!(
            "relation needs a type and two arguments, found {} tokens",
            tokens.len()
        ));
    };
    let (head_role, head_ref) = split_role(head, "relation argument")?;
    let (tail_role, tail_ref) = split_role(tail, "relation argument")?;

    Ok(Relation {
        id,
        relation_type: (*relation_type).to_string(),
        head: RelationArgument {
            ref_id: head_ref,
            role: head_role,
        },
        tail: RelationArgument {
            ref_id: tail_ref,
            role: tail_role,
        },
    })
}

fn decode_equivalence(id: String, body: &str) -> Decoded<Equivalence> {
    // The leading token is the relation name (`Equiv`); members follow.
    let ref_ids: Vec<String> = body.split_whitespace().skip(1).map(str::to_string).collect();
    if ref_ids.is_empty() {
        return Err("equivalence has no members".to_string());
    }
    Ok(Equivalence { id, ref_ids })
}

fn decode_attribute(id: String, body: &str) -> Decoded<Attribute> {
    let tokens: Vec<&str> = body.split_whitespace().collect();
    let [attribute_type, ref_id, rest @ ..] = tokens.as_slice() else {
        return Err("attribute needs a name and a target id".to_string());
    };
    Ok(Attribute {
        id,
        attribute_type: (*attribute_type).to_string(),
        ref_id: (*ref_id).to_string(),
        value: rest.first().map(|v| (*v).to_string()).unwrap_or_default(),
    })
}

fn decode_normalization(id: String, body: &str, text: &str) -> Decoded<Normalization> {
    let tokens: Vec<&str> = body.split_whitespace().collect();
    let [normalization_type, ref_id, resource, ..] = tokens.as_slice() else {
        return Err("normalization needs a type, a target id and 'Resource:Id'".to_string());
    };
    let (resource_name, cuid) = resource
        .split_once(':')
        .filter(|(name, cuid)| !name.is_empty() && !cuid.is_empty())
        .ok_or_else(|| format!("normalization reference {resource:?} is not 'Resource:Id'"))?;

    Ok(Normalization {
        id,
        normalization_type: (*normalization_type).to_string(),
        ref_id: (*ref_id).to_string(),
        resource_name: resource_name.to_string(),
        cuid: cuid.to_string(),
        text: text.to_string(),
    })
}

fn decode_note(id: String, body: &str, text: &str) -> Decoded<Note> {
    let tokens: Vec<&str> = body.split_whitespace().collect();
    let [note_type, ref_id, ..] = tokens.as_slice() else {
        return Err("note needs a type and a target id".to_string());
    };
    Ok(Note {
        id,
        note_type: (*note_type).to_string(),
        ref_id: (*ref_id).to_string(),
        text: text.to_string(),
    })
}

/// Parser for brat standoff documents.
#[derive(Debug, Clone, Default)]
pub struct StandoffParser {
    options: ParseOptions,
}

impl StandoffParser {
    /// Create a parser.
    ///
    /// # Errors
    ///
    /// `Error::Config` if the options are invalid (e.g. no suffixes).
    pub fn new(options: ParseOptions) -> Result<Self> {
        options.validate()?;
        Ok(Self { options })
    }

    /// Parser options.
    #[must_use]
    pub fn options(&self) -> &ParseOptions {
        &self.options
    }

    /// Parse a document from its text and annotation files.
    ///
    /// Lines are concatenated in the order of the configured suffix list;
    /// files whose suffix is not configured are ignored. Records keep
    /// first-seen order and colliding ids are not deduplicated.
    ///
    /// # Errors
    ///
    /// `Error::MalformedAnnotation` for the first line that does not parse.
    pub fn parse(
        &self,
        document_id: impl Into<String>,
        text: impl Into<String>,
        files: &[AnnotationFile],
    ) -> Result<BratDocument> {
        let mut doc = BratDocument::new(document_id, text);

        for file in files {
            if !self.options.annotation_suffixes.contains(&file.suffix) {
                log::debug!(
                    "{}: ignoring annotation file {} (suffix {} not configured)",
                    doc.document_id,
                    file.name,
                    file.suffix
                );
            }
        }

        for suffix in &self.options.annotation_suffixes {
            for file in files.iter().filter(|f| &f.suffix == suffix) {
                self.parse_lines(&mut doc, &file.name, &file.content)?;
            }
        }
        number_equivalences(&mut doc.equivalences);

        log::debug!(
            "{}: parsed {} text-bound, {} events, {} relations, {} equivalences, {} attributes, {} normalizations, {} notes",
            doc.document_id,
            doc.text_bound_annotations.len(),
            doc.events.len(),
            doc.relations.len(),
            doc.equivalences.len(),
            doc.attributes.len(),
            doc.normalizations.len(),
            doc.notes.len()
        );
        Ok(doc)
    }

    /// Parse a document whose annotations are given as one string.
    ///
    /// # Errors
    ///
    /// `Error::MalformedAnnotation` for the first line that does not parse.
    pub fn parse_str(
        &self,
        document_id: impl Into<String>,
        text: impl Into<String>,
        annotations: &str,
    ) -> Result<BratDocument> {
        let mut doc = BratDocument::new(document_id, text);
        self.parse_lines(&mut doc, INLINE_SOURCE, annotations)?;
        number_equivalences(&mut doc.equivalences);
        Ok(doc)
    }

    fn parse_lines(&self, doc: &mut BratDocument, file: &str, content: &str) -> Result<()> {
        for (idx, raw) in content.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() {
                continue;
            }
            if line.starts_with('#') && !self.options.parse_notes {
                log::trace!("{}: skipping note at {}:{}", doc.document_id, file, idx + 1);
                continue;
            }

            match Annotation::parse_line(line, file, idx + 1)? {
                Annotation::TextBound(t) => doc.text_bound_annotations.push(t),
                Annotation::Event(e) => doc.events.push(e),
                Annotation::Relation(r) => doc.relations.push(r),
                Annotation::Equivalence(eq) => doc.equivalences.push(eq),
                Annotation::Attribute(a) | Annotation::Modifier(a) => doc.attributes.push(a),
                Annotation::Normalization(n) => doc.normalizations.push(n),
                Annotation::Note(n) => doc.notes.push(n),
            }
        }
        Ok(())
    }
}

/// Give every bare `*` group the lowest `*<n>` not used by another group.
fn number_equivalences(equivalences: &mut [Equivalence]) {
    let mut used: HashSet<String> = equivalences
        .iter()
        .filter(|eq| eq.id != "*")
        .map(|eq| eq.id.clone())
        .collect();
    let mut next = 1usize;
    for eq in equivalences.iter_mut().filter(|eq| eq.id == "*") {
        let id = loop {
            let candidate = format!("*{next}");
            next += 1;
            if !used.contains(&candidate) {
                break candidate;
            }
        };
        used.insert(id.clone());
        eq.id = id;
    }
}
