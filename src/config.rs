//! Parser, projector and corpus configuration.
//!
//! Per-corpus quirks are supplied here rather than detected: which
//! annotation files to read, whether to keep annotator notes, and which
//! text-bound types are entities (everything else is an event trigger).
//!
//! A corpus config can be kept next to the data as TOML:
//!
//! ```toml
//! entity_types = ["Protein", "Entity"]
//! annotation_suffixes = [".a1", ".a2"]
//! parse_notes = false
//! passage_type = "abstract"
//! ```

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;

/// Annotation file suffixes read when none are configured.
pub const DEFAULT_ANNOTATION_SUFFIXES: [&str; 3] = [".a1", ".a2", ".ann"];

/// Passage type used when none is configured.
pub const DEFAULT_PASSAGE_TYPE: &str = "abstract";

/// Options controlling the standoff parser.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseOptions {
    /// Annotation file suffixes, in the order their lines are concatenated.
    pub annotation_suffixes: Vec<String>,
    /// Parse `#` note lines instead of skipping them.
    pub parse_notes: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            annotation_suffixes: DEFAULT_ANNOTATION_SUFFIXES
                .iter()
                .map(|s| (*s).to_string())
                .collect(),
            parse_notes: false,
        }
    }
}

impl ParseOptions {
    /// Default options (`.a1`, `.a2`, `.ann`; notes skipped).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the annotation suffix list.
    #[must_use]
    pub fn with_suffixes<I, S>(mut self, suffixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.annotation_suffixes = suffixes.into_iter().map(Into::into).collect();
        self
    }

    /// Enable or disable note parsing.
    #[must_use]
    pub fn with_notes(mut self, parse_notes: bool) -> Self {
        self.parse_notes = parse_notes;
        self
    }

    /// Check the options.
    ///
    /// # Errors
    ///
    /// `Error::Config` if the suffix list is empty, or a suffix is not of the
    /// form `.<ext>`.
    pub fn validate(&self) -> Result<()> {
        if self.annotation_suffixes.is_empty() {
            return Err(Error::config(
                "at least one annotation file suffix must be given",
            ));
        }
        for suffix in &self.annotation_suffixes {
            if suffix.len() < 2 || !suffix.starts_with('.') {
                return Err(Error::config(format!(
                    "invalid annotation file suffix {suffix:?}: expected '.<ext>'"
                )));
            }
        }
        Ok(())
    }
}

/// Frozen set of type names that denote entities in a corpus.
///
/// Text-bound annotations with any other type are treated as event triggers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityTypes(BTreeSet<String>);

impl EntityTypes {
    /// Create a set from type names.
    #[must_use]
    pub fn new<I, S>(types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(types.into_iter().map(Into::into).collect())
    }

    /// True if `annotation_type` is an entity type.
    #[must_use]
    pub fn contains(&self, annotation_type: &str) -> bool {
        self.0.contains(annotation_type)
    }

    /// Number of entity types.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True if no entity types are configured (every text-bound is a trigger).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate the type names in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for EntityTypes {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::new(iter)
    }
}

/// Options controlling the KB projector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectorConfig {
    /// Entity type set of the corpus.
    pub entity_types: EntityTypes,
    /// Type recorded on the whole-document passage.
    pub passage_type: String,
}

impl ProjectorConfig {
    /// Create a config with the default passage type.
    #[must_use]
    pub fn new(entity_types: EntityTypes) -> Self {
        Self {
            entity_types,
            passage_type: DEFAULT_PASSAGE_TYPE.to_string(),
        }
    }

    /// Override the passage type.
    #[must_use]
    pub fn with_passage_type(mut self, passage_type: impl Into<String>) -> Self {
        self.passage_type = passage_type.into();
        self
    }
}

/// Complete per-corpus configuration, as stored in a TOML file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CorpusConfig {
    /// Entity type names.
    #[serde(default)]
    pub entity_types: EntityTypes,
    /// Annotation file suffixes, in concatenation order.
    #[serde(default = "default_suffixes")]
    pub annotation_suffixes: Vec<String>,
    /// Parse `#` note lines.
    #[serde(default)]
    pub parse_notes: bool,
    /// Passage type for projected documents.
    #[serde(default = "default_passage_type")]
    pub passage_type: String,
}

fn default_suffixes() -> Vec<String> {
    ParseOptions::default().annotation_suffixes
}

fn default_passage_type() -> String {
    DEFAULT_PASSAGE_TYPE.to_string()
}

impl Default for CorpusConfig {
    fn default() -> Self {
        Self {
            entity_types: EntityTypes::default(),
            annotation_suffixes: default_suffixes(),
            parse_notes: false,
            passage_type: default_passage_type(),
        }
    }
}

impl CorpusConfig {
    /// Parse a config from TOML text.
    ///
    /// # Errors
    ///
    /// `Error::Config` on invalid TOML, unknown keys, or invalid parse options.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)
            .map_err(|e| Error::config(format!("invalid corpus config: {e}")))?;
        config.parse_options().validate()?;
        Ok(config)
    }

    /// Load a config from a TOML file.
    ///
    /// # Errors
    ///
    /// `Error::Config` if the file cannot be read or parsed.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::config(format!("failed to read {}: {e}", path.display())))?;
        Self::from_toml_str(&content)
    }

    /// Serialize the config as TOML.
    ///
    /// # Errors
    ///
    /// `Error::Config` if serialization fails.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string(self).map_err(|e| Error::config(format!("failed to serialize config: {e}")))
    }

    /// Parser options of this corpus.
    #[must_use]
    pub fn parse_options(&self) -> ParseOptions {
        ParseOptions {
            annotation_suffixes: self.annotation_suffixes.clone(),
            parse_notes: self.parse_notes,
        }
    }

    /// Projector options of this corpus.
    #[must_use]
    pub fn projector_config(&self) -> ProjectorConfig {
        ProjectorConfig::new(self.entity_types.clone()).with_passage_type(&self.passage_type)
    }
}
