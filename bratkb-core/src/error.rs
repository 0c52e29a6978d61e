//! Error types for bratkb-core.

use thiserror::Error;

/// Result type for bratkb operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for bratkb operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// Invalid caller configuration (e.g. an empty annotation suffix list).
    #[error("Config error: {0}")]
    Config(String),

    /// An annotation line does not match the grammar of its record kind.
    #[error("Malformed annotation at {file}:{line}: {reason} (line: {content:?})")]
    MalformedAnnotation {
        /// Annotation file the line came from (file name or suffix).
        file: String,
        /// 1-based line number within that file.
        line: usize,
        /// The offending line, trimmed.
        content: String,
        /// What was wrong with it.
        reason: String,
    },

    /// A reference does not resolve to a known id within the same document.
    #[error("Dangling reference in document {document_id}: {referrer} -> {ref_id}")]
    DanglingReference {
        /// Document the reference was found in.
        document_id: String,
        /// Id of the record holding the reference.
        referrer: String,
        /// The id that could not be resolved.
        ref_id: String,
    },

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a configuration error.
    #[must_use]
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a malformed annotation error.
    #[must_use]
    pub fn malformed(
        file: impl Into<String>,
        line: usize,
        content: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::MalformedAnnotation {
            file: file.into(),
            line,
            content: content.into(),
            reason: reason.into(),
        }
    }

    /// Create a dangling reference error.
    #[must_use]
    pub fn dangling(
        document_id: impl Into<String>,
        referrer: impl Into<String>,
        ref_id: impl Into<String>,
    ) -> Self {
        Self::DanglingReference {
            document_id: document_id.into(),
            referrer: referrer.into(),
            ref_id: ref_id.into(),
        }
    }

    /// True for errors that only concern the current document.
    ///
    /// Batch code uses this to decide between skip-and-continue and abort.
    #[must_use]
    pub fn is_document_local(&self) -> bool {
        matches!(
            self,
            Self::MalformedAnnotation { .. } | Self::DanglingReference { .. } | Self::Io(_)
        )
    }
}
