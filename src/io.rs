//! File-backed document loading and batch conversion.
//!
//! A brat corpus is a directory of `<id>.txt` files with sibling annotation
//! files sharing the stem (`<id>.a1`, `<id>.a2`, `<id>.ann`). The parser and
//! projector never touch the filesystem; this module does.

use crate::parse::{AnnotationFile, StandoffParser};
use crate::project::{KbProjector, Projection};
use crate::{BratDocument, Error, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Outcome of converting one document in a batch.
#[derive(Debug)]
pub struct Converted {
    /// Text file the document was read from.
    pub path: PathBuf,
    /// Projection, or the error that stopped this document.
    pub result: Result<Projection>,
}

/// Document id for a text file: its stem.
///
/// # Errors
///
/// `Error::Config` if the path has no UTF-8 file stem.
pub fn document_id(txt_path: &Path) -> Result<String> {
    txt_path
        .file_stem()
        .and_then(|s| s.to_str())
        .map(str::to_string)
        .ok_or_else(|| Error::config(format!("no document id in path {}", txt_path.display())))
}

/// Annotation files next to `txt_path`, one per configured suffix that exists.
///
/// # Errors
///
/// `Error::Io` if an existing annotation file cannot be read.
pub fn annotation_files(txt_path: &Path, parser: &StandoffParser) -> Result<Vec<AnnotationFile>> {
    let id = document_id(txt_path)?;
    let dir = txt_path.parent().unwrap_or_else(|| Path::new(""));

    let mut files = Vec::new();
    for suffix in &parser.options().annotation_suffixes {
        let path = dir.join(format!("{id}{suffix}"));
        if !path.is_file() {
            log::trace!("{id}: no {suffix} file");
            continue;
        }
        let content = fs::read_to_string(&path)?;
        files.push(AnnotationFile::new(suffix, content).with_name(path.display().to_string()));
    }
    Ok(files)
}

/// Read and parse the document whose text is at `txt_path`.
///
/// # Errors
///
/// `Error::Io` if a file cannot be read, `Error::MalformedAnnotation` if an
/// annotation line does not parse.
pub fn read_document(txt_path: impl AsRef<Path>, parser: &StandoffParser) -> Result<BratDocument> {
    let txt_path = txt_path.as_ref();
    let id = document_id(txt_path)?;
    let text = fs::read_to_string(txt_path)?;
    let files = annotation_files(txt_path, parser)?;
    if files.is_empty() {
        log::debug!("{id}: no annotation files found");
    }
    parser.parse(id, text, &files)
}

/// List the `*.txt` files of `dir` (not recursive), sorted by path.
///
/// # Errors
///
/// `Error::Io` if the directory cannot be read.
pub fn discover_documents(dir: impl AsRef<Path>) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();
    for entry in fs::read_dir(dir.as_ref())? {
        let path = entry?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "txt") {
            paths.push(path);
        }
    }
    paths.sort();
    Ok(paths)
}

/// Expand directories into their documents; other paths are kept as given.
///
/// # Errors
///
/// `Error::Io` if a directory cannot be read.
pub fn expand_paths<P: AsRef<Path>>(paths: &[P]) -> Result<Vec<PathBuf>> {
    let mut out = Vec::new();
    for path in paths {
        let path = path.as_ref();
        if path.is_dir() {
            out.extend(discover_documents(path)?);
        } else {
            out.push(path.to_path_buf());
        }
    }
    Ok(out)
}

fn convert_one(path: &Path, parser: &StandoffParser, projector: &KbProjector) -> Converted {
    let result = read_document(path, parser).map(|doc| projector.project_with_diagnostics(&doc));
    if let Err(e) = &result {
        log::debug!("{}: {}", path.display(), e);
    }
    Converted {
        path: path.to_path_buf(),
        result,
    }
}

/// Parse and project every document, independently.
///
/// A document that fails never stops the others. Results are in input order.
/// With the `parallel` feature documents are processed on the rayon pool.
#[must_use]
pub fn convert_paths<P>(paths: &[P], parser: &StandoffParser, projector: &KbProjector) -> Vec<Converted>
where
    P: AsRef<Path> + Sync,
{
    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;

        paths
            .par_iter()
            .map(|p| convert_one(p.as_ref(), parser, projector))
            .collect()
    }

    #[cfg(not(feature = "parallel"))]
    {
        paths
            .iter()
            .map(|p| convert_one(p.as_ref(), parser, projector))
            .collect()
    }
}
