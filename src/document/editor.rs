//! Definition removal and persistence
//!
//! Removal never re-serializes a tree. Each definition's byte range is cut
//! out of the original text, so every other byte of the document (comments,
//! indentation, attribute quoting, entity spelling) is written back as read.

use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::ops::Range;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use super::error::DocumentError;
use super::locking::locked_write;
use super::source::{FileId, SourceSet};
use crate::index::EntityKind;
use crate::prune::DefinitionStore;

/// Where one definition lives: its document and byte range in that
/// document's original text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefinitionLocation {
    pub file: FileId,
    pub range: Range<usize>,
}

/// Every definition location, keyed by entity kind and id
pub type LocationMap = HashMap<(EntityKind, String), Vec<DefinitionLocation>>;

/// A document that could not be persisted
#[derive(Debug, Clone, Serialize)]
pub struct PersistFailure {
    pub path: PathBuf,
    pub error: String,
}

/// Outcome of [`DocumentEditor::persist`]
#[derive(Debug, Clone, Default, Serialize)]
pub struct PersistReport {
    pub written: Vec<PathBuf>,
    pub backed_up: Vec<PathBuf>,
    pub failed: Vec<PersistFailure>,
}

impl PersistReport {
    pub fn has_failures(&self) -> bool {
        !self.failed.is_empty()
    }
}

/// Document-mutation collaborator for the pruner.
///
/// Owns the source texts and the location of every definition; collects
/// removal requests and applies them all at [`persist`](Self::persist).
pub struct DocumentEditor {
    sources: SourceSet,
    locations: LocationMap,
    pending: BTreeMap<FileId, Vec<Range<usize>>>,
}

impl DocumentEditor {
    pub fn new(sources: SourceSet, locations: LocationMap) -> Self {
        Self {
            sources,
            locations,
            pending: BTreeMap::new(),
        }
    }

    /// Number of documents with at least one pending removal
    pub fn modified_documents(&self) -> usize {
        self.pending.len()
    }

    /// Text of `file` with its pending removals applied, or `None` when the
    /// document is unchanged or unknown
    pub fn render(&self, file: FileId) -> Option<String> {
        let ranges = self.pending.get(&file)?;
        let source = self.sources.file(file)?;
        Some(splice_out(&source.text, ranges))
    }

    /// Definitions not scheduled for removal that lie inside a pending
    /// removal range, and so would be deleted along with it. Sorted by kind
    /// then id.
    pub fn enclosed_definitions(&self) -> Vec<(EntityKind, &str, &Path)> {
        let mut enclosed: Vec<(EntityKind, &str, &Path)> = Vec::new();

        for ((kind, id), locations) in &self.locations {
            for location in locations {
                let Some(ranges) = self.pending.get(&location.file) else {
                    continue;
                };
                let inside = ranges.iter().any(|range| {
                    range.start <= location.range.start && location.range.end <= range.end
                });
                if inside {
                    if let Some(source) = self.sources.file(location.file) {
                        enclosed.push((*kind, id.as_str(), source.path.as_path()));
                    }
                }
            }
        }

        enclosed.sort();
        enclosed
    }

    /// Write every modified document back to disk.
    ///
    /// With a `backup_suffix`, the original bytes are first copied to
    /// `<file><suffix>`; a failed backup is logged and the write still goes
    /// ahead. A failed write is logged and recorded, and the remaining
    /// documents are still written. Nothing is rolled back.
    pub fn persist(&self, backup_suffix: Option<&str>) -> PersistReport {
        let mut report = PersistReport::default();

        for (kind, id, path) in self.enclosed_definitions() {
            warn!(
                "{kind} {id} in {} is kept but nested inside a removed definition; it will be deleted with it",
                path.display()
            );
        }

        for &file in self.pending.keys() {
            let (Some(source), Some(rendered)) = (self.sources.file(file), self.render(file))
            else {
                continue;
            };
            let path = &source.path;

            if let Some(suffix) = backup_suffix {
                match write_backup(path, suffix, &source.text) {
                    Ok(backup_path) => report.backed_up.push(backup_path),
                    Err(err) => warn!("{err}"),
                }
            }

            match locked_write(path, rendered.as_bytes()) {
                Ok(()) => {
                    debug!(path = %path.display(), "Wrote document");
                    report.written.push(path.clone());
                }
                Err(source) => {
                    let err = DocumentError::Write {
                        path: path.clone(),
                        source,
                    };
                    warn!("{err}");
                    report.failed.push(PersistFailure {
                        path: path.clone(),
                        error: err.to_string(),
                    });
                }
            }
        }

        info!(
            written = report.written.len(),
            backed_up = report.backed_up.len(),
            failed = report.failed.len(),
            "Persisted documents"
        );

        report
    }
}

impl DefinitionStore for DocumentEditor {
    fn remove_all_definitions(&mut self, kind: EntityKind, id: &str) -> usize {
        let Some(locations) = self.locations.remove(&(kind, id.to_string())) else {
            return 0;
        };

        let removed = locations.len();
        for location in locations {
            self.pending
                .entry(location.file)
                .or_default()
                .push(location.range);
        }
        removed
    }
}

fn write_backup(path: &Path, suffix: &str, original: &str) -> Result<PathBuf, DocumentError> {
    let mut name = path.as_os_str().to_owned();
    name.push(suffix);
    let backup_path = PathBuf::from(name);

    fs::write(&backup_path, original).map_err(|source| DocumentError::Backup {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(backup_path)
}

/// Remove `ranges` from `text`.
///
/// Ranges that overlap (a definition nested inside another) or are
/// separated only by spaces and tabs are merged first. A merged span
/// standing alone on its lines then takes its leading indentation and line
/// break with it, so no blank line is left behind.
pub(crate) fn splice_out(text: &str, ranges: &[Range<usize>]) -> String {
    let mut spans: Vec<Range<usize>> = ranges
        .iter()
        .filter(|r| r.start < r.end && r.end <= text.len())
        .cloned()
        .collect();
    spans.sort_by_key(|r| (r.start, r.end));

    let mut merged: Vec<Range<usize>> = Vec::with_capacity(spans.len());
    for span in spans {
        match merged.last_mut() {
            Some(last) if span.start <= last.end || is_blank(&text[last.end..span.start]) => {
                last.end = last.end.max(span.end)
            }
            _ => merged.push(span),
        }
    }

    let mut out = String::with_capacity(text.len());
    let mut cursor = 0;
    for span in merged.into_iter().map(|span| widen_to_lines(text, span)) {
        if span.start > cursor {
            out.push_str(&text[cursor..span.start]);
        }
        cursor = cursor.max(span.end);
    }
    out.push_str(&text[cursor..]);
    out
}

fn is_blank(s: &str) -> bool {
    s.chars().all(|c| c == ' ' || c == '\t')
}

fn widen_to_lines(text: &str, range: Range<usize>) -> Range<usize> {
    let line_start = text[..range.start].rfind('\n').map_or(0, |i| i + 1);
    let line_end = text[range.end..]
        .find('\n')
        .map_or(text.len(), |i| range.end + i + 1);

    let leading = &text[line_start..range.start];
    let trailing = text[range.end..line_end].trim_end_matches(['\r', '\n']);

    if is_blank(leading) && is_blank(trailing) {
        line_start..line_end
    } else {
        range
    }
}
