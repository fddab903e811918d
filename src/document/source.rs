//! Document discovery, reading and parsing

use serde::Serialize;
use std::fs;
use std::ops::Range;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use super::error::DocumentError;

const BOM: char = '\u{feff}';

/// Position of a document within its [`SourceSet`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FileId(usize);

impl FileId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// A document's path and its exact original text
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub path: PathBuf,
    pub text: String,
}

/// A document left out of the corpus, with the reason
#[derive(Debug, Clone, Serialize)]
pub struct SkippedDocument {
    pub path: PathBuf,
    pub reason: String,
}

/// All documents found under a content root, in scan order
#[derive(Debug, Default)]
pub struct SourceSet {
    root: PathBuf,
    files: Vec<SourceFile>,
    unreadable: Vec<SkippedDocument>,
}

impl SourceSet {
    /// Recursively collect the documents matching `include` under `root`.
    ///
    /// Files are ordered by their lowercased path. A file that cannot be read
    /// (I/O error, invalid UTF-8) is skipped with a warning; only a missing
    /// root or a malformed pattern fails the scan.
    pub fn scan(root: &Path, include: &str) -> Result<Self, DocumentError> {
        if !root.is_dir() {
            return Err(DocumentError::RootNotFound(root.to_path_buf()));
        }

        let pattern = format!(
            "{}/{}",
            glob::Pattern::escape(&root.to_string_lossy()),
            include.trim_start_matches('/')
        );
        let entries = glob::glob(&pattern).map_err(|source| DocumentError::Pattern {
            pattern: include.to_string(),
            source,
        })?;

        let mut paths: Vec<PathBuf> = entries
            .filter_map(|entry| match entry {
                Ok(path) => Some(path),
                Err(e) => {
                    warn!("Skipping unreadable path {}: {e}", e.path().display());
                    None
                }
            })
            .filter(|path| path.is_file())
            .collect();
        paths.sort_by_cached_key(|path| path.to_string_lossy().to_lowercase());

        let mut set = Self {
            root: root.to_path_buf(),
            ..Self::default()
        };

        for path in paths {
            match read_source(&path) {
                Ok(text) => set.files.push(SourceFile { path, text }),
                Err(err) => {
                    warn!("{err}; skipping");
                    set.unreadable.push(SkippedDocument {
                        reason: err.to_string(),
                        path,
                    });
                }
            }
        }

        info!(
            root = %root.display(),
            files = set.files.len(),
            unreadable = set.unreadable.len(),
            "Scanned content root"
        );

        Ok(set)
    }

    /// Build a set from in-memory documents, kept in the given order
    pub fn from_texts<I, P, S>(root: &Path, documents: I) -> Self
    where
        I: IntoIterator<Item = (P, S)>,
        P: Into<PathBuf>,
        S: Into<String>,
    {
        Self {
            root: root.to_path_buf(),
            files: documents
                .into_iter()
                .map(|(path, text)| SourceFile {
                    path: path.into(),
                    text: text.into(),
                })
                .collect(),
            unreadable: Vec::new(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn files(&self) -> &[SourceFile] {
        &self.files
    }

    pub fn file(&self, id: FileId) -> Option<&SourceFile> {
        self.files.get(id.0)
    }

    pub fn file_ids(&self) -> impl Iterator<Item = FileId> {
        (0..self.files.len()).map(FileId)
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Files found by the scan but not readable as text
    pub fn unreadable(&self) -> &[SkippedDocument] {
        &self.unreadable
    }

    /// Parse every document; documents that fail to parse are skipped with
    /// a warning and never contribute entities.
    pub fn parse(&self) -> ParsedCorpus<'_> {
        let mut documents = Vec::with_capacity(self.files.len());
        let mut skipped = Vec::new();

        for (index, file) in self.files.iter().enumerate() {
            let (text, offset) = match file.text.strip_prefix(BOM) {
                Some(rest) => (rest, BOM.len_utf8()),
                None => (file.text.as_str(), 0),
            };

            match roxmltree::Document::parse_with_options(text, parsing_options()) {
                Ok(tree) => {
                    debug!(path = %file.path.display(), "Parsed document");
                    documents.push(ParsedDocument {
                        file: FileId(index),
                        offset,
                        tree,
                    });
                }
                Err(source) => {
                    let err = DocumentError::Parse {
                        path: file.path.clone(),
                        source,
                    };
                    warn!("{err}; skipping");
                    skipped.push(SkippedDocument {
                        path: file.path.clone(),
                        reason: err.to_string(),
                    });
                }
            }
        }

        ParsedCorpus { documents, skipped }
    }
}

fn read_source(path: &Path) -> Result<String, DocumentError> {
    let bytes = fs::read(path).map_err(|source| DocumentError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    String::from_utf8(bytes).map_err(|_| DocumentError::Encoding {
        path: path.to_path_buf(),
    })
}

fn parsing_options<'input>() -> roxmltree::ParsingOptions<'input> {
    roxmltree::ParsingOptions {
        allow_dtd: true,
        ..roxmltree::ParsingOptions::default()
    }
}

/// A successfully parsed document
pub struct ParsedDocument<'input> {
    file: FileId,
    /// Bytes stripped from the front of the source before parsing (BOM)
    offset: usize,
    tree: roxmltree::Document<'input>,
}

impl<'input> ParsedDocument<'input> {
    pub fn file(&self) -> FileId {
        self.file
    }

    pub fn tree(&self) -> &roxmltree::Document<'input> {
        &self.tree
    }

    /// Byte range of `node` within the original file text
    pub fn source_range(&self, node: roxmltree::Node<'_, 'input>) -> Range<usize> {
        let range = node.range();
        range.start + self.offset..range.end + self.offset
    }
}

/// The parsed view of a [`SourceSet`]
pub struct ParsedCorpus<'input> {
    documents: Vec<ParsedDocument<'input>>,
    skipped: Vec<SkippedDocument>,
}

impl<'input> ParsedCorpus<'input> {
    pub fn documents(&self) -> &[ParsedDocument<'input>] {
        &self.documents
    }

    /// The parsed document for `file`, unless it failed to parse
    pub fn document(&self, file: FileId) -> Option<&ParsedDocument<'input>> {
        self.documents
            .binary_search_by_key(&file, |doc| doc.file)
            .ok()
            .map(|i| &self.documents[i])
    }

    /// Resolve a node handle taken from the document for `file`
    pub fn node(
        &self,
        file: FileId,
        node: roxmltree::NodeId,
    ) -> Option<roxmltree::Node<'_, 'input>> {
        self.document(file)?.tree.get_node(node)
    }

    /// Documents that failed to parse
    pub fn skipped(&self) -> &[SkippedDocument] {
        &self.skipped
    }
}
