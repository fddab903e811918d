//! Content documents on disk
//!
//! This module handles:
//! - Discovering and reading the XML documents under a content root
//! - Parsing them into read-only trees for indexing
//! - Removing definitions by splicing their byte ranges out of the source
//!   text, so comments and formatting elsewhere survive untouched
//! - Backing up and persisting modified documents

mod editor;
mod error;
mod locking;
mod source;

pub use editor::{DefinitionLocation, DocumentEditor, LocationMap, PersistFailure, PersistReport};
pub use error::DocumentError;
pub use source::{FileId, ParsedCorpus, ParsedDocument, SkippedDocument, SourceFile, SourceSet};
