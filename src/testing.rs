//! Shared helpers for unit tests

use std::path::Path;

use crate::config::Config;
use crate::document::SourceSet;
use crate::extract::ReferenceGraph;
use crate::index::EntityIndex;

/// In-memory documents named `/content/0.xml`, `/content/1.xml`, ...
pub(crate) fn sources(docs: &[&str]) -> SourceSet {
    SourceSet::from_texts(
        Path::new("/content"),
        docs.iter()
            .enumerate()
            .map(|(i, text)| (format!("/content/{i}.xml"), *text)),
    )
}

/// Index and extract `docs` with the default schema
pub(crate) fn analyze(docs: &[&str]) -> (EntityIndex, ReferenceGraph) {
    let set = sources(docs);
    let corpus = set.parse();
    let schema = Config::default().schema().unwrap();
    let index = EntityIndex::build(&corpus, &schema);
    let graph = ReferenceGraph::extract(&corpus, &index, &schema);
    (index, graph)
}
