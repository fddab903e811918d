//! Entity index: every definition of every id, grouped by kind
//!
//! An id may be defined in several documents (mods commonly redefine
//! vanilla entities). The index keeps all of them; it never chooses one.

mod kind;


pub use kind::EntityKind;

use std::collections::BTreeMap;
use std::ops::Range;
use tracing::info;

use crate::config::Schema;
use crate::document::{DefinitionLocation, FileId, LocationMap, ParsedCorpus};
use kind::PerKind;

/// Handle to one defining element
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Definition {
    pub file: FileId,
    pub node: roxmltree::NodeId,
    pub range: Range<usize>,
}

impl Definition {
    pub fn location(&self) -> DefinitionLocation {
        DefinitionLocation {
            file: self.file,
            range: self.range.clone(),
        }
    }
}

#[derive(Debug, Default)]
pub struct EntityIndex {
    buckets: PerKind<BTreeMap<String, Vec<Definition>>>,
}

impl EntityIndex {
    /// Index every element below each document's root whose tag defines an
    /// entity kind. The id is the trimmed id attribute; elements without
    /// one are ignored. The root element itself is never a definition,
    /// since removing it would leave no document behind.
    pub fn build(corpus: &ParsedCorpus<'_>, schema: &Schema) -> Self {
        let mut index = Self::default();

        for doc in corpus.documents() {
            let root = doc.tree().root_element();
            for node in root.descendants().skip(1).filter(|n| n.is_element()) {
                let Some(kind) = schema.kind_of(node.tag_name().name()) else {
                    continue;
                };
                let id = node
                    .attribute(schema.id_attribute.as_str())
                    .map(str::trim)
                    .unwrap_or_default();
                if id.is_empty() {
                    continue;
                }

                index
                    .buckets
                    .get_mut(kind)
                    .entry(id.to_string())
                    .or_default()
                    .push(Definition {
                        file: doc.file(),
                        node: node.id(),
                        range: doc.source_range(node),
                    });
            }
        }

        info!(
            diagnoses = index.len(EntityKind::Diagnosis),
            symptoms = index.len(EntityKind::Symptom),
            examinations = index.len(EntityKind::Examination),
            treatments = index.len(EntityKind::Treatment),
            "Indexed entities"
        );

        index
    }

    /// All definitions of `id`, in scan order; empty when undefined
    pub fn definitions(&self, kind: EntityKind, id: &str) -> &[Definition] {
        self.buckets
            .get(kind)
            .get(id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn contains(&self, kind: EntityKind, id: &str) -> bool {
        self.buckets.get(kind).contains_key(id)
    }

    /// Defined ids of `kind`, sorted
    pub fn ids(&self, kind: EntityKind) -> impl Iterator<Item = &str> {
        self.buckets.get(kind).keys().map(String::as_str)
    }

    /// Defined ids of `kind` with their definitions, sorted by id
    pub fn entries(&self, kind: EntityKind) -> impl Iterator<Item = (&str, &[Definition])> {
        self.buckets
            .get(kind)
            .iter()
            .map(|(id, defs)| (id.as_str(), defs.as_slice()))
    }

    /// Number of distinct ids defined for `kind`
    pub fn len(&self, kind: EntityKind) -> usize {
        self.buckets.get(kind).len()
    }

    /// Total number of definitions for `kind`, counting duplicates
    pub fn definition_count(&self, kind: EntityKind) -> usize {
        self.buckets.get(kind).values().map(Vec::len).sum()
    }

    /// Ids of `kind` defined more than once, with their definition counts
    pub fn duplicates(&self, kind: EntityKind) -> Vec<(&str, usize)> {
        self.entries(kind)
            .filter(|(_, defs)| defs.len() > 1)
            .map(|(id, defs)| (id, defs.len()))
            .collect()
    }

    /// Owned copy of every definition location, for use once the parsed
    /// corpus is gone
    pub fn locations(&self) -> LocationMap {
        let mut map = LocationMap::new();
        for kind in EntityKind::ALL {
            for (id, defs) in self.entries(kind) {
                map.insert(
                    (kind, id.to_string()),
                    defs.iter().map(Definition::location).collect(),
                );
            }
        }
        map
    }
}
