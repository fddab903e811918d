//! Reference extraction
//!
//! Turns the indexed definitions into an immutable, id-interned reference
//! graph. The graph is built once per run; the closure engine only ever
//! reads it.
//!
//! Merge policy: when an id is defined more than once, the references of
//! *all* its definitions are unioned, so the result does not depend on
//! file or definition order. This deliberately differs from the
//! "keep the last definition" policy of duplicate-id cleanup; the two
//! must stay independent.

mod arena;
mod edges;


pub use arena::{IdArena, NodeId};
pub use edges::{Adjacency, DirectedEdges, GuardedEdges, UndirectedEdges};

use roxmltree::Node;
use std::collections::BTreeSet;
use tracing::debug;

use crate::config::{RefPath, Schema};
use crate::document::ParsedCorpus;
use crate::index::{Definition, EntityIndex, EntityKind};

/// Ids referenced directly by diagnoses; the starting point of the closure
#[derive(Debug, Clone, Default)]
pub struct Seeds {
    pub symptoms: BTreeSet<NodeId>,
    pub examinations: BTreeSet<NodeId>,
    pub treatments: BTreeSet<NodeId>,
}

#[derive(Debug, Clone, Default)]
pub struct ReferenceGraph {
    symptoms: IdArena,
    examinations: IdArena,
    treatments: IdArena,
    seeds: Seeds,
    collapse: DirectedEdges,
    symptom_examinations: Adjacency,
    symptom_treatments: Adjacency,
    lab_peers: UndirectedEdges,
    complications: GuardedEdges,
}

impl ReferenceGraph {
    pub fn extract(corpus: &ParsedCorpus<'_>, index: &EntityIndex, schema: &Schema) -> Self {
        let mut graph = Self::default();

        for (_, defs) in index.entries(EntityKind::Diagnosis) {
            for node in resolve(corpus, defs) {
                for id in select_texts(node, &schema.diagnosis_symptoms) {
                    let target = graph.symptoms.intern(&id);
                    graph.seeds.symptoms.insert(target);
                }
                for id in select_texts(node, &schema.diagnosis_examinations) {
                    let target = graph.examinations.intern(&id);
                    graph.seeds.examinations.insert(target);
                }
                for id in select_texts(node, &schema.diagnosis_treatments) {
                    let target = graph.treatments.intern(&id);
                    graph.seeds.treatments.insert(target);
                }
            }
        }

        for (id, defs) in index.entries(EntityKind::Symptom) {
            let symptom = graph.symptoms.intern(id);
            for node in resolve(corpus, defs) {
                for exam in select_texts(node, &schema.symptom_examinations) {
                    let target = graph.examinations.intern(&exam);
                    graph.symptom_examinations.insert(symptom, target);
                }
                for treatment in select_texts(node, &schema.symptom_treatments) {
                    let target = graph.treatments.intern(&treatment);
                    graph.symptom_treatments.insert(symptom, target);
                }
                for collapsed in select_texts(node, &schema.symptom_collapse) {
                    let target = graph.symptoms.intern(&collapsed);
                    graph.collapse.link(symptom, target);
                }
            }
        }

        for (id, defs) in index.entries(EntityKind::Examination) {
            let exam = graph.examinations.intern(id);
            for node in resolve(corpus, defs) {
                for peer in select_texts(node, &schema.examination_lab_peers) {
                    let peer = graph.examinations.intern(&peer);
                    graph.lab_peers.connect(exam, peer);
                }
            }
        }

        let surgery = schema.surgery_type.to_uppercase();
        for (id, defs) in index.entries(EntityKind::Treatment) {
            let treatment = graph.treatments.intern(id);
            for node in resolve(corpus, defs) {
                if select_texts(node, &schema.treatment_type)
                    .iter()
                    .any(|value| value.to_uppercase() == surgery)
                {
                    graph.complications.guard(treatment);
                }
                for symptom in select_texts(node, &schema.treatment_complications) {
                    let target = graph.symptoms.intern(&symptom);
                    graph.complications.link(treatment, target);
                }
            }
        }

        graph.collapse.seal();
        graph.symptom_examinations.seal();
        graph.symptom_treatments.seal();
        graph.lab_peers.seal();
        graph.complications.seal();

        debug!(
            symptoms = graph.symptoms.len(),
            examinations = graph.examinations.len(),
            treatments = graph.treatments.len(),
            collapse_edges = graph.collapse.edge_count(),
            lab_links = graph.lab_peers.link_count(),
            "Extracted reference graph"
        );

        graph
    }

    pub fn arena(&self, kind: EntityKind) -> Option<&IdArena> {
        match kind {
            EntityKind::Diagnosis => None,
            EntityKind::Symptom => Some(&self.symptoms),
            EntityKind::Examination => Some(&self.examinations),
            EntityKind::Treatment => Some(&self.treatments),
        }
    }

    pub fn symptoms(&self) -> &IdArena {
        &self.symptoms
    }

    pub fn examinations(&self) -> &IdArena {
        &self.examinations
    }

    pub fn treatments(&self) -> &IdArena {
        &self.treatments
    }

    pub fn seeds(&self) -> &Seeds {
        &self.seeds
    }

    pub fn collapse(&self) -> &DirectedEdges {
        &self.collapse
    }

    pub fn symptom_examinations(&self) -> &Adjacency {
        &self.symptom_examinations
    }

    pub fn symptom_treatments(&self) -> &Adjacency {
        &self.symptom_treatments
    }

    pub fn lab_peers(&self) -> &UndirectedEdges {
        &self.lab_peers
    }

    pub fn complications(&self) -> &GuardedEdges {
        &self.complications
    }

    /// Ids of `kind` that are referenced somewhere but never defined, sorted
    pub fn dangling<'g>(&'g self, kind: EntityKind, index: &EntityIndex) -> Vec<&'g str> {
        let Some(arena) = self.arena(kind) else {
            return Vec::new();
        };
        let mut ids: Vec<&str> = arena
            .iter()
            .map(|(_, id)| id)
            .filter(|id| !index.contains(kind, id))
            .collect();
        ids.sort_unstable();
        ids
    }
}

fn resolve<'a, 'input>(
    corpus: &'a ParsedCorpus<'input>,
    defs: &[Definition],
) -> Vec<Node<'a, 'input>> {
    defs.iter()
        .filter_map(|def| corpus.node(def.file, def.node))
        .collect()
}

/// Text values found at `path` below `element`, as the XPath
/// `.//A//B/text()`: every text child of every match, trimmed, with empty
/// values dropped.
pub(crate) fn select_texts(element: Node<'_, '_>, path: &RefPath) -> Vec<String> {
    let mut frontier = vec![element];

    for segment in path.segments() {
        let mut matches: Vec<Node<'_, '_>> = frontier
            .iter()
            .flat_map(|node| {
                node.descendants()
                    .skip(1)
                    .filter(|n| n.is_element() && n.tag_name().name() == segment.as_str())
            })
            .collect();
        // A nested match is reachable from each of its matching ancestors
        matches.sort_by_key(|n| n.range().start);
        matches.dedup_by_key(|n| n.range().start);
        frontier = matches;
    }

    frontier
        .iter()
        .flat_map(|node| node.children().filter(|c| c.is_text()))
        .filter_map(|text| text.text())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .collect()
}
