//! Dependency closure over the reference graph
//!
//! Starting from what diagnoses reference directly, each pass runs:
//! 1. collapse closure over kept symptoms (directed, transitive)
//! 2. examinations and treatments referenced by kept symptoms
//! 3. lab-equivalence closure over used examinations (undirected)
//! 4. complication symptoms of used surgeries (guarded)
//!
//! Step 4 can add symptoms that feed steps 1 and 2 again, so passes repeat
//! until one changes none of the three set sizes. Sets only ever grow and
//! the id universe is finite, so the loop always terminates.

mod traversal;


pub use traversal::{component_closure, forward_closure, guarded_expansion};

use serde::Serialize;
use std::collections::{BTreeSet, HashSet};
use tracing::debug;

use crate::extract::{IdArena, NodeId, ReferenceGraph};
use crate::index::EntityKind;

/// Set sizes observed at the end of a pass (or at seeding)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PassSizes {
    pub symptoms: usize,
    pub examinations: usize,
    pub treatments: usize,
}

impl PassSizes {
    fn of(
        symptoms: &HashSet<NodeId>,
        examinations: &HashSet<NodeId>,
        treatments: &HashSet<NodeId>,
    ) -> Self {
        Self {
            symptoms: symptoms.len(),
            examinations: examinations.len(),
            treatments: treatments.len(),
        }
    }

    /// True when no set in `self` is smaller than in `earlier`
    pub fn dominates(&self, earlier: &PassSizes) -> bool {
        self.symptoms >= earlier.symptoms
            && self.examinations >= earlier.examinations
            && self.treatments >= earlier.treatments
    }
}

/// Result of the fixed-point computation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Closure {
    kept_symptoms: BTreeSet<String>,
    used_examinations: BTreeSet<String>,
    used_treatments: BTreeSet<String>,
    seeded: PassSizes,
    trace: Vec<PassSizes>,
}

impl Closure {
    pub fn kept_symptoms(&self) -> &BTreeSet<String> {
        &self.kept_symptoms
    }

    pub fn used_examinations(&self) -> &BTreeSet<String> {
        &self.used_examinations
    }

    pub fn used_treatments(&self) -> &BTreeSet<String> {
        &self.used_treatments
    }

    /// Reachable ids of a prunable kind; `None` for diagnoses
    pub fn members(&self, kind: EntityKind) -> Option<&BTreeSet<String>> {
        match kind {
            EntityKind::Diagnosis => None,
            EntityKind::Symptom => Some(&self.kept_symptoms),
            EntityKind::Examination => Some(&self.used_examinations),
            EntityKind::Treatment => Some(&self.used_treatments),
        }
    }

    pub fn contains(&self, kind: EntityKind, id: &str) -> bool {
        self.members(kind).is_some_and(|set| set.contains(id))
    }

    /// Set sizes straight after seeding from diagnoses
    pub fn seeded(&self) -> PassSizes {
        self.seeded
    }

    /// Set sizes after each pass. The final entry equals the one before it
    /// (or the seeded sizes after a single pass): that is the fixed point.
    pub fn trace(&self) -> &[PassSizes] {
        &self.trace
    }

    pub fn passes(&self) -> usize {
        self.trace.len()
    }
}

/// Run the closure to its fixed point. Pure and infallible: dangling
/// references simply contribute no edges.
pub fn compute(graph: &ReferenceGraph) -> Closure {
    let seeds = graph.seeds();
    let mut symptoms: HashSet<NodeId> = seeds.symptoms.iter().copied().collect();
    let mut examinations: HashSet<NodeId> = seeds.examinations.iter().copied().collect();
    let mut treatments: HashSet<NodeId> = seeds.treatments.iter().copied().collect();

    let seeded = PassSizes::of(&symptoms, &examinations, &treatments);
    let mut previous = seeded;
    let mut trace = Vec::new();

    loop {
        forward_closure(&mut symptoms, graph.collapse());

        for &symptom in &symptoms {
            examinations.extend(graph.symptom_examinations().targets(symptom).iter().copied());
            treatments.extend(graph.symptom_treatments().targets(symptom).iter().copied());
        }

        component_closure(&mut examinations, graph.lab_peers());

        let complications = guarded_expansion(&treatments, graph.complications(), &mut symptoms);

        let sizes = PassSizes::of(&symptoms, &examinations, &treatments);
        trace.push(sizes);
        debug!(
            pass = trace.len(),
            symptoms = sizes.symptoms,
            examinations = sizes.examinations,
            treatments = sizes.treatments,
            complications,
            "Closure pass"
        );

        if sizes == previous {
            break;
        }
        previous = sizes;
    }

    Closure {
        kept_symptoms: resolve_names(graph.symptoms(), &symptoms),
        used_examinations: resolve_names(graph.examinations(), &examinations),
        used_treatments: resolve_names(graph.treatments(), &treatments),
        seeded,
        trace,
    }
}

fn resolve_names(arena: &IdArena, nodes: &HashSet<NodeId>) -> BTreeSet<String> {
    nodes
        .iter()
        .map(|&node| arena.name(node).to_string())
        .collect()
}
