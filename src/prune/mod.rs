//! Deletion planning and application
//!
//! The plan is a plain diff of defined ids against reachable ids per kind.
//! Applying it emits `(kind, id)` removal requests to a [`DefinitionStore`];
//! the pruner itself knows nothing about files or serialization.


use serde::Serialize;
use std::collections::BTreeMap;
use tracing::info;

use crate::closure::Closure;
use crate::index::{EntityIndex, EntityKind};

/// Receives removal requests from [`PrunePlan::apply`]
pub trait DefinitionStore {
    /// Remove every definition of `id`, wherever it lives. Returns the number
    /// of definitions removed (zero when the id is unknown).
    fn remove_all_definitions(&mut self, kind: EntityKind, id: &str) -> usize;
}

/// Deletion decision for one entity kind
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KindPlan {
    pub kind: EntityKind,
    /// Distinct ids defined in the corpus
    pub defined: usize,
    /// Ids reached by the closure, including referenced-but-undefined ones
    pub reachable: usize,
    /// Defined ids that are unreachable, sorted
    pub unused: Vec<String>,
}

impl KindPlan {
    fn compute(kind: EntityKind, index: &EntityIndex, closure: &Closure) -> Self {
        let unused: Vec<String> = index
            .ids(kind)
            .filter(|id| !closure.contains(kind, id))
            .map(str::to_string)
            .collect();

        Self {
            kind,
            defined: index.len(kind),
            reachable: closure.members(kind).map_or(0, |set| set.len()),
            unused,
        }
    }

    /// Defined ids that survive
    pub fn kept(&self) -> usize {
        self.defined - self.unused.len()
    }
}

/// What a run would delete
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PrunePlan {
    pub passes: usize,
    pub symptoms: KindPlan,
    pub examinations: KindPlan,
    pub treatments: KindPlan,
}

impl PrunePlan {
    /// `unused = defined − reachable` for each prunable kind. Undefined ids
    /// never appear in a defined set, so they are never scheduled.
    pub fn compute(index: &EntityIndex, closure: &Closure) -> Self {
        let plan = Self {
            passes: closure.passes(),
            symptoms: KindPlan::compute(EntityKind::Symptom, index, closure),
            examinations: KindPlan::compute(EntityKind::Examination, index, closure),
            treatments: KindPlan::compute(EntityKind::Treatment, index, closure),
        };

        info!(
            passes = plan.passes,
            symptoms = plan.symptoms.unused.len(),
            examinations = plan.examinations.unused.len(),
            treatments = plan.treatments.unused.len(),
            "Computed prune plan"
        );

        plan
    }

    /// Per-kind plans in deletion phase order
    pub fn kinds(&self) -> [&KindPlan; 3] {
        [&self.symptoms, &self.examinations, &self.treatments]
    }

    pub fn get(&self, kind: EntityKind) -> Option<&KindPlan> {
        self.kinds().into_iter().find(|plan| plan.kind == kind)
    }

    pub fn total_unused(&self) -> usize {
        self.kinds().iter().map(|plan| plan.unused.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total_unused() == 0
    }

    /// Request removal of every unused id: symptoms first, then
    /// examinations, then treatments.
    pub fn apply<S: DefinitionStore + ?Sized>(&self, store: &mut S) -> ApplySummary {
        let mut summary = ApplySummary::default();

        for plan in self.kinds() {
            let removed = summary.removed.entry(plan.kind).or_default();
            for id in &plan.unused {
                let count = store.remove_all_definitions(plan.kind, id);
                removed.ids += 1;
                removed.definitions += count;
            }
            info!(
                kind = %plan.kind,
                ids = removed.ids,
                definitions = removed.definitions,
                "Requested removals"
            );
        }

        summary
    }
}

/// Removal counts for one kind
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Removed {
    pub ids: usize,
    pub definitions: usize,
}

/// What [`PrunePlan::apply`] asked the store to remove
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ApplySummary {
    pub removed: BTreeMap<EntityKind, Removed>,
}

impl ApplySummary {
    pub fn get(&self, kind: EntityKind) -> Removed {
        self.removed.get(&kind).copied().unwrap_or_default()
    }

    pub fn total_definitions(&self) -> usize {
        self.removed.values().map(|r| r.definitions).sum()
    }
}
