use serde::Serialize;
use std::fmt;

/// The entity kinds the pruner knows about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Diagnosis,
    Symptom,
    Examination,
    Treatment,
}

impl EntityKind {
    pub const ALL: [EntityKind; 4] = [
        EntityKind::Diagnosis,
        EntityKind::Symptom,
        EntityKind::Examination,
        EntityKind::Treatment,
    ];

    /// Kinds that can be pruned, in deletion phase order. Diagnoses are the
    /// seeds of reachability and are never pruned.
    pub const PRUNABLE: [EntityKind; 3] = [
        EntityKind::Symptom,
        EntityKind::Examination,
        EntityKind::Treatment,
    ];

    pub fn plural(self) -> &'static str {
        match self {
            EntityKind::Diagnosis => "diagnoses",
            EntityKind::Symptom => "symptoms",
            EntityKind::Examination => "examinations",
            EntityKind::Treatment => "treatments",
        }
    }

    fn slot(self) -> usize {
        self as usize
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EntityKind::Diagnosis => "diagnosis",
            EntityKind::Symptom => "symptom",
            EntityKind::Examination => "examination",
            EntityKind::Treatment => "treatment",
        };
        write!(f, "{name}")
    }
}

/// Fixed-size storage with one slot per [`EntityKind`]
#[derive(Debug, Clone, Default)]
pub(crate) struct PerKind<T>([T; 4]);

impl<T> PerKind<T> {
    pub(crate) fn get(&self, kind: EntityKind) -> &T {
        &self.0[kind.slot()]
    }

    pub(crate) fn get_mut(&mut self, kind: EntityKind) -> &mut T {
        &mut self.0[kind.slot()]
    }
}
