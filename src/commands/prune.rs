//! The `prune` command: plan, and optionally apply, the removal of every
//! symptom, examination and treatment no diagnosis can reach

use anyhow::{bail, Context, Result};
use serde::Serialize;
use std::path::PathBuf;
use tracing::warn;

use super::{load_config, report};
use crate::closure;
use crate::document::{DocumentEditor, PersistReport, SkippedDocument, SourceSet};
use crate::extract::ReferenceGraph;
use crate::index::EntityIndex;
use crate::prune::{ApplySummary, PrunePlan};

#[derive(Debug, Clone, Default)]
pub struct PruneOptions {
    pub root: PathBuf,
    pub apply: bool,
    pub backup: bool,
    pub config: Option<PathBuf>,
    pub json: bool,
}

/// What happened when the plan was applied
#[derive(Debug, Clone, Serialize)]
pub struct ApplyOutcome {
    pub removed: ApplySummary,
    pub modified_documents: usize,
    pub persist: PersistReport,
}

#[derive(Debug, Clone)]
pub struct PruneOutcome {
    pub root: PathBuf,
    pub config: Option<PathBuf>,
    pub documents: usize,
    /// Unreadable and unparseable documents, in that order
    pub skipped: Vec<SkippedDocument>,
    pub plan: PrunePlan,
    pub applied: Option<ApplyOutcome>,
}

/// Run the whole pipeline without printing anything
pub fn run(opts: &PruneOptions) -> Result<PruneOutcome> {
    let (config, schema, origin) = load_config(opts.config.as_deref(), &opts.root)?;

    let sources = SourceSet::scan(&opts.root, &config.include)
        .with_context(|| format!("Failed to scan {}", opts.root.display()))?;
    let documents = sources.len();
    let mut skipped = sources.unreadable().to_vec();

    // The parsed trees borrow the source texts; everything the editor needs
    // is copied out before the sources move into it.
    let (plan, locations) = {
        let corpus = sources.parse();
        skipped.extend_from_slice(corpus.skipped());

        let index = EntityIndex::build(&corpus, &schema);
        let graph = ReferenceGraph::extract(&corpus, &index, &schema);
        let closure = closure::compute(&graph);

        (PrunePlan::compute(&index, &closure), index.locations())
    };

    let applied = if opts.apply {
        let mut editor = DocumentEditor::new(sources, locations);
        let removed = plan.apply(&mut editor);
        let backup_suffix = opts.backup.then_some(config.backup_suffix.as_str());
        let persist = editor.persist(backup_suffix);

        Some(ApplyOutcome {
            removed,
            modified_documents: editor.modified_documents(),
            persist,
        })
    } else {
        None
    };

    Ok(PruneOutcome {
        root: opts.root.clone(),
        config: origin,
        documents,
        skipped,
        plan,
        applied,
    })
}

/// Execute the prune command and print its report
pub fn execute(opts: &PruneOptions) -> Result<()> {
    if opts.backup && !opts.apply {
        warn!("--backup has no effect without --apply");
    }

    let outcome = run(opts)?;

    if opts.json {
        println!("{}", report::render_json(&outcome)?);
    } else {
        print!("{}", report::render_human(&outcome));
    }

    ensure_persisted(&outcome)
}

/// Fail when an applied plan left any document unwritten
pub fn ensure_persisted(outcome: &PruneOutcome) -> Result<()> {
    if let Some(applied) = &outcome.applied {
        let failed = applied.persist.failed.len();
        if failed > 0 {
            bail!("{failed} document(s) could not be written");
        }
    }
    Ok(())
}
