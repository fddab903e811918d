//! The `stats` command: what the index sees in a content root

use anyhow::{Context, Result};
use colored::Colorize;
use std::path::{Path, PathBuf};

use super::load_config;
use crate::document::{SkippedDocument, SourceSet};
use crate::extract::ReferenceGraph;
use crate::index::{EntityIndex, EntityKind};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KindStats {
    pub kind: EntityKind,
    /// Distinct ids
    pub ids: usize,
    /// Definitions, counting every duplicate
    pub definitions: usize,
    /// Ids defined more than once, with their definition counts
    pub duplicates: Vec<(String, usize)>,
    /// Ids referenced but never defined
    pub dangling: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct StatsReport {
    pub root: PathBuf,
    pub documents: usize,
    pub skipped: Vec<SkippedDocument>,
    pub kinds: Vec<KindStats>,
}

impl StatsReport {
    pub fn kind(&self, kind: EntityKind) -> Option<&KindStats> {
        self.kinds.iter().find(|stats| stats.kind == kind)
    }
}

/// Collect statistics for `root` without printing anything
pub fn run(root: &Path, config: Option<&Path>) -> Result<StatsReport> {
    let (config, schema, _) = load_config(config, root)?;
    let sources = SourceSet::scan(root, &config.include)
        .with_context(|| format!("Failed to scan {}", root.display()))?;

    let corpus = sources.parse();
    let index = EntityIndex::build(&corpus, &schema);
    let graph = ReferenceGraph::extract(&corpus, &index, &schema);

    let kinds = EntityKind::ALL
        .into_iter()
        .map(|kind| KindStats {
            kind,
            ids: index.len(kind),
            definitions: index.definition_count(kind),
            duplicates: index
                .duplicates(kind)
                .into_iter()
                .map(|(id, count)| (id.to_string(), count))
                .collect(),
            dangling: graph
                .dangling(kind, &index)
                .into_iter()
                .map(str::to_string)
                .collect(),
        })
        .collect();

    let mut skipped = sources.unreadable().to_vec();
    skipped.extend_from_slice(corpus.skipped());

    Ok(StatsReport {
        root: root.to_path_buf(),
        documents: sources.len(),
        skipped,
        kinds,
    })
}

/// Execute the stats command
pub fn execute(root: &Path, config: Option<&Path>) -> Result<()> {
    let report = run(root, config)?;

    println!("{} {}", "medprune stats".bold().blue(), report.root.display());
    println!("{}", "=".repeat(50));
    println!("Documents: {}", report.documents);
    if !report.skipped.is_empty() {
        println!("Skipped:   {}", report.skipped.len().to_string().yellow());
        for skipped in &report.skipped {
            println!("  {} {}", "!".yellow(), skipped.reason);
        }
    }

    println!("\n{}", "Entities".bold());
    for stats in &report.kinds {
        println!(
            "  {:<13} {:>6} id(s) {:>6} definition(s)",
            format!("{}:", stats.kind.plural()),
            stats.ids,
            stats.definitions
        );
    }

    for stats in &report.kinds {
        if !stats.duplicates.is_empty() {
            println!(
                "\n{} {}",
                "Multiply-defined".bold(),
                stats.kind.plural()
            );
            for (id, count) in &stats.duplicates {
                println!("  {id} ({count} definitions)");
            }
        }
        if !stats.dangling.is_empty() {
            println!(
                "\n{} {}",
                "Referenced but undefined".bold().yellow(),
                stats.kind.plural()
            );
            for id in &stats.dangling {
                println!("  {id}");
            }
        }
    }

    Ok(())
}
