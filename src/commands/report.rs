//! Rendering of the prune report, as colored text or JSON

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use colored::Colorize;
use serde::Serialize;
use std::fmt::Write;
use std::path::Path;

use super::prune::{ApplyOutcome, PruneOutcome};
use crate::document::SkippedDocument;
use crate::prune::KindPlan;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
enum Mode {
    DryRun,
    Apply,
}

#[derive(Serialize)]
struct KindReport<'a> {
    defined: usize,
    kept: usize,
    unused: &'a [String],
}

impl<'a> From<&'a KindPlan> for KindReport<'a> {
    fn from(plan: &'a KindPlan) -> Self {
        Self {
            defined: plan.defined,
            kept: plan.kept(),
            unused: &plan.unused,
        }
    }
}

#[derive(Serialize)]
struct JsonReport<'a> {
    generated_at: DateTime<Utc>,
    root: &'a Path,
    #[serde(skip_serializing_if = "Option::is_none")]
    config: Option<&'a Path>,
    mode: Mode,
    documents: usize,
    skipped: &'a [SkippedDocument],
    passes: usize,
    symptoms: KindReport<'a>,
    examinations: KindReport<'a>,
    treatments: KindReport<'a>,
    #[serde(skip_serializing_if = "Option::is_none")]
    apply: Option<&'a ApplyOutcome>,
}

pub(super) fn render_json(outcome: &PruneOutcome) -> Result<String> {
    render_json_at(outcome, Utc::now())
}

fn render_json_at(outcome: &PruneOutcome, generated_at: DateTime<Utc>) -> Result<String> {
    let report = JsonReport {
        generated_at,
        root: &outcome.root,
        config: outcome.config.as_deref(),
        mode: if outcome.applied.is_some() {
            Mode::Apply
        } else {
            Mode::DryRun
        },
        documents: outcome.documents,
        skipped: &outcome.skipped,
        passes: outcome.plan.passes,
        symptoms: (&outcome.plan.symptoms).into(),
        examinations: (&outcome.plan.examinations).into(),
        treatments: (&outcome.plan.treatments).into(),
        apply: outcome.applied.as_ref(),
    };
    serde_json::to_string_pretty(&report).context("Failed to serialize report")
}

pub(super) fn render_human(outcome: &PruneOutcome) -> String {
    let mut out = String::new();
    // Writing to a String cannot fail
    let _ = write_human(&mut out, outcome);
    out
}

fn write_human(out: &mut String, outcome: &PruneOutcome) -> std::fmt::Result {
    let plan = &outcome.plan;

    writeln!(
        out,
        "{} {}",
        "medprune".bold().blue(),
        outcome.root.display()
    )?;
    write!(out, "Scanned {} document(s)", outcome.documents)?;
    if outcome.skipped.is_empty() {
        writeln!(out)?;
    } else {
        writeln!(
            out,
            ", {}",
            format!("{} skipped", outcome.skipped.len()).yellow()
        )?;
        for skipped in &outcome.skipped {
            writeln!(out, "  {} {}", "!".yellow(), skipped.reason)?;
        }
    }

    writeln!(out, "\n{} Symptoms", "[PHASE 1]".bold().cyan())?;
    write_kind(out, &plan.symptoms, "keep")?;

    writeln!(
        out,
        "\n{} Examinations & Treatments",
        "[PHASE 2]".bold().cyan()
    )?;
    write_kind(out, &plan.examinations, "used")?;
    write_kind(out, &plan.treatments, "used")?;

    writeln!(
        out,
        "\nClosure converged after {} pass(es)",
        plan.passes
    )?;

    match &outcome.applied {
        None => {
            writeln!(out)?;
            if plan.is_empty() {
                writeln!(out, "{} Nothing to delete", "✓".green().bold())?;
            } else {
                writeln!(
                    out,
                    "{} Dry run: {} id(s) would be deleted. Re-run with {} to delete them, and add {} to keep copies of the originals.",
                    "→".cyan().bold(),
                    plan.total_unused(),
                    "--apply".bold(),
                    "--backup".bold()
                )?;
            }
        }
        Some(applied) => write_applied(out, applied)?,
    }

    Ok(())
}

fn write_kind(out: &mut String, plan: &KindPlan, verb: &str) -> std::fmt::Result {
    let delete = plan.unused.len();
    let delete_label = format!("delete {delete}");
    writeln!(
        out,
        "  {:<13} {verb} {} / {} defined, {}",
        format!("{}:", plan.kind.plural()),
        plan.kept(),
        plan.defined,
        if delete == 0 {
            delete_label.normal()
        } else {
            delete_label.red()
        }
    )?;
    for id in &plan.unused {
        writeln!(out, "    - {id}")?;
    }
    Ok(())
}

fn write_applied(out: &mut String, applied: &ApplyOutcome) -> std::fmt::Result {
    let persist = &applied.persist;

    writeln!(
        out,
        "\nRemoved {} definition(s) across {} document(s)",
        applied.removed.total_definitions(),
        applied.modified_documents
    )?;
    writeln!(out, "  written:   {}", persist.written.len())?;
    if !persist.backed_up.is_empty() {
        writeln!(out, "  backed up: {}", persist.backed_up.len())?;
    }

    if persist.failed.is_empty() {
        writeln!(out, "{} Done", "✓".green().bold())?;
    } else {
        writeln!(
            out,
            "  {} {}",
            "failed:".red().bold(),
            persist.failed.len()
        )?;
        for failure in &persist.failed {
            writeln!(out, "    {} {}", "✗".red(), failure.error)?;
        }
    }

    Ok(())
}
