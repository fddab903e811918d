//! Applying prune plans to disk

use std::fs;

use medprune::commands::prune::{ensure_persisted, run};
use medprune::document::PersistFailure;
use medprune::EntityKind;

use super::helpers::{apply, dry_run, read, with_suffix, write_corpus, BASE_XML};

const UNTOUCHED_XML: &str = r#"<Database>
  <GameDBExamination ID="E1"/>
</Database>
"#;

#[test]
fn test_apply_removes_unused_definitions() {
    let corpus = write_corpus(&[("Database/Base.xml", BASE_XML)]);

    let outcome = run(&apply(corpus.path(), false)).unwrap();
    let applied = outcome.applied.expect("apply outcome");

    assert_eq!(applied.removed.get(EntityKind::Symptom).definitions, 1);
    assert_eq!(applied.removed.get(EntityKind::Examination).definitions, 1);
    assert_eq!(applied.removed.get(EntityKind::Treatment).definitions, 1);
    assert_eq!(applied.persist.written.len(), 1);
    assert!(!applied.persist.has_failures());

    let text = read(corpus.path(), "Database/Base.xml");
    assert!(!text.contains("S_ORPHAN"));
    assert!(!text.contains("E7"));
    assert!(!text.contains("T_OLD"));
    assert!(text.contains(r#"<GameDBSymptom ID="S1">"#));
    assert!(text.contains(r#"<GameDBExamination ID="E1"/>"#));
    assert!(text.contains(r#"<GameDBTreatment ID="T1"/>"#));
}

#[test]
fn test_apply_preserves_comments_and_formatting() {
    let corpus = write_corpus(&[("Database/Base.xml", BASE_XML)]);

    run(&apply(corpus.path(), false)).unwrap();

    let expected = BASE_XML
        .replace("  <GameDBSymptom ID=\"S_ORPHAN\"/>\n", "")
        .replace("  <GameDBExamination ID=\"E7\"/>\n", "")
        .replace(
            "  <GameDBTreatment ID=\"T_OLD\">\n    <TreatmentType>SURGERY</TreatmentType>\n  </GameDBTreatment>\n",
            "",
        );
    assert_eq!(read(corpus.path(), "Database/Base.xml"), expected);
}

#[test]
fn test_rerun_after_apply_has_nothing_to_do() {
    let corpus = write_corpus(&[("Database/Base.xml", BASE_XML)]);

    run(&apply(corpus.path(), false)).unwrap();
    let second = run(&dry_run(corpus.path())).unwrap();

    assert!(second.plan.is_empty());
    assert_eq!(second.plan.symptoms.defined, 1);
}

#[test]
fn test_backup_holds_original_bytes() {
    let corpus = write_corpus(&[
        ("Database/Base.xml", BASE_XML),
        ("Database/Other.xml", UNTOUCHED_XML),
    ]);

    let outcome = run(&apply(corpus.path(), true)).unwrap();
    let applied = outcome.applied.expect("apply outcome");

    let backup = with_suffix(corpus.path(), "Database/Base.xml", ".bak");
    assert_eq!(applied.persist.backed_up, vec![backup.clone()]);
    assert_eq!(fs::read_to_string(&backup).unwrap(), BASE_XML);

    // Unmodified documents are neither rewritten nor backed up
    assert!(!with_suffix(corpus.path(), "Database/Other.xml", ".bak").exists());
    assert_eq!(read(corpus.path(), "Database/Other.xml"), UNTOUCHED_XML);
}

#[test]
fn test_apply_without_backup_writes_no_backup() {
    let corpus = write_corpus(&[("Database/Base.xml", BASE_XML)]);

    run(&apply(corpus.path(), false)).unwrap();

    assert!(!with_suffix(corpus.path(), "Database/Base.xml", ".bak").exists());
}

#[test]
fn test_duplicate_unused_definitions_are_all_removed() {
    let corpus = write_corpus(&[
        ("Database/Base.xml", BASE_XML),
        (
            "Mods/Extra/More.xml",
            r#"<Database>
  <GameDBExamination ID="E7"/>
  <GameDBExamination ID="E1"/>
</Database>
"#,
        ),
    ]);

    let outcome = run(&apply(corpus.path(), false)).unwrap();
    let applied = outcome.applied.expect("apply outcome");

    assert_eq!(
        applied.removed.get(EntityKind::Examination).definitions,
        2
    );
    assert_eq!(applied.modified_documents, 2);
    assert_eq!(
        read(corpus.path(), "Mods/Extra/More.xml"),
        "<Database>\n  <GameDBExamination ID=\"E1\"/>\n</Database>\n"
    );
}

#[test]
fn test_write_failure_makes_the_run_fail() {
    let corpus = write_corpus(&[("Database/Base.xml", BASE_XML)]);

    let mut outcome = run(&apply(corpus.path(), false)).unwrap();
    assert!(ensure_persisted(&outcome).is_ok());

    let applied = outcome.applied.as_mut().expect("apply outcome");
    applied.persist.failed.push(PersistFailure {
        path: corpus.path().join("Database/Base.xml"),
        error: "Failed to write Database/Base.xml".to_string(),
    });

    let err = ensure_persisted(&outcome).unwrap_err();
    assert!(err.to_string().contains("1 document(s) could not be written"));
}

#[test]
fn test_dry_run_never_fails_on_persistence() {
    let corpus = write_corpus(&[("Database/Base.xml", BASE_XML)]);

    let outcome = run(&dry_run(corpus.path())).unwrap();

    assert!(ensure_persisted(&outcome).is_ok());
}
