//! The stats command over real corpora

use medprune::commands::stats::run;
use medprune::EntityKind;

use super::helpers::{write_corpus, BASE_XML};

#[test]
fn test_stats_counts_ids_and_duplicates() {
    let corpus = write_corpus(&[
        ("Database/Base.xml", BASE_XML),
        (
            "Mods/Extra/More.xml",
            r#"<Database>
  <GameDBSymptom ID="S1"><CollapseSymptomRef>S_MISSING</CollapseSymptomRef></GameDBSymptom>
</Database>
"#,
        ),
        ("Mods/Extra/Broken.xml", "<Database>"),
    ]);

    let report = run(corpus.path(), None).unwrap();

    assert_eq!(report.documents, 3);
    assert_eq!(report.skipped.len(), 1);

    let symptoms = report.kind(EntityKind::Symptom).unwrap();
    assert_eq!(symptoms.ids, 2);
    assert_eq!(symptoms.definitions, 3);
    assert_eq!(symptoms.duplicates, vec![("S1".to_string(), 2)]);
    assert_eq!(symptoms.dangling, vec!["S_MISSING"]);

    let diagnoses = report.kind(EntityKind::Diagnosis).unwrap();
    assert_eq!(diagnoses.ids, 1);
    assert!(diagnoses.dangling.is_empty());
}

#[test]
fn test_stats_on_missing_root_fails() {
    let corpus = write_corpus(&[]);

    assert!(run(&corpus.path().join("missing"), None).is_err());
}
