//! Configuration files changing tag names and paths

use std::fs;

use medprune::commands::prune::{run, PruneOptions};

use super::helpers::{dry_run, write_corpus, BASE_XML};

const RENAMED_XML: &str = r#"<Db>
  <Condition Key="D1">
    <Signs><SignRef>S1</SignRef></Signs>
  </Condition>
  <Sign Key="S1"><Tests><TestRef>E1</TestRef></Tests></Sign>
  <Sign Key="S2"/>
  <Test Key="E1"/>
  <Test Key="E2"/>
</Db>
"#;

const RENAMED_CONFIG: &str = r#"
[tags]
diagnosis = "Condition"
symptom = "Sign"
examination = "Test"
treatment = "Remedy"
id_attribute = "Key"

[refs]
diagnosis_symptoms = "Signs//SignRef"
symptom_examinations = "Tests//TestRef"
"#;

#[test]
fn test_config_in_root_is_picked_up() {
    let corpus = write_corpus(&[
        ("content/Db.xml", RENAMED_XML),
        ("medprune.toml", RENAMED_CONFIG),
    ]);

    let outcome = run(&dry_run(corpus.path())).unwrap();

    assert_eq!(outcome.config, Some(corpus.path().join("medprune.toml")));
    assert_eq!(outcome.plan.symptoms.unused, vec!["S2"]);
    assert_eq!(outcome.plan.examinations.unused, vec!["E2"]);
}

#[test]
fn test_explicit_config_outside_root() {
    let corpus = write_corpus(&[("Db.xml", RENAMED_XML)]);
    let config_dir = write_corpus(&[("custom.toml", RENAMED_CONFIG)]);

    let outcome = run(&PruneOptions {
        config: Some(config_dir.path().join("custom.toml")),
        ..dry_run(corpus.path())
    })
    .unwrap();

    assert_eq!(outcome.plan.symptoms.defined, 2);
    assert_eq!(outcome.plan.symptoms.unused, vec!["S2"]);
}

#[test]
fn test_default_tags_see_nothing_in_renamed_corpus() {
    let corpus = write_corpus(&[("Db.xml", RENAMED_XML)]);

    let outcome = run(&dry_run(corpus.path())).unwrap();

    assert!(outcome.config.is_none());
    assert_eq!(outcome.plan.symptoms.defined, 0);
    assert!(outcome.plan.is_empty());
}

#[test]
fn test_include_pattern_limits_the_scan() {
    let corpus = write_corpus(&[
        ("Database/Base.xml", BASE_XML),
        ("Database/Base.xml.txt", BASE_XML),
        ("medprune.toml", "include = \"Database/*.xml\"\n"),
    ]);

    let outcome = run(&dry_run(corpus.path())).unwrap();

    assert_eq!(outcome.documents, 1);
}

#[test]
fn test_invalid_config_is_an_error() {
    let corpus = write_corpus(&[
        ("Database/Base.xml", BASE_XML),
        ("medprune.toml", "[refs]\nsymptom_collapse = \"A////B\"\n"),
    ]);

    let err = run(&dry_run(corpus.path())).unwrap_err();

    assert!(format!("{err:#}").contains("symptom_collapse"));
}

#[test]
fn test_unknown_config_key_is_an_error() {
    let corpus = write_corpus(&[("Database/Base.xml", BASE_XML)]);
    let config = corpus.path().join("medprune.toml");
    fs::write(&config, "inclde = \"**/*.xml\"\n").unwrap();

    assert!(run(&dry_run(corpus.path())).is_err());
}

#[test]
fn test_missing_explicit_config_is_an_error() {
    let corpus = write_corpus(&[("Database/Base.xml", BASE_XML)]);

    let result = run(&PruneOptions {
        config: Some(corpus.path().join("absent.toml")),
        ..dry_run(corpus.path())
    });

    assert!(result.is_err());
}
