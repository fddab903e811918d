//! Shared test helpers for corpus-level integration tests

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use medprune::commands::prune::PruneOptions;

/// Vanilla content: one diagnosis reaching S1 (and through it E1, T1),
/// plus unreferenced S_ORPHAN, E7 and T_OLD.
pub const BASE_XML: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<Database>
  <!-- diagnoses -->
  <GameDBMedicalCondition ID="D1">
    <Symptoms>
      <GameDBSymptomRef>S1</GameDBSymptomRef>
    </Symptoms>
  </GameDBMedicalCondition>

  <!-- symptoms -->
  <GameDBSymptom ID="S1">
    <Examinations><ExaminationRef>E1</ExaminationRef></Examinations>
    <Treatments><TreatmentRef>T1</TreatmentRef></Treatments>
  </GameDBSymptom>
  <GameDBSymptom ID="S_ORPHAN"/>

  <!-- examinations -->
  <GameDBExamination ID="E1"/>
  <GameDBExamination ID="E7"/>

  <!-- treatments -->
  <GameDBTreatment ID="T1"/>
  <GameDBTreatment ID="T_OLD">
    <TreatmentType>SURGERY</TreatmentType>
  </GameDBTreatment>
</Database>
"#;

/// Test helper: create a temporary content root holding `files`
/// (relative path, contents)
pub fn write_corpus(files: &[(&str, &str)]) -> TempDir {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    for (relative, contents) in files {
        let path = temp_dir.path().join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("Failed to create corpus directory");
        }
        fs::write(&path, contents).expect("Failed to write corpus file");
    }
    temp_dir
}

/// Test helper: read a corpus file back as text
pub fn read(root: &Path, relative: &str) -> String {
    fs::read_to_string(root.join(relative)).expect("Failed to read corpus file")
}

/// Test helper: path of `relative` with a suffix appended
pub fn with_suffix(root: &Path, relative: &str, suffix: &str) -> PathBuf {
    let mut name = root.join(relative).into_os_string();
    name.push(suffix);
    PathBuf::from(name)
}

pub fn dry_run(root: &Path) -> PruneOptions {
    PruneOptions {
        root: root.to_path_buf(),
        ..PruneOptions::default()
    }
}

pub fn apply(root: &Path, backup: bool) -> PruneOptions {
    PruneOptions {
        root: root.to_path_buf(),
        apply: true,
        backup,
        ..PruneOptions::default()
    }
}
