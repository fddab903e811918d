//! Run configuration
//!
//! Element tag names, reference paths and file discovery settings. Every
//! field has a default matching the stock game database, so a run without a
//! config file (or with an empty one) targets the vanilla schema.
//!
//! Resolution order: an explicit `--config` path, then `medprune.toml` at the
//! content root, then the built-in defaults.

mod schema;


pub use schema::{RefPath, Schema};

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Config file picked up automatically from the content root.
pub const CONFIG_FILE_NAME: &str = "medprune.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid reference path '{path}' for {field}: {reason}")]
    InvalidPath {
        field: &'static str,
        path: String,
        reason: &'static str,
    },

    #[error("{0} must not be empty")]
    Empty(&'static str),
}

/// Top-level configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Glob, relative to the content root, selecting the documents to scan
    pub include: String,
    /// Suffix appended to a document's file name for its backup copy
    pub backup_suffix: String,
    pub tags: TagConfig,
    pub refs: RefConfig,
}

/// Element names identifying each entity kind
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TagConfig {
    pub diagnosis: String,
    pub symptom: String,
    pub examination: String,
    pub treatment: String,
    /// Attribute carrying the entity id
    pub id_attribute: String,
}

/// Reference paths, written as `//`-separated element names relative to the
/// defining element (`Symptoms//GameDBSymptomRef` reads as the XPath
/// `.//Symptoms//GameDBSymptomRef`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RefConfig {
    pub diagnosis_symptoms: String,
    pub diagnosis_examinations: String,
    pub diagnosis_treatments: String,
    pub symptom_examinations: String,
    pub symptom_treatments: String,
    pub symptom_collapse: String,
    pub examination_lab_peers: String,
    pub treatment_type: String,
    pub treatment_complications: String,
    /// Treatment type value (compared case-insensitively) marking a surgery
    pub surgery_type: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            include: "**/*.xml".to_string(),
            backup_suffix: ".bak".to_string(),
            tags: TagConfig::default(),
            refs: RefConfig::default(),
        }
    }
}

impl Default for TagConfig {
    fn default() -> Self {
        Self {
            diagnosis: "GameDBMedicalCondition".to_string(),
            symptom: "GameDBSymptom".to_string(),
            examination: "GameDBExamination".to_string(),
            treatment: "GameDBTreatment".to_string(),
            id_attribute: "ID".to_string(),
        }
    }
}

impl Default for RefConfig {
    fn default() -> Self {
        Self {
            diagnosis_symptoms: "Symptoms//GameDBSymptomRef".to_string(),
            diagnosis_examinations: "Examinations//ExaminationRef".to_string(),
            diagnosis_treatments: "Treatments//TreatmentRef".to_string(),
            symptom_examinations: "Examinations//ExaminationRef".to_string(),
            symptom_treatments: "Treatments//TreatmentRef".to_string(),
            symptom_collapse: "CollapseSymptomRef".to_string(),
            examination_lab_peers: "LabTestingExaminationRef".to_string(),
            treatment_type: "TreatmentType".to_string(),
            treatment_complications: "Complication//SymptomRef".to_string(),
            surgery_type: "SURGERY".to_string(),
        }
    }
}

impl Config {
    /// Parse a config from TOML text. `origin` is only used in error messages.
    pub fn from_toml(content: &str, origin: &Path) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|source| ConfigError::Parse {
            path: origin.to_path_buf(),
            source,
        })
    }

    /// Load a config file from disk
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content, path)
    }

    /// Resolve the config for a run over `root`.
    ///
    /// Returns the config together with the file it came from, if any.
    pub fn resolve(
        explicit: Option<&Path>,
        root: &Path,
    ) -> Result<(Self, Option<PathBuf>), ConfigError> {
        if let Some(path) = explicit {
            return Ok((Self::load(path)?, Some(path.to_path_buf())));
        }

        let candidate = root.join(CONFIG_FILE_NAME);
        if candidate.is_file() {
            return Ok((Self::load(&candidate)?, Some(candidate)));
        }

        Ok((Self::default(), None))
    }

    /// Validate and compile into the form used by indexing and extraction
    pub fn schema(&self) -> Result<Schema, ConfigError> {
        if self.include.trim().is_empty() {
            return Err(ConfigError::Empty("include"));
        }
        // An empty suffix would make the backup overwrite its own source
        if self.backup_suffix.is_empty() {
            return Err(ConfigError::Empty("backup_suffix"));
        }
        Schema::compile(&self.tags, &self.refs)
    }
}
