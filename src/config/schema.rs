//! Compiled schema: validated tag names and parsed reference paths

use std::fmt;

use super::{ConfigError, RefConfig, TagConfig};
use crate::index::EntityKind;

/// A descendant-axis element path such as `Complication//SymptomRef`.
///
/// Each segment is matched against element local names; consecutive
/// segments are related by "is a descendant of", never "is a child of".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefPath {
    segments: Vec<String>,
}

impl RefPath {
    pub fn parse(field: &'static str, raw: &str) -> Result<Self, ConfigError> {
        let invalid = |reason| ConfigError::InvalidPath {
            field,
            path: raw.to_string(),
            reason,
        };

        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(invalid("path is empty"));
        }

        let segments: Vec<String> = trimmed.split("//").map(|s| s.trim().to_string()).collect();
        if segments.iter().any(|s| s.is_empty()) {
            return Err(invalid("path contains an empty segment"));
        }
        if segments
            .iter()
            .any(|s| s.contains('/') || s.contains(char::is_whitespace))
        {
            return Err(invalid("segments must be plain element names joined by '//'"));
        }

        Ok(Self { segments })
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }
}

impl fmt::Display for RefPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.segments.join("//"))
    }
}

/// Validated form of [`TagConfig`] and [`RefConfig`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    pub diagnosis_tag: String,
    pub symptom_tag: String,
    pub examination_tag: String,
    pub treatment_tag: String,
    pub id_attribute: String,

    pub diagnosis_symptoms: RefPath,
    pub diagnosis_examinations: RefPath,
    pub diagnosis_treatments: RefPath,
    pub symptom_examinations: RefPath,
    pub symptom_treatments: RefPath,
    pub symptom_collapse: RefPath,
    pub examination_lab_peers: RefPath,
    pub treatment_type: RefPath,
    pub treatment_complications: RefPath,
    pub surgery_type: String,
}

impl Schema {
    pub(super) fn compile(tags: &TagConfig, refs: &RefConfig) -> Result<Self, ConfigError> {
        let tag = |field: &'static str, value: &str| -> Result<String, ConfigError> {
            let value = value.trim();
            if value.is_empty() {
                return Err(ConfigError::Empty(field));
            }
            Ok(value.to_string())
        };

        Ok(Self {
            diagnosis_tag: tag("tags.diagnosis", &tags.diagnosis)?,
            symptom_tag: tag("tags.symptom", &tags.symptom)?,
            examination_tag: tag("tags.examination", &tags.examination)?,
            treatment_tag: tag("tags.treatment", &tags.treatment)?,
            id_attribute: tag("tags.id_attribute", &tags.id_attribute)?,

            diagnosis_symptoms: RefPath::parse("refs.diagnosis_symptoms", &refs.diagnosis_symptoms)?,
            diagnosis_examinations: RefPath::parse(
                "refs.diagnosis_examinations",
                &refs.diagnosis_examinations,
            )?,
            diagnosis_treatments: RefPath::parse(
                "refs.diagnosis_treatments",
                &refs.diagnosis_treatments,
            )?,
            symptom_examinations: RefPath::parse(
                "refs.symptom_examinations",
                &refs.symptom_examinations,
            )?,
            symptom_treatments: RefPath::parse("refs.symptom_treatments", &refs.symptom_treatments)?,
            symptom_collapse: RefPath::parse("refs.symptom_collapse", &refs.symptom_collapse)?,
            examination_lab_peers: RefPath::parse(
                "refs.examination_lab_peers",
                &refs.examination_lab_peers,
            )?,
            treatment_type: RefPath::parse("refs.treatment_type", &refs.treatment_type)?,
            treatment_complications: RefPath::parse(
                "refs.treatment_complications",
                &refs.treatment_complications,
            )?,
            surgery_type: tag("refs.surgery_type", &refs.surgery_type)?,
        })
    }

    /// Element name that defines entities of `kind`
    pub fn tag(&self, kind: EntityKind) -> &str {
        match kind {
            EntityKind::Diagnosis => &self.diagnosis_tag,
            EntityKind::Symptom => &self.symptom_tag,
            EntityKind::Examination => &self.examination_tag,
            EntityKind::Treatment => &self.treatment_tag,
        }
    }

    /// Entity kind defined by an element name, if any
    pub fn kind_of(&self, tag: &str) -> Option<EntityKind> {
        EntityKind::ALL.into_iter().find(|kind| self.tag(*kind) == tag)
    }
}
