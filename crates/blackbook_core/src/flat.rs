//! Flat single-form view of a [`DocumentModel`].
//!
//! The single-page wizard works with `studentDetails` and `doc_*` keys rather
//! than sections. These helpers project the canonical model into that shape
//! and write flat edits back into it, so both views share one source of truth.
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::document::{DocumentModel, MetaField};

/// The eleven documentation fields of the flat form, paired with the section
/// id each one is stored under.
pub const DOCUMENTATION_KEYS: [(&str, &str); 11] = [
    ("doc_introduction", "introduction"),
    ("doc_objective", "objective"),
    ("doc_scope", "scope"),
    ("doc_techstack", "techStack"),
    ("doc_feasibility", "feasibility"),
    ("doc_system_features", "systemFeatures"),
    ("doc_modules", "modules"),
    ("doc_usecase", "useCase"),
    ("doc_advantage", "advantage"),
    ("doc_hardware_req", "hardwareReq"),
    ("doc_software_req", "softwareReq"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StudentField {
    Name,
    Project,
    Professor,
    Guide,
    Year,
}

impl StudentField {
    pub const REQUIRED: [StudentField; 5] = [
        StudentField::Name,
        StudentField::Project,
        StudentField::Professor,
        StudentField::Guide,
        StudentField::Year,
    ];

    pub fn key(self) -> &'static str {
        match self {
            StudentField::Name => "name",
            StudentField::Project => "project",
            StudentField::Professor => "professor",
            StudentField::Guide => "guide",
            StudentField::Year => "year",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::REQUIRED.into_iter().find(|field| field.key() == key)
    }

    pub fn meta_field(self) -> MetaField {
        match self {
            StudentField::Name => MetaField::StudentName,
            StudentField::Project => MetaField::ProjectTitle,
            StudentField::Professor => MetaField::ProfessorName,
            StudentField::Guide => MetaField::GuideName,
            StudentField::Year => MetaField::Year,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StudentDetails {
    pub name: String,
    pub project: String,
    pub professor: String,
    pub guide: String,
    pub year: String,
}

impl StudentDetails {
    pub fn get(&self, field: StudentField) -> &str {
        match field {
            StudentField::Name => &self.name,
            StudentField::Project => &self.project,
            StudentField::Professor => &self.professor,
            StudentField::Guide => &self.guide,
            StudentField::Year => &self.year,
        }
    }
}

/// Flat form as the single-page wizard and the envelope backend see it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlatForm {
    pub selected_template: String,
    pub student_details: StudentDetails,
    pub documentation: BTreeMap<String, String>,
}

impl FlatForm {
    pub fn from_document(doc: &DocumentModel) -> Self {
        let meta = &doc.meta;
        let student_details = StudentDetails {
            name: meta.student_name.clone(),
            project: meta.project_title.clone(),
            professor: meta.professor_name.clone(),
            guide: meta.guide_name.clone(),
            year: meta.year.clone(),
        };
        let documentation = DOCUMENTATION_KEYS
            .iter()
            .map(|(doc_key, section_id)| {
                let content = doc
                    .section(section_id)
                    .map(|s| s.content.clone())
                    .unwrap_or_default();
                ((*doc_key).to_string(), content)
            })
            .collect();

        Self {
            selected_template: doc.selected_template.clone(),
            student_details,
            documentation,
        }
    }

    pub fn documentation_value(&self, doc_key: &str) -> &str {
        self.documentation
            .get(doc_key)
            .map(String::as_str)
            .unwrap_or("")
    }
}

/// Section id a flat `doc_*` key is stored under. Unknown keys are kept as
/// dynamic section ids with the `doc_` prefix stripped.
pub fn section_id_for(doc_key: &str) -> String {
    DOCUMENTATION_KEYS
        .iter()
        .find(|(key, _)| *key == doc_key)
        .map(|(_, id)| (*id).to_string())
        .unwrap_or_else(|| doc_key.strip_prefix("doc_").unwrap_or(doc_key).to_string())
}

/// Write a flat documentation field into the document.
pub fn set_documentation_field(doc: &mut DocumentModel, doc_key: &str, content: &str) -> bool {
    let id = section_id_for(doc_key);
    if doc.section(&id).is_none() && content.is_empty() {
        return false;
    }
    doc.upsert_section(&id, content)
}

/// Merge AI-generated `doc_*` fields into the document.
pub fn merge_documentation(doc: &mut DocumentModel, documentation: &BTreeMap<String, String>) -> bool {
    let mut changed = false;
    for (key, value) in documentation {
        changed |= set_documentation_field(doc, key, value);
    }
    changed
}

pub fn set_student_field(doc: &mut DocumentModel, field: StudentField, value: &str) -> bool {
    doc.set_meta(field.meta_field(), value)
}
