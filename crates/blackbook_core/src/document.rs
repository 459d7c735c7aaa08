//! Canonical report model shared by every wizard tab.
use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Sections present in a fresh document, in rendering order.
pub const DEFAULT_SECTION_KEYS: [&str; 6] = [
    "introduction",
    "objective",
    "scope",
    "techStack",
    "modules",
    "conclusion",
];

/// Local file backing an uploaded asset. Never serialized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileHandle {
    pub path: PathBuf,
    pub bytes: Option<Vec<u8>>,
}

impl FileHandle {
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            bytes: None,
        }
    }

    pub fn with_bytes(path: impl Into<PathBuf>, bytes: Vec<u8>) -> Self {
        Self {
            path: path.into(),
            bytes: Some(bytes),
        }
    }

    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetaField {
    ProjectTitle,
    StudentName,
    GuideName,
    ProfessorName,
    TechStack,
    Year,
}

impl MetaField {
    pub const ALL: [MetaField; 6] = [
        MetaField::ProjectTitle,
        MetaField::StudentName,
        MetaField::GuideName,
        MetaField::ProfessorName,
        MetaField::TechStack,
        MetaField::Year,
    ];

    pub fn key(self) -> &'static str {
        match self {
            MetaField::ProjectTitle => "projectTitle",
            MetaField::StudentName => "studentName",
            MetaField::GuideName => "guideName",
            MetaField::ProfessorName => "professorName",
            MetaField::TechStack => "techStack",
            MetaField::Year => "year",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|field| field.key() == key)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProjectMeta {
    pub project_title: String,
    pub student_name: String,
    pub guide_name: String,
    pub professor_name: String,
    pub tech_stack: String,
    pub year: String,
}

impl ProjectMeta {
    pub fn get(&self, field: MetaField) -> &str {
        match field {
            MetaField::ProjectTitle => &self.project_title,
            MetaField::StudentName => &self.student_name,
            MetaField::GuideName => &self.guide_name,
            MetaField::ProfessorName => &self.professor_name,
            MetaField::TechStack => &self.tech_stack,
            MetaField::Year => &self.year,
        }
    }

    fn slot(&mut self, field: MetaField) -> &mut String {
        match field {
            MetaField::ProjectTitle => &mut self.project_title,
            MetaField::StudentName => &mut self.student_name,
            MetaField::GuideName => &mut self.guide_name,
            MetaField::ProfessorName => &mut self.professor_name,
            MetaField::TechStack => &mut self.tech_stack,
            MetaField::Year => &mut self.year,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub id: String,
    pub heading: String,
    #[serde(default)]
    pub content: String,
    pub order: u32,
}

impl Section {
    pub fn new(id: impl Into<String>, position: usize) -> Self {
        let id = id.into();
        Self {
            heading: heading_for(&id, position),
            id,
            content: String::new(),
            order: position as u32 + 1,
        }
    }
}

/// `"techStack"` at position 3 becomes `"4. Tech Stack"`.
pub fn heading_for(key: &str, position: usize) -> String {
    format!("{}. {}", position + 1, title_case_key(key))
}

fn title_case_key(key: &str) -> String {
    let mut out = String::with_capacity(key.len() + 4);
    for (idx, c) in key.chars().enumerate() {
        if idx == 0 {
            out.extend(c.to_uppercase());
        } else if c.is_uppercase() {
            out.push(' ');
            out.push(c);
        } else {
            out.push(c);
        }
    }
    out
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagramKind {
    EventTable,
    EntityRelationship,
    Class,
    Activity,
    UseCase,
    Sequence,
    Component,
    Deployment,
    Database,
}

impl DiagramKind {
    pub const ALL: [DiagramKind; 9] = [
        DiagramKind::EventTable,
        DiagramKind::EntityRelationship,
        DiagramKind::Class,
        DiagramKind::Activity,
        DiagramKind::UseCase,
        DiagramKind::Sequence,
        DiagramKind::Component,
        DiagramKind::Deployment,
        DiagramKind::Database,
    ];

    pub fn key(self) -> &'static str {
        match self {
            DiagramKind::EventTable => "event_table",
            DiagramKind::EntityRelationship => "entity_relationship",
            DiagramKind::Class => "class",
            DiagramKind::Activity => "activity",
            DiagramKind::UseCase => "use_case",
            DiagramKind::Sequence => "sequence",
            DiagramKind::Component => "component",
            DiagramKind::Deployment => "deployment",
            DiagramKind::Database => "database",
        }
    }

    /// Display name, also sent as `diagram_type` to the diagram generator.
    pub fn display_name(self) -> &'static str {
        match self {
            DiagramKind::EventTable => "Event Table",
            DiagramKind::EntityRelationship => "Entity Relationship Diagram",
            DiagramKind::Class => "Class Diagram",
            DiagramKind::Activity => "Activity Diagram",
            DiagramKind::UseCase => "Use Case Diagram",
            DiagramKind::Sequence => "Sequence Diagram",
            DiagramKind::Component => "Component Diagram",
            DiagramKind::Deployment => "Deployment Diagram",
            DiagramKind::Database => "Database Diagram",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.key() == key)
    }
}

impl fmt::Display for DiagramKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagramSource {
    Manual,
    Ai,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagram {
    pub diagram_key: DiagramKind,
    pub name: String,
    #[serde(skip)]
    pub file: Option<FileHandle>,
    pub source: DiagramSource,
    #[serde(default)]
    pub preview_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai_filename: Option<String>,
}

impl Diagram {
    /// A user-supplied image for `kind`; overrides any AI version.
    pub fn manual(kind: DiagramKind, file: FileHandle) -> Self {
        let preview_url = file.path.to_string_lossy().into_owned();
        Self {
            diagram_key: kind,
            name: kind.display_name().to_string(),
            file: Some(file),
            source: DiagramSource::Manual,
            preview_url,
            ai_filename: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeFile {
    pub filename: String,
    #[serde(default)]
    pub language: String,
    #[serde(default)]
    pub content_text: String,
    #[serde(default)]
    pub line_count: usize,
    #[serde(skip)]
    pub file: Option<FileHandle>,
}

impl CodeFile {
    pub fn from_text(filename: impl Into<String>, language: impl Into<String>, text: String) -> Self {
        Self {
            filename: filename.into(),
            language: language.into(),
            line_count: text.split('\n').count(),
            content_text: text,
            file: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Figure {
    pub file_url: String,
    pub preview_url: String,
    pub caption: String,
    pub figure_no: String,
    #[serde(skip)]
    pub file: Option<FileHandle>,
}

impl Figure {
    pub fn image_ref(&self) -> &str {
        if !self.preview_url.is_empty() {
            &self.preview_url
        } else {
            &self.file_url
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TocEntry {
    pub level: u8,
    pub title: String,
    pub page: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemplateKind {
    #[default]
    Ieee,
    College,
    Custom,
}

impl TemplateKind {
    pub fn from_key(key: &str) -> Option<Self> {
        match key.trim().to_ascii_lowercase().as_str() {
            "ieee" => Some(TemplateKind::Ieee),
            "college" => Some(TemplateKind::College),
            "custom" => Some(TemplateKind::Custom),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Margins {
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
    pub left: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateSettings {
    pub template: TemplateKind,
    pub dark_preview: bool,
    pub margins: Margins,
    pub font_family: String,
    pub font_size: u32,
}

impl Default for TemplateSettings {
    fn default() -> Self {
        Self {
            template: TemplateKind::Ieee,
            dark_preview: false,
            margins: Margins {
                top: 64,
                right: 70,
                bottom: 64,
                left: 70,
            },
            font_family: "Source Serif 4".to_string(),
            font_size: 12,
        }
    }
}

impl TemplateSettings {
    /// Switch template, applying its typography preset. `Custom` keeps the
    /// current font and margins.
    pub fn apply_template(&mut self, template: TemplateKind) {
        self.template = template;
        match template {
            TemplateKind::Ieee => {
                self.font_family = "Source Serif 4".to_string();
                self.font_size = 11;
                self.margins = Margins {
                    top: 64,
                    right: 70,
                    bottom: 64,
                    left: 70,
                };
            }
            TemplateKind::College => {
                self.font_family = "Times New Roman".to_string();
                self.font_size = 12;
                self.margins = Margins {
                    top: 72,
                    right: 72,
                    bottom: 72,
                    left: 72,
                };
            }
            TemplateKind::Custom => {}
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Reference {
    pub label: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PlagiarismReportRef {
    pub title: String,
    pub file_name: String,
    #[serde(skip)]
    pub file: Option<FileHandle>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DocumentModel {
    pub meta: ProjectMeta,
    pub selected_template: String,
    pub sections: Vec<Section>,
    pub diagrams: Vec<Diagram>,
    pub code_files: Vec<CodeFile>,
    pub figures: Vec<Figure>,
    pub template_settings: TemplateSettings,
    pub references: Vec<Reference>,
    pub plagiarism_report: PlagiarismReportRef,
}

impl Default for DocumentModel {
    fn default() -> Self {
        Self {
            meta: ProjectMeta::default(),
            selected_template: String::new(),
            sections: DEFAULT_SECTION_KEYS
                .iter()
                .enumerate()
                .map(|(idx, key)| Section::new(*key, idx))
                .collect(),
            diagrams: Vec::new(),
            code_files: Vec::new(),
            figures: Vec::new(),
            template_settings: TemplateSettings::default(),
            references: vec![Reference::default()],
            plagiarism_report: PlagiarismReportRef::default(),
        }
    }
}

impl DocumentModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn section(&self, id: &str) -> Option<&Section> {
        self.sections.iter().find(|section| section.id == id)
    }

    pub fn set_meta(&mut self, field: MetaField, value: impl Into<String>) -> bool {
        let value = value.into();
        let slot = self.meta.slot(field);
        if *slot == value {
            return false;
        }
        *slot = value;
        true
    }

    /// Update an existing section. Unknown ids are ignored.
    pub fn set_section_content(&mut self, id: &str, content: impl Into<String>) -> bool {
        let content = content.into();
        match self.sections.iter_mut().find(|section| section.id == id) {
            Some(section) if section.content != content => {
                section.content = content;
                true
            }
            _ => false,
        }
    }

    /// Update a section, appending it when the id is not present yet.
    pub fn upsert_section(&mut self, id: &str, content: impl Into<String>) -> bool {
        if self.section(id).is_some() {
            return self.set_section_content(id, content);
        }
        let content = content.into();
        let mut section = Section::new(id, self.sections.len());
        section.content = content;
        self.sections.push(section);
        true
    }

    /// Insert or replace the diagram for its key.
    pub fn upsert_diagram(&mut self, diagram: Diagram) {
        match self
            .diagrams
            .iter_mut()
            .find(|existing| existing.diagram_key == diagram.diagram_key)
        {
            Some(existing) => *existing = diagram,
            None => self.diagrams.push(diagram),
        }
    }

    /// Replace the diagram list, keeping one entry per key (later entries win).
    pub fn set_diagrams(&mut self, diagrams: Vec<Diagram>) {
        self.diagrams.clear();
        for diagram in diagrams {
            self.upsert_diagram(diagram);
        }
    }

    pub fn diagram(&self, kind: DiagramKind) -> Option<&Diagram> {
        self.diagrams.iter().find(|d| d.diagram_key == kind)
    }

    /// Insert or replace by filename.
    pub fn upsert_code_file(&mut self, file: CodeFile) {
        match self
            .code_files
            .iter_mut()
            .find(|existing| existing.filename == file.filename)
        {
            Some(existing) => *existing = file,
            None => self.code_files.push(file),
        }
    }

    pub fn set_figure_caption(&mut self, index: usize, caption: impl Into<String>) -> bool {
        let caption = caption.into();
        match self.figures.get_mut(index) {
            Some(figure) if figure.caption != caption => {
                figure.caption = caption;
                true
            }
            _ => false,
        }
    }

    pub fn remove_figure(&mut self, index: usize) -> bool {
        if index < self.figures.len() {
            self.figures.remove(index);
            true
        } else {
            false
        }
    }

    /// Table of contents over sections with non-blank content.
    ///
    /// Page numbers are a placeholder (`index + 2`), not real pagination.
    pub fn toc(&self) -> Vec<TocEntry> {
        self.sections
            .iter()
            .filter(|section| !section.content.trim().is_empty())
            .enumerate()
            .map(|(idx, section)| TocEntry {
                level: 1,
                title: section.heading.clone(),
                page: idx + 2,
            })
            .collect()
    }

    /// Drop transient file handles, leaving serializable metadata only.
    pub fn without_files(&self) -> Self {
        let mut copy = self.clone();
        copy.diagrams.iter_mut().for_each(|d| d.file = None);
        copy.code_files.iter_mut().for_each(|c| c.file = None);
        copy.figures.iter_mut().for_each(|f| f.file = None);
        copy.plagiarism_report.file = None;
        copy
    }

    /// Restore defaults a hydrated document might be missing: default
    /// sections absent from the stored list are appended, section order is
    /// renumbered and the references list is never empty.
    pub fn normalized(mut self) -> Self {
        for key in DEFAULT_SECTION_KEYS {
            if self.section(key).is_none() {
                let position = self.sections.len();
                self.sections.push(Section::new(key, position));
            }
        }
        for (idx, section) in self.sections.iter_mut().enumerate() {
            section.order = idx as u32 + 1;
        }
        if self.references.is_empty() {
            self.references.push(Reference::default());
        }
        self
    }
}
